//! Client error taxonomy.
//!
//! Every operation failure is terminal; server-supplied `error`/`message`
//! strings are carried verbatim.

use serde::de::DeserializeOwned;

use filedock_channel::ChannelError;
use filedock_protocol::constants::EventName;
use filedock_protocol::envelope::Event;

/// Errors from the file operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("authentication failed")]
    AuthFailed,

    #[error("file already exists: {error}")]
    AlreadyExists { error: String },

    #[error("upload failed: {error}")]
    UploadFailed { error: String },

    #[error("file not found")]
    NotFound,

    #[error("file cannot be previewed: {message}")]
    NotViewable { message: String },

    #[error("delete failed: {error}")]
    DeleteFailed { error: String },

    #[error("listing failed: {error}")]
    ListFailed { error: String },

    #[error("download size mismatch: declared {declared}, received {received}")]
    SizeMismatch { declared: u64, received: u64 },

    #[error("a transfer of this kind is already in flight")]
    TransferInFlight,

    #[error("unexpected payload for {event}")]
    UnexpectedPayload { event: EventName },
}

/// Deserializes an event's payload, treating an absent payload as malformed.
pub(crate) fn parse_payload<T: DeserializeOwned>(event: &Event) -> Result<T, ClientError> {
    event
        .parse_payload::<T>()
        .map_err(ChannelError::from)?
        .ok_or(ClientError::UnexpectedPayload { event: event.event })
}
