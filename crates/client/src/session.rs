//! Authenticated session over the event channel.

use tokio::sync::Mutex;
use tracing::{debug, info};

use filedock_channel::Channel;
use filedock_protocol::constants::EventName;
use filedock_protocol::messages::{AuthRequest, AuthResponse, AuthStatus};

use crate::error::{ClientError, parse_payload};

/// Every server→client event name a session may have bound.
const RESPONSE_EVENTS: [EventName; 9] = [
    EventName::AuthResponse,
    EventName::AckUpload,
    EventName::FileUpload,
    EventName::AckUploadCompleted,
    EventName::FileList,
    EventName::FileView,
    EventName::FileDownloadSize,
    EventName::FileData,
    EventName::FileDelete,
];

/// An authenticated session.
///
/// Owns the channel; constructing one requires a successful auth handshake,
/// so no file operation can be issued before an identity is established.
/// At most one upload and one download may be in flight at a time; a second
/// transfer of the same kind is rejected with
/// [`ClientError::TransferInFlight`].
pub struct Session {
    pub(crate) channel: Channel,
    pub(crate) username: String,
    pub(crate) upload_slot: Mutex<()>,
    pub(crate) download_slot: Mutex<()>,
}

impl Session {
    /// Exchanges credentials for a session identity.
    ///
    /// Any status other than `SUCCESS` is a uniform authentication failure;
    /// the channel is dropped (and thereby closed) on failure.
    pub async fn authenticate(
        channel: Channel,
        username: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        let request = AuthRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let event = channel
            .request(EventName::Authenticate, &request, EventName::AuthResponse)
            .await?;
        let response: AuthResponse = parse_payload(&event)?;

        match response.status {
            AuthStatus::Success => {
                info!(username, "authenticated");
                Ok(Self {
                    channel,
                    username: username.to_string(),
                    upload_slot: Mutex::new(()),
                    download_slot: Mutex::new(()),
                })
            }
            AuthStatus::Failure => {
                debug!(username, "authentication rejected");
                Err(ClientError::AuthFailed)
            }
        }
    }

    /// The session identity established by the handshake.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The underlying channel.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Ends the session: releases every bound listener and disconnects.
    ///
    /// No session-end message is sent to the peer; in-flight jobs are
    /// abandoned.
    pub async fn logout(self) {
        self.channel.unsubscribe(&RESPONSE_EVENTS).await;
        self.channel.close().await;
        debug!(username = %self.username, "session ended");
    }
}
