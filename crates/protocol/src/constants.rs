//! Protocol constants and the event-name vocabulary.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Maximum bytes per upload chunk. The final chunk of a file may be shorter.
pub const CHUNK_SIZE: usize = 512 * 1024;

/// Fixed delay between chunk sends. This is the only backpressure mechanism
/// on the chunk stream; no per-chunk acknowledgement exists.
pub const CHUNK_PACING: Duration = Duration::from_millis(100);

/// Timeout for one-shot request/response exchanges (auth, list, view,
/// delete) and the upload ack gate.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle timeout during a transfer: maximum wait for the next download chunk
/// or for an upload's terminal result after the last chunk was sent.
pub const TRANSFER_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum WebSocket message size accepted in either direction.
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// Interval between keepalive pings.
pub const PING_PERIOD: Duration = Duration::from_secs(30);

/// A connection with no incoming traffic for this long is considered dead.
pub const PONG_WAIT: Duration = Duration::from_secs(60);

/// Every event name carried on the channel.
///
/// Serializes to the snake_case wire strings (`"auth_response"`,
/// `"file_download_size"`, ...). `FileData` is overloaded by direction:
/// client→server it is an upload chunk, server→client a download chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    Authenticate,
    AuthResponse,
    UploadFile,
    AckUpload,
    FileData,
    FileUpload,
    AckUploadCompleted,
    ListFiles,
    FileList,
    ViewFile,
    FileView,
    DownloadFile,
    FileDownloadSize,
    DeleteFile,
    FileDelete,
}

impl EventName {
    /// The wire string for this event.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Authenticate => "authenticate",
            EventName::AuthResponse => "auth_response",
            EventName::UploadFile => "upload_file",
            EventName::AckUpload => "ack_upload",
            EventName::FileData => "file_data",
            EventName::FileUpload => "file_upload",
            EventName::AckUploadCompleted => "ack_upload_completed",
            EventName::ListFiles => "list_files",
            EventName::FileList => "file_list",
            EventName::ViewFile => "view_file",
            EventName::FileView => "file_view",
            EventName::DownloadFile => "download_file",
            EventName::FileDownloadSize => "file_download_size",
            EventName::DeleteFile => "delete_file",
            EventName::FileDelete => "file_delete",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
