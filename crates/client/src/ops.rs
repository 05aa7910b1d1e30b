//! One-shot request/response operations: list, view, delete.

use tracing::debug;

use filedock_protocol::constants::EventName;
use filedock_protocol::messages::{
    DeleteResult, DeleteStatus, FileListPayload, FileRequest, FileViewPayload, ListRequest,
    ViewStatus,
};

use crate::error::{ClientError, parse_payload};
use crate::session::Session;

impl Session {
    /// Fetches the file listing for this session's identity.
    ///
    /// The returned listing replaces any prior one wholesale; there is no
    /// incremental diff.
    pub async fn list_files(&self) -> Result<Vec<String>, ClientError> {
        let request = ListRequest {
            username: self.username.clone(),
        };
        let event = self
            .channel
            .request(EventName::ListFiles, &request, EventName::FileList)
            .await?;
        let listing: FileListPayload = parse_payload(&event)?;

        if let Some(error) = listing.error {
            return Err(ClientError::ListFailed { error });
        }
        debug!(count = listing.files.len(), "file listing received");
        Ok(listing.files)
    }

    /// Fetches a text preview of `filename`.
    ///
    /// `Error` means the file does not exist; `ErrorView` means it exists
    /// but cannot be previewed (binary or unsupported).
    pub async fn view_file(&self, filename: &str) -> Result<String, ClientError> {
        let request = self.target(filename);
        let event = self
            .channel
            .request(EventName::ViewFile, &request, EventName::FileView)
            .await?;
        let view: FileViewPayload = parse_payload(&event)?;

        match view.status {
            ViewStatus::Success => view.data.ok_or(ClientError::UnexpectedPayload {
                event: EventName::FileView,
            }),
            ViewStatus::NotFound => Err(ClientError::NotFound),
            ViewStatus::NotViewable => Err(ClientError::NotViewable {
                message: view.message.unwrap_or_default(),
            }),
        }
    }

    /// Deletes `filename`, returning the server's message on success.
    pub async fn delete_file(&self, filename: &str) -> Result<Option<String>, ClientError> {
        let request = self.target(filename);
        let event = self
            .channel
            .request(EventName::DeleteFile, &request, EventName::FileDelete)
            .await?;
        let result: DeleteResult = parse_payload(&event)?;

        match result.status {
            DeleteStatus::Success => {
                debug!(filename, "file deleted");
                Ok(result.message)
            }
            DeleteStatus::Fail => Err(ClientError::DeleteFailed {
                error: result.error.unwrap_or_default(),
            }),
        }
    }

    fn target(&self, filename: &str) -> FileRequest {
        FileRequest {
            username: self.username.clone(),
            filename: filename.to_string(),
        }
    }
}
