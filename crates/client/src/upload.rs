//! Upload pipeline: ack-gated, paced chunk streaming.

use std::ops::Range;

use tracing::{debug, trace};

use filedock_protocol::constants::{
    CHUNK_PACING, CHUNK_SIZE, EventName, REQUEST_TIMEOUT, TRANSFER_IDLE_TIMEOUT,
};
use filedock_protocol::messages::{AckPayload, UploadRequest, UploadResult, UploadStatus};

use crate::error::{ClientError, parse_payload};
use crate::session::Session;

/// Result of a completed upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Server-supplied success message, if any.
    pub message: Option<String>,
    /// The refreshed file listing issued after the completion ack.
    pub files: Vec<String>,
}

/// Fixed-size chunk spans over `total` bytes; the final span may be shorter.
fn chunk_spans(total: usize, chunk_size: usize) -> impl Iterator<Item = Range<usize>> {
    (0..total)
        .step_by(chunk_size)
        .map(move |offset| offset..usize::min(offset + chunk_size, total))
}

impl Session {
    /// Uploads `content` under `filename`.
    ///
    /// The whole file content is held in memory up front; there is no
    /// streaming read of the source. Protocol steps: announce, await the ack
    /// gate, stream paced chunks, await the terminal result, then refresh
    /// the listing. The completion ack is consumed if it arrives but is not
    /// required; some peers never emit it.
    ///
    /// `EXISTS` and `FAIL` terminals abort with the server's error verbatim;
    /// a retry is a brand-new upload from offset zero.
    pub async fn upload(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<UploadOutcome, ClientError> {
        let _slot = self
            .upload_slot
            .try_lock()
            .map_err(|_| ClientError::TransferInFlight)?;

        // Bind every response listener before announcing; events of
        // different names carry no cross-name ordering guarantee.
        let mut ack = self.channel.subscribe(EventName::AckUpload).await;
        let mut result = self.channel.subscribe(EventName::FileUpload).await;
        let mut completed = self.channel.subscribe(EventName::AckUploadCompleted).await;

        let total = content.len();
        let request = UploadRequest {
            username: self.username.clone(),
            filename: filename.to_string(),
            size: total as u64,
        };
        self.channel.emit(EventName::UploadFile, &request).await?;
        debug!(filename, total, "upload announced");

        // Ack gate: no chunk is sent until the server acknowledges
        // readiness. Payload decoding enforces status == ACK.
        let event = ack.next_within(REQUEST_TIMEOUT).await?;
        let _ready: AckPayload = parse_payload(&event)?;

        // Chunk loop. A zero-byte file performs zero iterations and is
        // driven entirely by the terminal events below.
        let mut terminal: Option<UploadResult> = None;
        for (index, span) in chunk_spans(total, CHUNK_SIZE).enumerate() {
            if index > 0 {
                tokio::time::sleep(CHUNK_PACING).await;
            }

            // A FAIL/EXISTS terminal may land while chunks are still being
            // paced; stop streaming as soon as one does.
            if let Some(event) = result.try_next() {
                let early: UploadResult = parse_payload(&event)?;
                if !early.is_success() {
                    return Err(rejection(early));
                }
                terminal = Some(early);
            }

            trace!(index, len = span.len(), "sending chunk");
            self.channel.emit_chunk(&content[span]).await?;
        }

        let terminal = match terminal {
            Some(t) => t,
            None => {
                let event = result.next_within(TRANSFER_IDLE_TIMEOUT).await?;
                parse_payload(&event)?
            }
        };
        if !terminal.is_success() {
            return Err(rejection(terminal));
        }

        // The completion ack is a list-refresh trigger, not a success gate;
        // the terminal result above already decided the outcome. Drain it if
        // it has arrived so a stale ack cannot leak into a later upload.
        let _ = completed.try_next();
        debug!(filename, "upload accepted");

        let files = self.list_files().await?;
        Ok(UploadOutcome {
            message: terminal.message,
            files,
        })
    }
}

/// Maps a rejecting terminal result onto the error taxonomy.
fn rejection(result: UploadResult) -> ClientError {
    let error = result.error.unwrap_or_default();
    match result.status {
        Some(UploadStatus::Exists) => ClientError::AlreadyExists { error },
        _ => ClientError::UploadFailed { error },
    }
}
