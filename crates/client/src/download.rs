//! Download pipeline: size-declared chunk reassembly.

use tracing::{debug, trace};

use filedock_protocol::constants::{EventName, MAX_MESSAGE_SIZE, TRANSFER_IDLE_TIMEOUT};
use filedock_protocol::messages::{DownloadSize, FileDataPayload, FileRequest};

use crate::error::{ClientError, parse_payload};
use crate::session::Session;

impl Session {
    /// Downloads `filename`, returning its reassembled bytes.
    ///
    /// The declared size is the sole completion oracle: chunks are appended
    /// in arrival order until the received byte count equals it. A declared
    /// size of zero means the file does not exist; the chunk listener is
    /// released without ever being read in that case. A chunk that would
    /// overrun the declared size aborts with [`ClientError::SizeMismatch`],
    /// and a stalled stream aborts with a timeout instead of hanging.
    pub async fn download(&self, filename: &str) -> Result<Vec<u8>, ClientError> {
        let _slot = self
            .download_slot
            .try_lock()
            .map_err(|_| ClientError::TransferInFlight)?;

        // The peer may start streaming chunks immediately after the size
        // frame; the chunk listener must already be bound or those chunks
        // hit an empty registry and are dropped.
        let mut chunks = self.channel.subscribe(EventName::FileData).await;

        let request = FileRequest {
            username: self.username.clone(),
            filename: filename.to_string(),
        };
        let event = self
            .channel
            .request(
                EventName::DownloadFile,
                &request,
                EventName::FileDownloadSize,
            )
            .await?;
        let DownloadSize { size: declared } = parse_payload(&event)?;

        if declared == 0 {
            self.channel.unsubscribe(&[EventName::FileData]).await;
            debug!(filename, "download target not found");
            return Err(ClientError::NotFound);
        }
        debug!(filename, declared, "download size declared");

        // The declared size is peer-supplied and untrusted; cap the up-front
        // allocation and let the buffer grow as bytes actually arrive.
        let mut buffer = Vec::with_capacity((declared as usize).min(MAX_MESSAGE_SIZE));
        let mut received: u64 = 0;

        while received < declared {
            let event = chunks.next_within(TRANSFER_IDLE_TIMEOUT).await?;
            let FileDataPayload { data } = parse_payload(&event)?;

            let incoming = data.len() as u64;
            if received + incoming > declared {
                return Err(ClientError::SizeMismatch {
                    declared,
                    received: received + incoming,
                });
            }

            buffer.extend_from_slice(&data);
            received += incoming;
            trace!(received, declared, "chunk received");
        }

        debug!(filename, received, "download complete");
        Ok(buffer)
    }
}
