use serde::{Deserialize, Serialize};

use crate::constants::EventName;

/// Envelope for all text-frame communication on the channel.
///
/// The `payload` field uses `serde_json::value::RawValue` to defer
/// deserialization until the receiving operation knows the expected shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event: EventName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Box<serde_json::value::RawValue>>,
}

impl Event {
    /// Creates a new event with the given name and payload.
    pub fn new<T: Serialize>(
        event: EventName,
        payload: Option<&T>,
    ) -> Result<Self, serde_json::Error> {
        let raw = match payload {
            Some(p) => {
                let json = serde_json::to_string(p)?;
                Some(serde_json::value::RawValue::from_string(json)?)
            }
            None => None,
        };
        Ok(Self {
            event,
            payload: raw,
        })
    }

    /// Creates a payload-less event.
    pub fn bare(event: EventName) -> Self {
        Self {
            event,
            payload: None,
        }
    }

    /// Deserializes the payload into the given type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(
        &self,
    ) -> Result<Option<T>, serde_json::Error> {
        match &self.payload {
            Some(raw) => Ok(Some(serde_json::from_str(raw.get())?)),
            None => Ok(None),
        }
    }
}

/// Errors from decoding the framed binary chunk format.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame truncated: {0} bytes")]
    Truncated(usize),

    #[error("invalid frame header: {0}")]
    Header(#[from] serde_json::Error),
}

/// Header of a binary chunk frame: an [`Event`] without payload.
#[derive(Debug, Serialize, Deserialize)]
struct ChunkHeader {
    event: EventName,
}

/// Encodes a binary chunk frame.
///
/// Wire format: `[4 bytes big-endian header length][JSON header][chunk bytes]`.
/// The header names the event the bytes belong to (always `file_data` in the
/// current protocol).
pub fn encode_chunk_frame(event: EventName, data: &[u8]) -> Result<Vec<u8>, serde_json::Error> {
    let header_bytes = serde_json::to_vec(&ChunkHeader { event })?;
    let header_len = header_bytes.len();

    let mut frame = Vec::with_capacity(4 + header_len + data.len());
    frame.extend_from_slice(&(header_len as u32).to_be_bytes());
    frame.extend_from_slice(&header_bytes);
    frame.extend_from_slice(data);
    Ok(frame)
}

/// Decodes a binary chunk frame into its event name and chunk bytes.
pub fn decode_chunk_frame(frame: &[u8]) -> Result<(EventName, &[u8]), FrameError> {
    if frame.len() < 4 {
        return Err(FrameError::Truncated(frame.len()));
    }
    let header_len = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
    if frame.len() < 4 + header_len {
        return Err(FrameError::Truncated(frame.len()));
    }
    let header: ChunkHeader = serde_json::from_slice(&frame[4..4 + header_len])?;
    Ok((header.event, &frame[4 + header_len..]))
}
