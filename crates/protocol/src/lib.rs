//! Wire protocol for the filedock event channel.
//!
//! A single WebSocket connection multiplexes every file operation as named
//! events. Text frames carry a JSON [`envelope::Event`]; upload chunks travel
//! as framed binary messages (see [`envelope::encode_chunk_frame`]).

pub mod constants;
pub mod envelope;
pub mod messages;

pub use constants::EventName;
pub use envelope::{Event, FrameError};
