//! Channel adapter for the filedock wire protocol.
//!
//! Owns the single persistent WebSocket connection and provides
//! send/receive-by-event-name primitives to the operations layered on top.
//! Subscriptions are last-registration-wins per event name.

pub mod channel;
pub mod config;
pub(crate) mod pumps;
pub mod registry;

pub use channel::{Channel, ChannelError, EventStream};
pub use config::ChannelConfig;
