//! Channel tuning knobs.

use std::time::Duration;

use filedock_protocol::constants::{MAX_MESSAGE_SIZE, PING_PERIOD, PONG_WAIT, REQUEST_TIMEOUT};

/// Configuration for a [`crate::Channel`].
///
/// The defaults come from the protocol constants and suit a LAN or nearby
/// server; loosen the timeouts for high-latency links.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Maximum WebSocket message/frame size accepted in either direction.
    pub max_message_size: usize,
    /// Interval between keepalive pings.
    pub ping_period: Duration,
    /// A connection silent for this long is considered dead.
    pub pong_wait: Duration,
    /// Default timeout for [`crate::Channel::request`].
    pub request_timeout: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_message_size: MAX_MESSAGE_SIZE,
            ping_period: PING_PERIOD,
            pong_wait: PONG_WAIT,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}
