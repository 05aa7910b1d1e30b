//! The channel adapter owning the persistent WebSocket connection.
//!
//! Provides emit/subscribe-by-event-name primitives plus a one-shot
//! request/response helper. All protocol operations take the channel as an
//! explicit dependency; nothing reads ambient connection state.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use filedock_protocol::constants::EventName;
use filedock_protocol::envelope::{self, Event};

use crate::config::ChannelConfig;
use crate::registry::ListenerRegistry;

/// Errors from the channel adapter.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("WebSocket error: {0}")]
    Ws(#[from] tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("timed out waiting for response")]
    Timeout,

    #[error("channel closed")]
    Closed,

    #[error("subscription superseded or torn down")]
    Superseded,
}

/// Callback type for disconnect notification.
pub(crate) type DisconnectCallback = Arc<Mutex<Option<Box<dyn Fn() + Send + Sync>>>>;

/// Stream of events for a single subscribed event name.
///
/// The stream ends when a newer subscription for the same name supersedes
/// this one, or when the channel is torn down.
pub struct EventStream {
    event: EventName,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
    /// The event name this stream is bound to.
    pub fn event(&self) -> EventName {
        self.event
    }

    /// Waits for the next event. `None` means superseded or torn down.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Returns an already-delivered event without waiting, if any.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next event, bounded by `timeout`.
    pub async fn next_within(&mut self, timeout: Duration) -> Result<Event, ChannelError> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(evt)) => Ok(evt),
            Ok(None) => Err(ChannelError::Superseded),
            Err(_) => Err(ChannelError::Timeout),
        }
    }
}

/// A connected event channel.
///
/// Dropping the channel (or calling [`Channel::close`]) cancels the pump
/// tasks and ends every active subscription.
pub struct Channel {
    write_tx: mpsc::Sender<tungstenite::Message>,
    registry: Arc<Mutex<ListenerRegistry>>,
    on_disconnect: DisconnectCallback,
    config: ChannelConfig,
    _read_handle: tokio::task::JoinHandle<()>,
    _write_handle: tokio::task::JoinHandle<()>,
    _ping_handle: tokio::task::JoinHandle<()>,
    cancel: CancellationToken,
}

impl Channel {
    /// Connects to the server endpoint with default configuration.
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        Self::connect_with(url, ChannelConfig::default()).await
    }

    /// Connects to the server endpoint.
    pub async fn connect_with(url: &str, config: ChannelConfig) -> Result<Self, ChannelError> {
        let mut ws_config = tungstenite::protocol::WebSocketConfig::default();
        ws_config.max_message_size = Some(config.max_message_size);
        ws_config.max_frame_size = Some(config.max_message_size);
        let (ws_stream, _) =
            tokio_tungstenite::connect_async_with_config(url, Some(ws_config), false).await?;
        let (write, read) = ws_stream.split();

        let (write_tx, write_rx) = mpsc::channel::<tungstenite::Message>(256);
        let registry = Arc::new(Mutex::new(ListenerRegistry::new()));
        let on_disconnect: DisconnectCallback = Arc::new(Mutex::new(None));
        let cancel = CancellationToken::new();

        let write_handle = {
            let cancel = cancel.clone();
            tokio::spawn(crate::pumps::write::write_pump(write, write_rx, cancel))
        };

        let read_handle = {
            let registry = registry.clone();
            let on_disconnect = on_disconnect.clone();
            let write_tx = write_tx.clone();
            let cancel = cancel.clone();
            let pong_wait = config.pong_wait;
            let max_message_size = config.max_message_size;
            tokio::spawn(crate::pumps::read::read_pump(
                read,
                registry,
                on_disconnect,
                write_tx,
                pong_wait,
                max_message_size,
                cancel,
            ))
        };

        let ping_handle = {
            let write_tx = write_tx.clone();
            let cancel = cancel.clone();
            tokio::spawn(crate::pumps::ping::ping_pump(
                write_tx,
                config.ping_period,
                cancel,
            ))
        };

        debug!(%url, "channel connected");

        Ok(Self {
            write_tx,
            registry,
            on_disconnect,
            config,
            _read_handle: read_handle,
            _write_handle: write_handle,
            _ping_handle: ping_handle,
            cancel,
        })
    }

    /// Sends a named event with a JSON payload.
    pub async fn emit<T: serde::Serialize>(
        &self,
        event: EventName,
        payload: &T,
    ) -> Result<(), ChannelError> {
        let evt = Event::new(event, Some(payload))?;
        let json = serde_json::to_string(&evt)?;
        self.write_tx
            .send(tungstenite::Message::Text(json.into()))
            .await
            .map_err(|_| ChannelError::Closed)
    }

    /// Sends one raw chunk of upload bytes as a framed binary message.
    ///
    /// Wire format: `[4 bytes big-endian header length][{"event":"file_data"}]
    /// [chunk bytes]`.
    pub async fn emit_chunk(&self, data: &[u8]) -> Result<(), ChannelError> {
        let frame = envelope::encode_chunk_frame(EventName::FileData, data)?;
        self.write_tx
            .send(tungstenite::Message::Binary(frame.into()))
            .await
            .map_err(|_| ChannelError::Closed)
    }

    /// Subscribes to `event`, superseding any existing subscription for it.
    pub async fn subscribe(&self, event: EventName) -> EventStream {
        let rx = self.registry.lock().await.bind(event);
        EventStream { event, rx }
    }

    /// Releases the subscriptions for the given event names.
    pub async fn unsubscribe(&self, events: &[EventName]) {
        let mut reg = self.registry.lock().await;
        for &event in events {
            reg.release(event);
        }
    }

    /// Sends a request and waits for exactly one response event.
    ///
    /// The response listener is bound before the request is emitted, so the
    /// response cannot be lost to a registration race. Waits up to the
    /// configured request timeout.
    pub async fn request<T: serde::Serialize>(
        &self,
        event: EventName,
        payload: &T,
        response: EventName,
    ) -> Result<Event, ChannelError> {
        let mut stream = self.subscribe(response).await;
        self.emit(event, payload).await?;
        stream.next_within(self.config.request_timeout).await
    }

    /// Sets the callback invoked when the connection is lost.
    pub async fn set_disconnect_callback(&self, cb: Box<dyn Fn() + Send + Sync>) {
        *self.on_disconnect.lock().await = Some(cb);
    }

    /// The configuration this channel was built with.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Gracefully closes the connection.
    pub async fn close(&self) {
        self.cancel.cancel();
        let _ = self.write_tx.send(tungstenite::Message::Close(None)).await;
        self.registry.lock().await.release_all();
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        self.cancel.cancel();
        self._read_handle.abort();
        self._write_handle.abort();
        self._ping_handle.abort();
    }
}
