//! WebSocket read pump — dispatches incoming events to their listeners.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use filedock_protocol::envelope::Event;

use crate::channel::DisconnectCallback;
use crate::registry::ListenerRegistry;

/// Reads messages from the WebSocket and routes them through the registry.
///
/// Keeps a silence deadline: if nothing arrives within `pong_wait` the
/// connection is considered dead and the loop exits. Any incoming message
/// resets the deadline, so regular server pongs keep a healthy connection
/// open indefinitely.
pub(crate) async fn read_pump<S>(
    mut read: S,
    registry: Arc<Mutex<ListenerRegistry>>,
    on_disconnect: DisconnectCallback,
    write_tx: mpsc::Sender<tungstenite::Message>,
    pong_wait: Duration,
    max_message_size: usize,
    cancel: CancellationToken,
) where
    S: StreamExt<Item = Result<tungstenite::Message, tungstenite::Error>> + Unpin,
{
    let silence_deadline = tokio::time::sleep(pong_wait);
    tokio::pin!(silence_deadline);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            () = &mut silence_deadline => {
                warn!("pong timeout, connection dead, closing");
                break;
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(msg)) => {
                        silence_deadline.as_mut().reset(tokio::time::Instant::now() + pong_wait);

                        match msg {
                            tungstenite::Message::Text(text) => {
                                handle_text_message(&text, &registry, max_message_size).await;
                            }
                            tungstenite::Message::Ping(data) => {
                                trace!("received ping, sending pong");
                                let _ = write_tx.send(tungstenite::Message::Pong(data)).await;
                            }
                            tungstenite::Message::Pong(_) => {
                                trace!("received pong");
                            }
                            tungstenite::Message::Close(_) => {
                                debug!("received close frame");
                                break;
                            }
                            // The peer streams download chunks as text
                            // envelopes; binary frames are outbound-only.
                            _ => trace!("ignoring binary frame"),
                        }
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket read error: {e}");
                        break;
                    }
                    None => {
                        debug!("WebSocket stream ended");
                        break;
                    }
                }
            }
        }
    }

    // End every subscription so awaiting operations observe the teardown
    // instead of hanging.
    registry.lock().await.release_all();

    if let Some(cb) = on_disconnect.lock().await.as_ref() {
        cb();
    }
}

/// Parses a text frame and routes it to the current listener for its name.
async fn handle_text_message(
    text: &str,
    registry: &Arc<Mutex<ListenerRegistry>>,
    max_message_size: usize,
) {
    if text.len() > max_message_size {
        warn!("message too large ({} bytes), dropping", text.len());
        return;
    }

    let event: Event = match serde_json::from_str(text) {
        Ok(e) => e,
        Err(e) => {
            warn!("failed to parse event: {e}");
            return;
        }
    };

    let name = event.event;
    trace!(%name, "received event");

    if !registry.lock().await.dispatch(event) {
        debug!(%name, "no listener bound, dropping event");
    }
}
