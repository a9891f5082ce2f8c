//! Live update channel: one websocket subscription per session.
//!
//! [`ChannelHandle::open`] spawns a task that connects to
//! `{ws_base_url}/ws/chat/{session}` and reports everything it sees through a
//! callback. Closing the handle cancels the task and drops the callback; no
//! callback runs after `close` returns.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use chatroom_types::Message;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Identifies one opened channel. Ids are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

/// Events reported by a channel task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Handshake completed; the channel accepts outbound messages.
    Opened,
    /// A well-formed inbound message.
    Message(Message),
    /// The server closed the connection.
    Closed,
    /// Connecting or reading failed; the channel is gone.
    Failed(String),
}

type EventCallback = Box<dyn FnMut(ChannelEvent) + Send>;

/// Callback slot shared by the handle and the channel task. Emitting and
/// clearing take the same lock.
#[derive(Clone)]
struct EventSink(Arc<Mutex<Option<EventCallback>>>);

impl EventSink {
    fn new(callback: EventCallback) -> Self {
        Self(Arc::new(Mutex::new(Some(callback))))
    }

    fn emit(&self, event: ChannelEvent) {
        let mut slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(callback) = slot.as_mut() {
            callback(event);
        }
    }

    fn clear(&self) {
        let callback = self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
        drop(callback);
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventSink")
    }
}

/// Owner side of an open channel.
///
/// Dropping the handle closes the channel.
#[derive(Debug)]
pub struct ChannelHandle {
    id: ChannelId,
    session_id: String,
    outbound: mpsc::UnboundedSender<Message>,
    cancel: CancellationToken,
    sink: EventSink,
}

impl ChannelHandle {
    /// Opens a channel for `session_id` and starts forwarding its events.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open<F>(id: ChannelId, ws_base_url: &str, session_id: &str, on_event: F) -> Result<Self>
    where
        F: FnMut(ChannelEvent) + Send + 'static,
    {
        let url = channel_url(ws_base_url, session_id)?;
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let sink = EventSink::new(Box::new(on_event));

        info!(channel = id.0, session = session_id, url = %url, "opening live channel");
        tokio::spawn(run_channel(url, id, cancel.clone(), outbound_rx, sink.clone()));

        Ok(Self {
            id,
            session_id: session_id.to_string(),
            outbound,
            cancel,
            sink,
        })
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.outbound.is_closed()
    }

    /// Queues a message for transmission. Returns false if the channel is gone.
    pub fn send(&self, message: Message) -> bool {
        !self.cancel.is_cancelled() && self.outbound.send(message).is_ok()
    }

    /// Closes the channel. Safe to call any number of times.
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            debug!(channel = self.id.0, session = %self.session_id, "closing live channel");
            self.cancel.cancel();
        }
        self.sink.clear();
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.sink.clear();
    }
}

/// Builds the websocket URL for a session, percent-encoding the id.
pub fn channel_url(ws_base_url: &str, session_id: &str) -> Result<Url> {
    let mut url = Url::parse(ws_base_url)
        .with_context(|| format!("Invalid websocket base URL '{ws_base_url}'"))?;
    url.path_segments_mut()
        .map_err(|()| anyhow::anyhow!("Websocket base URL cannot be a base: {ws_base_url}"))?
        .pop_if_empty()
        .extend(["ws", "chat", session_id]);
    Ok(url)
}

/// Parses one text frame. Malformed frames are logged and dropped.
pub fn decode_frame(text: &str) -> Option<Message> {
    match serde_json::from_str::<Message>(text) {
        Ok(message) => Some(message),
        Err(error) => {
            warn!(%error, frame = text, "dropping malformed channel frame");
            None
        }
    }
}

async fn run_channel(
    url: Url,
    id: ChannelId,
    cancel: CancellationToken,
    mut outbound_rx: mpsc::UnboundedReceiver<Message>,
    sink: EventSink,
) {
    let emit = |event: ChannelEvent| sink.emit(event);

    let connected = tokio::select! {
        () = cancel.cancelled() => return,
        result = connect_async(url.as_str()) => result,
    };
    let ws = match connected {
        Ok((ws, _response)) => ws,
        Err(error) => {
            warn!(channel = id.0, %error, "live channel connect failed");
            emit(ChannelEvent::Failed(error.to_string()));
            return;
        }
    };
    emit(ChannelEvent::Opened);

    let (mut sink, mut stream) = ws.split();
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                let _ = sink.send(WsMessage::Close(None)).await;
                break;
            }
            frame = stream.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    if let Some(message) = decode_frame(text.as_str()) {
                        emit(ChannelEvent::Message(message));
                    }
                }
                Some(Ok(WsMessage::Ping(data))) => {
                    let _ = sink.send(WsMessage::Pong(data)).await;
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    debug!(channel = id.0, "live channel closed by server");
                    emit(ChannelEvent::Closed);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    warn!(channel = id.0, %error, "live channel read failed");
                    emit(ChannelEvent::Failed(error.to_string()));
                    break;
                }
            },
            outgoing = outbound_rx.recv() => {
                let Some(message) = outgoing else { break };
                let payload = match serde_json::to_string(&message) {
                    Ok(payload) => payload,
                    Err(error) => {
                        warn!(channel = id.0, %error, "failed to encode outbound message");
                        continue;
                    }
                };
                if let Err(error) = sink.send(WsMessage::Text(payload.into())).await {
                    warn!(channel = id.0, %error, "live channel write failed");
                    emit(ChannelEvent::Failed(error.to_string()));
                    break;
                }
            }
        }
    }
    debug!(channel = id.0, "live channel task finished");
}
