//! WebSocket transport connector.
//!
//! One duplex connection per client. The writer half is fed through an mpsc
//! channel so callers never touch the socket; the reader half runs as its
//! own task and hands every text frame to an [`InboundSink`]. Connection
//! loss transitions the state machine Open→Offline and notifies the sink
//! exactly once per transition — reconnection, if any, is caller-initiated.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::error::Error;

/// Outbound frames queued ahead of the writer task.
const WRITER_QUEUE_DEPTH: usize = 64;

// ── State machine ─────────────────────────────────────────────────────────────

/// Connection lifecycle. `Offline` is both the initial state and the
/// terminal state after loss; there is no automatic Offline→Open edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Offline,
}

// ── Boundary traits ───────────────────────────────────────────────────────────

/// Outbound seam between the correlator and the wire. Implemented by
/// [`WsConnector`] in production and by an in-memory double in tests.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Queue one text frame. Fails with [`Error::Transport`] when the
    /// connection is not open.
    async fn send_text(&self, frame: String) -> Result<(), Error>;

    fn state(&self) -> ConnectionState;
}

/// Inbound seam: the reader task pushes frames and loss notifications here.
/// The client wires this to the correlator (replies) and router (events).
pub trait InboundSink: Send + Sync {
    fn frame(&self, text: &str);

    /// Called exactly once per Open→Offline transition.
    fn connection_lost(&self, reason: &str);
}

// ── Connector ─────────────────────────────────────────────────────────────────

pub struct WsConnector {
    url: String,
    state: Arc<Mutex<ConnectionState>>,
    writer: Mutex<Option<mpsc::Sender<String>>>,
}

/// Compare-and-set Open→Offline. Shared with the reader task so loss is
/// reported exactly once no matter which side observes it first.
fn transition_offline(state: &Mutex<ConnectionState>) -> bool {
    let mut state = lock(state);
    if *state == ConnectionState::Open {
        *state = ConnectionState::Offline;
        true
    } else {
        false
    }
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: Arc::new(Mutex::new(ConnectionState::Offline)),
            writer: Mutex::new(None),
        }
    }

    /// Establish the connection and spawn the reader/writer tasks.
    ///
    /// Idempotent: a no-op while already Connecting or Open. A failed
    /// handshake returns the state to Offline and surfaces a transport
    /// error to the caller; the sink is not notified since the connection
    /// was never Open.
    pub async fn connect(&self, sink: Arc<dyn InboundSink>) -> Result<(), Error> {
        {
            let mut state = lock(&self.state);
            match *state {
                ConnectionState::Connecting | ConnectionState::Open => return Ok(()),
                ConnectionState::Offline => *state = ConnectionState::Connecting,
            }
        }

        let (stream, _) = match connect_async(self.url.as_str()).await {
            Ok(ok) => ok,
            Err(err) => {
                *lock(&self.state) = ConnectionState::Offline;
                return Err(Error::transport(format!("handshake with {} failed: {err}", self.url)));
            }
        };
        log::debug!("connected to {}", self.url);

        let (mut ws_writer, mut ws_reader) = stream.split();
        let (writer_tx, mut writer_rx) = mpsc::channel::<String>(WRITER_QUEUE_DEPTH);
        *lock(&self.writer) = Some(writer_tx);
        *lock(&self.state) = ConnectionState::Open;

        tokio::spawn(async move {
            while let Some(frame) = writer_rx.recv().await {
                if let Err(err) = ws_writer.send(Message::text(frame)).await {
                    // The reader side observes the same loss and owns the
                    // offline notification.
                    log::debug!("write failed, stopping writer: {err}");
                    break;
                }
            }
        });

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let reason = loop {
                match ws_reader.next().await {
                    Some(Ok(Message::Text(text))) => sink.frame(text.as_str()),
                    Some(Ok(Message::Close(_))) => break "server closed the connection".to_string(),
                    Some(Ok(Message::Binary(_))) => {
                        log::warn!("dropping unexpected binary frame");
                    }
                    Some(Ok(_)) => {} // ping/pong handled by the stream
                    Some(Err(err)) => break format!("read failed: {err}"),
                    None => break "connection closed".to_string(),
                }
            };
            if transition_offline(&state) {
                log::info!("transport offline: {reason}");
                sink.connection_lost(&reason);
            }
        });

        Ok(())
    }
}

#[async_trait]
impl MessageTransport for WsConnector {
    async fn send_text(&self, frame: String) -> Result<(), Error> {
        if self.state() != ConnectionState::Open {
            return Err(Error::transport("connection is not open"));
        }
        let sender = lock(&self.writer).clone();
        match sender {
            Some(sender) => sender
                .send(frame)
                .await
                .map_err(|_| Error::transport("writer task is gone")),
            None => Err(Error::transport("connection is not open")),
        }
    }

    fn state(&self) -> ConnectionState {
        *lock(&self.state)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
