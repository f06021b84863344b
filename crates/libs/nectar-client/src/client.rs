//! Client handle and initialization entry point.
//!
//! [`Client::connect`] is the one call that must run before anything else:
//! it brings up the transport, wires the inbound demux (replies to the
//! correlator, events to the router), fetches the runtime snapshot, and
//! registers the reserved housekeeping handlers. Everything after that
//! happens through the namespace facades hanging off [`Client`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value as JsonValue};

use nectar_proto::{decode_incoming, EventName, Incoming};

use crate::correlator::Correlator;
use crate::error::Error;
use crate::facades::{App, Clipboard, Computer, Debug, Events, Filesystem, Os, Storage, Window};
use crate::router::EventRouter;
use crate::runtime::RuntimeSnapshot;
use crate::transport::{ConnectionState, InboundSink, MessageTransport, WsConnector};

// ── Options ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ClientOptions {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:45167`.
    pub url: String,
    /// Connect token issued by the server at startup, appended to the
    /// handshake URL when present.
    pub auth_token: Option<String>,
    /// Optional per-call deadline. `None` (the default) waits
    /// indefinitely, matching the reference behavior.
    pub call_timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), auth_token: None, call_timeout: None }
    }

    #[must_use]
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    fn endpoint_url(&self) -> String {
        match &self.auth_token {
            Some(token) => format!("{}?connectToken={token}", self.url),
            None => self.url.clone(),
        }
    }
}

// ── Demux ─────────────────────────────────────────────────────────────────────

/// Routes each inbound frame to exactly one consumer. Malformed frames are
/// a protocol error: logged, dropped, never raised to any caller.
pub(crate) struct Demux {
    correlator: Arc<Correlator>,
    router: Arc<EventRouter>,
}

impl InboundSink for Demux {
    fn frame(&self, text: &str) {
        match decode_incoming(text) {
            Ok(Incoming::Reply(reply)) => self.correlator.complete(reply),
            Ok(Incoming::Event { event, data }) => self.router.dispatch(&event, data),
            Err(err) => log::warn!("dropping malformed frame: {err}"),
        }
    }

    fn connection_lost(&self, reason: &str) {
        self.correlator.fail_all(reason);
        self.router.dispatch(EventName::Offline.as_str(), JsonValue::Null);
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

pub(crate) struct ClientInner {
    pub(crate) connector: Arc<WsConnector>,
    pub(crate) correlator: Arc<Correlator>,
    pub(crate) router: Arc<EventRouter>,
    pub(crate) runtime: Arc<RuntimeSnapshot>,
    demux: Arc<Demux>,
}

/// Handle to one conversation with a Nectar server. Cheap to clone.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Initialize: connect, wire the demux, fetch the runtime snapshot,
    /// register housekeeping, dispatch `ready` locally.
    pub async fn connect(options: ClientOptions) -> Result<Self, Error> {
        let connector = Arc::new(WsConnector::new(options.endpoint_url()));
        let router = Arc::new(EventRouter::new());
        let correlator = Arc::new(Correlator::new(
            Arc::clone(&connector) as Arc<dyn MessageTransport>,
            options.call_timeout,
        ));
        let demux = Arc::new(Demux {
            correlator: Arc::clone(&correlator),
            router: Arc::clone(&router),
        });

        connector.connect(Arc::clone(&demux) as Arc<dyn InboundSink>).await?;

        let raw = correlator.call("app.getRuntimeInfo", JsonValue::Null).await?;
        let runtime: RuntimeSnapshot = serde_json::from_value(raw)
            .map_err(|err| Error::protocol(format!("malformed runtime info: {err}")))?;

        router.on(
            EventName::ServerRestart.as_str(),
            Arc::new(|_| log::info!("server restart announced, expect the connection to drop")),
        );

        let client = Self {
            inner: Arc::new(ClientInner { connector, correlator, router, runtime: Arc::new(runtime), demux }),
        };
        client.inner.router.dispatch(EventName::Ready.as_str(), json!({}));
        Ok(client)
    }

    /// Re-establish the transport after an `offline` transition. The
    /// client never does this on its own; re-issuing failed calls is also
    /// the caller's decision.
    pub async fn reconnect(&self) -> Result<(), Error> {
        self.inner
            .connector
            .connect(Arc::clone(&self.inner.demux) as Arc<dyn InboundSink>)
            .await
    }

    /// Issue a correlated call by raw method name. The typed facades cover
    /// the stable surface; this is the escape hatch for methods they don't,
    /// and what the probe CLI drives.
    pub async fn call(&self, method: &str, data: JsonValue) -> Result<JsonValue, Error> {
        self.inner.correlator.call(method, data).await
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.connector.state()
    }

    /// Process-global facts frozen at initialization.
    #[must_use]
    pub fn runtime(&self) -> &RuntimeSnapshot {
        &self.inner.runtime
    }

    // ── Namespace facades ─────────────────────────────────────────────────

    #[must_use]
    pub fn app(&self) -> App {
        App::new(Arc::clone(&self.inner))
    }

    #[must_use]
    pub fn os(&self) -> Os {
        Os::new(Arc::clone(&self.inner))
    }

    #[must_use]
    pub fn filesystem(&self) -> Filesystem {
        Filesystem::new(Arc::clone(&self.inner))
    }

    #[must_use]
    pub fn window(&self) -> Window {
        Window::new(Arc::clone(&self.inner))
    }

    #[must_use]
    pub fn clipboard(&self) -> Clipboard {
        Clipboard::new(Arc::clone(&self.inner))
    }

    #[must_use]
    pub fn computer(&self) -> Computer {
        Computer::new(Arc::clone(&self.inner))
    }

    #[must_use]
    pub fn storage(&self) -> Storage {
        Storage::new(Arc::clone(&self.inner))
    }

    #[must_use]
    pub fn debug(&self) -> Debug {
        Debug::new(Arc::clone(&self.inner))
    }

    #[must_use]
    pub fn events(&self) -> Events {
        Events::new(Arc::clone(&self.inner))
    }
}

/// Wires a full `ClientInner` over an arbitrary transport so facade tests
/// can assert on captured frames without a server.
#[cfg(test)]
pub(crate) fn test_client_inner(transport: Arc<dyn MessageTransport>) -> Arc<ClientInner> {
    let connector = Arc::new(WsConnector::new("ws://127.0.0.1:0/unused"));
    let router = Arc::new(EventRouter::new());
    let correlator = Arc::new(Correlator::new(transport, None));
    let demux = Arc::new(Demux {
        correlator: Arc::clone(&correlator),
        router: Arc::clone(&router),
    });
    Arc::new(ClientInner {
        connector,
        correlator,
        router,
        runtime: Arc::new(RuntimeSnapshot::default()),
        demux,
    })
}
