//! `events` namespace: handler registry access and cross-client broadcast.

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use nectar_proto::EventName;

use crate::client::ClientInner;
use crate::error::Error;
use crate::router::Handler;

pub struct Events {
    inner: Arc<ClientInner>,
}

impl Events {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Register `handler` for `event`. Registration order is invocation
    /// order.
    pub fn on(&self, event: &str, handler: Handler) {
        self.inner.router.on(event, handler);
    }

    /// Remove one registration of `handler`, matched by `Arc` identity.
    pub fn off(&self, event: &str, handler: &Handler) {
        self.inner.router.off(event, handler);
    }

    /// Fire `event` to handlers in this client only.
    pub fn dispatch(&self, event: &str, data: JsonValue) {
        self.inner.router.dispatch(event, data);
    }

    /// Ask the server to redistribute `event` to all connected clients.
    /// Local handlers run when the server echoes the event back.
    pub async fn broadcast(&self, event: &str, data: JsonValue) -> Result<(), Error> {
        broadcast(&self.inner, event, data).await
    }
}

pub(super) async fn broadcast(
    inner: &Arc<ClientInner>,
    event: &str,
    data: JsonValue,
) -> Result<(), Error> {
    super::require_non_empty(event, "event name")?;
    if EventName::from(event).is_reserved() {
        return Err(Error::invalid_argument(format!(
            "'{event}' is reserved for connection housekeeping"
        )));
    }
    inner
        .correlator
        .call("events.broadcast", json!({ "event": event, "data": data }))
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_client_inner;
    use crate::testing::CaptureTransport;

    #[tokio::test]
    async fn broadcast_refuses_reserved_names_before_sending() {
        let transport = CaptureTransport::open();
        let inner = test_client_inner(transport.clone());

        for reserved in ["ready", "offline"] {
            let err = broadcast(&inner, reserved, json!({}))
                .await
                .expect_err("reserved name");
            assert!(matches!(err, Error::InvalidArgument { .. }));
        }
        assert!(transport.sent().is_empty(), "no frame may leave the client");
    }

    #[tokio::test]
    async fn broadcast_shapes_the_wire_frame() {
        let transport = CaptureTransport::open();
        let inner = test_client_inner(transport.clone());

        let pending = tokio::spawn({
            let inner = Arc::clone(&inner);
            async move { broadcast(&inner, "scoreChanged", json!({"score": 12})).await }
        });
        while transport.sent().is_empty() {
            tokio::task::yield_now().await;
        }

        let frame: JsonValue = serde_json::from_str(&transport.sent()[0]).expect("frame json");
        assert_eq!(frame["method"], "events.broadcast");
        assert_eq!(frame["data"]["event"], "scoreChanged");
        assert_eq!(frame["data"]["data"]["score"], 12);

        inner.correlator.complete(nectar_proto::Reply {
            id: transport.sent_ids().remove(0),
            result: Ok(JsonValue::Null),
        });
        pending.await.expect("join").expect("broadcast");
    }
}
