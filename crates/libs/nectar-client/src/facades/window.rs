//! `window` namespace.

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use crate::client::ClientInner;
use crate::error::Error;

pub struct Window {
    inner: Arc<ClientInner>,
}

impl Window {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub async fn set_title(&self, title: &str) -> Result<(), Error> {
        self.inner
            .correlator
            .call("window.setTitle", json!({ "title": title }))
            .await
            .map(|_| ())
    }

    pub async fn get_title(&self) -> Result<String, Error> {
        let reply = self.inner.correlator.call("window.getTitle", JsonValue::Null).await?;
        super::typed_reply("window.getTitle", reply)
    }

    pub async fn show(&self) -> Result<(), Error> {
        self.unit_call("window.show").await
    }

    pub async fn hide(&self) -> Result<(), Error> {
        self.unit_call("window.hide").await
    }

    pub async fn minimize(&self) -> Result<(), Error> {
        self.unit_call("window.minimize").await
    }

    pub async fn maximize(&self) -> Result<(), Error> {
        self.unit_call("window.maximize").await
    }

    pub async fn unmaximize(&self) -> Result<(), Error> {
        self.unit_call("window.unmaximize").await
    }

    pub async fn is_visible(&self) -> Result<bool, Error> {
        let reply = self.inner.correlator.call("window.isVisible", JsonValue::Null).await?;
        super::typed_reply("window.isVisible", reply)
    }

    pub async fn center(&self) -> Result<(), Error> {
        self.unit_call("window.center").await
    }

    pub async fn move_to(&self, x: i32, y: i32) -> Result<(), Error> {
        self.inner
            .correlator
            .call("window.move", json!({ "x": x, "y": y }))
            .await
            .map(|_| ())
    }

    /// Resize the window. Zero dimensions are rejected client-side.
    pub async fn set_size(&self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_argument("window dimensions must be non-zero"));
        }
        self.inner
            .correlator
            .call("window.setSize", json!({ "width": width, "height": height }))
            .await
            .map(|_| ())
    }

    async fn unit_call(&self, method: &str) -> Result<(), Error> {
        self.inner.correlator.call(method, JsonValue::Null).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_client_inner;
    use crate::testing::CaptureTransport;

    #[tokio::test]
    async fn zero_size_is_rejected_before_sending() {
        let transport = CaptureTransport::open();
        let window = Window::new(test_client_inner(transport.clone()));

        let err = window.set_size(0, 600).await.expect_err("zero width");
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn is_visible_decodes_a_bool() {
        let transport = CaptureTransport::open();
        let inner = test_client_inner(transport.clone());

        let pending = tokio::spawn({
            let window = Window::new(Arc::clone(&inner));
            async move { window.is_visible().await }
        });
        while transport.sent().is_empty() {
            tokio::task::yield_now().await;
        }

        inner.correlator.complete(nectar_proto::Reply {
            id: transport.sent_ids().remove(0),
            result: Ok(json!(true)),
        });
        assert!(pending.await.expect("join").expect("call"));
    }
}
