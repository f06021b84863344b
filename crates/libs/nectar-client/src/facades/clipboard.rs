//! `clipboard` namespace.

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use crate::client::ClientInner;
use crate::error::Error;

pub struct Clipboard {
    inner: Arc<ClientInner>,
}

impl Clipboard {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub async fn read_text(&self) -> Result<String, Error> {
        let reply = self.inner.correlator.call("clipboard.readText", JsonValue::Null).await?;
        super::typed_reply("clipboard.readText", reply)
    }

    pub async fn write_text(&self, text: &str) -> Result<(), Error> {
        self.inner
            .correlator
            .call("clipboard.writeText", json!({ "data": text }))
            .await
            .map(|_| ())
    }
}
