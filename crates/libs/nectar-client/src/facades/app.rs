//! `app` namespace: process lifecycle and cross-client broadcast.

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use crate::client::ClientInner;
use crate::error::Error;

pub struct App {
    inner: Arc<ClientInner>,
}

impl App {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Ask the server to terminate the application with `code`.
    pub async fn exit(&self, code: i32) -> Result<(), Error> {
        self.inner
            .correlator
            .call("app.exit", json!({ "code": code }))
            .await
            .map(|_| ())
    }

    /// Relaunch the application process with its original arguments.
    pub async fn restart_process(&self) -> Result<(), Error> {
        self.inner
            .correlator
            .call("app.restartProcess", JsonValue::Null)
            .await
            .map(|_| ())
    }

    /// The server-side application configuration as raw JSON.
    pub async fn get_config(&self) -> Result<JsonValue, Error> {
        self.inner.correlator.call("app.getConfig", JsonValue::Null).await
    }

    /// Redistribute `event` to every connected client, this one included.
    pub async fn broadcast(&self, event: &str, data: JsonValue) -> Result<(), Error> {
        super::events::broadcast(&self.inner, event, data).await
    }
}
