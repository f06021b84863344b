//! `debug` namespace: write into the server-side application log.

use std::sync::Arc;

use serde_json::json;

use crate::client::ClientInner;
use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Warning,
    Error,
}

impl LogKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

pub struct Debug {
    inner: Arc<ClientInner>,
}

impl Debug {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub async fn log(&self, kind: LogKind, message: &str) -> Result<(), Error> {
        super::require_non_empty(message, "log message")?;
        self.inner
            .correlator
            .call("debug.log", json!({ "type": kind.as_str(), "message": message }))
            .await
            .map(|_| ())
    }
}
