//! `os` namespace: command execution, environment, known folders,
//! notifications.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::client::ClientInner;
use crate::error::Error;

/// Known-folder names accepted by `os.getPath`. Closed set; anything else
/// is rejected client-side before a frame is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnownPath {
    Config,
    Data,
    Cache,
    Documents,
    Pictures,
    Music,
    Video,
    Downloads,
    Temp,
}

impl KnownPath {
    const ALL: [KnownPath; 9] = [
        Self::Config,
        Self::Data,
        Self::Cache,
        Self::Documents,
        Self::Pictures,
        Self::Music,
        Self::Video,
        Self::Downloads,
        Self::Temp,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Data => "data",
            Self::Cache => "cache",
            Self::Documents => "documents",
            Self::Pictures => "pictures",
            Self::Music => "music",
            Self::Video => "video",
            Self::Downloads => "downloads",
            Self::Temp => "temp",
        }
    }
}

impl TryFrom<&str> for KnownPath {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|path| path.as_str() == name)
            .ok_or_else(|| Error::invalid_argument(format!("'{name}' is not a known folder name")))
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecOptions {
    /// Detach and return immediately with the child pid.
    pub background: bool,
    /// Text piped to the child's stdin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_in: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecResult {
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default)]
    pub std_out: String,
    #[serde(default)]
    pub std_err: String,
    #[serde(default)]
    pub exit_code: i32,
}

pub struct Os {
    inner: Arc<ClientInner>,
}

impl Os {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub async fn exec_command(
        &self,
        command: &str,
        options: ExecOptions,
    ) -> Result<ExecResult, Error> {
        super::require_non_empty(command, "command")?;
        let mut data = json!({ "command": command });
        if let (JsonValue::Object(target), JsonValue::Object(extra)) =
            (&mut data, serde_json::to_value(&options).unwrap_or_default())
        {
            target.extend(extra);
        }
        let reply = self.inner.correlator.call("os.execCommand", data).await?;
        super::typed_reply("os.execCommand", reply)
    }

    pub async fn get_env(&self, key: &str) -> Result<String, Error> {
        super::require_non_empty(key, "environment variable name")?;
        let reply = self.inner.correlator.call("os.getEnv", json!({ "key": key })).await?;
        super::typed_reply("os.getEnv", reply)
    }

    /// Resolve one of the fixed known folders to an absolute path.
    pub async fn get_path(&self, path: KnownPath) -> Result<String, Error> {
        let reply = self
            .inner
            .correlator
            .call("os.getPath", json!({ "name": path.as_str() }))
            .await?;
        super::typed_reply("os.getPath", reply)
    }

    /// Stringly-named variant of [`Os::get_path`] for callers holding
    /// user input; validates against the closed set first.
    pub async fn get_path_named(&self, name: &str) -> Result<String, Error> {
        self.get_path(KnownPath::try_from(name)?).await
    }

    pub async fn show_notification(&self, title: &str, content: &str) -> Result<(), Error> {
        super::require_non_empty(title, "notification title")?;
        self.inner
            .correlator
            .call("os.showNotification", json!({ "title": title, "content": content }))
            .await
            .map(|_| ())
    }
}
