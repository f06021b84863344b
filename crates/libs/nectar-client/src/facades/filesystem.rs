//! `filesystem` namespace.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::client::ClientInner;
use crate::error::Error;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum EntryKind {
    #[serde(rename = "FILE")]
    File,
    #[serde(rename = "DIRECTORY")]
    Directory,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DirEntry {
    pub entry: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub size: u64,
    pub is_file: bool,
    pub is_directory: bool,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub modified_at: Option<i64>,
}

pub struct Filesystem {
    inner: Arc<ClientInner>,
}

impl Filesystem {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub async fn create_directory(&self, path: &str) -> Result<(), Error> {
        self.unit_call("filesystem.createDirectory", path).await
    }

    /// Remove a file or an empty directory.
    pub async fn remove(&self, path: &str) -> Result<(), Error> {
        self.unit_call("filesystem.remove", path).await
    }

    pub async fn read_file(&self, path: &str) -> Result<String, Error> {
        super::require_non_empty(path, "path")?;
        let reply = self
            .inner
            .correlator
            .call("filesystem.readFile", json!({ "path": path }))
            .await?;
        super::typed_reply("filesystem.readFile", reply)
    }

    pub async fn write_file(&self, path: &str, data: &str) -> Result<(), Error> {
        super::require_non_empty(path, "path")?;
        self.inner
            .correlator
            .call("filesystem.writeFile", json!({ "path": path, "data": data }))
            .await
            .map(|_| ())
    }

    pub async fn read_directory(&self, path: &str) -> Result<Vec<DirEntry>, Error> {
        super::require_non_empty(path, "path")?;
        let reply = self
            .inner
            .correlator
            .call("filesystem.readDirectory", json!({ "path": path }))
            .await?;
        super::typed_reply("filesystem.readDirectory", reply)
    }

    pub async fn get_stats(&self, path: &str) -> Result<Stats, Error> {
        super::require_non_empty(path, "path")?;
        let reply = self
            .inner
            .correlator
            .call("filesystem.getStats", json!({ "path": path }))
            .await?;
        super::typed_reply("filesystem.getStats", reply)
    }

    pub async fn copy(&self, source: &str, destination: &str) -> Result<(), Error> {
        self.two_path_call("filesystem.copy", source, destination).await
    }

    pub async fn move_entry(&self, source: &str, destination: &str) -> Result<(), Error> {
        self.two_path_call("filesystem.move", source, destination).await
    }

    async fn unit_call(&self, method: &str, path: &str) -> Result<(), Error> {
        super::require_non_empty(path, "path")?;
        self.inner
            .correlator
            .call(method, json!({ "path": path }))
            .await
            .map(|_| ())
    }

    async fn two_path_call(&self, method: &str, source: &str, destination: &str) -> Result<(), Error> {
        super::require_non_empty(source, "source path")?;
        super::require_non_empty(destination, "destination path")?;
        self.inner
            .correlator
            .call(method, json!({ "source": source, "destination": destination }))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_client_inner;
    use crate::testing::CaptureTransport;
    use serde_json::Value as JsonValue;

    #[tokio::test]
    async fn empty_paths_never_reach_the_wire() {
        let transport = CaptureTransport::open();
        let fs = Filesystem::new(test_client_inner(transport.clone()));

        assert!(fs.create_directory("").await.is_err());
        assert!(fs.read_file(" ").await.is_err());
        assert!(fs.copy("a.txt", "").await.is_err());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn read_directory_decodes_typed_entries() {
        let transport = CaptureTransport::open();
        let inner = test_client_inner(transport.clone());

        let pending = tokio::spawn({
            let fs = Filesystem::new(Arc::clone(&inner));
            async move { fs.read_directory("/opt/demo").await }
        });
        while transport.sent().is_empty() {
            tokio::task::yield_now().await;
        }

        inner.correlator.complete(nectar_proto::Reply {
            id: transport.sent_ids().remove(0),
            result: Ok(json!([
                {"entry": "res", "type": "DIRECTORY"},
                {"entry": "app.log", "type": "FILE"}
            ])),
        });
        let entries = pending.await.expect("join").expect("call");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[1].entry, "app.log");
    }

    #[tokio::test]
    async fn server_failure_code_passes_through_untouched() {
        let transport = CaptureTransport::open();
        let inner = test_client_inner(transport.clone());

        let pending = tokio::spawn({
            let fs = Filesystem::new(Arc::clone(&inner));
            async move { fs.get_stats("/missing").await }
        });
        while transport.sent().is_empty() {
            tokio::task::yield_now().await;
        }

        inner.correlator.complete(nectar_proto::Reply {
            id: transport.sent_ids().remove(0),
            result: Err(nectar_proto::ServerError {
                code: nectar_proto::codes::FS_NO_ENTRY.to_string(),
                message: "no such path".to_string(),
            }),
        });
        let err = pending.await.expect("join").expect_err("missing path");
        assert_eq!(err.server_code(), Some("NE_FS_NOPATHE"));
    }

    #[tokio::test]
    async fn move_uses_source_destination_payload() {
        let transport = CaptureTransport::open();
        let inner = test_client_inner(transport.clone());

        let pending = tokio::spawn({
            let fs = Filesystem::new(Arc::clone(&inner));
            async move { fs.move_entry("a.txt", "b.txt").await }
        });
        while transport.sent().is_empty() {
            tokio::task::yield_now().await;
        }

        let frame: JsonValue = serde_json::from_str(&transport.sent()[0]).expect("frame json");
        assert_eq!(frame["method"], "filesystem.move");
        assert_eq!(frame["data"]["source"], "a.txt");
        assert_eq!(frame["data"]["destination"], "b.txt");

        inner.correlator.complete(nectar_proto::Reply {
            id: transport.sent_ids().remove(0),
            result: Ok(JsonValue::Null),
        });
        pending.await.expect("join").expect("call");
    }
}
