//! `storage` namespace: server-side key/value store.

use std::sync::Arc;

use serde_json::json;

use crate::client::ClientInner;
use crate::error::Error;

/// Keys are limited to `[A-Za-z0-9_-]`, 1..=50 characters. The server
/// enforces the same rule and answers `NE_ST_INVSTKY` when bypassed.
const MAX_KEY_LEN: usize = 50;

fn validate_key(key: &str) -> Result<(), Error> {
    let valid_len = (1..=MAX_KEY_LEN).contains(&key.len());
    let valid_chars = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_len || !valid_chars {
        return Err(Error::invalid_argument(format!(
            "storage key '{key}' must be 1..={MAX_KEY_LEN} characters from [A-Za-z0-9_-]"
        )));
    }
    Ok(())
}

pub struct Storage {
    inner: Arc<ClientInner>,
}

impl Storage {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub async fn set_data(&self, key: &str, value: &str) -> Result<(), Error> {
        validate_key(key)?;
        self.inner
            .correlator
            .call("storage.setData", json!({ "key": key, "data": value }))
            .await
            .map(|_| ())
    }

    /// Delete `key`. Matches the reference behavior of writing a null
    /// value.
    pub async fn remove_data(&self, key: &str) -> Result<(), Error> {
        validate_key(key)?;
        self.inner
            .correlator
            .call("storage.setData", json!({ "key": key, "data": null }))
            .await
            .map(|_| ())
    }

    pub async fn get_data(&self, key: &str) -> Result<String, Error> {
        validate_key(key)?;
        let reply = self
            .inner
            .correlator
            .call("storage.getData", json!({ "key": key }))
            .await?;
        super::typed_reply("storage.getData", reply)
    }

    pub async fn get_keys(&self) -> Result<Vec<String>, Error> {
        let reply = self
            .inner
            .correlator
            .call("storage.getKeys", serde_json::Value::Null)
            .await?;
        super::typed_reply("storage.getKeys", reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_client_inner;
    use crate::testing::CaptureTransport;

    #[tokio::test]
    async fn invalid_keys_fail_fast_without_sending() {
        let transport = CaptureTransport::open();
        let storage = Storage::new(test_client_inner(transport.clone()));

        for bad in ["", "has space", "dots.are.bad", &"x".repeat(51)] {
            let err = storage.get_data(bad).await.expect_err("invalid key");
            assert!(matches!(err, Error::InvalidArgument { .. }), "key {bad:?}");
        }
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn boundary_keys_are_accepted() {
        assert!(validate_key("a").is_ok());
        assert!(validate_key(&"x".repeat(50)).is_ok());
        assert!(validate_key("snake_case-key9").is_ok());
    }

    #[tokio::test]
    async fn remove_sends_a_null_value() {
        let transport = CaptureTransport::open();
        let inner = test_client_inner(transport.clone());

        let pending = tokio::spawn({
            let storage = Storage::new(Arc::clone(&inner));
            async move { storage.remove_data("session").await }
        });
        while transport.sent().is_empty() {
            tokio::task::yield_now().await;
        }

        let frame: serde_json::Value =
            serde_json::from_str(&transport.sent()[0]).expect("frame json");
        assert_eq!(frame["method"], "storage.setData");
        assert!(frame["data"]["data"].is_null());

        inner.correlator.complete(nectar_proto::Reply {
            id: transport.sent_ids().remove(0),
            result: Ok(serde_json::Value::Null),
        });
        pending.await.expect("join").expect("call");
    }
}
