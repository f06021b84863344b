//! `computer` namespace: host hardware and kernel facts.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::client::ClientInner;
use crate::error::Error;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    /// Physical memory in bytes.
    pub total: u64,
    pub available: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KernelInfo {
    pub variant: String,
    pub version: String,
}

pub struct Computer {
    inner: Arc<ClientInner>,
}

impl Computer {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub async fn get_memory_info(&self) -> Result<MemoryInfo, Error> {
        let reply = self
            .inner
            .correlator
            .call("computer.getMemoryInfo", JsonValue::Null)
            .await?;
        super::typed_reply("computer.getMemoryInfo", reply)
    }

    pub async fn get_arch(&self) -> Result<String, Error> {
        let reply = self.inner.correlator.call("computer.getArch", JsonValue::Null).await?;
        super::typed_reply("computer.getArch", reply)
    }

    pub async fn get_kernel_info(&self) -> Result<KernelInfo, Error> {
        let reply = self
            .inner
            .correlator
            .call("computer.getKernelInfo", JsonValue::Null)
            .await?;
        super::typed_reply("computer.getKernelInfo", reply)
    }
}
