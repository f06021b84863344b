//! In-memory transport double for unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nectar_proto::CallId;

use crate::error::Error;
use crate::transport::{ConnectionState, MessageTransport};

/// Captures outgoing frames; never delivers anything on its own. Tests
/// feed replies back through the correlator directly.
pub(crate) struct CaptureTransport {
    frames: Mutex<Vec<String>>,
    open: AtomicBool,
}

impl CaptureTransport {
    pub(crate) fn open() -> Arc<Self> {
        Arc::new(Self { frames: Mutex::new(Vec::new()), open: AtomicBool::new(true) })
    }

    pub(crate) fn closed() -> Arc<Self> {
        Arc::new(Self { frames: Mutex::new(Vec::new()), open: AtomicBool::new(false) })
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.frames.lock().expect("frames lock").clone()
    }

    pub(crate) fn sent_ids(&self) -> Vec<CallId> {
        self.sent()
            .iter()
            .map(|frame| {
                let value: serde_json::Value = serde_json::from_str(frame).expect("frame json");
                CallId::new(value["id"].as_str().expect("id field"))
            })
            .collect()
    }
}

#[async_trait]
impl MessageTransport for CaptureTransport {
    async fn send_text(&self, frame: String) -> Result<(), Error> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(Error::transport("connection is not open"));
        }
        self.frames.lock().expect("frames lock").push(frame);
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        if self.open.load(Ordering::SeqCst) {
            ConnectionState::Open
        } else {
            ConnectionState::Offline
        }
    }
}
