//! Request correlator.
//!
//! Every outgoing call gets a fresh id from a process-scoped monotonic
//! counter and a pending entry holding the caller's oneshot sender. The
//! demux completes entries as replies arrive; delivery order does not have
//! to match issue order. A transport-loss sweep rejects everything pending
//! so no caller hangs. This layer never retries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value as JsonValue;
use tokio::sync::oneshot;

use nectar_proto::{encode_request, CallId, Reply, Request};

use crate::error::Error;
use crate::transport::MessageTransport;

type PendingSender = oneshot::Sender<Result<JsonValue, Error>>;

pub struct Correlator {
    transport: Arc<dyn MessageTransport>,
    next_id: AtomicU64,
    pending: Mutex<HashMap<CallId, PendingSender>>,
    /// Optional per-call deadline. `None` matches the reference behavior:
    /// calls wait for their reply or the loss sweep, nothing else.
    call_timeout: Option<Duration>,
}

impl Correlator {
    pub fn new(transport: Arc<dyn MessageTransport>, call_timeout: Option<Duration>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            call_timeout,
        }
    }

    /// Issue one call and suspend until its reply, the loss sweep, or the
    /// configured deadline. Resolves exactly once.
    pub async fn call(&self, method: &str, data: JsonValue) -> Result<JsonValue, Error> {
        let id = self.fresh_id();
        let (tx, rx) = oneshot::channel();
        self.lock_pending().insert(id.clone(), tx);

        let frame = encode_request(&Request::new(id.clone(), method, data));
        if let Err(err) = self.transport.send_text(frame).await {
            self.lock_pending().remove(&id);
            return Err(err);
        }

        match self.call_timeout {
            None => await_reply(rx).await,
            Some(deadline) => match tokio::time::timeout(deadline, rx).await {
                Ok(completed) => await_completed(completed),
                Err(_) => {
                    // Expired: drop local interest. No cancel goes on the
                    // wire; the server finishes the operation regardless.
                    self.lock_pending().remove(&id);
                    Err(Error::Timeout { method: method.to_string() })
                }
            },
        }
    }

    /// Route one decoded reply to its pending call. Unknown ids are late,
    /// duplicate, or stale-after-sweep replies: logged and dropped.
    pub fn complete(&self, reply: Reply) {
        let Some(sender) = self.lock_pending().remove(&reply.id) else {
            log::debug!("dropping reply for unknown call id {}", reply.id);
            return;
        };
        let outcome = reply.result.map_err(Error::from);
        // A receiver dropped mid-flight means the caller abandoned the
        // call; nothing to deliver.
        let _ = sender.send(outcome);
    }

    /// Transport-loss sweep: reject every pending call with a transport
    /// error carrying `reason`.
    pub fn fail_all(&self, reason: &str) {
        let drained: Vec<(CallId, PendingSender)> = self.lock_pending().drain().collect();
        if drained.is_empty() {
            return;
        }
        log::warn!("rejecting {} pending call(s): {reason}", drained.len());
        for (_, sender) in drained {
            let _ = sender.send(Err(Error::transport(reason)));
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_count(&self) -> usize {
        self.lock_pending().len()
    }

    fn fresh_id(&self) -> CallId {
        CallId::new(format!("{:x}", self.next_id.fetch_add(1, Ordering::Relaxed)))
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, HashMap<CallId, PendingSender>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn await_reply(rx: oneshot::Receiver<Result<JsonValue, Error>>) -> Result<JsonValue, Error> {
    await_completed(rx.await)
}

fn await_completed(
    completed: Result<Result<JsonValue, Error>, oneshot::error::RecvError>,
) -> Result<JsonValue, Error> {
    completed.unwrap_or_else(|_| Err(Error::transport("correlator dropped the pending call")))
}
