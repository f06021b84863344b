//! Event router.
//!
//! Handlers are registered per event name and invoked in registration
//! order. Dispatch takes a snapshot of the list first, so removing a
//! handler during a pass never affects that pass, and runs the snapshot in
//! a spawned task so a slow or panicking handler cannot stall the inbound
//! stream. A panic in one handler is caught, reported through the log
//! sink, and does not stop the remaining handlers.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value as JsonValue;

/// An event handler. Clone the `Arc` you pass to [`EventRouter::on`] if you
/// intend to remove it later — [`EventRouter::off`] matches by pointer
/// identity.
pub type Handler = Arc<dyn Fn(JsonValue) + Send + Sync>;

#[derive(Default)]
pub struct EventRouter {
    handlers: Mutex<HashMap<String, Vec<Handler>>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the registration list for `event`. The same
    /// handler may be registered more than once; each registration is
    /// invoked separately.
    pub fn on(&self, event: &str, handler: Handler) {
        self.lock_handlers()
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    /// Remove the first registration of `handler` for `event`, matched by
    /// `Arc` pointer identity. A no-op when not registered. Takes effect
    /// for subsequent dispatches only; an in-flight pass keeps its
    /// snapshot.
    pub fn off(&self, event: &str, handler: &Handler) {
        let mut handlers = self.lock_handlers();
        let Some(registered) = handlers.get_mut(event) else {
            return;
        };
        if let Some(position) = registered.iter().position(|h| Arc::ptr_eq(h, handler)) {
            registered.remove(position);
        }
        if registered.is_empty() {
            handlers.remove(event);
        }
    }

    /// Fire `event` to local handlers. Events with no registration are
    /// dropped silently.
    pub fn dispatch(&self, event: &str, data: JsonValue) {
        let snapshot: Vec<Handler> = match self.lock_handlers().get(event) {
            Some(registered) if !registered.is_empty() => registered.clone(),
            _ => return,
        };
        let event = event.to_string();
        tokio::spawn(async move {
            for handler in snapshot {
                let payload = data.clone();
                if let Err(panic) = catch_unwind(AssertUnwindSafe(|| handler(payload))) {
                    let detail = panic
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "opaque panic payload".to_string());
                    log::error!("handler for '{event}' panicked: {detail}");
                }
            }
        });
    }

    #[cfg(test)]
    pub(crate) fn registered_count(&self, event: &str) -> usize {
        self.lock_handlers().get(event).map_or(0, Vec::len)
    }

    fn lock_handlers(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Handler>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn recording_handler(tag: &'static str, tx: mpsc::UnboundedSender<&'static str>) -> Handler {
        Arc::new(move |_| {
            let _ = tx.send(tag);
        })
    }

    #[tokio::test]
    async fn handlers_run_in_registration_order() {
        let router = EventRouter::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        router.on("ready", recording_handler("h1", tx.clone()));
        router.on("ready", recording_handler("h2", tx.clone()));
        router.dispatch("ready", json!({}));

        assert_eq!(rx.recv().await, Some("h1"));
        assert_eq!(rx.recv().await, Some("h2"));
        assert!(rx.try_recv().is_err(), "each handler runs exactly once");
    }

    #[tokio::test]
    async fn dispatch_without_handlers_is_silent() {
        let router = EventRouter::new();
        // Nothing registered; must not spawn or panic.
        router.dispatch("mediaScanFinished", json!({"count": 3}));
        tokio::task::yield_now().await;
    }

    #[tokio::test]
    async fn duplicate_registration_then_one_off_removes_exactly_one() {
        let router = EventRouter::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handler = recording_handler("dup", tx.clone());
        router.on("tick", Arc::clone(&handler));
        router.on("tick", Arc::clone(&handler));
        assert_eq!(router.registered_count("tick"), 2);

        router.off("tick", &handler);
        assert_eq!(router.registered_count("tick"), 1);

        router.dispatch("tick", json!(null));
        assert_eq!(rx.recv().await, Some("dup"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn off_for_unregistered_handler_is_a_no_op() {
        let router = EventRouter::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let never_registered = recording_handler("ghost", tx);
        router.off("tick", &never_registered);
        assert_eq!(router.registered_count("tick"), 0);
    }

    #[tokio::test]
    async fn removal_mid_dispatch_does_not_affect_the_in_flight_pass() {
        let router = Arc::new(EventRouter::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let second = recording_handler("second", tx.clone());
        let first: Handler = {
            let router = Arc::clone(&router);
            let second = Arc::clone(&second);
            let tx = tx.clone();
            Arc::new(move |_| {
                router.off("reload", &second);
                let _ = tx.send("first");
            })
        };

        router.on("reload", first);
        router.on("reload", Arc::clone(&second));

        router.dispatch("reload", json!({}));
        assert_eq!(rx.recv().await, Some("first"));
        assert_eq!(rx.recv().await, Some("second"), "snapshot keeps the removed handler");

        router.dispatch("reload", json!({}));
        assert_eq!(rx.recv().await, Some("first"));
        assert!(rx.try_recv().is_err(), "removal holds for the next pass");
    }

    #[tokio::test]
    async fn panicking_handler_does_not_stop_the_rest() {
        let router = EventRouter::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        router.on("unstable", Arc::new(|_| panic!("boom")));
        router.on("unstable", recording_handler("survivor", tx.clone()));

        router.dispatch("unstable", json!({}));
        assert_eq!(rx.recv().await, Some("survivor"));
    }

    #[tokio::test]
    async fn handlers_receive_the_dispatched_payload() {
        let router = EventRouter::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        router.on(
            "windowClose",
            Arc::new(move |data| {
                let _ = tx.send(data);
            }),
        );
        router.dispatch("windowClose", json!({"confirmed": true}));
        assert_eq!(rx.recv().await, Some(json!({"confirmed": true})));
    }
}
