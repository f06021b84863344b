//! # nectar-client
//!
//! Typed Rust client for the Nectar native runtime. The server owns the
//! OS-facing work — process spawning, windowing, filesystem, clipboard —
//! and exposes it over a local WebSocket endpoint; this crate is the
//! client-side correlation and dispatch machinery plus thin typed facades
//! over each namespace.
//!
//! Layering, inside out:
//!
//! - [`transport`] — one duplex connection, Connecting/Open/Offline state,
//!   loss notification exactly once per transition
//! - [`correlator`] — pending-call table matching replies to calls by id;
//!   rejects everything on transport loss, never retries
//! - [`router`] — ordered per-event handler registry with snapshot
//!   dispatch and per-handler failure isolation
//! - [`facades`] — `app`, `os`, `filesystem`, `window`, `clipboard`,
//!   `computer`, `storage`, `debug`, `events`
//!
//! ## Example
//!
//! ```no_run
//! use nectar_client::{Client, ClientOptions};
//!
//! # async fn run() -> Result<(), nectar_client::Error> {
//! let client = Client::connect(
//!     ClientOptions::new("ws://127.0.0.1:45167").auth_token("token-from-server"),
//! )
//! .await?;
//!
//! println!("running on {:?}", client.runtime().os);
//! let downloads = client.os().get_path(nectar_client::facades::KnownPath::Downloads).await?;
//! client.window().set_title(&format!("saving to {downloads}")).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod correlator;
pub mod error;
pub mod facades;
pub mod router;
pub mod runtime;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{Client, ClientOptions};
pub use error::Error;
pub use router::Handler;
pub use runtime::{OsFamily, ResourceMode, RunMode, RuntimeSnapshot};
pub use transport::ConnectionState;

pub use nectar_proto as proto;
