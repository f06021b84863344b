//! Namespace facades.
//!
//! Thin typed wrappers over the correlator and router — argument shaping
//! and client-side validation only, no state of their own. Validation
//! failures raise [`Error::InvalidArgument`] before any frame is sent; the
//! server validates again and answers with its own `NE_*` code.

mod app;
mod clipboard;
mod computer;
mod debug;
mod events;
mod filesystem;
mod os;
mod storage;
mod window;

pub use app::App;
pub use clipboard::Clipboard;
pub use computer::{Computer, KernelInfo, MemoryInfo};
pub use debug::{Debug, LogKind};
pub use events::Events;
pub use filesystem::{DirEntry, EntryKind, Filesystem, Stats};
pub use os::{ExecOptions, ExecResult, KnownPath, Os};
pub use storage::Storage;
pub use window::Window;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::Error;

fn require_non_empty(value: &str, what: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Decode a success payload into the method's declared shape.
fn typed_reply<T: DeserializeOwned>(method: &str, value: JsonValue) -> Result<T, Error> {
    serde_json::from_value(value)
        .map_err(|err| Error::protocol(format!("{method} reply payload: {err}")))
}
