//! # nectar-proto
//!
//! Wire contract between the Nectar native server and its clients.
//!
//! The server listens on a local WebSocket endpoint and speaks JSON text
//! frames. Two kinds of frames travel inbound:
//!
//! - **Replies** — correlated to an outgoing [`Request`] by [`CallId`]
//! - **Events** — unsolicited pushes carrying an event name and payload
//!
//! ```text
//! outgoing  {"id":"1a","method":"os.getPath","data":{"name":"downloads"}}
//! reply     {"id":"1a","success":true,"data":"/home/user/Downloads"}
//! reply     {"id":"1a","success":false,"error":{"code":"NE_OS_INVKNPT","message":"..."}}
//! event     {"event":"windowClose","data":null}
//! ```
//!
//! Error codes are short server-supplied tokens in `NE_<AREA>_<CODE>` form.
//! Clients surface them unchanged; [`codes`] lists the ones clients are
//! expected to recognize.

pub mod envelope;
pub mod event;

pub use envelope::{decode_incoming, encode_request, CallId, Incoming, ProtoError, Reply, Request, ServerError};
pub use event::EventName;

/// Well-known server error codes. The set is open; unrecognized codes must
/// still round-trip to callers verbatim.
pub mod codes {
    /// Authentication token missing or rejected during the handshake call.
    pub const INVALID_TOKEN: &str = "NE_RT_INVTOKN";
    /// Unknown native method name.
    pub const UNKNOWN_METHOD: &str = "NE_RT_APIPRME";
    /// Unrecognized known-folder name passed to `os.getPath`.
    pub const INVALID_KNOWN_PATH: &str = "NE_OS_INVKNPT";
    /// Storage key failed server-side validation.
    pub const INVALID_STORAGE_KEY: &str = "NE_ST_INVSTKY";
    /// Requested storage key does not exist.
    pub const STORAGE_KEY_MISSING: &str = "NE_ST_NOSTKEX";
    /// Filesystem operation failed (directory creation and friends).
    pub const FS_OPERATION_FAILED: &str = "NE_FS_DIRCRER";
    /// Path does not exist or is not readable.
    pub const FS_NO_ENTRY: &str = "NE_FS_NOPATHE";
    /// Clipboard backend unavailable.
    pub const CLIPBOARD_UNAVAILABLE: &str = "NE_CL_NCLPBCS";
}
