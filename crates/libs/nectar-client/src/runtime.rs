//! Runtime snapshot.
//!
//! The server owns a set of process-global facts (OS family, application
//! id, listening port, working directory, ...). The client fetches them
//! once during [`crate::Client::connect`] and freezes them into a
//! [`RuntimeSnapshot`] shared by `Arc` — never mutable globals.

use serde::{Deserialize, Serialize};

// ── Closed sets ───────────────────────────────────────────────────────────────

/// Host operating-system family as reported by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OsFamily {
    Linux,
    Windows,
    Darwin,
    #[serde(rename = "freeBSD")]
    FreeBsd,
    /// Server reported a family this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

/// How the application shell is being presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunMode {
    #[default]
    Window,
    Browser,
    Cloud,
    Chrome,
}

/// Where application resources are served from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceMode {
    /// Packed into the application bundle.
    #[default]
    Bundle,
    /// Served from a directory on disk (development).
    Directory,
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Immutable facts about the running application, populated once at
/// initialization from the server's `app.getRuntimeInfo` reply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct RuntimeSnapshot {
    pub os: OsFamily,
    pub app_id: String,
    pub version: String,
    pub port: u16,
    pub mode: RunMode,
    pub server_version: String,
    pub client_version: String,
    pub cwd: String,
    pub resource_path: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub pid: u32,
    pub resource_mode: ResourceMode,
    #[serde(default)]
    pub extensions_enabled: bool,
    /// Server build commit hash.
    #[serde(default)]
    pub commit: String,
    /// Client library build commit hash.
    #[serde(default)]
    pub client_commit: String,
}
