//! Client error taxonomy.
//!
//! Four kinds reach callers: client-side validation failures (raised before
//! any frame is sent), server-reported operation errors (verbatim
//! `NE_<AREA>_<CODE>` token plus message), transport failures, and — only
//! when a timeout policy is configured — call timeouts. Malformed inbound
//! frames and unknown correlation ids are logged and dropped by the demux;
//! they never surface here.

use nectar_proto::ServerError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Argument rejected client-side; no message was sent.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Operation failure reported by the server. `code` is surfaced
    /// unchanged.
    #[error("{code}: {message}")]
    Server { code: String, message: String },

    /// The connector could not send, or the connection was lost while the
    /// call was pending.
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The configured call deadline elapsed. The operation may still
    /// complete server-side; only local delivery stops.
    #[error("call timed out: {method}")]
    Timeout { method: String },

    /// A successful reply whose payload does not match the declared shape
    /// of the method that was called. Whole-frame parse failures never get
    /// this far; the demux drops those.
    #[error("protocol violation: {message}")]
    Protocol { message: String },
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol { message: message.into() }
    }

    /// The server error code, when this is a server-reported failure.
    #[must_use]
    pub fn server_code(&self) -> Option<&str> {
        match self {
            Self::Server { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Returns `true` for failures that may succeed if the caller
    /// re-issues the call after reconnecting. Retry itself is caller
    /// policy; this layer never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

impl From<ServerError> for Error {
    fn from(error: ServerError) -> Self {
        Self::Server { code: error.code, message: error.message }
    }
}
