//! Message envelopes and the JSON text-frame codec.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ── Identifiers ───────────────────────────────────────────────────────────────

/// Opaque identifier correlating a reply to its originating request.
///
/// Produced by the client, echoed back by the server. The client guarantees
/// an id is never reused while a call bearing it is still outstanding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Outgoing ──────────────────────────────────────────────────────────────────

/// An outgoing call frame. Immutable once sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: CallId,
    /// Dotted `namespace.method` name, e.g. `"window.setTitle"`.
    pub method: String,
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub data: JsonValue,
}

impl Request {
    pub fn new(id: CallId, method: impl Into<String>, data: JsonValue) -> Self {
        Self { id, method: method.into(), data }
    }
}

// ── Incoming ──────────────────────────────────────────────────────────────────

/// Server-reported operation failure carried inside a reply frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    /// Fixed short token in `NE_<AREA>_<CODE>` form. Surfaced verbatim.
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A correlated reply: success payload or server error, never both.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub id: CallId,
    pub result: Result<JsonValue, ServerError>,
}

/// A decoded inbound frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Incoming {
    Reply(Reply),
    Event { event: String, data: JsonValue },
}

// ── Codec ─────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    #[error("frame is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("frame carries neither a call id nor an event name")]
    UnknownShape,

    #[error("reply {id} reports failure without an error payload")]
    MissingError { id: CallId },
}

/// Raw inbound shape before classification. `id` wins over `event` when a
/// frame carries both, matching server behavior for echoed broadcasts.
#[derive(Deserialize)]
struct RawIncoming {
    id: Option<CallId>,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: JsonValue,
    error: Option<ServerError>,
    event: Option<String>,
}

pub fn encode_request(request: &Request) -> String {
    // Request holds only JSON-representable fields, so serialization is
    // infallible; a panic here would mean a bug in the types above.
    serde_json::to_string(request).expect("Request serializes to JSON")
}

pub fn decode_incoming(frame: &str) -> Result<Incoming, ProtoError> {
    let raw: RawIncoming = serde_json::from_str(frame)?;
    if let Some(id) = raw.id {
        let result = if raw.success {
            Ok(raw.data)
        } else {
            match raw.error {
                Some(error) => Err(error),
                None => return Err(ProtoError::MissingError { id }),
            }
        };
        return Ok(Incoming::Reply(Reply { id, result }));
    }
    if let Some(event) = raw.event {
        return Ok(Incoming::Event { event, data: raw.data });
    }
    Err(ProtoError::UnknownShape)
}
