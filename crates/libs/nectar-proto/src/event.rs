//! Known event names.
//!
//! The server reserves a handful of event names for connection housekeeping;
//! everything else is application traffic. The set is open-ended — new
//! server versions may push names this client has never seen, so the enum
//! carries an escape case instead of failing to decode.

/// Event names with reserved or well-known meaning.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventName {
    /// Dispatched locally once the client finishes initialization.
    Ready,
    /// Dispatched locally exactly once per Open→Offline transition.
    Offline,
    /// Server push: the native window was asked to close.
    WindowClose,
    /// Server push: the server is restarting and connections will drop.
    ServerRestart,
    /// Forward-compatible escape for names this client does not know.
    Other(String),
}

impl EventName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ready => "ready",
            Self::Offline => "offline",
            Self::WindowClose => "windowClose",
            Self::ServerRestart => "serverRestart",
            Self::Other(name) => name.as_str(),
        }
    }

    /// True for names the client itself emits; facades refuse to broadcast
    /// these so application traffic cannot spoof housekeeping.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        matches!(self, Self::Ready | Self::Offline)
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        match name {
            "ready" => Self::Ready,
            "offline" => Self::Offline,
            "windowClose" => Self::WindowClose,
            "serverRestart" => Self::ServerRestart,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::EventName;

    #[test]
    fn known_names_round_trip() {
        for name in ["ready", "offline", "windowClose", "serverRestart"] {
            assert_eq!(EventName::from(name).as_str(), name);
        }
    }

    #[test]
    fn unknown_names_fall_through_to_other() {
        let name = EventName::from("mediaScanFinished");
        assert_eq!(name, EventName::Other("mediaScanFinished".to_string()));
        assert!(!name.is_reserved());
    }

    #[test]
    fn only_client_emitted_names_are_reserved() {
        assert!(EventName::Ready.is_reserved());
        assert!(EventName::Offline.is_reserved());
        assert!(!EventName::WindowClose.is_reserved());
        assert!(!EventName::ServerRestart.is_reserved());
    }
}
