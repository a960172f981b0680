//! Opaque handles to prepared logical states.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque reference to one encoded block held by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateHandle(Uuid);

impl StateHandle {
    /// Create a fresh random handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for StateHandle {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        assert_ne!(StateHandle::new(), StateHandle::new());
    }

    #[test]
    fn test_display_is_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(StateHandle::from(id).to_string(), id.to_string());
    }

    #[test]
    fn test_serializes_as_plain_uuid() {
        let handle = StateHandle::new();
        let json = serde_json::to_string(&handle).unwrap();
        assert_eq!(json, format!("\"{handle}\""));
        let back: StateHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, handle);
    }
}
