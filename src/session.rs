//! Session projection from the external identity provider.
//!
//! The crate consumes identity transitions as a capability: presence of a
//! [`Session`] gates all remote mirroring, and its loss forces a purge of
//! session-scoped local state.

use serde::{Deserialize, Serialize};

/// Authenticated identity projected from the external provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl Session {
    /// Project a session from raw identity fields, with the display-name
    /// fallback chain of the source app: full name, then the email's
    /// local part, then a generic label.
    pub fn from_identity(
        id: impl Into<String>,
        full_name: Option<String>,
        email: impl Into<String>,
        avatar_url: Option<String>,
    ) -> Self {
        let email = email.into();
        let display_name = full_name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| email.split('@').next().map(|s| s.to_string()))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Chef".to_string());
        Self {
            id: id.into(),
            display_name,
            email,
            avatar_url,
        }
    }
}

/// Identity transitions emitted by the session bridge.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Established(Session),
    Lost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_full_name() {
        let session = Session::from_identity(
            "u1",
            Some("Ada Lovelace".to_string()),
            "ada@example.com",
            None,
        );
        assert_eq!(session.display_name, "Ada Lovelace");
    }

    #[test]
    fn test_display_name_falls_back_to_email_local_part() {
        let session = Session::from_identity("u1", None, "ada@example.com", None);
        assert_eq!(session.display_name, "ada");
    }

    #[test]
    fn test_display_name_generic_fallback() {
        let session = Session::from_identity("u1", Some("   ".to_string()), "", None);
        assert_eq!(session.display_name, "Chef");
    }
}
