//! Explicit session and feature context.
//!
//! Who is signed in, in which role, and which features are switched on are
//! passed into [`crate::app::DiscoveryState`] as plain values and replaced
//! through events, so every component can be exercised without global state.

use serde::{Deserialize, Serialize};

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    #[serde(alias = "organizator")]
    Organizer,
    Admin,
}

impl UserRole {
    /// Whether this role receives personalized ranking.
    #[must_use]
    pub const fn receives_personalization(self) -> bool {
        matches!(self, Self::Student)
    }
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Add or remove favorites.
    Favorite,
    /// Confirm or clear attendance.
    Attend,
    /// Mark a flagged event as reviewed.
    Moderate,
    /// Change status or tags of several owned events at once.
    BulkEdit,
}

impl Capability {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Favorite => "saving favorites",
            Self::Attend => "confirming attendance",
            Self::Moderate => "reviewing moderation flags",
            Self::BulkEdit => "editing events in bulk",
        }
    }
}

/// The current user session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionContext {
    pub role: Option<UserRole>,
    pub authenticated: bool,
    /// Preferred UI language, passed through to the host untouched.
    #[serde(default)]
    pub language: Option<String>,
}

impl SessionContext {
    /// A visitor who is not signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in user with `role`.
    #[must_use]
    pub const fn signed_in(role: UserRole) -> Self {
        Self {
            role: Some(role),
            authenticated: true,
            language: None,
        }
    }

    /// Whether the session may perform `capability`.
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        if !self.authenticated {
            return false;
        }
        match (capability, self.role) {
            (Capability::Favorite | Capability::Attend, Some(UserRole::Student))
            | (Capability::Moderate, Some(UserRole::Admin))
            | (Capability::BulkEdit, Some(UserRole::Organizer | UserRole::Admin)) => true,
            _ => false,
        }
    }
}

/// Feature switches delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub recommendations: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            recommendations: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_follow_roles() {
        let student = SessionContext::signed_in(UserRole::Student);
        let organizer = SessionContext::signed_in(UserRole::Organizer);
        let admin = SessionContext::signed_in(UserRole::Admin);

        assert!(student.can(Capability::Favorite));
        assert!(student.can(Capability::Attend));
        assert!(!student.can(Capability::BulkEdit));
        assert!(organizer.can(Capability::BulkEdit));
        assert!(!organizer.can(Capability::Moderate));
        assert!(admin.can(Capability::Moderate));
        assert!(admin.can(Capability::BulkEdit));
    }

    #[test]
    fn anonymous_session_can_do_nothing() {
        let anonymous = SessionContext::anonymous();
        assert!(!anonymous.can(Capability::Favorite));

        let stale = SessionContext {
            role: Some(UserRole::Admin),
            authenticated: false,
            language: None,
        };
        assert!(!stale.can(Capability::Moderate));
    }

    #[test]
    fn legacy_role_label_is_accepted() {
        let role: UserRole = serde_json::from_str("\"organizator\"").expect("alias");
        assert_eq!(role, UserRole::Organizer);
    }
}
