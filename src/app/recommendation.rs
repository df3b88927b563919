//! Choice between chronological and personalized ordering.
//!
//! Personalized ranking is only offered to signed-in users whose role
//! receives it, and only while the feature flag is on. Eligible users default
//! to `Recommended`; everyone else gets `Time`, whatever they ask for.

use crate::domain::{FeatureFlags, SessionContext, SortMode, UserRole};

/// Whether recommendation mode is offered to this user.
#[must_use]
pub fn is_eligible(role: Option<UserRole>, is_authenticated: bool, feature_enabled: bool) -> bool {
    feature_enabled && is_authenticated && role.is_some_and(UserRole::receives_personalization)
}

/// Resolves the effective sort mode.
///
/// # Examples
///
/// ```
/// use campus_discovery::app::recommendation::resolve;
/// use campus_discovery::domain::{SortMode, UserRole};
///
/// assert_eq!(resolve(Some(UserRole::Student), true, true, None), SortMode::Recommended);
/// assert_eq!(resolve(Some(UserRole::Student), true, true, Some(SortMode::Time)), SortMode::Time);
/// assert_eq!(resolve(Some(UserRole::Organizer), true, true, Some(SortMode::Recommended)), SortMode::Time);
/// assert_eq!(resolve(Some(UserRole::Student), true, false, None), SortMode::Time);
/// ```
#[must_use]
pub fn resolve(
    role: Option<UserRole>,
    is_authenticated: bool,
    feature_enabled: bool,
    explicit_choice: Option<SortMode>,
) -> SortMode {
    if !is_eligible(role, is_authenticated, feature_enabled) {
        return SortMode::Time;
    }
    explicit_choice.unwrap_or(SortMode::Recommended)
}

/// Session-scoped resolver remembering the user's explicit choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationModeResolver {
    explicit_choice: Option<SortMode>,
}

impl RecommendationModeResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an explicit choice that overrides the default for the rest of the session.
    pub fn choose(&mut self, mode: SortMode) {
        if self.explicit_choice != Some(mode) {
            tracing::debug!(mode = mode.as_str(), "explicit sort choice recorded");
        }
        self.explicit_choice = Some(mode);
    }

    /// Forgets the explicit choice, e.g. when a different user signs in.
    pub fn reset(&mut self) {
        self.explicit_choice = None;
    }

    #[must_use]
    pub const fn explicit_choice(&self) -> Option<SortMode> {
        self.explicit_choice
    }

    /// Whether recommendation mode (and the recommendation rail) is offered.
    #[must_use]
    pub fn is_offered(&self, session: &SessionContext, flags: &FeatureFlags) -> bool {
        is_eligible(session.role, session.authenticated, flags.recommendations)
    }

    /// Effective sort for the session.
    #[must_use]
    pub fn effective(&self, session: &SessionContext, flags: &FeatureFlags) -> SortMode {
        resolve(
            session.role,
            session.authenticated,
            flags.recommendations,
            self.explicit_choice,
        )
    }
}
