//! Actions representing side effects to be executed by the host.
//!
//! The event handler returns a `Vec<Action>` after processing each event,
//! allowing several side effects to be queued at once. The host (or
//! [`crate::runtime::Runtime`]) executes them in order: requests are sent and
//! their completions come back as `Event::Response`, timers are armed and
//! report back as `Event::TimerFired`.
//!
//! # Example
//!
//! ```rust
//! use campus_discovery::api::{ApiRequest, RequestId};
//! use campus_discovery::app::Action;
//!
//! let actions = vec![
//!     Action::Send { id: RequestId(1), request: ApiRequest::recommendations(4) },
//!     Action::ReplaceQuery { query: "search=hackathon".to_string() },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use std::time::Duration;

use crate::api::{ApiRequest, RequestId};
use crate::domain::EventId;
use crate::infrastructure::TimerToken;

/// Commands representing side effects to be executed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Performs a backend request and reports the completion under `id`.
    Send {
        /// Correlation id echoed back in `Event::Response`.
        id: RequestId,
        request: ApiRequest,
    },

    /// Replaces the current URL query string without adding a history entry.
    ///
    /// The host is expected to feed the new query back as `Event::RouteChanged`.
    ReplaceQuery {
        /// Canonical, form-urlencoded query string without a leading `?`.
        query: String,
    },

    /// Arms a one-shot timer that reports back as `Event::TimerFired`.
    Schedule { token: TimerToken, delay: Duration },

    /// Disarms a timer.
    Cancel { token: TimerToken },

    /// Shows a transient message to the user.
    Notify(Notification),
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// What a notification is about, for hosts that localize messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    /// The listing could not be loaded; previous results are still shown.
    LoadFailed,
    /// A change was rolled back.
    MutationFailed { event: EventId },
    /// A change to the same item is still in progress.
    MutationBusy { event: EventId },
    /// The session may not perform the action.
    NotPermitted,
    /// Some members of a bulk action were not updated.
    BulkPartialFailure { failed: Vec<EventId> },
    /// A bulk action was requested with nothing selected.
    NothingSelected,
}

/// A user-facing message raised by the discovery core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn error(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            kind,
            message: message.into(),
        }
    }
}
