//! Domain layer for the discovery core.
//!
//! This module contains the value types shared by every component, independent
//! of the host, the transport and the scheduler.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`event`]: Event entity and its mutable fields
//! - [`filter`]: Filter state, sort modes, page sizes and patches
//! - [`interaction`]: Behavioral telemetry events
//! - [`page`]: Paginated result sets
//! - [`session`]: Session, role and feature-flag context

pub mod error;
pub mod event;
pub mod filter;
pub mod interaction;
pub mod page;
pub mod session;

pub use error::{ApiFailure, DiscoveryError, Result};
pub use event::{EventId, EventStatus, EventSummary, ModerationStatus};
pub use filter::{FilterPatch, FilterState, PageSize, SortMode};
pub use interaction::{InteractionEvent, InteractionKind, ListSource};
pub use page::ResultPage;
pub use session::{Capability, FeatureFlags, SessionContext, UserRole};
