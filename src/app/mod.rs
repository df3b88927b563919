//! Application layer coordinating state, events, and actions.
//!
//! This module holds the discovery state machine and the components it
//! drives. It sits between the host (router, transport, timers, renderer)
//! and the domain layer.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Route / User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                                   ↑                                  ↓
//!                                   └──── Responses / Timer Expiry ────┘
//! ```
//!
//! # Modules
//!
//! - [`codec`]: URL query ⇄ filter state
//! - [`fetcher`]: generation-guarded listing and rail loads
//! - [`mutation`]: optimistic, rollback-capable changes
//! - [`recorder`]: batched, best-effort interaction telemetry
//! - [`selection`]: selection for bulk actions
//! - [`recommendation`]: sort mode resolution
//! - [`actions`]: side effect commands emitted by the event handler
//! - [`handler`]: event processing and state transitions
//! - [`state`]: central state container

pub mod actions;
pub mod codec;
pub mod fetcher;
pub mod handler;
pub mod mutation;
pub mod recommendation;
pub mod recorder;
pub mod selection;
pub mod state;

pub use actions::{Action, Notification, NotificationKind, NotificationLevel};
pub use fetcher::{Generation, LoadOutcome, RecommendationRail, ResultFetcher};
pub use handler::{handle_event, Event};
pub use mutation::{
    BatchReport, MutationField, MutationKey, MutationValue, OptimisticMutationController, OptimisticStore,
};
pub use recommendation::RecommendationModeResolver;
pub use recorder::InteractionRecorder;
pub use selection::{SelectionSet, SelectionState};
pub use state::DiscoveryState;
