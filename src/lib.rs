//! Campus discovery: the event-discovery core of a university events platform.
//!
//! The crate turns a shareable URL query into filtered, sorted and paginated
//! event listings, applies favorite, attendance, moderation and bulk edits
//! optimistically with exact rollback, and batches behavioral telemetry on a
//! best-effort basis. It performs no I/O of its own: an embedding host
//! executes requests, timers and URL updates.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (router, transport, timers, renderer)         │  ← Embedding app
//! └─────────────────────────────────────────────────────┘
//!                        │ Event ↓   ↑ Action
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime.rs)                               │  ← Action executor
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Filter codec        - Result fetcher             │
//! │  - Optimistic mutations - Interaction recorder      │
//! │  - Selection           - Recommendation mode        │
//! └─────────────────────────────────────────────────────┘
//!         │                                      │
//! ┌───────────────────────┐   ┌─────────────────────────┐
//! │ API contracts (api/)  │   │ Infrastructure          │
//! │ - Requests, routes    │   │ - Query strings         │
//! │ - Response decoding   │   │ - Scheduler, paths      │
//! └───────────────────────┘   └─────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/) and Observability (observability/)│
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: state machine with the event/action model
//! - [`api`]: backend request and response contracts
//! - [`domain`]: entity and value types, errors
//! - [`infrastructure`]: query strings, timers, data directory
//! - [`runtime`]: executes actions against a [`runtime::Host`]
//! - [`observability`]: OpenTelemetry tracing with JSON-lines export
//!
//! # Example
//!
//! ```rust
//! use campus_discovery::{handle_event, initialize, Action, Config, Event, SessionContext, UserRole};
//!
//! let config = Config::default();
//! let mut state = initialize(&config, SessionContext::signed_in(UserRole::Student));
//!
//! let (render, actions) = handle_event(&mut state, &Event::RouteChanged { query: String::new() })?;
//! assert!(render);
//! for action in actions {
//!     match action {
//!         Action::Send { request, .. } => {
//!             let route = request.route(&config.api_base);
//!             assert!(route.path.starts_with("/api/"));
//!         }
//!         _ => { /* URL, timers, notifications */ }
//!     }
//! }
//! # Ok::<(), campus_discovery::DiscoveryError>(())
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod runtime;

pub use app::{handle_event, Action, DiscoveryState, Event, Notification, NotificationKind};
pub use domain::{
    ApiFailure, DiscoveryError, EventId, EventSummary, FeatureFlags, FilterPatch, FilterState, Result,
    SessionContext, SortMode, UserRole,
};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discovery configuration.
///
/// Every field has a default, so an empty TOML document or map is valid.
///
/// ```toml
/// api_base = "/api"
/// impression_debounce_ms = 500
/// search_debounce_ms = 300
/// recommendation_rail_size = 4
/// recommendations_enabled = true
/// telemetry_max_queue = 200
/// trace_level = "campus_discovery=debug"
/// trace_dir = "/var/log/discovery"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix of every backend path.
    pub api_base: String,

    /// Quiet period after the last render before impressions are recorded.
    pub impression_debounce_ms: u64,

    /// Quiet period after the last keystroke before a search is applied.
    pub search_debounce_ms: u64,

    /// Maximum number of events in the recommendation rail.
    pub recommendation_rail_size: usize,

    /// Initial value of the `recommendations` feature flag.
    pub recommendations_enabled: bool,

    /// Telemetry queue bound; the oldest events are dropped past it.
    pub telemetry_max_queue: usize,

    /// `EnvFilter` directive for exported spans. `RUST_LOG` takes precedence.
    pub trace_level: Option<String>,

    /// Directory for the span export file. Defaults to the data directory.
    pub trace_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            impression_debounce_ms: 500,
            search_debounce_ms: 300,
            recommendation_rail_size: 4,
            recommendations_enabled: true,
            telemetry_max_queue: 200,
            trace_level: None,
            trace_dir: None,
        }
    }
}

impl Config {
    /// Builds a configuration from the host's string map.
    ///
    /// Missing keys and values that do not parse keep their defaults.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use campus_discovery::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("recommendation_rail_size".to_string(), "6".to_string());
    /// map.insert("search_debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.recommendation_rail_size, 6);
    /// assert_eq!(config.search_debounce_ms, 300);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| map_text(map, key);
        let parsed_u64 = |key: &str| map_parsed::<u64>(map, key);
        let parsed_usize = |key: &str| map_parsed::<usize>(map, key).filter(|size| *size > 0);

        Self {
            api_base: text("api_base").unwrap_or(defaults.api_base),
            impression_debounce_ms: parsed_u64("impression_debounce_ms").unwrap_or(defaults.impression_debounce_ms),
            search_debounce_ms: parsed_u64("search_debounce_ms").unwrap_or(defaults.search_debounce_ms),
            recommendation_rail_size: parsed_usize("recommendation_rail_size")
                .unwrap_or(defaults.recommendation_rail_size),
            recommendations_enabled: map_parsed::<bool>(map, "recommendations_enabled")
                .unwrap_or(defaults.recommendations_enabled),
            telemetry_max_queue: parsed_usize("telemetry_max_queue").unwrap_or(defaults.telemetry_max_queue),
            trace_level: text("trace_level"),
            trace_dir: text("trace_dir").map(PathBuf::from),
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Toml`] for malformed TOML or mistyped
    /// values, and [`DiscoveryError::Config`] for a zero rail size or queue
    /// bound.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Io`] if the file cannot be read, otherwise
    /// the errors of [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<()> {
        if self.recommendation_rail_size == 0 {
            return Err(DiscoveryError::Config(
                "recommendation_rail_size must be positive".to_string(),
            ));
        }
        if self.telemetry_max_queue == 0 {
            return Err(DiscoveryError::Config("telemetry_max_queue must be positive".to_string()));
        }
        Ok(())
    }
}

fn map_text(map: &BTreeMap<String, String>, key: &str) -> Option<String> {
    map.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(String::from)
}

fn map_parsed<T: FromStr>(map: &BTreeMap<String, String>, key: &str) -> Option<T> {
    map_text(map, key).and_then(|value| value.parse().ok())
}

/// Creates the discovery state for `session`.
///
/// Nothing is requested until the first `RouteChanged` event.
#[must_use]
pub fn initialize(config: &Config, session: SessionContext) -> DiscoveryState {
    tracing::debug!(
        authenticated = session.authenticated,
        role = ?session.role,
        recommendations = config.recommendations_enabled,
        "initializing discovery state"
    );
    DiscoveryState::new(config.clone(), session)
}
