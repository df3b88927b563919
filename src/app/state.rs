//! Discovery state container.
//!
//! [`DiscoveryState`] is the single source of truth for the discovery view:
//! the filter state decoded from the URL, the displayed listing and rail,
//! the selection, in-flight optimistic mutations, queued telemetry and the
//! bookkeeping that maps request ids and timer tokens back to their purpose.
//! It is mutated only by [`handle_event`](super::handle_event).

use std::collections::HashMap;
use std::time::Duration;

use crate::api::RequestId;
use crate::domain::{
    Capability, EventId, EventSummary, FeatureFlags, FilterState, SessionContext, SortMode,
};
use crate::infrastructure::{TimerToken, TokenSource};
use crate::Config;

use super::fetcher::{Generation, RecommendationRail, ResultFetcher};
use super::mutation::{DisplayedEvents, MutationField, MutationKey, MutationValue, OptimisticMutationController};
use super::recommendation::RecommendationModeResolver;
use super::recorder::InteractionRecorder;
use super::selection::{SelectionSet, SelectionState};

/// Mutation controller specialised for event fields.
pub type EventMutations = OptimisticMutationController<MutationKey, MutationValue>;

/// What an outstanding request was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingRequest {
    Page(Generation),
    Rail(Generation),
    Single { event: EventId, field: MutationField },
    Bulk { field: MutationField, rejected: Vec<EventId> },
    Telemetry { count: usize },
}

/// A search-box value waiting for its debounce timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingSearch {
    pub token: TimerToken,
    pub text: String,
}

/// Central state of the discovery view.
#[derive(Debug)]
pub struct DiscoveryState {
    pub config: Config,
    pub session: SessionContext,
    pub flags: FeatureFlags,

    /// Filter state decoded from the current URL query.
    ///
    /// `filter.sort` is what the URL says; the sort actually requested is
    /// [`effective_sort`](Self::effective_sort).
    pub filter: FilterState,

    /// Canonical query string of `filter`.
    pub query: String,

    pub resolver: RecommendationModeResolver,
    pub results: ResultFetcher<EventSummary>,
    pub rail: RecommendationRail<EventSummary>,
    pub selection: SelectionSet<EventId>,
    pub mutations: EventMutations,
    pub recorder: InteractionRecorder,

    /// Effective filter of the last listing request, `None` before the first load.
    pub(crate) requested: Option<FilterState>,
    pub(crate) pending: HashMap<RequestId, PendingRequest>,
    pub(crate) tokens: TokenSource,
    pub(crate) search: Option<PendingSearch>,
    next_request: u64,
}

impl DiscoveryState {
    /// Creates an empty state. Nothing is loaded until the first route event.
    #[must_use]
    pub fn new(config: Config, session: SessionContext) -> Self {
        let flags = FeatureFlags {
            recommendations: config.recommendations_enabled,
        };
        let recorder = InteractionRecorder::new(
            config.telemetry_max_queue,
            Duration::from_millis(config.impression_debounce_ms),
        );
        let rail = RecommendationRail::new(config.recommendation_rail_size);

        Self {
            config,
            session,
            flags,
            filter: FilterState::default(),
            query: String::new(),
            resolver: RecommendationModeResolver::new(),
            results: ResultFetcher::new(),
            rail,
            selection: SelectionSet::new(),
            mutations: EventMutations::new(),
            recorder,
            requested: None,
            pending: HashMap::new(),
            tokens: TokenSource::default(),
            search: None,
            next_request: 0,
        }
    }

    /// Sort actually requested from the backend.
    #[must_use]
    pub fn effective_sort(&self) -> SortMode {
        self.resolver.effective(&self.session, &self.flags)
    }

    /// The current filter with the effective sort applied.
    #[must_use]
    pub fn effective_filter(&self) -> FilterState {
        FilterState {
            sort: self.effective_sort(),
            ..self.filter.clone()
        }
    }

    /// Whether the sort toggle and the rail are offered to this session.
    #[must_use]
    pub fn recommendations_offered(&self) -> bool {
        self.resolver.is_offered(&self.session, &self.flags)
    }

    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.session.can(capability)
    }

    /// Events in the listing, with optimistic values applied.
    #[must_use]
    pub fn events(&self) -> &[EventSummary] {
        self.results.items()
    }

    /// Events in the recommendation rail.
    #[must_use]
    pub fn recommended(&self) -> &[EventSummary] {
        self.rail.items()
    }

    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.results.is_loading()
    }

    /// Number of requests whose completion has not been reported yet.
    #[must_use]
    pub fn outstanding_requests(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    /// Splits the state into the mutation controller and the displayed data
    /// it writes to.
    pub(crate) fn mutation_parts(&mut self) -> (&mut EventMutations, DisplayedEvents<'_>) {
        let store = DisplayedEvents::new([self.results.items_mut(), self.rail.items_mut()]);
        (&mut self.mutations, store)
    }
}
