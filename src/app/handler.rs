//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes route
//! changes, user intents, backend completions and timer expirations,
//! translating them into state changes and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the host (user input, router, transport, timers)
//! 2. [`handle_event`] pattern-matches the event type
//! 3. Components of [`DiscoveryState`] are updated
//! 4. Actions are collected and returned for execution
//! 5. Telemetry recorded while handling the event is flushed as one batch
//!
//! # Event Types
//!
//! - **Filters**: `RouteChanged`, `UpdateFilter`, `SearchInput`, `SetSort`
//! - **Context**: `SessionChanged`, `FlagsChanged`
//! - **Completions**: `Response`, `TimerFired`
//! - **Telemetry**: `ItemsRendered`, `EventClicked`, `EventShared`,
//!   `ViewMounted`, `ViewUnmounted`
//! - **Mutations**: `ToggleFavorite`, `SetAttendance`, `ReviewModeration`
//! - **Selection & bulk**: `ToggleSelection`, `ToggleSelectAll`,
//!   `ClearSelection`, `BulkUpdateStatus`, `BulkUpdateTags`
//!
//! # Example
//!
//! ```rust
//! use campus_discovery::app::{handle_event, Action, DiscoveryState, Event};
//! use campus_discovery::{Config, SessionContext};
//!
//! let mut state = DiscoveryState::new(Config::default(), SessionContext::anonymous());
//! let (render, actions) = handle_event(&mut state, &Event::RouteChanged { query: "search=hackathon".into() })?;
//!
//! assert!(render);
//! assert!(matches!(actions.as_slice(), [Action::Send { .. }]));
//! # Ok::<(), campus_discovery::DiscoveryError>(())
//! ```

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::actions::{Action, Notification, NotificationKind};
use super::codec;
use super::fetcher::LoadOutcome;
use super::mutation::{MutationField, MutationKey, MutationValue, OptimisticStore};
use super::recorder::TimerCommand;
use super::state::{DiscoveryState, PendingRequest, PendingSearch};
use crate::api::{ApiRequest, ApiResponse, BulkResult, RequestId};
use crate::domain::{
    ApiFailure, Capability, DiscoveryError, EventId, EventStatus, FeatureFlags, FilterPatch,
    ListSource, ModerationStatus, Result, SessionContext, SortMode,
};
use crate::infrastructure::{parse_query, TimerToken};

/// Events triggered by the user, the router, the transport or timers.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The URL query string changed (initial load, navigation, or after `ReplaceQuery`).
    RouteChanged {
        /// Raw query string, with or without a leading `?`.
        query: String,
    },

    /// Applies a filter patch. Any field other than `page` resets the page.
    UpdateFilter(FilterPatch),

    /// A keystroke in the search box. Debounced before it reaches the URL.
    SearchInput(String),

    /// The user picked a sort order.
    SetSort(SortMode),

    /// A different user signed in, or the current one signed out.
    SessionChanged(SessionContext),

    /// Feature switches changed.
    FlagsChanged(FeatureFlags),

    /// A request issued through `Action::Send` completed.
    Response {
        id: RequestId,
        outcome: std::result::Result<ApiResponse, ApiFailure>,
    },

    /// A timer armed through `Action::Schedule` expired.
    TimerFired { token: TimerToken },

    /// The host rendered `ids` in a list.
    ItemsRendered { source: ListSource, ids: Vec<EventId> },

    /// An event card was opened from a list.
    EventClicked {
        id: EventId,
        source: ListSource,
        /// Zero-based position within the rendered list.
        position: usize,
    },

    /// An event was shared.
    EventShared { id: EventId, channel: String },

    /// An event detail view was mounted.
    ViewMounted { id: EventId, at: DateTime<Utc> },

    /// An event detail view was unmounted.
    ViewUnmounted { id: EventId, at: DateTime<Utc> },

    /// Adds or removes the event from the user's favorites.
    ToggleFavorite { id: EventId },

    /// Confirms or clears attendance.
    SetAttendance { id: EventId, attending: bool },

    /// Marks a flagged event as reviewed.
    ReviewModeration { id: EventId },

    ToggleSelection { id: EventId },
    ToggleSelectAll { checked: bool },
    ClearSelection,

    /// Sets the publication status of every selected event.
    BulkUpdateStatus { status: EventStatus },

    /// Replaces the tags of every selected event.
    BulkUpdateTags { tags: BTreeSet<String> },
}

impl Event {
    /// Short name used in spans and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RouteChanged { .. } => "route_changed",
            Self::UpdateFilter(_) => "update_filter",
            Self::SearchInput(_) => "search_input",
            Self::SetSort(_) => "set_sort",
            Self::SessionChanged(_) => "session_changed",
            Self::FlagsChanged(_) => "flags_changed",
            Self::Response { .. } => "response",
            Self::TimerFired { .. } => "timer_fired",
            Self::ItemsRendered { .. } => "items_rendered",
            Self::EventClicked { .. } => "event_clicked",
            Self::EventShared { .. } => "event_shared",
            Self::ViewMounted { .. } => "view_mounted",
            Self::ViewUnmounted { .. } => "view_unmounted",
            Self::ToggleFavorite { .. } => "toggle_favorite",
            Self::SetAttendance { .. } => "set_attendance",
            Self::ReviewModeration { .. } => "review_moderation",
            Self::ToggleSelection { .. } => "toggle_selection",
            Self::ToggleSelectAll { .. } => "toggle_select_all",
            Self::ClearSelection => "clear_selection",
            Self::BulkUpdateStatus { .. } => "bulk_update_status",
            Self::BulkUpdateTags { .. } => "bulk_update_tags",
        }
    }
}

/// Processes an event, mutates state, and returns `(render, actions)`.
///
/// `render` says whether anything the view shows changed. The actions are
/// side effects for the host to execute in order. Telemetry recorded while
/// handling the event is appended as a single `RecordInteractions` request.
///
/// # Errors
///
/// Reserved for programming-level failures. Backend failures, rejected
/// mutations and malformed URLs are handled internally and surface as
/// notifications or defaults.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut DiscoveryState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();
    let mut actions = Vec::new();

    let render = match event {
        Event::RouteChanged { query } => on_route_changed(state, query, &mut actions),
        Event::UpdateFilter(patch) => apply_patch(state, patch, &mut actions),
        Event::SearchInput(text) => {
            tracing::trace!(text = %text, "search input");
            if let Some(previous) = state.search.take() {
                actions.push(Action::Cancel { token: previous.token });
            }
            let token = state.tokens.next_token();
            actions.push(Action::Schedule {
                token,
                delay: Duration::from_millis(state.config.search_debounce_ms),
            });
            state.search = Some(PendingSearch {
                token,
                text: text.clone(),
            });
            false
        }
        Event::SetSort(mode) => {
            state.resolver.choose(*mode);
            apply_patch(state, &FilterPatch::new().sort(*mode), &mut actions)
        }
        Event::SessionChanged(session) => {
            if session.role != state.session.role || session.authenticated != state.session.authenticated {
                tracing::debug!(role = ?session.role, authenticated = session.authenticated, "session changed");
                state.resolver.reset();
            }
            state.session = session.clone();
            on_context_changed(state, &mut actions);
            true
        }
        Event::FlagsChanged(flags) => {
            if *flags == state.flags {
                false
            } else {
                state.flags = *flags;
                on_context_changed(state, &mut actions);
                true
            }
        }
        Event::Response { id, outcome } => on_response(state, *id, outcome, &mut actions),
        Event::TimerFired { token } => on_timer(state, *token, &mut actions),
        Event::ItemsRendered { source, ids } => {
            let sort = list_sort(state, *source);
            let commands = state
                .recorder
                .observe_rendered(*source, ids, sort, &mut state.tokens);
            push_timer_commands(&mut actions, commands);
            false
        }
        Event::EventClicked { id, source, position } => {
            let sort = list_sort(state, *source);
            state.recorder.click(*id, *source, sort, *position);
            false
        }
        Event::EventShared { id, channel } => {
            state.recorder.share(*id, channel);
            false
        }
        Event::ViewMounted { id, at } => {
            state.recorder.view_mounted(*id, *at);
            false
        }
        Event::ViewUnmounted { id, at } => {
            state.recorder.view_unmounted(*id, *at);
            false
        }
        Event::ToggleFavorite { id } => {
            let key = MutationKey::new(*id, MutationField::Favorite);
            let current = {
                let (_, store) = state.mutation_parts();
                store.value(&key)
            };
            match current {
                Some(MutationValue::Favorite(current)) => start_single(
                    state,
                    Capability::Favorite,
                    key,
                    MutationValue::Favorite(!current),
                    ApiRequest::set_favorite(*id, !current),
                    &mut actions,
                ),
                _ => {
                    tracing::debug!(event = %id, "favorite toggled for an event that is not displayed");
                    false
                }
            }
        }
        Event::SetAttendance { id, attending } => start_single(
            state,
            Capability::Attend,
            MutationKey::new(*id, MutationField::Attendance),
            MutationValue::Attendance(*attending),
            ApiRequest::set_attendance(*id, *attending),
            &mut actions,
        ),
        Event::ReviewModeration { id } => start_single(
            state,
            Capability::Moderate,
            MutationKey::new(*id, MutationField::Moderation),
            MutationValue::Moderation(ModerationStatus::Reviewed),
            ApiRequest::review_moderation(*id),
            &mut actions,
        ),
        Event::ToggleSelection { id } => state.selection.toggle(id),
        Event::ToggleSelectAll { checked } => {
            state.selection.toggle_all(*checked);
            true
        }
        Event::ClearSelection => {
            let had_selection = !state.selection.is_empty();
            state.selection.clear();
            had_selection
        }
        Event::BulkUpdateStatus { status } => start_bulk(
            state,
            MutationField::Status,
            &MutationValue::Status(*status),
            |events| ApiRequest::bulk_status(events, *status),
            &mut actions,
        ),
        Event::BulkUpdateTags { tags } => start_bulk(
            state,
            MutationField::Tags,
            &MutationValue::Tags(tags.clone()),
            |events| ApiRequest::bulk_tags(events, tags.clone()),
            &mut actions,
        ),
    };

    flush_telemetry(state, &mut actions);
    Ok((render, actions))
}

/// Decodes the URL, records an explicit sort, and loads if the effective
/// filter changed.
fn on_route_changed(state: &mut DiscoveryState, raw: &str, actions: &mut Vec<Action>) -> bool {
    let params = parse_query(raw);
    let next = codec::decode(&params);
    if codec::has_explicit_sort(&params) {
        state.resolver.choose(next.sort);
    }

    let canonical = crate::infrastructure::to_query_string(&codec::to_params(&next));
    state.filter = next;
    state.query.clone_from(&canonical);

    if canonical != raw.trim_start_matches('?') {
        tracing::debug!(raw = %raw, canonical = %canonical, "canonicalizing query string");
        actions.push(Action::ReplaceQuery { query: canonical });
    }

    let first_load = state.requested.is_none();
    let loaded = sync_listing(state, actions, true);
    if first_load {
        request_rail(state, actions);
    }
    loaded
}

/// Encodes a patch against the latest filter state and asks the host to
/// navigate. A patch that leaves the URL unchanged may still change the
/// effective sort, in which case the listing is reloaded directly.
fn apply_patch(state: &mut DiscoveryState, patch: &FilterPatch, actions: &mut Vec<Action>) -> bool {
    let query = codec::encode_query(patch, &state.filter);
    if query == state.query {
        return sync_listing(state, actions, true);
    }
    tracing::debug!(query = %query, "filter patch changes the query");
    actions.push(Action::ReplaceQuery { query });
    false
}

/// Issues a listing load when the effective filter differs from the last
/// requested one. When `user_driven`, records search / filter transitions on
/// the way; a sort flip caused by a session change is not a user filter.
fn sync_listing(state: &mut DiscoveryState, actions: &mut Vec<Action>, user_driven: bool) -> bool {
    let effective = state.effective_filter();
    if state.requested.as_ref() == Some(&effective) {
        return false;
    }
    if let Some(previous) = state.requested.as_ref().filter(|_| user_driven) {
        state.recorder.filter_transition(previous, &effective);
    }

    let generation = state.results.begin();
    let id = state.next_request_id();
    state.pending.insert(id, PendingRequest::Page(generation));
    tracing::debug!(
        request = id.0,
        generation = generation.0,
        sort = effective.sort.as_str(),
        page = effective.page,
        "loading listing"
    );
    actions.push(Action::Send {
        id,
        request: ApiRequest::list_events(effective.clone()),
    });
    state.requested = Some(effective);
    true
}

fn request_rail(state: &mut DiscoveryState, actions: &mut Vec<Action>) {
    if !state.recommendations_offered() {
        return;
    }
    let generation = state.rail.begin();
    let id = state.next_request_id();
    state.pending.insert(id, PendingRequest::Rail(generation));
    actions.push(Action::Send {
        id,
        request: ApiRequest::recommendations(state.rail.capacity()),
    });
}

/// Session or flags changed: refresh the rail and the effective sort.
fn on_context_changed(state: &mut DiscoveryState, actions: &mut Vec<Action>) {
    if state.recommendations_offered() {
        request_rail(state, actions);
    } else {
        state.rail.clear();
    }
    if state.requested.is_some() {
        sync_listing(state, actions, false);
    }
}

fn on_timer(state: &mut DiscoveryState, token: TimerToken, actions: &mut Vec<Action>) -> bool {
    if state.search.as_ref().is_some_and(|search| search.token == token) {
        let Some(search) = state.search.take() else {
            return false;
        };
        return apply_patch(state, &FilterPatch::new().search(search.text), actions);
    }
    if !state.recorder.on_timer(token) {
        tracing::trace!(token = token.0, "ignoring expired timer");
    }
    false
}

fn on_response(
    state: &mut DiscoveryState,
    id: RequestId,
    outcome: &std::result::Result<ApiResponse, ApiFailure>,
    actions: &mut Vec<Action>,
) -> bool {
    let Some(pending) = state.pending.remove(&id) else {
        tracing::debug!(request = id.0, "response for unknown request");
        return false;
    };

    match pending {
        PendingRequest::Page(generation) => {
            let page = match outcome {
                Ok(ApiResponse::Page(page)) => Ok(page.clone()),
                Ok(other) => Err(unexpected(other)),
                Err(failure) => Err(failure.clone()),
            };
            match state.results.complete(generation, page) {
                LoadOutcome::Stale => false,
                LoadOutcome::Failed(failure) => {
                    actions.push(Action::Notify(Notification::error(
                        NotificationKind::LoadFailed,
                        format!("Could not load events: {failure}"),
                    )));
                    true
                }
                LoadOutcome::Applied { .. } => {
                    after_listing_loaded(state, actions);
                    true
                }
            }
        }
        PendingRequest::Rail(generation) => {
            let items = match outcome {
                Ok(ApiResponse::Recommendations(items)) => Ok(items.clone()),
                Ok(other) => Err(unexpected(other)),
                Err(failure) => Err(failure.clone()),
            };
            if !state.rail.complete(generation, items) {
                return false;
            }
            {
                let (mutations, mut store) = state.mutation_parts();
                mutations.reapply(&mut store);
            }
            let ids = state.rail.ids();
            let commands = state.recorder.observe_rendered(
                ListSource::Recommendations,
                &ids,
                SortMode::Recommended,
                &mut state.tokens,
            );
            push_timer_commands(actions, commands);
            true
        }
        PendingRequest::Single { event, field } => settle_single(state, id, event, field, outcome, actions),
        PendingRequest::Bulk { field, rejected } => settle_bulk(state, id, field, rejected, outcome, actions),
        PendingRequest::Telemetry { count } => {
            match outcome {
                Ok(_) => tracing::debug!(count, "telemetry batch delivered"),
                Err(failure) => tracing::debug!(count, error = %failure, "telemetry batch lost"),
            }
            false
        }
    }
}

/// Selection pruning, optimistic re-application, impressions and page clamping
/// after a listing load was applied.
fn after_listing_loaded(state: &mut DiscoveryState, actions: &mut Vec<Action>) {
    let ids = state.results.ids();
    state.selection.reload(ids.iter().copied());

    {
        let (mutations, mut store) = state.mutation_parts();
        mutations.reapply(&mut store);
    }

    let sort = state.effective_sort();
    let commands = state
        .recorder
        .observe_rendered(ListSource::EventsList, &ids, sort, &mut state.tokens);
    push_timer_commands(actions, commands);

    let Some(page) = state.results.page() else {
        return;
    };
    let clamped = page.clamp_page(state.filter.page);
    if clamped != state.filter.page {
        tracing::debug!(requested = state.filter.page, clamped, "page out of range, clamping");
        let query = codec::encode_query(&FilterPatch::new().page(clamped), &state.filter);
        actions.push(Action::ReplaceQuery { query });
    }
}

fn start_single(
    state: &mut DiscoveryState,
    capability: Capability,
    key: MutationKey,
    proposed: MutationValue,
    request: ApiRequest,
    actions: &mut Vec<Action>,
) -> bool {
    if !state.can(capability) {
        actions.push(not_permitted(capability));
        return false;
    }

    let id = state.next_request_id();
    let applied = {
        let (mutations, mut store) = state.mutation_parts();
        mutations.apply(&mut store, key, proposed, id)
    };
    match applied {
        Ok(()) => {
            state.pending.insert(
                id,
                PendingRequest::Single {
                    event: key.event,
                    field: key.field,
                },
            );
            actions.push(Action::Send { id, request });
            true
        }
        Err(err) => {
            reject(err, actions);
            false
        }
    }
}

fn settle_single(
    state: &mut DiscoveryState,
    id: RequestId,
    event: EventId,
    field: MutationField,
    outcome: &std::result::Result<ApiResponse, ApiFailure>,
    actions: &mut Vec<Action>,
) -> bool {
    let confirmed = match (field, outcome) {
        (MutationField::Favorite, Ok(ApiResponse::Favorite { is_favorite })) => {
            Ok(MutationValue::Favorite(*is_favorite))
        }
        (MutationField::Attendance, Ok(ApiResponse::Attendance { attending })) => {
            Ok(MutationValue::Attendance(*attending))
        }
        (MutationField::Moderation, Ok(ApiResponse::Moderation { status })) => {
            Ok(MutationValue::Moderation(*status))
        }
        (_, Ok(other)) => Err(unexpected(other)),
        (_, Err(failure)) => Err(failure.clone()),
    };

    {
        let (mutations, mut store) = state.mutation_parts();
        match &confirmed {
            Ok(value) => {
                mutations.resolve(&mut store, id, value.clone());
            }
            Err(_) => {
                mutations.rollback(&mut store, id);
            }
        }
    }
    match confirmed {
        Ok(value) => {
            match value {
                MutationValue::Favorite(is_favorite) => state.recorder.favorite(event, is_favorite),
                MutationValue::Attendance(attending) => state.recorder.attendance(event, attending),
                _ => {}
            }
        }
        Err(failure) => {
            tracing::debug!(event = %event, ?field, error = %failure, "mutation failed");
            actions.push(Action::Notify(Notification::error(
                NotificationKind::MutationFailed { event },
                format!("Could not update event {event}: {failure}"),
            )));
        }
    }
    true
}

fn start_bulk<F>(
    state: &mut DiscoveryState,
    field: MutationField,
    proposed: &MutationValue,
    build: F,
    actions: &mut Vec<Action>,
) -> bool
where
    F: FnOnce(Vec<EventId>) -> ApiRequest,
{
    if !state.can(Capability::BulkEdit) {
        actions.push(not_permitted(Capability::BulkEdit));
        return false;
    }
    let selected: Vec<EventId> = state.selection.selected().copied().collect();
    if selected.is_empty() {
        actions.push(Action::Notify(Notification::info(
            NotificationKind::NothingSelected,
            "Select at least one event first",
        )));
        return false;
    }

    let id = state.next_request_id();
    let keys = selected.iter().map(|event| MutationKey::new(*event, field));
    let admission = {
        let (mutations, mut store) = state.mutation_parts();
        mutations.apply_batch(&mut store, keys, proposed, id)
    };
    let rejected: Vec<EventId> = admission.rejected.iter().map(|key| key.event).collect();

    if admission.accepted.is_empty() {
        if let Some(first) = rejected.first() {
            reject(DiscoveryError::MutationInFlight { event: *first }, actions);
        }
        return false;
    }

    let events: Vec<EventId> = admission.accepted.iter().map(|key| key.event).collect();
    tracing::debug!(request = id.0, ?field, members = events.len(), rejected = rejected.len(), "bulk update started");
    state.pending.insert(id, PendingRequest::Bulk { field, rejected });
    actions.push(Action::Send {
        id,
        request: build(events),
    });
    true
}

fn settle_bulk(
    state: &mut DiscoveryState,
    id: RequestId,
    field: MutationField,
    rejected: Vec<EventId>,
    outcome: &std::result::Result<ApiResponse, ApiFailure>,
    actions: &mut Vec<Action>,
) -> bool {
    let (confirmed, failed): (Vec<(MutationKey, MutationValue)>, Vec<MutationKey>) = match (field, outcome) {
        (MutationField::Status, Ok(ApiResponse::BulkStatus(result))) => {
            split_bulk(result, field, |status| MutationValue::Status(*status))
        }
        (MutationField::Tags, Ok(ApiResponse::BulkTags(result))) => {
            split_bulk(result, field, |tags| MutationValue::Tags(tags.clone()))
        }
        (_, other) => {
            if let Ok(response) = other {
                tracing::debug!(error = %unexpected(response), "bulk update answered with the wrong shape");
            }
            (Vec::new(), Vec::new())
        }
    };

    let report = {
        let (mutations, mut store) = state.mutation_parts();
        mutations.resolve_batch(&mut store, id, confirmed, failed)
    };

    let mut failed: Vec<EventId> = report.rolled_back.iter().map(|key| key.event).collect();
    failed.extend(rejected);
    failed.sort_unstable();
    failed.dedup();

    if failed.is_empty() {
        tracing::debug!(updated = report.confirmed.len(), "bulk update succeeded");
        state.selection.clear();
    } else {
        let detail = match outcome {
            Err(failure) => format!(": {failure}"),
            Ok(_) => String::new(),
        };
        actions.push(Action::Notify(Notification::warning(
            NotificationKind::BulkPartialFailure { failed: failed.clone() },
            format!("{} of the selected events were not updated{detail}", failed.len()),
        )));
    }
    true
}

fn split_bulk<V, F>(
    result: &BulkResult<V>,
    field: MutationField,
    to_value: F,
) -> (Vec<(MutationKey, MutationValue)>, Vec<MutationKey>)
where
    F: Fn(&V) -> MutationValue,
{
    let confirmed = result
        .updated
        .iter()
        .map(|(event, value)| (MutationKey::new(*event, field), to_value(value)))
        .collect();
    let failed = result
        .failed
        .iter()
        .map(|failure| {
            tracing::debug!(event = %failure.id, detail = %failure.detail, "bulk member failed");
            MutationKey::new(failure.id, field)
        })
        .collect();
    (confirmed, failed)
}

/// Sends everything recorded during this event as one batch. Anonymous
/// sessions drop the batch; the backend ignores their interactions.
fn flush_telemetry(state: &mut DiscoveryState, actions: &mut Vec<Action>) {
    if state.recorder.queued() == 0 {
        return;
    }
    let events = state.recorder.drain();
    if !state.session.authenticated {
        tracing::debug!(count = events.len(), "dropping telemetry for anonymous session");
        return;
    }

    let id = state.next_request_id();
    state.pending.insert(id, PendingRequest::Telemetry { count: events.len() });
    actions.push(Action::Send {
        id,
        request: ApiRequest::record_interactions(events),
    });
}

fn list_sort(state: &DiscoveryState, source: ListSource) -> SortMode {
    match source {
        ListSource::EventsList => state.effective_sort(),
        ListSource::Recommendations => SortMode::Recommended,
    }
}

fn push_timer_commands(actions: &mut Vec<Action>, commands: Vec<TimerCommand>) {
    actions.extend(commands.into_iter().map(|command| match command {
        TimerCommand::Schedule { token, delay } => Action::Schedule { token, delay },
        TimerCommand::Cancel { token } => Action::Cancel { token },
    }));
}

fn not_permitted(capability: Capability) -> Action {
    let err = DiscoveryError::NotPermitted(capability.describe().to_string());
    tracing::debug!(error = %err, "action denied");
    Action::Notify(Notification::warning(NotificationKind::NotPermitted, err.to_string()))
}

fn reject(err: DiscoveryError, actions: &mut Vec<Action>) {
    tracing::debug!(error = %err, "mutation rejected");
    match err {
        DiscoveryError::MutationInFlight { event } => actions.push(Action::Notify(Notification::warning(
            NotificationKind::MutationBusy { event },
            err.to_string(),
        ))),
        DiscoveryError::NotDisplayed { .. } => {}
        other => actions.push(Action::Notify(Notification::error(
            NotificationKind::NotPermitted,
            other.to_string(),
        ))),
    }
}

fn unexpected(response: &ApiResponse) -> ApiFailure {
    ApiFailure::transport(format!("unexpected response {response:?}"))
}
