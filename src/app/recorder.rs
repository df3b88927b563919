//! Best-effort behavioral telemetry.
//!
//! Everything here is fire-and-forget: recording never fails and never
//! blocks. Events accumulate in a bounded queue (oldest dropped on overflow)
//! and the event handler drains it once per render pass into a single
//! analytics batch. Impressions are debounced per list source so a burst of
//! re-renders yields one impression per visible event.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::domain::{EventId, FilterState, InteractionEvent, InteractionKind, ListSource, SortMode};
use crate::infrastructure::{TimerToken, TokenSource};

/// Timer work requested by the recorder; the event handler turns it into actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Schedule { token: TimerToken, delay: Duration },
    Cancel { token: TimerToken },
}

#[derive(Debug, Default)]
struct ImpressionSlot {
    rendered: Vec<EventId>,
    sort: SortMode,
    armed: Option<TimerToken>,
    impressed: Option<Vec<EventId>>,
}

#[derive(Debug)]
pub struct InteractionRecorder {
    queue: VecDeque<InteractionEvent>,
    capacity: usize,
    impression_delay: Duration,
    slots: HashMap<ListSource, ImpressionSlot>,
    mounted: HashMap<EventId, DateTime<Utc>>,
}

impl InteractionRecorder {
    /// Creates a recorder holding at most `capacity` unsent events.
    #[must_use]
    pub fn new(capacity: usize, impression_delay: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            capacity: capacity.max(1),
            impression_delay,
            slots: HashMap::new(),
            mounted: HashMap::new(),
        }
    }

    /// Enqueues an event, dropping the oldest one when the queue is full.
    pub fn record(&mut self, event: InteractionEvent) {
        self.queue.push_back(event);
        while self.queue.len() > self.capacity {
            if let Some(dropped) = self.queue.pop_front() {
                tracing::debug!(kind = dropped.kind.as_str(), "telemetry queue full, dropping oldest event");
            }
        }
    }

    /// Takes every queued event for one batch.
    pub fn drain(&mut self) -> Vec<InteractionEvent> {
        self.queue.drain(..).collect()
    }

    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Notes that `ids` are now rendered for `source` and debounces impressions.
    ///
    /// A re-render of the same ids changes nothing. A different set cancels
    /// any armed timer and arms a fresh one, unless it is exactly the set that
    /// was impressed last.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_discovery::app::recorder::{InteractionRecorder, TimerCommand};
    /// use campus_discovery::domain::{EventId, ListSource, SortMode};
    /// use campus_discovery::infrastructure::TokenSource;
    /// use std::time::Duration;
    ///
    /// let mut recorder = InteractionRecorder::new(200, Duration::from_millis(500));
    /// let mut tokens = TokenSource::default();
    /// let ids = vec![EventId(1), EventId(2)];
    ///
    /// let first = recorder.observe_rendered(ListSource::EventsList, &ids, SortMode::Time, &mut tokens);
    /// assert!(matches!(first.as_slice(), [TimerCommand::Schedule { .. }]));
    ///
    /// let again = recorder.observe_rendered(ListSource::EventsList, &ids, SortMode::Time, &mut tokens);
    /// assert!(again.is_empty());
    /// ```
    pub fn observe_rendered(
        &mut self,
        source: ListSource,
        ids: &[EventId],
        sort: SortMode,
        tokens: &mut TokenSource,
    ) -> Vec<TimerCommand> {
        let mut distinct: Vec<EventId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !distinct.contains(id) {
                distinct.push(*id);
            }
        }

        let slot = self.slots.entry(source).or_default();
        if slot.rendered == distinct && slot.sort == sort {
            return Vec::new();
        }
        slot.rendered = distinct;
        slot.sort = sort;

        let mut commands = Vec::new();
        if let Some(token) = slot.armed.take() {
            commands.push(TimerCommand::Cancel { token });
        }
        let already_impressed = slot.impressed.as_ref() == Some(&slot.rendered);
        if !slot.rendered.is_empty() && !already_impressed {
            let token = tokens.next_token();
            slot.armed = Some(token);
            commands.push(TimerCommand::Schedule {
                token,
                delay: self.impression_delay,
            });
            tracing::trace!(source = source.as_str(), token = token.0, "impression timer armed");
        }
        commands
    }

    /// Handles an expired timer. Returns `false` when the token is not an
    /// impression timer of this recorder.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        let Some((source, slot)) = self
            .slots
            .iter_mut()
            .find(|(_, slot)| slot.armed == Some(token))
        else {
            return false;
        };
        let source = *source;
        slot.armed = None;
        slot.impressed = Some(slot.rendered.clone());

        let sort = slot.sort;
        let events: Vec<InteractionEvent> = slot
            .rendered
            .iter()
            .enumerate()
            .map(|(position, id)| {
                InteractionEvent::for_entity(InteractionKind::Impression, *id)
                    .with("source", source.as_str())
                    .with("sort", sort.as_str())
                    .with("position", position)
            })
            .collect();

        tracing::debug!(source = source.as_str(), count = events.len(), "impressions recorded");
        for event in events {
            self.record(event);
        }
        true
    }

    pub fn click(&mut self, id: EventId, source: ListSource, sort: SortMode, position: usize) {
        self.record(
            InteractionEvent::for_entity(InteractionKind::Click, id)
                .with("source", source.as_str())
                .with("sort", sort.as_str())
                .with("position", position),
        );
    }

    pub fn share(&mut self, id: EventId, channel: &str) {
        self.record(InteractionEvent::for_entity(InteractionKind::Share, id).with("channel", channel));
    }

    /// Records a confirmed favorite. Removing a favorite is not an interaction.
    pub fn favorite(&mut self, id: EventId, is_favorite: bool) {
        if is_favorite {
            self.record(InteractionEvent::for_entity(InteractionKind::Favorite, id));
        }
    }

    pub fn attendance(&mut self, id: EventId, attending: bool) {
        let kind = if attending {
            InteractionKind::Register
        } else {
            InteractionKind::Unregister
        };
        self.record(InteractionEvent::for_entity(kind, id));
    }

    /// Records `search` and `filter` events for a filter-state transition.
    ///
    /// `search` fires when the search text changes to a non-empty value;
    /// `filter` when any other criterion changes. Page moves record nothing.
    pub fn filter_transition(&mut self, previous: &FilterState, next: &FilterState) {
        if next.search != previous.search {
            if let Some(query) = &next.search {
                self.record(
                    InteractionEvent::new(InteractionKind::Search)
                        .with("query", query.as_str())
                        .with("category", optional(next.category.as_deref()))
                        .with("city", optional(next.city.as_deref()))
                        .with("tags", tag_list(next)),
                );
            }
        }

        let filters_changed = next.category != previous.category
            || next.start_date != previous.start_date
            || next.end_date != previous.end_date
            || next.city != previous.city
            || next.location != previous.location
            || next.tags != previous.tags
            || next.sort != previous.sort;
        if filters_changed {
            self.record(
                InteractionEvent::new(InteractionKind::Filter)
                    .with("query", optional(next.search.as_deref()))
                    .with("category", optional(next.category.as_deref()))
                    .with("city", optional(next.city.as_deref()))
                    .with("location", optional(next.location.as_deref()))
                    .with("start_date", json!(next.start_date))
                    .with("end_date", json!(next.end_date))
                    .with("tags", tag_list(next))
                    .with("sort", next.sort.as_str()),
            );
        }
    }

    /// Records a `view` and remembers when the detail view was mounted.
    pub fn view_mounted(&mut self, id: EventId, at: DateTime<Utc>) {
        self.mounted.insert(id, at);
        self.record(InteractionEvent::for_entity(InteractionKind::View, id).at(at));
    }

    /// Records a `dwell` with the whole seconds since mount, floored at zero.
    ///
    /// Unmounting a view that was never mounted records nothing.
    pub fn view_unmounted(&mut self, id: EventId, at: DateTime<Utc>) {
        let Some(mounted_at) = self.mounted.remove(&id) else {
            return;
        };
        let seconds = (at - mounted_at).num_seconds().max(0);
        self.record(
            InteractionEvent::for_entity(InteractionKind::Dwell, id)
                .at(at)
                .with("seconds", seconds),
        );
    }
}

fn optional(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}

fn tag_list(state: &FilterState) -> Value {
    Value::from(state.tags.iter().cloned().collect::<Vec<_>>())
}
