//! Optimistic, rollback-capable mutations.
//!
//! A mutation writes its proposed value into the displayed data before the
//! server answers, and remembers the value it replaced. When the request
//! completes the intent is settled exactly once: either with the value the
//! server reports, or by restoring the previous value. Overlapping changes to
//! the same key are rejected while an intent is in flight.
//!
//! The controller is generic over the key and value types and never touches
//! the displayed data directly; it goes through an [`OptimisticStore`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use crate::api::RequestId;
use crate::domain::{
    DiscoveryError, EventId, EventStatus, EventSummary, ModerationStatus, Result,
};

/// Read / write access to the values a mutation targets.
pub trait OptimisticStore<K, V> {
    /// Current displayed value for `key`, or `None` when nothing displays it.
    fn value(&self, key: &K) -> Option<V>;

    /// Overwrites the displayed value for `key`.
    fn set_value(&mut self, key: &K, value: V);
}

/// Mutation keys name the entity they belong to, for error reporting.
pub trait EntityKey: Ord + Clone + Debug {
    fn entity(&self) -> EventId;
}

/// One in-flight optimistic change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationIntent<K, V> {
    pub key: K,
    pub previous: V,
    pub proposed: V,
    pub request: RequestId,
}

/// Members of a batch split by whether their optimistic value was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchAdmission<K> {
    pub accepted: Vec<K>,
    pub rejected: Vec<K>,
}

/// Outcome of settling a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport<K> {
    /// Members that took the server's value.
    pub confirmed: Vec<K>,
    /// Members restored to their previous value.
    pub rolled_back: Vec<K>,
}

impl<K> BatchReport<K> {
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.rolled_back.is_empty()
    }
}

/// Tracks in-flight intents and settles them against a store.
#[derive(Debug, Clone)]
pub struct OptimisticMutationController<K, V> {
    in_flight: BTreeMap<K, MutationIntent<K, V>>,
}

impl<K, V> Default for OptimisticMutationController<K, V> {
    fn default() -> Self {
        Self {
            in_flight: BTreeMap::new(),
        }
    }
}

impl<K: EntityKey, V: Clone + Debug> OptimisticMutationController<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `proposed` immediately and records the intent under `request`.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::MutationInFlight`] when `key` already has an
    /// unsettled intent, [`DiscoveryError::NotDisplayed`] when the store does
    /// not hold a value for `key`. The store is untouched in both cases.
    pub fn apply<S>(&mut self, store: &mut S, key: K, proposed: V, request: RequestId) -> Result<()>
    where
        S: OptimisticStore<K, V> + ?Sized,
    {
        if self.in_flight.contains_key(&key) {
            return Err(DiscoveryError::MutationInFlight { event: key.entity() });
        }
        let previous = store
            .value(&key)
            .ok_or(DiscoveryError::NotDisplayed { event: key.entity() })?;

        store.set_value(&key, proposed.clone());
        tracing::debug!(?key, ?previous, ?proposed, request = request.0, "optimistic value applied");
        self.in_flight.insert(
            key.clone(),
            MutationIntent {
                key,
                previous,
                proposed,
                request,
            },
        );
        Ok(())
    }

    /// Settles the intents of `request` with the server's value.
    ///
    /// Returns the settled intents; empty when `request` is unknown.
    pub fn resolve<S>(&mut self, store: &mut S, request: RequestId, server_value: V) -> Vec<MutationIntent<K, V>>
    where
        S: OptimisticStore<K, V> + ?Sized,
    {
        let settled = self.take(request);
        for intent in &settled {
            store.set_value(&intent.key, server_value.clone());
            tracing::debug!(key = ?intent.key, value = ?server_value, "mutation confirmed");
        }
        settled
    }

    /// Restores the previous values of every intent of `request`.
    pub fn rollback<S>(&mut self, store: &mut S, request: RequestId) -> Vec<MutationIntent<K, V>>
    where
        S: OptimisticStore<K, V> + ?Sized,
    {
        let settled = self.take(request);
        for intent in &settled {
            store.set_value(&intent.key, intent.previous.clone());
            tracing::debug!(key = ?intent.key, restored = ?intent.previous, "mutation rolled back");
        }
        settled
    }

    /// Applies the same proposed value to several keys under one request.
    ///
    /// Members that are busy or not displayed are rejected individually; the
    /// rest are applied.
    pub fn apply_batch<S, I>(&mut self, store: &mut S, keys: I, proposed: &V, request: RequestId) -> BatchAdmission<K>
    where
        S: OptimisticStore<K, V> + ?Sized,
        I: IntoIterator<Item = K>,
    {
        let mut admission = BatchAdmission {
            accepted: Vec::new(),
            rejected: Vec::new(),
        };
        for key in keys {
            match self.apply(store, key.clone(), proposed.clone(), request) {
                Ok(()) => admission.accepted.push(key),
                Err(err) => {
                    tracing::debug!(?key, error = %err, "batch member rejected");
                    admission.rejected.push(key);
                }
            }
        }
        admission
    }

    /// Settles a batch with per-member results.
    ///
    /// Confirmed members take their server values. Failed members, and
    /// members the server did not mention at all, are rolled back.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_discovery::api::RequestId;
    /// use campus_discovery::app::mutation::{
    ///     DisplayedEvents, MutationField, MutationKey, MutationValue, OptimisticMutationController,
    /// };
    /// use campus_discovery::domain::{EventId, EventStatus, EventSummary};
    ///
    /// let mut events: Vec<EventSummary> = [3, 7, 9]
    ///     .into_iter()
    ///     .map(|id| {
    ///         let mut event = EventSummary::new(id, "draft");
    ///         event.status = EventStatus::Draft;
    ///         event
    ///     })
    ///     .collect();
    /// let key = |id: u64| MutationKey::new(EventId(id), MutationField::Status);
    /// let publish = MutationValue::Status(EventStatus::Published);
    ///
    /// let mut controller = OptimisticMutationController::new();
    /// let mut store = DisplayedEvents::new([events.as_mut_slice()]);
    /// controller.apply_batch(&mut store, [key(3), key(7), key(9)], &publish, RequestId(1));
    ///
    /// let report = controller.resolve_batch(
    ///     &mut store,
    ///     RequestId(1),
    ///     vec![(key(3), publish.clone()), (key(9), publish.clone())],
    ///     vec![key(7)],
    /// );
    ///
    /// assert_eq!(report.rolled_back, vec![key(7)]);
    /// assert_eq!(events[1].status, EventStatus::Draft);
    /// assert_eq!(events[2].status, EventStatus::Published);
    /// ```
    pub fn resolve_batch<S>(
        &mut self,
        store: &mut S,
        request: RequestId,
        confirmed: Vec<(K, V)>,
        failed: Vec<K>,
    ) -> BatchReport<K>
    where
        S: OptimisticStore<K, V> + ?Sized,
    {
        let mut pending: BTreeMap<K, MutationIntent<K, V>> =
            self.take(request).into_iter().map(|intent| (intent.key.clone(), intent)).collect();
        let failed: BTreeSet<K> = failed.into_iter().collect();

        let mut report = BatchReport {
            confirmed: Vec::new(),
            rolled_back: Vec::new(),
        };
        for (key, value) in confirmed {
            if failed.contains(&key) {
                continue;
            }
            if let Some(intent) = pending.remove(&key) {
                store.set_value(&intent.key, value);
                report.confirmed.push(intent.key);
            }
        }
        for (key, intent) in pending {
            store.set_value(&key, intent.previous);
            report.rolled_back.push(key);
        }

        tracing::debug!(
            request = request.0,
            confirmed = report.confirmed.len(),
            rolled_back = report.rolled_back.len(),
            "batch settled"
        );
        report
    }

    /// Re-writes proposed values of in-flight intents, e.g. after a reload
    /// replaced the displayed data with server state that predates them.
    pub fn reapply<S>(&self, store: &mut S)
    where
        S: OptimisticStore<K, V> + ?Sized,
    {
        for intent in self.in_flight.values() {
            if store.value(&intent.key).is_some() {
                store.set_value(&intent.key, intent.proposed.clone());
            }
        }
    }

    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Whether any intent was registered under `request`.
    #[must_use]
    pub fn owns(&self, request: RequestId) -> bool {
        self.in_flight.values().any(|intent| intent.request == request)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    fn take(&mut self, request: RequestId) -> Vec<MutationIntent<K, V>> {
        let keys: Vec<K> = self
            .in_flight
            .values()
            .filter(|intent| intent.request == request)
            .map(|intent| intent.key.clone())
            .collect();
        keys.iter().filter_map(|key| self.in_flight.remove(key)).collect()
    }
}

/// Mutable field of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MutationField {
    Favorite,
    Attendance,
    Moderation,
    Status,
    Tags,
}

/// Key of an event mutation. Different fields of one event never block each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MutationKey {
    pub event: EventId,
    pub field: MutationField,
}

impl MutationKey {
    #[must_use]
    pub const fn new(event: EventId, field: MutationField) -> Self {
        Self { event, field }
    }
}

impl EntityKey for MutationKey {
    fn entity(&self) -> EventId {
        self.event
    }
}

/// Value written by an event mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationValue {
    Favorite(bool),
    Attendance(bool),
    Moderation(ModerationStatus),
    Status(EventStatus),
    Tags(BTreeSet<String>),
}

impl MutationValue {
    #[must_use]
    pub const fn field(&self) -> MutationField {
        match self {
            Self::Favorite(_) => MutationField::Favorite,
            Self::Attendance(_) => MutationField::Attendance,
            Self::Moderation(_) => MutationField::Moderation,
            Self::Status(_) => MutationField::Status,
            Self::Tags(_) => MutationField::Tags,
        }
    }

    fn read(event: &EventSummary, field: MutationField) -> Self {
        match field {
            MutationField::Favorite => Self::Favorite(event.is_favorite),
            MutationField::Attendance => Self::Attendance(event.attending),
            MutationField::Moderation => Self::Moderation(event.moderation_status),
            MutationField::Status => Self::Status(event.status),
            MutationField::Tags => Self::Tags(event.tags.clone()),
        }
    }

    fn write(self, event: &mut EventSummary) {
        match self {
            Self::Favorite(value) => event.is_favorite = value,
            Self::Attendance(value) => event.attending = value,
            Self::Moderation(value) => event.moderation_status = value,
            Self::Status(value) => event.status = value,
            Self::Tags(value) => event.tags = value,
        }
    }
}

/// Every list of events currently on screen.
///
/// An event shown in several lists (the listing and the rail) is written in
/// all of them.
pub struct DisplayedEvents<'a> {
    lists: Vec<&'a mut [EventSummary]>,
}

impl<'a> DisplayedEvents<'a> {
    pub fn new<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = &'a mut [EventSummary]>,
    {
        Self {
            lists: lists.into_iter().collect(),
        }
    }
}

impl OptimisticStore<MutationKey, MutationValue> for DisplayedEvents<'_> {
    fn value(&self, key: &MutationKey) -> Option<MutationValue> {
        self.lists
            .iter()
            .flat_map(|list| list.iter())
            .find(|event| event.id == key.event)
            .map(|event| MutationValue::read(event, key.field))
    }

    fn set_value(&mut self, key: &MutationKey, value: MutationValue) {
        for event in self
            .lists
            .iter_mut()
            .flat_map(|list| list.iter_mut())
            .filter(|event| event.id == key.event)
        {
            value.clone().write(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Controller = OptimisticMutationController<MutationKey, MutationValue>;

    fn favorite(id: u64) -> MutationKey {
        MutationKey::new(EventId(id), MutationField::Favorite)
    }

    fn events(ids: &[u64]) -> Vec<EventSummary> {
        ids.iter().map(|id| EventSummary::new(*id, format!("event {id}"))).collect()
    }

    #[test]
    fn failed_mutation_restores_previous_value() {
        let mut list = events(&[42]);
        let mut controller = Controller::new();
        {
            let mut store = DisplayedEvents::new([list.as_mut_slice()]);
            controller
                .apply(&mut store, favorite(42), MutationValue::Favorite(true), RequestId(1))
                .expect("displayed and idle");
        }
        assert!(list[0].is_favorite);

        let mut store = DisplayedEvents::new([list.as_mut_slice()]);
        let settled = controller.rollback(&mut store, RequestId(1));

        assert_eq!(settled.len(), 1);
        assert!(!list[0].is_favorite);
        assert!(controller.is_empty());
    }

    #[test]
    fn server_value_wins_over_proposed() {
        let mut list = events(&[1]);
        let mut controller = Controller::new();
        let mut store = DisplayedEvents::new([list.as_mut_slice()]);

        controller
            .apply(&mut store, favorite(1), MutationValue::Favorite(true), RequestId(5))
            .expect("apply");
        controller.resolve(&mut store, RequestId(5), MutationValue::Favorite(false));

        assert_eq!(store.value(&favorite(1)), Some(MutationValue::Favorite(false)));
    }

    #[test]
    fn overlapping_change_is_rejected_without_touching_the_value() {
        let mut list = events(&[1]);
        let mut controller = Controller::new();
        let mut store = DisplayedEvents::new([list.as_mut_slice()]);

        controller
            .apply(&mut store, favorite(1), MutationValue::Favorite(true), RequestId(1))
            .expect("first apply");
        let second = controller.apply(&mut store, favorite(1), MutationValue::Favorite(false), RequestId(2));

        assert!(matches!(second, Err(DiscoveryError::MutationInFlight { event }) if event == EventId(1)));
        assert_eq!(store.value(&favorite(1)), Some(MutationValue::Favorite(true)));
    }

    #[test]
    fn different_fields_of_one_event_do_not_block() {
        let mut list = events(&[1]);
        let mut controller = Controller::new();
        let mut store = DisplayedEvents::new([list.as_mut_slice()]);

        controller
            .apply(&mut store, favorite(1), MutationValue::Favorite(true), RequestId(1))
            .expect("favorite");
        controller
            .apply(
                &mut store,
                MutationKey::new(EventId(1), MutationField::Attendance),
                MutationValue::Attendance(true),
                RequestId(2),
            )
            .expect("attendance");

        assert_eq!(controller.len(), 2);
    }

    #[test]
    fn missing_entity_is_reported() {
        let mut list = events(&[1]);
        let mut controller = Controller::new();
        let mut store = DisplayedEvents::new([list.as_mut_slice()]);

        let result = controller.apply(&mut store, favorite(2), MutationValue::Favorite(true), RequestId(1));

        assert!(matches!(result, Err(DiscoveryError::NotDisplayed { .. })));
        assert!(controller.is_empty());
    }

    #[test]
    fn unmentioned_batch_members_are_rolled_back() {
        let mut list = events(&[3, 7]);
        let mut controller = Controller::new();
        let mut store = DisplayedEvents::new([list.as_mut_slice()]);
        let status = |id| MutationKey::new(EventId(id), MutationField::Status);
        let draft = MutationValue::Status(EventStatus::Draft);

        let admission = controller.apply_batch(&mut store, [status(3), status(7)], &draft, RequestId(9));
        assert_eq!(admission.accepted.len(), 2);

        let report = controller.resolve_batch(&mut store, RequestId(9), vec![(status(3), draft.clone())], vec![]);

        assert_eq!(report.confirmed, vec![status(3)]);
        assert_eq!(report.rolled_back, vec![status(7)]);
        assert!(!report.is_complete_success());
        assert_eq!(store.value(&status(7)), Some(MutationValue::Status(EventStatus::Published)));
    }

    #[test]
    fn busy_batch_member_is_rejected_individually() {
        let mut list = events(&[1, 2]);
        let mut controller = Controller::new();
        let mut store = DisplayedEvents::new([list.as_mut_slice()]);
        let tags = |id| MutationKey::new(EventId(id), MutationField::Tags);
        let proposed = MutationValue::Tags(BTreeSet::from(["ai".to_string()]));

        controller
            .apply(&mut store, tags(2), proposed.clone(), RequestId(1))
            .expect("first");
        let admission = controller.apply_batch(&mut store, [tags(1), tags(2)], &proposed, RequestId(2));

        assert_eq!(admission.accepted, vec![tags(1)]);
        assert_eq!(admission.rejected, vec![tags(2)]);
    }

    #[test]
    fn reapply_restores_proposed_values_after_reload() {
        let mut controller = Controller::new();
        let mut list = events(&[1]);
        {
            let mut store = DisplayedEvents::new([list.as_mut_slice()]);
            controller
                .apply(&mut store, favorite(1), MutationValue::Favorite(true), RequestId(1))
                .expect("apply");
        }

        let mut reloaded = events(&[1, 2]);
        let mut store = DisplayedEvents::new([reloaded.as_mut_slice()]);
        controller.reapply(&mut store);

        assert!(reloaded[0].is_favorite);
        assert!(!reloaded[1].is_favorite);
    }

    #[test]
    fn writes_reach_every_list_showing_the_event() {
        let mut listing = events(&[1, 2]);
        let mut rail = events(&[2]);
        let mut controller = Controller::new();
        let mut store = DisplayedEvents::new([listing.as_mut_slice(), rail.as_mut_slice()]);

        controller
            .apply(&mut store, favorite(2), MutationValue::Favorite(true), RequestId(1))
            .expect("apply");

        assert!(listing[1].is_favorite);
        assert!(rail[0].is_favorite);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn tag_sets() -> impl Strategy<Value = BTreeSet<String>> {
            prop::collection::btree_set("[a-z]{1,6}", 0..4)
        }

        proptest! {
            #[test]
            fn rollback_restores_the_exact_prior_value(initial in tag_sets(), proposed in tag_sets()) {
                let mut list = events(&[5]);
                list[0].tags = initial.clone();
                let key = MutationKey::new(EventId(5), MutationField::Tags);
                let mut controller = Controller::new();

                let mut store = DisplayedEvents::new([list.as_mut_slice()]);
                controller
                    .apply(&mut store, key, MutationValue::Tags(proposed), RequestId(1))
                    .expect("displayed and idle");
                controller.rollback(&mut store, RequestId(1));
                drop(store);

                prop_assert_eq!(&list[0].tags, &initial);
                prop_assert!(controller.is_empty());
            }

            #[test]
            fn failed_batch_members_keep_their_prior_status(failing in prop::collection::btree_set(1u64..=6, 0..6)) {
                let mut list = events(&[1, 2, 3, 4, 5, 6]);
                for (index, event) in list.iter_mut().enumerate() {
                    event.status = if index % 2 == 0 { EventStatus::Draft } else { EventStatus::Published };
                }
                let before = list.clone();
                let keys: Vec<MutationKey> = (1..=6).map(|id| MutationKey::new(EventId(id), MutationField::Status)).collect();
                let mut controller = Controller::new();

                let mut store = DisplayedEvents::new([list.as_mut_slice()]);
                let admission =
                    controller.apply_batch(&mut store, keys.clone(), &MutationValue::Status(EventStatus::Published), RequestId(7));
                prop_assert_eq!(admission.accepted.len(), 6);
                let confirmed = keys
                    .iter()
                    .filter(|key| !failing.contains(&key.event.0))
                    .map(|key| (*key, MutationValue::Status(EventStatus::Published)))
                    .collect();
                let failed = keys.iter().filter(|key| failing.contains(&key.event.0)).copied().collect();
                let report = controller.resolve_batch(&mut store, RequestId(7), confirmed, failed);
                drop(store);

                prop_assert_eq!(report.rolled_back.len(), failing.len());
                for (event, prior) in list.iter().zip(&before) {
                    if failing.contains(&event.id.0) {
                        prop_assert_eq!(event.status, prior.status);
                    } else {
                        prop_assert_eq!(event.status, EventStatus::Published);
                    }
                }
            }
        }
    }
}
