//! Cancellation-safe loading of the paginated listing and the recommendation rail.
//!
//! Every load is tagged with a [`Generation`]. Only a completion carrying the
//! latest generation may touch the displayed results; anything older is
//! discarded, whatever order the responses arrive in. Cancellation is purely
//! logical: the request still completes, its result is just ignored.

use crate::domain::{ApiFailure, ResultPage};

/// Per-load token; strictly increasing within one fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// Result of handing a completion to [`ResultFetcher::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A newer load was issued; the completion was discarded.
    Stale,
    /// The page was applied. `items_changed` is false when the ordered item
    /// ids are identical to the previously displayed page.
    Applied { items_changed: bool },
    /// The load failed; previous results remain displayed.
    Failed(ApiFailure),
}

/// Items that carry a stable identity.
pub trait Identified {
    type Id: Clone + Eq;

    fn identity(&self) -> Self::Id;
}

impl Identified for crate::domain::EventSummary {
    type Id = crate::domain::EventId;

    fn identity(&self) -> Self::Id {
        self.id
    }
}

/// Loader state for the paginated listing.
#[derive(Debug, Clone)]
pub struct ResultFetcher<T> {
    latest: Generation,
    loading: bool,
    current: Option<ResultPage<T>>,
}

impl<T> Default for ResultFetcher<T> {
    fn default() -> Self {
        Self {
            latest: Generation(0),
            loading: false,
            current: None,
        }
    }
}

impl<T: Identified> ResultFetcher<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load and returns its generation.
    ///
    /// Issuing a new load cancels interest in every earlier one.
    pub fn begin(&mut self) -> Generation {
        self.latest = Generation(self.latest.0 + 1);
        self.loading = true;
        tracing::debug!(generation = self.latest.0, "load started");
        self.latest
    }

    /// Applies or discards a completed load.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_discovery::app::fetcher::{LoadOutcome, ResultFetcher};
    /// use campus_discovery::domain::{EventSummary, ResultPage};
    ///
    /// let mut fetcher = ResultFetcher::new();
    /// let first = fetcher.begin();
    /// let second = fetcher.begin();
    ///
    /// let newer = ResultPage::new(vec![EventSummary::new(2, "newer")], 1, 1, 12);
    /// let older = ResultPage::new(vec![EventSummary::new(1, "older")], 1, 1, 12);
    ///
    /// assert_eq!(fetcher.complete(second, Ok(newer)), LoadOutcome::Applied { items_changed: true });
    /// assert_eq!(fetcher.complete(first, Ok(older)), LoadOutcome::Stale);
    /// assert_eq!(fetcher.items()[0].title, "newer");
    /// ```
    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: std::result::Result<ResultPage<T>, ApiFailure>,
    ) -> LoadOutcome {
        if generation != self.latest {
            tracing::debug!(
                generation = generation.0,
                latest = self.latest.0,
                "discarding superseded load"
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;

        match outcome {
            Ok(page) => {
                let items_changed = self.current.as_ref().map_or(true, |current| {
                    !same_identities(&current.items, &page.items)
                });
                tracing::debug!(
                    generation = generation.0,
                    items = page.items.len(),
                    total = page.total,
                    items_changed,
                    "load applied"
                );
                self.current = Some(page);
                LoadOutcome::Applied { items_changed }
            }
            Err(failure) => {
                tracing::debug!(generation = generation.0, error = %failure, "load failed, keeping previous results");
                LoadOutcome::Failed(failure)
            }
        }
    }

    /// Whether the latest load is still in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn latest(&self) -> Generation {
        self.latest
    }

    /// The displayed page, if any load has succeeded.
    #[must_use]
    pub const fn page(&self) -> Option<&ResultPage<T>> {
        self.current.as_ref()
    }

    /// Displayed items, empty before the first successful load.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.current.as_ref().map_or(&[], |page| page.items.as_slice())
    }

    /// Mutable access to displayed items, used to apply optimistic values.
    pub fn items_mut(&mut self) -> &mut [T] {
        self.current
            .as_mut()
            .map_or(&mut [], |page| page.items.as_mut_slice())
    }

    /// Ids of the displayed items, in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<T::Id> {
        self.items().iter().map(Identified::identity).collect()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.current.as_ref().map_or(0, |page| page.total)
    }

    #[must_use]
    pub fn pages(&self) -> u64 {
        self.current.as_ref().map_or(0, ResultPage::pages)
    }
}

fn same_identities<T: Identified>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.identity() == y.identity())
}

/// Loader state for the capped "recommended for you" rail.
///
/// Failures never surface: the rail simply becomes empty.
#[derive(Debug, Clone)]
pub struct RecommendationRail<T> {
    latest: Generation,
    capacity: usize,
    items: Vec<T>,
}

impl<T: Identified> RecommendationRail<T> {
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            latest: Generation(0),
            capacity,
            items: Vec::new(),
        }
    }

    /// Maximum number of items shown.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn begin(&mut self) -> Generation {
        self.latest = Generation(self.latest.0 + 1);
        self.latest
    }

    /// Applies a completed rail request. Returns whether the items changed.
    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: std::result::Result<Vec<T>, ApiFailure>,
    ) -> bool {
        if generation != self.latest {
            return false;
        }
        let mut items = match outcome {
            Ok(items) => items,
            Err(failure) => {
                tracing::debug!(error = %failure, "recommendations unavailable, showing empty rail");
                Vec::new()
            }
        };
        items.truncate(self.capacity);

        let changed = !same_identities(&self.items, &items);
        self.items = items;
        changed
    }

    /// Empties the rail and invalidates any request in flight.
    pub fn clear(&mut self) {
        self.latest = Generation(self.latest.0 + 1);
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    #[must_use]
    pub fn ids(&self) -> Vec<T::Id> {
        self.items.iter().map(Identified::identity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventSummary;

    fn page(ids: &[u64], total: u64) -> ResultPage<EventSummary> {
        ResultPage::new(
            ids.iter().map(|id| EventSummary::new(*id, format!("event {id}"))).collect(),
            total,
            1,
            12,
        )
    }

    #[test]
    fn later_call_wins_when_it_resolves_first() {
        let mut fetcher = ResultFetcher::new();
        let t1 = fetcher.begin();
        let t2 = fetcher.begin();

        assert!(matches!(fetcher.complete(t2, Ok(page(&[2], 1))), LoadOutcome::Applied { .. }));
        assert_eq!(fetcher.complete(t1, Ok(page(&[1], 1))), LoadOutcome::Stale);
        assert_eq!(fetcher.ids(), vec![2.into()]);
    }

    #[test]
    fn later_call_wins_when_it_resolves_last() {
        let mut fetcher = ResultFetcher::new();
        let t1 = fetcher.begin();
        let t2 = fetcher.begin();

        assert_eq!(fetcher.complete(t1, Ok(page(&[1], 1))), LoadOutcome::Stale);
        assert!(fetcher.is_loading());
        assert!(matches!(fetcher.complete(t2, Ok(page(&[2], 1))), LoadOutcome::Applied { .. }));
        assert!(!fetcher.is_loading());
        assert_eq!(fetcher.ids(), vec![2.into()]);
    }

    #[test]
    fn failure_keeps_previous_results() {
        let mut fetcher = ResultFetcher::new();
        let t1 = fetcher.begin();
        fetcher.complete(t1, Ok(page(&[1, 2], 30)));

        let t2 = fetcher.begin();
        let outcome = fetcher.complete(t2, Err(ApiFailure::http(500, "boom")));

        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(fetcher.ids(), vec![1.into(), 2.into()]);
        assert_eq!(fetcher.total(), 30);
        assert_eq!(fetcher.pages(), 3);
    }

    #[test]
    fn unchanged_item_set_is_reported() {
        let mut fetcher = ResultFetcher::new();
        let t1 = fetcher.begin();
        fetcher.complete(t1, Ok(page(&[1, 2], 2)));
        let t2 = fetcher.begin();

        assert_eq!(
            fetcher.complete(t2, Ok(page(&[1, 2], 2))),
            LoadOutcome::Applied { items_changed: false }
        );
    }

    #[test]
    fn rail_is_capped_and_degrades_to_empty() {
        let mut rail = RecommendationRail::new(2);
        let g1 = rail.begin();
        assert!(rail.complete(g1, Ok(page(&[1, 2, 3], 3).items)));
        assert_eq!(rail.ids(), vec![1.into(), 2.into()]);

        let g2 = rail.begin();
        assert!(rail.complete(g2, Err(ApiFailure::transport("offline"))));
        assert!(rail.items().is_empty());
    }

    #[test]
    fn cleared_rail_ignores_in_flight_response() {
        let mut rail = RecommendationRail::new(4);
        let g1 = rail.begin();
        rail.clear();

        assert!(!rail.complete(g1, Ok(page(&[1], 1).items)));
        assert!(rail.items().is_empty());
    }
}
