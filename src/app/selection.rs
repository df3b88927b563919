//! Selection of entities for bulk actions.
//!
//! The selection is scoped to the ids of the currently loaded page. Reloading
//! the page intersects the selection with the new ids, so it can never refer
//! to an entity the user cannot see.

use std::collections::BTreeSet;

/// Tri-state summary used to drive a "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Some,
    All,
}

/// Mutable set of selected ids relative to the visible id list.
#[derive(Debug, Clone)]
pub struct SelectionSet<Id> {
    visible: Vec<Id>,
    selected: BTreeSet<Id>,
}

impl<Id> Default for SelectionSet<Id> {
    fn default() -> Self {
        Self {
            visible: Vec::new(),
            selected: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Clone> SelectionSet<Id> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the selection of `id`. Ids outside the visible list are ignored.
    ///
    /// Returns whether anything changed.
    pub fn toggle(&mut self, id: &Id) -> bool {
        if !self.visible.contains(id) {
            return false;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
        true
    }

    /// Selects every visible id, or clears the selection.
    pub fn toggle_all(&mut self, checked: bool) {
        if checked {
            self.selected = self.visible.iter().cloned().collect();
        } else {
            self.selected.clear();
        }
    }

    /// Summarizes the selection against the visible ids.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_discovery::app::selection::{SelectionSet, SelectionState};
    ///
    /// let mut selection = SelectionSet::new();
    /// selection.reload([1, 2, 3]);
    /// assert_eq!(selection.state(), SelectionState::None);
    ///
    /// selection.toggle(&2);
    /// assert_eq!(selection.state(), SelectionState::Some);
    ///
    /// selection.toggle_all(true);
    /// assert_eq!(selection.state(), SelectionState::All);
    /// ```
    #[must_use]
    pub fn state(&self) -> SelectionState {
        if self.selected.is_empty() {
            SelectionState::None
        } else if self.visible_count() > 0 && self.selected.len() == self.visible_count() {
            SelectionState::All
        } else {
            SelectionState::Some
        }
    }

    /// Replaces the visible ids and drops selected ids that are no longer visible.
    pub fn reload<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = Id>,
    {
        let mut seen = BTreeSet::new();
        self.visible = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
        self.selected.retain(|id| seen.contains(id));
    }

    /// Empties the selection, keeping the visible ids.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn is_selected(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids in ascending order.
    pub fn selected(&self) -> impl Iterator<Item = &Id> {
        self.selected.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn visible_count(&self) -> usize {
        self.visible.len()
    }
}
