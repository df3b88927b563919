//! Structured search, sort and pagination state of the event listing.
//!
//! [`FilterState`] is the decoded form of the URL query string. It is never
//! edited in place by the rest of the crate: changes are expressed as a
//! [`FilterPatch`] and applied through [`crate::app::codec::encode`], which
//! enforces the page-reset rule and canonical-minimal encoding.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Page shown when the query does not name one.
pub const DEFAULT_PAGE: u32 = 1;

/// Ordering of the event listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Chronological by start time.
    #[default]
    Time,
    /// Server-side personalized ranking.
    Recommended,
}

impl SortMode {
    /// Query-string label of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Recommended => "recommended",
        }
    }

    /// Parses a query-string label. Anything but `recommended` is `Time`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("recommended") {
            Self::Recommended
        } else {
            Self::Time
        }
    }
}

/// Allowed page sizes of the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum PageSize {
    Six,
    #[default]
    Twelve,
    TwentyFour,
    FortyEight,
}

impl PageSize {
    /// Every allowed size, smallest first.
    pub const ALL: [Self; 4] = [Self::Six, Self::Twelve, Self::TwentyFour, Self::FortyEight];

    /// Number of items per page.
    #[must_use]
    pub const fn get(self) -> u32 {
        match self {
            Self::Six => 6,
            Self::Twelve => 12,
            Self::TwentyFour => 24,
            Self::FortyEight => 48,
        }
    }

    /// Returns the size matching `value`, if it is one of the allowed sizes.
    #[must_use]
    pub const fn from_count(value: u32) -> Option<Self> {
        match value {
            6 => Some(Self::Six),
            12 => Some(Self::Twelve),
            24 => Some(Self::TwentyFour),
            48 => Some(Self::FortyEight),
            _ => None,
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl TryFrom<u32> for PageSize {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        Self::from_count(value).ok_or_else(|| format!("unsupported page size {value}"))
    }
}

/// All active search, sort and pagination parameters of the listing.
///
/// Text fields hold trimmed, non-empty values or `None`; `tags` is a sorted
/// set so two states with the same tags compare equal regardless of the
/// order they were typed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    pub search: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub tags: BTreeSet<String>,
    pub sort: SortMode,
    pub page: u32,
    pub page_size: PageSize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            start_date: None,
            end_date: None,
            city: None,
            location: None,
            tags: BTreeSet::new(),
            sort: SortMode::Time,
            page: DEFAULT_PAGE,
            page_size: PageSize::Twelve,
        }
    }
}

impl FilterState {
    /// Returns true when `other` selects the same events, ignoring pagination.
    #[must_use]
    pub fn same_criteria(&self, other: &Self) -> bool {
        self.search == other.search
            && self.category == other.category
            && self.start_date == other.start_date
            && self.end_date == other.end_date
            && self.city == other.city
            && self.location == other.location
            && self.tags == other.tags
            && self.sort == other.sort
    }

    /// Returns true when any narrowing criterion other than the search text is set.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        self.category.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.city.is_some()
            || self.location.is_some()
            || !self.tags.is_empty()
    }
}

/// Normalizes free text: trims and maps blank input to `None`.
#[must_use]
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalizes a tag collection: splits each entry on commas, trims the
/// pieces and drops blanks. Commas separate tags in the URL, so no tag may
/// contain one.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .flat_map(|tag| tag.as_ref().split(',').filter_map(normalize_text).collect::<Vec<_>>())
        .collect()
}

/// A partial update of [`FilterState`].
///
/// `None` leaves a field untouched. For text fields an empty string clears
/// the field; for dates `Some(None)` clears it; an empty tag set clears the
/// tags.
///
/// # Examples
///
/// ```
/// use campus_discovery::domain::FilterPatch;
///
/// let patch = FilterPatch::new().search("hackathon").city("Cluj");
/// assert!(patch.touches_criteria());
/// assert!(FilterPatch::new().page(3).page.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub sort: Option<SortMode>,
    pub page: Option<u32>,
    pub page_size: Option<PageSize>,
}

impl FilterPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = Some(value.into());
        self
    }

    #[must_use]
    pub fn category(mut self, value: impl Into<String>) -> Self {
        self.category = Some(value.into());
        self
    }

    #[must_use]
    pub fn start_date(mut self, value: Option<NaiveDate>) -> Self {
        self.start_date = Some(value);
        self
    }

    #[must_use]
    pub fn end_date(mut self, value: Option<NaiveDate>) -> Self {
        self.end_date = Some(value);
        self
    }

    #[must_use]
    pub fn city(mut self, value: impl Into<String>) -> Self {
        self.city = Some(value.into());
        self
    }

    #[must_use]
    pub fn location(mut self, value: impl Into<String>) -> Self {
        self.location = Some(value.into());
        self
    }

    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = Some(normalize_tags(tags));
        self
    }

    #[must_use]
    pub fn sort(mut self, value: SortMode) -> Self {
        self.sort = Some(value);
        self
    }

    #[must_use]
    pub fn page(mut self, value: u32) -> Self {
        self.page = Some(value);
        self
    }

    #[must_use]
    pub fn page_size(mut self, value: PageSize) -> Self {
        self.page_size = Some(value);
        self
    }

    /// Returns true when the patch supplies any field other than `page`.
    ///
    /// Such a patch moves the listing back to the first page unless it also
    /// names a page.
    #[must_use]
    pub fn touches_criteria(&self) -> bool {
        self.search.is_some()
            || self.category.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.city.is_some()
            || self.location.is_some()
            || self.tags.is_some()
            || self.sort.is_some()
            || self.page_size.is_some()
    }

    /// Returns true when the patch supplies nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.touches_criteria() && self.page.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_accepts_only_allowed_counts() {
        for size in PageSize::ALL {
            assert_eq!(PageSize::from_count(size.get()), Some(size));
        }
        assert_eq!(PageSize::from_count(10), None);
        assert_eq!(PageSize::from_count(0), None);
    }

    #[test]
    fn sort_parsing_defaults_to_time() {
        assert_eq!(SortMode::parse_lenient("recommended"), SortMode::Recommended);
        assert_eq!(SortMode::parse_lenient(" Recommended "), SortMode::Recommended);
        assert_eq!(SortMode::parse_lenient("relevance"), SortMode::Time);
        assert_eq!(SortMode::parse_lenient(""), SortMode::Time);
    }

    #[test]
    fn same_criteria_ignores_pagination() {
        let base = FilterState {
            search: Some("jazz".to_string()),
            ..FilterState::default()
        };
        let paged = FilterState {
            page: 4,
            page_size: PageSize::FortyEight,
            ..base.clone()
        };
        let other = FilterState {
            city: Some("Iasi".to_string()),
            ..base.clone()
        };

        assert!(base.same_criteria(&paged));
        assert!(!base.same_criteria(&other));
    }

    #[test]
    fn page_only_patch_does_not_touch_criteria() {
        assert!(!FilterPatch::new().page(2).touches_criteria());
        assert!(FilterPatch::new().page_size(PageSize::Six).touches_criteria());
        assert!(FilterPatch::new().is_empty());
    }

    #[test]
    fn tag_normalization_trims_and_drops_blanks() {
        let tags = normalize_tags([" ai ", "", "tech", "ai"]);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["ai", "tech"]);
    }

    #[test]
    fn tags_never_keep_a_comma() {
        let tags = normalize_tags(["rust, go", ",", "c,c++"]);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["c", "c++", "go", "rust"]);
    }
}
