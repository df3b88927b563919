//! Bidirectional mapping between [`FilterState`] and URL query parameters.
//!
//! The query string is the shareable, bookmarkable carrier of the listing
//! state. [`decode`] is total: unknown keys are ignored and malformed values
//! fall back to defaults. [`encode`] merges a [`FilterPatch`] over the current
//! state and emits the canonical-minimal parameter set, where every empty or
//! default-valued field is omitted.

use chrono::NaiveDate;

use crate::domain::filter::{normalize_tags, normalize_text, DEFAULT_PAGE};
use crate::domain::{FilterPatch, FilterState, PageSize, SortMode};
use crate::infrastructure::query::{parse_query, to_query_string, QueryParams};

pub const KEY_SEARCH: &str = "search";
pub const KEY_CATEGORY: &str = "category";
pub const KEY_START_DATE: &str = "start_date";
pub const KEY_END_DATE: &str = "end_date";
pub const KEY_CITY: &str = "city";
pub const KEY_LOCATION: &str = "location";
pub const KEY_TAGS: &str = "tags";
pub const KEY_SORT: &str = "sort";
pub const KEY_PAGE: &str = "page";
pub const KEY_PAGE_SIZE: &str = "page_size";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decodes query parameters into a filter state.
///
/// Never fails. Text is trimmed and blank values are treated as absent,
/// dates must be `YYYY-MM-DD`, tags are comma-separated, `page` must be a
/// positive integer (default 1) and `page_size` one of 6, 12, 24 or 48
/// (default 12).
///
/// # Examples
///
/// ```
/// use campus_discovery::app::codec::decode;
/// use campus_discovery::domain::{PageSize, SortMode};
/// use campus_discovery::infrastructure::parse_query;
///
/// let state = decode(&parse_query("search=hackathon&page=abc&page_size=10&sort=oops"));
/// assert_eq!(state.search.as_deref(), Some("hackathon"));
/// assert_eq!(state.page, 1);
/// assert_eq!(state.page_size, PageSize::Twelve);
/// assert_eq!(state.sort, SortMode::Time);
/// ```
#[must_use]
pub fn decode(params: &QueryParams) -> FilterState {
    let text = |key: &str| params.get(key).and_then(|value| normalize_text(value));
    let date = |key: &str| {
        params
            .get(key)
            .and_then(|value| NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok())
    };

    let page = params
        .get(KEY_PAGE)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(DEFAULT_PAGE);

    let page_size = params
        .get(KEY_PAGE_SIZE)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .and_then(PageSize::from_count)
        .unwrap_or_default();

    FilterState {
        search: text(KEY_SEARCH),
        category: text(KEY_CATEGORY),
        start_date: date(KEY_START_DATE),
        end_date: date(KEY_END_DATE),
        city: text(KEY_CITY),
        location: text(KEY_LOCATION),
        tags: params
            .get(KEY_TAGS)
            .map(|raw| normalize_tags(raw.split(',')))
            .unwrap_or_default(),
        sort: params
            .get(KEY_SORT)
            .map(|raw| SortMode::parse_lenient(raw))
            .unwrap_or_default(),
        page,
        page_size,
    }
}

/// Decodes a raw query string. See [`decode`].
#[must_use]
pub fn decode_query(raw: &str) -> FilterState {
    decode(&parse_query(raw))
}

/// Returns true when the parameters carry an explicit sort choice.
#[must_use]
pub fn has_explicit_sort(params: &QueryParams) -> bool {
    params.get(KEY_SORT).is_some_and(|raw| !raw.trim().is_empty())
}

/// Merges `patch` over `current` and encodes the result.
///
/// A patch that supplies any field other than `page` moves the listing back
/// to page 1 unless it also supplies `page`. The output omits every field
/// whose value is empty or equal to its default.
///
/// # Examples
///
/// ```
/// use campus_discovery::app::codec::encode;
/// use campus_discovery::domain::{FilterPatch, FilterState};
///
/// let current = FilterState { page: 4, ..FilterState::default() };
///
/// let params = encode(&FilterPatch::new().city("Cluj"), &current);
/// assert_eq!(params.get("city").map(String::as_str), Some("Cluj"));
/// assert!(params.get("page").is_none());
///
/// let params = encode(&FilterPatch::new().page(5), &current);
/// assert_eq!(params.get("page").map(String::as_str), Some("5"));
/// ```
#[must_use]
pub fn encode(patch: &FilterPatch, current: &FilterState) -> QueryParams {
    to_params(&merge(patch, current))
}

/// Like [`encode`] but returns the serialized query string.
#[must_use]
pub fn encode_query(patch: &FilterPatch, current: &FilterState) -> String {
    to_query_string(&encode(patch, current))
}

/// Applies `patch` to `current` without encoding.
///
/// Text and tag values go through the same normalization as [`decode`], so
/// `merge` followed by [`to_params`] and [`decode`] is lossless.
#[must_use]
pub fn merge(patch: &FilterPatch, current: &FilterState) -> FilterState {
    let mut next = current.clone();

    if let Some(search) = &patch.search {
        next.search = normalize_text(search);
    }
    if let Some(category) = &patch.category {
        next.category = normalize_text(category);
    }
    if let Some(start_date) = patch.start_date {
        next.start_date = start_date;
    }
    if let Some(end_date) = patch.end_date {
        next.end_date = end_date;
    }
    if let Some(city) = &patch.city {
        next.city = normalize_text(city);
    }
    if let Some(location) = &patch.location {
        next.location = normalize_text(location);
    }
    if let Some(tags) = &patch.tags {
        next.tags = normalize_tags(tags);
    }
    if let Some(sort) = patch.sort {
        next.sort = sort;
    }
    if let Some(page_size) = patch.page_size {
        next.page_size = page_size;
    }

    next.page = match patch.page {
        Some(page) => page.max(DEFAULT_PAGE),
        None if patch.touches_criteria() => DEFAULT_PAGE,
        None => next.page.max(DEFAULT_PAGE),
    };

    next
}

/// Encodes a complete state into its canonical-minimal parameter set.
#[must_use]
pub fn to_params(state: &FilterState) -> QueryParams {
    let mut params = QueryParams::new();

    let mut put = |key: &str, value: Option<String>| {
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            params.insert(key.to_string(), value);
        }
    };

    put(KEY_SEARCH, state.search.clone());
    put(KEY_CATEGORY, state.category.clone());
    put(KEY_START_DATE, state.start_date.map(|date| date.format(DATE_FORMAT).to_string()));
    put(KEY_END_DATE, state.end_date.map(|date| date.format(DATE_FORMAT).to_string()));
    put(KEY_CITY, state.city.clone());
    put(KEY_LOCATION, state.location.clone());
    put(
        KEY_TAGS,
        Some(state.tags.iter().map(String::as_str).collect::<Vec<_>>().join(",")),
    );
    put(
        KEY_SORT,
        (state.sort != SortMode::default()).then(|| state.sort.as_str().to_string()),
    );
    put(KEY_PAGE, (state.page > DEFAULT_PAGE).then(|| state.page.to_string()));
    put(
        KEY_PAGE_SIZE,
        (state.page_size != PageSize::default()).then(|| state.page_size.get().to_string()),
    );

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn hackathon_search_round_trips_with_defaults() {
        let params = encode(&FilterPatch::new().search("hackathon").page(1), &FilterState::default());
        let decoded = decode(&params);

        assert_eq!(params.len(), 1);
        assert_eq!(
            decoded,
            FilterState {
                search: Some("hackathon".to_string()),
                page: 1,
                page_size: PageSize::Twelve,
                sort: SortMode::Time,
                ..FilterState::default()
            }
        );
    }

    #[test]
    fn comma_in_a_tag_splits_it_before_encoding() {
        let merged = merge(&FilterPatch::new().tags(["c,c++"]), &FilterState::default());

        assert_eq!(merged.tags.iter().map(String::as_str).collect::<Vec<_>>(), vec!["c", "c++"]);
        assert_eq!(decode(&to_params(&merged)), merged);
    }

    #[test]
    fn default_state_encodes_to_nothing() {
        assert!(to_params(&FilterState::default()).is_empty());
        assert_eq!(encode_query(&FilterPatch::new(), &FilterState::default()), "");
    }

    #[test]
    fn blank_values_clear_fields() {
        let current = FilterState {
            city: Some("Iasi".to_string()),
            tags: ["ai".to_string()].into_iter().collect(),
            start_date: Some(date(2026, 3, 1)),
            ..FilterState::default()
        };

        let params = encode(
            &FilterPatch::new().city("   ").tags(Vec::<String>::new()).start_date(None),
            &current,
        );

        assert!(params.is_empty());
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let state = decode_query("page=-2&page_size=13&start_date=2026-02-30&end_date=tomorrow&unknown=1");

        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn zero_page_decodes_to_first_page() {
        assert_eq!(decode_query("page=0").page, 1);
    }

    #[test]
    fn tags_round_trip_regardless_of_order() {
        let a = decode_query("tags=tech,ai,%20music");
        let b = decode_query("tags=music,tech,ai");

        assert_eq!(a, b);
        assert_eq!(to_params(&a).get(KEY_TAGS).map(String::as_str), Some("ai,music,tech"));
    }

    #[test]
    fn page_size_change_resets_page() {
        let current = FilterState {
            page: 3,
            ..FilterState::default()
        };

        let params = encode(&FilterPatch::new().page_size(PageSize::TwentyFour), &current);

        assert_eq!(params.get(KEY_PAGE), None);
        assert_eq!(params.get(KEY_PAGE_SIZE).map(String::as_str), Some("24"));
    }

    #[test]
    fn explicit_page_survives_criteria_change() {
        let current = FilterState {
            page: 3,
            ..FilterState::default()
        };

        let params = encode(&FilterPatch::new().category("music").page(2), &current);

        assert_eq!(params.get(KEY_PAGE).map(String::as_str), Some("2"));
    }

    #[test]
    fn explicit_sort_detection() {
        assert!(has_explicit_sort(&parse_query("sort=time")));
        assert!(!has_explicit_sort(&parse_query("sort=&page=2")));
        assert!(!has_explicit_sort(&parse_query("")));
    }

    fn arb_text() -> impl Strategy<Value = Option<String>> {
        prop::option::of("[ a-zA-Z0-9,&=+%]{0,12}")
    }

    fn arb_date() -> impl Strategy<Value = Option<NaiveDate>> {
        prop::option::of((2020i32..2030, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| date(y, m, d)))
    }

    fn arb_state() -> impl Strategy<Value = FilterState> {
        (
            (arb_text(), arb_text(), arb_date(), arb_date(), arb_text(), arb_text()),
            prop::collection::vec("[ a-z0-9,+]{0,6}", 0..4),
            prop_oneof![Just(SortMode::Time), Just(SortMode::Recommended)],
            0u32..50,
            prop::sample::select(PageSize::ALL.to_vec()),
        )
            .prop_map(|((search, category, start_date, end_date, city, location), tags, sort, page, page_size)| {
                FilterState {
                    search,
                    category,
                    start_date,
                    end_date,
                    city,
                    location,
                    tags: tags.into_iter().collect::<BTreeSet<_>>(),
                    sort,
                    page,
                    page_size,
                }
            })
    }

    fn normalize(state: &FilterState) -> FilterState {
        FilterState {
            search: state.search.as_deref().and_then(normalize_text),
            category: state.category.as_deref().and_then(normalize_text),
            city: state.city.as_deref().and_then(normalize_text),
            location: state.location.as_deref().and_then(normalize_text),
            tags: normalize_tags(&state.tags),
            page: state.page.max(1),
            ..state.clone()
        }
    }

    fn full_patch(state: &FilterState) -> FilterPatch {
        FilterPatch {
            search: Some(state.search.clone().unwrap_or_default()),
            category: Some(state.category.clone().unwrap_or_default()),
            start_date: Some(state.start_date),
            end_date: Some(state.end_date),
            city: Some(state.city.clone().unwrap_or_default()),
            location: Some(state.location.clone().unwrap_or_default()),
            tags: Some(state.tags.clone()),
            sort: Some(state.sort),
            page: Some(state.page),
            page_size: Some(state.page_size),
        }
    }

    proptest! {
        #[test]
        fn decode_inverts_encode_after_normalization(state in arb_state()) {
            let params = encode(&full_patch(&state), &FilterState::default());
            prop_assert_eq!(decode(&params), normalize(&state));
        }

        #[test]
        fn serialized_query_round_trips(state in arb_state()) {
            let query = encode_query(&full_patch(&state), &FilterState::default());
            prop_assert_eq!(decode_query(&query), normalize(&state));
        }

        #[test]
        fn page_only_patch_keeps_page(current in arb_state(), page in 1u32..100) {
            let decoded = decode(&encode(&FilterPatch::new().page(page), &current));
            prop_assert_eq!(decoded.page, page);
        }

        #[test]
        fn single_criteria_patch_resets_page(current in arb_state(), field in 0usize..9, text in "[a-z]{1,5}") {
            let patch = match field {
                0 => FilterPatch::new().search(text),
                1 => FilterPatch::new().category(text),
                2 => FilterPatch::new().start_date(Some(date(2027, 1, 1))),
                3 => FilterPatch::new().end_date(None),
                4 => FilterPatch::new().city(text),
                5 => FilterPatch::new().location(text),
                6 => FilterPatch::new().tags([text]),
                7 => FilterPatch::new().sort(SortMode::Recommended),
                _ => FilterPatch::new().page_size(PageSize::Six),
            };
            prop_assert_eq!(decode(&encode(&patch, &current)).page, 1);
        }
    }
}
