mod common;

use campus_discovery::api::{ApiRequest, ApiResponse, Method};
use campus_discovery::app::NotificationKind;
use campus_discovery::domain::{ApiFailure, EventId, PageSize};
use campus_discovery::{Event, FilterPatch, FilterState, SessionContext, SortMode, UserRole};

use common::{event, page_of, runtime};

#[test]
fn hackathon_search_fills_in_defaults() {
    let mut runtime = runtime(SessionContext::anonymous());
    runtime.start("search=hackathon&page=1");

    let expected = FilterState {
        search: Some("hackathon".to_string()),
        ..FilterState::default()
    };
    assert_eq!(runtime.state().filter, expected);
    assert_eq!(runtime.state().filter.page, 1);
    assert_eq!(runtime.state().filter.page_size, PageSize::Twelve);
    assert_eq!(runtime.state().filter.sort, SortMode::Time);

    // the default page is dropped from the shareable URL
    assert_eq!(runtime.host().queries, vec!["search=hackathon".to_string()]);

    let listings = runtime.host().ids_of("list_events");
    assert_eq!(listings.len(), 1);
    let (_, request) = runtime.host().last_of("list_events");
    let route = request.route("/api");
    assert_eq!(route.method, Method::Get);
    assert_eq!(route.url(), "/api/events?page=1&page_size=12&search=hackathon&sort=time");
}

#[test]
fn later_load_wins_whatever_the_completion_order() {
    for later_first in [true, false] {
        let mut runtime = runtime(SessionContext::anonymous());
        runtime.start("");
        runtime.dispatch(Event::UpdateFilter(FilterPatch::new().category("music")));

        let ids = runtime.host().ids_of("list_events");
        assert_eq!(ids.len(), 2);
        let (earlier, later) = (ids[0], ids[1]);

        let earlier_page = Ok(page_of(vec![event(1)], 1, 1));
        let later_page = Ok(page_of(vec![event(2)], 1, 1));
        if later_first {
            runtime.complete(later, later_page);
            runtime.complete(earlier, earlier_page);
        } else {
            runtime.complete(earlier, earlier_page);
            runtime.complete(later, later_page);
        }

        let shown: Vec<EventId> = runtime.state().events().iter().map(|e| e.id).collect();
        assert_eq!(shown, vec![EventId(2)], "later_first = {later_first}");
        assert!(!runtime.state().is_loading());
    }
}

#[test]
fn failed_load_keeps_previous_results_and_notifies_once() {
    let mut runtime = runtime(SessionContext::anonymous());
    runtime.start("");
    let first = runtime.host().last_of("list_events").0;
    runtime.complete(first, Ok(page_of(vec![event(1), event(2)], 2, 1)));

    runtime.dispatch(Event::UpdateFilter(FilterPatch::new().city("Cluj")));
    let second = runtime.host().last_of("list_events").0;
    runtime.complete(second, Err(ApiFailure::transport("connection reset")));

    assert_eq!(runtime.state().events().len(), 2);
    assert_eq!(runtime.host().notifications.len(), 1);
    assert_eq!(runtime.host().notifications[0].kind, NotificationKind::LoadFailed);
}

#[test]
fn out_of_range_page_is_clamped_through_the_url() {
    let mut runtime = runtime(SessionContext::anonymous());
    runtime.start("page=9");
    let id = runtime.host().last_of("list_events").0;

    runtime.complete(id, Ok(page_of(Vec::new(), 25, 9)));

    assert_eq!(runtime.host().queries, vec!["page=3".to_string()]);
    let (_, request) = runtime.host().last_of("list_events");
    assert!(matches!(request, ApiRequest::ListEvents { filter, .. } if filter.page == 3));
}

#[test]
fn changing_a_filter_resets_the_page() {
    let mut runtime = runtime(SessionContext::anonymous());
    runtime.start("page=4&city=Iasi");

    runtime.dispatch(Event::UpdateFilter(FilterPatch::new().category("sports")));

    assert_eq!(
        runtime.host().queries.last().map(String::as_str),
        Some("category=sports&city=Iasi")
    );
    assert_eq!(runtime.state().filter.page, 1);
}

#[test]
fn student_gets_recommended_order_and_a_rail() {
    let mut runtime = runtime(SessionContext::signed_in(UserRole::Student));
    runtime.start("");

    let (_, listing) = runtime.host().last_of("list_events");
    assert!(matches!(listing, ApiRequest::ListEvents { filter, .. } if filter.sort == SortMode::Recommended));

    let (rail, _) = runtime.host().last_of("recommendations");
    let items = (1..=6).map(event).collect();
    runtime.complete(rail, Ok(ApiResponse::Recommendations(items)));
    assert_eq!(runtime.state().recommended().len(), 4);
}

#[test]
fn explicit_time_sort_in_the_url_sticks_for_a_student() {
    let mut runtime = runtime(SessionContext::signed_in(UserRole::Student));
    runtime.start("sort=time");

    let (_, listing) = runtime.host().last_of("list_events");
    assert!(matches!(listing, ApiRequest::ListEvents { filter, .. } if filter.sort == SortMode::Time));
    // time is the default order, so the canonical URL drops it
    assert_eq!(runtime.host().queries, vec![String::new()]);
    assert_eq!(runtime.host().ids_of("list_events").len(), 1);
}

#[test]
fn signing_out_clears_the_rail() {
    let mut runtime = runtime(SessionContext::signed_in(UserRole::Student));
    runtime.start("");
    let (rail, _) = runtime.host().last_of("recommendations");
    runtime.complete(
        rail,
        Ok(ApiResponse::Recommendations(vec![event(5)])),
    );
    assert_eq!(runtime.state().recommended().len(), 1);

    runtime.dispatch(Event::SessionChanged(SessionContext::anonymous()));

    assert!(runtime.state().recommended().is_empty());
    let (_, listing) = runtime.host().last_of("list_events");
    assert!(matches!(listing, ApiRequest::ListEvents { filter, .. } if filter.sort == SortMode::Time));
}
