#![allow(dead_code)]

use campus_discovery::api::{decode_response, ApiRequest, ApiResponse, RequestId, Route};
use campus_discovery::app::{DiscoveryState, Notification};
use campus_discovery::domain::{ApiFailure, EventSummary, InteractionEvent, InteractionKind, ResultPage};
use campus_discovery::infrastructure::VirtualScheduler;
use campus_discovery::runtime::{Host, Runtime};
use campus_discovery::{initialize, Config, SessionContext};

/// Host double recording everything the runtime asks of it.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub sent: Vec<(RequestId, ApiRequest, Route)>,
    pub notifications: Vec<Notification>,
    pub queries: Vec<String>,
    pub renders: usize,
}

impl Host for RecordingHost {
    fn send(&mut self, id: RequestId, request: &ApiRequest, route: Route) {
        self.sent.push((id, request.clone(), route));
    }

    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.clone());
    }

    fn replace_query(&mut self, query: &str) {
        self.queries.push(query.to_string());
    }

    fn render(&mut self, _state: &DiscoveryState) {
        self.renders += 1;
    }
}

impl RecordingHost {
    /// Ids of every request of the given kind, oldest first.
    pub fn ids_of(&self, kind: &str) -> Vec<RequestId> {
        self.sent
            .iter()
            .filter(|(_, request, _)| request.name() == kind)
            .map(|(id, _, _)| *id)
            .collect()
    }

    /// The most recent request of the given kind.
    pub fn last_of(&self, kind: &str) -> (RequestId, ApiRequest) {
        self.sent
            .iter()
            .rev()
            .find(|(_, request, _)| request.name() == kind)
            .map(|(id, request, _)| (*id, request.clone()))
            .unwrap_or_else(|| panic!("no {kind} request was sent"))
    }

    /// Every interaction delivered in telemetry batches.
    pub fn interactions(&self) -> Vec<InteractionEvent> {
        self.sent
            .iter()
            .filter_map(|(_, request, _)| match request {
                ApiRequest::RecordInteractions { events, .. } => Some(events.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn interactions_of(&self, kind: InteractionKind) -> Vec<InteractionEvent> {
        self.interactions().into_iter().filter(|event| event.kind == kind).collect()
    }
}

pub type TestRuntime = Runtime<RecordingHost, VirtualScheduler>;

pub fn runtime(session: SessionContext) -> TestRuntime {
    Runtime::new(
        initialize(&Config::default(), session),
        RecordingHost::default(),
        VirtualScheduler::new(),
    )
}

pub fn event(id: u64) -> EventSummary {
    EventSummary::new(id, format!("Event {id}"))
}

pub fn page_of(items: Vec<EventSummary>, total: u64, page: u32) -> ApiResponse {
    ApiResponse::Page(ResultPage::new(items, total, page, 12))
}

/// Completes the latest request of `kind` by decoding a raw HTTP answer.
pub fn answer(runtime: &mut TestRuntime, kind: &str, status: u16, body: &str) -> bool {
    let (id, request) = runtime.host().last_of(kind);
    let outcome: Result<ApiResponse, ApiFailure> = decode_response(&request, status, body);
    runtime.complete(id, outcome)
}
