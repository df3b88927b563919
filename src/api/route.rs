//! Mapping of requests onto HTTP routes.

use serde_json::{json, Value};

use super::messages::ApiRequest;
use crate::app::codec;
use crate::domain::FilterState;
use crate::infrastructure::{to_query_string, QueryParams};

/// HTTP method of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Everything a transport needs to perform a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub method: Method,
    /// Absolute path including the API base, without the query string.
    pub path: String,
    pub query: QueryParams,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl Route {
    /// Path plus form-urlencoded query string, if any.
    #[must_use]
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, to_query_string(&self.query))
        }
    }
}

impl ApiRequest {
    /// Resolves the request against `api_base` (e.g. `/api`).
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_discovery::api::{ApiRequest, Method};
    /// use campus_discovery::domain::EventId;
    ///
    /// let route = ApiRequest::set_favorite(EventId(42), false).route("/api");
    /// assert_eq!(route.method, Method::Delete);
    /// assert_eq!(route.url(), "/api/events/42/favorite");
    /// ```
    #[must_use]
    pub fn route(&self, api_base: &str) -> Route {
        let (method, path, query, body) = match self {
            Self::ListEvents { filter, .. } => (Method::Get, "events".to_string(), list_query(filter), None),
            Self::Recommendations { limit, .. } => {
                let mut query = QueryParams::new();
                query.insert("limit".to_string(), limit.to_string());
                (Method::Get, "recommendations".to_string(), query, None)
            }
            Self::SetFavorite { event, favorite, .. } => {
                let method = if *favorite { Method::Post } else { Method::Delete };
                (method, format!("events/{event}/favorite"), QueryParams::new(), None)
            }
            Self::SetAttendance { event, attending, .. } => (
                Method::Put,
                format!("events/{event}/attendance"),
                QueryParams::new(),
                Some(json!({ "attending": attending })),
            ),
            Self::ReviewModeration { event, .. } => (
                Method::Post,
                format!("admin/events/{event}/moderation/review"),
                QueryParams::new(),
                None,
            ),
            Self::BulkStatus { events, status, .. } => (
                Method::Put,
                "organizer/events/bulk-status".to_string(),
                QueryParams::new(),
                Some(json!({ "event_ids": events, "status": status.as_str() })),
            ),
            Self::BulkTags { events, tags, .. } => (
                Method::Put,
                "organizer/events/bulk-tags".to_string(),
                QueryParams::new(),
                Some(json!({ "event_ids": events, "tags": tags })),
            ),
            Self::RecordInteractions { events, .. } => (
                Method::Post,
                "analytics/interactions".to_string(),
                QueryParams::new(),
                Some(json!({ "events": events })),
            ),
        };

        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(context) = self.trace_context() {
            headers.push(("traceparent".to_string(), context.traceparent()));
        }

        Route {
            method,
            path: format!("{}/{}", api_base.trim_end_matches('/'), path),
            query,
            body,
            headers,
        }
    }
}

/// Listing query: the canonical filter keys, with tags sent as `tags_csv`
/// and pagination plus sort always present.
fn list_query(filter: &FilterState) -> QueryParams {
    let mut query = codec::to_params(filter);
    if let Some(tags) = query.remove(codec::KEY_TAGS) {
        query.insert("tags_csv".to_string(), tags);
    }
    query.insert(codec::KEY_SORT.to_string(), filter.sort.as_str().to_string());
    query.insert(codec::KEY_PAGE.to_string(), filter.page.to_string());
    query.insert(codec::KEY_PAGE_SIZE.to_string(), filter.page_size.get().to_string());
    query
}
