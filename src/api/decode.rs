//! Decoding of raw HTTP completions into [`ApiResponse`] values.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::messages::{ApiRequest, ApiResponse, BulkFailure, BulkResult};
use crate::domain::{ApiFailure, EventId, EventStatus, EventSummary, ModerationStatus, ResultPage};

/// Turns a status code and body into a response for `request`.
///
/// For favorite, attendance and moderation calls a 2xx body confirms what
/// was requested unless it carries the field explicitly, so `{"status":
/// "added"}` and an empty body both confirm. Bulk calls accept either a
/// per-member report or a bare `{"updated": <count>}`, which confirms every
/// member with the requested value. A 2xx body that is not JSON is a failure.
///
/// # Errors
///
/// Returns [`ApiFailure`] for non-2xx statuses, with the `detail` field of a
/// JSON error body as the message when present, and for 2xx bodies that do
/// not match the expected shape.
///
/// # Examples
///
/// ```
/// use campus_discovery::api::{decode_response, ApiRequest, ApiResponse};
/// use campus_discovery::domain::EventId;
///
/// let request = ApiRequest::set_favorite(EventId(42), true);
///
/// let ok = decode_response(&request, 200, r#"{"is_favorite": true}"#).unwrap();
/// assert_eq!(ok, ApiResponse::Favorite { is_favorite: true });
///
/// let failed = decode_response(&request, 500, r#"{"detail": "database unavailable"}"#).unwrap_err();
/// assert_eq!(failed.status, Some(500));
/// assert_eq!(failed.message, "database unavailable");
/// ```
pub fn decode_response(request: &ApiRequest, status: u16, body: &str) -> Result<ApiResponse, ApiFailure> {
    if !(200..300).contains(&status) {
        return Err(ApiFailure::http(status, error_detail(status, body)));
    }
    let empty = body.trim().is_empty();

    let response = match request {
        ApiRequest::ListEvents { .. } => ApiResponse::Page(parse::<ResultPage<EventSummary>>(status, body)?),
        ApiRequest::Recommendations { .. } => ApiResponse::Recommendations(parse::<Vec<EventSummary>>(status, body)?),
        ApiRequest::SetFavorite { favorite, .. } => {
            let is_favorite = if empty {
                *favorite
            } else {
                parse::<FavoriteBody>(status, body)?.is_favorite.unwrap_or(*favorite)
            };
            ApiResponse::Favorite { is_favorite }
        }
        ApiRequest::SetAttendance { attending, .. } => {
            let attending = if empty {
                *attending
            } else {
                parse::<AttendanceBody>(status, body)?.attending.unwrap_or(*attending)
            };
            ApiResponse::Attendance { attending }
        }
        ApiRequest::ReviewModeration { .. } => {
            let status = if empty {
                ModerationStatus::Reviewed
            } else {
                parse::<ModerationBody>(status, body)?
                    .moderation_status
                    .unwrap_or(ModerationStatus::Reviewed)
            };
            ApiResponse::Moderation { status }
        }
        ApiRequest::BulkStatus {
            events,
            status: requested,
            ..
        } => {
            let raw: BulkBody<StatusUpdate> = parse(status, body)?;
            let updated = match raw.updated {
                Some(Updated::Members(members)) => members.into_iter().map(|u| (u.id, u.status)).collect(),
                Some(Updated::Count(_)) => events.iter().map(|id| (*id, *requested)).collect(),
                None => Vec::new(),
            };
            ApiResponse::BulkStatus(BulkResult {
                updated,
                failed: raw.failed,
            })
        }
        ApiRequest::BulkTags { events, tags, .. } => {
            let raw: BulkBody<TagsUpdate> = parse(status, body)?;
            let updated = match raw.updated {
                Some(Updated::Members(members)) => members.into_iter().map(|u| (u.id, u.tags)).collect(),
                Some(Updated::Count(_)) => events.iter().map(|id| (*id, tags.clone())).collect(),
                None => Vec::new(),
            };
            ApiResponse::BulkTags(BulkResult {
                updated,
                failed: raw.failed,
            })
        }
        ApiRequest::RecordInteractions { .. } => ApiResponse::Accepted,
    };
    Ok(response)
}

fn parse<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiFailure> {
    serde_json::from_str(body)
        .map_err(|err| ApiFailure::http(status, format!("malformed response body: {err}")))
}

fn error_detail(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => format!("HTTP {status}"),
        },
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => format!("HTTP {status}"),
    }
}

#[derive(Deserialize)]
struct FavoriteBody {
    #[serde(default)]
    is_favorite: Option<bool>,
}

#[derive(Deserialize)]
struct AttendanceBody {
    #[serde(default)]
    attending: Option<bool>,
}

#[derive(Deserialize)]
struct ModerationBody {
    #[serde(default)]
    moderation_status: Option<ModerationStatus>,
}

#[derive(Deserialize)]
struct BulkBody<U> {
    #[serde(default = "Option::default")]
    updated: Option<Updated<U>>,
    #[serde(default)]
    failed: Vec<BulkFailure>,
}

/// All-or-nothing endpoints answer with a count.
#[derive(Deserialize)]
#[serde(untagged)]
enum Updated<U> {
    Count(u64),
    Members(Vec<U>),
}

#[derive(Deserialize)]
struct StatusUpdate {
    id: EventId,
    status: EventStatus,
}

#[derive(Deserialize)]
struct TagsUpdate {
    id: EventId,
    #[serde(default, deserialize_with = "crate::domain::event::tag_names")]
    tags: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FilterState;

    fn list() -> ApiRequest {
        ApiRequest::ListEvents {
            filter: FilterState::default(),
            trace_context: None,
        }
    }

    #[test]
    fn decodes_listing_page() {
        let body = r#"{"items": [{"id": 1, "title": "Career fair"}], "total": 13, "page": 2, "page_size": 12}"#;

        let ApiResponse::Page(page) = decode_response(&list(), 200, body).expect("valid page") else {
            panic!("expected a page");
        };

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pages(), 2);
    }

    #[test]
    fn malformed_success_body_is_a_failure() {
        let failure = decode_response(&list(), 200, "<html>").expect_err("not json");

        assert_eq!(failure.status, Some(200));
        assert!(failure.message.starts_with("malformed response body"));
    }

    #[test]
    fn empty_bodies_confirm_the_request() {
        let attendance = ApiRequest::SetAttendance {
            event: EventId(1),
            attending: false,
            trace_context: None,
        };
        let review = ApiRequest::ReviewModeration {
            event: EventId(1),
            trace_context: None,
        };

        assert_eq!(
            decode_response(&attendance, 204, "").expect("empty ok"),
            ApiResponse::Attendance { attending: false }
        );
        assert_eq!(
            decode_response(&review, 200, " ").expect("empty ok"),
            ApiResponse::Moderation {
                status: ModerationStatus::Reviewed
            }
        );
    }

    #[test]
    fn bulk_status_reports_members_separately() {
        let request = ApiRequest::BulkStatus {
            events: vec![EventId(3), EventId(7), EventId(9)],
            status: EventStatus::Published,
            trace_context: None,
        };
        let body = r#"{
            "updated": [{"id": 3, "status": "published"}, {"id": 9, "status": "published"}],
            "failed": [{"id": 7, "detail": "not owner"}]
        }"#;

        let ApiResponse::BulkStatus(result) = decode_response(&request, 200, body).expect("valid") else {
            panic!("expected bulk status");
        };

        assert_eq!(result.updated, vec![(EventId(3), EventStatus::Published), (EventId(9), EventStatus::Published)]);
        assert_eq!(result.failed[0].id, EventId(7));
        assert_eq!(result.failed[0].detail, "not owner");
    }

    #[test]
    fn status_bodies_confirm_the_requested_value() {
        let favorite = ApiRequest::set_favorite(EventId(42), true);
        let attendance = ApiRequest::SetAttendance {
            event: EventId(42),
            attending: true,
            trace_context: None,
        };

        assert_eq!(
            decode_response(&favorite, 201, r#"{"status": "added"}"#).expect("added"),
            ApiResponse::Favorite { is_favorite: true }
        );
        assert_eq!(
            decode_response(&favorite, 201, r#"{"status": "exists"}"#).expect("exists"),
            ApiResponse::Favorite { is_favorite: true }
        );
        assert_eq!(
            decode_response(&attendance, 201, r#"{"status": "registered"}"#).expect("registered"),
            ApiResponse::Attendance { attending: true }
        );
    }

    #[test]
    fn bulk_count_confirms_every_member() {
        let status = ApiRequest::BulkStatus {
            events: vec![EventId(3), EventId(9)],
            status: EventStatus::Published,
            trace_context: None,
        };
        let tags: BTreeSet<String> = ["ai".to_string()].into_iter().collect();
        let retag = ApiRequest::BulkTags {
            events: vec![EventId(4)],
            tags: tags.clone(),
            trace_context: None,
        };

        let ApiResponse::BulkStatus(result) = decode_response(&status, 200, r#"{"updated": 2}"#).expect("count") else {
            panic!("expected bulk status");
        };
        assert_eq!(result.updated, vec![(EventId(3), EventStatus::Published), (EventId(9), EventStatus::Published)]);
        assert!(result.failed.is_empty());

        let ApiResponse::BulkTags(result) = decode_response(&retag, 200, r#"{"updated": 1}"#).expect("count") else {
            panic!("expected bulk tags");
        };
        assert_eq!(result.updated, vec![(EventId(4), tags)]);
    }

    #[test]
    fn error_detail_falls_back_to_status() {
        let failure = decode_response(&list(), 503, "").expect_err("unavailable");
        assert_eq!(failure.message, "HTTP 503");

        let structured = decode_response(&list(), 422, r#"{"detail": [{"msg": "bad"}]}"#).expect_err("invalid");
        assert_eq!(structured.message, r#"[{"msg":"bad"}]"#);
    }
}
