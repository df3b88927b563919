//! Event entity as seen by the discovery views.
//!
//! [`EventSummary`] is the list-item shape returned by the backend for the
//! paginated listing and the recommendation rail. Only the fields the
//! discovery core reads or mutates are modelled; everything else in the
//! payload is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Backend identifier of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Publication state of an event, edited by organizers in bulk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    #[default]
    Published,
}

impl EventStatus {
    /// Wire label of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// Moderation state of an event.
///
/// Automatic screening marks suspicious events as `Flagged`; an admin review
/// moves them to `Reviewed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    #[default]
    Clean,
    Flagged,
    Reviewed,
}

/// A single event as rendered in the listing or the recommendation rail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "tag_names")]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub attending: bool,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub moderation_status: ModerationStatus,
}

impl EventSummary {
    /// Creates a published, unflagged event with only an id and a title.
    #[must_use]
    pub fn new(id: impl Into<EventId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: None,
            city: None,
            location: None,
            start_time: None,
            tags: BTreeSet::new(),
            is_favorite: false,
            attending: false,
            status: EventStatus::Published,
            moderation_status: ModerationStatus::Clean,
        }
    }
}

/// Accepts tags either as plain strings or as `{ "name": ... }` objects.
pub(crate) fn tag_names<'de, D>(deserializer: D) -> std::result::Result<BTreeSet<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TagRepr {
        Name(String),
        Object { name: String },
    }

    let raw: Option<Vec<TagRepr>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|tag| match tag {
            TagRepr::Name(name) | TagRepr::Object { name } => name,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_payload_with_tag_objects() {
        let json = r#"{
            "id": 7,
            "title": "Hackathon",
            "city": "Cluj",
            "tags": [{"id": 1, "name": "tech"}, {"id": 2, "name": "ai"}],
            "is_favorite": true,
            "seats_taken": 12,
            "status": "draft",
            "moderation_status": "flagged"
        }"#;

        let event: EventSummary = serde_json::from_str(json).expect("valid payload");

        assert_eq!(event.id, EventId(7));
        assert_eq!(event.city.as_deref(), Some("Cluj"));
        assert!(event.tags.contains("tech"));
        assert!(event.tags.contains("ai"));
        assert!(event.is_favorite);
        assert!(!event.attending);
        assert_eq!(event.status, EventStatus::Draft);
        assert_eq!(event.moderation_status, ModerationStatus::Flagged);
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let event: EventSummary = serde_json::from_str(r#"{"id": 3, "tags": null}"#).expect("valid payload");

        assert_eq!(event, EventSummary::new(3, ""));
    }
}
