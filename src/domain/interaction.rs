//! Behavioral telemetry events.
//!
//! Interaction events are created synchronously at the moment of a user
//! action or a render commit, queued by the recorder, flushed in one batch
//! per render pass and forgotten after a single send attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::event::EventId;

/// Semantic type of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Impression,
    Click,
    View,
    Dwell,
    Share,
    Search,
    Filter,
    Favorite,
    Register,
    Unregister,
}

impl InteractionKind {
    /// Wire label of the interaction type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Impression => "impression",
            Self::Click => "click",
            Self::View => "view",
            Self::Dwell => "dwell",
            Self::Share => "share",
            Self::Search => "search",
            Self::Filter => "filter",
            Self::Favorite => "favorite",
            Self::Register => "register",
            Self::Unregister => "unregister",
        }
    }
}

/// Where a list of events was rendered.
///
/// Recorded as the `source` meta field so the backend can attribute
/// impressions and clicks to the listing or the recommendation rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListSource {
    EventsList,
    Recommendations,
}

impl ListSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EventsList => "events_list",
            Self::Recommendations => "recommendations",
        }
    }
}

/// A single behavioral event in the shape accepted by the analytics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    #[serde(rename = "interaction_type")]
    pub kind: InteractionKind,
    #[serde(rename = "event_id", default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl InteractionEvent {
    /// Creates an event of `kind` stamped with the current wall-clock time.
    #[must_use]
    pub fn new(kind: InteractionKind) -> Self {
        Self {
            kind,
            entity_id: None,
            occurred_at: Some(Utc::now()),
            meta: Map::new(),
        }
    }

    /// Creates an event about a specific entity.
    #[must_use]
    pub fn for_entity(kind: InteractionKind, entity: EventId) -> Self {
        Self {
            entity_id: Some(entity),
            ..Self::new(kind)
        }
    }

    /// Overrides the occurrence timestamp.
    #[must_use]
    pub const fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    /// Adds a meta field.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_backend_field_names() {
        let event = InteractionEvent {
            kind: InteractionKind::Impression,
            entity_id: Some(EventId(5)),
            occurred_at: None,
            meta: Map::new(),
        }
        .with("source", ListSource::EventsList.as_str())
        .with("position", 2);

        let json = serde_json::to_value(&event).expect("serializable");

        assert_eq!(
            json,
            serde_json::json!({
                "interaction_type": "impression",
                "event_id": 5,
                "meta": {"source": "events_list", "position": 2}
            })
        );
    }

    #[test]
    fn omits_empty_meta_and_entity() {
        let mut event = InteractionEvent::new(InteractionKind::Search);
        event.occurred_at = None;

        let json = serde_json::to_value(&event).expect("serializable");

        assert_eq!(json, serde_json::json!({"interaction_type": "search"}));
    }
}
