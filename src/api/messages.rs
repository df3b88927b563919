//! Backend request and response message types.
//!
//! The state machine never talks to the network itself. It emits
//! [`ApiRequest`] values tagged with a [`RequestId`]; the host executes them
//! and feeds the decoded [`ApiResponse`] (or an [`ApiFailure`](crate::domain::ApiFailure))
//! back. Every request captures the active trace context at construction so
//! the backend call can be linked to the span that caused it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    EventId, EventStatus, EventSummary, FilterState, InteractionEvent, ModerationStatus, ResultPage,
};

/// Correlates a request with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

/// Distributed tracing context captured when a request is built.
///
/// Carries the OpenTelemetry trace and span ids of the span that issued the
/// request; rendered as a W3C `traceparent` header on the outgoing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Id of the span that built the request.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid, which is the
    /// case whenever tracing is not initialized.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_discovery::api::TraceContext;
    ///
    /// // No subscriber is installed, so there is no span to link to.
    /// assert!(TraceContext::from_current().is_none());
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(%trace_id, %parent_span_id, "capturing trace context");

            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }

    /// W3C `traceparent` header value (version 00, sampled).
    #[must_use]
    pub fn traceparent(&self) -> String {
        format!("00-{}-{}-01", self.trace_id, self.parent_span_id)
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! api_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl ApiRequest {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " request with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

api_request_builders! {
    list_events(ListEvents { filter: FilterState }),
    recommendations(Recommendations { limit: usize }),
    set_favorite(SetFavorite { event: EventId, favorite: bool }),
    set_attendance(SetAttendance { event: EventId, attending: bool }),
    review_moderation(ReviewModeration { event: EventId }),
    bulk_status(BulkStatus { events: Vec<EventId>, status: EventStatus }),
    bulk_tags(BulkTags { events: Vec<EventId>, tags: BTreeSet<String> }),
    record_interactions(RecordInteractions { events: Vec<InteractionEvent> }),
}

/// Requests the discovery core asks the host to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiRequest {
    /// Load one page of the listing. `filter.sort` is the effective sort.
    ListEvents {
        filter: FilterState,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load the personalized rail.
    Recommendations {
        limit: usize,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Add (`favorite = true`) or remove a favorite.
    SetFavorite {
        event: EventId,
        favorite: bool,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Confirm or clear attendance.
    SetAttendance {
        event: EventId,
        attending: bool,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Mark a flagged event as reviewed.
    ReviewModeration {
        event: EventId,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Set the publication status of several events.
    BulkStatus {
        events: Vec<EventId>,
        status: EventStatus,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Replace the tags of several events.
    BulkTags {
        events: Vec<EventId>,
        tags: BTreeSet<String>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Deliver one telemetry batch.
    RecordInteractions {
        events: Vec<InteractionEvent>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl ApiRequest {
    /// Trace context captured when the request was built.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::ListEvents { trace_context, .. }
            | Self::Recommendations { trace_context, .. }
            | Self::SetFavorite { trace_context, .. }
            | Self::SetAttendance { trace_context, .. }
            | Self::ReviewModeration { trace_context, .. }
            | Self::BulkStatus { trace_context, .. }
            | Self::BulkTags { trace_context, .. }
            | Self::RecordInteractions { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListEvents { .. } => "list_events",
            Self::Recommendations { .. } => "recommendations",
            Self::SetFavorite { .. } => "set_favorite",
            Self::SetAttendance { .. } => "set_attendance",
            Self::ReviewModeration { .. } => "review_moderation",
            Self::BulkStatus { .. } => "bulk_status",
            Self::BulkTags { .. } => "bulk_tags",
            Self::RecordInteractions { .. } => "record_interactions",
        }
    }
}

/// A member of a bulk update the server refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub id: EventId,
    #[serde(default)]
    pub detail: String,
}

/// Per-member outcome of a bulk update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult<V> {
    pub updated: Vec<(EventId, V)>,
    pub failed: Vec<BulkFailure>,
}

/// Decoded successful responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiResponse {
    Page(ResultPage<EventSummary>),
    Recommendations(Vec<EventSummary>),
    Favorite { is_favorite: bool },
    Attendance { attending: bool },
    Moderation { status: ModerationStatus },
    BulkStatus(BulkResult<EventStatus>),
    BulkTags(BulkResult<BTreeSet<String>>),
    Accepted,
}
