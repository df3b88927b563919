//! Request / response contract with the backend.
//!
//! # Architecture
//!
//! - `messages`: request and response types with trace context propagation
//! - `route`: mapping of requests onto HTTP methods, paths, queries and bodies
//! - `decode`: turning raw completions into responses or failures

pub mod decode;
pub mod messages;
pub mod route;

pub use decode::decode_response;
pub use messages::{ApiRequest, ApiResponse, BulkFailure, BulkResult, RequestId, TraceContext};
pub use route::{Method, Route};
