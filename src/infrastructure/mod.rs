//! Infrastructure layer for host-facing plumbing.
//!
//! Everything here is independent of the discovery semantics: raw query-string
//! handling, the timer abstraction used for debounced effects, and the data
//! directory used by the span exporter.

pub mod paths;
pub mod query;
pub mod scheduler;

pub use paths::get_data_dir;
pub use query::{parse_query, to_query_string, QueryParams};
pub use scheduler::{Scheduler, TimerToken, TokenSource, VirtualScheduler};
