//! OpenTelemetry tracing with JSON-lines span export.
//!
//! Every [`handle_event`](crate::handle_event) call opens a `handle_event`
//! span, and outgoing requests carry the active trace context. When a
//! subscriber is installed with [`init_tracing`], finished spans flow
//!
//! ```text
//! tracing → tracing-opentelemetry → JsonLinesExporter → discovery-spans.jsonl
//! ```
//!
//! The span file rotates at 10 MiB and keeps three numbered backups.
//!
//! Filter resolution:
//! 1. `RUST_LOG`
//! 2. `trace_level` from [`Config`](crate::Config)
//! 3. `info`

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use file_writer::RotatingFile;
pub use init::{init_tracing, SERVICE_NAME, SPAN_FILE_NAME};
