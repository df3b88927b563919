//! OpenTelemetry tracer provider exporting spans as JSON lines.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry::Value;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;

use super::file_writer::RotatingFile;
use super::span_formatter::SpanRecord;

const UNKNOWN_SERVICE: &str = "unknown_service";

/// Writes each finished span as one JSON line to a rotating file.
struct JsonLinesExporter {
    writer: RotatingFile,
    service: String,
    is_shutdown: AtomicBool,
}

impl JsonLinesExporter {
    fn new(writer: RotatingFile, resource: &Resource) -> Self {
        Self {
            writer,
            service: service_name(resource),
            is_shutdown: AtomicBool::new(false),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        for span in batch {
            let record = SpanRecord::from_span(&self.service, span);
            let line = serde_json::to_string(&record).map_err(|e| TraceError::from(e.to_string()))?;
            self.writer
                .write_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))?;
        }
        Ok(())
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown.load(Ordering::SeqCst) {
            Err(TraceError::from("exporter is shut down"))
        } else {
            self.write_batch(&batch)
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }

    fn set_resource(&mut self, res: &Resource) {
        self.service = service_name(res);
    }
}

impl std::fmt::Debug for JsonLinesExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesExporter")
            .field("writer", &self.writer)
            .field("service", &self.service)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

fn service_name(resource: &Resource) -> String {
    match resource.get(opentelemetry::Key::from_static_str("service.name")) {
        Some(Value::String(name)) => name.to_string(),
        Some(other) => other.to_string(),
        None => UNKNOWN_SERVICE.to_string(),
    }
}

/// Builds a provider whose spans are appended to `file_path`, one JSON object per line.
///
/// Spans are exported synchronously as they close.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = JsonLinesExporter::new(RotatingFile::new(file_path), &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
