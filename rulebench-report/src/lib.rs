#![warn(missing_docs)]
//! rulebench Report - Reporting
//!
//! Report model for measured runs and its renderings:
//! - JSON (full report, machine-readable)
//! - CSV (one row per scenario)
//! - Markdown (GitHub-flavoured summary with diagnostics)

mod artifacts;
mod csv;
mod json;
mod markdown;
mod report;

pub use artifacts::{ReportError, write_artifacts};
pub use csv::generate_csv_report;
pub use json::generate_json_report;
pub use markdown::generate_markdown_report;
pub use report::{
    Diagnostic, DiagnosticLevel, EnvironmentInfo, FailureInfo, Report, ReportConfig, ReportMeta,
    ReportSummary, SCHEMA_VERSION, ScenarioMetrics, ScenarioResult, ScenarioStatus,
};

/// Format nanoseconds with a readable unit
pub fn format_duration(nanos: f64) -> String {
    if nanos >= 1_000_000_000.0 {
        format!("{:.2} s", nanos / 1_000_000_000.0)
    } else if nanos >= 1_000_000.0 {
        format!("{:.2} ms", nanos / 1_000_000.0)
    } else if nanos >= 1_000.0 {
        format!("{:.2} μs", nanos / 1_000.0)
    } else {
        format!("{:.2} ns", nanos)
    }
}
