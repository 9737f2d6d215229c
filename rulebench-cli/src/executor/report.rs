//! Report Building
//!
//! Assembles the measured-run [`Report`] from execution results, their
//! statistics and the analyser diagnostics.
//!
//! ```text
//! ScenarioExecution + ScenarioStatistics
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │  ScenarioMetrics    │  Timing stats + m-value + cycles
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │      Report         │  Ready for JSON/CSV/Markdown output
//!   └─────────────────────┘
//! ```

use super::execution::ScenarioExecution;
use super::statistics::ScenarioStatistics;
use rulebench_report::{
    Diagnostic, DiagnosticLevel, Report, ReportMeta, ReportSummary, ScenarioMetrics,
    ScenarioResult, ScenarioStatus,
};

/// Build a complete Report from execution results
///
/// `stats` must be parallel with `results`, as returned by
/// `compute_statistics`.
pub fn build_report(
    meta: ReportMeta,
    results: &[ScenarioExecution],
    stats: &[Option<ScenarioStatistics>],
    diagnostics: Vec<Diagnostic>,
    total_duration_ms: f64,
) -> Report {
    let mut summary = ReportSummary {
        total_scenarios: results.len(),
        total_duration_ms,
        ..Default::default()
    };

    let scenarios = results
        .iter()
        .zip(stats)
        .map(|(result, stats)| {
            match result.status {
                ScenarioStatus::Passed => summary.passed += 1,
                ScenarioStatus::Failed => summary.failed += 1,
                ScenarioStatus::Crashed => summary.crashed += 1,
            }

            let metrics = stats.as_ref().map(|s| ScenarioMetrics {
                iterations: result.iterations,
                iters_per_sample: result.iters_per_sample,
                mvalue: s.mvalue,
                mean_cycles: s.mean_cycles,
                ..ScenarioMetrics::from(&s.summary)
            });

            ScenarioResult {
                name: result.name.clone(),
                status: result.status,
                duration_ms: result.duration_ns as f64 / 1_000_000.0,
                metrics,
                failure: result.failure.clone(),
            }
        })
        .collect();

    for d in &diagnostics {
        match d.level {
            DiagnosticLevel::Warning => summary.warnings += 1,
            DiagnosticLevel::Error => summary.errors += 1,
            DiagnosticLevel::Hint => {}
        }
    }

    Report {
        meta,
        scenarios,
        diagnostics,
        summary,
    }
}
