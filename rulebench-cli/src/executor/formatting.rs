//! Output Formatting
//!
//! Terminal summary of a measured run: one block per scenario with a status
//! icon (✓/✗/💥) and its timing figures, then the analyser diagnostics and
//! run totals.

use rulebench_report::{DiagnosticLevel, Report, ScenarioStatus, format_duration};

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str(&format!("rulebench Results: {}\n", report.meta.title));
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for result in &report.scenarios {
        let status_icon = match result.status {
            ScenarioStatus::Passed => "✓",
            ScenarioStatus::Failed => "✗",
            ScenarioStatus::Crashed => "💥",
        };

        output.push_str(&format!(
            "  {} {} ({})\n",
            status_icon,
            result.name,
            format_duration(result.duration_ms * 1_000_000.0)
        ));

        if let Some(metrics) = &result.metrics {
            output.push_str(&format!(
                "      mean: {}  median: {}  stddev: {}\n",
                format_duration(metrics.mean_ns),
                format_duration(metrics.median_ns),
                format_duration(metrics.std_dev_ns)
            ));
            output.push_str(&format!(
                "      min: {}  max: {}  samples: {} ({} iterations)\n",
                format_duration(metrics.min_ns),
                format_duration(metrics.max_ns),
                metrics.samples,
                metrics.iterations
            ));
            output.push_str(&format!(
                "      p50: {}  p95: {}  p99: {}\n",
                format_duration(metrics.p50_ns),
                format_duration(metrics.p95_ns),
                format_duration(metrics.p99_ns)
            ));
            if let Some(ops) = metrics.ops_per_sec {
                output.push_str(&format!("      throughput: {:.2} ops/sec\n", ops));
            }
            if metrics.mean_cycles > 0.0 {
                output.push_str(&format!("      cycles: mean {:.0}\n", metrics.mean_cycles));
            }
        }

        if let Some(failure) = &result.failure {
            output.push_str(&format!("      {}: {}\n", failure.kind, failure.message));
        }

        output.push('\n');
    }

    if !report.diagnostics.is_empty() {
        output.push_str("Diagnostics\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for d in &report.diagnostics {
            let level = match d.level {
                DiagnosticLevel::Hint => "hint",
                DiagnosticLevel::Warning => "warning",
                DiagnosticLevel::Error => "error",
            };
            match &d.scenario {
                Some(scenario) => output.push_str(&format!(
                    "  [{}] {} ({}): {}\n",
                    level, d.analyser, scenario, d.message
                )),
                None => output.push_str(&format!("  [{}] {}: {}\n", level, d.analyser, d.message)),
            }
        }
        output.push('\n');
    }

    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    let s = &report.summary;
    output.push_str(&format!(
        "  Total: {}  Passed: {}  Failed: {}  Crashed: {}\n",
        s.total_scenarios, s.passed, s.failed, s.crashed
    ));
    output.push_str(&format!(
        "  Warnings: {}  Errors: {}\n",
        s.warnings, s.errors
    ));
    output.push_str(&format!(
        "  Duration: {}\n",
        format_duration(s.total_duration_ms * 1_000_000.0)
    ));

    output
}
