//! Markdown Output
//!
//! GitHub-flavoured table plus the analyser findings, suitable for a PR
//! comment or `$GITHUB_STEP_SUMMARY`.

use crate::format_duration;
use crate::report::{DiagnosticLevel, Report, ScenarioStatus};

/// Render the report as GitHub-flavoured Markdown
pub fn generate_markdown_report(report: &Report) -> String {
    let mut out = String::new();
    let meta = &report.meta;

    out.push_str(&format!("# {}\n\n", meta.title));
    out.push_str(&format!(
        "{} {} · {} ({} cores) · {}\n\n",
        meta.environment.os,
        meta.environment.arch,
        meta.environment.cpu,
        meta.environment.cpu_cores,
        meta.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    out.push_str("| Scenario | Status | Mean | Error | StdDev | Median | P95 | Ops/sec |\n");
    out.push_str("|----------|--------|-----:|------:|-------:|-------:|----:|--------:|\n");

    for scenario in &report.scenarios {
        let status = match scenario.status {
            ScenarioStatus::Passed => "✅",
            ScenarioStatus::Failed => "❌ failed",
            ScenarioStatus::Crashed => "💥 crashed",
        };
        match &scenario.metrics {
            Some(m) => out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
                scenario.name,
                status,
                format_duration(m.mean_ns),
                format_duration(m.std_error_ns),
                format_duration(m.std_dev_ns),
                format_duration(m.median_ns),
                format_duration(m.p95_ns),
                m.ops_per_sec
                    .map(|o| format!("{o:.0}"))
                    .unwrap_or_else(|| "-".to_string()),
            )),
            None => out.push_str(&format!(
                "| {} | {} | - | - | - | - | - | - |\n",
                scenario.name, status
            )),
        }
    }

    if !report.diagnostics.is_empty() {
        out.push_str("\n## Diagnostics\n\n");
        for d in &report.diagnostics {
            let level = match d.level {
                DiagnosticLevel::Hint => "hint",
                DiagnosticLevel::Warning => "warning",
                DiagnosticLevel::Error => "error",
            };
            match &d.scenario {
                Some(name) => out.push_str(&format!(
                    "- **{}** `{}` {}: {}\n",
                    level, d.analyser, name, d.message
                )),
                None => out.push_str(&format!("- **{}** `{}`: {}\n", level, d.analyser, d.message)),
            }
        }
    }

    out
}
