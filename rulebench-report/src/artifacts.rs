//! Artifact Writer
//!
//! Writes the JSON, CSV and Markdown renderings of a report under
//! `<directory>/results/`. Each file is created, written and closed in turn.

use crate::csv::generate_csv_report;
use crate::json::generate_json_report;
use crate::markdown::generate_markdown_report;
use crate::report::Report;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors writing report artifacts
#[derive(Debug, Error)]
pub enum ReportError {
    /// The destination could not be created or written
    #[error("cannot write {}: {source}", path.display())]
    Unwritable {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The report could not be serialized
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write every artifact for `report`, returning the paths written
pub fn write_artifacts(report: &Report, directory: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let results_dir = directory.join("results");
    std::fs::create_dir_all(&results_dir).map_err(|source| ReportError::Unwritable {
        path: results_dir.clone(),
        source,
    })?;

    let stem = file_stem(&report.meta.title);
    let renderings = [
        (format!("{stem}-report.json"), generate_json_report(report)?),
        (format!("{stem}-report.csv"), generate_csv_report(report)),
        (
            format!("{stem}-report-github.md"),
            generate_markdown_report(report),
        ),
    ];

    let mut written = Vec::with_capacity(renderings.len());
    for (name, contents) in renderings {
        let path = results_dir.join(name);
        write_file(&path, &contents)?;
        written.push(path);
    }

    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    let unwritable = |source| ReportError::Unwritable {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(unwritable)?;
    file.write_all(contents.as_bytes()).map_err(unwritable)?;
    file.flush().map_err(unwritable)
}

/// Reduce a title to a portable file stem
fn file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if stem.is_empty() {
        "rulebench".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::*;
    use chrono::Utc;

    fn sample_report() -> Report {
        Report {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: "0.1.0".to_string(),
                title: "Rule Profile".to_string(),
                timestamp: Utc::now(),
                git_commit: None,
                git_branch: None,
                environment: EnvironmentInfo {
                    os: "linux".to_string(),
                    arch: "x86_64".to_string(),
                    cpu: "test".to_string(),
                    cpu_cores: 1,
                    memory_gb: 1.0,
                    optimized: true,
                    cycle_counter: true,
                },
                config: ReportConfig {
                    warmup_time_ns: 0,
                    measurement_time_ns: 0,
                    min_iterations: Some(10),
                    max_iterations: Some(10),
                    target_samples: 10,
                },
                overhead_ns: Some(1.0),
            },
            scenarios: vec![ScenarioResult {
                name: "get".to_string(),
                status: ScenarioStatus::Failed,
                duration_ms: 0.2,
                metrics: None,
                failure: Some(FailureInfo {
                    kind: "error".to_string(),
                    message: "rules not loaded".to_string(),
                }),
            }],
            diagnostics: vec![Diagnostic {
                analyser: "runtime-errors".to_string(),
                level: DiagnosticLevel::Error,
                scenario: Some("get".to_string()),
                message: "rules not loaded".to_string(),
            }],
            summary: ReportSummary {
                total_scenarios: 1,
                failed: 1,
                errors: 1,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Rule Profile"), "rule-profile");
        assert_eq!(file_stem("  "), "rulebench");
    }

    #[test]
    fn test_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_artifacts(&sample_report(), dir.path()).unwrap();

        assert_eq!(written.len(), 3);
        for path in &written {
            assert!(path.starts_with(dir.path().join("results")));
            assert!(path.exists());
        }

        let json = std::fs::read_to_string(&written[0]).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.scenarios[0].status, ScenarioStatus::Failed);

        let md = std::fs::read_to_string(&written[2]).unwrap();
        assert!(md.contains("| get | ❌ failed |"));
        assert!(md.contains("rules not loaded"));
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = write_artifacts(&sample_report(), &blocker).unwrap_err();
        assert!(matches!(err, ReportError::Unwritable { .. }));
    }
}
