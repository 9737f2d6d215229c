//! Report Data Structures

use chrono::{DateTime, Utc};
use rulebench_stats::SummaryStatistics;
use serde::{Deserialize, Serialize};

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete measured-run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub scenarios: Vec<ScenarioResult>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: ReportSummary,
}

impl Report {
    /// Look up a scenario result by name
    pub fn scenario(&self, name: &str) -> Option<&ScenarioResult> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Diagnostics raised for one scenario
    pub fn diagnostics_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.scenario.as_deref() == Some(name))
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub git_commit: Option<String>,
    pub git_branch: Option<String>,
    pub environment: EnvironmentInfo,
    pub config: ReportConfig,
    /// Mean time of an empty operation through the same loop
    pub overhead_ns: Option<f64>,
}

/// Host and build environment captured at run time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub os: String,
    pub arch: String,
    pub cpu: String,
    pub cpu_cores: u32,
    pub memory_gb: f64,
    /// Built with optimizations (no debug assertions)
    pub optimized: bool,
    /// Hardware cycle counter available
    pub cycle_counter: bool,
}

/// Execution settings captured in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub warmup_time_ns: u64,
    pub measurement_time_ns: u64,
    pub min_iterations: Option<u64>,
    pub max_iterations: Option<u64>,
    pub target_samples: usize,
}

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub status: ScenarioStatus,
    /// Wall-clock time spent on the scenario, warmup included
    pub duration_ms: f64,
    pub metrics: Option<ScenarioMetrics>,
    pub failure: Option<FailureInfo>,
}

/// Scenario execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    /// Measured successfully
    Passed,
    /// The operation returned an error
    Failed,
    /// The operation panicked
    Crashed,
}

impl ScenarioStatus {
    /// Whether the scenario raised during measurement
    pub fn is_runtime_error(self) -> bool {
        !matches!(self, ScenarioStatus::Passed)
    }
}

/// Timing metrics for a scenario, all per invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub samples: usize,
    pub iterations: u64,
    pub iters_per_sample: u64,
    pub mean_ns: f64,
    pub median_ns: f64,
    pub std_dev_ns: f64,
    pub std_error_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
    pub p50_ns: f64,
    pub p90_ns: f64,
    pub p95_ns: f64,
    pub p99_ns: f64,
    pub outliers_low: usize,
    pub outliers_high: usize,
    pub mvalue: f64,
    pub ops_per_sec: Option<f64>,
    /// Mean CPU cycles (0 without a cycle counter)
    pub mean_cycles: f64,
}

impl From<&SummaryStatistics> for ScenarioMetrics {
    fn from(stats: &SummaryStatistics) -> Self {
        Self {
            samples: stats.sample_count,
            iterations: 0,
            iters_per_sample: 1,
            mean_ns: stats.mean,
            median_ns: stats.median,
            std_dev_ns: stats.std_dev,
            std_error_ns: stats.std_error,
            min_ns: stats.min,
            max_ns: stats.max,
            p50_ns: stats.percentiles.p50,
            p90_ns: stats.percentiles.p90,
            p95_ns: stats.percentiles.p95,
            p99_ns: stats.percentiles.p99,
            outliers_low: stats.outliers.low_outliers,
            outliers_high: stats.outliers.high_outliers,
            mvalue: 2.0,
            ops_per_sec: (stats.mean > 0.0).then(|| 1_000_000_000.0 / stats.mean),
            mean_cycles: 0.0,
        }
    }
}

/// Failure information for a scenario that raised
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// "error" or "panic"
    pub kind: String,
    pub message: String,
}

/// Severity of an analyser finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Hint,
    Warning,
    Error,
}

/// One analyser finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Analyser identifier, e.g. "outliers"
    pub analyser: String,
    pub level: DiagnosticLevel,
    /// Scenario the finding is about; `None` for run-wide findings
    pub scenario: Option<String>,
    pub message: String,
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_scenarios: usize,
    pub passed: usize,
    pub failed: usize,
    pub crashed: usize,
    pub warnings: usize,
    pub errors: usize,
    pub total_duration_ms: f64,
}
