//! Execution Harness
//!
//! Runs a [`ScenarioCatalog`] in one of two modes, chosen once before any
//! scenario executes:
//!
//! - **Debug loop**: every scenario, in catalog order, a fixed number of
//!   times with no timing. Meant for attaching an external profiler. The
//!   first error aborts the run.
//! - **Measured**: every selected scenario through the sample loop, then
//!   statistics, analysers, a report and artifact files. A scenario that
//!   errors or panics is recorded and the batch continues.

use crate::executor::{
    AnalysisContext, AnalysisSettings, ExecutionConfig, Executor, build_report,
    build_report_meta, capture_environment, compute_statistics, run_analysers,
};
use crate::planner::build_plan;
use regex::Regex;
use rulebench_core::ScenarioCatalog;
use rulebench_report::{Report, ReportError, write_artifacts};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Default debug-loop iteration count per scenario
pub const DEFAULT_DEBUG_ITERATIONS: usize = 100;

/// Execution mode
#[derive(Debug, Clone)]
pub enum RunMode {
    /// Plain invocation loop, no timing
    Debug {
        /// Invocations per scenario
        iterations: usize,
    },
    /// Statistical measurement with report artifacts
    Measured {
        /// Artifacts directory; the configured default when `None`
        output: Option<PathBuf>,
        /// Only scenarios whose name matches
        filter: Option<Regex>,
    },
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::Debug {
            iterations: DEFAULT_DEBUG_ITERATIONS,
        }
    }
}

/// Everything a run needs, resolved before it starts
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub mode: RunMode,
    pub execution: ExecutionConfig,
    pub analysis: AnalysisSettings,
    /// Used when measured mode has no explicit output
    pub default_artifacts_dir: PathBuf,
    /// Report title and artifact file stem
    pub title: String,
    pub show_progress: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            execution: ExecutionConfig::default(),
            analysis: AnalysisSettings::default(),
            default_artifacts_dir: PathBuf::from("target/rulebench"),
            title: "rule-profile".to_string(),
            show_progress: true,
        }
    }
}

/// Errors that end a run
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The subject's one-time setup failed; nothing ran
    #[error("subject setup failed: {0:#}")]
    SetupFailure(#[source] anyhow::Error),

    /// A scenario raised in debug-loop mode
    #[error("scenario `{scenario}` failed on iteration {iteration}: {source:#}")]
    UnguardedFailure {
        /// Scenario that raised
        scenario: String,
        /// Zero-based iteration that raised
        iteration: usize,
        /// Error the operation returned
        #[source]
        source: anyhow::Error,
    },

    /// Measured artifacts could not be written
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// What a successful run produced
#[derive(Debug)]
pub enum RunOutcome {
    /// Debug loop finished
    Debug {
        /// Total operation invocations
        invocations: u64,
    },
    /// Measured run finished and artifacts were written
    Measured {
        /// The full report
        report: Box<Report>,
        /// Written files: JSON, CSV, Markdown
        artifacts: Vec<PathBuf>,
    },
}

/// Runs a catalog according to a [`HarnessConfig`]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Prepare the subject once, then run every scenario in the configured mode
    pub fn run(&self, catalog: &mut ScenarioCatalog) -> Result<RunOutcome, HarnessError> {
        catalog
            .prepare_subject()
            .map_err(HarnessError::SetupFailure)?;
        tracing::debug!(scenarios = catalog.len(), "subject prepared");

        match &self.config.mode {
            RunMode::Debug { iterations } => self.run_debug(catalog, *iterations),
            RunMode::Measured { output, filter } => {
                let directory = output
                    .clone()
                    .unwrap_or_else(|| self.config.default_artifacts_dir.clone());
                self.run_measured(catalog, directory, filter.as_ref())
            }
        }
    }

    fn run_debug(
        &self,
        catalog: &mut ScenarioCatalog,
        iterations: usize,
    ) -> Result<RunOutcome, HarnessError> {
        tracing::info!(scenarios = catalog.len(), iterations, "running debug loop");

        let mut invocations = 0u64;
        for entry in catalog.all_mut() {
            for iteration in 0..iterations {
                entry
                    .invoke()
                    .map_err(|source| HarnessError::UnguardedFailure {
                        scenario: entry.name().to_string(),
                        iteration,
                        source,
                    })?;
                invocations += 1;
            }
            tracing::debug!(scenario = entry.name(), iterations, "scenario done");
        }

        Ok(RunOutcome::Debug { invocations })
    }

    fn run_measured(
        &self,
        catalog: &mut ScenarioCatalog,
        directory: PathBuf,
        filter: Option<&Regex>,
    ) -> Result<RunOutcome, HarnessError> {
        let start = Instant::now();
        let plan = build_plan(catalog, filter);
        if plan.is_empty() {
            tracing::warn!("no scenarios matched the filter");
        }
        tracing::info!(
            scenarios = plan.len(),
            output = %directory.display(),
            "running measured benchmarks"
        );

        let executor =
            Executor::new(self.config.execution.clone()).with_progress(self.config.show_progress);
        // Start the statistics pool first so its workers keep the full affinity mask
        let _ = rayon::current_num_threads();
        executor.pin();
        let overhead_ns = executor.measure_overhead();
        let results = executor.execute(catalog, &plan);

        let stats = compute_statistics(&results);
        let environment = capture_environment();
        let diagnostics = run_analysers(&AnalysisContext {
            results: &results,
            stats: &stats,
            environment: &environment,
            overhead_ns,
            settings: &self.config.analysis,
        });

        let meta = build_report_meta(
            &self.config.title,
            environment,
            &self.config.execution,
            overhead_ns,
        );
        let total_duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        let report = build_report(meta, &results, &stats, diagnostics, total_duration_ms);

        let artifacts = write_artifacts(&report, &directory)?;
        for path in &artifacts {
            tracing::info!(path = %path.display(), "wrote artifact");
        }

        Ok(RunOutcome::Measured {
            report: Box::new(report),
            artifacts,
        })
    }
}
