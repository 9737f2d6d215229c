//! Scenario Execution
//!
//! Drives catalog entries through the warmup → measurement sample loop.
//!
//! ## Failure isolation
//!
//! Each scenario runs under `catch_unwind`. An operation that returns an
//! error stops its own sample loop and is recorded as `Failed`; one that
//! panics is recorded as `Crashed`. Either way the next scenario still runs.
//!
//! ```text
//! ScenarioEntry (from the catalog)
//!        │
//!        ▼
//!   ExecutionConfig
//!        │
//!        ▼
//! ┌──────────────────┐
//! │    Executor      │  Warmup → Measurement → Sample Collection
//! └────────┬─────────┘
//!          │
//!          ▼
//!  ScenarioExecution (samples, status, cycles)
//! ```

use crate::planner::ExecutionPlan;
use indicatif::{ProgressBar, ProgressStyle};
use rulebench_core::{
    Bencher, BenchmarkResult, OperationResult, ScenarioCatalog, ScenarioEntry, pin_to_cpu,
    run_benchmark_loop,
};
use rulebench_report::{FailureInfo, ScenarioStatus};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

/// Configuration for measured execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    /// Warmup time in nanoseconds
    pub warmup_time_ns: u64,
    /// Measurement time in nanoseconds
    pub measurement_time_ns: u64,
    /// Minimum measured invocations
    pub min_iterations: Option<u64>,
    /// Maximum measured invocations
    pub max_iterations: Option<u64>,
    /// Samples each scenario aims to collect
    pub target_samples: usize,
    /// Pin the executing thread to CPU 0
    pub pin_cpu: bool,
}

impl ExecutionConfig {
    /// Fixed sample count mode: no warmup, exactly `n` invocations
    pub fn fixed_samples(self, n: u64) -> Self {
        Self {
            warmup_time_ns: 0,
            measurement_time_ns: 0,
            min_iterations: Some(n),
            max_iterations: Some(n),
            ..self
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            warmup_time_ns: 1_000_000_000,
            measurement_time_ns: 3_000_000_000,
            min_iterations: None,
            max_iterations: None,
            target_samples: rulebench_core::DEFAULT_SAMPLE_COUNT,
            pin_cpu: true,
        }
    }
}

/// Result from executing a single scenario
#[derive(Debug, Clone)]
pub struct ScenarioExecution {
    pub name: String,
    pub status: ScenarioStatus,
    /// Per-invocation time of each sample, in nanoseconds
    pub samples: Vec<f64>,
    /// CPU cycles per sample (parallel with samples)
    pub cpu_cycles: Vec<u64>,
    /// Wall-clock span of each sample batch (parallel with samples)
    pub batch_ns: Vec<u64>,
    pub iterations: u64,
    pub iters_per_sample: u64,
    /// Wall-clock time the scenario took, warmup included
    pub duration_ns: u64,
    pub failure: Option<FailureInfo>,
}

impl ScenarioExecution {
    fn passed(name: &str, result: BenchmarkResult, duration_ns: u64) -> Self {
        Self {
            name: name.to_string(),
            status: ScenarioStatus::Passed,
            samples: result
                .samples
                .iter()
                .map(|s| s.duration_nanos as f64)
                .collect(),
            cpu_cycles: result.samples.iter().map(|s| s.cpu_cycles).collect(),
            batch_ns: result.samples.iter().map(|s| s.batch_nanos).collect(),
            iterations: result.iterations,
            iters_per_sample: result.iters_per_sample,
            duration_ns,
            failure: None,
        }
    }

    fn raised(name: &str, status: ScenarioStatus, failure: FailureInfo, duration_ns: u64) -> Self {
        Self {
            name: name.to_string(),
            status,
            samples: Vec::new(),
            cpu_cycles: Vec::new(),
            batch_ns: Vec::new(),
            iterations: 0,
            iters_per_sample: 0,
            duration_ns,
            failure: Some(failure),
        }
    }
}

/// Runs planned scenarios in-process, one at a time
pub struct Executor {
    config: ExecutionConfig,
    show_progress: bool,
}

impl Executor {
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            show_progress: true,
        }
    }

    /// Toggle the progress bar
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Pin the current thread if configured. Failure only degrades precision.
    pub fn pin(&self) {
        if !self.config.pin_cpu {
            return;
        }
        match pin_to_cpu(0) {
            Ok(()) => tracing::debug!("pinned measuring thread to CPU 0"),
            Err(e) => tracing::warn!("could not pin measuring thread to CPU 0: {e}"),
        }
    }

    /// Mean time of an empty operation through the same sample loop.
    ///
    /// Uses a tenth of the configured warmup and measurement budget.
    pub fn measure_overhead(&self) -> Option<f64> {
        let mut empty = || -> OperationResult { Ok(()) };
        let result = run_benchmark_loop(
            Bencher::with_samples(self.config.target_samples),
            |b| b.iter(&mut empty),
            self.config.warmup_time_ns / 10,
            self.config.measurement_time_ns / 10,
            self.config.min_iterations,
            self.config.max_iterations,
        )
        .ok()?;

        if result.samples.is_empty() {
            return None;
        }
        let total: f64 = result.samples.iter().map(|s| s.duration_nanos as f64).sum();
        Some(total / result.samples.len() as f64)
    }

    /// Execute every scenario in `plan`, in plan order
    pub fn execute(
        &self,
        catalog: &mut ScenarioCatalog,
        plan: &ExecutionPlan,
    ) -> Vec<ScenarioExecution> {
        let pb = if self.show_progress {
            ProgressBar::new(plan.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let entries = catalog.all_mut();
        let mut results = Vec::with_capacity(plan.len());
        for &index in &plan.indices {
            let Some(entry) = entries.get_mut(index) else {
                continue;
            };
            pb.set_message(entry.name().to_string());
            let result = self.execute_single(entry);
            match result.status {
                ScenarioStatus::Passed => tracing::debug!(
                    scenario = %result.name,
                    samples = result.samples.len(),
                    iterations = result.iterations,
                    "scenario measured"
                ),
                status => tracing::warn!(
                    scenario = %result.name,
                    ?status,
                    "scenario raised during measurement"
                ),
            }
            results.push(result);
            pb.inc(1);
        }

        pb.finish_with_message("Complete");
        results
    }

    /// Execute a single scenario
    fn execute_single(&self, entry: &mut ScenarioEntry) -> ScenarioExecution {
        let start = Instant::now();
        let cfg = &self.config;
        let name = entry.name().to_string();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            run_benchmark_loop(
                Bencher::with_samples(cfg.target_samples),
                |b| b.iter(|| entry.invoke()),
                cfg.warmup_time_ns,
                cfg.measurement_time_ns,
                cfg.min_iterations,
                cfg.max_iterations,
            )
        }));

        let duration_ns = start.elapsed().as_nanos() as u64;

        match outcome {
            Ok(Ok(result)) => ScenarioExecution::passed(&name, result, duration_ns),
            Ok(Err(error)) => ScenarioExecution::raised(
                &name,
                ScenarioStatus::Failed,
                FailureInfo {
                    kind: "error".to_string(),
                    message: format!("{error:#}"),
                },
                duration_ns,
            ),
            Err(panic) => {
                let message = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };

                ScenarioExecution::raised(
                    &name,
                    ScenarioStatus::Crashed,
                    FailureInfo {
                        kind: "panic".to_string(),
                        message,
                    },
                    duration_ns,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::build_plan;

    fn quick() -> ExecutionConfig {
        ExecutionConfig {
            pin_cpu: false,
            ..ExecutionConfig::default()
        }
        .fixed_samples(20)
    }

    #[test]
    fn test_fixed_samples_clears_timing() {
        let cfg = ExecutionConfig::default().fixed_samples(50);
        assert_eq!(cfg.warmup_time_ns, 0);
        assert_eq!(cfg.measurement_time_ns, 0);
        assert_eq!(cfg.min_iterations, Some(50));
        assert_eq!(cfg.max_iterations, Some(50));
    }

    #[test]
    fn test_failures_are_isolated() {
        let mut catalog = ScenarioCatalog::new();
        catalog.register("ok", || Ok(())).unwrap();
        catalog
            .register("errors", || Err(anyhow::anyhow!("rule set missing")))
            .unwrap();
        catalog
            .register("panics", || -> OperationResult { panic!("index out of range") })
            .unwrap();
        catalog.register("after", || Ok(())).unwrap();

        let plan = build_plan(&catalog, None);
        let results = Executor::new(quick())
            .with_progress(false)
            .execute(&mut catalog, &plan);

        let statuses: Vec<_> = results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                ScenarioStatus::Passed,
                ScenarioStatus::Failed,
                ScenarioStatus::Crashed,
                ScenarioStatus::Passed,
            ]
        );

        let failed = results[1].failure.as_ref().unwrap();
        assert_eq!(failed.kind, "error");
        assert!(failed.message.contains("rule set missing"));

        let crashed = results[2].failure.as_ref().unwrap();
        assert_eq!(crashed.kind, "panic");
        assert!(crashed.message.contains("index out of range"));

        assert_eq!(results[3].iterations, 20);
        assert!(!results[3].samples.is_empty());
        assert_eq!(results[3].batch_ns.len(), results[3].samples.len());
        assert!(results.iter().all(|r| r.duration_ns > 0));
    }

    #[test]
    fn test_overhead_is_measured() {
        let executor = Executor::new(quick()).with_progress(false);
        let overhead = executor.measure_overhead().unwrap();
        assert!(overhead >= 0.0);
    }
}
