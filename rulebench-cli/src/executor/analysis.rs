//! Result Analysers
//!
//! A fixed set of checks run over the finished measurements. Each analyser
//! inspects the run and emits [`Diagnostic`]s; none of them changes the
//! results.
//!
//! Order matters for the report: environment, outliers, min-iteration-time,
//! multimodal, runtime-errors, zero-measurement.

use super::execution::ScenarioExecution;
use super::statistics::ScenarioStatistics;
use rulebench_report::{Diagnostic, DiagnosticLevel, EnvironmentInfo, format_duration};
use rulebench_stats::{Modality, compute_percentile};

/// Thresholds the analysers apply
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Shortest acceptable sample batch, in nanoseconds.
    ///
    /// The default sits below the per-sample budget of a default run
    /// (3s over 100 samples).
    pub min_iteration_time_ns: u64,
    /// Outlier share, in percent, above which a warning is raised
    pub outlier_warning_pct: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_iteration_time_ns: 10_000_000,
            outlier_warning_pct: 10.0,
        }
    }
}

/// Everything an analyser may look at
pub struct AnalysisContext<'a> {
    pub results: &'a [ScenarioExecution],
    /// Parallel with `results`
    pub stats: &'a [Option<ScenarioStatistics>],
    pub environment: &'a EnvironmentInfo,
    pub overhead_ns: Option<f64>,
    pub settings: &'a AnalysisSettings,
}

impl<'a> AnalysisContext<'a> {
    /// Measured scenarios paired with their statistics
    fn measured(&self) -> impl Iterator<Item = (&'a ScenarioExecution, &'a ScenarioStatistics)> {
        self.results
            .iter()
            .zip(self.stats)
            .filter_map(|(r, s)| s.as_ref().map(|s| (r, s)))
    }
}

/// A post-run check over measured scenarios
pub trait Analyser {
    /// Identifier recorded on each diagnostic
    fn id(&self) -> &'static str;

    /// Inspect the run
    fn analyse(&self, ctx: &AnalysisContext<'_>) -> Vec<Diagnostic>;
}

fn diagnostic(
    analyser: &dyn Analyser,
    level: DiagnosticLevel,
    scenario: Option<&str>,
    message: String,
) -> Diagnostic {
    Diagnostic {
        analyser: analyser.id().to_string(),
        level,
        scenario: scenario.map(str::to_string),
        message,
    }
}

/// Build and host checks
pub struct EnvironmentAnalyser;

impl Analyser for EnvironmentAnalyser {
    fn id(&self) -> &'static str {
        "environment"
    }

    fn analyse(&self, ctx: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        let mut found = Vec::new();
        if !ctx.environment.optimized {
            found.push(diagnostic(
                self,
                DiagnosticLevel::Warning,
                None,
                "built without optimizations; rerun with --release for meaningful timings"
                    .to_string(),
            ));
        }
        if !ctx.environment.cycle_counter {
            found.push(diagnostic(
                self,
                DiagnosticLevel::Hint,
                None,
                "no hardware cycle counter on this platform; cycle counts are reported as 0"
                    .to_string(),
            ));
        }
        found
    }
}

/// Reports samples dropped by the IQR fences
pub struct OutliersAnalyser;

impl Analyser for OutliersAnalyser {
    fn id(&self) -> &'static str {
        "outliers"
    }

    fn analyse(&self, ctx: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        let mut found = Vec::new();
        for (result, stats) in ctx.measured() {
            let outliers = &stats.summary.outliers;
            let count = outliers.outlier_count();
            if count == 0 {
                continue;
            }
            let pct = outliers.outlier_percentage();
            let level = if pct > ctx.settings.outlier_warning_pct {
                DiagnosticLevel::Warning
            } else {
                DiagnosticLevel::Hint
            };
            found.push(diagnostic(
                self,
                level,
                Some(&result.name),
                format!(
                    "{count} outliers removed ({} low, {} high, {pct:.1}% of {} samples)",
                    outliers.low_outliers, outliers.high_outliers, outliers.total
                ),
            ));
        }
        found
    }
}

/// Flags sample batches too short to time reliably
pub struct MinIterationTimeAnalyser;

impl Analyser for MinIterationTimeAnalyser {
    fn id(&self) -> &'static str {
        "min-iteration-time"
    }

    fn analyse(&self, ctx: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        let threshold = ctx.settings.min_iteration_time_ns as f64;
        ctx.measured()
            .filter_map(|(result, _)| {
                let batch_ns = *result.batch_ns.iter().min()? as f64;
                (batch_ns < threshold).then(|| {
                    diagnostic(
                        self,
                        DiagnosticLevel::Warning,
                        Some(&result.name),
                        format!(
                            "shortest sample batch took {}, below the {} minimum",
                            format_duration(batch_ns),
                            format_duration(threshold)
                        ),
                    )
                })
            })
            .collect()
    }
}

/// Distribution shape from the m-value
pub struct MultimodalAnalyser;

impl Analyser for MultimodalAnalyser {
    fn id(&self) -> &'static str {
        "multimodal"
    }

    fn analyse(&self, ctx: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        ctx.measured()
            .filter_map(|(result, stats)| {
                let mvalue = stats.mvalue;
                let (level, shape) = match Modality::from_mvalue(mvalue) {
                    Modality::Unimodal => return None,
                    Modality::SeveralModes => (DiagnosticLevel::Hint, "may have several modes"),
                    Modality::Bimodal => (DiagnosticLevel::Warning, "is bimodal"),
                    Modality::Multimodal => (DiagnosticLevel::Warning, "is multimodal"),
                };
                Some(diagnostic(
                    self,
                    level,
                    Some(&result.name),
                    format!("distribution {shape} (mvalue = {mvalue:.2})"),
                ))
            })
            .collect()
    }
}

/// One error per scenario that failed or crashed
pub struct RuntimeErrorsAnalyser;

impl Analyser for RuntimeErrorsAnalyser {
    fn id(&self) -> &'static str {
        "runtime-errors"
    }

    fn analyse(&self, ctx: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        ctx.results
            .iter()
            .filter(|r| r.status.is_runtime_error())
            .map(|r| {
                let detail = r
                    .failure
                    .as_ref()
                    .map(|f| format!("{}: {}", f.kind, f.message))
                    .unwrap_or_else(|| "no details".to_string());
                diagnostic(
                    self,
                    DiagnosticLevel::Error,
                    Some(&r.name),
                    format!("scenario raised during measurement ({detail})"),
                )
            })
            .collect()
    }
}

/// Scenarios indistinguishable from an empty operation
pub struct ZeroMeasurementAnalyser;

impl Analyser for ZeroMeasurementAnalyser {
    fn id(&self) -> &'static str {
        "zero-measurement"
    }

    fn analyse(&self, ctx: &AnalysisContext<'_>) -> Vec<Diagnostic> {
        let Some(overhead) = ctx.overhead_ns else {
            return Vec::new();
        };
        ctx.measured()
            .filter_map(|(result, stats)| {
                let summary = &stats.summary;
                // Within two standard errors (at least 1ns) of the empty loop
                let margin = (2.0 * summary.std_error).max(1.0);
                let p90 = compute_percentile(&result.samples, 90.0);
                (summary.mean - overhead <= margin && p90 - overhead <= margin).then(|| {
                    diagnostic(
                        self,
                        DiagnosticLevel::Warning,
                        Some(&result.name),
                        format!(
                            "mean {} is indistinguishable from the empty-operation overhead {}",
                            format_duration(summary.mean),
                            format_duration(overhead)
                        ),
                    )
                })
            })
            .collect()
    }
}

/// The fixed analyser set, in reporting order
pub fn default_analysers() -> Vec<Box<dyn Analyser>> {
    vec![
        Box::new(EnvironmentAnalyser),
        Box::new(OutliersAnalyser),
        Box::new(MinIterationTimeAnalyser),
        Box::new(MultimodalAnalyser),
        Box::new(RuntimeErrorsAnalyser),
        Box::new(ZeroMeasurementAnalyser),
    ]
}

/// Run every default analyser and collect their diagnostics
pub fn run_analysers(ctx: &AnalysisContext<'_>) -> Vec<Diagnostic> {
    default_analysers()
        .iter()
        .flat_map(|a| {
            let found = a.analyse(ctx);
            tracing::debug!(analyser = a.id(), diagnostics = found.len(), "analyser finished");
            found
        })
        .collect()
}
