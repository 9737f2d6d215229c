//! Measured-Mode Executor
//!
//! ## Pipeline Overview
//!
//! ```text
//! ScenarioCatalog + ExecutionPlan
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Run scenarios, collect samples, isolate failures
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Summary stats + m-value (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  analysis   │  Fixed analyser set → diagnostics
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build Report
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```

mod analysis;
mod execution;
mod formatting;
mod metadata;
mod report;
mod statistics;

pub use analysis::{
    AnalysisContext, AnalysisSettings, Analyser, EnvironmentAnalyser, MinIterationTimeAnalyser,
    MultimodalAnalyser, OutliersAnalyser, RuntimeErrorsAnalyser, ZeroMeasurementAnalyser,
    default_analysers, run_analysers,
};
pub use execution::{ExecutionConfig, Executor, ScenarioExecution};
pub use formatting::format_human_output;
pub use metadata::{build_report_meta, capture_environment};
pub use report::build_report;
pub use statistics::{ScenarioStatistics, compute_statistics};
