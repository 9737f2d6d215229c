#![warn(missing_docs)]
//! # rulebench
//!
//! Micro-benchmark driver for a rule-evaluation engine.
//!
//! - **Scenario Catalog**: a fixed, ordered set of named operations bound to one profile
//! - **Two Modes**: a plain debug loop for attaching profilers, and a measured mode
//! - **Per-Scenario Isolation**: in measured mode a failing scenario is recorded, not fatal
//! - **Analysers**: environment, outliers, min-iteration-time, multimodal, runtime-errors,
//!   zero-measurement
//! - **Artifacts**: JSON, CSV and GitHub Markdown reports
//!
//! ## Quick Start
//!
//! ```ignore
//! use rulebench::prelude::*;
//!
//! fn main() -> std::process::ExitCode {
//!     rulebench::run(FixtureProfile::new()).into()
//! }
//! ```

pub mod binding;
pub mod profile;
pub mod rules;

// Re-export core types
pub use rulebench_core::{
    ArtifactError, BlockBody, CatalogError, ClassificationKind, ClassifiedArtifact,
    LanguageBlock, OperationResult, RuleProfile, RuleSet, SCENARIO_NAMES, ScenarioCatalog,
    ScenarioEntry,
};

// Re-export stats
pub use rulebench_stats::{Modality, SummaryStatistics, compute_mvalue, compute_summary};

// Re-export report types
pub use rulebench_report::{
    Diagnostic, DiagnosticLevel, Report, ReportError, ScenarioStatus, write_artifacts,
};

// Re-export the harness
pub use rulebench_cli::{
    BenchConfig, Exit, Harness, HarnessConfig, HarnessError, RunMode, RunOutcome, run, run_from,
};

pub use binding::TargetBinding;
pub use profile::FixtureProfile;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Exit, FixtureProfile, Harness, HarnessConfig, OperationResult, RuleProfile, RunMode,
        ScenarioCatalog,
    };
}
