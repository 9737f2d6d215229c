#![warn(missing_docs)]
//! rulebench Core
//!
//! Building blocks shared by the harness and the profiles it drives:
//! - Classification model for parsed rule-definition artifacts
//! - `ScenarioCatalog`, the ordered registry of named operations
//! - `RuleProfile`, the subject contract bound to the fixed scenario names
//! - `Bencher` batched sampling and high-precision timing

mod bencher;
mod catalog;
mod classification;
mod measure;
mod profile;

pub use bencher::{
    Bencher, BenchmarkResult, DEFAULT_SAMPLE_COUNT, MIN_SAMPLE_COUNT, Sample, run_benchmark_loop,
};
pub use catalog::{CatalogError, Operation, OperationResult, ScenarioCatalog, ScenarioEntry};
pub use classification::{
    ArtifactError, BlockBody, ClassificationKind, ClassifiedArtifact, LanguageBlock, RuleSet,
};
/// Whether this platform provides hardware cycle counters (x86_64 RDTSCP or AArch64 CNTVCT_EL0).
/// When `false`, cycle counts are reported as 0 and only wall-clock nanoseconds are available.
pub use measure::HAS_CYCLE_COUNTER;
pub use measure::{Timer, pin_to_cpu};
pub use profile::{RuleProfile, SCENARIO_NAMES};
