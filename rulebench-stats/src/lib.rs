#![warn(missing_docs)]
//! rulebench Statistical Engine
//!
//! Turns raw timing samples into the figures the analysers and reports use:
//! - Percentiles over all samples (tails keep outliers)
//! - Outlier detection with Tukey fences
//! - Summary statistics over cleaned samples
//! - m-value modality detection

mod modality;
mod outliers;
mod percentiles;
mod summary;

pub use modality::{
    MVALUE_BIMODAL, MVALUE_MULTIMODAL, MVALUE_SEVERAL_MODES, Modality, compute_mvalue,
};
pub use outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
pub use percentiles::{Percentiles, compute_percentile, compute_percentiles, percentile_of_sorted};
pub use summary::{SummaryStatistics, compute_summary};
