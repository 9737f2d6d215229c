//! Summary Statistics
//!
//! Mean, median and standard deviation come from the cleaned samples;
//! min, max and percentiles come from all samples.

use crate::outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
use crate::percentiles::{Percentiles, compute_percentile, compute_percentiles};

/// Summary of one scenario's samples
#[derive(Debug, Clone, Default)]
pub struct SummaryStatistics {
    /// Mean of cleaned samples
    pub mean: f64,
    /// Median of cleaned samples
    pub median: f64,
    /// Sample standard deviation of cleaned samples
    pub std_dev: f64,
    /// Standard error of the mean
    pub std_error: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Percentiles over all samples
    pub percentiles: Percentiles,
    /// Number of samples
    pub sample_count: usize,
    /// Outlier breakdown
    pub outliers: OutlierAnalysis,
}

impl SummaryStatistics {
    /// Relative standard deviation, in percent
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev / self.mean * 100.0
        }
    }
}

/// Compute summary statistics for `samples`
pub fn compute_summary(samples: &[f64], outlier_method: OutlierMethod) -> SummaryStatistics {
    let outliers = detect_outliers(samples, outlier_method);
    if samples.is_empty() {
        return SummaryStatistics {
            outliers,
            ..Default::default()
        };
    }

    let cleaned = &outliers.cleaned_samples;
    let (mean, median, std_dev) = if cleaned.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let mean = cleaned.iter().sum::<f64>() / cleaned.len() as f64;
        let std_dev = if cleaned.len() < 2 {
            0.0
        } else {
            let variance = cleaned.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
                / (cleaned.len() - 1) as f64;
            variance.sqrt()
        };
        (mean, compute_percentile(cleaned, 50.0), std_dev)
    };

    let std_error = if cleaned.is_empty() {
        0.0
    } else {
        std_dev / (cleaned.len() as f64).sqrt()
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SummaryStatistics {
        mean,
        median,
        std_dev,
        std_error,
        min,
        max,
        percentiles: compute_percentiles(samples),
        sample_count: samples.len(),
        outliers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let summary = compute_summary(&[1.0, 2.0, 3.0, 4.0, 5.0], OutlierMethod::default());

        assert!((summary.mean - 3.0).abs() < 0.01);
        assert!((summary.median - 3.0).abs() < 0.01);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.sample_count, 5);
        assert!(summary.std_error > 0.0);
    }

    #[test]
    fn test_outliers_excluded_from_mean_only() {
        let summary = compute_summary(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], OutlierMethod::default());

        assert!(summary.mean < 10.0);
        assert_eq!(summary.max, 100.0);
        assert!(summary.percentiles.p99 > 50.0);
        assert_eq!(summary.outliers.outlier_count(), 1);
    }

    #[test]
    fn test_constant_samples() {
        let summary = compute_summary(&[100.0; 5], OutlierMethod::None);
        assert_eq!(summary.coefficient_of_variation(), 0.0);
    }

    #[test]
    fn test_empty_samples() {
        let summary = compute_summary(&[], OutlierMethod::default());
        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.mean, 0.0);
    }
}
