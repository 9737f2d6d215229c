//! Outlier Detection
//!
//! Tukey fences over the interquartile range. Outliers are flagged and
//! dropped from the cleaned set used for mean and standard deviation;
//! extremes and percentiles still see every sample.

use crate::percentiles::percentile_of_sorted;

/// Method for outlier detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlierMethod {
    /// Samples outside `[Q1 - k*IQR, Q3 + k*IQR]` are outliers
    Iqr {
        /// Fence multiplier (1.5 is Tukey's default)
        k: f64,
    },
    /// Keep every sample
    None,
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::Iqr { k: 1.5 }
    }
}

/// Result of outlier analysis
#[derive(Debug, Clone, Default)]
pub struct OutlierAnalysis {
    /// Samples inside the fences
    pub cleaned_samples: Vec<f64>,
    /// Samples below the lower fence
    pub low_outliers: usize,
    /// Samples above the upper fence
    pub high_outliers: usize,
    /// Lower fence
    pub lower_bound: f64,
    /// Upper fence
    pub upper_bound: f64,
    /// Total samples inspected
    pub total: usize,
}

impl OutlierAnalysis {
    /// Number of flagged samples
    pub fn outlier_count(&self) -> usize {
        self.low_outliers + self.high_outliers
    }

    /// Share of flagged samples, in percent
    pub fn outlier_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.outlier_count() as f64 / self.total as f64 * 100.0
    }
}

/// Detect outliers in `samples`
pub fn detect_outliers(samples: &[f64], method: OutlierMethod) -> OutlierAnalysis {
    let k = match method {
        OutlierMethod::Iqr { k } if !samples.is_empty() => k,
        _ => {
            return OutlierAnalysis {
                cleaned_samples: samples.to_vec(),
                lower_bound: f64::NEG_INFINITY,
                upper_bound: f64::INFINITY,
                total: samples.len(),
                ..Default::default()
            };
        }
    };

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = percentile_of_sorted(&sorted, 25.0);
    let q3 = percentile_of_sorted(&sorted, 75.0);
    let iqr = q3 - q1;
    let lower_bound = q1 - k * iqr;
    let upper_bound = q3 + k * iqr;

    let mut analysis = OutlierAnalysis {
        cleaned_samples: Vec::with_capacity(samples.len()),
        lower_bound,
        upper_bound,
        total: samples.len(),
        ..Default::default()
    };

    for &sample in samples {
        if sample < lower_bound {
            analysis.low_outliers += 1;
        } else if sample > upper_bound {
            analysis.high_outliers += 1;
        } else {
            analysis.cleaned_samples.push(sample);
        }
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_outliers() {
        let result = detect_outliers(&[1.0, 2.0, 3.0, 4.0, 5.0], OutlierMethod::default());
        assert_eq!(result.outlier_count(), 0);
        assert_eq!(result.cleaned_samples.len(), 5);
    }

    #[test]
    fn test_high_outlier() {
        let result = detect_outliers(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], OutlierMethod::default());
        assert_eq!(result.high_outliers, 1);
        assert_eq!(result.low_outliers, 0);
        assert_eq!(result.cleaned_samples.len(), 5);
        assert!(result.outlier_percentage() > 15.0 && result.outlier_percentage() < 20.0);
    }

    #[test]
    fn test_detection_disabled() {
        let result = detect_outliers(&[1.0, 2.0, 100.0], OutlierMethod::None);
        assert_eq!(result.outlier_count(), 0);
        assert_eq!(result.cleaned_samples.len(), 3);
    }

    #[test]
    fn test_empty() {
        let result = detect_outliers(&[], OutlierMethod::default());
        assert_eq!(result.total, 0);
        assert_eq!(result.outlier_percentage(), 0.0);
    }
}
