//! Modality Detection
//!
//! Brendan Gregg's m-value: build a histogram, pad it with empty bins and
//! sum the absolute height changes between neighbouring bins, scaled by the
//! tallest bin. A single hump scores 2.0; every extra mode adds about 2.

/// m-value at or above which a distribution may have several modes
pub const MVALUE_SEVERAL_MODES: f64 = 2.8;

/// m-value at or above which a distribution is likely bimodal
pub const MVALUE_BIMODAL: f64 = 3.2;

/// m-value at or above which a distribution is likely multimodal
pub const MVALUE_MULTIMODAL: f64 = 4.2;

/// Shape classification derived from the m-value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    /// One mode
    Unimodal,
    /// Possibly more than one mode
    SeveralModes,
    /// Likely two modes
    Bimodal,
    /// Likely three or more modes
    Multimodal,
}

impl Modality {
    /// Classify an m-value
    pub fn from_mvalue(mvalue: f64) -> Self {
        if mvalue >= MVALUE_MULTIMODAL {
            Modality::Multimodal
        } else if mvalue >= MVALUE_BIMODAL {
            Modality::Bimodal
        } else if mvalue >= MVALUE_SEVERAL_MODES {
            Modality::SeveralModes
        } else {
            Modality::Unimodal
        }
    }
}

/// Compute the m-value of `samples`, binning with Scott's rule.
///
/// Returns 2.0 for fewer than two samples or zero spread.
pub fn compute_mvalue(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 2.0;
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let std_dev = (samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let bin_width = 3.5 * std_dev / n.cbrt();
    if bin_width.is_nan() || bin_width <= 0.0 || max <= min {
        return 2.0;
    }

    let bins = ((max - min) / bin_width).floor() as usize + 1;
    let mut histogram = vec![0usize; bins];
    for &x in samples {
        let idx = (((x - min) / bin_width).floor() as usize).min(bins - 1);
        histogram[idx] += 1;
    }

    let tallest = histogram.iter().copied().max().unwrap_or(0);
    if tallest == 0 {
        return 2.0;
    }

    // Pad with an empty bin on each side
    let mut sum = 0usize;
    let mut previous = 0usize;
    for &height in histogram.iter().chain(std::iter::once(&0)) {
        sum += height.abs_diff(previous);
        previous = height;
    }

    sum as f64 / tallest as f64
}
