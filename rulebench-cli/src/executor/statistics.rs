//! Statistics Computation
//!
//! Summary statistics for every measured scenario, computed in parallel with
//! Rayon once all timing has finished. Failed and crashed scenarios have no
//! samples and yield `None`.

use super::execution::ScenarioExecution;
use rulebench_stats::{OutlierMethod, SummaryStatistics, compute_mvalue, compute_summary};
use rayon::prelude::*;

/// Statistics for one scenario
#[derive(Debug, Clone)]
pub struct ScenarioStatistics {
    pub summary: SummaryStatistics,
    /// Modality indicator over all samples
    pub mvalue: f64,
    /// Mean CPU cycles per invocation
    pub mean_cycles: f64,
}

/// Compute statistics for execution results, in result order
pub fn compute_statistics(results: &[ScenarioExecution]) -> Vec<Option<ScenarioStatistics>> {
    results
        .par_iter()
        .map(|r| {
            if r.samples.is_empty() {
                return None;
            }
            let mean_cycles = if r.cpu_cycles.is_empty() {
                0.0
            } else {
                r.cpu_cycles.iter().sum::<u64>() as f64 / r.cpu_cycles.len() as f64
            };
            Some(ScenarioStatistics {
                summary: compute_summary(&r.samples, OutlierMethod::default()),
                mvalue: compute_mvalue(&r.samples),
                mean_cycles,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulebench_report::ScenarioStatus;

    fn execution(samples: Vec<f64>) -> ScenarioExecution {
        ScenarioExecution {
            name: "invoke".to_string(),
            status: ScenarioStatus::Passed,
            cpu_cycles: vec![100; samples.len()],
            batch_ns: samples.iter().map(|s| *s as u64).collect(),
            iterations: samples.len() as u64,
            iters_per_sample: 1,
            duration_ns: 0,
            failure: None,
            samples,
        }
    }

    #[test]
    fn test_empty_samples_have_no_statistics() {
        let stats = compute_statistics(&[execution(Vec::new()), execution(vec![10.0; 20])]);
        assert!(stats[0].is_none());

        let second = stats[1].as_ref().unwrap();
        assert_eq!(second.summary.mean, 10.0);
        assert_eq!(second.mean_cycles, 100.0);
    }
}
