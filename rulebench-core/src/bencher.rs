//! Bencher - Sample Collection
//!
//! Batched sampling: a warmup phase estimates the wall-clock cost of one
//! invocation, then measurement groups invocations into samples so each
//! sample is the average of many calls.

use crate::measure::Timer;

/// Default number of samples to collect
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Minimum samples required for statistical validity
pub const MIN_SAMPLE_COUNT: usize = 10;

/// One timing sample (average over a batch of invocations)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Average wall-clock time per invocation
    pub duration_nanos: u64,
    /// Average cycle count per invocation (0 without a cycle counter)
    pub cpu_cycles: u64,
    /// Wall-clock span of the whole batch, timer overhead included
    pub batch_nanos: u64,
}

/// Result of measuring one scenario
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Collected samples
    pub samples: Vec<Sample>,
    /// Total invocations, warmup included
    pub iterations: u64,
    /// Invocations averaged into each sample
    pub iters_per_sample: u64,
}

/// Iteration control for a measured scenario
pub struct Bencher {
    current_sample_time_ns: u64,
    current_sample_cycles: u64,
    current_sample_iters: u64,
    batch_start: Option<Timer>,

    samples: Vec<Sample>,

    target_samples: usize,
    iters_per_sample: u64,

    total_iterations: u64,
    is_warmup: bool,
}

impl Bencher {
    /// Create a Bencher targeting [`DEFAULT_SAMPLE_COUNT`] samples
    pub fn new() -> Self {
        Self::with_samples(DEFAULT_SAMPLE_COUNT)
    }

    /// Create a Bencher with a custom sample target (at least [`MIN_SAMPLE_COUNT`])
    pub fn with_samples(target_samples: usize) -> Self {
        let target_samples = target_samples.max(MIN_SAMPLE_COUNT);
        Self {
            current_sample_time_ns: 0,
            current_sample_cycles: 0,
            current_sample_iters: 0,
            batch_start: None,
            samples: Vec::with_capacity(target_samples),
            target_samples,
            iters_per_sample: 1,
            total_iterations: 0,
            is_warmup: true,
        }
    }

    /// Leave warmup; size batches so the samples fill `measurement_time_ns`.
    ///
    /// `warmup_elapsed_ns` is the wall-clock length of the warmup phase, so
    /// the per-invocation estimate covers timer and loop overhead as well as
    /// the operation itself.
    pub fn start_measurement(&mut self, measurement_time_ns: u64, warmup_elapsed_ns: u64) {
        self.is_warmup = false;

        let wall_per_iter = match self.total_iterations {
            0 => 0,
            n => warmup_elapsed_ns / n,
        };
        self.iters_per_sample = match wall_per_iter {
            0 => 1,
            per_iter => {
                let time_per_sample = measurement_time_ns / self.target_samples as u64;
                (time_per_sample / per_iter).max(1)
            }
        };

        self.current_sample_time_ns = 0;
        self.current_sample_cycles = 0;
        self.current_sample_iters = 0;
        self.batch_start = None;
    }

    #[inline]
    fn accumulate_sample(&mut self, duration_nanos: u64, cpu_cycles: u64) {
        self.total_iterations += 1;

        if !self.is_warmup {
            self.current_sample_time_ns += duration_nanos;
            self.current_sample_cycles += cpu_cycles;
            self.current_sample_iters += 1;

            if self.current_sample_iters >= self.iters_per_sample {
                self.flush_sample();
            }
        }
    }

    /// Time one invocation of `f` and hand its output back to the caller
    #[inline]
    pub fn iter<T, F>(&mut self, mut f: F) -> T
    where
        F: FnMut() -> T,
    {
        if !self.is_warmup && self.batch_start.is_none() {
            self.batch_start = Some(Timer::start());
        }

        let timer = Timer::start();
        let output = std::hint::black_box(f());
        let (duration_nanos, cpu_cycles) = timer.stop();

        self.accumulate_sample(duration_nanos, cpu_cycles);
        output
    }

    fn flush_sample(&mut self) {
        let batch_nanos = self
            .batch_start
            .take()
            .map_or(0, |t| t.elapsed().as_nanos() as u64);
        if self.current_sample_iters == 0 || self.samples.len() >= self.target_samples {
            return;
        }

        let n = self.current_sample_iters;
        self.samples.push(Sample {
            duration_nanos: self.current_sample_time_ns / n,
            cpu_cycles: self.current_sample_cycles / n,
            batch_nanos,
        });

        self.current_sample_time_ns = 0;
        self.current_sample_cycles = 0;
        self.current_sample_iters = 0;
    }

    /// Whether the sample target has been reached
    pub fn has_enough_samples(&self) -> bool {
        self.samples.len() >= self.target_samples
    }

    /// Invocations so far, warmup included
    pub fn iteration_count(&self) -> u64 {
        self.total_iterations
    }

    /// Return results. A trailing partial batch is kept only when no full
    /// batch completed.
    pub fn finish(mut self) -> BenchmarkResult {
        if self.samples.is_empty() {
            self.flush_sample();
        }

        BenchmarkResult {
            samples: self.samples,
            iterations: self.total_iterations,
            iters_per_sample: self.iters_per_sample,
        }
    }
}

impl Default for Bencher {
    fn default() -> Self {
        Self::new()
    }
}

/// Run warmup → measurement → finish, stopping at the first error `runner` returns.
///
/// * `warmup_time_ns` - how long to run the warmup phase
/// * `measurement_time_ns` - time budget for the measurement phase
/// * `min_iterations` - measurement invocations required before stopping
/// * `max_iterations` - cap on measurement invocations
pub fn run_benchmark_loop<F, E>(
    mut bencher: Bencher,
    mut runner: F,
    warmup_time_ns: u64,
    measurement_time_ns: u64,
    min_iterations: Option<u64>,
    max_iterations: Option<u64>,
) -> Result<BenchmarkResult, E>
where
    F: FnMut(&mut Bencher) -> Result<(), E>,
{
    let warmup = Timer::start();
    while warmup.elapsed().as_nanos() < warmup_time_ns as u128 {
        runner(&mut bencher)?;
    }

    bencher.start_measurement(measurement_time_ns, warmup.elapsed().as_nanos() as u64);

    let measure = Timer::start();
    let measurement_start_iterations = bencher.iteration_count();
    let min_iterations = min_iterations.unwrap_or(0);
    let max_iterations = max_iterations.unwrap_or(u64::MAX).max(min_iterations);

    loop {
        let measured = bencher
            .iteration_count()
            .saturating_sub(measurement_start_iterations);
        let min_iterations_met = measured >= min_iterations;
        let time_limit_reached = measure.elapsed().as_nanos() >= measurement_time_ns as u128;

        if measured >= max_iterations {
            break;
        }
        // Stop on sample target or time budget, but only once the minimum is met
        if (bencher.has_enough_samples() || time_limit_reached) && min_iterations_met {
            break;
        }

        runner(&mut bencher)?;
    }

    Ok(bencher.finish())
}
