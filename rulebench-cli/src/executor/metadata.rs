//! Environment Capture
//!
//! Host, build and git details recorded with every measured report.
//! Linux-specific data (CPU model, memory) degrades to "Unknown" or 0
//! elsewhere.

use super::execution::ExecutionConfig;
use chrono::Utc;
use rulebench_core::HAS_CYCLE_COUNTER;
use rulebench_report::{EnvironmentInfo, ReportConfig, ReportMeta, SCHEMA_VERSION};

/// Capture the current host and build environment
pub fn capture_environment() -> EnvironmentInfo {
    EnvironmentInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
        memory_gb: get_memory_gb().unwrap_or(0.0),
        optimized: !cfg!(debug_assertions),
        cycle_counter: HAS_CYCLE_COUNTER,
    }
}

/// Build report metadata
pub fn build_report_meta(
    title: &str,
    environment: EnvironmentInfo,
    config: &ExecutionConfig,
    overhead_ns: Option<f64>,
) -> ReportMeta {
    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        title: title.to_string(),
        timestamp: Utc::now(),
        git_commit: git(&["rev-parse", "HEAD"]),
        git_branch: git(&["rev-parse", "--abbrev-ref", "HEAD"]),
        environment,
        config: ReportConfig {
            warmup_time_ns: config.warmup_time_ns,
            measurement_time_ns: config.measurement_time_ns,
            min_iterations: config.min_iterations,
            max_iterations: config.max_iterations,
            target_samples: config.target_samples,
        },
        overhead_ns,
    }
}

fn git(args: &[&str]) -> Option<String> {
    std::process::Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

/// Total system memory in GB (Linux only)
fn get_memory_gb() -> Option<f64> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("MemTotal"))
                    .and_then(|l| {
                        l.split_whitespace()
                            .nth(1)
                            .and_then(|s| s.parse::<u64>().ok())
                    })
                    .map(|kb| kb as f64 / 1024.0 / 1024.0)
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_reflects_build() {
        let env = capture_environment();
        assert_eq!(env.os, std::env::consts::OS);
        assert_eq!(env.optimized, !cfg!(debug_assertions));
        assert_eq!(env.cycle_counter, HAS_CYCLE_COUNTER);
        assert!(env.cpu_cores >= 1);
    }

    #[test]
    fn test_meta_records_config() {
        let config = ExecutionConfig::default().fixed_samples(10);
        let meta = build_report_meta("rule-profile", capture_environment(), &config, Some(3.5));
        assert_eq!(meta.title, "rule-profile");
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        assert_eq!(meta.config.min_iterations, Some(10));
        assert_eq!(meta.overhead_ns, Some(3.5));
    }
}
