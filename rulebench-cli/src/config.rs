//! Configuration loading from rulebench.toml
//!
//! Settings live in a `rulebench.toml` file, discovered by walking up from
//! the current directory. Every field has a default, so a partial file (or
//! none at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file searched for during discovery
pub const CONFIG_FILE_NAME: &str = "rulebench.toml";

/// Errors reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },

    /// A duration string could not be parsed
    #[error("invalid duration `{0}`")]
    Duration(String),
}

/// rulebench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Analyser thresholds
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for both execution modes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Warmup duration before measurement (e.g., "1s")
    #[serde(default = "default_warmup")]
    pub warmup_time: String,
    /// Measurement duration per scenario (e.g., "3s")
    #[serde(default = "default_measurement")]
    pub measurement_time: String,
    /// Fixed sample count: skip warmup, run exactly N measured invocations
    #[serde(default)]
    pub samples: Option<u64>,
    /// Minimum measured invocations per scenario
    #[serde(default)]
    pub min_iterations: Option<u64>,
    /// Maximum measured invocations per scenario
    #[serde(default)]
    pub max_iterations: Option<u64>,
    /// Invocations per scenario in debug-loop mode
    #[serde(default = "default_debug_iterations")]
    pub debug_iterations: usize,
    /// Pin the measuring thread to CPU 0
    #[serde(default = "default_pin_cpu")]
    pub pin_cpu: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup_time: default_warmup(),
            measurement_time: default_measurement(),
            samples: None,
            min_iterations: None,
            max_iterations: None,
            debug_iterations: default_debug_iterations(),
            pin_cpu: default_pin_cpu(),
        }
    }
}

fn default_warmup() -> String {
    "1s".to_string()
}
fn default_measurement() -> String {
    "3s".to_string()
}
fn default_debug_iterations() -> usize {
    100
}
fn default_pin_cpu() -> bool {
    true
}

/// Analyser thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Shortest acceptable sample batch (e.g., "10ms")
    #[serde(default = "default_min_iteration_time")]
    pub min_iteration_time: String,
    /// Outlier share, in percent, above which a warning is raised
    #[serde(default = "default_outlier_warning_pct")]
    pub outlier_warning_pct: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_iteration_time: default_min_iteration_time(),
            outlier_warning_pct: default_outlier_warning_pct(),
        }
    }
}

fn default_min_iteration_time() -> String {
    "10ms".to_string()
}
fn default_outlier_warning_pct() -> f64 {
    10.0
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Artifacts directory used when `--output` is not given
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Report title, also the artifact file stem
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            title: default_title(),
        }
    }
}

fn default_output_dir() -> String {
    "target/rulebench".to_string()
}
fn default_title() -> String {
    "rule-profile".to_string()
}

impl BenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find the nearest `rulebench.toml` walking up from the current directory.
    ///
    /// Returns `Ok(None)` when no file exists.
    pub fn discover() -> Result<Option<Self>, ConfigError> {
        let Ok(mut dir) = std::env::current_dir() else {
            return Ok(None);
        };
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::load(&candidate).map(Some);
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Parse a duration string (e.g., "3s", "500ms", "2m") to nanoseconds
    pub fn parse_duration(s: &str) -> Result<u64, ConfigError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::Duration(s.to_string()));
        }

        let (number, unit) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| ConfigError::Duration(s.to_string()))?;
        if value < 0.0 {
            return Err(ConfigError::Duration(s.to_string()));
        }

        let multiplier: u64 = match unit.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(ConfigError::Duration(s.to_string())),
        };

        Ok((value * multiplier as f64) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.runner.debug_iterations, 100);
        assert_eq!(config.runner.warmup_time, "1s");
        assert_eq!(config.output.directory, "target/rulebench");
        assert!(config.runner.pin_cpu);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(BenchConfig::parse_duration("3s").unwrap(), 3_000_000_000);
        assert_eq!(BenchConfig::parse_duration("500ms").unwrap(), 500_000_000);
        assert_eq!(BenchConfig::parse_duration("100us").unwrap(), 100_000);
        assert_eq!(BenchConfig::parse_duration("1000ns").unwrap(), 1000);
        assert_eq!(BenchConfig::parse_duration("2m").unwrap(), 120_000_000_000);
        assert_eq!(BenchConfig::parse_duration("1.5s").unwrap(), 1_500_000_000);
        assert_eq!(BenchConfig::parse_duration("2").unwrap(), 2_000_000_000);
        assert!(BenchConfig::parse_duration("").is_err());
        assert!(BenchConfig::parse_duration("3 fortnights").is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: BenchConfig = toml::from_str(
            r#"
            [runner]
            debug_iterations = 10
            samples = 20

            [output]
            directory = "bench-out"
            "#,
        )
        .unwrap();

        assert_eq!(config.runner.debug_iterations, 10);
        assert_eq!(config.runner.samples, Some(20));
        assert_eq!(config.runner.measurement_time, "3s");
        assert_eq!(config.output.directory, "bench-out");
        assert_eq!(config.output.title, "rule-profile");
        assert_eq!(config.analysis.min_iteration_time, "10ms");
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[runner]\ndebug_iterations = \"many\"\n").unwrap();

        let err = BenchConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
