#![warn(missing_docs)]
//! rulebench CLI Library
//!
//! Command surface and execution harness for rule-profile benchmarks.
//! Call [`run`] from `main` with the profile to benchmark:
//!
//! ```ignore
//! fn main() -> std::process::ExitCode {
//!     rulebench_cli::run(MyProfile::new()).into()
//! }
//! ```
//!
//! Without a subcommand the binary runs the debug loop; `benchmark` runs
//! the measured mode and writes report artifacts.

mod config;
mod executor;
mod harness;
mod planner;

pub use config::*;
pub use executor::{
    AnalysisContext, AnalysisSettings, Analyser, EnvironmentAnalyser, ExecutionConfig, Executor,
    MinIterationTimeAnalyser, MultimodalAnalyser, OutliersAnalyser, RuntimeErrorsAnalyser,
    ScenarioExecution, ScenarioStatistics, ZeroMeasurementAnalyser, build_report,
    build_report_meta, capture_environment, compute_statistics, default_analysers,
    format_human_output, run_analysers,
};
pub use harness::{
    DEFAULT_DEBUG_ITERATIONS, Harness, HarnessConfig, HarnessError, RunMode, RunOutcome,
};
pub use planner::{ExecutionPlan, build_plan};

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};
use regex::Regex;
use rulebench_core::{DEFAULT_SAMPLE_COUNT, RuleProfile, ScenarioCatalog};
use std::cell::RefCell;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// rulebench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "rulebench")]
#[command(
    about = "rulebench - micro-benchmarks for a rule-evaluation engine",
    disable_help_flag = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Optional subcommand; without one the debug loop runs
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print help
    #[arg(short = 'h', long = "help", short_alias = '?', action = ArgAction::Help)]
    help: Option<bool>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the statistical benchmarks and write report artifacts
    #[command(disable_help_flag = true)]
    Benchmark {
        /// Artifacts directory (defaults to config or target/rulebench)
        #[arg(short, long, value_parser = parse_output_path)]
        output: Option<PathBuf>,

        /// Only run scenarios whose name matches this regex
        #[arg(long)]
        filter: Option<Regex>,

        /// Print help
        #[arg(short = 'h', long = "help", short_alias = '?', action = ArgAction::Help)]
        help: Option<bool>,
    },
}

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    /// Run completed, or help was printed
    Success = 0,
    /// Setup, registration, debug-loop or artifact failure
    RunFailed = 1,
    /// Bad command-line input; nothing ran
    Usage = 2,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

/// Validate `--output`: non-empty and not an existing non-directory
fn parse_output_path(raw: &str) -> Result<PathBuf, String> {
    if raw.trim().is_empty() {
        return Err("output path must not be empty".to_string());
    }
    let path = PathBuf::from(raw);
    if path.exists() && !path.is_dir() {
        return Err(format!("{} exists and is not a directory", path.display()));
    }
    Ok(path)
}

/// Run the rulebench CLI over `profile` with the process arguments.
/// This is the main entry point for benchmark binaries.
pub fn run<P: RuleProfile + 'static>(profile: P) -> Exit {
    run_from(std::env::args_os(), profile)
}

/// Parse `args` (program name first), then run
pub fn run_from<P, I, T>(args: I, profile: P) -> Exit
where
    P: RuleProfile + 'static,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            // Help goes to stdout; usage errors to stderr
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp => Exit::Success,
                _ => Exit::Usage,
            };
        }
    };

    init_logging(cli.verbose);

    let config = match BenchConfig::discover() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("{e}; using default configuration");
            BenchConfig::default()
        }
    };

    run_with_config(cli, &config, profile)
}

/// Run pre-parsed arguments with an explicit configuration
pub fn run_with_config<P: RuleProfile + 'static>(
    cli: Cli,
    config: &BenchConfig,
    profile: P,
) -> Exit {
    let harness = Harness::new(build_harness_config(&cli, config));

    let mut catalog = match ScenarioCatalog::for_profile(Rc::new(RefCell::new(profile))) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("failed to register scenarios: {e}");
            return Exit::RunFailed;
        }
    };

    match harness.run(&mut catalog) {
        Ok(RunOutcome::Debug { invocations }) => {
            tracing::info!(invocations, "debug loop complete");
            Exit::Success
        }
        Ok(RunOutcome::Measured { report, artifacts }) => {
            print!("{}", format_human_output(&report));
            for path in &artifacts {
                println!("Report written to: {}", path.display());
            }
            Exit::Success
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            Exit::RunFailed
        }
    }
}

/// Resolve CLI arguments and configuration into a [`HarnessConfig`]
pub fn build_harness_config(cli: &Cli, config: &BenchConfig) -> HarnessConfig {
    let mode = match &cli.command {
        None => RunMode::Debug {
            iterations: config.runner.debug_iterations,
        },
        Some(Commands::Benchmark { output, filter, .. }) => RunMode::Measured {
            output: output.clone(),
            filter: filter.clone(),
        },
    };

    HarnessConfig {
        mode,
        execution: build_execution_config(config),
        analysis: AnalysisSettings {
            min_iteration_time_ns: duration_or(
                &config.analysis.min_iteration_time,
                AnalysisSettings::default().min_iteration_time_ns,
            ),
            outlier_warning_pct: config.analysis.outlier_warning_pct,
        },
        default_artifacts_dir: PathBuf::from(&config.output.directory),
        title: config.output.title.clone(),
        show_progress: true,
    }
}

fn build_execution_config(config: &BenchConfig) -> ExecutionConfig {
    let defaults = ExecutionConfig::default();
    let runner = &config.runner;

    let execution = ExecutionConfig {
        warmup_time_ns: duration_or(&runner.warmup_time, defaults.warmup_time_ns),
        measurement_time_ns: duration_or(&runner.measurement_time, defaults.measurement_time_ns),
        min_iterations: runner.min_iterations,
        max_iterations: runner.max_iterations,
        target_samples: DEFAULT_SAMPLE_COUNT,
        pin_cpu: runner.pin_cpu,
    };

    // Fixed sample count overrides warmup/measurement/min/max
    match runner.samples {
        Some(n) => execution.fixed_samples(n),
        None => execution,
    }
}

fn duration_or(raw: &str, fallback: u64) -> u64 {
    BenchConfig::parse_duration(raw).unwrap_or_else(|e| {
        tracing::warn!("{e} in configuration; using {fallback}ns");
        fallback
    })
}

/// Install the stderr tracing subscriber. Later calls are no-ops.
fn init_logging(verbose: bool) {
    let directive = if verbose {
        "rulebench=debug"
    } else {
        "rulebench=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rulebench").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_subcommand_is_debug_mode() {
        let cli = parse(&[]).unwrap();
        let config = build_harness_config(&cli, &BenchConfig::default());
        assert!(matches!(config.mode, RunMode::Debug { iterations: 100 }));
    }

    #[test]
    fn test_benchmark_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bench");
        let cli = parse(&["benchmark", "-o", out.to_str().unwrap()]).unwrap();
        let config = build_harness_config(&cli, &BenchConfig::default());
        match config.mode {
            RunMode::Measured { output, filter } => {
                assert_eq!(output, Some(out));
                assert!(filter.is_none());
            }
            other => panic!("unexpected mode {other:?}"),
        }

        let cli = parse(&["benchmark", "--output", "results-dir"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Benchmark { output: Some(_), .. })
        ));
    }

    #[test]
    fn test_benchmark_without_output_uses_default_dir() {
        let cli = parse(&["benchmark"]).unwrap();
        let config = build_harness_config(&cli, &BenchConfig::default());
        assert!(matches!(config.mode, RunMode::Measured { output: None, .. }));
        assert_eq!(config.default_artifacts_dir, PathBuf::from("target/rulebench"));
    }

    #[test]
    fn test_help_flags() {
        for args in [
            &["-?"][..],
            &["-h"],
            &["--help"],
            &["benchmark", "-?"],
            &["benchmark", "--help"],
        ] {
            let err = parse(args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp, "args: {args:?}");
        }
    }

    #[test]
    fn test_usage_errors() {
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["benchmark", "--frobnicate"]).is_err());
        assert!(parse(&["benchmark", "-o", ""]).is_err());
        assert!(parse(&["benchmark", "-o"]).is_err());
        assert!(parse(&["benchmark", "--filter", "("]).is_err());
        assert!(parse(&["measure"]).is_err());
    }

    #[test]
    fn test_no_version_flag() {
        for flag in ["-V", "--version"] {
            let err = parse(&[flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        }
    }

    #[test]
    fn test_output_must_not_be_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = parse(&["benchmark", "-o", file.path().to_str().unwrap()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_samples_config_is_fixed_count() {
        let mut config = BenchConfig::default();
        config.runner.samples = Some(25);
        config.runner.pin_cpu = false;
        let execution = build_execution_config(&config);
        assert_eq!(execution.min_iterations, Some(25));
        assert_eq!(execution.max_iterations, Some(25));
        assert_eq!(execution.warmup_time_ns, 0);
        assert!(!execution.pin_cpu);
    }

    #[test]
    fn test_bad_duration_falls_back() {
        let mut config = BenchConfig::default();
        config.runner.warmup_time = "soon".to_string();
        assert_eq!(build_execution_config(&config).warmup_time_ns, 1_000_000_000);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Exit::Success as u8, 0);
        assert_eq!(Exit::RunFailed as u8, 1);
        assert_eq!(Exit::Usage as u8, 2);
        assert_eq!(ExitCode::from(Exit::Usage), ExitCode::from(2));
    }
}
