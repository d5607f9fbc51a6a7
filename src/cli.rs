//! CLI argument parsing for expstat

use crate::metric::Metric;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "expstat")]
#[command(version)]
#[command(about = "Aggregate repeated solver runs and test configurations for significant differences", long_about = None)]
pub struct Cli {
    /// Experiment configuration file (TOML)
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Enable debug tracing to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Average the run records of every instance into its summary file
    Aggregate(LayoutArgs),
    /// Kolmogorov-Smirnov normality test of per-instance values
    Normality(SeriesArgs),
    /// Pairwise Mann-Whitney U tests between configurations
    Compare(SeriesArgs),
    /// Mean of per-instance summaries for each configuration
    Reduce(LayoutArgs),
}

/// Directory layout overrides shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Experiment root directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Number of instances per configuration (default: 30)
    #[arg(short = 'n', long = "instances", value_name = "COUNT")]
    pub instances: Option<usize>,

    /// Instance directory prefix, e.g. `instance` or `execution`
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Configuration subdirectory (repeatable); omit for a flat layout
    #[arg(short = 'c', long = "config-name", value_name = "NAME")]
    pub configurations: Vec<String>,

    /// Decode run records by line position, ignoring labels
    #[arg(long)]
    pub positional: bool,
}

/// Layout plus the metric and threshold used by the tests
#[derive(Args, Debug, Clone)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Metric to test (default: average)
    #[arg(short, long, value_enum)]
    pub metric: Option<Metric>,

    /// Significance level used when rendering verdicts (default: 0.05)
    #[arg(long, value_name = "ALPHA")]
    pub alpha: Option<f64>,
}
