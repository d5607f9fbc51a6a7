use anyhow::{Context, Result};
use clap::Parser;
use expstat::batch::BatchReport;
use expstat::cli::{Cli, Command, LayoutArgs, OutputFormat, SeriesArgs};
use expstat::config::{ExperimentConfig, DEFAULT_CONFIGURATIONS};
use expstat::loader::{load_series, MetricSeries};
use expstat::record::LabelPolicy;
use expstat::{aggregate, compare, layout, normality, reduce, report};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the configuration file (or defaults) and apply CLI overrides
fn resolve_config(path: Option<&std::path::Path>, args: &LayoutArgs) -> Result<ExperimentConfig> {
    let mut config = match path {
        Some(path) => ExperimentConfig::from_toml(path)?,
        None => ExperimentConfig::default(),
    };

    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if let Some(count) = args.instances {
        config.instance_count = count;
    }
    if let Some(prefix) = &args.prefix {
        config.instance_prefix = prefix.clone();
    }
    if !args.configurations.is_empty() {
        config.configurations = args.configurations.clone();
    }
    if args.positional {
        config.label_policy = LabelPolicy::Positional;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

fn resolve_series_config(path: Option<&std::path::Path>, args: &SeriesArgs) -> Result<ExperimentConfig> {
    let mut config = resolve_config(path, &args.layout)?;
    if let Some(metric) = args.metric {
        config.metric = metric;
    }
    if let Some(alpha) = args.alpha {
        config.significance_level = alpha;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

/// Named configurations, or `[None]` for a flat layout
fn units(config: &ExperimentConfig) -> Vec<Option<&str>> {
    if config.configurations.is_empty() {
        vec![None]
    } else {
        config.configurations.iter().map(|c| Some(c.as_str())).collect()
    }
}

/// Configurations for the comparator: explicit, the defaults if present, or discovered
fn comparison_configurations(config: &ExperimentConfig) -> Result<Vec<String>> {
    if !config.configurations.is_empty() {
        return Ok(config.configurations.clone());
    }

    let defaults: Vec<String> = DEFAULT_CONFIGURATIONS.iter().map(|s| s.to_string()).collect();
    if defaults.iter().any(|name| config.root.join(name).is_dir()) {
        return Ok(defaults);
    }

    let discovered = layout::discover_configurations(&config.root, &config.instance_prefix)
        .with_context(|| format!("Failed to scan {}", config.root.display()))?;
    if !discovered.is_empty() {
        tracing::debug!("Using discovered configurations: {:?}", discovered);
        return Ok(discovered);
    }

    Ok(defaults)
}

fn emit<T: Serialize>(
    batch: &BatchReport<T>,
    format: OutputFormat,
    render: impl Fn(&BatchReport<T>) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render(batch)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report::to_json(batch))
                .context("Failed to serialize report")?
        ),
    }
    Ok(())
}

fn ensure_success<T>(batch: &BatchReport<T>, what: &str) -> Result<()> {
    if !batch.is_success() {
        anyhow::bail!(
            "{} of {} {} failed",
            batch.failure_count(),
            batch.len(),
            what
        );
    }
    Ok(())
}

fn run_aggregate(config: &ExperimentConfig, format: OutputFormat) -> Result<()> {
    let layout = config.layout();
    let mut batch = BatchReport::new();
    for configuration in units(config) {
        for outcome in aggregate::aggregate_all(&layout, configuration, config.label_policy).outcomes {
            batch.push(outcome.unit, outcome.result);
        }
    }
    emit(&batch, format, report::render_aggregation)?;
    ensure_success(&batch, "instances")
}

fn run_normality(config: &ExperimentConfig, format: OutputFormat) -> Result<()> {
    let layout = config.layout();
    let mut batch = BatchReport::new();
    for configuration in units(config) {
        let result = load_series(&layout, configuration, config.metric).and_then(|series| {
            normality::normality_test(&series, &config.reference, config.significance_level)
        });
        batch.push(configuration.unwrap_or("."), result);
    }
    emit(&batch, format, report::render_normality)?;
    ensure_success(&batch, "configurations")
}

fn run_compare(config: &ExperimentConfig, format: OutputFormat) -> Result<()> {
    let layout = config.layout();
    let names = comparison_configurations(config)?;

    let mut loaded: BatchReport<MetricSeries> = BatchReport::new();
    for name in &names {
        loaded.push(name.as_str(), load_series(&layout, Some(name.as_str()), config.metric));
    }
    let series: Vec<MetricSeries> = loaded.successes().map(|(_, s)| s.clone()).collect();

    let batch = compare::compare_configurations(&series);
    let alpha = config.significance_level;
    match format {
        OutputFormat::Text => {
            print!("{}", report::render_comparisons(&batch, alpha));
            for (unit, err) in loaded.failures() {
                eprintln!("{}: {}", unit, err);
            }
        }
        OutputFormat::Json => {
            let mut value = report::to_json(&batch);
            value["load_failures"] = loaded
                .failures()
                .map(|(unit, err)| serde_json::json!({ "unit": unit, "error": err.to_string() }))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&value).context("Failed to serialize report")?
            );
        }
    }

    ensure_success(&loaded, "configurations")?;
    ensure_success(&batch, "comparisons")
}

fn run_reduce(config: &ExperimentConfig, format: OutputFormat) -> Result<()> {
    let layout = config.layout();
    let mut batch = BatchReport::new();
    for configuration in units(config) {
        batch.push(
            configuration.unwrap_or("."),
            reduce::reduce_configuration(&layout, configuration),
        );
    }
    emit(&batch, format, report::render_reduction)?;
    ensure_success(&batch, "configurations")
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config_path = args.config.as_deref();
    match &args.command {
        Command::Aggregate(layout) => {
            let config = resolve_config(config_path, layout)?;
            run_aggregate(&config, args.format)
        }
        Command::Normality(series) => {
            let config = resolve_series_config(config_path, series)?;
            run_normality(&config, args.format)
        }
        Command::Compare(series) => {
            let config = resolve_series_config(config_path, series)?;
            run_compare(&config, args.format)
        }
        Command::Reduce(layout) => {
            let config = resolve_config(config_path, layout)?;
            run_reduce(&config, args.format)
        }
    }
}
