//! Experiment configuration
//!
//! Defaults reproduce the fixed constants of the original batch scripts, so
//! running without a configuration file over the usual directory layout just
//! works. A TOML file (and CLI flags on top of it) override them.
//!
//! # Example TOML
//! ```toml
//! root = "results"
//! instance_prefix = "execution"
//! instance_count = 30
//! metric = "average"
//! significance_level = 0.05
//! configurations = ["population_100_mutation_0.1_crossover_0.6"]
//!
//! [artifacts]
//! summary_file = "new_stats.txt"
//! ignored = ["stats.ron"]
//!
//! [reference]
//! mean = 0.0
//! std_dev = 1.0
//! ```

use crate::hypothesis::NormalReference;
use crate::layout::{ArtifactManifest, InstanceLayout};
use crate::metric::Metric;
use crate::record::LabelPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configurations compared when none are named and none are discovered
pub const DEFAULT_CONFIGURATIONS: [&str; 4] = [
    "population_100_mutation_0.1_crossover_0.6",
    "population_100_mutation_0.1_crossover_0.9",
    "population_100_mutation_0.01_crossover_0.6",
    "population_100_mutation_0.01_crossover_0.9",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Directory holding configurations or instance directories
    pub root: PathBuf,

    /// Instance directories are named `<instance_prefix>_<n>`
    pub instance_prefix: String,

    /// Instances are numbered `1..=instance_count`
    pub instance_count: usize,

    /// Configuration subdirectories under `root`; empty means discover them
    pub configurations: Vec<String>,

    /// Metric fed to the normality test and the comparator
    pub metric: Metric,

    /// Alpha used when rendering verdicts; not part of any test
    pub significance_level: f64,

    pub label_policy: LabelPolicy,

    pub artifacts: ArtifactManifest,

    /// Distribution the normality test compares against
    pub reference: NormalReference,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            instance_prefix: "instance".to_string(),
            instance_count: 30,
            configurations: Vec::new(),
            metric: Metric::Average,
            significance_level: 0.05,
            label_policy: LabelPolicy::Strict,
            artifacts: ArtifactManifest::default(),
            reference: NormalReference::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load configuration from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            ));
        }

        if self.instance_count == 0 {
            return Err("instance_count must be >= 1".to_string());
        }

        if self.instance_prefix.is_empty() {
            return Err("instance_prefix must not be empty".to_string());
        }

        if self.artifacts.summary_file.is_empty() {
            return Err("artifacts.summary_file must not be empty".to_string());
        }

        self.reference.validate()
    }

    /// Directory layout described by this configuration
    pub fn layout(&self) -> InstanceLayout {
        InstanceLayout::new(&self.root, &self.instance_prefix, self.instance_count)
            .with_artifacts(self.artifacts.clone())
    }
}
