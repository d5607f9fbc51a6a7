//! Cross-instance reduction: mean of per-instance means for one configuration
//!
//! Every instance weighs the same regardless of how many runs produced its
//! summary.

use crate::error::{Result, StatsError};
use crate::layout::InstanceLayout;
use crate::loader::load_summaries;
use crate::metric::Metric;
use crate::summary::InstanceSummary;
use serde::Serialize;

/// Configuration-level summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfigurationSummary {
    pub best: f64,
    pub worst: f64,
    pub median: f64,
    pub average: f64,
    pub standard_deviation: f64,
    /// Mean number of runs per instance
    pub count: f64,
    /// Number of instances reduced
    pub instances: usize,
}

impl ConfigurationSummary {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Best => self.best,
            Metric::Worst => self.worst,
            Metric::Median => self.median,
            Metric::Average => self.average,
            Metric::StandardDeviation => self.standard_deviation,
        }
    }
}

/// Unweighted mean of each metric and of the run counts
pub fn reduce_summaries(summaries: &[InstanceSummary]) -> Result<ConfigurationSummary> {
    if summaries.is_empty() {
        return Err(StatsError::InsufficientData {
            what: "cross-instance reduction".to_string(),
            needed: 1,
            actual: 0,
        });
    }

    let n = summaries.len() as f64;
    let mean_of = |f: fn(&InstanceSummary) -> f64| summaries.iter().map(f).sum::<f64>() / n;

    Ok(ConfigurationSummary {
        best: mean_of(|s| s.best),
        worst: mean_of(|s| s.worst),
        median: mean_of(|s| s.median),
        average: mean_of(|s| s.average),
        standard_deviation: mean_of(|s| s.standard_deviation),
        count: mean_of(|s| s.count as f64),
        instances: summaries.len(),
    })
}

/// Load every instance summary of a configuration and reduce them
pub fn reduce_configuration(
    layout: &InstanceLayout,
    configuration: Option<&str>,
) -> Result<ConfigurationSummary> {
    let summaries: Vec<InstanceSummary> = load_summaries(layout, configuration)?
        .into_iter()
        .map(|(_, summary)| summary)
        .collect();
    reduce_summaries(&summaries)
}
