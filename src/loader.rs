//! Summary loading: per-instance summary records → metric series

use crate::aggregate::unit_name;
use crate::error::Result;
use crate::layout::InstanceLayout;
use crate::metric::Metric;
use crate::summary::InstanceSummary;
use serde::Serialize;

/// One metric of one configuration, one value per instance in instance order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    /// Configuration key, or `None` for a flat layout
    pub configuration: Option<String>,
    pub metric: Metric,
    /// Instance indices backing `values`, ascending
    pub instances: Vec<usize>,
    pub values: Vec<f64>,
}

impl MetricSeries {
    pub fn new(configuration: Option<String>, metric: Metric) -> Self {
        Self {
            configuration,
            metric,
            instances: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, instance: usize, value: f64) {
        self.instances.push(instance);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Display name for reports
    pub fn label(&self) -> &str {
        self.configuration.as_deref().unwrap_or(".")
    }
}

/// Read the summary record of every instance, in instance order
///
/// Any absent summary aborts the load with `MissingFile`; instances are never
/// skipped.
pub fn load_summaries(
    layout: &InstanceLayout,
    configuration: Option<&str>,
) -> Result<Vec<(usize, InstanceSummary)>> {
    let mut summaries = Vec::with_capacity(layout.instance_count);
    for index in layout.instances() {
        let path = layout.summary_path(configuration, index);
        tracing::trace!(
            "Loading {} from {}",
            unit_name(configuration, &layout.prefix, index),
            path.display()
        );
        summaries.push((index, InstanceSummary::read(&path)?));
    }
    Ok(summaries)
}

/// Extract one metric of one configuration as a series
pub fn load_series(
    layout: &InstanceLayout,
    configuration: Option<&str>,
    metric: Metric,
) -> Result<MetricSeries> {
    let mut series = MetricSeries::new(configuration.map(str::to_owned), metric);
    for (index, summary) in load_summaries(layout, configuration)? {
        series.push(index, summary.get(metric));
    }

    tracing::debug!(
        "Loaded {} values of '{}' for {}",
        series.len(),
        metric,
        series.label()
    );
    Ok(series)
}
