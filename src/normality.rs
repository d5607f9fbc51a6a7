//! Normality diagnostic for per-instance series
//!
//! Whether a series of per-instance averages looks normal decides if a
//! parametric test would be appropriate. The test itself makes no decision;
//! the report compares the p-value with the configured significance level.

use crate::error::Result;
use crate::hypothesis::{ks_one_sample, KsTest, NormalReference};
use crate::loader::MetricSeries;
use crate::metric::Metric;
use serde::Serialize;

/// KS result for one configuration's series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalityReport {
    pub configuration: Option<String>,
    pub metric: Metric,
    pub reference: NormalReference,
    pub test: KsTest,
    pub significance_level: f64,
}

impl NormalityReport {
    /// p-value below the configured significance level
    pub fn rejects_normality(&self) -> bool {
        self.test.pvalue < self.significance_level
    }
}

/// One-sample KS test of `series` against `reference`
pub fn normality_test(
    series: &MetricSeries,
    reference: &NormalReference,
    significance_level: f64,
) -> Result<NormalityReport> {
    let test = ks_one_sample(&series.values, reference)?;
    tracing::debug!(
        "KS {} ({}): D={:.6} p={:.6e}",
        series.label(),
        series.metric,
        test.statistic,
        test.pvalue
    );

    Ok(NormalityReport {
        configuration: series.configuration.clone(),
        metric: series.metric,
        reference: *reference,
        test,
        significance_level,
    })
}
