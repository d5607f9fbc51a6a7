//! Pairwise configuration comparison with Mann–Whitney U
//!
//! Every unordered pair of configurations is tested once, in input order.
//! The rank test is unpaired: instance `i` of one configuration is not
//! matched with instance `i` of the other. Series that cover different
//! instance sets are still compared, but flagged as not aligned.

use crate::batch::BatchReport;
use crate::error::Result;
use crate::hypothesis::{mann_whitney_u, Alternative, MannWhitneyTest};
use crate::loader::MetricSeries;
use serde::Serialize;

/// The three Mann–Whitney sub-tests of one configuration pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairComparison {
    pub first: String,
    pub second: String,
    /// Both series cover the same instance indices
    pub aligned: bool,
    /// Any location difference between `first` and `second`
    pub two_sided: MannWhitneyTest,
    /// `first` is stochastically less than `second`
    pub first_less: MannWhitneyTest,
    /// `second` is stochastically less than `first`
    pub second_less: MannWhitneyTest,
}

impl PairComparison {
    /// Label of the configuration that is significantly smaller, if any
    pub fn smaller_at(&self, significance_level: f64) -> Option<&str> {
        if self.first_less.pvalue < significance_level {
            Some(self.first.as_str())
        } else if self.second_less.pvalue < significance_level {
            Some(self.second.as_str())
        } else {
            None
        }
    }
}

/// Run all three sub-tests for one pair
pub fn compare_pair(first: &MetricSeries, second: &MetricSeries) -> Result<PairComparison> {
    let aligned = first.instances == second.instances;
    if !aligned {
        tracing::warn!(
            "{} and {} cover different instances ({} vs {} values)",
            first.label(),
            second.label(),
            first.len(),
            second.len()
        );
    }

    Ok(PairComparison {
        first: first.label().to_string(),
        second: second.label().to_string(),
        aligned,
        two_sided: mann_whitney_u(&first.values, &second.values, Alternative::TwoSided)?,
        first_less: mann_whitney_u(&first.values, &second.values, Alternative::Less)?,
        second_less: mann_whitney_u(&second.values, &first.values, Alternative::Less)?,
    })
}

/// Compare every unordered pair of distinct series: C·(C−1)/2 outcomes
pub fn compare_configurations(series: &[MetricSeries]) -> BatchReport<PairComparison> {
    let mut report = BatchReport::new();
    for (i, first) in series.iter().enumerate() {
        for second in &series[i + 1..] {
            let unit = format!("{} vs {}", first.label(), second.label());
            report.push(unit, compare_pair(first, second));
        }
    }

    tracing::info!(
        "Compared {} configuration pairs ({} failed)",
        report.len(),
        report.failure_count()
    );
    report
}
