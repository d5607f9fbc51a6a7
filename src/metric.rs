//! Metric names shared by run records and summary records

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five per-run statistics reported by the solver
///
/// The declaration order is the on-disk field order of both run records and
/// summary records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Best,
    Worst,
    Median,
    Average,
    StandardDeviation,
}

impl Metric {
    /// Canonical field order
    pub const ALL: [Metric; 5] = [
        Metric::Best,
        Metric::Worst,
        Metric::Median,
        Metric::Average,
        Metric::StandardDeviation,
    ];

    /// Key used in summary records (`name=value`)
    pub fn name(self) -> &'static str {
        match self {
            Metric::Best => "best",
            Metric::Worst => "worst",
            Metric::Median => "median",
            Metric::Average => "average",
            Metric::StandardDeviation => "standard_deviation",
        }
    }

    /// Look up a metric by its summary key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Whether a run-record label denotes this metric
    ///
    /// Comparison ignores case and every non-alphanumeric character, so the
    /// solver's `Std. Dev.` matches `standard_deviation` via its alias `stddev`.
    pub fn matches_label(self, label: &str) -> bool {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let aliases: &[&str] = match self {
            Metric::Best => &["best", "min"],
            Metric::Worst => &["worst", "max"],
            Metric::Median => &["median"],
            Metric::Average => &["average", "avg", "mean"],
            Metric::StandardDeviation => &["standarddeviation", "stddev", "std", "sd"],
        };
        aliases.contains(&normalized.as_str())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
