// Nonparametric hypothesis tests for experiment series
//
// - Kolmogorov–Smirnov one-sample test against a normal reference, exact
//   p-values (Marsaglia, Tsang & Wang 2003)
// - Mann–Whitney U rank-sum test with the exact permutation distribution
//
// Tests only report statistics and p-values; significance decisions belong
// to the caller's configured alpha.

mod kolmogorov_smirnov;
mod mann_whitney;
mod normal;

pub use kolmogorov_smirnov::{ks_one_sample, ks_pvalue, KsTest};
pub use mann_whitney::{mann_whitney_u, rank_with_ties, Alternative, ExactUDistribution, MannWhitneyTest};
pub use normal::{standard_normal_cdf, NormalReference};
