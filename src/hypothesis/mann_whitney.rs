// Mann–Whitney U rank-sum test, exact method
//
// U1 = R1 - n1(n1+1)/2 with mid-ranks for ties. The p-value comes from the
// exact permutation distribution of U under H0 (no tie correction).

use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alternative hypothesis about the location of `x` relative to `y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alternative {
    /// The distributions differ in location
    TwoSided,
    /// `x` is stochastically less than `y`
    Less,
    /// `x` is stochastically greater than `y`
    Greater,
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Alternative::TwoSided => "two-sided",
            Alternative::Less => "less",
            Alternative::Greater => "greater",
        })
    }
}

/// Result of one Mann–Whitney U test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MannWhitneyTest {
    /// U statistic of the first sample
    pub statistic: f64,
    pub pvalue: f64,
    pub alternative: Alternative,
    pub n1: usize,
    pub n2: usize,
}

/// Exact Mann–Whitney U test of `x` against `y`
pub fn mann_whitney_u(x: &[f64], y: &[f64], alternative: Alternative) -> Result<MannWhitneyTest> {
    if x.is_empty() || y.is_empty() {
        return Err(StatsError::InsufficientData {
            what: "Mann-Whitney U test".to_string(),
            needed: 1,
            actual: x.len().min(y.len()),
        });
    }

    let n1 = x.len();
    let n2 = y.len();
    let combined: Vec<f64> = x.iter().chain(y).copied().collect();
    let ranks = rank_with_ties(&combined);

    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;

    let dist = ExactUDistribution::new(n1, n2);
    let pvalue = match alternative {
        Alternative::Greater => dist.sf(u1),
        Alternative::Less => dist.sf(u2),
        Alternative::TwoSided => 2.0 * dist.sf(u1.max(u2)),
    };

    Ok(MannWhitneyTest {
        statistic: u1,
        pvalue: pvalue.clamp(0.0, 1.0),
        alternative,
        n1,
        n2,
    })
}

/// 1-based ranks, tied values sharing the mean of their positions
pub fn rank_with_ties(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let mid_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = mid_rank;
        }
        start = end;
    }
    ranks
}

/// Null distribution of U for sample sizes (n1, n2)
#[derive(Debug, Clone)]
pub struct ExactUDistribution {
    pmf: Vec<f64>,
}

impl ExactUDistribution {
    /// Build the probability mass function of U over `0..=n1*n2`
    ///
    /// Uses the recurrence on the largest observation:
    /// p(i, j; u) = i/(i+j) · p(i-1, j; u-j) + j/(i+j) · p(i, j-1; u)
    pub fn new(n1: usize, n2: usize) -> Self {
        // prev[j] holds p(i-1, j; ·), which has (i-1)·j + 1 entries
        let mut prev: Vec<Vec<f64>> = vec![vec![1.0]; n2 + 1];

        for i in 1..=n1 {
            let mut cur: Vec<Vec<f64>> = Vec::with_capacity(n2 + 1);
            cur.push(vec![1.0]);
            for j in 1..=n2 {
                let total = (i + j) as f64;
                let from_x = i as f64 / total;
                let from_y = j as f64 / total;
                let shorter = &cur[j - 1];
                let shifted = &prev[j];

                let mut pmf = vec![0.0; i * j + 1];
                for (u, p) in pmf.iter_mut().enumerate() {
                    let mut value = 0.0;
                    if u >= j {
                        value += from_x * shifted.get(u - j).copied().unwrap_or(0.0);
                    }
                    value += from_y * shorter.get(u).copied().unwrap_or(0.0);
                    *p = value;
                }
                cur.push(pmf);
            }
            prev = cur;
        }

        Self {
            pmf: prev.pop().unwrap_or_else(|| vec![1.0]),
        }
    }

    /// P(U = u)
    pub fn pmf(&self, u: usize) -> f64 {
        self.pmf.get(u).copied().unwrap_or(0.0)
    }

    /// P(U >= ⌊u⌋)
    pub fn sf(&self, u: f64) -> f64 {
        let k = u.max(0.0).floor() as usize;
        if k >= self.pmf.len() {
            return 0.0;
        }
        self.pmf[k..].iter().sum()
    }

    /// Largest attainable U (n1·n2)
    pub fn max_u(&self) -> usize {
        self.pmf.len() - 1
    }
}
