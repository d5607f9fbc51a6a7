// Normal distribution used as the KS reference

use serde::{Deserialize, Serialize};

/// Normal distribution N(mean, std_dev²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalReference {
    pub mean: f64,
    pub std_dev: f64,
}

impl Default for NormalReference {
    /// Standard normal N(0, 1)
    fn default() -> Self {
        Self {
            mean: 0.0,
            std_dev: 1.0,
        }
    }
}

impl NormalReference {
    pub fn validate(&self) -> Result<(), String> {
        if !self.mean.is_finite() {
            return Err(format!("reference mean must be finite, got {}", self.mean));
        }
        if !(self.std_dev.is_finite() && self.std_dev > 0.0) {
            return Err(format!(
                "reference std_dev must be positive, got {}",
                self.std_dev
            ));
        }
        Ok(())
    }

    /// Cumulative distribution function
    pub fn cdf(&self, x: f64) -> f64 {
        standard_normal_cdf((x - self.mean) / self.std_dev)
    }
}

/// Standard normal CDF
pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

/// Complementary error function
///
/// Chebyshev fit from Numerical Recipes (`erfcc`), fractional error below
/// 1.2e-7 everywhere. Computing `erfc` directly keeps precision in the tails,
/// where `1 - erf` would cancel.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}
