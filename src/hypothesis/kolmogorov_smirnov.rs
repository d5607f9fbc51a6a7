// One-sample Kolmogorov–Smirnov test against a normal reference
//
// The p-value is exact for the two-sided statistic D_n:
//   Marsaglia, G., Tsang, W. W., & Wang, J. (2003). Evaluating Kolmogorov's
//   distribution. Journal of Statistical Software, 8(18).
// including that paper's shortcut for large n·d², which is accurate to about
// five digits where it applies.

use crate::error::{Result, StatsError};
use crate::hypothesis::normal::NormalReference;
use serde::Serialize;

/// Result of a one-sample KS test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KsTest {
    /// D = max(D+, D-)
    pub statistic: f64,
    /// max(i/n - F(x_i))
    pub d_plus: f64,
    /// max(F(x_i) - (i-1)/n)
    pub d_minus: f64,
    /// Two-sided p-value P(D_n >= statistic)
    pub pvalue: f64,
    pub n: usize,
}

/// Compare the empirical distribution of `sample` with `reference`
pub fn ks_one_sample(sample: &[f64], reference: &NormalReference) -> Result<KsTest> {
    if sample.is_empty() {
        return Err(StatsError::InsufficientData {
            what: "Kolmogorov-Smirnov test".to_string(),
            needed: 1,
            actual: 0,
        });
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let nf = n as f64;
    let mut d_plus = 0.0f64;
    let mut d_minus = 0.0f64;
    for (i, &x) in sorted.iter().enumerate() {
        let cdf = reference.cdf(x);
        d_plus = d_plus.max((i + 1) as f64 / nf - cdf);
        d_minus = d_minus.max(cdf - i as f64 / nf);
    }
    let statistic = d_plus.max(d_minus);

    Ok(KsTest {
        statistic,
        d_plus,
        d_minus,
        pvalue: ks_pvalue(n, statistic),
        n,
    })
}

/// Two-sided p-value P(D_n >= d)
pub fn ks_pvalue(n: usize, d: f64) -> f64 {
    if n == 0 || d <= 0.0 {
        return 1.0;
    }
    if d >= 1.0 {
        return 0.0;
    }

    let nf = n as f64;
    let s = d * d * nf;
    if s > 7.24 || (s > 3.76 && n > 99) {
        let p = 2.0 * (-(2.000_071 + 0.331 / nf.sqrt() + 1.409 / nf) * s).exp();
        return p.clamp(0.0, 1.0);
    }

    (1.0 - kolmogorov_cdf(n, d)).clamp(0.0, 1.0)
}

/// P(D_n < d) by the Durbin matrix method
fn kolmogorov_cdf(n: usize, d: f64) -> f64 {
    let nf = n as f64;
    let k = (nf * d) as usize + 1;
    let m = 2 * k - 1;
    let h = k as f64 - nf * d;

    let mut hm = vec![0.0f64; m * m];
    for i in 0..m {
        for j in 0..m {
            if i + 1 >= j {
                hm[i * m + j] = 1.0;
            }
        }
    }
    for i in 0..m {
        hm[i * m] -= h.powi(i as i32 + 1);
        hm[(m - 1) * m + i] -= h.powi((m - i) as i32);
    }
    if 2.0 * h - 1.0 > 0.0 {
        hm[(m - 1) * m] += (2.0 * h - 1.0).powi(m as i32);
    }
    for i in 0..m {
        for j in 0..m {
            if i + 1 > j {
                for g in 1..=(i + 1 - j) {
                    hm[i * m + j] /= g as f64;
                }
            }
        }
    }

    let (q, mut exponent) = matrix_power(&hm, 0, m, n);
    let mut s = q[(k - 1) * m + (k - 1)];
    for i in 1..=n {
        s = s * i as f64 / nf;
        if s < 1e-140 {
            s *= 1e140;
            exponent -= 140;
        }
    }
    s * 10f64.powi(exponent)
}

fn matrix_multiply(a: &[f64], b: &[f64], m: usize) -> Vec<f64> {
    let mut c = vec![0.0f64; m * m];
    for i in 0..m {
        for j in 0..m {
            let mut sum = 0.0;
            for k in 0..m {
                sum += a[i * m + k] * b[k * m + j];
            }
            c[i * m + j] = sum;
        }
    }
    c
}

/// A^n with a decimal exponent carried alongside to avoid overflow
fn matrix_power(a: &[f64], a_exp: i32, m: usize, n: usize) -> (Vec<f64>, i32) {
    if n == 1 {
        return (a.to_vec(), a_exp);
    }

    let (half, half_exp) = matrix_power(a, a_exp, m, n / 2);
    let squared = matrix_multiply(&half, &half, m);
    let squared_exp = 2 * half_exp;

    let (mut v, mut v_exp) = if n % 2 == 0 {
        (squared, squared_exp)
    } else {
        (matrix_multiply(a, &squared, m), a_exp + squared_exp)
    };

    if v[(m / 2) * m + (m / 2)] > 1e140 {
        for x in v.iter_mut() {
            *x *= 1e-140;
        }
        v_exp += 140;
    }
    (v, v_exp)
}
