//! Text and JSON rendering of batch results

use crate::batch::BatchReport;
use crate::compare::PairComparison;
use crate::normality::NormalityReport;
use crate::reduce::ConfigurationSummary;
use crate::summary::InstanceSummary;
use serde::Serialize;
use serde_json::{json, Value};

/// Serialize a batch as `{"results": [...], "failures": [...]}`
pub fn to_json<T: Serialize>(report: &BatchReport<T>) -> Value {
    let results: Vec<Value> = report
        .successes()
        .map(|(unit, value)| json!({ "unit": unit, "result": value }))
        .collect();
    let failures: Vec<Value> = report
        .failures()
        .map(|(unit, err)| json!({ "unit": unit, "error": err.to_string() }))
        .collect();
    json!({ "results": results, "failures": failures })
}

fn push_failures<T>(out: &mut String, report: &BatchReport<T>) {
    if report.is_success() {
        return;
    }
    out.push_str(&format!("\nFailed ({}):\n", report.failure_count()));
    for (unit, err) in report.failures() {
        out.push_str(&format!("  {}: {}\n", unit, err));
    }
}

pub fn render_aggregation(report: &BatchReport<InstanceSummary>) -> String {
    let mut out = String::new();
    for (unit, summary) in report.successes() {
        out.push_str(&format!(
            "{}: {} runs, average={:?}\n",
            unit, summary.count, summary.average
        ));
    }
    out.push_str(&format!(
        "Aggregated {}/{} instances\n",
        report.len() - report.failure_count(),
        report.len()
    ));
    push_failures(&mut out, report);
    out
}

pub fn render_normality(report: &BatchReport<NormalityReport>) -> String {
    let mut out = String::new();
    for (unit, result) in report.successes() {
        let verdict = if result.rejects_normality() {
            "not normal"
        } else {
            "normality not rejected"
        };
        out.push_str(&format!(
            "{} ({}, n={}): D={:.6} p={:.6e} -> {} at alpha={}\n",
            unit,
            result.metric,
            result.test.n,
            result.test.statistic,
            result.test.pvalue,
            verdict,
            result.significance_level
        ));
    }
    push_failures(&mut out, report);
    out
}

pub fn render_comparisons(report: &BatchReport<PairComparison>, significance_level: f64) -> String {
    let mut out = String::new();
    for (_, pair) in report.successes() {
        out.push_str(&format!("{} vs {}\n", pair.first, pair.second));
        out.push_str(&format!(
            "  two-sided:     U={:.1} p={:.6e}\n",
            pair.two_sided.statistic, pair.two_sided.pvalue
        ));
        out.push_str(&format!(
            "  first < second: U={:.1} p={:.6e}\n",
            pair.first_less.statistic, pair.first_less.pvalue
        ));
        out.push_str(&format!(
            "  second < first: U={:.1} p={:.6e}\n",
            pair.second_less.statistic, pair.second_less.pvalue
        ));
        match pair.smaller_at(significance_level) {
            Some(name) => out.push_str(&format!(
                "  -> {} is significantly smaller (alpha={})\n",
                name, significance_level
            )),
            None => out.push_str(&format!(
                "  -> no significant ordering (alpha={})\n",
                significance_level
            )),
        }
        if !pair.aligned {
            out.push_str("  (series cover different instances)\n");
        }
    }
    push_failures(&mut out, report);
    out
}

pub fn render_reduction(report: &BatchReport<ConfigurationSummary>) -> String {
    let mut out = String::new();
    let multiple = report.len() > 1;
    for (unit, summary) in report.successes() {
        if multiple {
            out.push_str(&format!("[{}]\n", unit));
        }
        out.push_str(&format!("best={:?}\n", summary.best));
        out.push_str(&format!("worst={:?}\n", summary.worst));
        out.push_str(&format!("median={:?}\n", summary.median));
        out.push_str(&format!("average={:?}\n", summary.average));
        out.push_str(&format!(
            "standard_deviation={:?}\n",
            summary.standard_deviation
        ));
        out.push_str(&format!("count={:?}\n", summary.count));
    }
    push_failures(&mut out, report);
    out
}
