//! Raw run record parsing
//!
//! A run record is written once by the solver and holds exactly five lines of
//! the form `<label>: <float>` in [`Metric::ALL`] order.

use crate::error::{Result, StatsError};
use crate::metric::Metric;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Separator between label and value in run records
pub const FIELD_DELIMITER: &str = ": ";

/// How run-record labels are checked against the expected field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Reject a line whose label does not name the expected field
    #[default]
    Strict,
    /// Decode by line position only
    Positional,
}

/// The five statistics of one solver run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunRecord {
    pub best: f64,
    pub worst: f64,
    pub median: f64,
    pub average: f64,
    pub standard_deviation: f64,
}

impl RunRecord {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Best => self.best,
            Metric::Worst => self.worst,
            Metric::Median => self.median,
            Metric::Average => self.average,
            Metric::StandardDeviation => self.standard_deviation,
        }
    }

    fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Best => self.best = value,
            Metric::Worst => self.worst = value,
            Metric::Median => self.median = value,
            Metric::Average => self.average = value,
            Metric::StandardDeviation => self.standard_deviation = value,
        }
    }
}

/// Line-oriented reader over one run record
pub struct RecordReader<R> {
    inner: R,
    path: PathBuf,
    line: usize,
    policy: LabelPolicy,
    buf: String,
}

impl RecordReader<BufReader<File>> {
    /// Open a run record file
    pub fn open(path: &Path, policy: LabelPolicy) -> Result<Self> {
        let file = File::open(path).map_err(|e| StatsError::io(path, e))?;
        Ok(Self::new(BufReader::new(file), path, policy))
    }
}

impl<R: BufRead> RecordReader<R> {
    /// Wrap any buffered reader; `path` is used in diagnostics only
    pub fn new(inner: R, path: impl Into<PathBuf>, policy: LabelPolicy) -> Self {
        Self {
            inner,
            path: path.into(),
            line: 0,
            policy,
            buf: String::new(),
        }
    }

    /// Read the next line and decode it as the value of `expected`
    pub fn next_field(&mut self, expected: Metric) -> Result<f64> {
        if !self.read_line()? {
            return Err(StatsError::parse(
                &self.path,
                self.line + 1,
                format!("unexpected end of file, expected field '{}'", expected),
            ));
        }

        let line = self.buf.trim_end_matches(['\n', '\r']);
        let Some((label, value)) = line.split_once(FIELD_DELIMITER) else {
            return Err(StatsError::parse(
                &self.path,
                self.line,
                format!("expected '<label>{}<value>', got '{}'", FIELD_DELIMITER, line),
            ));
        };

        if self.policy == LabelPolicy::Strict && !expected.matches_label(label) {
            return Err(StatsError::parse(
                &self.path,
                self.line,
                format!("label '{}' does not name field '{}'", label.trim(), expected),
            ));
        }

        parse_finite(value.trim()).map_err(|reason| StatsError::parse(&self.path, self.line, reason))
    }

    /// Read all five fields and check nothing but blank lines follows
    pub fn read_run_record(&mut self) -> Result<RunRecord> {
        let mut record = RunRecord::default();
        for metric in Metric::ALL {
            let value = self.next_field(metric)?;
            record.set(metric, value);
        }

        while self.read_line()? {
            if !self.buf.trim().is_empty() {
                return Err(StatsError::parse(
                    &self.path,
                    self.line,
                    format!("unexpected content after {} fields", Metric::ALL.len()),
                ));
            }
        }

        Ok(record)
    }

    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self
            .inner
            .read_line(&mut self.buf)
            .map_err(|e| StatsError::io(&self.path, e))?;
        if n == 0 {
            return Ok(false);
        }
        self.line += 1;
        Ok(true)
    }
}

/// Parse a float, rejecting NaN and infinities
pub(crate) fn parse_finite(text: &str) -> std::result::Result<f64, String> {
    let value: f64 = text
        .parse()
        .map_err(|_| format!("invalid number '{}'", text))?;
    if !value.is_finite() {
        return Err(format!("non-finite number '{}'", text));
    }
    Ok(value)
}

/// Read one run record from disk
pub fn read_run_record(path: &Path, policy: LabelPolicy) -> Result<RunRecord> {
    RecordReader::open(path, policy)?.read_run_record()
}
