//! Per-instance summary records (`name=value`, one per line)

use crate::error::{Result, StatsError};
use crate::metric::Metric;
use crate::record::{parse_finite, RunRecord};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Key of the run-count line
pub const COUNT_KEY: &str = "count";

/// Means of every metric across the runs of one instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub best: f64,
    pub worst: f64,
    pub median: f64,
    pub average: f64,
    pub standard_deviation: f64,
    pub count: usize,
}

impl InstanceSummary {
    /// Average a set of run records
    pub fn from_runs<'a, I>(runs: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a RunRecord>,
    {
        let mut sum = RunRecord::default();
        let mut count = 0usize;
        for run in runs {
            sum.best += run.best;
            sum.worst += run.worst;
            sum.median += run.median;
            sum.average += run.average;
            sum.standard_deviation += run.standard_deviation;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(Self {
            best: sum.best / n,
            worst: sum.worst / n,
            median: sum.median / n,
            average: sum.average / n,
            standard_deviation: sum.standard_deviation / n,
            count,
        })
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Best => self.best,
            Metric::Worst => self.worst,
            Metric::Median => self.median,
            Metric::Average => self.average,
            Metric::StandardDeviation => self.standard_deviation,
        }
    }

    /// Render the six `name=value` lines
    ///
    /// Floats use the shortest representation that round-trips, so nothing
    /// is rounded away.
    pub fn to_record_string(&self) -> String {
        let mut out = String::new();
        for metric in Metric::ALL {
            out.push_str(&format!("{}={:?}\n", metric.name(), self.get(metric)));
        }
        out.push_str(&format!("{}={}\n", COUNT_KEY, self.count));
        out
    }

    /// Decode a summary record by key; all six keys are required exactly once
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut values: [Option<f64>; 5] = [None; 5];
        let mut count: Option<usize> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(StatsError::parse(
                    path,
                    line_no,
                    format!("expected '<name>=<value>', got '{}'", line),
                ));
            };
            let key = key.trim();
            let value = value.trim();

            if key == COUNT_KEY {
                if count.is_some() {
                    return Err(StatsError::parse(path, line_no, "duplicate key 'count'"));
                }
                let parsed = value.parse::<usize>().map_err(|_| {
                    StatsError::parse(path, line_no, format!("invalid run count '{}'", value))
                })?;
                count = Some(parsed);
                continue;
            }

            let Some(metric) = Metric::from_name(key) else {
                return Err(StatsError::parse(
                    path,
                    line_no,
                    format!("unknown key '{}'", key),
                ));
            };
            let slot = &mut values[metric as usize];
            if slot.is_some() {
                return Err(StatsError::parse(
                    path,
                    line_no,
                    format!("duplicate key '{}'", key),
                ));
            }
            *slot = Some(parse_finite(value).map_err(|r| StatsError::parse(path, line_no, r))?);
        }

        let line_count = text.lines().count();
        let require = |metric: Metric| {
            values[metric as usize].ok_or_else(|| {
                StatsError::parse(path, line_count, format!("missing key '{}'", metric))
            })
        };

        Ok(Self {
            best: require(Metric::Best)?,
            worst: require(Metric::Worst)?,
            median: require(Metric::Median)?,
            average: require(Metric::Average)?,
            standard_deviation: require(Metric::StandardDeviation)?,
            count: count.ok_or_else(|| {
                StatsError::parse(path, line_count, format!("missing key '{}'", COUNT_KEY))
            })?,
        })
    }

    /// Read a summary record; an absent file is [`StatsError::MissingFile`]
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| StatsError::io(path, e))?;
        Self::parse(&text, path)
    }

    /// Write the record through a hidden temp file and rename it into place
    ///
    /// A failure leaves any previous summary untouched.
    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("summary");
        let tmp = path.with_file_name(format!(".{}.tmp.{}", name, std::process::id()));

        let result = (|| -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(self.to_record_string().as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(StatsError::io(path, e));
        }
        Ok(())
    }
}
