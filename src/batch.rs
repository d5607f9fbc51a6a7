//! Per-unit outcomes for batch runs
//!
//! One malformed instance or configuration does not hide the results of the
//! others; each unit of work carries its own result.

use crate::error::StatsError;

/// Result of one unit of work (an instance or a configuration)
#[derive(Debug)]
pub struct UnitOutcome<T> {
    /// Human-readable unit name, e.g. `pop_100/instance_7`
    pub unit: String,
    pub result: Result<T, StatsError>,
}

/// Outcomes of a whole batch, in processing order
#[derive(Debug)]
pub struct BatchReport<T> {
    pub outcomes: Vec<UnitOutcome<T>>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome, logging failures as they happen
    pub fn push(&mut self, unit: impl Into<String>, result: Result<T, StatsError>) {
        let unit = unit.into();
        if let Err(e) = &result {
            tracing::warn!("{} failed: {}", unit, e);
        }
        self.outcomes.push(UnitOutcome { unit, result });
    }

    pub fn successes(&self) -> impl Iterator<Item = (&str, &T)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|v| (o.unit.as_str(), v)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &StatsError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.unit.as_str(), e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
