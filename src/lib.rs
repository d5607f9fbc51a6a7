//! expstat - statistics for repeated stochastic solver runs
//!
//! This library aggregates per-run result records into per-instance
//! summaries, reduces them per configuration, and runs nonparametric
//! hypothesis tests (Kolmogorov–Smirnov normality, exact Mann–Whitney U)
//! across parameter configurations.
//!
//! Pipeline: [`record`] → [`aggregate`] → [`loader`] →
//! {[`reduce`], [`normality`], [`compare`]}.

pub mod aggregate;
pub mod batch;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod hypothesis;
pub mod layout;
pub mod loader;
pub mod metric;
pub mod normality;
pub mod record;
pub mod reduce;
pub mod report;
pub mod summary;

pub use error::{Result, StatsError};
