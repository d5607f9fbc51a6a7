//! Experiment directory layout
//!
//! ```text
//! <root>/[<configuration>/]<prefix>_<n>/
//!     <any name>        run records (inputs)
//!     stats.ron         solver artifact (ignored)
//!     new_stats.txt     per-instance summary (output)
//! ```

use crate::error::{Result, StatsError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Default summary file name
pub const DEFAULT_SUMMARY_FILE: &str = "new_stats.txt";

/// Default solver artifact that is not a run record
pub const DEFAULT_IGNORED: &str = "stats.ron";

/// Which files inside an instance directory are outputs or foreign artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactManifest {
    /// Summary record written by aggregation
    pub summary_file: String,
    /// Other files that are never run records
    pub ignored: Vec<String>,
}

impl Default for ArtifactManifest {
    fn default() -> Self {
        Self {
            summary_file: DEFAULT_SUMMARY_FILE.to_string(),
            ignored: vec![DEFAULT_IGNORED.to_string()],
        }
    }
}

impl ArtifactManifest {
    /// Whether a directory entry name is a run record
    ///
    /// Hidden files are never inputs; the atomic summary writer stages its
    /// temp file under a dot-name.
    pub fn is_input(&self, name: &str) -> bool {
        !name.starts_with('.')
            && name != self.summary_file
            && !self.ignored.iter().any(|ignored| ignored == name)
    }

    /// Run record files of one instance directory, sorted by name
    pub fn run_record_paths(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| StatsError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StatsError::io(dir, e))?;
            let file_type = entry.file_type().map_err(|e| StatsError::io(entry.path(), e))?;
            if file_type.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                tracing::warn!("Skipping non UTF-8 file name in {}", dir.display());
                continue;
            };
            if self.is_input(name) {
                paths.push(entry.path());
            }
        }

        paths.sort();
        Ok(paths)
    }
}

/// Where the instance directories of an experiment live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceLayout {
    pub root: PathBuf,
    pub prefix: String,
    pub instance_count: usize,
    pub artifacts: ArtifactManifest,
}

impl InstanceLayout {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>, instance_count: usize) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            instance_count,
            artifacts: ArtifactManifest::default(),
        }
    }

    pub fn with_artifacts(mut self, artifacts: ArtifactManifest) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Instance indices, 1-based
    pub fn instances(&self) -> RangeInclusive<usize> {
        1..=self.instance_count
    }

    /// Directory holding the instances of `configuration` (the root when flat)
    pub fn configuration_dir(&self, configuration: Option<&str>) -> PathBuf {
        match configuration {
            Some(name) => self.root.join(name),
            None => self.root.clone(),
        }
    }

    pub fn instance_dir(&self, configuration: Option<&str>, index: usize) -> PathBuf {
        self.configuration_dir(configuration)
            .join(format!("{}_{}", self.prefix, index))
    }

    pub fn summary_path(&self, configuration: Option<&str>, index: usize) -> PathBuf {
        self.instance_dir(configuration, index)
            .join(&self.artifacts.summary_file)
    }
}

/// Subdirectories of `root` that contain at least one `<prefix>_<n>` directory
pub fn discover_configurations(root: &Path, prefix: &str) -> Result<Vec<String>> {
    let pattern = Regex::new(&format!(r"^{}_\d+$", regex::escape(prefix)))
        .map_err(|e| StatsError::parse(root, 0, format!("invalid instance prefix: {}", e)))?;

    let mut found = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| StatsError::io(root, e))? {
        let entry = entry.map_err(|e| StatsError::io(root, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };

        let has_instances = fs::read_dir(&path)
            .map_err(|e| StatsError::io(&path, e))?
            .filter_map(|e| e.ok())
            .any(|e| {
                e.path().is_dir()
                    && e.file_name()
                        .to_str()
                        .is_some_and(|n| pattern.is_match(n))
            });
        if has_instances {
            found.push(name);
        }
    }

    found.sort();
    tracing::debug!("Discovered {} configurations under {}", found.len(), root.display());
    Ok(found)
}
