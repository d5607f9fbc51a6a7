//! Instance aggregation: run records → per-instance summary record

use crate::batch::BatchReport;
use crate::error::{Result, StatsError};
use crate::layout::{ArtifactManifest, InstanceLayout};
use crate::record::{read_run_record, LabelPolicy};
use crate::summary::InstanceSummary;
use std::path::Path;

/// Average every run record in `dir` and write the summary record next to them
///
/// Files are read in name order, so re-running over an unchanged directory
/// reproduces the summary bit for bit.
pub fn aggregate_instance(
    dir: &Path,
    manifest: &ArtifactManifest,
    policy: LabelPolicy,
) -> Result<InstanceSummary> {
    let paths = manifest.run_record_paths(dir)?;

    let mut runs = Vec::with_capacity(paths.len());
    for path in &paths {
        tracing::trace!("Reading run record {}", path.display());
        runs.push(read_run_record(path, policy)?);
    }

    let summary = InstanceSummary::from_runs(&runs).ok_or_else(|| StatsError::NoRuns {
        dir: dir.to_path_buf(),
    })?;

    summary.write_atomic(&dir.join(&manifest.summary_file))?;
    tracing::debug!("Aggregated {} runs in {}", summary.count, dir.display());
    Ok(summary)
}

/// Aggregate every instance of one configuration (or of the flat root)
pub fn aggregate_all(
    layout: &InstanceLayout,
    configuration: Option<&str>,
    policy: LabelPolicy,
) -> BatchReport<InstanceSummary> {
    let mut report = BatchReport::new();
    for index in layout.instances() {
        let dir = layout.instance_dir(configuration, index);
        let unit = unit_name(configuration, &layout.prefix, index);
        report.push(unit, aggregate_instance(&dir, &layout.artifacts, policy));
    }

    tracing::info!(
        "Aggregated {}/{} instances under {}",
        report.len() - report.failure_count(),
        report.len(),
        layout.configuration_dir(configuration).display()
    );
    report
}

pub(crate) fn unit_name(configuration: Option<&str>, prefix: &str, index: usize) -> String {
    match configuration {
        Some(name) => format!("{}/{}_{}", name, prefix, index),
        None => format!("{}_{}", prefix, index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_run(dir: &Path, name: &str, values: [f64; 5]) {
        let text = format!(
            "Best: {}\nWorst: {}\nMedian: {}\nAvg: {}\nStd. Dev.: {}\n",
            values[0], values[1], values[2], values[3], values[4]
        );
        fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn test_mean_correctness() {
        let dir = TempDir::new().unwrap();
        write_run(dir.path(), "run_1", [1.0, 10.0, 5.0, 5.5, 0.5]);
        write_run(dir.path(), "run_2", [2.0, 20.0, 6.0, 6.5, 1.5]);
        write_run(dir.path(), "run_3", [3.0, 30.0, 7.0, 7.5, 2.5]);

        let summary =
            aggregate_instance(dir.path(), &ArtifactManifest::default(), LabelPolicy::Strict)
                .unwrap();

        assert!((summary.best - 2.0).abs() < 1e-9);
        assert!((summary.worst - 20.0).abs() < 1e-9);
        assert!((summary.median - 6.0).abs() < 1e-9);
        assert!((summary.average - 6.5).abs() < 1e-9);
        assert!((summary.standard_deviation - 1.5).abs() < 1e-9);
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn test_summary_written_and_not_self_included() {
        let dir = TempDir::new().unwrap();
        write_run(dir.path(), "run_1", [1.0; 5]);
        write_run(dir.path(), "run_2", [3.0; 5]);
        fs::write(dir.path().join("stats.ron"), "(generation: 12)").unwrap();

        let manifest = ArtifactManifest::default();
        let first = aggregate_instance(dir.path(), &manifest, LabelPolicy::Strict).unwrap();
        let text_1 = fs::read_to_string(dir.path().join("new_stats.txt")).unwrap();

        let second = aggregate_instance(dir.path(), &manifest, LabelPolicy::Strict).unwrap();
        let text_2 = fs::read_to_string(dir.path().join("new_stats.txt")).unwrap();

        assert_eq!(first, second);
        assert_eq!(text_1, text_2);
        assert_eq!(second.count, 2);
        assert!(text_2.ends_with("count=2\n"));
    }

    #[test]
    fn test_empty_instance_is_no_runs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("stats.ron"), "").unwrap();

        let err = aggregate_instance(dir.path(), &ArtifactManifest::default(), LabelPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, StatsError::NoRuns { .. }));
        assert!(!dir.path().join("new_stats.txt").exists());
    }

    #[test]
    fn test_malformed_run_keeps_previous_summary() {
        let dir = TempDir::new().unwrap();
        write_run(dir.path(), "run_1", [4.0; 5]);
        let manifest = ArtifactManifest::default();
        aggregate_instance(dir.path(), &manifest, LabelPolicy::Strict).unwrap();
        let before = fs::read_to_string(dir.path().join("new_stats.txt")).unwrap();

        fs::write(dir.path().join("run_2"), "Best: 1\nWorst: oops\n").unwrap();
        let err = aggregate_instance(dir.path(), &manifest, LabelPolicy::Strict).unwrap_err();

        match err {
            StatsError::Parse { path, line, .. } => {
                assert!(path.ends_with("run_2"));
                assert_eq!(line, 2);
            }
            other => panic!("Expected Parse, got {:?}", other),
        }
        let after = fs::read_to_string(dir.path().join("new_stats.txt")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_aggregate_all_isolates_failures() {
        let root = TempDir::new().unwrap();
        let layout = InstanceLayout::new(root.path(), "instance", 3);
        for index in [1, 3] {
            let dir = layout.instance_dir(None, index);
            fs::create_dir_all(&dir).unwrap();
            write_run(&dir, "run_1", [index as f64; 5]);
        }
        fs::create_dir_all(layout.instance_dir(None, 2)).unwrap();

        let report = aggregate_all(&layout, None, LabelPolicy::Strict);
        assert_eq!(report.len(), 3);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.failures().next().unwrap().0, "instance_2");
        assert!(layout.summary_path(None, 1).exists());
        assert!(layout.summary_path(None, 3).exists());
    }

    #[test]
    fn test_unit_name() {
        assert_eq!(unit_name(None, "instance", 4), "instance_4");
        assert_eq!(unit_name(Some("cfg"), "execution", 2), "cfg/execution_2");
    }
}
