use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::engine::extractor::extract_snapshot;
use crate::engine::locator::locate_runs;
use crate::types::{
    AggregatedExperiment, AppError, AppResult, MetricName, MetricSnapshot, MetricStatistics,
    RunDetail, display_relative,
};

/// Settings shared by every experiment in one invocation
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Artifact file name inside each run directory
    pub artifact_name: String,
    /// Experiment paths in the output are relative to this directory
    pub working_root: PathBuf,
}

impl AggregateOptions {
    pub fn new(artifact_name: impl Into<String>, working_root: impl Into<PathBuf>) -> Self {
        Self {
            artifact_name: artifact_name.into(),
            working_root: working_root.into(),
        }
    }
}

/// Aggregate every run of one experiment directory.
///
/// Fails with [`AppError::NoRuns`] when the directory has no run directories
/// and [`AppError::NoValidRuns`] when none of them produced a snapshot.
pub fn aggregate_experiment(
    experiment_dir: &Path,
    options: &AggregateOptions,
) -> AppResult<AggregatedExperiment> {
    let runs = locate_runs(experiment_dir);
    if runs.is_empty() {
        return Err(AppError::NoRuns(experiment_dir.to_path_buf()));
    }

    let experiment = display_relative(experiment_dir, &options.working_root);
    debug!("{}: found {} run directories", experiment, runs.len());

    let mut snapshots: Vec<(String, MetricSnapshot)> = Vec::with_capacity(runs.len());
    for run in &runs {
        match extract_snapshot(run, &options.artifact_name) {
            Some(snapshot) => snapshots.push((run.name(), snapshot)),
            None => warn!("{}: skipping {} (no usable artifact)", experiment, run.name()),
        }
    }

    if snapshots.is_empty() {
        return Err(AppError::NoValidRuns(experiment_dir.to_path_buf()));
    }

    Ok(AggregatedExperiment {
        experiment,
        total_runs: runs.len(),
        valid_runs: snapshots.len(),
        statistics: compute_statistics(snapshots.iter().map(|(_, s)| s)),
        runs: snapshots
            .iter()
            .map(|(name, snapshot)| RunDetail::new(name.clone(), snapshot))
            .collect(),
    })
}

/// Per-metric statistics over a set of snapshots, keyed by every metric seen
pub fn compute_statistics<'a, I>(snapshots: I) -> BTreeMap<MetricName, MetricStatistics>
where
    I: IntoIterator<Item = &'a MetricSnapshot> + Clone,
{
    let seen: BTreeSet<MetricName> = snapshots
        .clone()
        .into_iter()
        .flat_map(|s| s.values().keys().copied())
        .collect();

    seen.into_iter()
        .map(|metric| {
            let samples = snapshots
                .clone()
                .into_iter()
                .map(|s| Some(s.get(metric).unwrap_or(0.0)));
            (metric, MetricStatistics::from_samples(samples))
        })
        .collect()
}
