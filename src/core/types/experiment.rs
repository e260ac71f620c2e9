use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{
    MetricName, MetricSnapshot, MetricStatistics, StabilityClass, StabilityThresholds,
};

/// A `run_<n>` directory inside an experiment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    pub index: u64,
    pub path: PathBuf,
}

impl RunDirectory {
    /// Directory name, e.g. "run_003"
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("run_{}", self.index))
    }
}

/// Per-run entry of an aggregated experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDetail {
    pub run: String,
    pub metrics: BTreeMap<MetricName, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted: Vec<MetricName>,
}

impl RunDetail {
    pub fn new(run: String, snapshot: &MetricSnapshot) -> Self {
        Self {
            run,
            metrics: snapshot.values().clone(),
            defaulted: snapshot.defaulted().iter().copied().collect(),
        }
    }
}

/// Cross-run summary of one experiment directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedExperiment {
    pub experiment: String,
    pub total_runs: usize,
    pub valid_runs: usize,
    pub runs: Vec<RunDetail>,
    pub statistics: BTreeMap<MetricName, MetricStatistics>,
}

impl AggregatedExperiment {
    /// Statistics for a metric, or the zero record if it was never seen
    pub fn stats(&self, metric: MetricName) -> MetricStatistics {
        self.statistics.get(&metric).copied().unwrap_or_default()
    }

    pub fn mutation_cv(&self) -> f64 {
        self.stats(MetricName::MutationScore)
            .coefficient_of_variation()
    }

    pub fn coverage_cv(&self) -> f64 {
        self.stats(MetricName::StatementCoverage)
            .coefficient_of_variation()
    }

    pub fn stability(&self, thresholds: &StabilityThresholds) -> StabilityClass {
        StabilityClass::classify(self.mutation_cv(), self.coverage_cv(), thresholds)
    }

    /// Share of discovered runs that produced a snapshot, in percent
    pub fn run_coverage_percent(&self) -> f64 {
        if self.total_runs == 0 {
            0.0
        } else {
            self.valid_runs as f64 / self.total_runs as f64 * 100.0
        }
    }
}

/// Path string relative to `root` when possible, for concise logs and output
pub fn display_relative(path: &Path, root: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    match absolute.strip_prefix(root) {
        Ok(relative) => {
            let s = relative.to_string_lossy().to_string();
            if s.is_empty() { ".".to_string() } else { s }
        }
        Err(_) => path.to_string_lossy().to_string(),
    }
}
