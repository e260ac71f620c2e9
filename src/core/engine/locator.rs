use std::fs;
use std::path::Path;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::RunDirectory;

static RUN_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^run_(\d+)$").expect("valid regex"));

/// Parse the index out of a `run_<n>` directory name.
/// Names whose suffix is not an unsigned integer are not runs.
pub fn parse_run_index(name: &str) -> Option<u64> {
    let caps = RUN_NAME.captures(name)?;
    caps.get(1)?.as_str().parse::<u64>().ok()
}

/// List the run directories of an experiment, ordered by run index.
/// A missing or unreadable experiment directory has no runs.
pub fn locate_runs(experiment_dir: &Path) -> Vec<RunDirectory> {
    if !experiment_dir.is_dir() {
        return vec![];
    }

    let entries = match fs::read_dir(experiment_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read {}: {}", experiment_dir.display(), e);
            return vec![];
        }
    };

    let mut runs: Vec<RunDirectory> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            match parse_run_index(&name) {
                Some(index) => Some(RunDirectory {
                    index,
                    path: entry.path(),
                }),
                None => {
                    if name.starts_with("run_") {
                        debug!("Skipping {}: suffix is not a run number", name);
                    }
                    None
                }
            }
        })
        .collect();

    runs.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.path.cmp(&b.path)));
    runs
}
