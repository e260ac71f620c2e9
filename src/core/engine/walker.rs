use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::{debug, info};

use crate::engine::locator::parse_run_index;
use crate::types::AppResult;

/// Find every experiment directory under `root`: the unique parents of
/// `run_<n>` directories at any depth, in lexicographic path order.
///
/// Experiments whose root-relative path matches one of `ignore` are skipped.
pub fn discover_experiments(root: &Path, ignore: &[String]) -> AppResult<Vec<PathBuf>> {
    let ignore_set = build_ignore_set(ignore)?;
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{}/**/run_*", escaped_root.trim_end_matches('/'));

    let mut experiments: BTreeSet<PathBuf> = BTreeSet::new();
    for entry in glob::glob(&pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                info!("Skipping unreadable path: {}", e);
                continue;
            }
        };

        let is_run = path.is_dir()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_run_index)
                .is_some();
        if !is_run {
            continue;
        }

        if let Some(parent) = path.parent() {
            experiments.insert(parent.to_path_buf());
        }
    }

    Ok(experiments
        .into_iter()
        .filter(|experiment| {
            let relative = experiment.strip_prefix(root).unwrap_or(experiment);
            let ignored = ignore_set.is_match(relative);
            if ignored {
                debug!("Ignoring experiment {}", experiment.display());
            }
            !ignored
        })
        .collect())
}

fn build_ignore_set(patterns: &[String]) -> AppResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.iter().filter(|p| !p.trim().is_empty()) {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn mkdirs(root: &Path, dirs: &[&str]) {
        for d in dirs {
            fs::create_dir_all(root.join(d)).unwrap();
        }
    }

    #[test]
    fn finds_unique_parents_in_order() {
        let dir = tempdir().unwrap();
        mkdirs(
            dir.path(),
            &[
                "zeta/run_001",
                "zeta/run_002",
                "alpha/ctx_low/run_001",
                "alpha/ctx_high/run_003",
                "alpha/ctx_high/run_004/run_001",
                "beta/run_x",
                "notes",
            ],
        );

        let found = discover_experiments(dir.path(), &[]).unwrap();
        let relative: Vec<String> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(
            relative,
            vec![
                "alpha/ctx_high",
                "alpha/ctx_high/run_004",
                "alpha/ctx_low",
                "zeta"
            ]
        );
    }

    #[test]
    fn ignore_globs_skip_experiments() {
        let dir = tempdir().unwrap();
        mkdirs(dir.path(), &["keep/run_001", "archive/old/run_001"]);

        let found = discover_experiments(dir.path(), &["archive/**".to_string()]).unwrap();
        assert_eq!(found, vec![dir.path().join("keep")]);
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = tempdir().unwrap();
        assert!(discover_experiments(dir.path(), &[]).unwrap().is_empty());
    }

    #[test]
    fn repeated_walks_are_identical() {
        let dir = tempdir().unwrap();
        mkdirs(dir.path(), &["b/run_1", "a/run_2", "c/d/run_3"]);
        let first = discover_experiments(dir.path(), &[]).unwrap();
        let second = discover_experiments(dir.path(), &[]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
