use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::types::{AggregatedExperiment, AppError, AppResult};

/// Serialize aggregated experiments as the structured results document
pub fn to_json(experiments: &[AggregatedExperiment]) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(experiments)?)
}

/// Parse a structured results document written by [`write_outputs`]
pub fn read_results(path: &Path) -> AppResult<Vec<AggregatedExperiment>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write the structured results and the report.
///
/// Both documents are rendered before anything touches the disk, and each is
/// staged next to its destination then renamed into place. If the report
/// cannot be moved into place the results file is removed again, so a failed
/// call never leaves one artifact without the other.
pub fn write_outputs(
    experiments: &[AggregatedExperiment],
    json_path: &Path,
    report_path: &Path,
    report: &str,
) -> AppResult<()> {
    if same_destination(json_path, report_path) {
        return Err(AppError::Custom(format!(
            "Results and report would both be written to {}",
            json_path.display()
        )));
    }

    let json = to_json(experiments)?;

    let staged_json = stage(json_path, json.as_bytes())?;
    let staged_report = match stage(report_path, report.as_bytes()) {
        Ok(path) => path,
        Err(e) => {
            let _ = fs::remove_file(&staged_json);
            return Err(e);
        }
    };

    if let Err(e) = fs::rename(&staged_json, json_path) {
        let _ = fs::remove_file(&staged_json);
        let _ = fs::remove_file(&staged_report);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&staged_report, report_path) {
        let _ = fs::remove_file(json_path);
        let _ = fs::remove_file(&staged_report);
        return Err(e.into());
    }
    debug!(
        "Wrote {} and {}",
        json_path.display(),
        report_path.display()
    );
    Ok(())
}

/// Whether two output paths name the same file, once their directories are resolved
fn same_destination(a: &Path, b: &Path) -> bool {
    resolve_destination(a) == resolve_destination(b)
}

fn resolve_destination(path: &Path) -> PathBuf {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let parent = fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());
    match path.file_name() {
        Some(name) => parent.join(name),
        None => parent,
    }
}

fn stage(destination: &Path, contents: &[u8]) -> AppResult<PathBuf> {
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut staged = destination.as_os_str().to_owned();
    staged.push(".tmp");
    let staged = PathBuf::from(staged);
    fs::write(&staged, contents)?;
    Ok(staged)
}
