use std::fs;
use std::io;
use std::path::Path;

use log::{debug, error, warn};
use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::types::{MetricName, MetricSnapshot, RunDirectory};

/// Why an artifact that exists could not be used
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("{path} is not a JSON object")]
    NotAnObject { path: String },
}

/// Load the raw artifact document. `Ok(None)` means the run has no artifact.
pub fn load_artifact(path: &Path) -> Result<Option<Map<String, Value>>, ArtifactError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ArtifactError::Read {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let value: Value = serde_json::from_str(&contents).map_err(|source| ArtifactError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(ArtifactError::NotAnObject {
            path: path.display().to_string(),
        }),
    }
}

/// Read one run's analysis artifact and project it onto the fixed metric set.
/// Missing or unusable artifacts yield `None`; they never abort aggregation.
pub fn extract_snapshot(run: &RunDirectory, artifact_name: &str) -> Option<MetricSnapshot> {
    let artifact_path = run.path.join(artifact_name);
    match load_artifact(&artifact_path) {
        Ok(Some(document)) => Some(project_document(&run.name(), &document)),
        Ok(None) => {
            debug!("{}: no {} found", run.name(), artifact_name);
            None
        }
        Err(e) => {
            error!("{}: {}", run.name(), e);
            None
        }
    }
}

/// Project an artifact's `summary` section onto a snapshot
pub fn project_document(run_name: &str, document: &Map<String, Value>) -> MetricSnapshot {
    let summary = match document.get("summary") {
        Some(Value::Object(summary)) => summary,
        Some(_) => {
            warn!("{run_name}: `summary` is not an object; using defaults");
            return MetricSnapshot::defaults();
        }
        None => {
            warn!("{run_name}: artifact has no `summary`; using defaults");
            return MetricSnapshot::defaults();
        }
    };

    let found = MetricName::iter().filter_map(|metric| {
        let raw = summary.get(metric.source_field())?;
        let Some(value) = numeric_value(raw) else {
            debug!(
                "{run_name}: non-numeric `{}` ({raw}); using default",
                metric.source_field()
            );
            return None;
        };
        Some((metric, derive_metric(metric, value)))
    });

    MetricSnapshot::from_found(found.collect::<Vec<_>>())
}

/// Translate a source field value into the metric's value
fn derive_metric(metric: MetricName, value: f64) -> f64 {
    match metric {
        // Only a full compilation pass counts as success
        MetricName::CompilationSuccess => {
            if value == 100.0 {
                1.0
            } else {
                0.0
            }
        }
        _ => value,
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn run_in(dir: &Path, name: &str) -> RunDirectory {
        let path = dir.join(name);
        fs::create_dir_all(&path).unwrap();
        RunDirectory { index: 1, path }
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn missing_artifact_is_not_an_error() {
        let dir = tempdir().unwrap();
        let run = run_in(dir.path(), "run_001");
        assert!(extract_snapshot(&run, "analysis_results.json").is_none());
    }

    #[test]
    fn malformed_artifact_yields_no_snapshot() {
        let dir = tempdir().unwrap();
        let run = run_in(dir.path(), "run_001");
        fs::write(run.path.join("analysis_results.json"), "{ not json").unwrap();
        assert!(extract_snapshot(&run, "analysis_results.json").is_none());

        fs::write(run.path.join("analysis_results.json"), "[1, 2]").unwrap();
        assert!(matches!(
            load_artifact(&run.path.join("analysis_results.json")),
            Err(ArtifactError::NotAnObject { .. })
        ));
    }

    #[test]
    fn summary_fields_are_projected_with_defaults() {
        let doc = object(json!({
            "summary": {
                "statement_coverage": 87.5,
                "mutation_score": "72.25",
                "tests_passed": 12,
                "smell_score": null,
                "branch_coverage": "n/a",
                "unrelated": 3
            }
        }));
        let snapshot = project_document("run_001", &doc);

        assert_eq!(snapshot.get(MetricName::StatementCoverage), Some(87.5));
        assert_eq!(snapshot.get(MetricName::MutationScore), Some(72.25));
        assert_eq!(snapshot.get(MetricName::TestsPassed), Some(12.0));
        assert_eq!(snapshot.get(MetricName::SmellScore), Some(100.0));
        assert_eq!(snapshot.get(MetricName::BranchCoverage), Some(0.0));
        assert_eq!(snapshot.get(MetricName::IndependenceScore), Some(100.0));
        assert_eq!(snapshot.values().len(), 24);
        assert!(snapshot.defaulted().contains(&MetricName::SmellScore));
        assert!(!snapshot.defaulted().contains(&MetricName::TestsPassed));
    }

    #[test]
    fn compilation_success_requires_exactly_full_rate() {
        let full = project_document(
            "run_001",
            &object(json!({"summary": {"compilation_success_rate": 100}})),
        );
        assert_eq!(full.get(MetricName::CompilationSuccess), Some(1.0));

        let partial = project_document(
            "run_002",
            &object(json!({"summary": {"compilation_success_rate": 99.9}})),
        );
        assert_eq!(partial.get(MetricName::CompilationSuccess), Some(0.0));

        let absent = project_document("run_003", &object(json!({"summary": {}})));
        assert_eq!(absent.get(MetricName::CompilationSuccess), Some(0.0));
    }

    #[test]
    fn missing_summary_uses_all_defaults() {
        let snapshot = project_document("run_001", &object(json!({"details": []})));
        assert_eq!(snapshot, MetricSnapshot::defaults());
    }
}
