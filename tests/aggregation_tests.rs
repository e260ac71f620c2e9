use std::fs;
use std::path::{Path, PathBuf};

use multirun::core::cmds::aggregate::{
    AggregateRequest, Source, collect_experiments, run_aggregation,
};
use multirun::types::{AppError, MetricName, StabilityClass, StabilityThresholds};
use multirun::{AggregateOptions, aggregate_experiment, discover_experiments, read_results};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::{TempDir, tempdir};

const ARTIFACT: &str = "analysis_results.json";

/// Helper to write a run directory with an optional artifact
fn write_run(experiment: &Path, run: &str, summary: Option<serde_json::Value>) {
    let dir = experiment.join(run);
    fs::create_dir_all(&dir).expect("Failed to create run directory");
    if let Some(summary) = summary {
        let doc = json!({ "summary": summary, "details": { "generated_tests": [] } });
        fs::write(dir.join(ARTIFACT), doc.to_string()).expect("Failed to write artifact");
    }
}

fn summary(mutation: f64, coverage: f64) -> serde_json::Value {
    json!({
        "mutation_score": mutation,
        "statement_coverage": coverage,
        "branch_coverage": coverage - 10.0,
        "compilation_success_rate": 100,
        "tests_passed": 8,
        "tests_failed": 0
    })
}

fn options(root: &Path) -> AggregateOptions {
    AggregateOptions::new(ARTIFACT, root)
}

fn request(root: &TempDir, source: Source) -> AggregateRequest {
    AggregateRequest {
        source,
        options: options(root.path()),
        ignore: vec![],
        thresholds: StabilityThresholds::default(),
        output_json: root.path().join("aggregated_results.json"),
        output_report: root.path().join("aggregated_report.md"),
    }
}

#[test]
fn test_partial_data_is_excluded_from_valid_runs() {
    let root = tempdir().unwrap();
    let exp = root.path().join("results/zero_shot");
    write_run(&exp, "run_001", Some(summary(80.0, 90.0)));
    write_run(&exp, "run_002", None);
    write_run(&exp, "run_003", Some(summary(84.0, 94.0)));

    let agg = aggregate_experiment(&exp, &options(root.path())).unwrap();

    assert_eq!(agg.experiment, "results/zero_shot");
    assert_eq!(agg.total_runs, 3);
    assert_eq!(agg.valid_runs, 2);

    let mutation = agg.stats(MetricName::MutationScore);
    assert_eq!(mutation.mean, 82.0);
    assert_eq!(mutation.std_dev, 2.83);
    assert_eq!(mutation.min, 80.0);
    assert_eq!(mutation.max, 84.0);
    assert_eq!(mutation.count, 2);

    let compiled = agg.stats(MetricName::CompilationSuccess);
    assert_eq!(compiled.mean, 1.0);

    // Omitted scores fall back to their optimistic defaults
    assert_eq!(agg.stats(MetricName::SmellScore).mean, 100.0);
    assert_eq!(agg.stats(MetricName::IndependenceScore).mean, 100.0);
}

#[test]
fn test_corrupt_artifact_does_not_abort() {
    let root = tempdir().unwrap();
    let exp = root.path().join("exp");
    write_run(&exp, "run_1", Some(summary(70.0, 70.0)));
    write_run(&exp, "run_2", None);
    fs::write(exp.join("run_2").join(ARTIFACT), "{\"summary\": ").unwrap();

    let agg = aggregate_experiment(&exp, &options(root.path())).unwrap();
    assert_eq!((agg.total_runs, agg.valid_runs), (2, 1));
    assert_eq!(agg.stats(MetricName::MutationScore).std_dev, 0.0);
}

#[test]
fn test_empty_experiment_is_a_failure_not_zero_stats() {
    let root = tempdir().unwrap();
    let exp = root.path().join("exp");
    fs::create_dir_all(exp.join("run_x")).unwrap();

    let err = aggregate_experiment(&exp, &options(root.path())).unwrap_err();
    assert!(matches!(err, AppError::NoRuns(_)));
}

#[test]
fn test_corpus_skips_experiments_without_valid_runs() {
    let root = tempdir().unwrap();
    let results = root.path().join("results");
    write_run(&results.join("a/ctx_low"), "run_001", Some(summary(60.0, 70.0)));
    write_run(&results.join("a/ctx_high"), "run_001", None);
    write_run(&results.join("b"), "run_001", Some(summary(90.0, 95.0)));
    write_run(&results.join("b"), "run_002", Some(summary(92.0, 96.0)));

    let (experiments, skipped) = collect_experiments(
        &Source::Corpus(results.clone()),
        &options(root.path()),
        &[],
    )
    .unwrap();

    let names: Vec<&str> = experiments.iter().map(|e| e.experiment.as_str()).collect();
    assert_eq!(names, vec!["results/a/ctx_low", "results/b"]);
    assert_eq!(skipped, vec!["results/a/ctx_high".to_string()]);
}

#[test]
fn test_single_experiment_without_valid_runs_is_fatal() {
    let root = tempdir().unwrap();
    let exp = root.path().join("exp");
    write_run(&exp, "run_001", None);

    let req = request(&root, Source::Experiment(exp));
    let err = run_aggregation(&req).unwrap_err();
    assert!(matches!(err, AppError::NoValidRuns(_)));
    assert!(!req.output_json.exists());
    assert!(!req.output_report.exists());
}

#[test]
fn test_missing_paths_are_not_found() {
    let root = tempdir().unwrap();
    let missing: PathBuf = root.path().join("nope");

    let err = run_aggregation(&request(&root, Source::Corpus(missing.clone()))).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = run_aggregation(&request(&root, Source::Experiment(missing))).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_corpus_without_runs_writes_nothing() {
    let root = tempdir().unwrap();
    let results = root.path().join("results");
    fs::create_dir_all(results.join("empty/notes")).unwrap();

    let req = request(&root, Source::Corpus(results));
    let err = run_aggregation(&req).unwrap_err();
    assert!(matches!(err, AppError::NoExperiments(_)));
    assert!(!req.output_json.exists());
}

#[test]
fn test_full_pipeline_writes_both_artifacts() {
    let root = tempdir().unwrap();
    let results = root.path().join("results");
    for (i, (m, c)) in [(90.0, 95.0), (86.0, 92.0), (94.0, 98.0)].iter().enumerate() {
        write_run(&results.join("stable"), &format!("run_{:03}", i + 1), Some(summary(*m, *c)));
    }
    for (i, (m, c)) in [(50.0, 95.0), (80.0, 92.0), (65.0, 98.0)].iter().enumerate() {
        write_run(&results.join("noisy"), &format!("run_{:03}", i + 1), Some(summary(*m, *c)));
    }

    let req = request(&root, Source::Corpus(results.clone()));
    let summary = run_aggregation(&req).unwrap();

    assert_eq!(summary.experiments, 2);
    assert!(summary.skipped.is_empty());
    assert_eq!(summary.output_json, "aggregated_results.json");

    let parsed = read_results(&req.output_json).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].experiment, "results/noisy");
    assert_eq!(parsed[1].runs.len(), 3);

    // Statistics survive the round trip exactly
    let direct = aggregate_experiment(&results.join("stable"), &options(root.path())).unwrap();
    assert_eq!(parsed[1].statistics, direct.statistics);

    let thresholds = StabilityThresholds::default();
    assert_eq!(parsed[1].stability(&thresholds), StabilityClass::High);
    assert_eq!(parsed[0].stability(&thresholds), StabilityClass::Low);

    let report = fs::read_to_string(&req.output_report).unwrap();
    assert!(report.contains("Experiments: 2"));
    assert!(report.contains("## results/stable"));
    assert!(report.contains("Runs: 3/3 valid (100.0%)"));
    assert!(report.contains("- Classification: High"));
}

#[test]
fn test_discovery_is_idempotent() {
    let root = tempdir().unwrap();
    for exp in ["x/one", "x/two", "y"] {
        write_run(&root.path().join(exp), "run_001", None);
    }
    let first = discover_experiments(root.path(), &[]).unwrap();
    let second = discover_experiments(root.path(), &[]).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![
            root.path().join("x/one"),
            root.path().join("x/two"),
            root.path().join("y")
        ]
    );
}
