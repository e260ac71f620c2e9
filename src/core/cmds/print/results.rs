use std::path::PathBuf;

use console::style;
use log::info;
use serde::Serialize;

use crate::core::output::read_results;
use crate::types::config::config;
use crate::types::{AppError, AppResult, MetricName, StabilityClass};

#[derive(Serialize)]
struct ExperimentRow {
    experiment: String,
    valid_runs: usize,
    total_runs: usize,
    mutation_score: f64,
    mutation_cv: f64,
    statement_coverage: f64,
    coverage_cv: f64,
    stability: StabilityClass,
}

pub fn execute(input: Option<&str>, format: &str) -> AppResult<()> {
    let path = PathBuf::from(input.unwrap_or(config().paths().output_json()));
    if !path.exists() {
        return Err(AppError::NotFound(path));
    }

    let thresholds = config().stability().thresholds();
    let rows: Vec<ExperimentRow> = read_results(&path)?
        .iter()
        .map(|e| ExperimentRow {
            experiment: e.experiment.clone(),
            valid_runs: e.valid_runs,
            total_runs: e.total_runs,
            mutation_score: e.stats(MetricName::MutationScore).mean,
            mutation_cv: e.mutation_cv(),
            statement_coverage: e.stats(MetricName::StatementCoverage).mean,
            coverage_cv: e.coverage_cv(),
            stability: e.stability(&thresholds),
        })
        .collect();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        info!("No experiments in {}", path.display());
        return Ok(());
    }

    for row in rows {
        let stability = match row.stability {
            StabilityClass::High => style(row.stability.to_string()).green(),
            StabilityClass::Medium => style(row.stability.to_string()).yellow(),
            StabilityClass::Low => style(row.stability.to_string()).red(),
        };
        info!("Experiment: {}", style(&row.experiment).bold());
        info!("  Runs: {}/{} valid", row.valid_runs, row.total_runs);
        info!(
            "  Mutation score: {:.2} (CV {:.2}%), Statement coverage: {:.2} (CV {:.2}%)",
            row.mutation_score, row.mutation_cv, row.statement_coverage, row.coverage_cv
        );
        info!("  Stability: {}", stability);
        info!(""); // Empty line between experiments
    }

    Ok(())
}
