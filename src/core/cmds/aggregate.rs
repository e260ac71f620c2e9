use std::env;
use std::path::{Path, PathBuf};

use chrono::Local;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Serialize;

use crate::core::cli::AggregateArgs;
use crate::core::output::write_outputs;
use crate::core::report::render_report;
use crate::engine::aggregator::{AggregateOptions, aggregate_experiment};
use crate::engine::walker::discover_experiments;
use crate::types::config::config;
use crate::types::{
    AggregatedExperiment, AppError, AppResult, StabilityThresholds, display_relative,
};

/// What to aggregate
#[derive(Debug, Clone)]
pub enum Source {
    /// One experiment directory; nothing to aggregate is fatal
    Experiment(PathBuf),
    /// Every experiment under a results root; empty experiments are skipped
    Corpus(PathBuf),
}

/// Everything one aggregation needs, resolved from CLI and config
#[derive(Debug, Clone)]
pub struct AggregateRequest {
    pub source: Source,
    pub options: AggregateOptions,
    pub ignore: Vec<String>,
    pub thresholds: StabilityThresholds,
    pub output_json: PathBuf,
    pub output_report: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct AggregateSummary {
    pub experiments: usize,
    pub skipped: Vec<String>,
    pub output_json: String,
    pub output_report: String,
}

/// Aggregate the experiments of a source without writing anything.
/// Returns the aggregated experiments and the paths of skipped ones.
pub fn collect_experiments(
    source: &Source,
    options: &AggregateOptions,
    ignore: &[String],
) -> AppResult<(Vec<AggregatedExperiment>, Vec<String>)> {
    match source {
        Source::Experiment(dir) => {
            if !dir.exists() {
                return Err(AppError::NotFound(dir.clone()));
            }
            let experiment = aggregate_experiment(dir, options)?;
            Ok((vec![experiment], vec![]))
        }
        Source::Corpus(root) => {
            if !root.exists() {
                return Err(AppError::NotFound(root.clone()));
            }
            let dirs = discover_experiments(root, ignore)?;
            if dirs.is_empty() {
                warn!(
                    "No run_<n> directories found under {}",
                    display_relative(root, &options.working_root)
                );
                return Err(AppError::NoExperiments(root.clone()));
            }

            let progress = ProgressBar::new(dirs.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );

            let mut experiments = Vec::with_capacity(dirs.len());
            let mut skipped = Vec::new();
            for dir in &dirs {
                let name = display_relative(dir, &options.working_root);
                progress.set_message(name.clone());
                match aggregate_experiment(dir, options) {
                    Ok(experiment) => experiments.push(experiment),
                    Err(e) if e.is_empty_experiment() => {
                        progress.suspend(|| warn!("Skipping {}: {}", name, e));
                        skipped.push(name);
                    }
                    Err(e) => {
                        progress.abandon();
                        return Err(e);
                    }
                }
                progress.inc(1);
            }
            progress.finish_and_clear();

            if experiments.is_empty() {
                return Err(AppError::NoExperiments(root.clone()));
            }
            Ok((experiments, skipped))
        }
    }
}

/// Aggregate, render, and write both output artifacts.
/// Nothing is written unless at least one experiment was aggregated.
pub fn run_aggregation(request: &AggregateRequest) -> AppResult<AggregateSummary> {
    let (experiments, skipped) =
        collect_experiments(&request.source, &request.options, &request.ignore)?;

    let report = render_report(&experiments, &Local::now(), &request.thresholds);
    write_outputs(
        &experiments,
        &request.output_json,
        &request.output_report,
        &report,
    )?;

    Ok(AggregateSummary {
        experiments: experiments.len(),
        skipped,
        output_json: display_relative(&request.output_json, &request.options.working_root),
        output_report: display_relative(&request.output_report, &request.options.working_root),
    })
}

pub fn execute_aggregate(args: AggregateArgs) -> AppResult<()> {
    let cwd = env::current_dir()?;
    let paths = config().paths();

    let source = match (&args.experiment, &args.results_root) {
        (Some(experiment), _) => Source::Experiment(cwd.join(experiment)),
        (None, Some(root)) => Source::Corpus(cwd.join(root)),
        (None, None) => Source::Corpus(cwd.join(paths.results_root())),
    };

    let request = AggregateRequest {
        source,
        options: AggregateOptions::new(paths.artifact(), &cwd),
        ignore: config().corpus().ignore().to_vec(),
        thresholds: config().stability().thresholds(),
        output_json: resolve_output(&cwd, args.output_json.as_deref(), paths.output_json()),
        output_report: resolve_output(&cwd, args.output_report.as_deref(), paths.output_report()),
    };

    let summary = run_aggregation(&request)?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print_table_format(&summary),
    }

    Ok(())
}

fn resolve_output(cwd: &Path, cli: Option<&str>, configured: &str) -> PathBuf {
    cwd.join(cli.unwrap_or(configured))
}

fn print_table_format(summary: &AggregateSummary) {
    info!(
        "{}",
        style(format!("Aggregated {} experiment(s)", summary.experiments)).bold()
    );
    if !summary.skipped.is_empty() {
        info!("Skipped {} experiment(s) with no valid runs:", summary.skipped.len());
        for name in &summary.skipped {
            info!("  {}", name);
        }
    }
    info!("Structured results: {}", summary.output_json);
    info!("Report: {}", summary.output_report);
}
