//! Markdown report over a set of aggregated experiments.
//!
//! Rendering is pure: the same experiments and timestamp always produce the
//! same text.

use std::fmt::{self, Write};

use chrono::{DateTime, TimeZone};
use strum::IntoEnumIterator;

use crate::types::{AggregatedExperiment, MetricGroup, MetricName, StabilityThresholds};

pub fn render_report<Tz>(
    experiments: &[AggregatedExperiment],
    generated_at: &DateTime<Tz>,
    thresholds: &StabilityThresholds,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, experiments, generated_at, thresholds);
    out
}

/// Write the report into any formatter sink
pub fn write_report<W, Tz>(
    out: &mut W,
    experiments: &[AggregatedExperiment],
    generated_at: &DateTime<Tz>,
    thresholds: &StabilityThresholds,
) -> fmt::Result
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    writeln!(out, "# Multi-Run Experiment Report")?;
    writeln!(out)?;
    writeln!(
        out,
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S %:z")
    )?;
    writeln!(out, "Experiments: {}", experiments.len())?;

    for experiment in experiments {
        writeln!(out)?;
        render_experiment(out, experiment, thresholds)?;
    }

    if !experiments.is_empty() {
        writeln!(out)?;
        render_comparison(out, experiments, thresholds)?;
    }
    Ok(())
}

fn render_experiment<W: Write>(
    out: &mut W,
    experiment: &AggregatedExperiment,
    thresholds: &StabilityThresholds,
) -> fmt::Result {
    writeln!(out, "## {}", experiment.experiment)?;
    writeln!(out)?;
    writeln!(
        out,
        "Runs: {}/{} valid ({:.1}%)",
        experiment.valid_runs,
        experiment.total_runs,
        experiment.run_coverage_percent()
    )?;

    for group in MetricGroup::iter() {
        writeln!(out)?;
        writeln!(out, "### {group}")?;
        writeln!(out)?;
        for metric in group.metrics() {
            let s = experiment.stats(metric);
            writeln!(
                out,
                "- {}: {:.2} ± {:.2} (min {:.2}, max {:.2})",
                metric.label(),
                s.mean,
                s.std_dev,
                s.min,
                s.max
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "### Stability")?;
    writeln!(out)?;
    writeln!(out, "- Classification: {}", experiment.stability(thresholds))?;
    writeln!(out, "- Mutation score CV: {:.2}%", experiment.mutation_cv())?;
    writeln!(
        out,
        "- Statement coverage CV: {:.2}%",
        experiment.coverage_cv()
    )
}

fn render_comparison<W: Write>(
    out: &mut W,
    experiments: &[AggregatedExperiment],
    thresholds: &StabilityThresholds,
) -> fmt::Result {
    writeln!(out, "## Cross-Experiment Comparison")?;
    writeln!(out)?;
    writeln!(
        out,
        "| Experiment | Runs | Mutation score | Statement coverage | Overall quality | Stability |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for experiment in experiments {
        writeln!(
            out,
            "| {} | {}/{} | {} | {} | {} | {} |",
            experiment.experiment,
            experiment.valid_runs,
            experiment.total_runs,
            mean_cell(experiment, MetricName::MutationScore),
            mean_cell(experiment, MetricName::StatementCoverage),
            mean_cell(experiment, MetricName::OverallQualityScore),
            experiment.stability(thresholds)
        )?;
    }
    Ok(())
}

fn mean_cell(experiment: &AggregatedExperiment, metric: MetricName) -> String {
    let s = experiment.stats(metric);
    format!("{:.2} ± {:.2}", s.mean, s.std_dev)
}
