use log::info;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::types::{AppResult, MetricGroup, MetricName};

#[derive(Serialize)]
struct MetricInfo {
    name: MetricName,
    source_field: &'static str,
    default: f64,
    group: String,
}

pub fn execute(format: &str) -> AppResult<()> {
    if format == "json" {
        let metrics: Vec<MetricInfo> = MetricName::iter()
            .map(|m| MetricInfo {
                name: m,
                source_field: m.source_field(),
                default: m.default_value(),
                group: m.group().to_string(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    for group in MetricGroup::iter() {
        info!("{}:", group);
        for metric in group.metrics() {
            let source = if metric.source_field() == metric.as_ref() {
                String::new()
            } else {
                format!(" (from summary.{})", metric.source_field())
            };
            info!(
                "  {:<28} default {:>5}{}",
                metric.as_ref(),
                metric.default_value(),
                source
            );
        }
        info!("");
    }

    Ok(())
}
