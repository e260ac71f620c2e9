use log::info;

use crate::types::AppResult;
use crate::types::config::config;

pub fn execute(format: &str) -> AppResult<()> {
    let effective_config = config().to_effective();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&effective_config)?);
        return Ok(());
    }

    let log = effective_config.log();
    info!("Effective Configuration:");
    info!("");
    info!("Log:");
    info!("  level: {}", log.level());
    match log.color() {
        Some(true) => info!("  color: on"),
        Some(false) => info!("  color: off"),
        None => info!("  color: auto"),
    }

    let paths = effective_config.paths();
    info!("");
    info!("Paths:");
    info!("  results_root: {}", paths.results_root());
    info!("  artifact: {}", paths.artifact());
    info!("  output_json: {}", paths.output_json());
    info!("  output_report: {}", paths.output_report());

    info!("");
    info!("Corpus:");
    let corpus = effective_config.corpus();
    if corpus.ignore().is_empty() {
        info!("  ignore: []");
    } else {
        info!("  ignore: [{}]", corpus.ignore().join(", "));
    }

    let thresholds = effective_config.stability().thresholds();
    info!("");
    info!("Stability:");
    info!("  high_cv: {}%", thresholds.high_cv);
    info!("  medium_cv: {}%", thresholds.medium_cv);

    Ok(())
}
