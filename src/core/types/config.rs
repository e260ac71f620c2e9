use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::types::StabilityThresholds;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub color: Option<bool>, // None = auto-detect (semantic)
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn color(&self) -> Option<bool> {
        self.color // None has semantic meaning (auto-detect)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            level: Some(self.level().to_string()),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PathsConfig {
    pub results_root: Option<String>,
    pub artifact: Option<String>,
    pub output_json: Option<String>,
    pub output_report: Option<String>,
}

impl PathsConfig {
    pub fn results_root(&self) -> &str {
        self.results_root.as_deref().unwrap_or("results")
    }

    pub fn artifact(&self) -> &str {
        self.artifact.as_deref().unwrap_or("analysis_results.json")
    }

    pub fn output_json(&self) -> &str {
        self.output_json
            .as_deref()
            .unwrap_or("aggregated_results.json")
    }

    pub fn output_report(&self) -> &str {
        self.output_report
            .as_deref()
            .unwrap_or("aggregated_report.md")
    }

    pub fn to_effective(&self) -> Self {
        Self {
            results_root: Some(self.results_root().to_string()),
            artifact: Some(self.artifact().to_string()),
            output_json: Some(self.output_json().to_string()),
            output_report: Some(self.output_report().to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CorpusConfig {
    pub ignore: Option<Vec<String>>,
}

impl CorpusConfig {
    pub fn ignore(&self) -> &[String] {
        self.ignore.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StabilityConfig {
    pub high_cv: Option<f64>,
    pub medium_cv: Option<f64>,
}

impl StabilityConfig {
    pub fn thresholds(&self) -> StabilityThresholds {
        let defaults = StabilityThresholds::default();
        StabilityThresholds {
            high_cv: self.high_cv.unwrap_or(defaults.high_cv),
            medium_cv: self.medium_cv.unwrap_or(defaults.medium_cv),
        }
    }

    pub fn to_effective(&self) -> Self {
        let t = self.thresholds();
        Self {
            high_cv: Some(t.high_cv),
            medium_cv: Some(t.medium_cv),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub log: Option<LogConfig>,
    pub paths: Option<PathsConfig>,
    pub corpus: Option<CorpusConfig>,
    pub stability: Option<StabilityConfig>,
}

impl Config {
    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    pub fn paths(&self) -> PathsConfig {
        self.paths.clone().unwrap_or_default()
    }

    pub fn corpus(&self) -> CorpusConfig {
        self.corpus.clone().unwrap_or_default()
    }

    pub fn stability(&self) -> StabilityConfig {
        self.stability.clone().unwrap_or_default()
    }

    pub fn to_effective(&self) -> Self {
        Self {
            log: Some(self.log().to_effective()),
            paths: Some(self.paths().to_effective()),
            corpus: Some(CorpusConfig {
                ignore: Some(self.corpus().ignore().to_vec()),
            }),
            stability: Some(self.stability().to_effective()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub log_color: Option<String>, // "on" | "off"
}

pub const CONFIG_FILENAME: &str = "multirun.toml";

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let mut cfg = Config::default();
        // Apply nearest config file found by walking up from cwd
        if let Some(path) = find_nearest_config_file()
            && let Some(file_cfg) = read_config_file(&path)
        {
            apply_file_config(&mut cfg, &file_cfg);
        }
        cfg
    })
}

pub fn init_with_overrides(overrides: &CliOverrides) {
    let mut cfg = Config::default();

    // 1) Config file: walk up from cwd and use the first config file found
    if let Some(path) = find_nearest_config_file()
        && let Some(file_cfg) = read_config_file(&path)
    {
        apply_file_config(&mut cfg, &file_cfg);
    }

    // 2) CLI arguments (highest priority). Only override if user specified.
    apply_cli_overrides(&mut cfg, overrides);

    let _ = CONFIG.set(cfg);
}

fn read_config_file(path: &Path) -> Option<Config> {
    let contents = fs::read_to_string(path).ok()?;
    match toml::from_str::<Config>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            // Logging is not up yet; surface it once logging starts
            PENDING_WARNING.get_or_init(|| {
                format!("Ignoring invalid config file {}: {}", path.display(), e)
            });
            None
        }
    }
}

static PENDING_WARNING: OnceCell<String> = OnceCell::new();

/// Emit any warning collected while loading config before logging existed
pub fn flush_config_warnings() {
    if let Some(message) = PENDING_WARNING.get() {
        warn!("{}", message);
    }
}

fn apply_file_config(cfg: &mut Config, file: &Config) {
    // Merge log section
    if let Some(file_log) = &file.log {
        let mut log = cfg.log.clone().unwrap_or_default();
        if file_log.level.is_some() {
            log.level = file_log.level.clone();
        }
        if file_log.color.is_some() {
            log.color = file_log.color;
        }
        cfg.log = Some(log);
    }

    // Merge paths section
    if let Some(file_paths) = &file.paths {
        let mut paths = cfg.paths.clone().unwrap_or_default();
        if file_paths.results_root.is_some() {
            paths.results_root = file_paths.results_root.clone();
        }
        if file_paths.artifact.is_some() {
            paths.artifact = file_paths.artifact.clone();
        }
        if file_paths.output_json.is_some() {
            paths.output_json = file_paths.output_json.clone();
        }
        if file_paths.output_report.is_some() {
            paths.output_report = file_paths.output_report.clone();
        }
        cfg.paths = Some(paths);
    }

    // Ignore globs accumulate
    if let Some(file_corpus) = &file.corpus
        && let Some(ignore) = &file_corpus.ignore
    {
        let mut corpus = cfg.corpus.clone().unwrap_or_default();
        corpus.ignore = Some(
            corpus
                .ignore()
                .iter()
                .chain(ignore.iter())
                .filter(|p| !p.trim().is_empty())
                .cloned()
                .collect(),
        );
        cfg.corpus = Some(corpus);
    }

    if let Some(file_stability) = &file.stability {
        let mut stability = cfg.stability.clone().unwrap_or_default();
        if file_stability.high_cv.is_some() {
            stability.high_cv = file_stability.high_cv;
        }
        if file_stability.medium_cv.is_some() {
            stability.medium_cv = file_stability.medium_cv;
        }
        cfg.stability = Some(stability);
    }
}

fn apply_cli_overrides(cfg: &mut Config, overrides: &CliOverrides) {
    let mut log = cfg.log.clone().unwrap_or_default();
    if let Some(level) = &overrides.log_level
        && !level.trim().is_empty()
    {
        log.level = Some(level.trim().to_string());
    }
    if let Some(color_str) = &overrides.log_color {
        match color_str.to_lowercase().as_str() {
            "on" => log.color = Some(true),
            "off" => log.color = Some(false),
            _ => {}
        }
    }
    if overrides.log_level.is_some() || overrides.log_color.is_some() {
        cfg.log = Some(log);
    }
}

fn find_nearest_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

pub fn colors_enabled() -> bool {
    match config().log().color() {
        Some(force) => force,
        None => console::colors_enabled(),
    }
}
