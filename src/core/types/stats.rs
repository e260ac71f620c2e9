use serde::{Deserialize, Serialize};
use strum::Display;

/// Descriptive statistics for one metric across the valid runs of an experiment
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricStatistics {
    pub mean: f64,
    #[serde(rename = "std")]
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl MetricStatistics {
    /// Standard deviation as a percentage of the mean; 0 when the mean is 0
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev / self.mean * 100.0
        }
    }
}

/// Stability of an experiment across its repeated runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum StabilityClass {
    High,
    Medium,
    Low,
}

/// CV bounds (in percent) for the stability classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityThresholds {
    pub high_cv: f64,
    pub medium_cv: f64,
}

impl Default for StabilityThresholds {
    fn default() -> Self {
        Self {
            high_cv: 5.0,
            medium_cv: 10.0,
        }
    }
}

impl StabilityClass {
    /// Both coefficients must be under a bound to earn its label.
    pub fn classify(mutation_cv: f64, coverage_cv: f64, thresholds: &StabilityThresholds) -> Self {
        let worst = mutation_cv.max(coverage_cv);
        if worst < thresholds.high_cv {
            StabilityClass::High
        } else if worst < thresholds.medium_cv {
            StabilityClass::Medium
        } else {
            StabilityClass::Low
        }
    }
}
