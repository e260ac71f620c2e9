use crate::types::MetricStatistics;

/// Round to two decimal places for stable display, ties to even.
/// Values too large to scale are already coarser than 0.01 and pass through.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / 100.0
}

impl MetricStatistics {
    /// Reduce one metric's per-run samples. `None` entries are skipped; zeros are not.
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values: Vec<f64> = samples
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect();

        if values.is_empty() {
            return Self::default();
        }

        let n = values.len();
        // Running mean stays within [min, max], so it cannot overflow
        let mut mean = 0.0;
        for (k, v) in values.iter().enumerate() {
            let k = (k + 1) as f64;
            mean += v / k - mean / k;
        }
        let std_dev = if n > 1 { sample_std_dev(&values, mean) } else { 0.0 };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            mean: round2(mean),
            std_dev: round2(std_dev),
            min: round2(min),
            max: round2(max),
            count: n,
        }
    }
}

/// Bessel-corrected standard deviation, computed on values scaled by the
/// largest magnitude so squaring cannot overflow. Saturates at `f64::MAX`.
fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return 0.0;
    }
    let scaled_mean = mean / scale;
    let variance = values
        .iter()
        .map(|v| (v / scale - scaled_mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    let std_dev = variance.sqrt() * scale;
    if std_dev.is_finite() { std_dev } else { f64::MAX }
}
