use crate::config::TrendConfig;
use crate::models::Alert;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// Compare the mean glucose of the earliest and latest windows of `alerts`,
/// taken in arrival order.
pub fn classify_trend(alerts: &[Alert], config: &TrendConfig) -> Trend {
    let n = alerts.len();
    if n < config.min_alerts {
        return Trend::Stable;
    }

    let k = (n as f64 * config.window_fraction).floor() as usize;
    if k == 0 {
        return Trend::Stable;
    }

    let first_avg = window_mean(&alerts[..k]);
    let last_avg = window_mean(&alerts[n - k..]);
    let diff = last_avg - first_avg;

    if diff > config.threshold {
        Trend::Increasing
    } else if diff < -config.threshold {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn window_mean(window: &[Alert]) -> f64 {
    window.iter().map(|alert| alert.glucose_level).sum::<f64>() / window.len() as f64
}
