use rand_distr::{Normal, Distribution};
use crate::error::{DashboardError, DashboardResult};

/// Normally distributed glucose level, rounded to two decimals and never negative.
pub fn sample_glucose<R: rand::Rng>(
    mean: f64,
    sd: f64,
    rng: &mut R,
) -> DashboardResult<f64> {
    if sd <= 0.0 {
        return Ok(round_to_hundredths(mean).max(0.0));
    }

    let normal = Normal::new(mean, sd)
        .map_err(|_| DashboardError::Random)?;
    let value = normal.sample(rng);

    Ok(round_to_hundredths(value).max(0.0))
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
