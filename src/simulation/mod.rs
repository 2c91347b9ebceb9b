pub mod summary;
pub mod variability;
use crate::config::GeneratorConfig;
use crate::models::{MealContext, Reading};
use crate::error::{DashboardError, DashboardResult};
use chrono::{Duration, NaiveDateTime};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use log::{info, debug};

pub use summary::*;
pub use variability::*;

/// Synthetic glucose readings at a fixed interval for a small patient panel.
pub struct ReadingSimulator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl ReadingSimulator {
    pub fn new(config: GeneratorConfig, seed: Option<u64>) -> DashboardResult<Self> {
        config.validate()?;

        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Ok(Self { config, rng })
    }

    pub fn generate(&mut self) -> DashboardResult<Vec<Reading>> {
        let n_records = self.config.records;
        info!("Generating {} glucose readings", n_records);

        let mut readings = Vec::with_capacity(n_records);

        for i in 0..n_records {
            let timestamp = self.reading_time(i)?;

            let patient_idx = self.rng.gen_range(0..self.config.patients.len());
            let patient_id = self.config.patients[patient_idx].clone();

            let glucose_level = sample_glucose(
                self.config.glucose_mean,
                self.config.glucose_sd,
                &mut self.rng,
            )?;

            let context_idx = self.rng.gen_range(0..MealContext::ALL.len());
            let meal_context = MealContext::ALL[context_idx].clone();

            readings.push(Reading {
                timestamp: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                patient_id,
                glucose_level,
                meal_context,
            });
        }

        debug!("Generated readings up to {:?}", readings.last().map(|r| &r.timestamp));
        Ok(readings)
    }

    fn reading_time(&self, index: usize) -> DashboardResult<NaiveDateTime> {
        i64::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(self.config.interval_minutes))
            .and_then(Duration::try_minutes)
            .and_then(|offset| self.config.start.checked_add_signed(offset))
            .ok_or_else(|| DashboardError::InvalidConfig(format!(
                "Reading {} at {} minute intervals falls outside the supported time range",
                index, self.config.interval_minutes
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            records: 50,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_generation_layout() {
        let mut simulator = ReadingSimulator::new(small_config(), Some(42)).unwrap();
        let readings = simulator.generate().unwrap();

        assert_eq!(readings.len(), 50);
        assert_eq!(readings[0].timestamp, "2026-01-01 00:00:00");
        assert_eq!(readings[1].timestamp, "2026-01-01 00:30:00");
        assert_eq!(readings[49].timestamp, "2026-01-02 00:30:00");
        assert!(readings.iter().all(|r| ["P001", "P002", "P003"].contains(&r.patient_id.as_str())));
        assert!(readings.iter().all(|r| r.meal_context.is_known()));
        assert!(readings.iter().all(|r| r.glucose_level >= 0.0));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = ReadingSimulator::new(small_config(), Some(42)).unwrap().generate().unwrap();
        let b = ReadingSimulator::new(small_config(), Some(42)).unwrap().generate().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_out_of_range_timestamps_are_errors() {
        let config = GeneratorConfig {
            records: 2,
            interval_minutes: 1_000_000_000_000,
            ..GeneratorConfig::default()
        };
        let mut simulator = ReadingSimulator::new(config, Some(42)).unwrap();
        assert!(matches!(simulator.generate(), Err(DashboardError::InvalidConfig(_))));

        let config = GeneratorConfig {
            records: 3,
            interval_minutes: i64::MAX,
            ..GeneratorConfig::default()
        };
        let mut simulator = ReadingSimulator::new(config, Some(42)).unwrap();
        assert!(matches!(simulator.generate(), Err(DashboardError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GeneratorConfig {
            patients: vec![],
            ..GeneratorConfig::default()
        };
        assert!(ReadingSimulator::new(config, Some(1)).is_err());
    }
}
