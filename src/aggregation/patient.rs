use crate::models::Alert;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientStats {
    pub total_alerts: usize,
    pub avg_glucose: f64,
    pub max_glucose: f64,
    pub min_glucose: f64,
}

struct Accumulator {
    count: usize,
    sum: f64,
    max: f64,
    min: f64,
}

impl Accumulator {
    fn new(value: f64) -> Self {
        Self { count: 1, sum: value, max: value, min: value }
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.max = self.max.max(value);
        self.min = self.min.min(value);
    }

    fn finish(self) -> PatientStats {
        PatientStats {
            total_alerts: self.count,
            avg_glucose: self.sum / self.count as f64,
            max_glucose: self.max,
            min_glucose: self.min,
        }
    }
}

/// Per-patient count, mean, max and min of glucose, keyed by patient id.
pub fn patient_stats(alerts: &[Alert]) -> BTreeMap<String, PatientStats> {
    let mut partitions: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for alert in alerts {
        partitions.entry(alert.patient_id.as_str())
            .and_modify(|acc| acc.push(alert.glucose_level))
            .or_insert_with(|| Accumulator::new(alert.glucose_level));
    }

    partitions.into_iter()
        .map(|(patient, acc)| (patient.to_string(), acc.finish()))
        .collect()
}

/// Distinct patient ids in ascending string order.
pub fn patient_roster(alerts: &[Alert]) -> Vec<String> {
    alerts.iter()
        .map(|alert| alert.patient_id.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
