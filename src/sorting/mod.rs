use crate::models::Alert;
use std::cmp::Ordering;
use std::str::FromStr;

/// Column an alert table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Timestamp,
    PatientId,
    GlucoseLevel,
    MealContext,
    Severity,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "timestamp" | "time" => Ok(SortKey::Timestamp),
            "patient" | "patient_id" => Ok(SortKey::PatientId),
            "glucose" | "glucose_level" => Ok(SortKey::GlucoseLevel),
            "context" | "meal_context" => Ok(SortKey::MealContext),
            "severity" | "severidad" => Ok(SortKey::Severity),
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

fn compare(a: &Alert, b: &Alert, key: SortKey) -> Ordering {
    match key {
        SortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
        SortKey::PatientId => a.patient_id.cmp(&b.patient_id),
        SortKey::GlucoseLevel => a.glucose_level.total_cmp(&b.glucose_level),
        SortKey::MealContext => a.meal_context.label().cmp(b.meal_context.label()),
        SortKey::Severity => a.severity.label().cmp(b.severity.label()),
    }
}

/// Return a new stably ordered copy of `alerts`; equal keys keep input order
/// in both directions.
pub fn sort_alerts(alerts: &[Alert], order: SortOrder) -> Vec<Alert> {
    let mut sorted = alerts.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, order.key);
        match order.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealContext, Severity};

    fn alert(timestamp: &str, patient: &str, glucose: f64) -> Alert {
        Alert {
            timestamp: timestamp.to_string(),
            patient_id: patient.to_string(),
            glucose_level: glucose,
            meal_context: MealContext::Fasting,
            severity: Severity::Moderate,
        }
    }

    fn levels(alerts: &[Alert]) -> Vec<f64> {
        alerts.iter().map(|a| a.glucose_level).collect()
    }

    #[test]
    fn test_glucose_descending() {
        let alerts = vec![
            alert("2026-01-01 00:00:00", "P001", 100.0),
            alert("2026-01-01 00:30:00", "P001", 300.0),
            alert("2026-01-01 01:00:00", "P001", 200.0),
        ];

        let sorted = sort_alerts(&alerts, SortOrder::new(SortKey::GlucoseLevel, SortDirection::Descending));
        assert_eq!(levels(&sorted), vec![300.0, 200.0, 100.0]);
        // input untouched
        assert_eq!(levels(&alerts), vec![100.0, 300.0, 200.0]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let alerts = vec![
            alert("2026-01-01 02:00:00", "P002", 150.0),
            alert("2026-01-01 00:00:00", "P001", 180.0),
            alert("2026-01-01 01:00:00", "P002", 160.0),
            alert("2026-01-01 03:00:00", "P001", 170.0),
        ];

        let ascending = sort_alerts(&alerts, SortOrder::new(SortKey::PatientId, SortDirection::Ascending));
        assert_eq!(levels(&ascending), vec![180.0, 170.0, 150.0, 160.0]);

        let descending = sort_alerts(&alerts, SortOrder::new(SortKey::PatientId, SortDirection::Descending));
        assert_eq!(levels(&descending), vec![150.0, 160.0, 180.0, 170.0]);
    }

    #[test]
    fn test_timestamp_lexicographic() {
        let alerts = vec![
            alert("2026-01-02 00:00:00", "P001", 1.0),
            alert("2026-01-01 09:00:00", "P001", 2.0),
            alert("2026-01-01 10:00:00", "P001", 3.0),
        ];

        let sorted = sort_alerts(&alerts, SortOrder::new(SortKey::Timestamp, SortDirection::Ascending));
        assert_eq!(levels(&sorted), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("glucose".parse::<SortKey>(), Ok(SortKey::GlucoseLevel));
        assert_eq!("Patient_ID".parse::<SortKey>(), Ok(SortKey::PatientId));
        assert!("colour".parse::<SortKey>().is_err());
    }
}
