use crate::config::SummaryConfig;
use crate::models::{Alert, MealAverages, MealContext, Metadata, Reading, Severity, SummaryPayload, SummaryStatistics};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use log::info;

/// Detect hyperglycemia alerts in `readings` and aggregate the summary payload.
pub fn build_summary(readings: &[Reading], config: &SummaryConfig, generated_at: NaiveDateTime) -> SummaryPayload {
    let alerts: Vec<Alert> = readings.iter()
        .filter(|r| r.glucose_level > config.hyperglycemia_threshold)
        .map(|r| Alert {
            timestamp: r.timestamp.clone(),
            patient_id: r.patient_id.clone(),
            glucose_level: r.glucose_level,
            meal_context: r.meal_context.clone(),
            severity: classify_severity(r.glucose_level, config),
        })
        .collect();

    let max_glucose = alerts.iter()
        .map(|a| a.glucose_level)
        .fold(0.0, f64::max);
    let affected_patients = alerts.iter()
        .map(|a| a.patient_id.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    info!(
        "{} of {} readings exceed {} mg/dL",
        alerts.len(),
        readings.len(),
        config.hyperglycemia_threshold
    );

    SummaryPayload {
        metadata: Metadata {
            generated_at: generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            threshold: config.hyperglycemia_threshold,
            total_alerts: alerts.len(),
        },
        meal_averages: MealAverages {
            fasting: context_mean(readings, &MealContext::Fasting),
            post_prandial: context_mean(readings, &MealContext::PostPrandial),
            before_sleep: context_mean(readings, &MealContext::BeforeSleep),
        },
        alerts,
        statistics: SummaryStatistics {
            max_glucose,
            affected_patients,
        },
    }
}

pub fn classify_severity(glucose_level: f64, config: &SummaryConfig) -> Severity {
    if glucose_level >= config.high_severity_threshold {
        Severity::High
    } else {
        Severity::Moderate
    }
}

fn context_mean(readings: &[Reading], context: &MealContext) -> f64 {
    let values: Vec<f64> = readings.iter()
        .filter(|r| &r.meal_context == context)
        .map(|r| r.glucose_level)
        .collect();

    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn reading(patient: &str, glucose: f64, context: MealContext) -> Reading {
        Reading {
            timestamp: "2026-01-01 00:00:00".to_string(),
            patient_id: patient.to_string(),
            glucose_level: glucose,
            meal_context: context,
        }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 21).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_build_summary() {
        let readings = vec![
            reading("P001", 100.0, MealContext::Fasting),
            reading("P002", 150.0, MealContext::Fasting),
            reading("P001", 185.0, MealContext::PostPrandial),
            reading("P002", 140.0, MealContext::PostPrandial),
            reading("P002", 160.0, MealContext::PostPrandial),
        ];

        let payload = build_summary(&readings, &SummaryConfig::default(), generated_at());

        assert_eq!(payload.metadata.generated_at, "2026-01-21T12:00:00");
        assert_eq!(payload.metadata.total_alerts, 3);
        // 140 is not above the threshold
        let levels: Vec<f64> = payload.alerts.iter().map(|a| a.glucose_level).collect();
        assert_eq!(levels, vec![150.0, 185.0, 160.0]);
        assert_eq!(payload.alerts[1].severity, Severity::High);
        assert_eq!(payload.alerts[0].severity, Severity::Moderate);

        assert_relative_eq!(payload.meal_averages.fasting, 125.0, epsilon = 1e-9);
        assert_relative_eq!(payload.meal_averages.post_prandial, 485.0 / 3.0, epsilon = 1e-9);
        assert_eq!(payload.meal_averages.before_sleep, 0.0);

        assert_eq!(payload.statistics.max_glucose, 185.0);
        assert_eq!(payload.statistics.affected_patients, 2);
        assert!(payload.check_consistency());
    }

    #[test]
    fn test_no_alerts() {
        let readings = vec![reading("P001", 90.0, MealContext::BeforeSleep)];
        let payload = build_summary(&readings, &SummaryConfig::default(), generated_at());

        assert!(payload.alerts.is_empty());
        assert_eq!(payload.statistics.max_glucose, 0.0);
        assert_eq!(payload.statistics.affected_patients, 0);
        assert_eq!(payload.meal_averages.before_sleep, 90.0);
    }
}
