use crate::models::{Alert, MealContext};
use serde::{Deserialize, Serialize};
use log::debug;

/// Alert count per meal context. All three contexts are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextCounts {
    #[serde(rename = "Fasting")]
    pub fasting: usize,
    #[serde(rename = "Post-prandial")]
    pub post_prandial: usize,
    #[serde(rename = "Before sleep")]
    pub before_sleep: usize,
}

impl ContextCounts {
    pub fn get(&self, context: &MealContext) -> usize {
        match context {
            MealContext::Fasting => self.fasting,
            MealContext::PostPrandial => self.post_prandial,
            MealContext::BeforeSleep => self.before_sleep,
            MealContext::Other(_) => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.fasting + self.post_prandial + self.before_sleep
    }

    pub fn iter(&self) -> impl Iterator<Item = (MealContext, usize)> + '_ {
        MealContext::ALL.into_iter().map(move |context| {
            let count = self.get(&context);
            (context, count)
        })
    }
}

/// Count alerts per known meal context; unrecognized contexts are skipped.
pub fn context_counts(alerts: &[Alert]) -> ContextCounts {
    let mut counts = ContextCounts::default();
    let mut skipped = 0;

    for alert in alerts {
        match alert.meal_context {
            MealContext::Fasting => counts.fasting += 1,
            MealContext::PostPrandial => counts.post_prandial += 1,
            MealContext::BeforeSleep => counts.before_sleep += 1,
            MealContext::Other(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} alerts with unrecognized meal context", skipped);
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn alert(context: MealContext) -> Alert {
        Alert {
            timestamp: "2026-01-01 00:00:00".to_string(),
            patient_id: "P001".to_string(),
            glucose_level: 160.0,
            meal_context: context,
            severity: Severity::Moderate,
        }
    }

    #[test]
    fn test_counts_sum_to_input_length() {
        let alerts = vec![
            alert(MealContext::Fasting),
            alert(MealContext::PostPrandial),
            alert(MealContext::PostPrandial),
            alert(MealContext::BeforeSleep),
        ];

        let counts = context_counts(&alerts);
        assert_eq!(counts.fasting, 1);
        assert_eq!(counts.post_prandial, 2);
        assert_eq!(counts.before_sleep, 1);
        assert_eq!(counts.total(), alerts.len());
    }

    #[test]
    fn test_missing_contexts_are_zero_filled() {
        let counts = context_counts(&[alert(MealContext::Fasting)]);
        let entries: Vec<(MealContext, usize)> = counts.iter().collect();
        assert_eq!(entries, vec![
            (MealContext::Fasting, 1),
            (MealContext::PostPrandial, 0),
            (MealContext::BeforeSleep, 0),
        ]);

        let json = serde_json::to_value(&counts).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_unrecognized_context_is_dropped() {
        let alerts = vec![
            alert(MealContext::Other("Brunch".to_string())),
            alert(MealContext::Fasting),
        ];
        let counts = context_counts(&alerts);
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.get(&MealContext::Other("Brunch".to_string())), 0);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        assert_eq!(context_counts(&[]), ContextCounts::default());
    }
}
