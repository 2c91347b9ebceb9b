use crate::models::{Alert, MealContext};

/// Active dashboard filter. Every `None` field leaves that dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub patient: Option<String>,
    pub meal_context: Option<MealContext>,
    pub min_glucose: Option<f64>, // inclusive
    pub max_glucose: Option<f64>, // inclusive
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patient(mut self, patient: impl Into<String>) -> Self {
        self.patient = Some(patient.into());
        self
    }

    pub fn with_meal_context(mut self, context: MealContext) -> Self {
        self.meal_context = Some(context);
        self
    }

    pub fn with_glucose_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_glucose = min;
        self.max_glucose = max;
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.patient.is_none()
            && self.meal_context.is_none()
            && self.min_glucose.is_none()
            && self.max_glucose.is_none()
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        if let Some(patient) = &self.patient {
            if &alert.patient_id != patient {
                return false;
            }
        }
        if let Some(context) = &self.meal_context {
            if &alert.meal_context != context {
                return false;
            }
        }
        if let Some(min) = self.min_glucose {
            if alert.glucose_level < min {
                return false;
            }
        }
        if let Some(max) = self.max_glucose {
            if alert.glucose_level > max {
                return false;
            }
        }
        true
    }
}

/// Keep the alerts satisfying every active criterion, in input order.
pub fn filter_alerts(alerts: &[Alert], criteria: &FilterState) -> Vec<Alert> {
    alerts.iter()
        .filter(|alert| criteria.matches(alert))
        .cloned()
        .collect()
}
