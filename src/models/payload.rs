use super::{Alert, MealContext};
use serde::{Deserialize, Serialize};
use log::warn;

/// Pre-aggregated summary document consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub metadata: Metadata,
    #[serde(rename = "promedios_por_comida")]
    pub meal_averages: MealAverages,
    #[serde(rename = "alertas_hiperglucemia")]
    pub alerts: Vec<Alert>,
    #[serde(rename = "estadisticas")]
    pub statistics: SummaryStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "fecha_generacion")]
    pub generated_at: String,
    #[serde(rename = "umbral_hiperglucemia")]
    pub threshold: f64,
    #[serde(rename = "total_alertas")]
    pub total_alerts: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealAverages {
    #[serde(rename = "Fasting")]
    pub fasting: f64,
    #[serde(rename = "Post-prandial")]
    pub post_prandial: f64,
    #[serde(rename = "Before sleep")]
    pub before_sleep: f64,
}

impl MealAverages {
    pub fn get(&self, context: &MealContext) -> Option<f64> {
        match context {
            MealContext::Fasting => Some(self.fasting),
            MealContext::PostPrandial => Some(self.post_prandial),
            MealContext::BeforeSleep => Some(self.before_sleep),
            MealContext::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    #[serde(rename = "glucosa_maxima")]
    pub max_glucose: f64,
    #[serde(rename = "pacientes_afectados")]
    pub affected_patients: usize,
}

impl SummaryPayload {
    /// Warn about metadata that disagrees with the alert list. Never fatal.
    pub fn check_consistency(&self) -> bool {
        let mut consistent = true;

        if self.metadata.total_alerts != self.alerts.len() {
            warn!(
                "Payload declares {} alerts but contains {}",
                self.metadata.total_alerts,
                self.alerts.len()
            );
            consistent = false;
        }

        let unknown = self.alerts.iter()
            .filter(|alert| !alert.meal_context.is_known())
            .count();
        if unknown > 0 {
            warn!("{} alerts carry an unrecognized meal context", unknown);
            consistent = false;
        }

        consistent
    }
}
