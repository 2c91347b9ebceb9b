use crate::aggregation::{classify_trend, context_counts, patient_roster, patient_stats, ContextCounts, PatientStats, Trend};
use crate::config::TrendConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::filter::{filter_alerts, FilterState};
use crate::models::{Alert, MealContext};
use crate::output::{export_alerts, FileSink};
use crate::persistence::{persist_filter, restore_filter, KeyValueStore};
use crate::sorting::{sort_alerts, SortOrder};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use log::{debug, info};

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub rows: Vec<Alert>,
    pub patient_stats: BTreeMap<String, PatientStats>,
    pub context_counts: ContextCounts,
    pub trend: Trend,
    pub roster: Vec<String>,
    pub max_glucose: Option<f64>,
    pub period: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl DashboardView {
    pub fn total_alerts(&self) -> usize {
        self.rows.len()
    }

    pub fn affected_patients(&self) -> usize {
        self.patient_stats.len()
    }
}

pub struct Dashboard<S: KeyValueStore> {
    alerts: Vec<Alert>,
    filter: FilterState,
    store: S,
    trend_config: TrendConfig,
}

impl<S: KeyValueStore> Dashboard<S> {
    pub fn new(alerts: Vec<Alert>, store: S, trend_config: TrendConfig) -> Self {
        let filter = restore_filter(&store);
        info!("Dashboard ready with {} alerts", alerts.len());

        Self {
            alerts,
            filter,
            store,
            trend_config,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_patient(&mut self, patient: Option<String>) -> DashboardResult<()> {
        self.filter.patient = patient;
        self.persist()
    }

    pub fn set_meal_context(&mut self, context: Option<MealContext>) -> DashboardResult<()> {
        self.filter.meal_context = context;
        self.persist()
    }

    pub fn set_glucose_range(&mut self, min: Option<f64>, max: Option<f64>) -> DashboardResult<()> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(DashboardError::Validation(
                    format!("Glucose range is empty: {} > {}", lo, hi)
                ));
            }
        }

        self.filter.min_glucose = min;
        self.filter.max_glucose = max;
        Ok(())
    }

    pub fn clear(&mut self) -> DashboardResult<()> {
        self.filter = FilterState::default();
        self.persist()
    }

    fn persist(&mut self) -> DashboardResult<()> {
        debug!("Persisting filter {:?}", self.filter);
        persist_filter(&mut self.store, &self.filter)
    }

    pub fn filtered_alerts(&self) -> Vec<Alert> {
        filter_alerts(&self.alerts, &self.filter)
    }

    /// Recompute every derived view from the alert list and current filter.
    pub fn view(&self, order: Option<SortOrder>) -> DashboardView {
        let filtered = self.filtered_alerts();

        let trend = classify_trend(&filtered, &self.trend_config);
        let patient_stats = patient_stats(&filtered);
        let context_counts = context_counts(&filtered);
        let max_glucose = filtered.iter()
            .map(|alert| alert.glucose_level)
            .fold(None, |acc: Option<f64>, level| Some(acc.map_or(level, |m| m.max(level))));
        let period = alert_period(&filtered);

        let rows = match order {
            Some(order) => sort_alerts(&filtered, order),
            None => filtered,
        };

        DashboardView {
            rows,
            patient_stats,
            context_counts,
            trend,
            roster: patient_roster(&self.alerts),
            max_glucose,
            period,
        }
    }

    /// Export the currently filtered alerts. Returns the delivered filename.
    pub fn export_csv<F: FileSink + ?Sized>(&self, sink: &mut F, today: NaiveDate) -> DashboardResult<String> {
        export_alerts(&self.filtered_alerts(), sink, today)
    }
}

fn alert_period(alerts: &[Alert]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut instants = alerts.iter().filter_map(Alert::instant);
    let first = instants.next()?;
    Some(instants.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
}
