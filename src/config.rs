use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub filter_store: PathBuf,
    pub export_dir: PathBuf,
    pub trend: TrendConfig,
    pub summary: SummaryConfig,
    pub generator: GeneratorConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::File {
                path: PathBuf::from("resumen_glucosa.json"),
            },
            filter_store: PathBuf::from(".glucose_dashboard/filters.json"),
            export_dir: PathBuf::from("."),
            trend: TrendConfig::default(),
            summary: SummaryConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

/// Where the summary payload is fetched from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    File { path: PathBuf },
    Http { url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrendConfig {
    pub min_alerts: usize,     // below this count the trend is stable
    pub window_fraction: f64,  // share of alerts in each comparison window
    pub threshold: f64,        // mg/dL difference between window means
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            min_alerts: 10,
            window_fraction: 0.2,
            threshold: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummaryConfig {
    pub hyperglycemia_threshold: f64,
    pub high_severity_threshold: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            hyperglycemia_threshold: 140.0,
            high_severity_threshold: 180.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub records: usize,
    pub start: NaiveDateTime,
    pub interval_minutes: i64,
    pub patients: Vec<String>,
    pub glucose_mean: f64,
    pub glucose_sd: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            records: 1000,
            start: NaiveDate::from_ymd_opt(2026, 1, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            interval_minutes: 30,
            patients: vec!["P001".to_string(), "P002".to_string(), "P003".to_string()],
            glucose_mean: 110.0,
            glucose_sd: 25.0,
        }
    }
}

impl DashboardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DashboardConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if let SourceConfig::Http { url } = &self.source {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(DashboardError::InvalidConfig(
                    format!("Source URL must use http or https: {}", url)
                ));
            }
        }

        self.trend.validate()?;
        self.summary.validate()?;
        self.generator.validate()?;

        Ok(())
    }
}

impl TrendConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        if self.min_alerts == 0 {
            return Err(DashboardError::InvalidConfig(
                "Trend min_alerts must be at least 1".to_string()
            ));
        }

        if !(self.window_fraction > 0.0 && self.window_fraction < 0.5) {
            return Err(DashboardError::InvalidConfig(
                "Trend window_fraction must lie strictly between 0 and 0.5".to_string()
            ));
        }

        if self.threshold < 0.0 {
            return Err(DashboardError::InvalidConfig(
                "Trend threshold must not be negative".to_string()
            ));
        }

        Ok(())
    }
}

impl SummaryConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        if self.hyperglycemia_threshold <= 0.0 {
            return Err(DashboardError::InvalidConfig(
                "Hyperglycemia threshold must be positive".to_string()
            ));
        }

        if self.high_severity_threshold < self.hyperglycemia_threshold {
            return Err(DashboardError::InvalidConfig(
                "High severity threshold must not be below the hyperglycemia threshold".to_string()
            ));
        }

        Ok(())
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        if self.patients.is_empty() {
            return Err(DashboardError::InvalidConfig(
                "At least one patient identifier must be specified".to_string()
            ));
        }

        if self.interval_minutes <= 0 {
            return Err(DashboardError::InvalidConfig(
                "Reading interval must be positive".to_string()
            ));
        }

        if self.glucose_sd < 0.0 {
            return Err(DashboardError::InvalidConfig(
                "Glucose standard deviation must not be negative".to_string()
            ));
        }

        Ok(())
    }
}
