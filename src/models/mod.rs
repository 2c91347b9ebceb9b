pub mod payload;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use payload::*;

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Relationship between a measurement and food intake.
///
/// Labels outside the three known contexts are kept verbatim in `Other` so a
/// payload with an unexpected value still loads; such alerts never land in a
/// context bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MealContext {
    Fasting,
    PostPrandial,
    BeforeSleep,
    Other(String),
}

impl MealContext {
    pub const ALL: [MealContext; 3] = [
        MealContext::Fasting,
        MealContext::PostPrandial,
        MealContext::BeforeSleep,
    ];

    pub fn label(&self) -> &str {
        match self {
            MealContext::Fasting => "Fasting",
            MealContext::PostPrandial => "Post-prandial",
            MealContext::BeforeSleep => "Before sleep",
            MealContext::Other(label) => label,
        }
    }

    /// Parse one of the three known labels; unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Fasting" => Some(MealContext::Fasting),
            "Post-prandial" => Some(MealContext::PostPrandial),
            "Before sleep" => Some(MealContext::BeforeSleep),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MealContext::Other(_))
    }
}

impl From<String> for MealContext {
    fn from(label: String) -> Self {
        MealContext::from_label(&label).unwrap_or(MealContext::Other(label))
    }
}

impl From<MealContext> for String {
    fn from(context: MealContext) -> Self {
        context.label().to_string()
    }
}

impl fmt::Display for MealContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clinical risk tier of an alert. Serialized with the payload's Spanish labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "Moderada", alias = "Moderate")]
    Moderate,
    #[serde(rename = "Alta", alias = "High")]
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Moderate => "Moderada",
            Severity::High => "Alta",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One detected hyperglycemia event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: String,
    pub patient_id: String,
    pub glucose_level: f64, // mg/dL
    pub meal_context: MealContext,
    #[serde(rename = "severidad", alias = "severity")]
    pub severity: Severity,
}

impl Alert {
    pub fn instant(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

/// Raw glucose measurement before threshold detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: String,
    pub patient_id: String,
    pub glucose_level: f64,
    pub meal_context: MealContext,
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}
