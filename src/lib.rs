pub mod aggregation;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod models;
pub mod output;
pub mod persistence;
pub mod simulation;
pub mod sorting;
pub mod source;

pub use crate::error::{DashboardError, DashboardResult};
