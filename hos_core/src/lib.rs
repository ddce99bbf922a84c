#![forbid(unsafe_code)]

//! Core domain model and business logic for the HOS trip planner.
//!
//! This crate provides:
//! - Regulatory rule set and configuration
//! - Timeline types (route stops, duty-status log segments)
//! - Hours-of-service simulation engine
//! - Daily log aggregation
//! - Trip planning and export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod engine;
pub mod aggregate;
pub mod plan;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, HosRules};
pub use engine::{simulate_trip, HosEngine};
pub use aggregate::{daily_logs, daily_totals};
pub use plan::{plan_trip, PlannedStop, TripPlan, TripRequest, TripSummary};
pub use export::{write_log_csv, write_plan_json};
