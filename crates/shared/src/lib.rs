//! Shared types, errors, and configuration for Lexbudget.
//!
//! This crate provides common building blocks used across all other crates:
//! - Currency rounding for amounts held as `Decimal`
//! - Presentation formatting for amounts, percentages and counts
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod format;
pub mod types;

pub use config::{AppConfig, StatisticsConfig};
pub use error::AppError;
pub use format::ValueKind;
