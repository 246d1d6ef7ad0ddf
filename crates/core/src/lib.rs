//! Core business logic for Lexbudget.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `statistics` - Monthly budget series, forecasts and category breakdowns

pub mod statistics;
