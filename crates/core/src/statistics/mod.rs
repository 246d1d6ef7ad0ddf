//! Budgetary statistics aggregation and forecasting.
//!
//! Turns one year of payment records into:
//! - a monthly table (gross, cumulative, % of annual budget, +10%/+20% forecasts)
//! - category breakdowns by paying authority or by budget line
//! - a composed report merging both
//!
//! Every computation is a pure function of the fetched snapshot.

pub mod category;
pub mod composer;
pub mod error;
pub mod monthly;
pub mod ratio;
pub mod service;
pub mod source;
pub mod types;
pub mod year;


pub use category::{CategoryBreakdownBuilder, Dimension, DimensionSpec, OrderingStrategy};
pub use composer::{CategoryReport, MonthlyReport, Report, ReportComposer};
pub use error::StatisticsError;
pub use monthly::MonthlyAggregator;
pub use ratio::{RatioCalculator, forecast_10, forecast_20, percentage};
pub use service::{CategoryOptions, StatisticsService};
pub use source::{InMemoryRecordSource, RecordSource, SourceError};
pub use types::*;
pub use year::YearRange;
