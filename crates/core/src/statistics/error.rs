//! Statistics error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while computing budget statistics.
#[derive(Debug, Error)]
pub enum StatisticsError {
    /// Requested year is not a number or lies outside the accepted range.
    #[error("Invalid year: {0}")]
    InvalidYear(String),

    /// An amount is negative or otherwise unusable.
    #[error("Invalid amount {amount} for {context}")]
    InvalidAmount {
        /// What carried the amount (a record, a month, the annual budget).
        context: String,
        /// The offending amount.
        amount: Decimal,
    },

    /// The record source returned a record dated outside the requested year.
    #[error("Payment record {record_id} dated {date} is outside year {year}")]
    RecordOutsideYear {
        /// Record ID.
        record_id: Uuid,
        /// Record date.
        date: NaiveDate,
        /// Requested year.
        year: i32,
    },

    /// The record source or budget store failed.
    #[error("Upstream fetch failure: {0}")]
    UpstreamFetchFailure(String),
}

impl StatisticsError {
    /// An `InvalidAmount` for a figure whose computation overflowed.
    pub(crate) fn overflow(context: impl std::fmt::Display, amount: Decimal) -> Self {
        Self::InvalidAmount {
            context: format!("{context} (arithmetic overflow)"),
            amount,
        }
    }
}
