//! Record source seam.
//!
//! The engine never touches storage. A `RecordSource` hands it a snapshot of
//! one year's payments, the year's annual budget and the budget-line master
//! data; the database crate provides the production implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Datelike;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{BudgetLine, PaymentRecord};

/// Failure reported by a record source.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SourceError(pub String);

impl SourceError {
    /// Wraps any displayable error.
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self(message.to_string())
    }
}

/// Supplier of the records the statistics are computed from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// All payment records dated in `year`.
    async fn fetch_payment_records(&self, year: i32) -> Result<Vec<PaymentRecord>, SourceError>;

    /// The annual budget for `year`, if one is configured.
    async fn fetch_annual_budget(&self, year: i32) -> Result<Option<Decimal>, SourceError>;

    /// Budget-line master data, sorted by `ordre`.
    async fn fetch_budget_line_order(&self) -> Result<Vec<BudgetLine>, SourceError>;
}

/// A fixed, in-memory snapshot.
///
/// Used by tests and by callers that already hold the records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    records: Vec<PaymentRecord>,
    budgets: HashMap<i32, Decimal>,
    budget_lines: Vec<BudgetLine>,
    failure: Option<String>,
}

impl InMemoryRecordSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds payment records.
    #[must_use]
    pub fn with_records(mut self, records: impl IntoIterator<Item = PaymentRecord>) -> Self {
        self.records.extend(records);
        self
    }

    /// Sets the annual budget of `year`.
    #[must_use]
    pub fn with_budget(mut self, year: i32, amount: Decimal) -> Self {
        self.budgets.insert(year, amount);
        self
    }

    /// Sets the budget-line master data.
    #[must_use]
    pub fn with_budget_lines(mut self, budget_lines: Vec<BudgetLine>) -> Self {
        self.budget_lines = budget_lines;
        self
    }

    /// Makes every fetch fail with `message`.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    fn check(&self) -> Result<(), SourceError> {
        match &self.failure {
            Some(message) => Err(SourceError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn fetch_payment_records(&self, year: i32) -> Result<Vec<PaymentRecord>, SourceError> {
        self.check()?;
        Ok(self
            .records
            .iter()
            .filter(|r| r.date.year() == year)
            .cloned()
            .collect())
    }

    async fn fetch_annual_budget(&self, year: i32) -> Result<Option<Decimal>, SourceError> {
        self.check()?;
        Ok(self.budgets.get(&year).copied())
    }

    async fn fetch_budget_line_order(&self) -> Result<Vec<BudgetLine>, SourceError> {
        self.check()?;
        let mut lines = self.budget_lines.clone();
        lines.sort_by_key(|line| line.ordre);
        Ok(lines)
    }
}
