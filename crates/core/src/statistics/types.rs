//! Statistics data types.
//!
//! Every type here is request-scoped: built from a record snapshot, turned
//! into a response and dropped. Nothing is persisted.

use chrono::{Datelike, NaiveDate};
use lexbudget_shared::ValueKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StatisticsError;

/// Paying authority (SGAMI) that settled a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerRef {
    /// Payer ID.
    pub id: Uuid,
    /// Payer display name.
    pub label: String,
}

/// Budget nomenclature line (PCE) a payment is charged to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLineRef {
    /// Nomenclature code.
    pub code: String,
    /// Display label.
    pub label: String,
}

/// A settled payment or budget engagement against a dossier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Record ID.
    pub id: Uuid,
    /// Dossier the payment belongs to.
    pub dossier_id: Uuid,
    /// Pre-tax amount.
    pub amount: Decimal,
    /// Payment date; month and year are derived from it.
    pub date: NaiveDate,
    /// Paying authority.
    pub payer: PayerRef,
    /// Budget line.
    pub budget_line: BudgetLineRef,
}

impl PaymentRecord {
    /// Month number, 1 through 12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Checks that the record can be aggregated into `year`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a negative amount and `RecordOutsideYear`
    /// when the record is not dated in `year`.
    pub fn validate_for(&self, year: i32) -> Result<(), StatisticsError> {
        if self.amount < Decimal::ZERO {
            return Err(StatisticsError::InvalidAmount {
                context: format!("payment record {}", self.id),
                amount: self.amount,
            });
        }
        if self.date.year() != year {
            return Err(StatisticsError::RecordOutsideYear {
                record_id: self.id,
                date: self.date,
                year,
            });
        }
        Ok(())
    }
}

/// Budget-line master data entry with its configured display rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    /// Nomenclature code.
    pub code: String,
    /// Display label.
    pub label: String,
    /// Display sequence number.
    pub ordre: i32,
}

/// Gross and running totals for one month, before ratios are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// Month number (1-12).
    pub month: u32,
    /// Sum of amounts dated in this month.
    pub gross_amount: Decimal,
    /// Sum of amounts from January through this month.
    pub cumulative_amount: Decimal,
}

/// Twelve monthly buckets for one year, plus the year's grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySeries {
    /// Requested year.
    pub year: i32,
    /// January through December, in order.
    pub months: [MonthlyTotals; 12],
    /// Grand total. Its `month` is 0.
    pub total: MonthlyTotals,
}

/// Which line of the monthly table an aggregate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "month", rename_all = "snake_case")]
pub enum MonthSlot {
    /// A calendar month (1-12).
    Month(u32),
    /// The synthesized grand-total line.
    Total,
}

const MONTH_LABELS: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

impl MonthSlot {
    /// French display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Month(m) => m
                .checked_sub(1)
                .and_then(|i| MONTH_LABELS.get(i as usize))
                .copied()
                .unwrap_or("?"),
            Self::Total => "Total",
        }
    }
}

/// One line of the monthly budget table with ratios and forecasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// Month or total.
    pub slot: MonthSlot,
    /// Display label.
    pub label: String,
    /// Gross amount for the month.
    pub gross_amount: Decimal,
    /// Running total through the month.
    pub cumulative_amount: Decimal,
    /// Gross amount as a percentage of the annual budget.
    pub gross_percentage: Decimal,
    /// Cumulative amount as a percentage of the annual budget.
    pub cumulative_percentage: Decimal,
    /// Cumulative amount with a 10% margin.
    pub forecast_10: Decimal,
    /// Cumulative amount with a 20% margin.
    pub forecast_20: Decimal,
    /// `forecast_10` as a percentage of the annual budget.
    pub forecast_10_percentage: Decimal,
    /// `forecast_20` as a percentage of the annual budget.
    pub forecast_20_percentage: Decimal,
}

/// Monthly table: twelve months plus the total line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    /// January through December.
    pub months: Vec<MonthlyAggregate>,
    /// Grand total.
    pub total: MonthlyAggregate,
}

/// Optional per-category statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryStats {
    /// Number of payments in the category.
    pub payment_count: u64,
    /// Average payment, rounded to cents. Zero when there are no payments.
    pub average_amount: Decimal,
}

/// Aggregated figures for one category (or for the total).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    /// Grouping key (payer ID, budget-line code).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Sum of amounts.
    pub amount: Decimal,
    /// Share of the annual budget.
    pub percentage: Decimal,
    /// Display kind.
    pub kind: ValueKind,
    /// Render in bold.
    pub emphasis: bool,
    /// Count and average, when requested.
    pub secondary: Option<SecondaryStats>,
}

/// A row of a category breakdown.
///
/// The total is a distinct variant; nothing inspects labels to find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum CategoryRow {
    /// A regular category.
    Category(CategoryAggregate),
    /// The synthesized total, always last.
    Total(CategoryAggregate),
}

impl CategoryRow {
    /// The aggregate carried by either variant.
    #[must_use]
    pub const fn aggregate(&self) -> &CategoryAggregate {
        match self {
            Self::Category(a) | Self::Total(a) => a,
        }
    }

    /// Whether this is the total row.
    #[must_use]
    pub const fn is_total(&self) -> bool {
        matches!(self, Self::Total(_))
    }
}
