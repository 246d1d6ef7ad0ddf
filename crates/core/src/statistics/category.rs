//! Category breakdowns (by payer, by budget line).
//!
//! Each grouping dimension is described by one entry of [`DIMENSIONS`]: how
//! to read the key and label off a record and how the resulting categories
//! are ordered. Adding a dimension means adding an enum variant and a line
//! to that table.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use lexbudget_shared::ValueKind;
use lexbudget_shared::types::round_currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::StatisticsError;
use super::ratio::percentage;
use super::types::{BudgetLine, CategoryAggregate, CategoryRow, PaymentRecord, SecondaryStats};

/// Key of the synthesized total row.
pub const TOTAL_KEY: &str = "total";

/// Label of the synthesized total row.
pub const TOTAL_LABEL: &str = "Total";

/// Grouping dimension for a category breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    /// Paying authority (SGAMI).
    Payer,
    /// Budget nomenclature line (PCE).
    BudgetLine,
}

/// How the categories of a dimension are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingStrategy {
    /// Order of first appearance in the record set.
    InsertionOrder,
    /// The `ordre` carried by the budget-line master data. Unknown codes
    /// follow all known ones, in insertion order.
    ExplicitSequence,
}

/// Describes one grouping dimension.
pub struct DimensionSpec {
    /// The dimension described.
    pub dimension: Dimension,
    /// Grouping key of a record.
    pub key: fn(&PaymentRecord) -> String,
    /// Display label of a record's category.
    pub label: fn(&PaymentRecord) -> &str,
    /// Category ordering.
    pub ordering: OrderingStrategy,
}

/// Strategy table, one entry per dimension.
pub static DIMENSIONS: [DimensionSpec; 2] = [
    DimensionSpec {
        dimension: Dimension::Payer,
        key: payer_key,
        label: payer_label,
        ordering: OrderingStrategy::InsertionOrder,
    },
    DimensionSpec {
        dimension: Dimension::BudgetLine,
        key: budget_line_key,
        label: budget_line_label,
        ordering: OrderingStrategy::ExplicitSequence,
    },
];

fn payer_key(record: &PaymentRecord) -> String {
    record.payer.id.to_string()
}

fn payer_label(record: &PaymentRecord) -> &str {
    &record.payer.label
}

fn budget_line_key(record: &PaymentRecord) -> String {
    record.budget_line.code.clone()
}

fn budget_line_label(record: &PaymentRecord) -> &str {
    &record.budget_line.label
}

impl Dimension {
    /// All dimensions, in report order.
    pub const ALL: [Self; 2] = [Self::Payer, Self::BudgetLine];

    /// The strategy table entry for this dimension.
    #[must_use]
    pub fn spec(self) -> &'static DimensionSpec {
        DIMENSIONS
            .iter()
            .find(|spec| spec.dimension == self)
            .unwrap_or(&DIMENSIONS[0])
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payer => "payer",
            Self::BudgetLine => "budgetLine",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payer" | "sgami" => Ok(Self::Payer),
            "budgetLine" | "budget_line" | "pce" => Ok(Self::BudgetLine),
            _ => Err(format!("Unknown dimension: {s}")),
        }
    }
}

/// Running figures for one category while grouping.
struct Group {
    key: String,
    label: String,
    amount: Decimal,
    count: u64,
}

/// Builds the category rows of one dimension.
#[derive(Debug, Clone)]
pub struct CategoryBreakdownBuilder<'a> {
    dimension: Dimension,
    annual_budget: Option<Decimal>,
    budget_lines: &'a [BudgetLine],
    emphasized: Option<&'a HashSet<String>>,
    with_secondary_stats: bool,
}

impl<'a> CategoryBreakdownBuilder<'a> {
    /// Creates a builder for `dimension` with no budget and no options.
    #[must_use]
    pub const fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            annual_budget: None,
            budget_lines: &[],
            emphasized: None,
            with_secondary_stats: false,
        }
    }

    /// Sets the annual budget percentages are computed against.
    #[must_use]
    pub const fn annual_budget(mut self, annual_budget: Option<Decimal>) -> Self {
        self.annual_budget = annual_budget;
        self
    }

    /// Supplies budget-line master data for `ExplicitSequence` ordering.
    #[must_use]
    pub const fn budget_lines(mut self, budget_lines: &'a [BudgetLine]) -> Self {
        self.budget_lines = budget_lines;
        self
    }

    /// Category keys or labels to render in bold.
    #[must_use]
    pub const fn emphasized(mut self, emphasized: &'a HashSet<String>) -> Self {
        self.emphasized = Some(emphasized);
        self
    }

    /// Enables payment count and average per category.
    #[must_use]
    pub const fn with_secondary_stats(mut self, enabled: bool) -> Self {
        self.with_secondary_stats = enabled;
        self
    }

    /// Groups `records` and returns the category rows followed by one total row.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if a record or the budget is negative, or if a
    /// category sum or its share of the budget overflows.
    pub fn build(&self, records: &[PaymentRecord]) -> Result<Vec<CategoryRow>, StatisticsError> {
        if let Some(budget) = self.annual_budget
            && budget < Decimal::ZERO
        {
            return Err(StatisticsError::InvalidAmount {
                context: "annual budget".to_string(),
                amount: budget,
            });
        }

        let spec = self.dimension.spec();
        let mut groups: Vec<Group> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in records {
            if record.amount < Decimal::ZERO {
                return Err(StatisticsError::InvalidAmount {
                    context: format!("payment record {}", record.id),
                    amount: record.amount,
                });
            }
            let key = (spec.key)(record);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(Group {
                    key,
                    label: (spec.label)(record).to_string(),
                    amount: Decimal::ZERO,
                    count: 0,
                });
                groups.len() - 1
            });
            let group = &mut groups[slot];
            group.amount = group
                .amount
                .checked_add(record.amount)
                .ok_or_else(|| StatisticsError::overflow(&group.label, record.amount))?;
            group.count += 1;
        }

        self.order(spec.ordering, &mut groups);

        let total_amount = groups.iter().try_fold(Decimal::ZERO, |acc, g| {
            acc.checked_add(g.amount)
                .ok_or_else(|| StatisticsError::overflow(TOTAL_LABEL, g.amount))
        })?;
        let total_count: u64 = groups.iter().map(|g| g.count).sum();

        let mut rows: Vec<CategoryRow> = groups
            .into_iter()
            .map(|g| {
                let emphasis = self.is_emphasized(&g.key, &g.label);
                self.aggregate(g.key, g.label, g.amount, g.count, emphasis)
                    .map(CategoryRow::Category)
            })
            .collect::<Result<_, _>>()?;

        rows.push(CategoryRow::Total(self.aggregate(
            TOTAL_KEY.to_string(),
            TOTAL_LABEL.to_string(),
            total_amount,
            total_count,
            true,
        )?));

        Ok(rows)
    }

    fn order(&self, strategy: OrderingStrategy, groups: &mut [Group]) {
        match strategy {
            OrderingStrategy::InsertionOrder => {}
            OrderingStrategy::ExplicitSequence => {
                let ranks: HashMap<&str, i32> = self
                    .budget_lines
                    .iter()
                    .map(|line| (line.code.as_str(), line.ordre))
                    .collect();
                // stable: equal ranks keep insertion order
                groups.sort_by_key(|g| match ranks.get(g.key.as_str()) {
                    Some(rank) => (false, *rank),
                    None => (true, 0),
                });
            }
        }
    }

    fn is_emphasized(&self, key: &str, label: &str) -> bool {
        self.emphasized
            .is_some_and(|set| set.contains(key) || set.contains(label))
    }

    fn aggregate(
        &self,
        key: String,
        label: String,
        amount: Decimal,
        count: u64,
        emphasis: bool,
    ) -> Result<CategoryAggregate, StatisticsError> {
        let kind = if self.annual_budget.is_some_and(|b| b > Decimal::ZERO) {
            ValueKind::CurrencyWithPercentage
        } else {
            ValueKind::Currency
        };

        let secondary = self.with_secondary_stats.then(|| SecondaryStats {
            payment_count: count,
            average_amount: average(amount, count),
        });

        let percentage = percentage(amount, self.annual_budget)?;

        Ok(CategoryAggregate {
            key,
            label,
            amount,
            percentage,
            kind,
            emphasis,
            secondary,
        })
    }
}

/// Average payment rounded to cents; zero when `count` is zero.
#[must_use]
pub fn average(amount: Decimal, count: u64) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    amount
        .checked_div(Decimal::from(count))
        .map_or(Decimal::ZERO, round_currency)
}
