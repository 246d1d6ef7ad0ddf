//! Presentation formatting for statistics figures.
//!
//! The statistics engine only ever returns raw `Decimal` values. Every
//! reporting panel that needs human-readable text goes through this module,
//! so amounts and percentages are rendered the same way everywhere.
//!
//! Output follows French conventions with plain spaces as group separators:
//! `3 300,00 €`, `3,0 %`, `1 234`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::round_currency;

/// How a statistic row is meant to be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// A euro amount.
    Currency,
    /// A euro amount followed by its share of the annual budget.
    CurrencyWithPercentage,
    /// A plain count.
    Number,
}

/// Formats a euro amount, e.g. `-1 234,50 €`.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}{},{fraction} €", sign(rounded), group_thousands(integer))
}

/// Formats a percentage with one decimal, e.g. `3,0 %`.
#[must_use]
pub fn format_percentage(percentage: Decimal) -> String {
    let rounded = percentage.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.1}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "0"));
    format!("{}{},{fraction} %", sign(rounded), group_thousands(integer))
}

/// Formats a count with thousands grouping, e.g. `1 234`.
#[must_use]
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Formats a value according to its display kind.
///
/// `Number` values are rounded to an integer first; `percentage` is only
/// used by `CurrencyWithPercentage`.
#[must_use]
pub fn format_value(kind: ValueKind, amount: Decimal, percentage: Decimal) -> String {
    match kind {
        ValueKind::Currency => format_currency(amount),
        ValueKind::CurrencyWithPercentage => {
            format!(
                "{} ({})",
                format_currency(amount),
                format_percentage(percentage)
            )
        }
        ValueKind::Number => {
            let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            format!("{}{}", sign(rounded), group_thousands(&rounded.abs().to_string()))
        }
    }
}

fn sign(value: Decimal) -> &'static str {
    if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}
