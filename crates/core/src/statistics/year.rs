//! Report year validation.

use chrono::{Datelike, NaiveDate};
use lexbudget_shared::StatisticsConfig;

use super::error::StatisticsError;

/// Inclusive range of years a report may be computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    /// Earliest accepted year.
    pub min: i32,
    /// Latest accepted year.
    pub max: i32,
}

impl YearRange {
    /// Builds the range from configuration, relative to `today`.
    ///
    /// The upper bound is `today`'s year plus `max_years_ahead`.
    #[must_use]
    pub fn from_config(config: &StatisticsConfig, today: NaiveDate) -> Self {
        Self {
            min: config.founding_year,
            max: today.year().saturating_add(config.max_years_ahead),
        }
    }

    /// Checks a numeric year.
    ///
    /// # Errors
    ///
    /// Returns `InvalidYear` when `year` is outside the range.
    pub fn check(&self, year: i32) -> Result<i32, StatisticsError> {
        if (self.min..=self.max).contains(&year) {
            Ok(year)
        } else {
            Err(StatisticsError::InvalidYear(format!(
                "{year} is outside {}..={}",
                self.min, self.max
            )))
        }
    }

    /// Parses and checks a year received as text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidYear` when `raw` is not an integer or is out of range.
    pub fn parse(&self, raw: &str) -> Result<i32, StatisticsError> {
        let year = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| StatisticsError::InvalidYear(format!("'{raw}' is not a year")))?;
        self.check(year)
    }
}
