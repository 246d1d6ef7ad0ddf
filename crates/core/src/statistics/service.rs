//! Request-level statistics service.
//!
//! Fetches one snapshot from the record source per call, runs the pure
//! pipeline over it and returns a complete report or an error. Nothing is
//! cached between calls.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use lexbudget_shared::StatisticsConfig;
use rust_decimal::Decimal;

use super::category::{CategoryBreakdownBuilder, Dimension, OrderingStrategy};
use super::composer::{CategoryReport, MonthlyReport, Report, ReportComposer};
use super::error::StatisticsError;
use super::monthly::MonthlyAggregator;
use super::ratio::RatioCalculator;
use super::source::{RecordSource, SourceError};
use super::types::{BudgetLine, CategoryRow, MonthlyBreakdown, PaymentRecord};
use super::year::YearRange;

impl From<SourceError> for StatisticsError {
    fn from(err: SourceError) -> Self {
        Self::UpstreamFetchFailure(err.0)
    }
}

/// Options for category breakdowns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryOptions {
    /// Include payment count and average per category.
    pub with_secondary_stats: bool,
}

/// Everything fetched for one request.
struct Snapshot {
    records: Vec<PaymentRecord>,
    annual_budget: Option<Decimal>,
    budget_lines: Vec<BudgetLine>,
}

/// Computes budget statistics over a record source.
#[derive(Clone)]
pub struct StatisticsService {
    source: Arc<dyn RecordSource>,
    config: StatisticsConfig,
    emphasized: HashSet<String>,
}

impl StatisticsService {
    /// Creates a service reading from `source`.
    #[must_use]
    pub fn new(source: Arc<dyn RecordSource>, config: StatisticsConfig) -> Self {
        let emphasized = config.emphasized_categories.iter().cloned().collect();
        Self {
            source,
            config,
            emphasized,
        }
    }

    /// Accepted years relative to `today`.
    #[must_use]
    pub fn year_range_at(&self, today: NaiveDate) -> YearRange {
        YearRange::from_config(&self.config, today)
    }

    /// Accepted years relative to the current date.
    #[must_use]
    pub fn year_range(&self) -> YearRange {
        self.year_range_at(Utc::now().date_naive())
    }

    /// Resolves a requested year; `None` means the current calendar year.
    ///
    /// # Errors
    ///
    /// Returns `InvalidYear` for non-numeric or out-of-range input.
    pub fn resolve_year(&self, raw: Option<&str>) -> Result<i32, StatisticsError> {
        self.resolve_year_at(raw, Utc::now().date_naive())
    }

    /// Resolves a requested year as of `today`.
    ///
    /// The default year and the accepted range are both taken from `today`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidYear` for non-numeric or out-of-range input.
    pub fn resolve_year_at(&self, raw: Option<&str>, today: NaiveDate) -> Result<i32, StatisticsError> {
        let range = self.year_range_at(today);
        match raw {
            Some(raw) => range.parse(raw),
            None => range.check(today.year()),
        }
    }

    /// Monthly gross, cumulative, percentage and forecast figures for `year`.
    ///
    /// # Errors
    ///
    /// `InvalidYear` before anything is fetched; `UpstreamFetchFailure` if
    /// the source fails; `InvalidAmount` or `RecordOutsideYear` if a record
    /// cannot be aggregated.
    pub async fn compute_monthly_report(&self, year: i32) -> Result<MonthlyReport, StatisticsError> {
        let year = self.year_range().check(year)?;
        let snapshot = self.snapshot(year, false).await?;
        let breakdown = Self::monthly(year, &snapshot)?;
        Ok(ReportComposer::monthly_report(
            year,
            snapshot.annual_budget,
            breakdown,
        ))
    }

    /// Category breakdown of `year` along `dimension`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::compute_monthly_report`].
    pub async fn compute_category_report(
        &self,
        year: i32,
        dimension: Dimension,
        options: CategoryOptions,
    ) -> Result<CategoryReport, StatisticsError> {
        let year = self.year_range().check(year)?;
        let needs_lines = dimension.spec().ordering == OrderingStrategy::ExplicitSequence;
        let snapshot = self.snapshot(year, needs_lines).await?;
        let rows = self.categories(year, dimension, options, &snapshot)?;
        Ok(ReportComposer::category_report(
            dimension,
            snapshot.annual_budget,
            rows,
        ))
    }

    /// Monthly table plus one breakdown per requested dimension, all from a
    /// single snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`Self::compute_monthly_report`].
    pub async fn compute_report(
        &self,
        year: i32,
        dimensions: &[Dimension],
        options: CategoryOptions,
    ) -> Result<Report, StatisticsError> {
        let year = self.year_range().check(year)?;
        let needs_lines = dimensions
            .iter()
            .any(|d| d.spec().ordering == OrderingStrategy::ExplicitSequence);
        let snapshot = self.snapshot(year, needs_lines).await?;

        let monthly = Self::monthly(year, &snapshot)?;
        let categories = dimensions
            .iter()
            .map(|&dimension| {
                self.categories(year, dimension, options, &snapshot)
                    .map(|rows| (dimension, rows))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReportComposer::compose(
            year,
            snapshot.annual_budget,
            monthly,
            categories,
        ))
    }

    async fn snapshot(&self, year: i32, with_lines: bool) -> Result<Snapshot, StatisticsError> {
        let records = self.source.fetch_payment_records(year).await?;
        let annual_budget = self.source.fetch_annual_budget(year).await?;
        let budget_lines = if with_lines {
            self.source.fetch_budget_line_order().await?
        } else {
            Vec::new()
        };
        Ok(Snapshot {
            records,
            annual_budget,
            budget_lines,
        })
    }

    fn monthly(year: i32, snapshot: &Snapshot) -> Result<MonthlyBreakdown, StatisticsError> {
        let series = MonthlyAggregator::aggregate(year, &snapshot.records)?;
        RatioCalculator::apply(&series, snapshot.annual_budget)
    }

    fn categories(
        &self,
        year: i32,
        dimension: Dimension,
        options: CategoryOptions,
        snapshot: &Snapshot,
    ) -> Result<Vec<CategoryRow>, StatisticsError> {
        for record in &snapshot.records {
            record.validate_for(year)?;
        }
        CategoryBreakdownBuilder::new(dimension)
            .annual_budget(snapshot.annual_budget)
            .budget_lines(&snapshot.budget_lines)
            .emphasized(&self.emphasized)
            .with_secondary_stats(options.with_secondary_stats)
            .build(&snapshot.records)
    }
}
