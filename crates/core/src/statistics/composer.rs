//! Report composition.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Dimension;
use super::types::{CategoryRow, MonthlyAggregate, MonthlyBreakdown};

/// Monthly budget report for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// Requested year.
    pub year: i32,
    /// Annual budget, if configured.
    pub annual_budget: Option<Decimal>,
    /// January through December.
    pub months: Vec<MonthlyAggregate>,
    /// Grand total.
    pub total: MonthlyAggregate,
}

/// Category breakdown along one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReport {
    /// Grouping dimension.
    pub dimension: Dimension,
    /// Annual budget, if configured.
    pub annual_budget: Option<Decimal>,
    /// Category rows, terminated by the total row.
    pub rows: Vec<CategoryRow>,
}

/// Full statistics report: monthly table plus one breakdown per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Requested year.
    pub year: i32,
    /// Annual budget, if configured.
    pub annual_budget: Option<Decimal>,
    /// Monthly table.
    pub monthly: MonthlyBreakdown,
    /// Category breakdowns, in the order they were requested.
    pub categories: Vec<CategoryReport>,
}

/// Assembles engine outputs into report structures. Does no arithmetic.
pub struct ReportComposer;

impl ReportComposer {
    /// Wraps a monthly breakdown with its year and budget.
    #[must_use]
    pub fn monthly_report(
        year: i32,
        annual_budget: Option<Decimal>,
        breakdown: MonthlyBreakdown,
    ) -> MonthlyReport {
        MonthlyReport {
            year,
            annual_budget,
            months: breakdown.months,
            total: breakdown.total,
        }
    }

    /// Wraps category rows with their dimension and budget.
    #[must_use]
    pub fn category_report(
        dimension: Dimension,
        annual_budget: Option<Decimal>,
        rows: Vec<CategoryRow>,
    ) -> CategoryReport {
        CategoryReport {
            dimension,
            annual_budget,
            rows,
        }
    }

    /// Merges the monthly table and the category breakdowns.
    #[must_use]
    pub fn compose(
        year: i32,
        annual_budget: Option<Decimal>,
        monthly: MonthlyBreakdown,
        categories: Vec<(Dimension, Vec<CategoryRow>)>,
    ) -> Report {
        Report {
            year,
            annual_budget,
            monthly,
            categories: categories
                .into_iter()
                .map(|(dimension, rows)| Self::category_report(dimension, annual_budget, rows))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::category::CategoryBreakdownBuilder;
    use crate::statistics::monthly::MonthlyAggregator;
    use crate::statistics::ratio::RatioCalculator;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compose_attaches_year_and_budget() {
        let series = MonthlyAggregator::aggregate(2024, &[]).unwrap();
        let monthly = RatioCalculator::apply(&series, Some(dec!(500))).unwrap();
        let payer_rows = CategoryBreakdownBuilder::new(Dimension::Payer)
            .build(&[])
            .unwrap();
        let line_rows = CategoryBreakdownBuilder::new(Dimension::BudgetLine)
            .build(&[])
            .unwrap();

        let report = ReportComposer::compose(
            2024,
            Some(dec!(500)),
            monthly.clone(),
            vec![
                (Dimension::Payer, payer_rows),
                (Dimension::BudgetLine, line_rows),
            ],
        );

        assert_eq!(report.year, 2024);
        assert_eq!(report.annual_budget, Some(dec!(500)));
        assert_eq!(report.monthly, monthly);
        assert_eq!(report.categories.len(), 2);
        assert_eq!(report.categories[0].dimension, Dimension::Payer);
        assert_eq!(report.categories[1].dimension, Dimension::BudgetLine);
        assert_eq!(report.categories[1].annual_budget, Some(dec!(500)));
    }

    #[test]
    fn test_monthly_report_keeps_twelve_months() {
        let series = MonthlyAggregator::aggregate(2024, &[]).unwrap();
        let breakdown = RatioCalculator::apply(&series, None).unwrap();

        let report = ReportComposer::monthly_report(2024, None, breakdown);

        assert_eq!(report.months.len(), 12);
        assert_eq!(report.annual_budget, None);
        assert_eq!(report.total.label, "Total");
    }
}
