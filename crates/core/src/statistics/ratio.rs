//! Budget ratios and year-end forecasts.

use rust_decimal::Decimal;

use super::error::StatisticsError;
use super::types::{MonthSlot, MonthlyAggregate, MonthlyBreakdown, MonthlySeries, MonthlyTotals};

/// Multiplier for the +10% forecast.
pub const FORECAST_10_MULTIPLIER: Decimal = Decimal::from_parts(110, 0, 0, false, 2);

/// Multiplier for the +20% forecast.
pub const FORECAST_20_MULTIPLIER: Decimal = Decimal::from_parts(120, 0, 0, false, 2);

/// Share of `budget` represented by `amount`, in percent.
///
/// Zero when there is no budget or the budget is not positive, so a missing
/// budget never yields NaN or a division error. No rounding is applied;
/// display rounding belongs to the formatter.
///
/// # Errors
///
/// Returns `InvalidAmount` if the ratio overflows.
pub fn percentage(amount: Decimal, budget: Option<Decimal>) -> Result<Decimal, StatisticsError> {
    match budget {
        Some(budget) if budget > Decimal::ZERO => amount
            .checked_div(budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| StatisticsError::overflow("percentage of annual budget", amount)),
        _ => Ok(Decimal::ZERO),
    }
}

/// Cumulative spend with a 10% margin.
///
/// # Errors
///
/// Returns `InvalidAmount` if the product overflows.
pub fn forecast_10(cumulative: Decimal) -> Result<Decimal, StatisticsError> {
    cumulative
        .checked_mul(FORECAST_10_MULTIPLIER)
        .ok_or_else(|| StatisticsError::overflow("forecast +10%", cumulative))
}

/// Cumulative spend with a 20% margin.
///
/// # Errors
///
/// Returns `InvalidAmount` if the product overflows.
pub fn forecast_20(cumulative: Decimal) -> Result<Decimal, StatisticsError> {
    cumulative
        .checked_mul(FORECAST_20_MULTIPLIER)
        .ok_or_else(|| StatisticsError::overflow("forecast +20%", cumulative))
}

/// Turns monthly totals into the full monthly table.
pub struct RatioCalculator;

impl RatioCalculator {
    /// Adds budget percentages and forecasts to every month and the total.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if the budget or any monthly figure is
    /// negative, or if a forecast or percentage overflows.
    pub fn apply(
        series: &MonthlySeries,
        annual_budget: Option<Decimal>,
    ) -> Result<MonthlyBreakdown, StatisticsError> {
        if let Some(budget) = annual_budget
            && budget < Decimal::ZERO
        {
            return Err(StatisticsError::InvalidAmount {
                context: format!("annual budget {}", series.year),
                amount: budget,
            });
        }

        let months = series
            .months
            .iter()
            .map(|m| Self::line(MonthSlot::Month(m.month), m, annual_budget))
            .collect::<Result<Vec<_>, _>>()?;
        let total = Self::line(MonthSlot::Total, &series.total, annual_budget)?;

        Ok(MonthlyBreakdown { months, total })
    }

    fn line(
        slot: MonthSlot,
        totals: &MonthlyTotals,
        budget: Option<Decimal>,
    ) -> Result<MonthlyAggregate, StatisticsError> {
        for amount in [totals.gross_amount, totals.cumulative_amount] {
            if amount < Decimal::ZERO {
                return Err(StatisticsError::InvalidAmount {
                    context: slot.label().to_string(),
                    amount,
                });
            }
        }

        let forecast_10 = forecast_10(totals.cumulative_amount)?;
        let forecast_20 = forecast_20(totals.cumulative_amount)?;

        Ok(MonthlyAggregate {
            slot,
            label: slot.label().to_string(),
            gross_amount: totals.gross_amount,
            cumulative_amount: totals.cumulative_amount,
            gross_percentage: percentage(totals.gross_amount, budget)?,
            cumulative_percentage: percentage(totals.cumulative_amount, budget)?,
            forecast_10,
            forecast_20,
            forecast_10_percentage: percentage(forecast_10, budget)?,
            forecast_20_percentage: percentage(forecast_20, budget)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::monthly::MonthlyAggregator;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(3000), Some(dec!(100000)), dec!(3))]
    #[case(dec!(5000), Some(dec!(10000)), dec!(50))]
    #[case(dec!(0), Some(dec!(10000)), dec!(0))]
    #[case(dec!(3000), None, dec!(0))]
    #[case(dec!(3000), Some(dec!(0)), dec!(0))]
    fn test_percentage(
        #[case] amount: Decimal,
        #[case] budget: Option<Decimal>,
        #[case] expected: Decimal,
    ) {
        assert_eq!(percentage(amount, budget).unwrap(), expected);
    }

    #[test]
    fn test_forecast_multipliers() {
        assert_eq!(FORECAST_10_MULTIPLIER, dec!(1.10));
        assert_eq!(FORECAST_20_MULTIPLIER, dec!(1.20));
        assert_eq!(forecast_10(dec!(3000)).unwrap(), dec!(3300));
        assert_eq!(forecast_20(dec!(3000)).unwrap(), dec!(3600));
    }

    #[test]
    fn test_apply_without_budget_zeroes_percentages() {
        let mut series = MonthlyAggregator::aggregate(2023, &[]).unwrap();
        series.months[0].gross_amount = dec!(100);
        series.months[0].cumulative_amount = dec!(100);

        let breakdown = RatioCalculator::apply(&series, None).unwrap();

        assert_eq!(breakdown.months.len(), 12);
        assert_eq!(breakdown.months[0].forecast_10, dec!(110));
        for line in breakdown.months.iter().chain(std::iter::once(&breakdown.total)) {
            assert_eq!(line.gross_percentage, Decimal::ZERO);
            assert_eq!(line.cumulative_percentage, Decimal::ZERO);
            assert_eq!(line.forecast_10_percentage, Decimal::ZERO);
            assert_eq!(line.forecast_20_percentage, Decimal::ZERO);
        }
    }

    #[test]
    fn test_apply_labels_months_and_total() {
        let series = MonthlyAggregator::aggregate(2024, &[]).unwrap();
        let breakdown = RatioCalculator::apply(&series, Some(dec!(1000))).unwrap();

        assert_eq!(breakdown.months[0].label, "Janvier");
        assert_eq!(breakdown.months[0].slot, MonthSlot::Month(1));
        assert_eq!(breakdown.months[11].label, "Décembre");
        assert_eq!(breakdown.total.slot, MonthSlot::Total);
        assert_eq!(breakdown.total.label, "Total");
    }

    #[test]
    fn test_apply_rejects_negative_budget() {
        let series = MonthlyAggregator::aggregate(2024, &[]).unwrap();
        let result = RatioCalculator::apply(&series, Some(dec!(-1)));
        assert!(matches!(result, Err(StatisticsError::InvalidAmount { .. })));
    }

    #[test]
    fn test_apply_rejects_negative_month() {
        let mut series = MonthlyAggregator::aggregate(2024, &[]).unwrap();
        series.months[3].gross_amount = dec!(-10);
        let result = RatioCalculator::apply(&series, Some(dec!(1000)));
        assert!(matches!(
            result,
            Err(StatisticsError::InvalidAmount { ref context, .. }) if context == "Avril"
        ));
    }

    #[test]
    fn test_percentage_overflow_is_an_error() {
        let half = Decimal::MAX / dec!(2);

        let result = percentage(half, Some(dec!(0.01)));

        assert!(matches!(
            result,
            Err(StatisticsError::InvalidAmount { ref context, amount })
                if context.contains("overflow") && amount == half
        ));
    }

    #[test]
    fn test_forecast_overflow_is_an_error() {
        assert!(matches!(
            forecast_10(Decimal::MAX),
            Err(StatisticsError::InvalidAmount { .. })
        ));
        assert!(matches!(
            forecast_20(Decimal::MAX),
            Err(StatisticsError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_apply_reports_forecast_overflow() {
        let mut series = MonthlyAggregator::aggregate(2024, &[]).unwrap();
        series.months[11].gross_amount = Decimal::MAX;
        series.months[11].cumulative_amount = Decimal::MAX;

        let result = RatioCalculator::apply(&series, Some(dec!(1000)));

        assert!(matches!(result, Err(StatisticsError::InvalidAmount { .. })));
    }
}
