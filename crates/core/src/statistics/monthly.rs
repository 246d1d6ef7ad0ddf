//! Monthly aggregation of payment records.

use rust_decimal::Decimal;

use super::error::StatisticsError;
use super::types::{MonthSlot, MonthlySeries, MonthlyTotals, PaymentRecord};

/// Groups one year's payment records into twelve monthly buckets.
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    /// Buckets `records` by month and computes gross and running totals.
    ///
    /// Months without records are present with a zero gross amount. The
    /// grand total's cumulative amount equals December's.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` or `RecordOutsideYear` for the first record
    /// that cannot be aggregated into `year`; no partial series is returned.
    pub fn aggregate(year: i32, records: &[PaymentRecord]) -> Result<MonthlySeries, StatisticsError> {
        let mut gross = [Decimal::ZERO; 12];

        for record in records {
            record.validate_for(year)?;
            // month() is 1..=12 for any valid NaiveDate
            let slot = &mut gross[(record.month() - 1) as usize];
            *slot = slot.checked_add(record.amount).ok_or_else(|| {
                StatisticsError::overflow(MonthSlot::Month(record.month()).label(), record.amount)
            })?;
        }

        let mut cumulative = [Decimal::ZERO; 12];
        let mut running = Decimal::ZERO;
        for (i, amount) in gross.iter().enumerate() {
            running = running.checked_add(*amount).ok_or_else(|| {
                StatisticsError::overflow(MonthSlot::Month(month_number(i)).label(), *amount)
            })?;
            cumulative[i] = running;
        }

        let months: [MonthlyTotals; 12] = std::array::from_fn(|i| MonthlyTotals {
            month: month_number(i),
            gross_amount: gross[i],
            cumulative_amount: cumulative[i],
        });

        // the running total after December is the sum of all buckets
        let total_gross = running;

        Ok(MonthlySeries {
            year,
            months,
            total: MonthlyTotals {
                month: 0,
                gross_amount: total_gross,
                cumulative_amount: running,
            },
        })
    }
}

fn month_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::types::{BudgetLineRef, PayerRef};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn payment(year: i32, month: u32, amount: Decimal) -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4(),
            dossier_id: Uuid::new_v4(),
            amount,
            date: NaiveDate::from_ymd_opt(year, month, 10).unwrap(),
            payer: PayerRef {
                id: Uuid::nil(),
                label: "SGAMI Est".to_string(),
            },
            budget_line: BudgetLineRef {
                code: "6113".to_string(),
                label: "Frais de justice".to_string(),
            },
        }
    }

    #[test]
    fn test_empty_year_has_twelve_zero_months() {
        let series = MonthlyAggregator::aggregate(2024, &[]).unwrap();

        assert_eq!(series.months.len(), 12);
        for (i, month) in series.months.iter().enumerate() {
            assert_eq!(month.month as usize, i + 1);
            assert_eq!(month.gross_amount, Decimal::ZERO);
            assert_eq!(month.cumulative_amount, Decimal::ZERO);
        }
        assert_eq!(series.total.gross_amount, Decimal::ZERO);
    }

    #[test]
    fn test_running_total() {
        let records = vec![
            payment(2024, 1, dec!(1000)),
            payment(2024, 2, dec!(1500)),
            payment(2024, 2, dec!(500)),
            payment(2024, 11, dec!(250.75)),
        ];

        let series = MonthlyAggregator::aggregate(2024, &records).unwrap();

        assert_eq!(series.months[0].gross_amount, dec!(1000));
        assert_eq!(series.months[1].gross_amount, dec!(2000));
        assert_eq!(series.months[1].cumulative_amount, dec!(3000));
        assert_eq!(series.months[9].cumulative_amount, dec!(3000));
        assert_eq!(series.months[10].cumulative_amount, dec!(3250.75));
        assert_eq!(series.months[11].cumulative_amount, dec!(3250.75));
        assert_eq!(series.total.gross_amount, dec!(3250.75));
        assert_eq!(series.total.cumulative_amount, dec!(3250.75));
    }

    #[test]
    fn test_record_order_does_not_matter() {
        let mut records = vec![
            payment(2024, 12, dec!(3)),
            payment(2024, 6, dec!(2)),
            payment(2024, 1, dec!(1)),
        ];
        let forward = MonthlyAggregator::aggregate(2024, &records).unwrap();
        records.reverse();
        let backward = MonthlyAggregator::aggregate(2024, &records).unwrap();

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_negative_amount_fails_whole_series() {
        let records = vec![payment(2024, 1, dec!(10)), payment(2024, 2, dec!(-5))];

        let result = MonthlyAggregator::aggregate(2024, &records);
        assert!(matches!(result, Err(StatisticsError::InvalidAmount { .. })));
    }

    #[test]
    fn test_record_from_other_year_fails() {
        let records = vec![payment(2023, 12, dec!(10))];

        let result = MonthlyAggregator::aggregate(2024, &records);
        assert!(matches!(
            result,
            Err(StatisticsError::RecordOutsideYear { year: 2024, .. })
        ));
    }

    #[test]
    fn test_overflowing_month_bucket_is_an_error() {
        let huge = Decimal::MAX / dec!(2) + Decimal::ONE;
        let records = vec![payment(2024, 3, huge), payment(2024, 3, huge)];

        let result = MonthlyAggregator::aggregate(2024, &records);
        assert!(matches!(
            result,
            Err(StatisticsError::InvalidAmount { ref context, .. }) if context.starts_with("Mars")
        ));
    }

    #[test]
    fn test_overflowing_running_total_is_an_error() {
        let huge = Decimal::MAX / dec!(2) + Decimal::ONE;
        let records = vec![payment(2024, 1, huge), payment(2024, 7, huge)];

        let result = MonthlyAggregator::aggregate(2024, &records);
        assert!(matches!(
            result,
            Err(StatisticsError::InvalidAmount { ref context, .. }) if context.starts_with("Juillet")
        ));
    }
}
