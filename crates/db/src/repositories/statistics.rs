//! Statistics repository: the `PostgreSQL` record source.
//!
//! Loads one year of payments together with their paying authority and
//! budget line, the year's budget envelope and the budget-line master data.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use lexbudget_core::statistics::{
    BudgetLine, BudgetLineRef, PayerRef, PaymentRecord, RecordSource, SourceError,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::{budgets_annuels, paiements, pces, sgamis};

/// Error types for statistics queries.
#[derive(Debug, thiserror::Error)]
pub enum RecordSourceError {
    /// Year has no valid calendar bounds.
    #[error("Year out of calendar range: {0}")]
    InvalidYear(i32),

    /// Payment references a paying authority that does not exist.
    #[error("Payment {payment_id} references unknown SGAMI {sgami_id}")]
    UnknownPayer {
        /// Payment ID.
        payment_id: Uuid,
        /// Missing SGAMI ID.
        sgami_id: Uuid,
    },

    /// Payment references a budget line that does not exist.
    #[error("Payment {payment_id} references unknown PCE {pce_id}")]
    UnknownBudgetLine {
        /// Payment ID.
        payment_id: Uuid,
        /// Missing PCE ID.
        pce_id: Uuid,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<RecordSourceError> for SourceError {
    fn from(err: RecordSourceError) -> Self {
        Self::new(err)
    }
}

/// Statistics repository backed by `SeaORM`.
#[derive(Debug, Clone)]
pub struct StatisticsRepository {
    db: DatabaseConnection,
}

impl StatisticsRepository {
    /// Creates a new statistics repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Payments dated in `year`, ordered by date then ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a payment has a dangling
    /// reference.
    pub async fn payment_records(&self, year: i32) -> Result<Vec<PaymentRecord>, RecordSourceError> {
        let (from, to) = year_bounds(year)?;

        let payments = paiements::Entity::find()
            .filter(paiements::Column::DatePaiement.gte(from))
            .filter(paiements::Column::DatePaiement.lte(to))
            .order_by_asc(paiements::Column::DatePaiement)
            .order_by_asc(paiements::Column::Id)
            .all(&self.db)
            .await?;

        let payers: HashMap<Uuid, sgamis::Model> = sgamis::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let lines: HashMap<Uuid, pces::Model> = pces::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let records = payments
            .into_iter()
            .map(|payment| to_payment_record(payment, &payers, &lines))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(year, count = records.len(), "Fetched payment records");
        Ok(records)
    }

    /// Budget envelope of `year`, if one is recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn annual_budget(&self, year: i32) -> Result<Option<Decimal>, RecordSourceError> {
        let budget = budgets_annuels::Entity::find_by_id(year)
            .one(&self.db)
            .await?
            .map(|b| b.montant);

        tracing::debug!(year, has_budget = budget.is_some(), "Fetched annual budget");
        Ok(budget)
    }

    /// Budget-line master data sorted by `ordre`, then code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn budget_lines(&self) -> Result<Vec<BudgetLine>, RecordSourceError> {
        let lines: Vec<BudgetLine> = pces::Entity::find()
            .order_by_asc(pces::Column::Ordre)
            .order_by_asc(pces::Column::Code)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_budget_line)
            .collect();

        tracing::debug!(count = lines.len(), "Fetched budget lines");
        Ok(lines)
    }
}

#[async_trait]
impl RecordSource for StatisticsRepository {
    async fn fetch_payment_records(&self, year: i32) -> Result<Vec<PaymentRecord>, SourceError> {
        Ok(self.payment_records(year).await?)
    }

    async fn fetch_annual_budget(&self, year: i32) -> Result<Option<Decimal>, SourceError> {
        Ok(self.annual_budget(year).await?)
    }

    async fn fetch_budget_line_order(&self) -> Result<Vec<BudgetLine>, SourceError> {
        Ok(self.budget_lines().await?)
    }
}

/// First and last day of `year`.
fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), RecordSourceError> {
    let from = NaiveDate::from_ymd_opt(year, 1, 1);
    let to = NaiveDate::from_ymd_opt(year, 12, 31);
    from.zip(to).ok_or(RecordSourceError::InvalidYear(year))
}

fn to_payment_record(
    payment: paiements::Model,
    payers: &HashMap<Uuid, sgamis::Model>,
    lines: &HashMap<Uuid, pces::Model>,
) -> Result<PaymentRecord, RecordSourceError> {
    let payer = payers
        .get(&payment.sgami_id)
        .ok_or(RecordSourceError::UnknownPayer {
            payment_id: payment.id,
            sgami_id: payment.sgami_id,
        })?;
    let line = lines
        .get(&payment.pce_id)
        .ok_or(RecordSourceError::UnknownBudgetLine {
            payment_id: payment.id,
            pce_id: payment.pce_id,
        })?;

    Ok(PaymentRecord {
        id: payment.id,
        dossier_id: payment.dossier_id,
        amount: payment.montant,
        date: payment.date_paiement,
        payer: PayerRef {
            id: payer.id,
            label: payer.libelle.clone(),
        },
        budget_line: BudgetLineRef {
            code: line.code.clone(),
            label: line.libelle.clone(),
        },
    })
}

fn to_budget_line(model: pces::Model) -> BudgetLine {
    BudgetLine {
        code: model.code,
        label: model.libelle,
        ordre: model.ordre,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sgami(n: u128, libelle: &str) -> sgamis::Model {
        sgamis::Model {
            id: Uuid::from_u128(n),
            libelle: libelle.to_string(),
        }
    }

    fn pce(n: u128, code: &str, ordre: i32) -> pces::Model {
        pces::Model {
            id: Uuid::from_u128(n),
            code: code.to_string(),
            libelle: format!("Ligne {code}"),
            ordre,
        }
    }

    fn paiement(sgami_id: Uuid, pce_id: Uuid) -> paiements::Model {
        paiements::Model {
            id: Uuid::from_u128(99),
            dossier_id: Uuid::from_u128(7),
            montant: dec!(1250.50),
            date_paiement: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            sgami_id,
            pce_id,
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn test_year_bounds() {
        let (from, to) = year_bounds(2024).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        assert!(matches!(
            year_bounds(i32::MAX),
            Err(RecordSourceError::InvalidYear(_))
        ));
    }

    #[test]
    fn test_to_payment_record_resolves_references() {
        let payers = HashMap::from([(Uuid::from_u128(1), sgami(1, "SGAMI Ouest"))]);
        let lines = HashMap::from([(Uuid::from_u128(2), pce(2, "6113", 1))]);

        let record =
            to_payment_record(paiement(Uuid::from_u128(1), Uuid::from_u128(2)), &payers, &lines)
                .unwrap();

        assert_eq!(record.id, Uuid::from_u128(99));
        assert_eq!(record.dossier_id, Uuid::from_u128(7));
        assert_eq!(record.amount, dec!(1250.50));
        assert_eq!(record.month(), 3);
        assert_eq!(record.payer.label, "SGAMI Ouest");
        assert_eq!(record.budget_line.code, "6113");
        assert_eq!(record.budget_line.label, "Ligne 6113");
    }

    #[test]
    fn test_to_payment_record_dangling_payer() {
        let lines = HashMap::from([(Uuid::from_u128(2), pce(2, "6113", 1))]);

        let result = to_payment_record(
            paiement(Uuid::from_u128(1), Uuid::from_u128(2)),
            &HashMap::new(),
            &lines,
        );

        assert!(matches!(result, Err(RecordSourceError::UnknownPayer { .. })));
    }

    #[test]
    fn test_to_payment_record_dangling_budget_line() {
        let payers = HashMap::from([(Uuid::from_u128(1), sgami(1, "SGAMI Ouest"))]);

        let result = to_payment_record(
            paiement(Uuid::from_u128(1), Uuid::from_u128(2)),
            &payers,
            &HashMap::new(),
        );

        assert!(matches!(
            result,
            Err(RecordSourceError::UnknownBudgetLine { .. })
        ));
    }

    #[test]
    fn test_source_error_keeps_message() {
        let err: SourceError = RecordSourceError::InvalidYear(-1).into();
        assert_eq!(err.to_string(), "Year out of calendar range: -1");
    }

    #[test]
    fn test_to_budget_line() {
        let line = to_budget_line(pce(3, "6226", 4));
        assert_eq!(line.code, "6226");
        assert_eq!(line.ordre, 4);
    }
}
