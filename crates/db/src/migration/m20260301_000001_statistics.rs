//! Statistics schema migration.
//!
//! Creates the paying authorities, budget nomenclature, payments and annual
//! budgets read by the statistics engine.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(SGAMIS_SQL).await?;
        db.execute_unprepared(PCES_SQL).await?;
        db.execute_unprepared(PAIEMENTS_SQL).await?;
        db.execute_unprepared(BUDGETS_ANNUELS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS budgets_annuels, paiements, pces, sgamis CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const SGAMIS_SQL: &str = r"
-- Paying authorities
CREATE TABLE sgamis (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    libelle VARCHAR(255) NOT NULL UNIQUE
);
";

const PCES_SQL: &str = r"
-- Budget nomenclature; ordre drives display order
CREATE TABLE pces (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(32) NOT NULL UNIQUE,
    libelle VARCHAR(255) NOT NULL,
    ordre INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_pces_ordre ON pces(ordre);
";

const PAIEMENTS_SQL: &str = r"
-- Payments settled against legal-aid dossiers
CREATE TABLE paiements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    dossier_id UUID NOT NULL,
    montant NUMERIC(15, 2) NOT NULL,
    date_paiement DATE NOT NULL,
    sgami_id UUID NOT NULL REFERENCES sgamis(id),
    pce_id UUID NOT NULL REFERENCES pces(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_paiements_montant_non_negative CHECK (montant >= 0)
);

-- Yearly statistics scan by date
CREATE INDEX idx_paiements_date ON paiements(date_paiement);
CREATE INDEX idx_paiements_dossier ON paiements(dossier_id);
";

const BUDGETS_ANNUELS_SQL: &str = r"
-- Annual budget envelope, at most one per year
CREATE TABLE budgets_annuels (
    annee INTEGER PRIMARY KEY,
    montant NUMERIC(15, 2) NOT NULL,
    CONSTRAINT chk_budgets_annuels_montant_non_negative CHECK (montant >= 0)
);
";
