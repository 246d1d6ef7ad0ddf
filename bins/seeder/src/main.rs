//! Database seeder for Lexbudget development and testing.
//!
//! Seeds paying authorities, budget lines, an annual budget and a year of
//! payments so the statistics endpoints have something to show.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use lexbudget_db::entities::{budgets_annuels, paiements, pces, sgamis};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

const SGAMIS: [(u128, &str); 4] = [
    (0x1001, "SGAMI Ouest"),
    (0x1002, "SGAMI Sud"),
    (0x1003, "SGAMI Est"),
    (0x1004, "SGAMI Nord"),
];

const PCES: [(u128, &str, &str, i32); 4] = [
    (0x2001, "6113", "Frais de justice", 1),
    (0x2002, "6226", "Honoraires d'avocats", 2),
    (0x2003, "6227", "Frais d'actes et de contentieux", 3),
    (0x2004, "6251", "Voyages et déplacements", 4),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    println!("Connecting to database...");
    let db = lexbudget_db::connect(&database_url).await?;

    let year = Utc::now().year();

    println!("Seeding paying authorities...");
    seed_sgamis(&db).await?;

    println!("Seeding budget lines...");
    seed_pces(&db).await?;

    println!("Seeding annual budget for {year}...");
    seed_budget(&db, year).await?;

    println!("Seeding payments for {year}...");
    seed_payments(&db, year).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_sgamis(db: &DatabaseConnection) -> anyhow::Result<()> {
    for (id, libelle) in SGAMIS {
        let id = Uuid::from_u128(id);
        if sgamis::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }
        sgamis::ActiveModel {
            id: Set(id),
            libelle: Set(libelle.to_string()),
        }
        .insert(db)
        .await?;
        println!("  Created {libelle}");
    }
    Ok(())
}

async fn seed_pces(db: &DatabaseConnection) -> anyhow::Result<()> {
    for (id, code, libelle, ordre) in PCES {
        let id = Uuid::from_u128(id);
        if pces::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }
        pces::ActiveModel {
            id: Set(id),
            code: Set(code.to_string()),
            libelle: Set(libelle.to_string()),
            ordre: Set(ordre),
        }
        .insert(db)
        .await?;
        println!("  Created {code} {libelle}");
    }
    Ok(())
}

async fn seed_budget(db: &DatabaseConnection, year: i32) -> anyhow::Result<()> {
    if budgets_annuels::Entity::find_by_id(year).one(db).await?.is_some() {
        println!("  Budget already exists, skipping...");
        return Ok(());
    }
    budgets_annuels::ActiveModel {
        annee: Set(year),
        montant: Set(Decimal::new(2_500_000, 0)),
    }
    .insert(db)
    .await?;
    Ok(())
}

/// One payment per authority and budget line per elapsed month, with amounts
/// varying by month so the cumulative curve is not a straight line.
async fn seed_payments(db: &DatabaseConnection, year: i32) -> anyhow::Result<()> {
    let last_month = if year == Utc::now().year() {
        Utc::now().month()
    } else {
        12
    };

    let mut inserted = 0;
    for month in 1..=last_month {
        for (s, (sgami_id, _)) in SGAMIS.iter().enumerate() {
            for (p, (pce_id, ..)) in PCES.iter().enumerate() {
                let day = 1 + u32::try_from(s * 4 + p)?;
                let date = NaiveDate::from_ymd_opt(year, month, day)
                    .context("invalid seed payment date")?;
                let cents = 150_000 + i64::from(month) * 12_345 + i64::try_from(s * 1000 + p * 250)?;
                let id = Uuid::from_u128(
                    0x3000_0000_0000
                        + u128::try_from(year)? * 10_000
                        + u128::from(month) * 100
                        + u128::try_from(s * 10 + p)?,
                );

                if paiements::Entity::find_by_id(id).one(db).await?.is_some() {
                    continue;
                }

                paiements::ActiveModel {
                    id: Set(id),
                    dossier_id: Set(Uuid::new_v4()),
                    montant: Set(Decimal::new(cents, 2)),
                    date_paiement: Set(date),
                    sgami_id: Set(Uuid::from_u128(*sgami_id)),
                    pce_id: Set(Uuid::from_u128(*pce_id)),
                    created_at: Set(Utc::now().fixed_offset()),
                }
                .insert(db)
                .await?;
                inserted += 1;
            }
        }
    }
    println!("  Inserted {inserted} payments");
    Ok(())
}
