//! `SeaORM` entity definitions.

pub mod budgets_annuels;
pub mod paiements;
pub mod pces;
pub mod sgamis;
