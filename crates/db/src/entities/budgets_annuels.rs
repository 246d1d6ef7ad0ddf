//! `SeaORM` Entity for budgets_annuels table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets_annuels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub annee: i32,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub montant: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
