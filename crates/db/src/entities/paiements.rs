//! `SeaORM` Entity for paiements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "paiements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub dossier_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub montant: Decimal,
    pub date_paiement: Date,
    pub sgami_id: Uuid,
    pub pce_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sgamis::Entity",
        from = "Column::SgamiId",
        to = "super::sgamis::Column::Id"
    )]
    Sgamis,
    #[sea_orm(
        belongs_to = "super::pces::Entity",
        from = "Column::PceId",
        to = "super::pces::Column::Id"
    )]
    Pces,
}

impl Related<super::sgamis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sgamis.def()
    }
}

impl Related<super::pces::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pces.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
