//! SeaORM Entity for tracked cards

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    /// Content hash of the canonical card name
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Canonical card name, also used as the marketplace query term
    pub name: String,
    pub created_at: Option<DateTimeUtc>,
    /// Refreshed on every upsert
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::listings::Entity")]
    Listings,
}

impl Related<super::listings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
