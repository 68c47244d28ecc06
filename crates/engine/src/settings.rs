//! String key/value settings stored next to the budget data.

use sea_orm::entity::prelude::*;

/// Written once the sample data has been seeded.
pub(crate) const SEEDED_AT: &str = "seeded_at";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
