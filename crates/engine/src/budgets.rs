//! Monthly allocations: how much was assigned to a category for a month.
//!
//! At most one row exists per (`month`, `category_id`); the unique index
//! `idx-budgets-month-category_id-unique` enforces it.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Month};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAllocation {
    pub id: i64,
    pub month: Month,
    pub category_id: i64,
    pub budgeted: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub month: String,
    pub category_id: i64,
    pub budgeted: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BudgetAllocation> for ActiveModel {
    fn from(value: &BudgetAllocation) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            month: ActiveValue::Set(value.month.to_string()),
            category_id: ActiveValue::Set(value.category_id),
            budgeted: ActiveValue::Set(value.budgeted),
        }
    }
}

impl TryFrom<Model> for BudgetAllocation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            month: Month::parse(&model.month)?,
            category_id: model.category_id,
            budgeted: model.budgeted,
        })
    }
}
