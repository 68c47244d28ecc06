use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::{EngineError, INCOME_GROUP, Month, ResultEngine, Snapshot, budgets};

use super::{Engine, require_category, with_tx};

/// Result of an allocation: the row written and, when the month is
/// over-allocated, a notice for the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationOutcome {
    pub allocation_id: i64,
    pub notice: Option<String>,
}

impl Engine {
    /// Sets the amount budgeted to `category_id` for `month`.
    ///
    /// Allocating the same amount twice leaves a single row with that amount.
    pub async fn allocate_funds(
        &self,
        category_id: i64,
        amount: i64,
        month: Month,
    ) -> ResultEngine<AllocationOutcome> {
        with_tx!(self, |db_tx| {
            require_envelope(&db_tx, category_id).await?;
            let allocation_id = set_allocation(&db_tx, category_id, month, amount).await?;

            let to_be_budgeted = Snapshot::load(&db_tx).await?.to_be_budgeted(month);
            let notice = (to_be_budgeted < 0).then(|| {
                tracing::warn!(
                    "Allocation of {amount} to category {category_id} over-commits {month}: to be budgeted is {to_be_budgeted}"
                );
                format!(
                    "Alokasi melebihi dana tersedia: To Be Budgeted {month} menjadi {to_be_budgeted}"
                )
            });

            tracing::debug!("Allocated {amount} to category {category_id} for {month}");
            Ok(AllocationOutcome {
                allocation_id,
                notice,
            })
        })
    }

    /// Moves `amount` of `month`'s allocation from one envelope to another.
    ///
    /// A source without an allocation row gets one with `-amount`: its money
    /// may come from earlier months.
    pub async fn move_money(
        &self,
        from_category_id: i64,
        to_category_id: i64,
        amount: i64,
        month: Month,
    ) -> ResultEngine<()> {
        if amount <= 0 {
            return Err(EngineError::InvalidInput(
                "amount to move must be positive".to_string(),
            ));
        }
        if from_category_id == to_category_id {
            return Err(EngineError::InvalidInput(
                "cannot move money to the same category".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            require_envelope(&db_tx, from_category_id).await?;
            require_envelope(&db_tx, to_category_id).await?;

            let from = budgeted(&db_tx, from_category_id, month).await?;
            let to = budgeted(&db_tx, to_category_id, month).await?;
            let out_of_range =
                || EngineError::InvalidInput("allocation out of range".to_string());
            let from = from.checked_sub(amount).ok_or_else(out_of_range)?;
            let to = to.checked_add(amount).ok_or_else(out_of_range)?;
            set_allocation(&db_tx, from_category_id, month, from).await?;
            set_allocation(&db_tx, to_category_id, month, to).await?;

            tracing::debug!(
                "Moved {amount} from category {from_category_id} to {to_category_id} for {month}"
            );
            Ok(())
        })
    }
}

/// An existing category outside the income group.
async fn require_envelope(db_tx: &DatabaseTransaction, category_id: i64) -> ResultEngine<()> {
    let category = require_category(db_tx, category_id).await?;
    if category.group == INCOME_GROUP {
        return Err(EngineError::InvalidInput(format!(
            "income category {} cannot be budgeted",
            category.name
        )));
    }
    Ok(())
}

async fn find_allocation(
    db_tx: &DatabaseTransaction,
    category_id: i64,
    month: Month,
) -> ResultEngine<Option<budgets::Model>> {
    Ok(budgets::Entity::find()
        .filter(budgets::Column::Month.eq(month.to_string()))
        .filter(budgets::Column::CategoryId.eq(category_id))
        .one(db_tx)
        .await?)
}

async fn budgeted(db_tx: &DatabaseTransaction, category_id: i64, month: Month) -> ResultEngine<i64> {
    Ok(find_allocation(db_tx, category_id, month)
        .await?
        .map_or(0, |row| row.budgeted))
}

/// Upsert the (`month`, `category_id`) row; returns its id.
pub(super) async fn set_allocation(
    db_tx: &DatabaseTransaction,
    category_id: i64,
    month: Month,
    amount: i64,
) -> ResultEngine<i64> {
    match find_allocation(db_tx, category_id, month).await? {
        Some(row) => {
            let id = row.id;
            let row = budgets::ActiveModel {
                id: ActiveValue::Set(id),
                budgeted: ActiveValue::Set(amount),
                ..Default::default()
            };
            row.update(db_tx).await?;
            Ok(id)
        }
        None => {
            let row = budgets::ActiveModel {
                id: ActiveValue::NotSet,
                month: ActiveValue::Set(month.to_string()),
                category_id: ActiveValue::Set(category_id),
                budgeted: ActiveValue::Set(amount),
            };
            Ok(row.insert(db_tx).await?.id)
        }
    }
}
