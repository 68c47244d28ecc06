use sea_orm::{EntityTrait, ModelTrait, TransactionTrait};

use crate::{ResultEngine, TransactionKind, transactions};

use super::super::{Engine, balances::BalanceUpdates, with_tx};

impl Engine {
    /// Deletes a ledger entry and reverses its account effect.
    ///
    /// Deleting either leg of a transfer removes both legs. Returns `false`
    /// when no entry with `id` exists.
    pub async fn delete_transaction(&self, id: i64) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let Some(model) = transactions::Entity::find_by_id(id).one(&db_tx).await? else {
                return Ok(false);
            };

            let mut updates = BalanceUpdates::default();
            let is_transfer =
                TransactionKind::try_from(model.kind.as_str())? == TransactionKind::Transfer;
            if is_transfer && let Some(pair_id) = model.transfer_pair_id {
                if let Some(pair) = transactions::Entity::find_by_id(pair_id)
                    .one(&db_tx)
                    .await?
                {
                    updates.reverse(pair.account_id, pair.amount, pair.cleared)?;
                    pair.delete(&db_tx).await?;
                }
            }

            updates.reverse(model.account_id, model.amount, model.cleared)?;
            model.delete(&db_tx).await?;
            self.persist_balances(&db_tx, updates).await?;

            tracing::debug!("Deleted transaction {id}");
            Ok(true)
        })
    }
}
