use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseTransaction, EntityTrait, TransactionTrait};

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind, TransactionPatch,
    transactions::{self, magnitude},
};

use super::super::{
    Engine, balances::BalanceUpdates, normalize_optional_text, require_account, require_category,
    with_tx,
};

impl Engine {
    /// Applies `patch` to a ledger entry.
    ///
    /// The old account effect is reversed and the new one applied in the same
    /// DB transaction, so balances keep matching the ledger whatever changes
    /// (amount, cleared flag, account). Expenses and incomes may swap kind;
    /// an entry cannot become or stop being a transfer. Patching a transfer
    /// leg keeps its pair consistent: same magnitude with the opposite sign,
    /// same date and cleared flag, cross-referenced accounts.
    pub async fn update_transaction(&self, id: i64, patch: TransactionPatch) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("transaction {id}")))?;
            let current = Transaction::try_from(model)?;
            let now = Utc::now();

            if current.is_transfer() {
                self.update_transfer(&db_tx, current, patch, now).await?;
            } else {
                self.update_entry(&db_tx, current, patch, now).await?;
            }
            tracing::debug!("Updated transaction {id}");
            Ok(())
        })
    }

    async fn update_entry(
        &self,
        db_tx: &DatabaseTransaction,
        current: Transaction,
        patch: TransactionPatch,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        if patch.kind == Some(TransactionKind::Transfer) || patch.transfer_account_id.is_some() {
            return Err(EngineError::InvalidInput(
                "an expense or income cannot become a transfer".to_string(),
            ));
        }
        if patch.amount == Some(0) {
            return Err(EngineError::InvalidInput(
                "amount must be non-zero".to_string(),
            ));
        }

        let kind = patch.kind.unwrap_or(current.kind);
        let amount = kind.signed(patch.amount.unwrap_or(current.amount))?;
        let account_id = patch.account_id.unwrap_or(current.account_id);
        if account_id != current.account_id {
            require_account(db_tx, account_id).await?;
        }
        let category_id = patch.category_id.unwrap_or(current.category_id);
        if let Some(category_id) = category_id
            && current.category_id != Some(category_id)
        {
            require_category(db_tx, category_id).await?;
        }
        let cleared = patch.cleared.unwrap_or(current.cleared);

        let entry = transactions::ActiveModel {
            id: ActiveValue::Set(current.id),
            date: ActiveValue::Set(patch.date.unwrap_or(current.date)),
            payee: ActiveValue::Set(patch_text(patch.payee, current.payee)),
            account_id: ActiveValue::Set(account_id),
            category_id: ActiveValue::Set(category_id),
            amount: ActiveValue::Set(amount),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            cleared: ActiveValue::Set(cleared),
            note: ActiveValue::Set(patch_text(patch.note, current.note)),
            updated_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };
        entry.update(db_tx).await?;

        let mut updates = BalanceUpdates::default();
        updates.reverse(current.account_id, current.amount, current.cleared)?;
        updates.apply(account_id, amount, cleared)?;
        self.persist_balances(db_tx, updates).await
    }

    async fn update_transfer(
        &self,
        db_tx: &DatabaseTransaction,
        current: Transaction,
        patch: TransactionPatch,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        if patch.kind.is_some_and(|kind| kind != TransactionKind::Transfer) {
            return Err(EngineError::InvalidInput(
                "a transfer cannot become an expense or income".to_string(),
            ));
        }
        if matches!(patch.category_id, Some(Some(_))) {
            return Err(EngineError::InvalidInput(
                "a transfer has no category".to_string(),
            ));
        }

        let pair_id = current.transfer_pair_id.ok_or_else(|| {
            EngineError::KeyNotFound(format!("pair of transfer {}", current.id))
        })?;
        let pair = transactions::Entity::find_by_id(pair_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("transaction {pair_id}")))?;

        let size = match patch.amount {
            Some(amount) => magnitude(amount)?,
            None => magnitude(current.amount)?,
        };
        if size == 0 {
            return Err(EngineError::InvalidInput(
                "transfer amount must be non-zero".to_string(),
            ));
        }
        let amount = if current.amount < 0 { -size } else { size };

        let account_id = patch.account_id.unwrap_or(current.account_id);
        let pair_account_id = patch.transfer_account_id.unwrap_or(pair.account_id);
        if account_id == pair_account_id {
            return Err(EngineError::InvalidInput(
                "transfer source and target must differ".to_string(),
            ));
        }
        if account_id != current.account_id {
            require_account(db_tx, account_id).await?;
        }
        if pair_account_id != pair.account_id {
            require_account(db_tx, pair_account_id).await?;
        }

        let date = patch.date.unwrap_or(current.date);
        let cleared = patch.cleared.unwrap_or(current.cleared);

        let mut updates = BalanceUpdates::default();
        updates.reverse(current.account_id, current.amount, current.cleared)?;
        updates.reverse(pair.account_id, pair.amount, pair.cleared)?;
        updates.apply(account_id, amount, cleared)?;
        updates.apply(pair_account_id, -amount, cleared)?;

        let leg = transactions::ActiveModel {
            id: ActiveValue::Set(current.id),
            date: ActiveValue::Set(date),
            payee: ActiveValue::Set(patch_text(patch.payee, current.payee)),
            account_id: ActiveValue::Set(account_id),
            category_id: ActiveValue::Set(None),
            amount: ActiveValue::Set(amount),
            transfer_account_id: ActiveValue::Set(Some(pair_account_id)),
            cleared: ActiveValue::Set(cleared),
            note: ActiveValue::Set(patch_text(patch.note, current.note)),
            updated_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };
        leg.update(db_tx).await?;

        let pair_leg = transactions::ActiveModel {
            id: ActiveValue::Set(pair.id),
            date: ActiveValue::Set(date),
            account_id: ActiveValue::Set(pair_account_id),
            amount: ActiveValue::Set(-amount),
            transfer_account_id: ActiveValue::Set(Some(account_id)),
            cleared: ActiveValue::Set(cleared),
            updated_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };
        pair_leg.update(db_tx).await?;

        self.persist_balances(db_tx, updates).await
    }
}

/// Patched free text: `Some("")` clears the field, `None` keeps it.
fn patch_text(patch: Option<String>, current: String) -> String {
    match patch {
        Some(value) => normalize_optional_text(Some(value.as_str())).unwrap_or_default(),
        None => current,
    }
}
