use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{
    EngineError, NewTransaction, ResultEngine, TransactionKind, month::today,
    transactions::TransactionDraft,
};

use super::super::{
    Engine, balances::BalanceUpdates, normalize_optional_text, require_account, require_category,
    with_tx,
};
use super::insert_entry;

impl Engine {
    /// Records an expense, an income or a transfer.
    ///
    /// Returns the id of the new entry (the outgoing leg for a transfer), or
    /// `None` when an expense/income amount is zero: nothing is written then.
    pub async fn add_transaction(&self, cmd: NewTransaction) -> ResultEngine<Option<i64>> {
        with_tx!(self, |db_tx| self.record_transaction(&db_tx, cmd).await)
    }

    pub(crate) async fn record_transaction(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: NewTransaction,
    ) -> ResultEngine<Option<i64>> {
        let account_id = cmd
            .account_id
            .ok_or_else(|| EngineError::InvalidInput("account is required".to_string()))?;
        if cmd.kind == TransactionKind::Transfer {
            return self.record_transfer(db_tx, account_id, cmd).await.map(Some);
        }
        if cmd.amount == 0 {
            return Ok(None);
        }

        let amount = cmd.kind.signed(cmd.amount)?;
        require_account(db_tx, account_id).await?;
        if let Some(category_id) = cmd.category_id {
            require_category(db_tx, category_id).await?;
        }

        let draft = TransactionDraft {
            date: cmd.date.unwrap_or_else(today),
            payee: normalize_optional_text(cmd.payee.as_deref()).unwrap_or_default(),
            account_id,
            category_id: cmd.category_id,
            amount,
            kind: cmd.kind,
            transfer_account_id: None,
            transfer_pair_id: None,
            cleared: cmd.cleared,
            note: normalize_optional_text(cmd.note.as_deref()).unwrap_or_default(),
        };
        let id = insert_entry(db_tx, &draft).await?;

        let mut updates = BalanceUpdates::default();
        updates.apply(account_id, amount, draft.cleared)?;
        self.persist_balances(db_tx, updates).await?;

        tracing::debug!(
            "Recorded {} {id} of {amount} on account {account_id}",
            draft.kind.as_str()
        );
        Ok(Some(id))
    }
}
