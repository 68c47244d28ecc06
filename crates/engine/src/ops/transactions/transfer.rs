use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseTransaction};

use crate::{
    EngineError, NewTransaction, ResultEngine, TransactionKind,
    month::today,
    transactions::{self, TransactionDraft, magnitude},
};

use super::super::{Engine, balances::BalanceUpdates, normalize_optional_text, require_account};
use super::insert_entry;

impl Engine {
    /// Books a transfer as two legs: `-amount` on the source, `+amount` on
    /// the target, each pointing at the other through `transfer_pair_id`.
    pub(crate) async fn record_transfer(
        &self,
        db_tx: &DatabaseTransaction,
        source_id: i64,
        cmd: NewTransaction,
    ) -> ResultEngine<i64> {
        let target_id = cmd.target_account_id.ok_or_else(|| {
            EngineError::InvalidInput("transfer requires a target account".to_string())
        })?;
        if target_id == source_id {
            return Err(EngineError::InvalidInput(
                "transfer source and target must differ".to_string(),
            ));
        }
        let amount = magnitude(cmd.amount)?;
        if amount == 0 {
            return Err(EngineError::InvalidInput(
                "transfer amount must be non-zero".to_string(),
            ));
        }

        let source = require_account(db_tx, source_id).await?;
        let target = require_account(db_tx, target_id).await?;
        let payee = normalize_optional_text(cmd.payee.as_deref());

        let outgoing = TransactionDraft {
            date: cmd.date.unwrap_or_else(today),
            payee: payee
                .clone()
                .unwrap_or_else(|| format!("Transfer ke {}", target.name)),
            account_id: source_id,
            category_id: None,
            amount: -amount,
            kind: TransactionKind::Transfer,
            transfer_account_id: Some(target_id),
            transfer_pair_id: None,
            cleared: cmd.cleared,
            note: normalize_optional_text(cmd.note.as_deref()).unwrap_or_default(),
        };
        let source_leg = insert_entry(db_tx, &outgoing).await?;

        let incoming = TransactionDraft {
            payee: payee.unwrap_or_else(|| format!("Transfer dari {}", source.name)),
            account_id: target_id,
            amount,
            transfer_account_id: Some(source_id),
            transfer_pair_id: Some(source_leg),
            ..outgoing.clone()
        };
        let target_leg = insert_entry(db_tx, &incoming).await?;

        let link = transactions::ActiveModel {
            id: ActiveValue::Set(source_leg),
            transfer_pair_id: ActiveValue::Set(Some(target_leg)),
            ..Default::default()
        };
        link.update(db_tx).await?;

        let mut updates = BalanceUpdates::default();
        updates.apply(source_id, -amount, outgoing.cleared)?;
        updates.apply(target_id, amount, incoming.cleared)?;
        self.persist_balances(db_tx, updates).await?;

        tracing::debug!(
            "Recorded transfer {source_leg}/{target_leg} of {amount} from account {source_id} to {target_id}"
        );
        Ok(source_leg)
    }
}
