use std::collections::BTreeMap;

use sea_orm::{ActiveValue, DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine, accounts};

use super::Engine;

/// Signed change to an account's balance and its cleared/uncleared parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct AccountDelta {
    balance: i64,
    cleared: i64,
    uncleared: i64,
}

impl AccountDelta {
    fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

fn checked(value: i64, amount: i64) -> ResultEngine<i64> {
    value
        .checked_add(amount)
        .ok_or_else(|| EngineError::InvalidInput("balance out of range".to_string()))
}

/// Account effects of a mutation, accumulated before they are written.
///
/// A ledger entry moves `balance` by its amount and moves either `cleared` or
/// `uncleared` by the same amount, so `balance == cleared + uncleared` is kept
/// by construction.
#[derive(Debug, Default)]
pub(super) struct BalanceUpdates {
    deltas: BTreeMap<i64, AccountDelta>,
}

impl BalanceUpdates {
    pub(super) fn apply(
        &mut self,
        account_id: i64,
        amount: i64,
        cleared: bool,
    ) -> ResultEngine<()> {
        let delta = self.deltas.entry(account_id).or_default();
        delta.balance = checked(delta.balance, amount)?;
        if cleared {
            delta.cleared = checked(delta.cleared, amount)?;
        } else {
            delta.uncleared = checked(delta.uncleared, amount)?;
        }
        Ok(())
    }

    pub(super) fn reverse(
        &mut self,
        account_id: i64,
        amount: i64,
        cleared: bool,
    ) -> ResultEngine<()> {
        let amount = amount
            .checked_neg()
            .ok_or_else(|| EngineError::InvalidInput("balance out of range".to_string()))?;
        self.apply(account_id, amount, cleared)
    }
}

impl Engine {
    /// Write accumulated account effects inside `db_tx`.
    pub(super) async fn persist_balances(
        &self,
        db_tx: &DatabaseTransaction,
        updates: BalanceUpdates,
    ) -> ResultEngine<()> {
        for (account_id, delta) in updates.deltas {
            if delta.is_zero() {
                continue;
            }
            let model = accounts::Entity::find_by_id(account_id)
                .one(db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("account {account_id}")))?;

            let account = accounts::ActiveModel {
                id: ActiveValue::Set(account_id),
                balance: ActiveValue::Set(checked(model.balance, delta.balance)?),
                cleared: ActiveValue::Set(checked(model.cleared, delta.cleared)?),
                uncleared: ActiveValue::Set(checked(model.uncleared, delta.uncleared)?),
                ..Default::default()
            };
            account.update(db_tx).await?;
        }
        Ok(())
    }
}
