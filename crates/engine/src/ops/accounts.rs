use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseTransaction, TransactionTrait};

use crate::{
    Account, AccountPatch, BalanceSplit, NewAccount, NewTransaction, ResultEngine,
    TransactionKind, accounts, month::today,
};

use super::{
    ADJUSTMENT_PAYEE, Engine, OPENING_BALANCE_PAYEE, normalize_optional_text, require_account,
    with_tx,
};

const DEFAULT_ACCOUNT_NAME: &str = "Akun Baru";
const DEFAULT_ACCOUNT_ICON: &str = "account_balance";
const DEFAULT_ACCOUNT_COLOR: &str = "#3b82f6";

impl Engine {
    /// Creates an account. Its starting balance is booked as "Saldo Awal"
    /// entries (one cleared, one uncleared) so the ledger explains it.
    pub async fn add_account(&self, cmd: NewAccount) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| self.create_account(&db_tx, cmd).await)
    }

    pub(crate) async fn create_account(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: NewAccount,
    ) -> ResultEngine<i64> {
        let split = BalanceSplit::resolve(
            BalanceSplit::default(),
            cmd.balance,
            cmd.cleared,
            cmd.uncleared,
        )?;
        let name = normalize_optional_text(cmd.name.as_deref())
            .unwrap_or_else(|| DEFAULT_ACCOUNT_NAME.to_string());

        let account = accounts::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name),
            kind: ActiveValue::Set(cmd.kind.unwrap_or_default().as_str().to_string()),
            icon: ActiveValue::Set(
                normalize_optional_text(cmd.icon.as_deref())
                    .unwrap_or_else(|| DEFAULT_ACCOUNT_ICON.to_string()),
            ),
            color: ActiveValue::Set(
                normalize_optional_text(cmd.color.as_deref())
                    .unwrap_or_else(|| DEFAULT_ACCOUNT_COLOR.to_string()),
            ),
            in_budget: ActiveValue::Set(cmd.in_budget.unwrap_or(true)),
            balance: ActiveValue::Set(0),
            cleared: ActiveValue::Set(0),
            uncleared: ActiveValue::Set(0),
            created_at: ActiveValue::Set(Utc::now()),
            updated_at: ActiveValue::Set(None),
        }
        .insert(db_tx)
        .await?;

        let opened_on = cmd.opened_on.unwrap_or_else(today);
        self.post_balance_entries(db_tx, account.id, split, opened_on, OPENING_BALANCE_PAYEE)
            .await?;

        tracing::debug!(
            "Created account {} ({}) with balance {}",
            account.id,
            account.name,
            split.balance()
        );
        Ok(account.id)
    }

    /// Updates an account. A changed balance (or cleared/uncleared part) is
    /// booked as "Penyesuaian Saldo" entries dated today.
    pub async fn update_account(&self, id: i64, patch: AccountPatch) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let current = Account::try_from(require_account(&db_tx, id).await?)?;
            let split =
                BalanceSplit::resolve(current.split(), patch.balance, patch.cleared, patch.uncleared)?;

            let name = match patch.name.as_deref() {
                Some(name) => normalize_optional_text(Some(name))
                    .unwrap_or_else(|| DEFAULT_ACCOUNT_NAME.to_string()),
                None => current.name.clone(),
            };
            let account = accounts::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(name),
                kind: ActiveValue::Set(patch.kind.unwrap_or(current.kind).as_str().to_string()),
                icon: ActiveValue::Set(
                    normalize_optional_text(patch.icon.as_deref()).unwrap_or(current.icon.clone()),
                ),
                color: ActiveValue::Set(
                    normalize_optional_text(patch.color.as_deref())
                        .unwrap_or(current.color.clone()),
                ),
                in_budget: ActiveValue::Set(patch.in_budget.unwrap_or(current.in_budget)),
                updated_at: ActiveValue::Set(Some(Utc::now())),
                ..Default::default()
            };
            account.update(&db_tx).await?;

            let delta = split.minus(current.split())?;
            self.post_balance_entries(&db_tx, id, delta, today(), ADJUSTMENT_PAYEE)
                .await?;

            tracing::debug!("Updated account {id}");
            Ok(())
        })
    }

    /// Books `delta` on the account: a cleared entry for the cleared part and
    /// an uncleared one for the rest, skipping zero parts.
    async fn post_balance_entries(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: i64,
        delta: BalanceSplit,
        date: NaiveDate,
        payee: &str,
    ) -> ResultEngine<()> {
        for (amount, cleared) in [(delta.cleared, true), (delta.uncleared, false)] {
            if amount == 0 {
                continue;
            }
            let kind = if amount > 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let entry = NewTransaction::new(kind, amount)
                .account(account_id)
                .date(date)
                .payee(payee)
                .cleared(cleared);
            self.record_transaction(db_tx, entry).await?;
        }
        Ok(())
    }
}
