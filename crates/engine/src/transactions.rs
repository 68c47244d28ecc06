//! Ledger entries.
//!
//! Amounts are signed: outflows negative, inflows positive. A transfer is two
//! rows (legs) pointing at each other through `transfer_pair_id`.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Payee of the entries booking an account's starting balance.
pub const OPENING_BALANCE_PAYEE: &str = "Saldo Awal";
/// Payee of the entries booking a manual balance correction.
pub const ADJUSTMENT_PAYEE: &str = "Penyesuaian Saldo";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
        }
    }

    /// Apply the sign convention of the kind to a raw amount.
    ///
    /// Expenses become `-|amount|`, income `+|amount|`. Transfer legs keep
    /// the sign they are given.
    pub fn signed(self, amount: i64) -> ResultEngine<i64> {
        let magnitude = magnitude(amount)?;
        Ok(match self {
            Self::Expense => -magnitude,
            Self::Income => magnitude,
            Self::Transfer => amount,
        })
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            "transfer" => Ok(Self::Transfer),
            other => Err(EngineError::InvalidInput(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

pub(crate) fn magnitude(amount: i64) -> ResultEngine<i64> {
    amount
        .checked_abs()
        .ok_or_else(|| EngineError::InvalidInput(format!("amount {amount} out of range")))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub payee: String,
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub transfer_account_id: Option<i64>,
    pub transfer_pair_id: Option<i64>,
    pub cleared: bool,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn is_transfer(&self) -> bool {
        self.kind == TransactionKind::Transfer
    }

    /// An opening or adjustment entry: it explains an account balance and is
    /// neither earned nor spent.
    pub fn is_balance_entry(&self) -> bool {
        !self.is_transfer()
            && self.category_id.is_none()
            && (self.payee == OPENING_BALANCE_PAYEE || self.payee == ADJUSTMENT_PAYEE)
    }
}

/// A ledger row about to be inserted.
#[derive(Clone, Debug)]
pub(crate) struct TransactionDraft {
    pub date: NaiveDate,
    pub payee: String,
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub amount: i64,
    pub kind: TransactionKind,
    pub transfer_account_id: Option<i64>,
    pub transfer_pair_id: Option<i64>,
    pub cleared: bool,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub payee: String,
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub amount: i64,
    pub kind: String,
    pub transfer_account_id: Option<i64>,
    pub transfer_pair_id: Option<i64>,
    pub cleared: bool,
    pub note: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_draft(draft: &TransactionDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ActiveValue::NotSet,
            date: ActiveValue::Set(draft.date),
            payee: ActiveValue::Set(draft.payee.clone()),
            account_id: ActiveValue::Set(draft.account_id),
            category_id: ActiveValue::Set(draft.category_id),
            amount: ActiveValue::Set(draft.amount),
            kind: ActiveValue::Set(draft.kind.as_str().to_string()),
            transfer_account_id: ActiveValue::Set(draft.transfer_account_id),
            transfer_pair_id: ActiveValue::Set(draft.transfer_pair_id),
            cleared: ActiveValue::Set(draft.cleared),
            note: ActiveValue::Set(draft.note.clone()),
            created_at: ActiveValue::Set(created_at),
            updated_at: ActiveValue::Set(None),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            date: model.date,
            payee: model.payee,
            account_id: model.account_id,
            category_id: model.category_id,
            amount: model.amount,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            transfer_account_id: model.transfer_account_id,
            transfer_pair_id: model.transfer_pair_id,
            cleared: model.cleared,
            note: model.note,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
