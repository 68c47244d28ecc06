//! The module contains the `Account` struct and its entity.
//!
//! An account holds money: a bank account, a cash wallet, a credit line.
//! `balance`, `cleared` and `uncleared` are denormalized from the ledger and
//! always satisfy `balance == cleared + uncleared`.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    #[default]
    Checking,
    Savings,
    Cash,
    Credit,
    Investment,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Cash => "cash",
            Self::Credit => "credit",
            Self::Investment => "investment",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "cash" => Ok(Self::Cash),
            "credit" => Ok(Self::Credit),
            "investment" => Ok(Self::Investment),
            other => Err(EngineError::InvalidInput(format!(
                "invalid account type: {other}"
            ))),
        }
    }
}

/// Cleared and uncleared parts of a balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BalanceSplit {
    pub cleared: i64,
    pub uncleared: i64,
}

impl BalanceSplit {
    pub fn new(cleared: i64, uncleared: i64) -> Self {
        Self { cleared, uncleared }
    }

    pub fn balance(self) -> i64 {
        self.cleared + self.uncleared
    }

    /// Resolve a requested split against `current`.
    ///
    /// Missing parts are derived from the given ones: a bare `balance` moves
    /// the cleared part, a single part keeps `balance` fixed when given (or the
    /// other part when not). Three inconsistent parts are rejected.
    pub fn resolve(
        current: Self,
        balance: Option<i64>,
        cleared: Option<i64>,
        uncleared: Option<i64>,
    ) -> ResultEngine<Self> {
        let split = match (balance, cleared, uncleared) {
            (None, None, None) => current,
            (Some(balance), None, None) => Self::new(
                add(current.cleared, sub(balance, current.checked_balance()?)?)?,
                current.uncleared,
            ),
            (balance, Some(cleared), None) => Self::new(
                cleared,
                match balance {
                    Some(balance) => sub(balance, cleared)?,
                    None => current.uncleared,
                },
            ),
            (balance, None, Some(uncleared)) => Self::new(
                match balance {
                    Some(balance) => sub(balance, uncleared)?,
                    None => current.cleared,
                },
                uncleared,
            ),
            (balance, Some(cleared), Some(uncleared)) => {
                let split = Self::new(cleared, uncleared);
                if let Some(balance) = balance
                    && Some(balance) != cleared.checked_add(uncleared)
                {
                    return Err(EngineError::InvalidInput(format!(
                        "balance {balance} does not equal cleared {cleared} + uncleared {uncleared}"
                    )));
                }
                split
            }
        };
        split.checked_balance()?;
        Ok(split)
    }

    /// Part-wise difference, used to book an adjustment.
    pub fn minus(self, other: Self) -> ResultEngine<Self> {
        Ok(Self::new(
            sub(self.cleared, other.cleared)?,
            sub(self.uncleared, other.uncleared)?,
        ))
    }

    fn checked_balance(self) -> ResultEngine<i64> {
        add(self.cleared, self.uncleared)
    }
}

fn out_of_range() -> EngineError {
    EngineError::InvalidInput("balance out of range".to_string())
}

fn add(lhs: i64, rhs: i64) -> ResultEngine<i64> {
    lhs.checked_add(rhs).ok_or_else(out_of_range)
}

fn sub(lhs: i64, rhs: i64) -> ResultEngine<i64> {
    lhs.checked_sub(rhs).ok_or_else(out_of_range)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub icon: String,
    pub color: String,
    pub in_budget: bool,
    pub balance: i64,
    pub cleared: i64,
    pub uncleared: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn split(&self) -> BalanceSplit {
        BalanceSplit::new(self.cleared, self.uncleared)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub icon: String,
    pub color: String,
    pub in_budget: bool,
    pub balance: i64,
    pub cleared: i64,
    pub uncleared: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            icon: ActiveValue::Set(value.icon.clone()),
            color: ActiveValue::Set(value.color.clone()),
            in_budget: ActiveValue::Set(value.in_budget),
            balance: ActiveValue::Set(value.balance),
            cleared: ActiveValue::Set(value.cleared),
            uncleared: ActiveValue::Set(value.uncleared),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            kind: AccountKind::try_from(model.kind.as_str())?,
            icon: model.icon,
            color: model.color,
            in_budget: model.in_budget,
            balance: model.balance,
            cleared: model.cleared,
            uncleared: model.uncleared,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_kind_round_trips_through_storage_form() {
        for kind in [
            AccountKind::Checking,
            AccountKind::Savings,
            AccountKind::Cash,
            AccountKind::Credit,
            AccountKind::Investment,
        ] {
            assert_eq!(AccountKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(AccountKind::try_from(" Cash ").unwrap(), AccountKind::Cash);
        assert!(AccountKind::try_from("crypto").is_err());
    }

    #[test]
    fn fresh_split_defaults_to_cleared_balance() {
        let split = BalanceSplit::resolve(BalanceSplit::default(), Some(500), None, None).unwrap();
        assert_eq!(split, BalanceSplit::new(500, 0));
    }

    #[test]
    fn bare_balance_moves_the_cleared_part() {
        let current = BalanceSplit::new(1000, 200);
        let split = BalanceSplit::resolve(current, Some(1500), None, None).unwrap();
        assert_eq!(split, BalanceSplit::new(1300, 200));
        assert_eq!(split.balance(), 1500);
    }

    #[test]
    fn single_part_derives_the_other() {
        let current = BalanceSplit::new(1000, 200);
        assert_eq!(
            BalanceSplit::resolve(current, Some(900), Some(400), None).unwrap(),
            BalanceSplit::new(400, 500)
        );
        assert_eq!(
            BalanceSplit::resolve(current, None, None, Some(0)).unwrap(),
            BalanceSplit::new(1000, 0)
        );
    }

    #[test]
    fn inconsistent_parts_are_rejected() {
        let err = BalanceSplit::resolve(BalanceSplit::default(), Some(10), Some(3), Some(4));
        assert!(matches!(err, Err(EngineError::InvalidInput(_))));
        let ok = BalanceSplit::resolve(BalanceSplit::default(), Some(7), Some(3), Some(4)).unwrap();
        assert_eq!(ok, BalanceSplit::new(3, 4));
    }

    #[test]
    fn splits_outside_i64_are_rejected() {
        let huge = BalanceSplit::resolve(BalanceSplit::default(), None, Some(i64::MAX), Some(1));
        assert!(matches!(huge, Err(EngineError::InvalidInput(_))));
        let moved = BalanceSplit::resolve(BalanceSplit::new(1, 0), Some(i64::MIN), None, None);
        assert!(matches!(moved, Err(EngineError::InvalidInput(_))));
        assert!(BalanceSplit::new(i64::MIN, 0).minus(BalanceSplit::new(1, 0)).is_err());
    }
}
