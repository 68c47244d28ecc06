//! Command structs for engine operations.
//!
//! These types group parameters for write operations (record, update,
//! account and category creation), keeping call sites readable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AccountKind, TransactionKind};

/// Record an expense, an income or a transfer.
///
/// `amount` is taken by magnitude; the sign comes from `kind`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub account_id: Option<i64>,
    pub amount: i64,
    pub date: Option<NaiveDate>,
    pub payee: Option<String>,
    pub category_id: Option<i64>,
    pub target_account_id: Option<i64>,
    pub cleared: bool,
    pub note: Option<String>,
}

impl NewTransaction {
    #[must_use]
    pub fn new(kind: TransactionKind, amount: i64) -> Self {
        Self {
            kind,
            account_id: None,
            amount,
            date: None,
            payee: None,
            category_id: None,
            target_account_id: None,
            cleared: false,
            note: None,
        }
    }

    #[must_use]
    pub fn expense(account_id: i64, amount: i64) -> Self {
        Self::new(TransactionKind::Expense, amount).account(account_id)
    }

    #[must_use]
    pub fn income(account_id: i64, amount: i64) -> Self {
        Self::new(TransactionKind::Income, amount).account(account_id)
    }

    #[must_use]
    pub fn transfer(from_account_id: i64, to_account_id: i64, amount: i64) -> Self {
        Self::new(TransactionKind::Transfer, amount)
            .account(from_account_id)
            .target_account(to_account_id)
    }

    #[must_use]
    pub fn account(mut self, account_id: i64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn target_account(mut self, account_id: i64) -> Self {
        self.target_account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn payee(mut self, payee: impl Into<String>) -> Self {
        self.payee = Some(payee.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn cleared(mut self, cleared: bool) -> Self {
        self.cleared = cleared;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Partial update of a ledger row. `None` leaves a field untouched.
///
/// `category_id` is doubly optional so a category can be cleared
/// (`Some(None)`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub payee: Option<String>,
    pub account_id: Option<i64>,
    pub category_id: Option<Option<i64>>,
    pub amount: Option<i64>,
    pub kind: Option<TransactionKind>,
    pub transfer_account_id: Option<i64>,
    pub cleared: Option<bool>,
    pub note: Option<String>,
}

impl TransactionPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn payee(mut self, payee: impl Into<String>) -> Self {
        self.payee = Some(payee.into());
        self
    }

    #[must_use]
    pub fn account(mut self, account_id: i64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn transfer_account(mut self, account_id: i64) -> Self {
        self.transfer_account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn cleared(mut self, cleared: bool) -> Self {
        self.cleared = Some(cleared);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Create an account. Missing fields take the defaults of a new account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewAccount {
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub in_budget: Option<bool>,
    pub balance: Option<i64>,
    pub cleared: Option<i64>,
    pub uncleared: Option<i64>,
    /// Date of the opening-balance entries; today when absent.
    pub opened_on: Option<NaiveDate>,
}

impl NewAccount {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: AccountKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn in_budget(mut self, in_budget: bool) -> Self {
        self.in_budget = Some(in_budget);
        self
    }

    #[must_use]
    pub fn balance(mut self, balance: i64) -> Self {
        self.balance = Some(balance);
        self
    }

    #[must_use]
    pub fn cleared(mut self, cleared: i64) -> Self {
        self.cleared = Some(cleared);
        self
    }

    #[must_use]
    pub fn uncleared(mut self, uncleared: i64) -> Self {
        self.uncleared = Some(uncleared);
        self
    }

    #[must_use]
    pub fn opened_on(mut self, date: NaiveDate) -> Self {
        self.opened_on = Some(date);
        self
    }
}

/// Partial update of an account. Balance changes are booked as adjustment
/// entries so the ledger keeps matching the account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub in_budget: Option<bool>,
    pub balance: Option<i64>,
    pub cleared: Option<i64>,
    pub uncleared: Option<i64>,
}

impl AccountPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: AccountKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn in_budget(mut self, in_budget: bool) -> Self {
        self.in_budget = Some(in_budget);
        self
    }

    #[must_use]
    pub fn balance(mut self, balance: i64) -> Self {
        self.balance = Some(balance);
        self
    }

    #[must_use]
    pub fn cleared(mut self, cleared: i64) -> Self {
        self.cleared = Some(cleared);
        self
    }

    #[must_use]
    pub fn uncleared(mut self, uncleared: i64) -> Self {
        self.uncleared = Some(uncleared);
        self
    }
}

/// Create a category (envelope).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub group: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}

impl NewCategory {
    #[must_use]
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            icon: None,
            color: None,
            sort_order: None,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = Some(sort_order);
        self
    }
}
