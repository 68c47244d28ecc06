#![allow(dead_code)]

use std::collections::HashSet;

use chrono::NaiveDate;
use engine::{Engine, Month, NewAccount, NewCategory, Snapshot, TransactionKind};

pub async fn engine() -> Engine {
    Engine::connect("sqlite::memory:").await.unwrap()
}

pub fn month(value: &str) -> Month {
    Month::parse(value).unwrap()
}

pub fn date(value: &str) -> NaiveDate {
    engine::parse_date(value).unwrap()
}

pub async fn account(engine: &Engine, name: &str, balance: i64) -> i64 {
    engine
        .add_account(NewAccount::new(name).balance(balance))
        .await
        .unwrap()
}

pub async fn envelope(engine: &Engine, name: &str) -> i64 {
    engine
        .add_category(NewCategory::new(name, "Kebutuhan Harian"))
        .await
        .unwrap()
}

/// `(balance, cleared, uncleared)` of an account.
pub async fn figures(engine: &Engine, account_id: i64) -> (i64, i64, i64) {
    let snapshot = engine.snapshot().await.unwrap();
    let account = snapshot.account(account_id).unwrap();
    (account.balance, account.cleared, account.uncleared)
}

/// Checks every ledger invariant on the current database content.
pub async fn assert_consistent(engine: &Engine) -> Snapshot {
    let snapshot = engine.snapshot().await.unwrap();

    for account in &snapshot.accounts {
        assert_eq!(
            account.cleared + account.uncleared,
            account.balance,
            "cleared + uncleared of {}",
            account.name
        );
        let ledger: i64 = snapshot
            .transactions
            .iter()
            .filter(|tx| tx.account_id == account.id)
            .map(|tx| tx.amount)
            .sum();
        assert_eq!(ledger, account.balance, "ledger sum of {}", account.name);
    }

    for leg in snapshot.transactions.iter().filter(|tx| tx.is_transfer()) {
        let pair_id = leg.transfer_pair_id.unwrap();
        let pair = snapshot.transaction(pair_id).unwrap();
        assert_eq!(pair.kind, TransactionKind::Transfer);
        assert_eq!(pair.amount, -leg.amount);
        assert_eq!(pair.transfer_pair_id, Some(leg.id));
        assert_eq!(Some(pair.account_id), leg.transfer_account_id);
        assert_eq!(pair.transfer_account_id, Some(leg.account_id));
        assert_eq!(pair.date, leg.date, "date of transfer {}", leg.id);
        assert_eq!(pair.cleared, leg.cleared, "cleared flag of transfer {}", leg.id);
        assert!(leg.category_id.is_none());
    }

    let mut keys = HashSet::new();
    for row in &snapshot.budgets {
        assert!(
            keys.insert((row.month, row.category_id)),
            "duplicate allocation for category {} in {}",
            row.category_id,
            row.month
        );
    }

    let mut months: Vec<Month> = snapshot.budgets.iter().map(|row| row.month).collect();
    months.push(Month::current());
    for m in months {
        let available: i64 = snapshot
            .categories
            .iter()
            .filter(|category| !category.is_income())
            .map(|category| snapshot.category_available(category.id, m))
            .sum();
        assert_eq!(snapshot.to_be_budgeted(m), snapshot.total_balance() - available);
    }

    snapshot
}
