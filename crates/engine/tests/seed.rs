mod common;

use engine::{EngineError, Month};

use common::{assert_consistent, engine};

#[tokio::test]
async fn empty_database_gets_the_sample_dataset() {
    let engine = engine().await;

    assert!(engine.seed_if_empty().await.unwrap());

    let snapshot = assert_consistent(&engine).await;
    let figures = |name: &str| {
        let account = snapshot
            .accounts
            .iter()
            .find(|account| account.name == name)
            .unwrap();
        (account.balance, account.cleared, account.uncleared)
    };
    assert_eq!(figures("BCA Tahapan"), (15_250_000, 12_000_000, 3_250_000));
    assert_eq!(figures("Jenius Utama"), (4_100_000, 4_100_000, 0));
    assert_eq!(figures("Dompet Tunai"), (450_000, 450_000, 0));
    assert_eq!(snapshot.total_balance(), 19_800_000);

    assert_eq!(snapshot.categories.len(), 12);
    assert_eq!(snapshot.transactions.len(), 10);
    let current = Month::current();
    assert_eq!(snapshot.budgets.len(), 11);
    assert!(snapshot.budgets.iter().all(|row| row.month == current));
    assert_eq!(snapshot.total_budgeted(current), 7_850_000);

    let income = snapshot
        .categories
        .iter()
        .find(|category| category.is_income())
        .unwrap();
    assert_eq!(income.name, "Pendapatan");
    assert!(snapshot.allocation(income.id, current).is_none());

    // Only the salary is income; opening entries explain balances.
    let salary = snapshot
        .transactions
        .iter()
        .find(|tx| tx.payee == "Transfer Masuk")
        .unwrap();
    let payday = Month::of_date(salary.date);
    assert_eq!(snapshot.total_income(payday), 5_000_000);
    assert_eq!(snapshot.month_report(payday).total_income, 5_000_000);

    assert!(engine.setting("seeded_at").await.unwrap().is_some());
}

#[tokio::test]
async fn seeding_twice_writes_once() {
    let engine = engine().await;

    assert!(engine.seed_if_empty().await.unwrap());
    assert!(!engine.seed_if_empty().await.unwrap());

    let snapshot = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.accounts.len(), 3);
    assert_eq!(snapshot.transactions.len(), 10);
}

#[tokio::test]
async fn a_database_with_accounts_is_left_alone() {
    let engine = engine().await;
    common::account(&engine, "Mine", 100).await;

    assert!(!engine.seed_if_empty().await.unwrap());

    let snapshot = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.accounts.len(), 1);
    assert!(snapshot.categories.is_empty());
    assert_eq!(engine.setting("seeded_at").await.unwrap(), None);
}

#[tokio::test]
async fn concurrent_seeds_write_a_single_dataset() {
    let engine = engine().await;

    let (first, second) = tokio::join!(engine.seed_if_empty(), engine.seed_if_empty());

    let outcomes = [first, second];
    let seeded = outcomes.iter().filter(|r| matches!(r, Ok(true))).count();
    assert_eq!(seeded, 1);
    assert!(
        outcomes
            .iter()
            .all(|r| matches!(r, Ok(_) | Err(EngineError::SeedInProgress)))
    );
    let snapshot = assert_consistent(&engine).await;
    assert_eq!(snapshot.accounts.len(), 3);

    // The guard is released once seeding finishes.
    assert!(!engine.seed_if_empty().await.unwrap());
}

#[tokio::test]
async fn settings_round_trip_and_reset_wipes_everything() {
    let engine = engine().await;
    engine.seed_if_empty().await.unwrap();

    engine.put_setting("theme", "dark").await.unwrap();
    engine.put_setting("theme", "light").await.unwrap();
    assert_eq!(engine.setting("theme").await.unwrap().as_deref(), Some("light"));

    engine.reset().await.unwrap();

    let snapshot = engine.snapshot().await.unwrap();
    assert!(snapshot.accounts.is_empty());
    assert!(snapshot.categories.is_empty());
    assert!(snapshot.transactions.is_empty());
    assert!(snapshot.budgets.is_empty());
    assert_eq!(engine.setting("theme").await.unwrap(), None);
    assert_eq!(engine.setting("seeded_at").await.unwrap(), None);

    assert!(engine.seed_if_empty().await.unwrap());
}
