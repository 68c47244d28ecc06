mod common;

use engine::{
    Engine, EngineError, NewCategory, NewTransaction, Store, StoreEvent, TransactionPatch,
};
use sea_orm::{ConnectionTrait, Database, DbBackend, Statement};

use common::{engine, month};

async fn loaded_store(at: &str) -> Store {
    let store = Store::with_month(engine().await, month(at));
    store.load_data().await.unwrap();
    store
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn loading_seeds_and_publishes() {
    let store = Store::with_month(engine().await, month("2026-02"));
    let mut rx = store.subscribe();
    assert!(store.is_loading().await);

    store.load_data().await.unwrap();

    assert_eq!(drain(&mut rx), vec![StoreEvent::Loaded]);
    let view = store.view().await;
    assert!(!view.is_loading);
    assert_eq!(view.current_month, month("2026-02"));
    assert_eq!(view.accounts.len(), 3);
    assert_eq!(view.categories.len(), 12);

    // A second load finds data and does not seed again.
    store.load_data().await.unwrap();
    assert_eq!(store.snapshot().await.transactions.len(), 10);
}

#[tokio::test]
async fn abandoning_the_initial_load_leaves_the_loading_state() {
    let store = Store::new(engine().await);
    assert!(store.is_loading().await);

    store.abandon_loading().await;

    let view = store.view().await;
    assert!(!view.is_loading);
    assert!(view.accounts.is_empty());
}

#[tokio::test]
async fn month_navigation_wraps_years() {
    let store = loaded_store("2026-01").await;
    let mut rx = store.subscribe();

    assert_eq!(store.prev_month().await.unwrap(), month("2025-12"));
    assert_eq!(store.next_month().await.unwrap(), month("2026-01"));
    assert_eq!(store.next_month().await.unwrap(), month("2026-02"));
    store.set_month(month("2027-06")).await;

    assert_eq!(store.current_month().await, month("2027-06"));
    assert_eq!(
        drain(&mut rx),
        vec![
            StoreEvent::MonthChanged(month("2025-12")),
            StoreEvent::MonthChanged(month("2026-01")),
            StoreEvent::MonthChanged(month("2026-02")),
            StoreEvent::MonthChanged(month("2027-06")),
        ]
    );
}

#[tokio::test]
async fn month_navigation_stops_at_the_last_four_digit_year() {
    let store = Store::with_month(engine().await, month("9999-12"));
    let mut rx = store.subscribe();

    assert!(matches!(store.next_month().await, Err(EngineError::InvalidMonth(_))));

    assert_eq!(store.current_month().await, month("9999-12"));
    assert!(drain(&mut rx).is_empty());
    assert_eq!(store.prev_month().await.unwrap(), month("9999-11"));
}

#[tokio::test]
async fn commands_refresh_the_view_before_announcing() {
    let store = loaded_store("2026-02").await;
    let mut rx = store.subscribe();
    let account_id = store.view().await.accounts[0].id;

    let id = store
        .add_transaction(NewTransaction::expense(account_id, 10_000).payee("Parkir"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(drain(&mut rx), vec![StoreEvent::TransactionsChanged]);
    assert_eq!(store.view().await.transaction(id).unwrap().payee, "Parkir");

    store
        .update_transaction(id, TransactionPatch::new().payee("Tol"))
        .await
        .unwrap();
    assert_eq!(store.view().await.transaction(id).unwrap().payee, "Tol");

    assert!(store.delete_transaction(id).await.unwrap());
    assert!(!store.delete_transaction(id).await.unwrap());
    assert!(store.view().await.transaction(id).is_none());

    let category_id = store
        .add_category(NewCategory::new("Parkir", "Kebutuhan Harian"))
        .await
        .unwrap();
    assert_eq!(
        drain(&mut rx),
        vec![
            StoreEvent::TransactionsChanged,
            StoreEvent::TransactionsChanged,
            StoreEvent::CategoriesChanged,
        ]
    );
    assert!(store.view().await.category(category_id).is_some());
}

#[tokio::test]
async fn allocations_default_to_the_viewed_month() {
    let store = loaded_store("2026-03").await;
    let category_id = store
        .add_category(NewCategory::new("Servis Motor", "Kebutuhan Harian"))
        .await
        .unwrap();

    store.allocate_funds(category_id, 250_000, None).await.unwrap();
    store
        .allocate_funds(category_id, 100_000, Some(month("2026-04")))
        .await
        .unwrap();

    let view = store.view().await;
    assert_eq!(view.allocation_current(category_id).unwrap().budgeted, 250_000);
    assert_eq!(view.allocation(category_id, month("2026-04")).unwrap().budgeted, 100_000);
    assert_eq!(view.category_available_current(category_id), 250_000);
    assert_eq!(view.category_activity_current(category_id), 0);
    assert_eq!(view.total_budgeted_current(), 250_000);
    assert_eq!(view.total_available_current(), 250_000);
    assert_eq!(view.to_be_budgeted_current(), view.total_balance() - 250_000);
    assert_eq!(view.total_income_current(), 0);
}

#[tokio::test]
async fn failed_commands_publish_nothing() {
    let store = loaded_store("2026-02").await;
    let mut rx = store.subscribe();
    let before = store.snapshot().await;

    assert!(store.move_money(1, 1, 10, None).await.is_err());
    assert!(
        store
            .add_transaction(NewTransaction::expense(9_999, 10))
            .await
            .is_err()
    );

    assert!(drain(&mut rx).is_empty());
    assert_eq!(store.snapshot().await.transactions.len(), before.transactions.len());
}

#[tokio::test]
async fn reset_wipes_then_seeds_again() {
    let store = loaded_store("2026-02").await;
    let account_id = store.view().await.accounts[0].id;
    store
        .add_transaction(NewTransaction::income(account_id, 1))
        .await
        .unwrap();
    let mut rx = store.subscribe();

    store.reset().await.unwrap();

    assert_eq!(drain(&mut rx), vec![StoreEvent::Reset, StoreEvent::Loaded]);
    let view = store.view().await;
    assert_eq!(view.accounts.len(), 3);
    assert_eq!(view.transactions.len(), 10);
}

#[tokio::test]
async fn a_committed_command_succeeds_even_if_the_reload_fails() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("nolkan.db").display());
    let store = Store::with_month(Engine::connect(&url).await.unwrap(), month("2026-02"));
    store.load_data().await.unwrap();
    let categories_before = store.view().await.categories.len();

    // A row the snapshot cannot read makes every reload fail.
    let raw = Database::connect(&url).await.unwrap();
    raw.execute_unprepared("UPDATE accounts SET kind = 'gold'")
        .await
        .unwrap();
    let mut rx = store.subscribe();

    let id = store
        .add_category(NewCategory::new("Servis Motor", "Kebutuhan Harian"))
        .await
        .unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], StoreEvent::LoadFailed(_)));
    let view = store.view().await;
    assert!(view.category(id).is_none());
    assert_eq!(view.categories.len(), categories_before);

    let stored = raw
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT COUNT(*) AS n FROM categories",
        ))
        .await
        .unwrap()
        .unwrap()
        .try_get::<i64>("", "n")
        .unwrap();
    assert_eq!(stored, categories_before as i64 + 1);
}
