mod common;

use engine::{EngineError, NewTransaction, TransactionKind};

use common::{account, assert_consistent, date, engine, envelope, figures, month};

#[tokio::test]
async fn expense_lowers_balance_and_counts_as_activity() {
    let engine = engine().await;
    let a = account(&engine, "A", 1_000_000).await;
    let c1 = envelope(&engine, "C1").await;

    let id = engine
        .add_transaction(
            NewTransaction::expense(a, 45_000)
                .category(c1)
                .date(date("2026-02-10"))
                .cleared(true),
        )
        .await
        .unwrap();
    assert!(id.is_some());

    assert_eq!(figures(&engine, a).await, (955_000, 955_000, 0));
    let snapshot = assert_consistent(&engine).await;
    assert_eq!(snapshot.category_activity(c1, month("2026-02")), 45_000);
    let stored = snapshot.transaction(id.unwrap()).unwrap();
    assert_eq!(stored.amount, -45_000);
    assert_eq!(stored.kind, TransactionKind::Expense);
}

#[tokio::test]
async fn amount_sign_follows_the_kind() {
    let engine = engine().await;
    let a = account(&engine, "A", 0).await;

    let expense = engine
        .add_transaction(NewTransaction::expense(a, -20_000))
        .await
        .unwrap()
        .unwrap();
    let income = engine
        .add_transaction(NewTransaction::income(a, -70_000))
        .await
        .unwrap()
        .unwrap();

    let snapshot = assert_consistent(&engine).await;
    assert_eq!(snapshot.transaction(expense).unwrap().amount, -20_000);
    assert_eq!(snapshot.transaction(income).unwrap().amount, 70_000);
    assert_eq!(figures(&engine, a).await, (50_000, 0, 50_000));
}

#[tokio::test]
async fn transfer_moves_money_between_accounts() {
    let engine = engine().await;
    let a = account(&engine, "A", 1_000_000).await;
    let b = account(&engine, "B", 200_000).await;

    let source_leg = engine
        .add_transaction(NewTransaction::transfer(a, b, 150_000).date(date("2026-02-10")))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(figures(&engine, a).await, (850_000, 1_000_000, -150_000));
    assert_eq!(figures(&engine, b).await, (350_000, 200_000, 150_000));

    let snapshot = assert_consistent(&engine).await;
    let legs: Vec<_> = snapshot
        .transactions
        .iter()
        .filter(|tx| tx.is_transfer())
        .collect();
    assert_eq!(legs.len(), 2);
    let outgoing = snapshot.transaction(source_leg).unwrap();
    assert_eq!(outgoing.amount, -150_000);
    assert_eq!(outgoing.payee, "Transfer ke B");
    let incoming = snapshot
        .transaction(outgoing.transfer_pair_id.unwrap())
        .unwrap();
    assert_eq!(incoming.payee, "Transfer dari A");
    assert_eq!(incoming.transfer_pair_id, Some(source_leg));
    assert_eq!(snapshot.total_balance(), 1_200_000);
}

#[tokio::test]
async fn transfer_uses_the_given_payee_on_both_legs() {
    let engine = engine().await;
    let a = account(&engine, "A", 100).await;
    let b = account(&engine, "B", 0).await;

    let id = engine
        .add_transaction(NewTransaction::transfer(a, b, 40).payee("Tabungan"))
        .await
        .unwrap()
        .unwrap();

    let snapshot = engine.snapshot().await.unwrap();
    let outgoing = snapshot.transaction(id).unwrap();
    let incoming = snapshot
        .transaction(outgoing.transfer_pair_id.unwrap())
        .unwrap();
    assert_eq!(outgoing.payee, "Tabungan");
    assert_eq!(incoming.payee, "Tabungan");
}

#[tokio::test]
async fn deleting_a_transfer_leg_restores_both_accounts() {
    let engine = engine().await;
    let a = account(&engine, "A", 1_000_000).await;
    let b = account(&engine, "B", 200_000).await;
    let before_a = figures(&engine, a).await;
    let before_b = figures(&engine, b).await;

    let source_leg = engine
        .add_transaction(NewTransaction::transfer(a, b, 150_000))
        .await
        .unwrap()
        .unwrap();
    assert!(engine.delete_transaction(source_leg).await.unwrap());

    assert_eq!(figures(&engine, a).await, before_a);
    assert_eq!(figures(&engine, b).await, before_b);
    let snapshot = assert_consistent(&engine).await;
    assert!(!snapshot.transactions.iter().any(|tx| tx.is_transfer()));
}

#[tokio::test]
async fn deleting_the_incoming_leg_removes_the_pair_too() {
    let engine = engine().await;
    let a = account(&engine, "A", 500).await;
    let b = account(&engine, "B", 0).await;

    let source_leg = engine
        .add_transaction(NewTransaction::transfer(a, b, 300).cleared(true))
        .await
        .unwrap()
        .unwrap();
    let incoming = engine
        .snapshot()
        .await
        .unwrap()
        .transaction(source_leg)
        .unwrap()
        .transfer_pair_id
        .unwrap();

    assert!(engine.delete_transaction(incoming).await.unwrap());
    assert_eq!(figures(&engine, a).await, (500, 500, 0));
    assert_eq!(figures(&engine, b).await, (0, 0, 0));
    assert_consistent(&engine).await;
}

#[tokio::test]
async fn add_then_delete_leaves_accounts_untouched() {
    let engine = engine().await;
    let a = account(&engine, "A", 750_000).await;
    let c1 = envelope(&engine, "C1").await;
    let before = figures(&engine, a).await;

    for cmd in [
        NewTransaction::expense(a, 12_345).category(c1),
        NewTransaction::expense(a, 99_000).cleared(true),
        NewTransaction::income(a, 1_000_000),
    ] {
        let id = engine.add_transaction(cmd).await.unwrap().unwrap();
        assert_consistent(&engine).await;
        engine.delete_transaction(id).await.unwrap();
        assert_eq!(figures(&engine, a).await, before);
    }
}

#[tokio::test]
async fn deleting_an_unknown_transaction_is_a_no_op() {
    let engine = engine().await;
    account(&engine, "A", 100).await;

    assert!(!engine.delete_transaction(4242).await.unwrap());
    assert_consistent(&engine).await;
}

#[tokio::test]
async fn zero_amount_expense_writes_nothing() {
    let engine = engine().await;
    let a = account(&engine, "A", 0).await;

    let id = engine
        .add_transaction(NewTransaction::expense(a, 0))
        .await
        .unwrap();
    assert_eq!(id, None);
    assert!(engine.snapshot().await.unwrap().transactions.is_empty());
}

#[tokio::test]
async fn invalid_transfers_are_rejected() {
    let engine = engine().await;
    let a = account(&engine, "A", 1_000).await;
    let b = account(&engine, "B", 0).await;

    let zero = engine
        .add_transaction(NewTransaction::transfer(a, b, 0))
        .await;
    assert!(matches!(zero, Err(EngineError::InvalidInput(_))));

    let same = engine
        .add_transaction(NewTransaction::transfer(a, a, 10))
        .await;
    assert!(matches!(same, Err(EngineError::InvalidInput(_))));

    let no_target = engine
        .add_transaction(NewTransaction::new(TransactionKind::Transfer, 10).account(a))
        .await;
    assert!(matches!(no_target, Err(EngineError::InvalidInput(_))));

    let unknown_target = engine
        .add_transaction(NewTransaction::transfer(a, 999, 10))
        .await;
    assert!(matches!(unknown_target, Err(EngineError::KeyNotFound(_))));

    assert_eq!(figures(&engine, a).await, (1_000, 1_000, 0));
    assert_eq!(engine.snapshot().await.unwrap().transactions.len(), 1);
}

#[tokio::test]
async fn missing_or_unknown_references_are_rejected() {
    let engine = engine().await;
    let a = account(&engine, "A", 0).await;

    let no_account = engine
        .add_transaction(NewTransaction::new(TransactionKind::Expense, 10))
        .await;
    assert_eq!(
        no_account,
        Err(EngineError::InvalidInput("account is required".to_string()))
    );

    let unknown_account = engine
        .add_transaction(NewTransaction::expense(777, 10))
        .await;
    assert!(matches!(unknown_account, Err(EngineError::KeyNotFound(_))));

    let unknown_category = engine
        .add_transaction(NewTransaction::expense(a, 10).category(555))
        .await;
    assert!(matches!(unknown_category, Err(EngineError::InvalidInput(_))));

    assert!(engine.snapshot().await.unwrap().transactions.is_empty());
}

#[tokio::test]
async fn transactions_group_by_date_newest_first() {
    let engine = engine().await;
    let a = account(&engine, "A", 0).await;
    let b = account(&engine, "B", 0).await;

    for (on, account_id) in [("2026-02-01", a), ("2026-02-03", a), ("2026-02-01", b)] {
        engine
            .add_transaction(NewTransaction::income(account_id, 10).date(date(on)))
            .await
            .unwrap();
    }

    let snapshot = engine.snapshot().await.unwrap();
    let all = snapshot.transactions_by_date(None);
    assert_eq!(all[0].date, date("2026-02-03"));
    assert_eq!(all[1].date, date("2026-02-01"));
    assert_eq!(all[1].transactions.len(), 2);
    assert!(all[1].transactions[0].id < all[1].transactions[1].id);

    let only_b = snapshot.transactions_by_date(Some(b));
    assert_eq!(only_b.len(), 1);
    assert_eq!(only_b[0].transactions[0].account_id, b);
}

#[tokio::test]
async fn entries_that_would_overflow_a_balance_are_rejected() {
    let engine = engine().await;
    let full = account(&engine, "Full", i64::MAX).await;
    let other = account(&engine, "Other", 10).await;

    let income = engine.add_transaction(NewTransaction::income(full, 1)).await;
    assert_eq!(
        income,
        Err(EngineError::InvalidInput("balance out of range".to_string()))
    );
    let transfer = engine
        .add_transaction(NewTransaction::transfer(other, full, 5))
        .await;
    assert!(matches!(transfer, Err(EngineError::InvalidInput(_))));

    assert_eq!(figures(&engine, full).await, (i64::MAX, i64::MAX, 0));
    assert_eq!(figures(&engine, other).await, (10, 10, 0));
    assert_eq!(engine.snapshot().await.unwrap().transactions.len(), 2);
}
