//! Sample data written on first run, when no account exists yet.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Days, NaiveDate, Utc};
use sea_orm::{DatabaseTransaction, EntityTrait, PaginatorTrait, TransactionTrait};

use crate::{
    AccountKind, BalanceSplit, EngineError, INCOME_GROUP, Month, NewAccount, NewCategory,
    NewTransaction, ResultEngine, TransactionKind, accounts, month::today, settings::SEEDED_AT,
};

use super::{Engine, budgets::set_allocation, settings::write_setting, with_tx};

struct SeedAccount {
    name: &'static str,
    kind: AccountKind,
    icon: &'static str,
    color: &'static str,
    cleared: i64,
    uncleared: i64,
}

const ACCOUNTS: [SeedAccount; 3] = [
    SeedAccount {
        name: "BCA Tahapan",
        kind: AccountKind::Checking,
        icon: "account_balance",
        color: "#3b82f6",
        cleared: 12_000_000,
        uncleared: 3_250_000,
    },
    SeedAccount {
        name: "Jenius Utama",
        kind: AccountKind::Checking,
        icon: "account_balance_wallet",
        color: "#8b5cf6",
        cleared: 4_100_000,
        uncleared: 0,
    },
    SeedAccount {
        name: "Dompet Tunai",
        kind: AccountKind::Cash,
        icon: "wallet",
        color: "#f59e0b",
        cleared: 450_000,
        uncleared: 0,
    },
];

struct SeedCategory {
    name: &'static str,
    group: &'static str,
    icon: &'static str,
    color: &'static str,
    sort_order: i32,
    budgeted: i64,
}

const fn category(
    name: &'static str,
    group: &'static str,
    icon: &'static str,
    color: &'static str,
    sort_order: i32,
    budgeted: i64,
) -> SeedCategory {
    SeedCategory {
        name,
        group,
        icon,
        color,
        sort_order,
        budgeted,
    }
}

const CATEGORIES: [SeedCategory; 12] = [
    category("Makan & Minum", "Kebutuhan Harian", "restaurant", "#3b82f6", 1, 2_000_000),
    category("Belanja Bulanan", "Kebutuhan Harian", "local_grocery_store", "#f97316", 2, 1_200_000),
    category("Transportasi", "Kebutuhan Harian", "directions_bus", "#8b5cf6", 3, 500_000),
    category("Makanan Kucing", "Kebutuhan Harian", "pets", "#14b8a6", 4, 0),
    category("Listrik & Air", "Tagihan Tetap", "lightbulb", "#eab308", 5, 800_000),
    category("Internet & WiFi", "Tagihan Tetap", "wifi", "#6366f1", 6, 350_000),
    category("Sewa Kost", "Tagihan Tetap", "home", "#ef4444", 7, 1_500_000),
    category("Dana Darurat", "Tabungan & Investasi", "savings", "#10b981", 8, 500_000),
    category("Liburan Jepang", "Tabungan & Investasi", "flight", "#ec4899", 9, 500_000),
    category("Hiburan", "Gaya Hidup", "movie", "#f59e0b", 10, 200_000),
    category("Kesehatan", "Gaya Hidup", "local_hospital", "#ef4444", 11, 300_000),
    category("Pendapatan", INCOME_GROUP, "payments", "#0df269", 0, 0),
];

struct SeedTransaction {
    days_ago: u64,
    payee: &'static str,
    account: &'static str,
    category: &'static str,
    kind: TransactionKind,
    amount: i64,
    cleared: bool,
    note: &'static str,
}

const TRANSACTIONS: [SeedTransaction; 6] = [
    SeedTransaction {
        days_ago: 0,
        payee: "Makan Siang",
        account: "Dompet Tunai",
        category: "Makan & Minum",
        kind: TransactionKind::Expense,
        amount: -45_000,
        cleared: true,
        note: "",
    },
    SeedTransaction {
        days_ago: 0,
        payee: "SPBU Shell",
        account: "BCA Tahapan",
        category: "Transportasi",
        kind: TransactionKind::Expense,
        amount: -350_000,
        cleared: true,
        note: "",
    },
    SeedTransaction {
        days_ago: 1,
        payee: "Transfer Masuk",
        account: "BCA Tahapan",
        category: "Pendapatan",
        kind: TransactionKind::Income,
        amount: 5_000_000,
        cleared: false,
        note: "Gaji Februari",
    },
    SeedTransaction {
        days_ago: 1,
        payee: "Tokopedia",
        account: "BCA Tahapan",
        category: "Belanja Bulanan",
        kind: TransactionKind::Expense,
        amount: -250_000,
        cleared: true,
        note: "",
    },
    SeedTransaction {
        days_ago: 2,
        payee: "XXI Premiere",
        account: "Dompet Tunai",
        category: "Hiburan",
        kind: TransactionKind::Expense,
        amount: -150_000,
        cleared: true,
        note: "",
    },
    SeedTransaction {
        days_ago: 2,
        payee: "Kopi Kenangan",
        account: "Dompet Tunai",
        category: "Makan & Minum",
        kind: TransactionKind::Expense,
        amount: -25_000,
        cleared: true,
        note: "",
    },
];

/// Days between the opening entries and today.
const OPENING_DAYS_AGO: u64 = 3;

/// Resets the single-flight flag when seeding ends, however it ends.
struct SeedGuard<'a>(&'a AtomicBool);

impl Drop for SeedGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Opening split of a seed account: its target figures minus what the sample
/// transactions will add.
fn opening_split(account: &SeedAccount) -> BalanceSplit {
    TRANSACTIONS
        .iter()
        .filter(|tx| tx.account == account.name)
        .fold(
            BalanceSplit::new(account.cleared, account.uncleared),
            |split, tx| {
                if tx.cleared {
                    BalanceSplit::new(split.cleared - tx.amount, split.uncleared)
                } else {
                    BalanceSplit::new(split.cleared, split.uncleared - tx.amount)
                }
            },
        )
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(date)
}

impl Engine {
    /// Writes the sample dataset when the accounts collection is empty.
    ///
    /// Returns whether anything was written. A call made while another one is
    /// running fails with [`EngineError::SeedInProgress`].
    pub async fn seed_if_empty(&self) -> ResultEngine<bool> {
        if self
            .seeding
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(EngineError::SeedInProgress);
        }
        let _guard = SeedGuard(&self.seeding);

        with_tx!(self, |db_tx| {
            if accounts::Entity::find().count(&db_tx).await? > 0 {
                return Ok(false);
            }
            self.write_seed(&db_tx, today()).await?;
            Ok(true)
        })
    }

    async fn write_seed(&self, db_tx: &DatabaseTransaction, seeded_on: NaiveDate) -> ResultEngine<()> {
        let month = Month::of_date(seeded_on);

        let mut category_ids = HashMap::new();
        for seed in &CATEGORIES {
            let cmd = NewCategory::new(seed.name, seed.group)
                .icon(seed.icon)
                .color(seed.color)
                .sort_order(seed.sort_order);
            let id = self.create_category(db_tx, cmd).await?;
            if seed.group != INCOME_GROUP {
                set_allocation(db_tx, id, month, seed.budgeted).await?;
            }
            category_ids.insert(seed.name, id);
        }

        let mut account_ids = HashMap::new();
        for seed in &ACCOUNTS {
            let opening = opening_split(seed);
            let cmd = NewAccount::new(seed.name)
                .kind(seed.kind)
                .icon(seed.icon)
                .color(seed.color)
                .cleared(opening.cleared)
                .uncleared(opening.uncleared)
                .opened_on(days_before(seeded_on, OPENING_DAYS_AGO));
            let id = self.create_account(db_tx, cmd).await?;
            account_ids.insert(seed.name, id);
        }

        for seed in &TRANSACTIONS {
            let account_id = account_ids.get(seed.account).copied().ok_or_else(|| {
                EngineError::KeyNotFound(format!("seed account {}", seed.account))
            })?;
            let mut cmd = NewTransaction::new(seed.kind, seed.amount)
                .account(account_id)
                .date(days_before(seeded_on, seed.days_ago))
                .payee(seed.payee)
                .cleared(seed.cleared)
                .note(seed.note);
            if let Some(category_id) = category_ids.get(seed.category) {
                cmd = cmd.category(*category_id);
            }
            self.record_transaction(db_tx, cmd).await?;
        }

        write_setting(db_tx, SEEDED_AT, &Utc::now().to_rfc3339()).await?;
        tracing::info!(
            "Seeded {} accounts, {} categories and {} transactions for {month}",
            ACCOUNTS.len(),
            CATEGORIES.len(),
            TRANSACTIONS.len()
        );
        Ok(())
    }
}
