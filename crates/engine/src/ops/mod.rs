use std::sync::atomic::AtomicBool;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DatabaseTransaction, EntityTrait};

use crate::{EngineError, ResultEngine, Snapshot};

mod accounts;
mod balances;
mod budgets;
mod categories;
mod seed;
mod settings;
mod transactions;

pub use budgets::AllocationOutcome;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

pub(crate) use crate::transactions::{ADJUSTMENT_PAYEE, OPENING_BALANCE_PAYEE};

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    seeding: AtomicBool,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Open `url` and bring its schema up to date.
    pub async fn connect(url: &str) -> ResultEngine<Self> {
        let database = Database::connect(url).await?;
        Migrator::up(&database, None).await?;
        Self::builder().database(database).build().await
    }

    /// Read every collection into a fresh snapshot.
    pub async fn snapshot(&self) -> ResultEngine<Snapshot> {
        Snapshot::load(&self.database).await
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

async fn require_account(
    db_tx: &DatabaseTransaction,
    account_id: i64,
) -> ResultEngine<crate::accounts::Model> {
    crate::accounts::Entity::find_by_id(account_id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("account {account_id}")))
}

async fn require_category(
    db_tx: &DatabaseTransaction,
    category_id: i64,
) -> ResultEngine<crate::categories::Model> {
    crate::categories::Entity::find_by_id(category_id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::InvalidInput(format!("unknown category {category_id}")))
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            seeding: AtomicBool::new(false),
        })
    }
}
