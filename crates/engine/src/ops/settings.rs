use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseTransaction, EntityTrait,
    TransactionTrait,
};

use crate::{ResultEngine, accounts, budgets, categories, settings, transactions};

use super::{Engine, with_tx};

impl Engine {
    pub async fn setting(&self, key: &str) -> ResultEngine<Option<String>> {
        read_setting(&self.database, key).await
    }

    pub async fn put_setting(&self, key: &str, value: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| write_setting(&db_tx, key, value).await)
    }

    /// Deletes every row of every collection.
    pub async fn reset(&self) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            transactions::Entity::delete_many().exec(&db_tx).await?;
            budgets::Entity::delete_many().exec(&db_tx).await?;
            accounts::Entity::delete_many().exec(&db_tx).await?;
            categories::Entity::delete_many().exec(&db_tx).await?;
            settings::Entity::delete_many().exec(&db_tx).await?;
            tracing::info!("All budget data deleted");
            Ok(())
        })
    }
}

pub(super) async fn read_setting<C: ConnectionTrait>(
    db: &C,
    key: &str,
) -> ResultEngine<Option<String>> {
    Ok(settings::Entity::find_by_id(key.to_string())
        .one(db)
        .await?
        .map(|row| row.value))
}

pub(super) async fn write_setting(
    db_tx: &DatabaseTransaction,
    key: &str,
    value: &str,
) -> ResultEngine<()> {
    let exists = read_setting(db_tx, key).await?.is_some();
    let row = settings::ActiveModel {
        key: ActiveValue::Set(key.to_string()),
        value: ActiveValue::Set(value.to_string()),
    };
    if exists {
        row.update(db_tx).await?;
    } else {
        row.insert(db_tx).await?;
    }
    Ok(())
}
