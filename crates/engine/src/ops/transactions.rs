//! Ledger writes. Every one of them books its account effects in the same
//! DB transaction as the ledger rows.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseTransaction};

use crate::{ResultEngine, transactions::{self, TransactionDraft}};

mod create;
mod delete;
mod transfer;
mod update;

async fn insert_entry(db_tx: &DatabaseTransaction, draft: &TransactionDraft) -> ResultEngine<i64> {
    let model = transactions::ActiveModel::from_draft(draft, Utc::now())
        .insert(db_tx)
        .await?;
    Ok(model.id)
}
