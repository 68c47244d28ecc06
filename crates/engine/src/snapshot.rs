//! In-memory copy of the four budget collections.
//!
//! A `Snapshot` is immutable once built: the store swaps in a fresh one after
//! every committed mutation and hands out `Arc<Snapshot>` views.

use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::{
    Account, BudgetAllocation, Category, ResultEngine, Transaction, accounts, budgets, categories,
    transactions,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Ordered by id.
    pub accounts: Vec<Account>,
    /// Ordered by `sort_order`, then id.
    pub categories: Vec<Category>,
    /// Newest date first; within a date, insertion order.
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<BudgetAllocation>,
}

impl Snapshot {
    pub fn new(
        accounts: Vec<Account>,
        categories: Vec<Category>,
        transactions: Vec<Transaction>,
        budgets: Vec<BudgetAllocation>,
    ) -> Self {
        Self {
            accounts,
            categories,
            transactions,
            budgets,
        }
    }

    /// Read every collection through `db` (a connection or an open
    /// transaction).
    pub(crate) async fn load<C: ConnectionTrait>(db: &C) -> ResultEngine<Self> {
        let accounts = accounts::Entity::find()
            .order_by_asc(accounts::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let categories = categories::Entity::find()
            .order_by_asc(categories::Column::SortOrder)
            .order_by_asc(categories::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let transactions = transactions::Entity::find()
            .order_by_desc(transactions::Column::Date)
            .order_by_asc(transactions::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let budgets = budgets::Entity::find()
            .order_by_asc(budgets::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(BudgetAllocation::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(Self {
            accounts,
            categories,
            transactions,
            budgets,
        })
    }
}
