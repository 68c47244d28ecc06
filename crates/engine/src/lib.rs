pub use accounts::{Account, AccountKind, BalanceSplit};
pub use budgets::BudgetAllocation;
pub use categories::{Category, INCOME_GROUP};
pub use commands::{AccountPatch, NewAccount, NewCategory, NewTransaction, TransactionPatch};
pub use error::EngineError;
pub use month::{Month, month_of, parse_date};
pub use ops::{AllocationOutcome, Engine, EngineBuilder};
pub use queries::{
    BudgetOverview, CategoryGroup, CategoryLine, DateGroup, EnvelopeStatus, GroupActivity,
    GroupOverview, MonthReport, progress_percent,
};
pub use snapshot::Snapshot;
pub use store::{Store, StoreEvent, StoreView};
pub use transactions::{
    ADJUSTMENT_PAYEE, OPENING_BALANCE_PAYEE, Transaction, TransactionKind,
};

mod accounts;
mod budgets;
mod categories;
mod commands;
mod error;
mod month;
mod ops;
mod queries;
mod settings;
mod snapshot;
mod store;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
