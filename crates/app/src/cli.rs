use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{AccountKind, Month};

#[derive(Debug, Parser)]
#[command(name = "nolkan", disable_version_flag = true)]
#[command(about = "Envelope budgeting: every rupiah gets a job")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the database URL (e.g. sqlite:./nolkan.db?mode=rwc).
    #[arg(long, global = true)]
    pub database: Option<String>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// To Be Budgeted, month totals and the envelope table.
    Summary {
        /// Month to show (YYYY-MM); the current one by default.
        #[arg(long)]
        month: Option<Month>,
        #[arg(long)]
        json: bool,
    },
    /// List accounts with their balances.
    Accounts {
        #[arg(long)]
        json: bool,
    },
    /// List categories by group.
    Categories {
        #[arg(long)]
        json: bool,
    },
    /// Ledger entries grouped by date, newest first.
    Transactions {
        #[arg(long)]
        account: Option<i64>,
        #[arg(long)]
        json: bool,
    },
    /// Record an expense.
    Expense(EntryArgs),
    /// Record an income.
    Income(EntryArgs),
    /// Move money between two accounts.
    Transfer(TransferArgs),
    /// Edit a ledger entry.
    UpdateTxn(UpdateArgs),
    /// Delete a ledger entry (both legs for a transfer).
    DeleteTxn { id: i64 },
    /// Set the amount budgeted to a category for a month.
    Allocate {
        #[arg(long)]
        category: i64,
        #[arg(long, allow_negative_numbers = true)]
        amount: i64,
        #[arg(long)]
        month: Option<Month>,
    },
    /// Move budgeted money from one category to another.
    Move {
        #[arg(long)]
        from: i64,
        #[arg(long)]
        to: i64,
        #[arg(long)]
        amount: i64,
        #[arg(long)]
        month: Option<Month>,
    },
    /// Create an account.
    AddAccount(AddAccountArgs),
    /// Create a category.
    AddCategory(AddCategoryArgs),
    /// Delete every account, category, allocation and transaction.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct EntryArgs {
    #[arg(long)]
    pub account: i64,
    #[arg(long)]
    pub amount: i64,
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub payee: Option<String>,
    /// Entry date (YYYY-MM-DD); today by default.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub note: Option<String>,
    #[arg(long)]
    pub cleared: bool,
}

#[derive(Debug, Args)]
pub struct TransferArgs {
    #[arg(long)]
    pub from: i64,
    #[arg(long)]
    pub to: i64,
    #[arg(long)]
    pub amount: i64,
    #[arg(long)]
    pub payee: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub cleared: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub amount: Option<i64>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub payee: Option<String>,
    #[arg(long)]
    pub cleared: Option<bool>,
    #[arg(long, conflicts_with = "no_category")]
    pub category: Option<i64>,
    /// Remove the category of the entry.
    #[arg(long)]
    pub no_category: bool,
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
pub struct AddAccountArgs {
    #[arg(long)]
    pub name: String,
    /// checking, savings, cash, credit or investment.
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<AccountKind>,
    /// Opening balance, booked as cleared.
    #[arg(long, allow_negative_numbers = true)]
    pub balance: Option<i64>,
    /// Keep the account out of the budget (tracking only).
    #[arg(long)]
    pub tracking: bool,
}

#[derive(Debug, Args)]
pub struct AddCategoryArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub group: String,
    #[arg(long)]
    pub icon: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub sort_order: Option<i32>,
}

fn parse_kind(raw: &str) -> Result<AccountKind, String> {
    AccountKind::try_from(raw).map_err(|err| err.to_string())
}
