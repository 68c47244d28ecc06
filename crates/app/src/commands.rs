use engine::{
    AccountKind, BudgetOverview, MonthReport, NewAccount, NewCategory, NewTransaction, Store,
    StoreView, TransactionKind, TransactionPatch,
};
use serde::Serialize;

use crate::{
    cli::{AddAccountArgs, AddCategoryArgs, Command, EntryArgs, TransferArgs, UpdateArgs},
    error::{AppError, Result},
    format::{idr, idr_compact},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    overview: BudgetOverview,
    report: MonthReport,
    net_worth: i64,
}

pub async fn run(store: &Store, command: Command) -> Result<()> {
    match command {
        Command::Summary { month, json } => {
            if let Some(month) = month {
                store.set_month(month).await;
            }
            let view = store.view().await;
            let summary = Summary {
                overview: view.budget_overview_current(),
                report: view.month_report_current(),
                net_worth: view.net_worth(),
            };
            if json {
                print_json(&summary)?;
            } else {
                print_summary(&view, &summary);
            }
        }
        Command::Accounts { json } => {
            let view = store.view().await;
            if json {
                print_json(&view.accounts)?;
            } else {
                print_accounts(&view);
            }
        }
        Command::Categories { json } => {
            let view = store.view().await;
            if json {
                print_json(&view.category_groups())?;
            } else {
                for group in view.category_groups() {
                    println!("{}", group.name);
                    for category in group.categories {
                        println!("  {:>4}  {}", category.id, category.name);
                    }
                }
            }
        }
        Command::Transactions { account, json } => {
            let view = store.view().await;
            let groups = view.transactions_by_date(account);
            if json {
                print_json(&groups)?;
            } else {
                for group in groups {
                    println!("{}", group.date);
                    for tx in group.transactions {
                        let mark = if tx.cleared { "c" } else { " " };
                        println!(
                            "  {:>5} {mark} {:<28} {:>16}",
                            tx.id,
                            tx.payee,
                            idr(tx.amount)
                        );
                    }
                }
            }
        }
        Command::Expense(args) => record(store, TransactionKind::Expense, args).await?,
        Command::Income(args) => record(store, TransactionKind::Income, args).await?,
        Command::Transfer(args) => transfer(store, args).await?,
        Command::UpdateTxn(args) => {
            let id = args.id;
            let patch = patch_of(args);
            if patch.is_empty() {
                return Err(AppError::Refused("nothing to update".to_string()));
            }
            store.update_transaction(id, patch).await?;
            println!("Updated transaction {id}");
        }
        Command::DeleteTxn { id } => {
            if store.delete_transaction(id).await? {
                println!("Deleted transaction {id}");
            } else {
                println!("No transaction {id}");
            }
        }
        Command::Allocate {
            category,
            amount,
            month,
        } => {
            let outcome = store.allocate_funds(category, amount, month).await?;
            println!("Allocated {} to category {category}", idr(amount));
            if let Some(notice) = outcome.notice {
                println!("{notice}");
            }
        }
        Command::Move {
            from,
            to,
            amount,
            month,
        } => {
            store.move_money(from, to, amount, month).await?;
            println!("Moved {} from category {from} to {to}", idr(amount));
        }
        Command::AddAccount(args) => add_account(store, args).await?,
        Command::AddCategory(args) => add_category(store, args).await?,
        Command::Reset { yes } => {
            if !yes {
                return Err(AppError::Refused(
                    "reset deletes every record; pass --yes to confirm".to_string(),
                ));
            }
            store.reset().await?;
            println!("Data reset, sample dataset loaded");
        }
    }
    Ok(())
}

async fn record(store: &Store, kind: TransactionKind, args: EntryArgs) -> Result<()> {
    let mut cmd = NewTransaction::new(kind, args.amount)
        .account(args.account)
        .cleared(args.cleared);
    if let Some(category) = args.category {
        cmd = cmd.category(category);
    }
    if let Some(payee) = args.payee {
        cmd = cmd.payee(payee);
    }
    if let Some(date) = args.date {
        cmd = cmd.date(date);
    }
    if let Some(note) = args.note {
        cmd = cmd.note(note);
    }
    match store.add_transaction(cmd).await? {
        Some(id) => println!("Recorded {} {id}", kind.as_str()),
        None => println!("Zero amount, nothing recorded"),
    }
    Ok(())
}

async fn transfer(store: &Store, args: TransferArgs) -> Result<()> {
    let mut cmd = NewTransaction::transfer(args.from, args.to, args.amount).cleared(args.cleared);
    if let Some(payee) = args.payee {
        cmd = cmd.payee(payee);
    }
    if let Some(date) = args.date {
        cmd = cmd.date(date);
    }
    if let Some(id) = store.add_transaction(cmd).await? {
        println!("Recorded transfer {id}");
    }
    Ok(())
}

fn patch_of(args: UpdateArgs) -> TransactionPatch {
    let mut patch = TransactionPatch::new();
    if let Some(amount) = args.amount {
        patch = patch.amount(amount);
    }
    if let Some(date) = args.date {
        patch = patch.date(date);
    }
    if let Some(payee) = args.payee {
        patch = patch.payee(payee);
    }
    if let Some(cleared) = args.cleared {
        patch = patch.cleared(cleared);
    }
    if let Some(category) = args.category {
        patch = patch.category(Some(category));
    } else if args.no_category {
        patch = patch.category(None);
    }
    if let Some(note) = args.note {
        patch = patch.note(note);
    }
    patch
}

async fn add_account(store: &Store, args: AddAccountArgs) -> Result<()> {
    let mut cmd = NewAccount::new(args.name)
        .kind(args.kind.unwrap_or(AccountKind::Checking))
        .in_budget(!args.tracking);
    if let Some(balance) = args.balance {
        cmd = cmd.balance(balance);
    }
    let id = store.add_account(cmd).await?;
    println!("Created account {id}");
    Ok(())
}

async fn add_category(store: &Store, args: AddCategoryArgs) -> Result<()> {
    let mut cmd = NewCategory::new(args.name, args.group);
    if let Some(icon) = args.icon {
        cmd = cmd.icon(icon);
    }
    if let Some(color) = args.color {
        cmd = cmd.color(color);
    }
    if let Some(sort_order) = args.sort_order {
        cmd = cmd.sort_order(sort_order);
    }
    let id = store.add_category(cmd).await?;
    println!("Created category {id}");
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(view: &StoreView, summary: &Summary) {
    let overview = &summary.overview;
    println!("Budget {}", overview.month);
    println!("  To Be Budgeted  {:>18}", idr(overview.to_be_budgeted));
    println!("  Balance         {:>18}", idr(overview.total_balance));
    println!("  Income          {:>18}", idr(overview.total_income));
    println!("  Budgeted        {:>18}", idr(overview.total_budgeted));
    println!("  Net worth       {:>18}", idr(summary.net_worth));

    for group in &overview.groups {
        println!();
        println!(
            "{:<30} {:>10} {:>10} {:>10}",
            group.name,
            idr_compact(group.budgeted),
            idr_compact(group.activity),
            idr_compact(group.available)
        );
        for line in &group.lines {
            println!(
                "  {:>4} {:<25} {:>10} {:>10} {:>10} {:>4}%",
                line.category.id,
                line.category.name,
                idr_compact(line.budgeted),
                idr_compact(line.activity),
                idr_compact(line.available),
                line.progress
            );
        }
    }

    let report = &summary.report;
    println!();
    println!(
        "Spent {} / earned {} (net {})",
        idr(report.total_expense),
        idr(report.total_income),
        idr(report.net())
    );
    if view.is_loading {
        tracing::warn!("Data shown before the initial load finished");
    }
}

fn print_accounts(view: &StoreView) {
    for account in &view.accounts {
        let tracking = if account.in_budget { "" } else { " [tracking]" };
        println!(
            "{:>4}  {:<22} {:<10} {:>18}  cleared {}  uncleared {}{tracking}",
            account.id,
            account.name,
            account.kind.as_str(),
            idr(account.balance),
            idr(account.cleared),
            idr(account.uncleared)
        );
    }
    println!("Budget total {}", idr(view.total_balance()));
}
