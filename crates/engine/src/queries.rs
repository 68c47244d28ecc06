//! Pure derivations over a [`Snapshot`].
//!
//! Nothing here fails: unknown ids yield `None`, `0` or an empty sequence.
//! Month filters compare the month of a transaction date; the `*_to_month`
//! forms include every month up to and including the given one, which is how
//! envelope balances roll over.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Account, BudgetAllocation, Category, Month, Snapshot, Transaction, TransactionKind,
};

/// Categories of one group, in `sort_order`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryGroup<'a> {
    pub name: &'a str,
    pub categories: Vec<&'a Category>,
}

/// Transactions sharing one date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateGroup<'a> {
    pub date: NaiveDate,
    pub transactions: Vec<&'a Transaction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Warning,
    Danger,
    Neutral,
}

impl EnvelopeStatus {
    pub fn of(available: i64, budgeted: i64) -> Self {
        if available < 0 {
            Self::Danger
        } else if budgeted > 0 && available == 0 {
            Self::Neutral
        } else if budgeted > 0 && (available as i128) * 5 < budgeted as i128 {
            Self::Warning
        } else {
            Self::Success
        }
    }
}

/// Share of `budgeted` already spent, rounded and capped at 100.
pub fn progress_percent(activity: i64, budgeted: i64) -> i64 {
    if budgeted == 0 {
        return 0;
    }
    let percent = (activity as f64 / budgeted as f64 * 100.0 + 0.5).floor() as i64;
    percent.min(100)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLine {
    pub category: Category,
    pub budgeted: i64,
    pub activity: i64,
    pub available: i64,
    pub status: EnvelopeStatus,
    pub progress: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOverview {
    pub name: String,
    pub lines: Vec<CategoryLine>,
    pub budgeted: i64,
    pub activity: i64,
    pub available: i64,
}

/// The envelope table of one month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub month: Month,
    pub groups: Vec<GroupOverview>,
    /// See [`Snapshot::total_income`].
    pub total_income: i64,
    pub total_budgeted: i64,
    pub total_balance: i64,
    pub to_be_budgeted: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupActivity {
    pub name: String,
    pub activity: i64,
    /// `(category id, activity)` for categories with spending.
    pub categories: Vec<(i64, i64)>,
}

/// Income and spending of one month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthReport {
    pub month: Month,
    pub total_income: i64,
    pub total_expense: i64,
    pub groups: Vec<GroupActivity>,
}

impl MonthReport {
    pub fn net(&self) -> i64 {
        self.total_income - self.total_expense
    }
}

impl Snapshot {
    pub fn budget_account_ids(&self) -> HashSet<i64> {
        self.accounts
            .iter()
            .filter(|account| account.in_budget)
            .map(|account| account.id)
            .collect()
    }

    pub fn is_budget_account(&self, account_id: i64) -> bool {
        self.account(account_id)
            .is_some_and(|account| account.in_budget)
    }

    pub fn account(&self, id: i64) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn transaction(&self, id: i64) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    pub fn allocation(&self, category_id: i64, month: Month) -> Option<&BudgetAllocation> {
        self.budgets
            .iter()
            .find(|row| row.category_id == category_id && row.month == month)
    }

    /// Income booked on budget accounts during `month`. Opening and
    /// adjustment entries are not income.
    pub fn total_income(&self, month: Month) -> i64 {
        let budget_ids = self.budget_account_ids();
        self.transactions
            .iter()
            .filter(|tx| {
                tx.kind == TransactionKind::Income
                    && !tx.is_balance_entry()
                    && month.contains(tx.date)
                    && budget_ids.contains(&tx.account_id)
            })
            .map(|tx| tx.amount.abs())
            .sum()
    }

    pub fn total_budgeted(&self, month: Month) -> i64 {
        self.budgets
            .iter()
            .filter(|row| row.month == month)
            .map(|row| row.budgeted)
            .sum()
    }

    pub fn category_activity(&self, category_id: i64, month: Month) -> i64 {
        self.activity_where(category_id, |tx_month| tx_month == month)
    }

    pub fn category_activity_to_month(&self, category_id: i64, month: Month) -> i64 {
        self.activity_where(category_id, |tx_month| tx_month <= month)
    }

    pub fn category_budgeted_to_month(&self, category_id: i64, month: Month) -> i64 {
        self.budgets
            .iter()
            .filter(|row| row.category_id == category_id && row.month <= month)
            .map(|row| row.budgeted)
            .sum()
    }

    /// Running balance of the envelope at the end of `month`.
    pub fn category_available(&self, category_id: i64, month: Month) -> i64 {
        self.category_budgeted_to_month(category_id, month)
            - self.category_activity_to_month(category_id, month)
    }

    /// Groups in order of their first category by `sort_order`.
    pub fn category_groups(&self) -> Vec<CategoryGroup<'_>> {
        let mut ordered: Vec<&Category> = self.categories.iter().collect();
        ordered.sort_by_key(|category| category.sort_order);

        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
        for category in ordered {
            match groups
                .iter_mut()
                .find(|group| group.name == category.group)
            {
                Some(group) => group.categories.push(category),
                None => groups.push(CategoryGroup {
                    name: category.group.as_str(),
                    categories: vec![category],
                }),
            }
        }
        groups
    }

    /// Balance held by budget accounts.
    pub fn total_balance(&self) -> i64 {
        self.accounts
            .iter()
            .filter(|account| account.in_budget)
            .map(|account| account.balance)
            .sum()
    }

    pub fn total_available(&self, month: Month) -> i64 {
        self.categories
            .iter()
            .filter(|category| !category.is_income())
            .map(|category| self.category_available(category.id, month))
            .sum()
    }

    /// Cash in budget accounts not yet promised to any envelope.
    pub fn to_be_budgeted(&self, month: Month) -> i64 {
        self.total_balance() - self.total_available(month)
    }

    /// Balance of every account, tracking ones included.
    pub fn net_worth(&self) -> i64 {
        self.accounts.iter().map(|account| account.balance).sum()
    }

    /// Transactions grouped by date, newest date first.
    pub fn transactions_by_date(&self, account_id: Option<i64>) -> Vec<DateGroup<'_>> {
        let mut selected: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|tx| account_id.is_none_or(|id| tx.account_id == id))
            .collect();
        selected.sort_by_key(|tx| (std::cmp::Reverse(tx.date), tx.id));

        let mut groups: Vec<DateGroup<'_>> = Vec::new();
        for tx in selected {
            match groups.last_mut() {
                Some(group) if group.date == tx.date => group.transactions.push(tx),
                _ => groups.push(DateGroup {
                    date: tx.date,
                    transactions: vec![tx],
                }),
            }
        }
        groups
    }

    pub fn budget_overview(&self, month: Month) -> BudgetOverview {
        let groups = self
            .category_groups()
            .into_iter()
            .filter(|group| {
                group
                    .categories
                    .first()
                    .is_some_and(|category| !category.is_income())
            })
            .map(|group| {
                let lines: Vec<CategoryLine> = group
                    .categories
                    .iter()
                    .map(|category| {
                        let budgeted = self
                            .allocation(category.id, month)
                            .map_or(0, |row| row.budgeted);
                        let activity = self.category_activity(category.id, month);
                        let available = self.category_available(category.id, month);
                        CategoryLine {
                            category: (*category).clone(),
                            budgeted,
                            activity,
                            available,
                            status: EnvelopeStatus::of(available, budgeted),
                            progress: progress_percent(activity, budgeted),
                        }
                    })
                    .collect();
                GroupOverview {
                    name: group.name.to_string(),
                    budgeted: lines.iter().map(|line| line.budgeted).sum(),
                    activity: lines.iter().map(|line| line.activity).sum(),
                    available: lines.iter().map(|line| line.available).sum(),
                    lines,
                }
            })
            .collect();

        BudgetOverview {
            month,
            groups,
            total_income: self.total_income(month),
            total_budgeted: self.total_budgeted(month),
            total_balance: self.total_balance(),
            to_be_budgeted: self.to_be_budgeted(month),
        }
    }

    /// Income and spending of `month` across every account, plus envelope
    /// spending per group. Opening and adjustment entries are left out.
    pub fn month_report(&self, month: Month) -> MonthReport {
        let in_month: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|tx| month.contains(tx.date) && !tx.is_balance_entry())
            .collect();
        let total_expense = in_month
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Expense)
            .map(|tx| tx.amount.abs())
            .sum();
        let total_income = in_month
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Income)
            .map(|tx| tx.amount)
            .sum();

        let groups = self
            .category_groups()
            .into_iter()
            .filter(|group| group.name != crate::INCOME_GROUP)
            .filter_map(|group| {
                let categories: Vec<(i64, i64)> = group
                    .categories
                    .iter()
                    .map(|category| (category.id, self.category_activity(category.id, month)))
                    .filter(|(_, activity)| *activity != 0)
                    .collect();
                let activity: i64 = categories.iter().map(|(_, activity)| activity).sum();
                (activity != 0).then(|| GroupActivity {
                    name: group.name.to_string(),
                    activity,
                    categories,
                })
            })
            .collect();

        MonthReport {
            month,
            total_income,
            total_expense,
            groups,
        }
    }

    fn activity_where(&self, category_id: i64, in_range: impl Fn(Month) -> bool) -> i64 {
        let budget_ids = self.budget_account_ids();
        self.transactions
            .iter()
            .filter(|tx| {
                tx.kind == TransactionKind::Expense
                    && tx.category_id == Some(category_id)
                    && budget_ids.contains(&tx.account_id)
                    && in_range(Month::of_date(tx.date))
            })
            .map(|tx| tx.amount.abs())
            .sum()
    }
}
