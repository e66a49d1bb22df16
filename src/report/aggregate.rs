//! Reductions of a transaction list into totals.
//!
//! These functions do no filtering by date; callers pass the transactions for the range they are
//! interested in. Sums are exact `Decimal` arithmetic.

use crate::model::{Amount, Transaction, TransactionType};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The total expense recorded against one raw category id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// `None` groups every transaction that has no category.
    pub category: Option<String>,
    pub total: Amount,
}

/// Income and expense for a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// The day formatted as `YYYY-MM-DD`.
    pub date: String,
    pub income: Amount,
    pub expense: Amount,
}

impl DailyTotal {
    pub fn net(&self) -> Amount {
        self.income - self.expense
    }
}

/// Income and expense for one month of a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// 0 for January through 11 for December.
    pub month: u32,
    pub income: Amount,
    pub expense: Amount,
}

impl MonthlyTotal {
    pub fn net(&self) -> Amount {
        self.income - self.expense
    }
}

/// Overall income, expense and the resulting balance.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub income: Amount,
    pub expense: Amount,
    pub balance: Amount,
}

/// Sums expenses per category. Income never contributes, and a category that only has income
/// does not appear. Categories are listed in the order they were first seen.
pub fn totals_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        let key = t.category();
        match index.get(&key) {
            Some(&ix) => totals[ix].total += t.amount(),
            None => {
                index.insert(key, totals.len());
                totals.push(CategoryTotal {
                    category: key.map(str::to_string),
                    total: Amount::ZERO + t.amount(),
                });
            }
        }
    }
    totals
}

/// Sums income and expense per calendar day, in the order each day is first seen.
pub fn daily_totals(transactions: &[Transaction]) -> Vec<DailyTotal> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<DailyTotal> = Vec::new();
    for t in transactions {
        let date = t.date().format("%Y-%m-%d").to_string();
        let ix = match index.get(&date) {
            Some(&ix) => ix,
            None => {
                let ix = totals.len();
                index.insert(date.clone(), ix);
                totals.push(DailyTotal {
                    date,
                    income: Amount::ZERO,
                    expense: Amount::ZERO,
                });
                ix
            }
        };
        let bucket = &mut totals[ix];
        match t.r#type() {
            TransactionType::Income => bucket.income += t.amount(),
            TransactionType::Expense => bucket.expense += t.amount(),
        }
    }
    totals
}

/// Sums income and expense for each month of `year`. The result always has twelve entries, in
/// month order, even when there is no data. Transactions from other years are ignored.
pub fn monthly_totals(transactions: &[Transaction], year: i32) -> [MonthlyTotal; 12] {
    let mut totals: [MonthlyTotal; 12] = std::array::from_fn(|month| MonthlyTotal {
        month: month as u32,
        income: Amount::ZERO,
        expense: Amount::ZERO,
    });
    for t in transactions.iter().filter(|t| t.date().year() == year) {
        let bucket = &mut totals[t.date().month0() as usize];
        match t.r#type() {
            TransactionType::Income => bucket.income += t.amount(),
            TransactionType::Expense => bucket.expense += t.amount(),
        }
    }
    totals
}

/// Totals all income and expense and computes `balance = income - expense`.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let income: Amount = transactions
        .iter()
        .filter(|t| t.is_income())
        .map(Transaction::amount)
        .sum();
    let expense: Amount = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(Transaction::amount)
        .sum();
    Summary {
        income,
        expense,
        balance: income - expense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionType::{Expense, Income};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn txn(
        r#type: TransactionType,
        amount: &str,
        category: Option<&str>,
        date: &str,
    ) -> Transaction {
        Transaction::new(
            Amount::from_str(amount).unwrap(),
            r#type,
            category.map(str::to_string),
            NaiveDate::from_str(date).unwrap(),
        )
        .unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_category_totals_exclude_income() {
        let transactions = vec![
            txn(Expense, "100", Some("catA"), "2024-01-05"),
            txn(Income, "500", Some("catA"), "2024-01-05"),
        ];
        let totals = totals_by_category(&transactions);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].category.as_deref(), Some("catA"));
        assert_eq!(totals[0].total.value(), dec("100"));
    }

    #[test]
    fn test_category_totals_keep_first_seen_order() {
        let transactions = vec![
            txn(Expense, "5", Some("zeta"), "2024-02-03"),
            txn(Income, "900", Some("salary"), "2024-02-02"),
            txn(Expense, "7.25", None, "2024-02-02"),
            txn(Expense, "10", Some("alpha"), "2024-02-01"),
            txn(Expense, "2.75", None, "2024-02-01"),
            txn(Expense, "1", Some("zeta"), "2024-02-01"),
        ];
        let totals = totals_by_category(&transactions);
        let keys: Vec<Option<&str>> = totals.iter().map(|t| t.category.as_deref()).collect();
        assert_eq!(keys, vec![Some("zeta"), None, Some("alpha")]);
        assert_eq!(totals[0].total.value(), dec("6"));
        assert_eq!(totals[1].total.value(), dec("10.00"));
        assert_eq!(totals[2].total.value(), dec("10"));
    }

    #[test]
    fn test_category_totals_empty() {
        assert!(totals_by_category(&[]).is_empty());
    }

    #[test]
    fn test_daily_totals_share_a_bucket() {
        let transactions = vec![
            txn(Expense, "50", Some("food"), "2024-01-05"),
            txn(Income, "30", None, "2024-01-05"),
        ];
        let totals = daily_totals(&transactions);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].date, "2024-01-05");
        assert_eq!(totals[0].income.value(), dec("30"));
        assert_eq!(totals[0].expense.value(), dec("50"));
        assert_eq!(totals[0].net().value(), dec("-20"));
    }

    #[test]
    fn test_daily_totals_are_not_sorted() {
        // The ledger returns newest first, and the buckets follow that order.
        let transactions = vec![
            txn(Expense, "1", None, "2024-03-10"),
            txn(Expense, "2", None, "2024-03-01"),
            txn(Income, "3", None, "2024-03-10"),
        ];
        let dates: Vec<String> = daily_totals(&transactions)
            .into_iter()
            .map(|d| d.date)
            .collect();
        assert_eq!(dates, vec!["2024-03-10", "2024-03-01"]);
    }

    #[test]
    fn test_monthly_totals_are_dense() {
        let totals = monthly_totals(&[], 2024);
        assert_eq!(totals.len(), 12);
        for (ix, m) in totals.iter().enumerate() {
            assert_eq!(m.month as usize, ix);
            assert!(m.income.is_zero());
            assert!(m.expense.is_zero());
        }
    }

    #[test]
    fn test_monthly_totals_bucket_by_month() {
        let transactions = vec![
            txn(Income, "3000", None, "2024-12-31"),
            txn(Expense, "40", Some("food"), "2024-12-01"),
            txn(Expense, "60", Some("fuel"), "2024-01-01"),
            txn(Income, "10", None, "2024-01-31"),
        ];
        let totals = monthly_totals(&transactions, 2024);
        assert_eq!(totals[0].income.value(), dec("10"));
        assert_eq!(totals[0].expense.value(), dec("60"));
        assert_eq!(totals[11].income.value(), dec("3000"));
        assert_eq!(totals[11].expense.value(), dec("40"));
        assert!(totals[5].income.is_zero());
        assert_eq!(totals[11].net().value(), dec("2960"));
    }

    #[test]
    fn test_monthly_totals_ignore_other_years() {
        let transactions = vec![
            txn(Expense, "100", None, "2023-03-15"),
            txn(Expense, "25", None, "2024-03-15"),
        ];
        let totals = monthly_totals(&transactions, 2024);
        assert_eq!(totals[2].expense.value(), dec("25"));
    }

    #[test]
    fn test_summary_balance() {
        let transactions = vec![
            txn(Income, "1200.50", None, "2024-05-01"),
            txn(Expense, "200.25", Some("rent"), "2024-05-02"),
            txn(Expense, "0.25", Some("fees"), "2024-05-03"),
        ];
        let summary = summarize(&transactions);
        assert_eq!(summary.income.value(), dec("1200.50"));
        assert_eq!(summary.expense.value(), dec("200.50"));
        assert_eq!(summary.balance.value(), dec("1000.00"));
        assert_eq!(summarize(&[]), Summary::default());
    }
}
