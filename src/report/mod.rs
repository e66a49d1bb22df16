//! Income and expense reporting over the ledger.
//!
//! The `aggregate` functions are pure and operate on a slice of transactions. `Report` ties them
//! to a `Ledger`, which supplies the transactions for a date range, and resolves category ids to
//! display names.

mod aggregate;
mod range;

pub use aggregate::{
    daily_totals, monthly_totals, summarize, totals_by_category, CategoryTotal, DailyTotal,
    MonthlyTotal, Summary,
};
pub use range::{DateRange, Timeframe};

use crate::error::Res;
use crate::model::{Amount, AmountFormat, Categories, Category, Transaction};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A source of transactions and categories.
///
/// Implementations must return every transaction whose date falls within the range, inclusive of
/// both ends, ordered newest first.
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    async fn fetch_transactions_in_range(&self, range: DateRange) -> Res<Vec<Transaction>>;

    async fn fetch_categories(&self) -> Res<Vec<Category>>;
}

/// A category total with its display name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLine {
    pub category: Option<String>,
    pub name: String,
    pub color: Option<String>,
    pub total: Amount,
}

/// Everything needed to render the reports screen for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub range: DateRange,
    pub year: i32,
    pub summary: Summary,
    pub categories: Vec<CategoryLine>,
    /// Daily totals in chronological order.
    pub daily: Vec<DailyTotal>,
    pub monthly: Vec<MonthlyTotal>,
}

impl Report {
    /// Fetches the transactions in `range` for the summary, category and daily totals, and the
    /// transactions of `year`, a whole calendar year from `DateRange::year`, for the monthly totals.
    pub async fn build(ledger: &dyn Ledger, range: DateRange, year: DateRange) -> Res<Self> {
        let transactions = ledger.fetch_transactions_in_range(range).await?;
        debug!("Building a report over {} transactions", transactions.len());
        let categories = Categories::new(ledger.fetch_categories().await?);

        let year_transactions = ledger.fetch_transactions_in_range(year).await?;
        let year = year.start().year();

        let mut daily = daily_totals(&transactions);
        daily.sort_by(|a, b| a.date.cmp(&b.date));

        Ok(Self {
            range,
            year,
            summary: summarize(&transactions),
            categories: category_lines(&totals_by_category(&transactions), &categories),
            daily,
            monthly: monthly_totals(&year_transactions, year).to_vec(),
        })
    }

    /// Rewrites every amount in the report with `format`.
    pub fn with_format(mut self, format: AmountFormat) -> Self {
        let f = |a: &mut Amount| *a = a.with_format(format);
        f(&mut self.summary.income);
        f(&mut self.summary.expense);
        f(&mut self.summary.balance);
        for line in &mut self.categories {
            f(&mut line.total);
        }
        for d in &mut self.daily {
            f(&mut d.income);
            f(&mut d.expense);
        }
        for m in &mut self.monthly {
            f(&mut m.income);
            f(&mut m.expense);
        }
        self
    }
}

fn category_lines(totals: &[CategoryTotal], categories: &Categories) -> Vec<CategoryLine> {
    totals
        .iter()
        .map(|t| {
            let id = t.category.as_deref();
            CategoryLine {
                category: t.category.clone(),
                name: categories.name_for(id).to_string(),
                color: id
                    .and_then(|id| categories.get(id))
                    .map(|c| c.color().to_string()),
                total: t.total,
            }
        })
        .collect()
}

/// An in-memory `Ledger` for tests.
#[cfg(test)]
pub(crate) struct MemoryLedger {
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) categories: Vec<Category>,
}

#[cfg(test)]
#[async_trait::async_trait]
impl Ledger for MemoryLedger {
    async fn fetch_transactions_in_range(&self, range: DateRange) -> Res<Vec<Transaction>> {
        let mut found: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| range.contains(t.date()))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(found)
    }

    async fn fetch_categories(&self) -> Res<Vec<Category>> {
        Ok(self.categories.clone())
    }
}
