//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod category;
mod history;
mod transaction;

pub use amount::{Amount, AmountError, AmountFormat};
pub use category::{Categories, Category, UNCATEGORIZED};
pub use history::HistoryEntry;
pub(crate) use transaction::normalize_category;
pub use transaction::{Recurrence, Transaction, TransactionType};
