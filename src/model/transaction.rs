use crate::error::Res;
use crate::model::Amount;
use anyhow::ensure;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Whether money came in or went out.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// How often a transaction repeats. This is informational; nothing is scheduled from it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

serde_plain::derive_display_from_serialize!(Recurrence);
serde_plain::derive_fromstr_from_deserialize!(Recurrence);

/// A single income or expense record in the ledger.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub(crate) id: String,
    pub(crate) amount: Amount,
    #[serde(rename = "type")]
    pub(crate) r#type: TransactionType,
    /// The raw category identifier. `None` when the transaction has no category.
    pub(crate) category: Option<String>,
    pub(crate) date: NaiveDate,
    pub(crate) notes: Option<String>,
    pub(crate) recurrence: Option<Recurrence>,
    pub(crate) created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new transaction with a freshly generated id and `created_at` of now.
    ///
    /// # Errors
    /// - Returns an error if `amount` is not greater than zero.
    pub fn new(
        amount: Amount,
        r#type: TransactionType,
        category: Option<String>,
        date: NaiveDate,
    ) -> Res<Self> {
        ensure!(
            amount.is_positive(),
            "A transaction amount must be greater than zero, got {amount}"
        );
        Ok(Self {
            id: crate::utils::generate_transaction_id(),
            amount,
            r#type,
            category: normalize_category(category),
            date,
            notes: None,
            recurrence: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn with_recurrence(mut self, recurrence: Option<Recurrence>) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn r#type(&self) -> TransactionType {
        self.r#type
    }

    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn recurrence(&self) -> Option<Recurrence> {
        self.recurrence
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Treats an empty or whitespace-only category the same as no category.
pub(crate) fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    #[test]
    fn test_new_rejects_non_positive_amounts() {
        let zero = Amount::from_str("0").unwrap();
        let negative = Amount::from_str("-5").unwrap();
        let d = date("2024-01-05");
        assert!(Transaction::new(zero, TransactionType::Expense, None, d).is_err());
        assert!(Transaction::new(negative, TransactionType::Income, None, d).is_err());
    }

    #[test]
    fn test_empty_category_is_absent() {
        let t = Transaction::new(
            Amount::from_str("5").unwrap(),
            TransactionType::Expense,
            Some("  ".to_string()),
            date("2024-01-05"),
        )
        .unwrap();
        assert_eq!(t.category(), None);
        assert!(t.id().starts_with("txn-"));
    }

    #[test]
    fn test_transaction_type_strings() {
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(
            TransactionType::from_str("expense").unwrap(),
            TransactionType::Expense
        );
        assert!(TransactionType::from_str("transfer").is_err());
        assert_eq!(Recurrence::from_str("monthly").unwrap(), Recurrence::Monthly);
    }

    #[test]
    fn test_serializes_type_field() {
        let t = Transaction::new(
            Amount::from_str("12.50").unwrap(),
            TransactionType::Income,
            Some("salary".to_string()),
            date("2024-03-01"),
        )
        .unwrap()
        .with_notes(Some("March".to_string()));
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["date"], "2024-03-01");
        assert_eq!(json["notes"], "March");
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }
}
