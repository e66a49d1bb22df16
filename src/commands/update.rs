//! Update command handlers.

use crate::args::{UpdateCategoryArgs, UpdateTransactionArgs};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{normalize_category, Category, Transaction};
use crate::{Config, Result};
use anyhow::{anyhow, ensure};

/// Updates a transaction by ID. Fields that are not given keep their current values.
///
/// # Returns
///
/// On success, returns an `Out` containing the updated `Transaction`.
///
/// # Errors
///
/// - Returns an `Input` error if the transaction does not exist or the new amount is not greater
///   than zero.
/// - Returns a `Database` error if a database operation fails.
pub async fn update_transaction(
    config: Config,
    args: UpdateTransactionArgs,
) -> Result<Out<Transaction>> {
    let mut transaction = config
        .db()
        .get_transaction(&args.id)
        .await
        .pub_result(ErrorType::Database)?
        .ok_or_else(|| anyhow!("Transaction '{}' not found", args.id))
        .pub_result(ErrorType::Input)?;

    apply_transaction_updates(&mut transaction, args).pub_result(ErrorType::Input)?;

    config
        .db()
        .update_transaction(&transaction)
        .await
        .pub_result(ErrorType::Database)?;
    let message = format!("Updated transaction {}", transaction.id());
    Ok(Out::new(message, transaction))
}

fn apply_transaction_updates(t: &mut Transaction, args: UpdateTransactionArgs) -> Res<()> {
    if let Some(amount) = args.amount {
        ensure!(
            amount.is_positive(),
            "A transaction amount must be greater than zero, got {amount}"
        );
        t.amount = amount;
    }
    if let Some(r#type) = args.r#type {
        t.r#type = r#type;
    }
    if args.category.is_some() {
        t.category = normalize_category(args.category);
    }
    if let Some(date) = args.date {
        t.date = date;
    }
    if let Some(notes) = args.notes {
        t.notes = Some(notes).filter(|n| !n.trim().is_empty());
    }
    if args.no_recurrence {
        t.recurrence = None;
    } else if args.recurrence.is_some() {
        t.recurrence = args.recurrence;
    }
    Ok(())
}

/// Updates a category by ID. Fields that are not given keep their current values. The id itself
/// cannot be changed since transactions refer to it.
///
/// # Errors
///
/// - Returns an `Input` error if the category does not exist or the new name is empty.
/// - Returns a `Database` error if a database operation fails.
pub async fn update_category(config: Config, args: UpdateCategoryArgs) -> Result<Out<Category>> {
    let mut category = config
        .db()
        .get_category(&args.id)
        .await
        .pub_result(ErrorType::Database)?
        .ok_or_else(|| anyhow!("Category '{}' not found", args.id))
        .pub_result(ErrorType::Input)?;

    if let Some(name) = args.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow!("A category name cannot be empty")).pub_result(ErrorType::Input);
        }
        category.name = name.to_string();
    }
    if let Some(color) = args.color {
        category.color = color;
    }
    if let Some(icon) = args.icon {
        category.icon = Some(icon).filter(|i| !i.trim().is_empty());
    }

    config
        .db()
        .update_category(&category)
        .await
        .pub_result(ErrorType::Database)?;
    let message = format!("Updated category {}", category.id());
    Ok(Out::new(message, category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Recurrence, TransactionType};
    use crate::test::TestEnv;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn no_changes(id: &str) -> UpdateTransactionArgs {
        UpdateTransactionArgs {
            id: id.to_string(),
            amount: None,
            r#type: None,
            category: None,
            date: None,
            notes: None,
            recurrence: None,
            no_recurrence: false,
        }
    }

    #[tokio::test]
    async fn test_update_transaction_fields() {
        let env = TestEnv::new().await;
        let t = env
            .insert_transaction(TransactionType::Expense, "20", Some("food"), "2024-06-01")
            .await;

        let args = UpdateTransactionArgs {
            amount: Some(Amount::from_str("25.50").unwrap()),
            r#type: Some(TransactionType::Income),
            category: Some(String::new()),
            recurrence: Some(Recurrence::Monthly),
            ..no_changes(t.id())
        };
        let out = update_transaction(env.config(), args).await.unwrap();
        let updated = out.structure().unwrap();
        assert_eq!(updated.amount().value(), Decimal::from_str("25.50").unwrap());
        assert_eq!(updated.r#type(), TransactionType::Income);
        assert_eq!(updated.category(), None);
        assert_eq!(updated.date(), t.date());

        let stored = env.config().db().get_transaction(t.id()).await.unwrap().unwrap();
        assert_eq!(stored.recurrence(), Some(Recurrence::Monthly));

        let args = UpdateTransactionArgs {
            no_recurrence: true,
            ..no_changes(t.id())
        };
        let out = update_transaction(env.config(), args).await.unwrap();
        assert_eq!(out.structure().unwrap().recurrence(), None);
    }

    #[tokio::test]
    async fn test_update_transaction_not_found() {
        let env = TestEnv::new().await;
        let err = update_transaction(env.config(), no_changes("txn-missing"))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Input);
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_update_transaction_rejects_zero_amount() {
        let env = TestEnv::new().await;
        let t = env
            .insert_transaction(TransactionType::Expense, "20", None, "2024-06-01")
            .await;
        let args = UpdateTransactionArgs {
            amount: Some(Amount::from_str("0").unwrap()),
            ..no_changes(t.id())
        };
        let err = update_transaction(env.config(), args).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Input);
    }

    #[tokio::test]
    async fn test_update_category() {
        let env = TestEnv::new().await;
        env.insert_category("food", "Food").await;
        let args = UpdateCategoryArgs {
            id: "food".to_string(),
            name: Some("Groceries".to_string()),
            color: None,
            icon: Some("cart".to_string()),
        };
        let out = update_category(env.config(), args).await.unwrap();
        let updated = out.structure().unwrap();
        assert_eq!(updated.name(), "Groceries");
        assert_eq!(updated.color(), "#FF6B6B");
        assert_eq!(updated.icon(), Some("cart"));

        let args = UpdateCategoryArgs {
            id: "nope".to_string(),
            name: None,
            color: None,
            icon: None,
        };
        let err = update_category(env.config(), args).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Input);
    }
}
