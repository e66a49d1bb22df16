//! Insert command handlers.

use crate::args::{InsertCategoryArgs, InsertTransactionArgs};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::{Category, Transaction};
use crate::utils::generate_category_id;
use crate::{Config, Result};
use anyhow::anyhow;
use chrono::Local;
use tracing::warn;

/// Inserts a new transaction into the local SQLite database.
///
/// A unique transaction ID with a `txn-` prefix is generated and returned on success. When no
/// date is given the transaction is dated today in the local time zone.
///
/// A category id that does not exist is accepted with a warning. Such transactions are shown as
/// "Uncategorized" until the category is created.
///
/// # Errors
///
/// - Returns an `Input` error if the amount is not greater than zero.
/// - Returns a `Database` error if a database operation fails.
pub async fn insert_transaction(
    config: Config,
    args: InsertTransactionArgs,
) -> Result<Out<String>> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let transaction = Transaction::new(args.amount, args.r#type, args.category, date)
        .pub_result(ErrorType::Input)?
        .with_notes(args.notes)
        .with_recurrence(args.recurrence);

    if let Some(category) = transaction.category() {
        let known = config
            .db()
            .get_category(category)
            .await
            .pub_result(ErrorType::Database)?;
        if known.is_none() {
            warn!(
                "Category '{category}' does not exist, the transaction will show as uncategorized"
            );
        }
    }

    config
        .db()
        .insert_transaction(&transaction)
        .await
        .pub_result(ErrorType::Database)?;

    let id = transaction.id().to_string();
    let message = format!(
        "Inserted {} of {} on {} with ID: {id}",
        transaction.r#type(),
        transaction.amount().with_format(config.amount_format()),
        transaction.date()
    );
    Ok(Out::new(message, id))
}

/// Inserts a new category into the local SQLite database and returns its id.
///
/// # Errors
///
/// - Returns an `Input` error if the name is empty.
/// - Returns a `Database` error if a category with the same id already exists.
pub async fn insert_category(config: Config, args: InsertCategoryArgs) -> Result<Out<String>> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(anyhow!("A category name cannot be empty")).pub_result(ErrorType::Input);
    }
    let id = match args.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate_category_id(name),
    };
    let category = Category::new(id.clone(), name, args.color, args.icon);

    config
        .db()
        .insert_category(&category)
        .await
        .pub_result(ErrorType::Database)?;

    Ok(Out::new(format!("Inserted category '{name}' with ID: {id}"), id))
}
