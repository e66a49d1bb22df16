//! Delete command handlers.

use crate::args::DeleteIdsArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};

/// Deletes one or more transactions by ID atomically.
///
/// This operation is all-or-nothing: either all specified transactions are deleted, or none are.
/// If any transaction ID is not found, the entire operation is rolled back.
pub async fn delete_transactions(config: Config, args: DeleteIdsArgs) -> Result<Out<Vec<String>>> {
    let deleted = config
        .db()
        .delete_transactions(&args.ids)
        .await
        .pub_result(ErrorType::Database)?;

    let count = deleted.len();
    let message = format!(
        "Deleted {} transaction{}",
        count,
        if count == 1 { "" } else { "s" }
    );
    Ok(Out::new(message, deleted))
}

/// Deletes one or more categories by ID atomically.
///
/// This operation is all-or-nothing: either all specified categories are deleted, or none are.
/// Transactions that were filed under a deleted category keep its id and are reported as
/// "Uncategorized".
pub async fn delete_categories(config: Config, args: DeleteIdsArgs) -> Result<Out<Vec<String>>> {
    let deleted = config
        .db()
        .delete_categories(&args.ids)
        .await
        .pub_result(ErrorType::Database)?;

    let mut orphaned = 0;
    for id in &deleted {
        orphaned += config
            .db()
            .transactions_by_category(id)
            .await
            .pub_result(ErrorType::Database)?
            .len();
    }

    let count = deleted.len();
    let mut message = format!(
        "Deleted {} categor{}",
        count,
        if count == 1 { "y" } else { "ies" }
    );
    if orphaned > 0 {
        message.push_str(&format!(
            ", {orphaned} transaction{} will show as uncategorized",
            if orphaned == 1 { "" } else { "s" }
        ));
    }
    Ok(Out::new(message, deleted))
}
