//! This module is responsible for reading, writing and managing the SQLite database.
//!
//! The database holds the ledger (transactions and categories) and the saved calculator history.
//! Amounts are stored as plain decimal strings and dates as ISO-8601 strings, so date range
//! queries can compare the `date` column lexically.

mod migrations;

use crate::calc::{Calculation, CalculatorKind};
use crate::error::Res;
use crate::model::{Amount, Category, HistoryEntry, Recurrence, Transaction, TransactionType};
use crate::report::{DateRange, Ledger};
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

const TRANSACTION_COLUMNS: &str = "id, amount, type, category, date, notes, recurrence, created_at";

#[derive(Debug, Clone)]
pub(crate) struct Db {
    pool: SqlitePool,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the schema
    pub(crate) async fn init(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A database already exists at '{}'", path.display());
        }
        let pool = connect(path, true).await?;
        migrations::bootstrap(&pool).await?;
        migrations::run(&pool, 0, migrations::CURRENT_VERSION).await?;
        debug!("Created database at {}", path.display());
        Ok(Self { pool })
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Upgrades the schema if it is out of date
    pub(crate) async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The database file is missing '{}'", path.display());
        }
        let pool = connect(path, false).await?;
        let version = migrations::version(&pool).await?;
        if version > migrations::CURRENT_VERSION {
            bail!(
                "The database schema is version {version} but this program only understands up \
                to version {}. Is a newer version of pilot available?",
                migrations::CURRENT_VERSION
            );
        }
        migrations::run(&pool, version, migrations::CURRENT_VERSION).await?;
        Ok(Self { pool })
    }

    // ---------------------------------------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------------------------------------

    pub(crate) async fn insert_transaction(&self, t: &Transaction) -> Res<()> {
        self.insert_transactions(std::slice::from_ref(t)).await?;
        Ok(())
    }

    /// Inserts all of `transactions` or none of them.
    pub(crate) async fn insert_transactions(&self, transactions: &[Transaction]) -> Res<usize> {
        let mut tx = self.pool.begin().await?;
        for t in transactions {
            trace!("Inserting transaction {}", t.id());
            sqlx::query(
                "INSERT INTO transactions \
                (id, amount, type, category, date, notes, recurrence, created_at) \
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(t.id())
            .bind(t.amount().value().to_string())
            .bind(t.r#type().to_string())
            .bind(t.category())
            .bind(t.date().to_string())
            .bind(t.notes())
            .bind(t.recurrence().map(|r| r.to_string()))
            .bind(t.created_at().to_rfc3339())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert transaction {}", t.id()))?;
        }
        tx.commit().await?;
        Ok(transactions.len())
    }

    pub(crate) async fn get_transaction(&self, id: &str) -> Res<Option<Transaction>> {
        let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?");
        let row: Option<TransactionRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch transaction {id}"))?;
        row.map(Transaction::try_from).transpose()
    }

    /// Overwrites the stored transaction that has the same id as `t`.
    pub(crate) async fn update_transaction(&self, t: &Transaction) -> Res<()> {
        let result = sqlx::query(
            "UPDATE transactions SET amount = ?, type = ?, category = ?, date = ?, notes = ?, \
            recurrence = ? WHERE id = ?",
        )
        .bind(t.amount().value().to_string())
        .bind(t.r#type().to_string())
        .bind(t.category())
        .bind(t.date().to_string())
        .bind(t.notes())
        .bind(t.recurrence().map(|r| r.to_string()))
        .bind(t.id())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to update transaction {}", t.id()))?;
        if result.rows_affected() == 0 {
            bail!("Transaction '{}' not found", t.id());
        }
        Ok(())
    }

    /// Deletes every id in `ids`, or nothing if any of them does not exist.
    pub(crate) async fn delete_transactions(&self, ids: &[String]) -> Res<Vec<String>> {
        self.delete_by_id("transactions", "Transaction", ids).await
    }

    /// Returns the transactions dated within `range`, newest first.
    pub(crate) async fn transactions_in_range(&self, range: DateRange) -> Res<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE date >= ? AND date <= ? \
            ORDER BY date DESC, created_at DESC"
        );
        let rows: Vec<TransactionRow> = sqlx::query_as(&sql)
            .bind(range.start().to_string())
            .bind(range.end().to_string())
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch transactions from {range}"))?;
        rows.into_iter().map(Transaction::try_from).collect()
    }

    /// Returns the transactions in the given category, newest first.
    pub(crate) async fn transactions_by_category(&self, category: &str) -> Res<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE category = ? \
            ORDER BY date DESC, created_at DESC"
        );
        let rows: Vec<TransactionRow> = sqlx::query_as(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch transactions in category {category}"))?;
        rows.into_iter().map(Transaction::try_from).collect()
    }

    // ---------------------------------------------------------------------------------------------
    // Categories
    // ---------------------------------------------------------------------------------------------

    pub(crate) async fn insert_category(&self, c: &Category) -> Res<()> {
        sqlx::query("INSERT INTO categories (id, name, color, icon) VALUES (?, ?, ?, ?)")
            .bind(c.id())
            .bind(c.name())
            .bind(c.color())
            .bind(c.icon())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to insert category {}", c.id()))?;
        Ok(())
    }

    pub(crate) async fn get_category(&self, id: &str) -> Res<Option<Category>> {
        let row: Option<CategoryRow> =
            sqlx::query_as("SELECT id, name, color, icon FROM categories WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Failed to fetch category {id}"))?;
        Ok(row.map(Category::from))
    }

    pub(crate) async fn update_category(&self, c: &Category) -> Res<()> {
        let result = sqlx::query("UPDATE categories SET name = ?, color = ?, icon = ? WHERE id = ?")
            .bind(c.name())
            .bind(c.color())
            .bind(c.icon())
            .bind(c.id())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to update category {}", c.id()))?;
        if result.rows_affected() == 0 {
            bail!("Category '{}' not found", c.id());
        }
        Ok(())
    }

    /// Deletes categories atomically. Transactions that referenced them are left as they are and
    /// will be reported as uncategorized.
    pub(crate) async fn delete_categories(&self, ids: &[String]) -> Res<Vec<String>> {
        self.delete_by_id("categories", "Category", ids).await
    }

    pub(crate) async fn categories(&self) -> Res<Vec<Category>> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, name, color, icon FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .context("Failed to fetch categories")?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    // ---------------------------------------------------------------------------------------------
    // Calculator history
    // ---------------------------------------------------------------------------------------------

    /// Saves `entry` and trims the history of its kind to the newest `limit` entries.
    pub(crate) async fn save_calculation(&self, entry: &HistoryEntry, limit: u32) -> Res<()> {
        let kind = entry.kind().to_string();
        let payload =
            serde_json::to_string(entry.calculation()).context("Unable to serialize result")?;
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO calculations (id, kind, calculated_at, payload) VALUES (?, ?, ?, ?)",
        )
        .bind(entry.id())
        .bind(&kind)
        .bind(entry.calculated_at().to_rfc3339())
        .bind(&payload)
        .execute(&mut *tx)
        .await
        .context("Failed to save calculation")?;

        let evicted = sqlx::query(
            "DELETE FROM calculations WHERE kind = ? AND id NOT IN \
            (SELECT id FROM calculations WHERE kind = ? \
            ORDER BY calculated_at DESC, rowid DESC LIMIT ?)",
        )
        .bind(&kind)
        .bind(&kind)
        .bind(i64::from(limit))
        .execute(&mut *tx)
        .await
        .context("Failed to trim calculation history")?
        .rows_affected();
        tx.commit().await?;
        if evicted > 0 {
            debug!("Dropped {evicted} old {kind} calculation(s) from history");
        }
        Ok(())
    }

    /// Returns the saved calculations of `kind`, newest first.
    pub(crate) async fn history(&self, kind: CalculatorKind) -> Res<Vec<HistoryEntry>> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT id, calculated_at, payload FROM calculations WHERE kind = ? \
            ORDER BY calculated_at DESC, rowid DESC",
        )
        .bind(kind.to_string())
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to fetch {kind} history"))?;
        rows.into_iter()
            .map(|(id, calculated_at, payload)| {
                let calculated_at = parse_timestamp(&calculated_at)?;
                let calculation: Calculation = serde_json::from_str(&payload)
                    .with_context(|| format!("Calculation {id} has an unreadable payload"))?;
                Ok(HistoryEntry::from_parts(id, calculated_at, calculation))
            })
            .collect()
    }

    /// Removes all saved calculations of `kind` and returns how many were removed.
    pub(crate) async fn clear_history(&self, kind: CalculatorKind) -> Res<u64> {
        let result = sqlx::query("DELETE FROM calculations WHERE kind = ?")
            .bind(kind.to_string())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to clear {kind} history"))?;
        Ok(result.rows_affected())
    }

    // ---------------------------------------------------------------------------------------------

    async fn delete_by_id(&self, table: &str, noun: &str, ids: &[String]) -> Res<Vec<String>> {
        let sql = format!("DELETE FROM {table} WHERE id = ?");
        let mut tx = self.pool.begin().await?;
        for id in ids {
            let result = sqlx::query(&sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to delete {id} from {table}"))?;
            if result.rows_affected() == 0 {
                // Dropping `tx` rolls back the deletes made so far.
                bail!("{noun} '{id}' not found");
            }
        }
        tx.commit().await?;
        Ok(ids.to_vec())
    }
}

#[async_trait::async_trait]
impl Ledger for Db {
    async fn fetch_transactions_in_range(&self, range: DateRange) -> Res<Vec<Transaction>> {
        self.transactions_in_range(range).await
    }

    async fn fetch_categories(&self) -> Res<Vec<Category>> {
        self.categories().await
    }
}

async fn connect(path: &Path, create: bool) -> Res<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .context("Failed to parse SQLite connection string")?
        .create_if_missing(create);
    SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open SQLite database at {}", path.display()))
}

fn parse_timestamp(s: &str) -> Res<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid timestamp '{s}'"))?
        .with_timezone(&Utc))
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: String,
    amount: String,
    #[sqlx(rename = "type")]
    kind: String,
    category: Option<String>,
    date: String,
    notes: Option<String>,
    recurrence: Option<String>,
    created_at: String,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(row: TransactionRow) -> Res<Self> {
        let context = || format!("Transaction {} has invalid data", row.id);
        Ok(Transaction {
            amount: Amount::from_str(&row.amount).with_context(context)?,
            r#type: TransactionType::from_str(&row.kind).with_context(context)?,
            category: row.category,
            date: NaiveDate::from_str(&row.date).with_context(context)?,
            notes: row.notes,
            recurrence: row
                .recurrence
                .as_deref()
                .map(Recurrence::from_str)
                .transpose()
                .with_context(context)?,
            created_at: parse_timestamp(&row.created_at)?,
            id: row.id,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    color: String,
    icon: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category::new(row.id, row.name, row.color, row.icon)
    }
}
