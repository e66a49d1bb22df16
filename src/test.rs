//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, Category, Transaction, TransactionType};
use crate::Config;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up a pilot home directory with Config and database.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with Config and initialized database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("pilot");
        let config = Config::create(&root).await.unwrap();
        Self { temp_dir, config }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// A path inside the temp dir but outside the pilot home, for files such as CSV imports.
    pub fn scratch_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Inserts a transaction directly into the database and returns it.
    pub async fn insert_transaction(
        &self,
        r#type: TransactionType,
        amount: &str,
        category: Option<&str>,
        date: &str,
    ) -> Transaction {
        let t = Transaction::new(
            Amount::from_str(amount).unwrap(),
            r#type,
            category.map(str::to_string),
            NaiveDate::from_str(date).unwrap(),
        )
        .unwrap();
        self.config.db().insert_transaction(&t).await.unwrap();
        t
    }

    /// Inserts a category directly into the database and returns it.
    pub async fn insert_category(&self, id: &str, name: &str) -> Category {
        let c = Category::new(id, name, "#FF6B6B", None);
        self.config.db().insert_category(&c).await.unwrap();
        c
    }
}
