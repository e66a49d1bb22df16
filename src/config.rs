//! Configuration file handling for pilot.
//!
//! The configuration file is stored at `$PILOT_HOME/config.json` and holds display settings, the
//! size of the calculator history and the rate and term limits applied to the calculators.

use crate::calc::CalculatorLimits;
use crate::db::Db;
use crate::error::{ErrorType, IntoResult, Res};
use crate::model::AmountFormat;
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "pilot";
const CONFIG_VERSION: u8 = 1;
const CURRENCY_SYMBOL: &str = "$";
const HISTORY_LIMIT: u32 = 50;
const CONFIG_JSON: &str = "config.json";
const PILOT_SQLITE: &str = "pilot.sqlite";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$PILOT_HOME` and from there it loads `$PILOT_HOME/config.json` and opens the
/// SQLite database that lives next to it.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the data directory, an initial `config.json` with default settings and an empty
    /// database.
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a config file or database.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::create_inner(dir.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf) -> Res<Self> {
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the pilot home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        let sqlite_path = root.join(PILOT_SQLITE);
        for existing in [&config_path, &sqlite_path] {
            if existing.exists() {
                bail!(
                    "Pilot home is already initialized, '{}' exists",
                    existing.display()
                );
            }
        }

        let db = Db::init(&sqlite_path)
            .await
            .context("Unable to create SQLite DB")?;
        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    /// This will
    /// - validate that `pilot_home` exists and that the config file exists
    /// - load and validate the config file
    /// - open the database, migrating it if needed
    pub async fn load(pilot_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(pilot_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Pilot home is missing, did you run `pilot init`?")?;
        let _ = utils::read_dir(&root).context("Pilot home is not a readable directory")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let sqlite_path = root.join(PILOT_SQLITE);
        let db = Db::load(&sqlite_path)
            .await
            .context("Unable to load SQLite DB")?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    /// How amounts are displayed, based on the configured currency symbol. An empty symbol means
    /// amounts are shown without one.
    pub fn amount_format(&self) -> AmountFormat {
        AmountFormat::new(self.config_file.currency_symbol.chars().next(), true)
    }

    pub fn limits(&self) -> CalculatorLimits {
        self.config_file.limits
    }

    /// The number of saved results kept for each calculator.
    pub fn history_limit(&self) -> u32 {
        self.config_file.history_limit
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "pilot",
///   "config_version": 1,
///   "currency_symbol": "₹",
///   "history_limit": 50,
///   "limits": {
///     "fd": { "max_rate_percent": 20.0, "max_years": 30.0 }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "pilot"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Shown in front of amounts, e.g. "$" or "₹"
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,

    /// Saved calculator results to keep per calculator
    #[serde(default = "default_history_limit")]
    history_limit: u32,

    #[serde(default)]
    limits: CalculatorLimits,
}

fn default_currency_symbol() -> String {
    CURRENCY_SYMBOL.to_string()
}

fn default_history_limit() -> u32 {
    HISTORY_LIMIT
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            currency_symbol: default_currency_symbol(),
            history_limit: HISTORY_LIMIT,
            limits: CalculatorLimits::default(),
        }
    }
}

impl ConfigFile {
    /// Loads and validates a ConfigFile.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;
        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            config.config_version <= CONFIG_VERSION,
            "The config file is version {} but this program only understands up to version {}",
            config.config_version,
            CONFIG_VERSION
        );
        ensure!(
            config.currency_symbol.chars().count() <= 1,
            "currency_symbol must be a single character or empty, got '{}' in {}",
            config.currency_symbol,
            path.display()
        );
        ensure!(
            config.history_limit > 0,
            "history_limit must be at least 1 in {}",
            path.display()
        );
        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{CalculatorKind, Limits};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_then_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("pilot_home");
        let created = Config::create(&home).await.unwrap();
        assert!(created.config_path().is_file());
        assert!(created.sqlite_path().is_file());
        assert_eq!(created.history_limit(), 50);
        assert_eq!(created.amount_format().symbol(), Some('$'));

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.root(), created.root());
        assert_eq!(loaded.limits(), CalculatorLimits::default());
    }

    #[tokio::test]
    async fn test_create_refuses_existing_home() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        assert!(Config::create(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_create_refuses_stray_database() {
        let dir = TempDir::new().unwrap();
        let stray = dir.path().join(PILOT_SQLITE);
        utils::write(&stray, "").await.unwrap();

        let err = Config::create(dir.path()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("already initialized"));
        assert!(!dir.path().join(CONFIG_JSON).exists());
    }

    #[tokio::test]
    async fn test_config_file_rejects_long_currency_symbol() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        utils::write(
            &path,
            r#"{"app_name": "pilot", "config_version": 1, "currency_symbol": "Rs"}"#,
        )
        .await
        .unwrap();
        let err = ConfigFile::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("single character"));

        utils::write(
            &path,
            r#"{"app_name": "pilot", "config_version": 1, "currency_symbol": ""}"#,
        )
        .await
        .unwrap();
        assert_eq!(ConfigFile::load(&path).await.unwrap().currency_symbol, "");
    }

    #[tokio::test]
    async fn test_load_missing_home() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope")).await.is_err());
        // The directory exists but was never initialized.
        assert!(Config::load(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_config_file_minimal_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "pilot",
            "config_version": 1,
            "currency_symbol": "₹",
            "limits": { "fd": { "max_rate_percent": 12.0, "max_years": 10.0 } }
        }"#;
        utils::write(&path, json).await.unwrap();

        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.history_limit, HISTORY_LIMIT);
        assert_eq!(config.limits.get(CalculatorKind::Fd), Limits::new(12.0, 10.0));
        assert_eq!(
            config.limits.get(CalculatorKind::Sip),
            CalculatorLimits::default().sip
        );
    }

    #[tokio::test]
    async fn test_config_file_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        utils::write(&path, r#"{"app_name": "ledger", "config_version": 1}"#)
            .await
            .unwrap();
        let err = ConfigFile::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let saved = ConfigFile {
            currency_symbol: String::new(),
            history_limit: 7,
            ..ConfigFile::default()
        };
        saved.save(&path).await.unwrap();
        assert_eq!(ConfigFile::load(&path).await.unwrap(), saved);
    }
}
