use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the pilot home directory with:
/// - an initial `config.json` holding default settings
/// - an empty SQLite database
///
/// # Arguments
/// - `pilot_home` - The directory that will be the root of data directory, e.g. `$HOME/pilot`
///
/// # Errors
/// - Returns an error if the directory has already been initialized.
/// - Returns an error if any file operations fail.
pub async fn init(pilot_home: &Path) -> Result<Out<()>> {
    let config = Config::create(pilot_home).await?;
    Ok(format!(
        "Successfully created the pilot home directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_twice() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let out = init(&home).await.unwrap();
        assert!(out.message().contains("Successfully created"));

        let err = init(&home).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }
}
