use crate::error::Res;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs::ReadDir;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Generates a unique id for a new transaction, e.g. `txn-3f2b9c0e1d5a4b7c8e9f0a1b2c3d4e5f`.
pub(crate) fn generate_transaction_id() -> String {
    format!("txn-{}", Uuid::new_v4().simple())
}

/// Generates a category id from its display name, e.g. `Food & Dining` becomes `food-dining`.
/// Falls back to a random id when the name has no usable characters.
pub(crate) fn generate_category_id(name: &str) -> String {
    let mut id = String::new();
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            id.push(c);
        } else if !id.is_empty() && !id.ends_with('-') {
            id.push('-');
        }
    }
    let id = id.trim_end_matches('-').to_string();
    if id.is_empty() {
        format!("cat-{}", Uuid::new_v4().simple())
    } else {
        id
    }
}

/// Create a directory and all of its parents.
pub(crate) async fn make_dir(path: impl AsRef<Path>) -> Res<()> {
    let path = path.as_ref();
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Unable to create directory {}", path.display()))
}

pub(crate) async fn canonicalize(path: impl AsRef<Path>) -> Res<PathBuf> {
    let path = path.as_ref();
    tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("Unable to canonicalize {}", path.display()))
}

pub(crate) fn read_dir(path: impl AsRef<Path>) -> Res<ReadDir> {
    let path = path.as_ref();
    std::fs::read_dir(path).with_context(|| format!("Unable to read directory {}", path.display()))
}

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Res<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Res<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub(crate) async fn deserialize<T>(path: &Path) -> Res<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ids() {
        assert_eq!(generate_category_id("Food & Dining"), "food-dining");
        assert_eq!(generate_category_id("  Rent "), "rent");
        assert_eq!(generate_category_id("Kids' School-Fees!"), "kids-school-fees");
        assert!(generate_category_id("!!!").starts_with("cat-"));
    }

    #[test]
    fn test_transaction_ids_are_unique() {
        let a = generate_transaction_id();
        let b = generate_transaction_id();
        assert!(a.starts_with("txn-"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_write_then_deserialize() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        make_dir(&nested).await.unwrap();
        let path = nested.join("x.json");
        write(&path, r#"{"n": 3}"#).await.unwrap();
        let value: serde_json::Value = deserialize(&path).await.unwrap();
        assert_eq!(value["n"], 3);
        assert!(read_dir(&nested).is_ok());
        assert!(canonicalize(dir.path().join("missing")).await.is_err());
    }
}
