use serde::{Deserialize, Serialize};

/// The display name used for transactions whose category is absent or unknown.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A user-defined spending or income category.
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Category {
    pub(crate) id: String,
    pub(crate) name: String,
    /// A display color such as `#FF6B6B`.
    pub(crate) color: String,
    /// The name of an icon, if any.
    pub(crate) icon: Option<String>,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        icon: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            icon,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}

/// The set of categories known to the ledger.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    data: Vec<Category>,
}

impl Categories {
    pub fn new(data: Vec<Category>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[Category] {
        &self.data
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.data.iter().find(|c| c.id == id)
    }

    /// Resolves a raw category id to its display name, falling back to `"Uncategorized"` when the
    /// id is absent or does not match any known category.
    pub fn name_for(&self, id: Option<&str>) -> &str {
        id.and_then(|id| self.get(id))
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<Category>> for Categories {
    fn from(value: Vec<Category>) -> Self {
        Categories::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_for_resolves_known_ids() {
        let categories = Categories::new(vec![
            Category::new("food", "Food & Dining", "#FF6B6B", None),
            Category::new("rent", "Rent", "#4ECDC4", Some("home".to_string())),
        ]);
        assert_eq!(categories.name_for(Some("rent")), "Rent");
        assert_eq!(categories.get("rent").and_then(Category::icon), Some("home"));
    }

    #[test]
    fn test_name_for_falls_back_to_uncategorized() {
        let categories = Categories::new(vec![Category::new("food", "Food", "#FF6B6B", None)]);
        assert_eq!(categories.name_for(None), UNCATEGORIZED);
        assert_eq!(categories.name_for(Some("deleted")), UNCATEGORIZED);
        assert!(Categories::default().is_empty());
    }
}
