use serde::Deserialize;

/// Expense category label, as served by `GET /transactions/categories/expense`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Category {
    pub name: String,
}

impl Category {
    #[cfg(test)]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// Position of a category by name (case-insensitive).
    pub fn position(categories: &[Category], name: &str) -> Option<usize> {
        let lower = name.to_lowercase();
        categories.iter().position(|c| c.name.to_lowercase() == lower)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
