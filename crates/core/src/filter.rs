//! Metafield tag filter for product lists.

/// Keep only items whose metafield `namespace.key` equals `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetafieldFilter {
    pub namespace: String,
    pub key: String,
    pub value: String,
}

impl MetafieldFilter {
    /// Build from a `namespace.key` identifier and the tag value to match.
    ///
    /// Returns `None` if the identifier has no namespace or key, or the value
    /// is blank.
    #[must_use]
    pub fn parse(identifier: &str, value: &str) -> Option<Self> {
        let (namespace, key) = identifier.trim().split_once('.')?;
        if namespace.is_empty() || key.is_empty() || value.trim().is_empty() {
            return None;
        }
        Some(Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value: value.trim().to_string(),
        })
    }

    /// Whether a metafield value matches the tag exactly.
    #[must_use]
    pub fn matches(&self, value: Option<&str>) -> bool {
        value == Some(self.value.as_str())
    }

    /// Filter `items`, reading each item's metafield value with `value_of`.
    #[must_use]
    pub fn apply<T>(&self, items: Vec<T>, value_of: impl Fn(&T) -> Option<&str>) -> Vec<T> {
        items
            .into_iter()
            .filter(|item| self.matches(value_of(item)))
            .collect()
    }
}
