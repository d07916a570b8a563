use serde::{Deserialize, Serialize};

/// Registered expense category labels, kept lowercase, trimmed and unique in
/// registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CategorySet {
    labels: Vec<String>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical form of a user-entered label.
    pub fn normalize(label: &str) -> String {
        label.trim().to_lowercase()
    }

    /// Inserts an already-normalised label. Returns `false` when the label is
    /// empty or already registered.
    pub fn insert(&mut self, label: String) -> bool {
        if label.is_empty() || self.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|existing| existing == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for CategorySet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut set = CategorySet::new();
        for label in iter {
            set.insert(CategorySet::normalize(label));
        }
        set
    }
}
