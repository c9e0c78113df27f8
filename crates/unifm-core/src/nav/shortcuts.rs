//! User-pinned shortcuts shown at the top of the navigation list.
//!
//! Shortcuts are entry keys kept in the order the user added them.

use serde::{Deserialize, Serialize};

/// Ordered set of shortcut entry keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Shortcuts {
    keys: Vec<String>,
}

impl Shortcuts {
    /// Create an empty shortcut list.
    #[must_use]
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Return a new `Shortcuts` with `key` appended. Adding a key that is
    /// already present keeps its original position.
    #[must_use]
    pub fn with_shortcut(self, key: impl Into<String>) -> Self {
        let key = key.into();
        if self.contains(&key) {
            return self;
        }
        let mut keys = self.keys;
        keys.push(key);
        Self { keys }
    }

    /// Return a new `Shortcuts` with `key` removed.
    #[must_use]
    pub fn without_shortcut(self, key: &str) -> Self {
        let keys = self.keys.into_iter().filter(|k| k != key).collect();
        Self { keys }
    }

    /// Returns `true` if `key` is a shortcut.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// All shortcut keys in stored order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of shortcuts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
