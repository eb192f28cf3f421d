//! Catalog record type.

use serde::{Deserialize, Serialize};

/// A single product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub brand: String,
}

impl Record {
    /// Returns true if `needle` occurs in the name or category, ignoring case.
    ///
    /// `needle` must already be lowercase. An empty needle never matches.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(needle) || self.category.to_lowercase().contains(needle)
    }
}
