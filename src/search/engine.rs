//! Sample-based product search.
//!
//! # Responsibilities
//! - Draw `min(sample_size, catalog_len)` keys through the sampler
//! - Fetch each record and filter on name/category substring
//! - Count every match but keep only the first `output_limit`

use std::sync::Arc;

use crate::catalog::{CatalogStore, Record};
use crate::search::sampler::{KeySampler, RandomSampler};

/// Outcome of a single search pass.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Matches in sample order, at most `output_limit` of them.
    pub matches: Vec<Record>,
    /// Number of sampled records that matched.
    pub total_matches: usize,
    /// Number of keys sampled.
    pub checked: usize,
}

/// Searches a random sample of the catalog.
#[derive(Debug)]
pub struct QueryEngine {
    catalog: Arc<CatalogStore>,
    sampler: Box<dyn KeySampler>,
}

impl QueryEngine {
    /// Create an engine using random sampling with replacement.
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self::with_sampler(catalog, Box::new(RandomSampler))
    }

    pub fn with_sampler(catalog: Arc<CatalogStore>, sampler: Box<dyn KeySampler>) -> Self {
        Self { catalog, sampler }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Run a search for `term` (case-insensitive).
    pub fn search(&self, term: &str, sample_size: usize, output_limit: usize) -> SearchResult {
        let keys = self.catalog.keys();
        let checked = sample_size.min(keys.len());
        let needle = term.to_lowercase();

        let mut result = SearchResult {
            matches: Vec::with_capacity(output_limit.min(checked)),
            total_matches: 0,
            checked,
        };

        for key in self.sampler.sample(keys, checked) {
            // Tolerate keys that vanished between sampling and lookup.
            let Some(record) = self.catalog.get(key) else {
                continue;
            };
            if record.matches(&needle) {
                result.total_matches += 1;
                if result.matches.len() < output_limit {
                    result.matches.push(record);
                }
            }
        }

        result
    }
}
