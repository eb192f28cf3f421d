//! In-memory catalog store.
//!
//! # Responsibilities
//! - Hold every record keyed by id
//! - Keep the ordered key sequence used for sampling
//!
//! # Design Decisions
//! - `DashMap` gives lock-sharded concurrent reads without a global lock
//! - No mutation API: the store is effectively immutable once built
//! - A missing key is `None`, never an error

use dashmap::DashMap;

use crate::catalog::record::Record;

/// Read-only keyed collection of catalog records.
#[derive(Debug, Default)]
pub struct CatalogStore {
    records: DashMap<u64, Record>,
    keys: Vec<u64>,
}

impl CatalogStore {
    /// Build a store from a sequence of records.
    ///
    /// A repeated id keeps the last record and appears once in the key order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let map = DashMap::new();
        let mut keys = Vec::new();

        for record in records {
            let id = record.id;
            if map.insert(id, record).is_none() {
                keys.push(id);
            }
        }

        Self { records: map, keys }
    }

    /// Look up a record by key.
    pub fn get(&self, key: u64) -> Option<Record> {
        self.records.get(&key).map(|r| r.value().clone())
    }

    /// All keys in insertion order.
    pub fn keys(&self) -> &[u64] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
