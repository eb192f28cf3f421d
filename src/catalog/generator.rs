//! Synthetic catalog generation.

use crate::catalog::record::Record;
use crate::catalog::store::CatalogStore;

/// Brands assigned round-robin by record id.
pub const BRANDS: [&str; 5] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];

/// Categories assigned round-robin by record id.
pub const CATEGORIES: [&str; 5] = ["Electronics", "Books", "Home", "Outdoors", "Clothes"];

/// Build the synthetic record with the given id.
pub fn synthesize(id: u64) -> Record {
    let slot = (id % BRANDS.len() as u64) as usize;
    let brand = BRANDS[slot];
    Record {
        id,
        name: format!("Product {} {}", brand, id),
        category: CATEGORIES[slot].to_string(),
        description: format!("Product Description {}", id),
        brand: brand.to_string(),
    }
}

/// Generate a catalog of `count` records with ids `0..count`.
pub fn generate(count: usize) -> CatalogStore {
    let store = CatalogStore::from_records((0..count as u64).map(synthesize));
    tracing::info!(records = store.len(), "Catalog generated");
    store
}
