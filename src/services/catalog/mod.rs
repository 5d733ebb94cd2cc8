//! Parts catalog and the sources it is loaded from
//!
//! The catalog is built once at startup and shared read-only between
//! requests. Sources own the messy part (parsing prices, inferring sockets);
//! the catalog only guarantees that every row it holds has a usable price
//! and score.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Part, PartType},
};

pub mod socket;
pub mod sqlite;

pub use sqlite::SqliteCatalogSource;

/// Immutable, in-memory view of every available part
///
/// Rows keep their insertion order, which breaks score ties during
/// candidate selection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    parts: Arc<[Part]>,
}

impl Catalog {
    /// Builds a catalog, skipping rows with a non-finite or negative price or score
    pub fn new(parts: Vec<Part>) -> Self {
        let parts: Vec<Part> = parts.into_iter().filter(Part::is_valid).collect();
        Self {
            parts: parts.into(),
        }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn of_type(&self, part_type: PartType) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(move |p| p.part_type == part_type)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn count_by_type(&self) -> BTreeMap<PartType, usize> {
        let mut counts = BTreeMap::new();
        for part in self.parts.iter() {
            *counts.entry(part.part_type).or_insert(0) += 1;
        }
        counts
    }

    /// Loads every part from a source and logs what was found
    pub async fn load(source: &dyn CatalogSource) -> AppResult<Self> {
        let rows = source.fetch_parts().await?;
        let fetched = rows.len();
        let catalog = Self::new(rows);

        if catalog.len() < fetched {
            tracing::warn!(
                source = source.name(),
                skipped = fetched - catalog.len(),
                "Skipped catalog rows with invalid price or score"
            );
        }

        let counts = catalog.count_by_type();
        for part_type in PartType::ESSENTIAL {
            if !counts.contains_key(&part_type) {
                tracing::warn!(part_type = %part_type, "Catalog has no parts of this type");
            }
        }

        tracing::info!(
            source = source.name(),
            parts = catalog.len(),
            counts = ?counts,
            "Parts catalog loaded"
        );

        Ok(catalog)
    }
}

/// Provider of raw catalog rows
///
/// Implementations are expected to hand back already-parsed rows: price
/// strings de-formatted and unusable rows dropped.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every part, in catalog insertion order
    async fn fetch_parts(&self) -> AppResult<Vec<Part>>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Source over a fixed list of parts, for tests and fixtures
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    parts: Vec<Part>,
}

impl StaticCatalogSource {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }
}

#[async_trait::async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_parts(&self) -> AppResult<Vec<Part>> {
        Ok(self.parts.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
