use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::AppResult;

use super::catalog::Catalog;
use super::features::FeatureSpace;

/// A catalog paired with the feature space fitted on it
///
/// Both halves are built together and never mutated, so a request holding a
/// snapshot always sees a matrix and scaling transform from the same table.
#[derive(Debug)]
pub struct CatalogSnapshot {
    catalog: Catalog,
    features: FeatureSpace,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(catalog: Catalog) -> Self {
        let features = FeatureSpace::build(&catalog);
        Self {
            catalog,
            features,
            loaded_at: Utc::now(),
        }
    }

    /// Loads the catalog file and fits its feature space
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        Ok(Self::new(Catalog::load(path)?))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn features(&self) -> &FeatureSpace {
        &self.features
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Shared handle to the active snapshot; replacement swaps the whole snapshot
#[derive(Clone)]
pub struct SnapshotHandle {
    inner: Arc<RwLock<Arc<CatalogSnapshot>>>,
}

impl SnapshotHandle {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// The snapshot active right now; stays valid even if a reload swaps it out
    pub fn current(&self) -> Arc<CatalogSnapshot> {
        self.inner.read().clone()
    }

    /// Installs a new snapshot and returns the one it replaced
    pub fn replace(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let next = Arc::new(snapshot);
        std::mem::replace(&mut *self.inner.write(), next)
    }
}
