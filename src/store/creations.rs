use std::sync::Arc;

use crate::factory::layer_factory::LayerFactory;
use crate::foundation::error::CollageResult;
use crate::model::creation::Creation;
use crate::model::record::CreationRecord;
use crate::store::document::{Document, DocumentStore};

impl Document for CreationRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Typed access to persisted creations.
///
/// Converts between [`CreationRecord`]s in the backing store and typed [`Creation`]s through
/// the layer factory. Cheap to clone.
#[derive(Clone)]
pub struct CreationRepository {
    store: Arc<dyn DocumentStore<CreationRecord>>,
    factory: Arc<LayerFactory>,
}

impl std::fmt::Debug for CreationRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreationRepository")
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}

impl CreationRepository {
    /// Repository over `store`, rehydrating layers with `factory`.
    pub fn new(store: Arc<dyn DocumentStore<CreationRecord>>, factory: Arc<LayerFactory>) -> Self {
        Self { store, factory }
    }

    /// The factory used for rehydration.
    pub fn factory(&self) -> &Arc<LayerFactory> {
        &self.factory
    }

    /// Load a creation; `Ok(None)` when absent.
    #[tracing::instrument(skip(self))]
    pub fn get(&self, id: &str) -> CollageResult<Option<Creation>> {
        self.store
            .get(id)?
            .map(|record| self.factory.creation_from_record(&record))
            .transpose()
    }

    /// Raw persisted record.
    pub fn get_record(&self, id: &str) -> CollageResult<Option<CreationRecord>> {
        self.store.get(id)
    }

    /// Persist the whole creation, replacing any previous record.
    #[tracing::instrument(skip(self, creation), fields(id = creation.id()))]
    pub fn save(&self, creation: &Creation) -> CollageResult<()> {
        self.store.save(&creation.to_record()?)
    }

    /// Persist a raw record as-is (bundle import).
    pub fn save_record(&self, record: &CreationRecord) -> CollageResult<()> {
        self.store.save(record)
    }

    /// Remove a creation.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: &str) -> CollageResult<()> {
        self.store.delete(id)
    }

    /// Every stored creation, ordered by id.
    pub fn get_all(&self) -> CollageResult<Vec<Creation>> {
        self.store
            .get_all()?
            .iter()
            .map(|record| self.factory.creation_from_record(record))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/creations.rs"]
mod tests;
