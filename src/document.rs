//! A document owns the registries of all its entity kinds.
//!
//! Every registry created by a document allocates from the same [`IdSource`],
//! and the document is the only place where that source is reset.

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::config::Config;
use crate::id::IdSource;
use crate::index::EntityIndex;
use crate::registry::Registry;
use crate::Entity;

/// A type-erased registry.
pub(crate) trait AnyIndex: Send + Sync {
    fn name(&self) -> &str;

    fn len(&self) -> usize;

    /// Removes all entities without touching the shared ID source.
    fn clear(&self);

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<E: Entity> AnyIndex for Registry<E> {
    fn name(&self) -> &str { EntityIndex::name(self) }

    fn len(&self) -> usize { EntityIndex::len(self) }

    fn clear(&self) { Registry::clear(self) }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> { self }
}

/// The registries of a document, sharing one ID source.
pub struct Document {
    config:  Config,
    ids:     Arc<IdSource>,
    /// Registries in creation order.
    indexes: RwLock<IndexMap<String, Arc<dyn AnyIndex>>>,
}

impl Document {
    pub fn new(config: Config) -> Self {
        Self { config, ids: Arc::new(IdSource::new()), indexes: RwLock::new(IndexMap::new()) }
    }

    pub fn config(&self) -> &Config { &self.config }

    /// The ID source shared by all registries of this document.
    pub fn ids(&self) -> &Arc<IdSource> { &self.ids }

    /// Returns the registry named `name`, creating it if it does not exist.
    ///
    /// # Panics
    /// Panics if a registry named `name` exists for another entity type.
    pub fn create_index<E: Entity>(&self, name: &str) -> Arc<Registry<E>> {
        let mut indexes = self.indexes.write();

        if let Some(index) = indexes.get(name) {
            return Arc::clone(index)
                .as_any()
                .downcast()
                .unwrap_or_else(|_| panic!("Index {name:?} holds another entity type"));
        }

        let registry = Arc::new(Registry::<E>::with_config(name, Arc::clone(&self.ids), &self.config));
        indexes.insert(name.to_owned(), Arc::clone(&registry) as Arc<dyn AnyIndex>);
        log::debug!("Created index {name:?}");
        registry
    }

    /// Returns the registry named `name`, if it exists and holds entities of type `E`.
    pub fn index<E: Entity>(&self, name: &str) -> Option<Arc<Registry<E>>> {
        let index = Arc::clone(self.indexes.read().get(name)?);
        index.as_any().downcast().ok()
    }

    /// Names of the registries, in creation order.
    pub fn index_names(&self) -> Vec<String> { self.indexes.read().keys().cloned().collect() }

    /// Total number of entities across all registries.
    pub fn entity_count(&self) -> usize { self.indexes.read().values().map(|index| index.len()).sum() }

    /// The last ID allocated in this document.
    pub fn last_id(&self) -> u32 { self.ids.last() }

    /// Restores the last allocated ID, typically from a saved document.
    pub fn restore_last_id(&self, last: u32) {
        log::debug!("Restoring last id {last}");
        self.ids.set_last(last);
    }

    /// Clears every registry, then restarts ID allocation once.
    pub fn reset(&self) {
        for index in self.indexes.read().values() {
            index.clear();
            log::debug!("Cleared {}", index.name());
        }
        self.ids.reset();
    }
}
