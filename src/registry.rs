//! The concrete, thread-safe registry.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::RegistryError;
use crate::geom::{Point, Rect};
use crate::id::{self, IdSource};
use crate::index::EntityIndex;
use crate::service::{EntityEvent, EntityService, MouseMovement, SelectionHint};
use crate::{query, Entity, UNASSIGNED};

pub mod persist;
use persist::DuplicatePolicy;

/// Stores the entities of one kind, keyed by ID in ascending order.
///
/// The map sits behind a short-lived [`RwLock`],
/// while IDs come from a separate atomic [`IdSource`],
/// so allocating an ID never waits on the map.
pub struct Registry<E: Entity> {
    name:             String,
    ids:              Arc<IdSource>,
    entities:         RwLock<BTreeMap<u32, Arc<E>>>,
    vip_ids:          RwLock<BTreeSet<u32>>,
    service:          RwLock<Option<Arc<dyn EntityService<E>>>>,
    duplicate_policy: DuplicatePolicy,
}

impl<E: Entity> Registry<E> {
    /// Creates an empty registry allocating IDs from `ids`.
    pub fn new(name: impl Into<String>, ids: Arc<IdSource>) -> Self {
        Self {
            name: name.into(),
            ids,
            entities: RwLock::new(BTreeMap::new()),
            vip_ids: RwLock::new(BTreeSet::new()),
            service: RwLock::new(None),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    /// Creates an empty registry with the VIP IDs and duplicate policy of `config`.
    pub fn with_config(name: impl Into<String>, ids: Arc<IdSource>, config: &Config) -> Self {
        let mut registry = Self::new(name, ids);
        registry.duplicate_policy = config.duplicate_policy;

        let vip_ids = config.vip_ids();
        if !vip_ids.is_empty() {
            log::info!("VIP {}: {:?}", registry.name, vip_ids);
            *registry.vip_ids.get_mut() = vip_ids;
        }
        registry
    }

    /// The ID source shared with the other registries of the document.
    pub fn id_source(&self) -> &Arc<IdSource> { &self.ids }

    pub fn duplicate_policy(&self) -> DuplicatePolicy { self.duplicate_policy }

    pub fn set_duplicate_policy(&mut self, policy: DuplicatePolicy) {
        self.duplicate_policy = policy;
    }

    /// Publishes `entity` as the current selection.
    ///
    /// The event is queued on the dispatcher of the bound service and delivered later;
    /// this method never blocks on delivery.
    /// Nothing is published if no service is bound or if the entity is logically removed.
    /// Publishing `None` clears the selection.
    pub fn publish(&self, entity: Option<Arc<E>>, hint: SelectionHint) {
        if entity.as_ref().map_or(false, |entity| entity.is_removed()) {
            return;
        }

        let Some(service) = self.service.read().clone() else { return };

        let event = EntityEvent {
            source: self.name.clone(),
            hint,
            movement: MouseMovement::Pressing,
            entity,
        };
        let target = Arc::clone(&service);
        service.dispatcher().post(move || target.publish(event));
    }

    /// Removes all entities without touching the shared ID source.
    pub(crate) fn clear(&self) { self.entities.write().clear(); }

    /// Recomputes the VIP flag of `entity` from the configured VIP IDs.
    fn apply_vip(&self, entity: &E, action: &str) {
        let vip = self.is_vip_id(entity.id());
        entity.set_vip(vip);
        if vip {
            log::info!("{} VIP {} {}", self.name, action, entity.dump());
        }
    }
}

impl<E: Entity> EntityIndex<E> for Registry<E> {
    fn name(&self) -> &str { &self.name }

    fn register(&self, entity: &Arc<E>) -> u32 {
        let id = entity.id();
        if id != UNASSIGNED {
            return id;
        }

        let id = self.ids.next();
        if let Err(winner) = entity.identity().assign(id) {
            // registered concurrently; `id` is skipped, never reused.
            log::debug!("{} discards id {id}, entity registered as {winner}", self.name);
            return winner;
        }
        self.entities.write().insert(id, Arc::clone(entity));
        self.apply_vip(entity, "registered");

        id
    }

    fn insert(&self, entity: Arc<E>) -> Result<(), RegistryError> {
        let id = entity.id();
        if id == UNASSIGNED {
            return Err(RegistryError::UnassignedId(entity.dump()));
        }

        self.ids.raise_to(id);
        self.apply_vip(&entity, "inserted");
        self.entities.write().insert(id, entity);

        Ok(())
    }

    fn remove(&self, entity: &E) { self.entities.write().remove(&entity.id()); }

    // The queries below filter under the read guard, so only matches are cloned.
    // Entity geometry must not call back into this registry.

    fn contained_entities(&self, rect: &Rect) -> Vec<Arc<E>> {
        let entities = self.entities.read();
        query::contained_in(entities.values(), rect).into_iter().cloned().collect()
    }

    fn containing_entities(&self, point: Point) -> Vec<Arc<E>> {
        let entities = self.entities.read();
        query::containing(entities.values(), point).into_iter().cloned().collect()
    }

    fn intersected_entities(&self, rect: &Rect) -> Vec<Arc<E>> {
        let entities = self.entities.read();
        query::intersected_by(entities.values(), rect).into_iter().cloned().collect()
    }

    fn entity(&self, id: u32) -> Option<Arc<E>> { self.entities.read().get(&id).cloned() }

    fn entities(&self) -> Vec<Arc<E>> { self.entities.read().values().cloned().collect() }

    fn len(&self) -> usize { self.entities.read().len() }

    fn id_after(&self, id: u32) -> u32 {
        let last = self.ids.last();
        let entities = self.entities.read();

        if id == UNASSIGNED {
            // first valid id
            entities.range(..=last).next().map_or(UNASSIGNED, |(&id, _)| id)
        } else {
            // next valid id
            match id.checked_add(1) {
                Some(start) if start <= last => {
                    entities.range(start..=last).next().map_or(UNASSIGNED, |(&id, _)| id)
                }
                _ => UNASSIGNED,
            }
        }
    }

    fn id_before(&self, id: u32) -> u32 {
        if id == UNASSIGNED {
            return UNASSIGNED;
        }

        self.entities.read().range(..id).next_back().map_or(UNASSIGNED, |(&id, _)| id)
    }

    fn last_id(&self) -> u32 { self.ids.last() }

    fn set_last_id(&self, id: u32) { self.ids.set_last(id) }

    fn reset(&self) {
        self.clear();
        self.ids.reset();
        log::debug!("Reset {}", self.name);
    }

    fn set_entity_service(&self, service: Arc<dyn EntityService<E>>) {
        *self.service.write() = Some(Arc::clone(&service));
        log::debug!("{} bound to dispatcher {:?}", self.name, service.dispatcher().name());
        service.connect();
    }

    fn entity_service(&self) -> Option<Arc<dyn EntityService<E>>> { self.service.read().clone() }

    fn is_vip_id(&self, id: u32) -> bool { self.vip_ids.read().contains(&id) }

    fn set_vip_ids(&self, list: &str) {
        let vip_ids = id::parse_ids(list);
        if !vip_ids.is_empty() {
            log::info!("VIP {}: {:?}", self.name, vip_ids);
        }
        *self.vip_ids.write() = vip_ids;

        for entity in self.entities.read().values() {
            self.apply_vip(entity, "declared");
        }
    }
}

impl<E: Entity> fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("len", &self.len())
            .field("last_id", &self.ids.last())
            .finish()
    }
}
