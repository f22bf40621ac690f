//! The public contract of an entity registry.

use std::sync::Arc;

use crate::error::RegistryError;
use crate::geom::{Point, Rect};
use crate::service::EntityService;
use crate::{query, Entity};

/// A registry of entities of one kind, addressable by ID.
///
/// All methods take `&self` and may be called concurrently from any thread,
/// except [`reset`](Self::reset) which must not race with other mutations.
pub trait EntityIndex<E: Entity>: Send + Sync {
    /// The name of this registry, used in logs and as the source of selection events.
    fn name(&self) -> &str;

    /// Assigns an ID to `entity` and stores it.
    ///
    /// If the entity already has an ID, nothing happens and that ID is returned.
    /// Otherwise the next ID is allocated from the shared source.
    fn register(&self, entity: &Arc<E>) -> u32;

    /// Stores an entity whose ID is already known, overwriting any entity with the same ID.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnassignedId`] if the entity has no ID.
    fn insert(&self, entity: Arc<E>) -> Result<(), RegistryError>;

    /// Removes `entity` if present.
    ///
    /// The ID is not reclaimed.
    fn remove(&self, entity: &E);

    /// Looks up an entity by ID.
    fn entity(&self, id: u32) -> Option<Arc<E>>;

    /// Returns a snapshot of all entities, in ascending ID order.
    fn entities(&self) -> Vec<Arc<E>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns the smallest valid ID after `id`, or `0` if there is none.
    ///
    /// With `id == 0`, this is the first valid ID of the registry.
    /// The search is bounded by [`last_id`](Self::last_id).
    fn id_after(&self, id: u32) -> u32;

    /// Returns the largest valid ID before `id`, or `0` if there is none.
    ///
    /// With `id == 0`, this returns `0` immediately.
    fn id_before(&self, id: u32) -> u32;

    /// The last ID allocated by the shared source.
    fn last_id(&self) -> u32;

    /// Overwrites the last ID of the shared source.
    fn set_last_id(&self, id: u32);

    /// Entities whose bounds lie wholly inside `rect`, in ascending ID order.
    fn contained_entities(&self, rect: &Rect) -> Vec<Arc<E>> {
        query::contained_in(self.entities(), rect)
    }

    /// Entities that contain `point`, in ascending ID order.
    fn containing_entities(&self, point: Point) -> Vec<Arc<E>> {
        query::containing(self.entities(), point)
    }

    /// Entities whose bounds overlap `rect`, in ascending ID order.
    fn intersected_entities(&self, rect: &Rect) -> Vec<Arc<E>> {
        query::intersected_by(self.entities(), rect)
    }

    /// Removes all entities and restarts the shared ID source.
    fn reset(&self);

    /// Binds the selection service of this registry and connects it.
    fn set_entity_service(&self, service: Arc<dyn EntityService<E>>);

    fn entity_service(&self) -> Option<Arc<dyn EntityService<E>>>;

    /// Whether `id` is flagged for verbose debugging.
    fn is_vip_id(&self, id: u32) -> bool;

    /// Replaces the VIP IDs with a comma-separated list
    /// and updates the VIP flag of the entities already stored.
    fn set_vip_ids(&self, list: &str);
}
