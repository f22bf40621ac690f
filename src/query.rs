//! Spatial and ordering helpers over arbitrary collections of entities.
//!
//! These functions are generic over the item type:
//! anything that dereferences to an [`Entity`] works,
//! including `&E`, `Arc<E>`, `&Arc<E>` and `Arc<dyn Entity>`.
//! Results preserve the encounter order of the input,
//! and the input is expected to contain each entity once.
//!
//! They run on interactive paths (e.g. "what is under the cursor"),
//! so the result vector is only allocated on the first match.

use std::cmp::Ordering;
use std::ops::Deref;
use std::sync::Arc;

use itertools::Itertools;

use crate::geom::{Point, Rect};
use crate::Entity;

/// An `Arc` of an entity is itself an entity, so that `&Arc<E>` items can be queried.
impl<E: Entity + ?Sized> Entity for Arc<E> {
    fn identity(&self) -> &crate::Identity { (**self).identity() }

    fn bounds(&self) -> Rect { (**self).bounds() }

    fn contains(&self, point: Point) -> bool { (**self).contains(point) }

    fn is_removed(&self) -> bool { (**self).is_removed() }

    fn write_internals(&self, out: &mut dyn std::fmt::Write) -> std::fmt::Result {
        (**self).write_internals(out)
    }
}

/// Returns the union of all entity bounds, or `None` if there is no entity.
pub fn bounding_box_of<T>(entities: impl IntoIterator<Item = T>) -> Option<Rect>
where
    T: Deref,
    T::Target: Entity,
{
    entities.into_iter().map(|entity| entity.bounds()).reduce(|acc, bounds| acc.union(&bounds))
}

/// Returns the entities whose bounds lie wholly inside `rect`.
pub fn contained_in<T>(entities: impl IntoIterator<Item = T>, rect: &Rect) -> Vec<T>
where
    T: Deref,
    T::Target: Entity,
{
    entities.into_iter().filter(|entity| rect.contains_rect(&entity.bounds())).collect()
}

/// Returns the entities whose bounds overlap `rect`, including those wholly inside it.
pub fn intersected_by<T>(entities: impl IntoIterator<Item = T>, rect: &Rect) -> Vec<T>
where
    T: Deref,
    T::Target: Entity,
{
    entities.into_iter().filter(|entity| rect.intersects(&entity.bounds())).collect()
}

/// Returns the entities that contain `point`, as decided by [`Entity::contains`].
pub fn containing<T>(entities: impl IntoIterator<Item = T>, point: Point) -> Vec<T>
where
    T: Deref,
    T::Target: Entity,
{
    entities.into_iter().filter(|entity| entity.contains(point)).collect()
}

/// Compares two entities by ascending ID.
///
/// Usable with `sort_by` to order heterogeneous collections deterministically.
pub fn id_order<E: Entity + ?Sized>(a: &E, b: &E) -> Ordering { a.id().cmp(&b.id()) }

/// Formats entity IDs for logs, e.g. `[#1#5#12]`.
///
/// Returns an empty string for `None`.
pub fn ids_of<T>(entities: Option<impl IntoIterator<Item = T>>) -> String
where
    T: Deref,
    T::Target: Entity,
{
    match entities {
        Some(entities) => {
            format!("[{}]", entities.into_iter().map(|entity| format!("#{}", entity.id())).join(""))
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests;
