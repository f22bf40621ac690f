//! An entity is a geometric object addressable by a stable integer ID.
//!
//! Entities are shared between producers, registries and subscribers through [`Arc`],
//! so the registry-managed state (the ID and the VIP flag) lives in an embedded [`Identity`]
//! that supports mutation through a shared reference.
//!
//! All geometry beyond the bounding box is delegated to the entity type itself.
//!
//! [`Arc`]: std::sync::Arc

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geom::{Point, Rect};

/// The ID of an entity that has not been registered yet.
pub const UNASSIGNED: u32 = 0;

/// The registry-managed part of an entity.
///
/// Only the ID survives serialization.
/// The VIP flag is a debugging aid that is recomputed from the configured VIP IDs
/// whenever the entity enters a registry.
#[derive(Default)]
pub struct Identity {
    id:  AtomicU32,
    vip: AtomicBool,
}

impl Identity {
    /// Creates an unassigned identity.
    pub fn new() -> Self { Self::default() }

    /// Creates an identity with a known ID, typically when reloading a document.
    pub fn with_id(id: u32) -> Self { Self { id: AtomicU32::new(id), vip: AtomicBool::new(false) } }

    pub fn id(&self) -> u32 { self.id.load(Ordering::SeqCst) }

    pub fn set_id(&self, id: u32) { self.id.store(id, Ordering::SeqCst) }

    /// Sets the ID only if it is still [`UNASSIGNED`].
    ///
    /// Returns the ID already assigned if another caller got there first.
    pub fn assign(&self, id: u32) -> Result<(), u32> {
        self.id.compare_exchange(UNASSIGNED, id, Ordering::SeqCst, Ordering::SeqCst).map(|_| ())
    }

    pub fn is_vip(&self) -> bool { self.vip.load(Ordering::Relaxed) }

    pub fn set_vip(&self, vip: bool) { self.vip.store(vip, Ordering::Relaxed) }
}

impl Clone for Identity {
    fn clone(&self) -> Self {
        Self { id: AtomicU32::new(self.id()), vip: AtomicBool::new(self.is_vip()) }
    }
}

impl PartialEq for Identity {
    // VIP is transient and never takes part in equality.
    fn eq(&self, other: &Self) -> bool { self.id() == other.id() }
}

impl Eq for Identity {}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id())?;
        if self.is_vip() {
            f.write_str(" VIP")?;
        }
        Ok(())
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.id())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Identity::with_id)
    }
}

/// The capability contract of every entity stored in a registry.
pub trait Entity: fmt::Debug + Send + Sync + 'static {
    /// The embedded identity of this entity.
    fn identity(&self) -> &Identity;

    /// The bounding box of this entity.
    ///
    /// This is a copy; mutating it never affects the entity.
    fn bounds(&self) -> Rect;

    /// Whether `point` lies within the entity.
    ///
    /// Must be deterministic; the registry assumes nothing else about it.
    fn contains(&self, point: Point) -> bool;

    /// Whether the entity has been logically removed.
    ///
    /// Removed entities are never published to a selection service.
    /// Entities that can never be removed keep the default.
    fn is_removed(&self) -> bool { false }

    /// Writes the human-readable internals of this entity.
    ///
    /// Defaults to the [`Debug`](fmt::Debug) form.
    fn write_internals(&self, out: &mut dyn fmt::Write) -> fmt::Result { write!(out, "{self:?}") }

    fn id(&self) -> u32 { self.identity().id() }

    fn set_id(&self, id: u32) { self.identity().set_id(id) }

    fn is_vip(&self) -> bool { self.identity().is_vip() }

    fn set_vip(&self, vip: bool) { self.identity().set_vip(vip) }

    /// Returns the internals of this entity for debugging printouts.
    ///
    /// This never fails; see [`dump_of`].
    fn dump(&self) -> String { dump_of(self) }
}

/// Composes the debug dump of an entity.
///
/// Any error or panic raised by [`Entity::write_internals`] is swallowed
/// and replaced by a placeholder, so that a broken entity cannot break a diagnostic printout.
pub fn dump_of<E: Entity + ?Sized>(entity: &E) -> String {
    let composed = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut out = String::new();
        entity.write_internals(&mut out).map(|()| out)
    }));

    match composed {
        Ok(Ok(out)) => out,
        Ok(Err(fmt::Error)) | Err(_) => {
            log::debug!("Failed to dump {}", std::any::type_name::<E>());
            format!("<{} internals unavailable>", std::any::type_name::<E>())
        }
    }
}
