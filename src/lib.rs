//! Concurrent registries of identified geometric entities.
//!
//! # Entities and IDs
//! An interactive document is populated with many kinds of geometric objects
//! (recognized symbols, shapes, ...), produced by background pipelines
//! and inspected from a foreground thread.
//! Each of them must be addressable by a stable integer ID
//! for the whole life of the document, including across save/reload cycles.
//!
//! IDs are allocated from an [`IdSource`], a single atomic counter
//! that is injected into every [`Registry`] of a document.
//! Sharing one source across registries keeps IDs unique across entity kinds,
//! so an ID alone is enough to designate any object of the document.
//! The ID `0` is reserved for entities that have not been registered yet.
//!
//! # Registries
//! A [`Registry`] stores the entities of one kind in ascending ID order
//! and can be mutated and queried from any thread.
//! It supports neighbor navigation by ID ([`EntityIndex::id_after`], [`EntityIndex::id_before`])
//! and spatial lookups by rectangle or point, built on the free functions in [`query`].
//!
//! # Selection
//! A registry may be bound to one [`EntityService`].
//! [`Registry::publish`] never delivers on the calling thread;
//! the event is queued onto the service's single-consumer [`Dispatcher`],
//! and logically removed entities are never published.
//!
//! # Persistence
//! A registry is persisted as a flat list of entities with embedded IDs
//! (see [`registry::persist`]).
//! Reloading the list reconstructs the same IDs.
//! The VIP debugging flag is never persisted and is recomputed on load.

#![cfg_attr(doc, warn(missing_docs))]

pub mod config;
pub use config::Config;

pub mod document;
pub use document::Document;

pub mod entity;
pub use entity::{Entity, Identity, UNASSIGNED};

pub mod error;
pub use error::{ConfigError, RegistryError};

pub mod geom;
pub use geom::{Point, Rect};

pub mod id;
pub use id::IdSource;

pub mod index;
pub use index::EntityIndex;

pub mod query;

pub mod registry;
pub use registry::persist::DuplicatePolicy;
pub use registry::Registry;

pub mod service;
pub use service::{Dispatcher, EntityEvent, EntityService, SelectionService};

#[cfg(any(test, feature = "internal-bench"))]
pub mod test_util;
