//! Persistence of a registry as a flat list of entities.
//!
//! The ID-keyed map is never written as such.
//! Marshalling flattens it into the list of entities in ascending ID order,
//! each entity carrying its own ID;
//! unmarshalling rebuilds the map from the IDs embedded in the list.
//! VIP flags are not persisted and are recomputed on load.

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Registry;
use crate::error::RegistryError;
use crate::index::EntityIndex;
use crate::{Entity, UNASSIGNED};

/// How unmarshalling treats an ID that appears more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The entity appearing last in the input wins.
    #[default]
    Overwrite,
    /// Loading fails with [`RegistryError::DuplicateId`].
    Reject,
}

/// The persisted form of a registry.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexContent<E> {
    pub name:     String,
    /// The last ID allocated in the document when the content was saved.
    pub last_id:  u32,
    pub entities: Vec<Arc<E>>,
}

impl<E: Entity> Registry<E> {
    /// Flattens the registry into the list of its entities, in ascending ID order.
    pub fn marshal(&self) -> Vec<Arc<E>> { self.entities() }

    /// Replaces the content of the registry with `entities`.
    ///
    /// The input order is irrelevant; entities are stored at their embedded IDs.
    /// The shared ID source is raised past the largest ID,
    /// and VIP flags are recomputed.
    ///
    /// # Errors
    /// - [`RegistryError::UnassignedId`] if an entity has no ID.
    /// - [`RegistryError::DuplicateId`] if an ID appears twice under [`DuplicatePolicy::Reject`].
    ///
    /// The registry is left untouched on error.
    pub fn unmarshal(&self, mut entities: Vec<Arc<E>>) -> Result<(), RegistryError> {
        // stable: among equal IDs, the input order decides which entity wins.
        entities.sort_by_key(|entity| entity.id());

        let mut map = BTreeMap::new();
        for entity in entities {
            let id = entity.id();
            if id == UNASSIGNED {
                return Err(RegistryError::UnassignedId(entity.dump()));
            }

            if let Some(previous) = map.insert(id, entity) {
                match self.duplicate_policy {
                    DuplicatePolicy::Overwrite => {
                        log::debug!("{} overwrites {} on reload", self.name, previous.dump());
                    }
                    DuplicatePolicy::Reject => return Err(RegistryError::DuplicateId(id)),
                }
            }
        }

        if let Some(&last) = map.keys().next_back() {
            self.ids.raise_to(last);
        }
        for entity in map.values() {
            self.apply_vip(entity, "loaded");
        }

        log::debug!("{} loaded {} entities", self.name, map.len());
        *self.entities.write() = map;
        Ok(())
    }

    /// Returns the persisted form of this registry.
    pub fn content(&self) -> IndexContent<E> {
        IndexContent { name: self.name.clone(), last_id: self.ids.last(), entities: self.marshal() }
    }

    /// Replaces the content of this registry with persisted content.
    ///
    /// The shared ID source is raised to the persisted last ID,
    /// so that IDs allocated after reloading never collide with saved ones.
    pub fn load_content(&self, content: IndexContent<E>) -> Result<(), RegistryError> {
        if content.name != self.name {
            log::warn!("Loading content of {:?} into {:?}", content.name, self.name);
        }

        self.unmarshal(content.entities)?;
        self.ids.raise_to(content.last_id);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, RegistryError>
    where
        E: Serialize,
    {
        Ok(serde_json::to_string_pretty(&self.content())?)
    }

    pub fn write_json(&self, writer: impl io::Write) -> Result<(), RegistryError>
    where
        E: Serialize,
    {
        Ok(serde_json::to_writer_pretty(writer, &self.content())?)
    }

    pub fn load_json(&self, json: &str) -> Result<(), RegistryError>
    where
        E: DeserializeOwned,
    {
        let content: IndexContent<E> = serde_json::from_str(json)?;
        self.load_content(content)
    }

    pub fn read_json(&self, reader: impl io::Read) -> Result<(), RegistryError>
    where
        E: DeserializeOwned,
    {
        let content: IndexContent<E> = serde_json::from_reader(reader)?;
        self.load_content(content)
    }
}

#[cfg(test)]
mod tests;
