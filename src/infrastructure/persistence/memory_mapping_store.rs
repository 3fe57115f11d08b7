//! In-process mapping store for the single-process `memory` backend.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{UrlMapping, mapping_key};
use crate::domain::repositories::{MappingStore, StoreError};

/// Concurrent map of `url:<code>` keys to mappings.
///
/// Not durable: contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryMappingStore {
    mappings: DashMap<String, UrlMapping>,
}

impl MemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[async_trait]
impl MappingStore for MemoryMappingStore {
    async fn put(&self, mapping: &UrlMapping) -> Result<(), StoreError> {
        match self.mappings.entry(mapping_key(&mapping.short_code)) {
            Entry::Occupied(_) => Err(StoreError::DuplicateCode(mapping.short_code.clone())),
            Entry::Vacant(slot) => {
                slot.insert(mapping.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, short_code: &str) -> Result<Option<UrlMapping>, StoreError> {
        Ok(self
            .mappings
            .get(&mapping_key(short_code))
            .map(|m| m.value().clone()))
    }

    async fn delete(&self, short_code: &str) -> Result<(), StoreError> {
        self.mappings.remove(&mapping_key(short_code));
        Ok(())
    }

    async fn increment_hit_count(&self, short_code: &str) -> Result<(), StoreError> {
        if let Some(mut mapping) = self.mappings.get_mut(&mapping_key(short_code)) {
            mapping.hit_count = mapping.hit_count.saturating_add(1);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
