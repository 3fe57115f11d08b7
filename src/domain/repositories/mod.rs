//! Repository trait definitions for the domain layer.
//!
//! These traits are the seams between the shortening engine and its backing
//! systems. Implementations live in `crate::infrastructure`; mocks are
//! generated via `mockall` for unit tests.
//!
//! - [`IdAllocator`] - Atomic identifier allocation
//! - [`MappingStore`] - Durable short code → URL records

pub mod id_allocator;
pub mod mapping_store;

pub use id_allocator::{AllocatorError, IdAllocator};
pub use mapping_store::{MappingStore, StoreError};

#[cfg(test)]
pub use id_allocator::MockIdAllocator;
#[cfg(test)]
pub use mapping_store::MockMappingStore;
