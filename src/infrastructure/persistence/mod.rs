//! Mapping store implementations.
//!
//! - [`PgMappingStore`] - PostgreSQL storage via SQLx (durable)
//! - [`MemoryMappingStore`] - In-process map for the single-process backend

pub mod memory_mapping_store;
pub mod pg_mapping_store;

pub use memory_mapping_store::MemoryMappingStore;
pub use pg_mapping_store::PgMappingStore;
