//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the domain contracts.
//!
//! # Modules
//!
//! - [`cache`] - Resolution caches (Redis, in-memory, no-op)
//! - [`counter`] - Identifier allocators (Redis `INCR`, in-memory)
//! - [`persistence`] - Mapping stores (PostgreSQL, in-memory)
//! - [`redis_connection`] - Shared Redis connection bootstrap

pub mod cache;
pub mod counter;
pub mod persistence;
pub mod redis_connection;
