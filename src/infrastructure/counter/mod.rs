//! Identifier allocators.
//!
//! - [`RedisCounter`] - Shared Redis `INCR` counter (production)
//! - [`MemoryCounter`] - Single-process atomic counter

mod memory_counter;
mod redis_counter;

pub use memory_counter::MemoryCounter;
pub use redis_counter::RedisCounter;
