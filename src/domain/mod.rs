//! Domain layer containing entities, errors and backend contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures ([`entities::UrlMapping`])
//! - [`repositories`] - Allocator and store trait definitions
//! - [`error`] - [`error::ShortenerError`] taxonomy
//! - [`hit_event`] / [`hit_worker`] - Asynchronous hit counting
//!
//! The domain layer depends on no infrastructure. Orchestration lives in
//! [`crate::application::services`].
//!
//! # Hit Counting Flow
//!
//! 1. A resolve succeeds in the shortener service
//! 2. A [`hit_event::HitEvent`] is offered to a bounded channel (non-blocking)
//! 3. [`hit_worker::run_hit_worker`] increments the stored hit count

pub mod entities;
pub mod error;
pub mod hit_event;
pub mod hit_worker;
pub mod repositories;
