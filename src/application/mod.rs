//! Application layer services implementing business logic.
//!
//! Services consume the domain traits and expose the operations used by the
//! HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - Create, resolve and delete short links

pub mod services;
