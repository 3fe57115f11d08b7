//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod ping;
pub mod redirect;
pub mod shorten;
pub mod urls;

pub use health::health_handler;
pub use ping::ping_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use urls::{delete_url_handler, get_url_handler};
