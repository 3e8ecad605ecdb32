//! Listing Cache - a property-listing backend with a look-aside cache
//!
//! Reads of listings, favorites and profiles go through a typed cache facade
//! over Redis or an in-process TTL store; every write invalidates the keys it
//! affects after the document store commits.

pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
