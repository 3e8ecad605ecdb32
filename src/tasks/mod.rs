//! Background Tasks Module
//!
//! Periodic work that runs alongside the HTTP server.
//!
//! # Tasks
//! - Expiry sweep: drops expired entries from the in-process cache backend

mod cleanup;

pub use cleanup::spawn_cleanup_task;
