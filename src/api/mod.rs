//! API Module
//!
//! HTTP surface of the listing backend: shared state, the bearer-token
//! extractor, per-resource handlers and the router.

mod extract;
pub mod handlers;
pub mod routes;
mod state;

pub use extract::AuthUser;
pub use routes::create_router;
pub use state::AppState;
