// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the employee management API.

pub mod auth;

pub use auth::{access_token, require_auth};
