// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const REFRESH_SUCCESS: &str = "auth.refresh.success";
pub const REFRESH_REJECTED: &str = "auth.refresh.rejected";
pub const TOKEN_ISSUED: &str = "auth.token.issued";
pub const SESSION_CACHED: &str = "session.cached";
pub const SESSION_HIT: &str = "session.hit";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_SIZE: &str = "session.size";
