// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod clock;
pub mod enrich;
pub mod password;
pub mod session;
pub mod side_channel;
pub mod token;
pub mod work_time;
mod service;
mod service_impl;

pub use clock::{Clock, FixedClock, SystemClock};
pub use enrich::RoleEnricher;
pub use password::{hash_password, verify_password, validate_password_strength, PasswordRequirements, MIN_PASSWORD_LENGTH};
pub use session::SessionCache;
pub use side_channel::{MemorySideChannel, SideChannel};
pub use token::{Claims, TokenIssuer, TokenPair};
pub use service::{AuthService, LoginOutcome};
pub use service_impl::DefaultAuth;
