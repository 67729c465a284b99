//! Authentication utilities
//!
//! Token issuance lives in the auth service; this crate only needs to verify
//! access tokens to identify the acting user (plus mint short-lived tokens
//! for tests and local tooling).

mod jwt;

pub use jwt::{Claims, JwtService};
