//! Authorization for accounts.
//!
//! Permissions are granted through group configuration and through an
//! account's own `access` map. Decisions are plain booleans: authorization
//! is never an error and fails closed.

pub mod engine;
pub mod permission;

pub use engine::{AuthorizationEngine, Decision, Reason, action_key};
pub use permission::{Permission, is_negative, is_positive};
