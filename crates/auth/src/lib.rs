//! `docflow-auth` — users, roles and credential checks.
//!
//! The document/payment core consumes this crate read-only through a narrow
//! surface: user id, `is_blocked`, and permission checks.

pub mod roles;
pub mod security;
pub mod user;

pub use roles::{AccessPolicy, Permission, Role};
pub use security::{PasswordPolicy, Session, Token};
pub use user::User;
