//! `docflow-workflow` — approval routes and review tasks.

pub mod route;

pub use route::{ApprovalRoute, ApprovalStep, ApprovalTask};
