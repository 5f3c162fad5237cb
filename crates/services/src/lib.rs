//! `docflow-services` — orchestration layer.
//!
//! Thin services invoking the registry, store, document aggregate and
//! payment processor in the authoritative order, and surfacing domain
//! errors unchanged.

pub mod approval;
pub mod archive;
pub mod auth;
pub mod document;
pub mod notifier;
pub mod payment;
pub mod search;

pub use approval::ApprovalService;
pub use archive::ArchiveService;
pub use auth::AuthService;
pub use document::DocumentService;
pub use notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use payment::PaymentService;
pub use search::SearchService;
