//! `docflow-storage` — the document store boundary.
//!
//! The store owns the canonical copy of each saved document; callers operate
//! on snapshots obtained from it and write back through `save`.

pub mod in_memory;
pub mod quota;
pub mod repository;

pub use in_memory::InMemoryDocumentStore;
pub use quota::QuotaManager;
pub use repository::DocumentRepository;
