//! `docflow-documents` — the document lifecycle state machine and the
//! document-number registry.

pub mod document;
pub mod registry;

pub use document::{
    DigitalCertificate, Document, DocumentAttachment, DocumentCommand, DocumentEvent,
    DocumentKind, DocumentLock, DocumentMetadata, DocumentStatus, DocumentVersion, Signature,
};
pub use registry::DocumentRegistry;
