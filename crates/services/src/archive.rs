//! Archive round trip over the store.

use std::sync::Arc;

use chrono::Utc;

use docflow_core::DomainResult;
use docflow_documents::DocumentCommand;
use docflow_storage::DocumentRepository;

pub struct ArchiveService {
    repo: Arc<dyn DocumentRepository>,
}

impl ArchiveService {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    pub fn archive_document(&self, number: &str) -> DomainResult<()> {
        let mut doc = self.repo.get(number)?;
        doc.execute(&DocumentCommand::Archive {
            occurred_at: Utc::now(),
        })?;
        self.repo.save(&doc)
    }

    /// Restore lands on `New` regardless of the status the document held
    /// before archiving; no state history is kept.
    pub fn restore_document(&self, number: &str) -> DomainResult<()> {
        let mut doc = self.repo.get(number)?;
        doc.execute(&DocumentCommand::Restore {
            occurred_at: Utc::now(),
        })?;
        self.repo.save(&doc)
    }
}
