//! Document orchestration: registration, attachments, routing, signing,
//! archive/restore.

use std::sync::Arc;

use chrono::Utc;

use docflow_auth::User;
use docflow_core::{DomainError, DomainResult, UserId};
use docflow_documents::{
    Document, DocumentAttachment, DocumentCommand, DocumentRegistry,
};
use docflow_storage::DocumentRepository;
use docflow_workflow::ApprovalRoute;

use crate::notifier::Notifier;

pub struct DocumentService {
    repo: Arc<dyn DocumentRepository>,
    registry: Arc<DocumentRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl DocumentService {
    pub fn new(
        repo: Arc<dyn DocumentRepository>,
        registry: Arc<DocumentRegistry>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repo,
            registry,
            notifier,
        }
    }

    /// Register a new document: reserve its number, validate, persist,
    /// notify — in that order.
    ///
    /// The number reservation is NOT rolled back when validation fails; the
    /// number stays burned. Pinned by a test in `tests/document_flow.rs`.
    pub fn register(&self, doc: &Document) -> DomainResult<()> {
        self.registry.register(doc.number())?;
        doc.validate()?;
        self.repo.save(doc)?;
        tracing::info!(number = doc.number(), "document registered");
        self.notifier
            .notify(&format!("document registered: {}", doc.number()));
        Ok(())
    }

    pub fn add_version(
        &self,
        number: &str,
        content: impl Into<String>,
        author_id: UserId,
    ) -> DomainResult<()> {
        self.execute(
            number,
            &DocumentCommand::AddVersion {
                content: content.into(),
                author_id,
                occurred_at: Utc::now(),
            },
        )
    }

    pub fn add_attachment(&self, number: &str, attachment: DocumentAttachment) -> DomainResult<()> {
        self.execute(
            number,
            &DocumentCommand::AddAttachment {
                attachment,
                occurred_at: Utc::now(),
            },
        )
    }

    /// Attach a route and move the document into review.
    pub fn send_for_approval(&self, number: &str, route: ApprovalRoute) -> DomainResult<()> {
        self.execute(
            number,
            &DocumentCommand::SubmitForApproval {
                route,
                occurred_at: Utc::now(),
            },
        )?;
        self.notifier
            .notify(&format!("document sent for approval: {number}"));
        Ok(())
    }

    /// Sign on behalf of `user`. Blocked users are turned away before the
    /// document is consulted.
    pub fn sign(&self, number: &str, user: &User) -> DomainResult<()> {
        if user.is_blocked {
            return Err(DomainError::access_denied(format!(
                "user '{}' is blocked",
                user.login
            )));
        }
        self.execute(
            number,
            &DocumentCommand::Sign {
                user_id: user.id,
                certificate_id: docflow_core::CertificateId::new(),
                occurred_at: Utc::now(),
            },
        )
    }

    pub fn lock(&self, number: &str, user_id: UserId) -> DomainResult<()> {
        self.execute(
            number,
            &DocumentCommand::Lock {
                user_id,
                occurred_at: Utc::now(),
            },
        )
    }

    pub fn unlock(&self, number: &str, user_id: UserId) -> DomainResult<()> {
        self.execute(
            number,
            &DocumentCommand::Unlock {
                user_id,
                occurred_at: Utc::now(),
            },
        )
    }

    pub fn archive(&self, number: &str) -> DomainResult<()> {
        self.execute(
            number,
            &DocumentCommand::Archive {
                occurred_at: Utc::now(),
            },
        )
    }

    pub fn restore(&self, number: &str) -> DomainResult<()> {
        self.execute(
            number,
            &DocumentCommand::Restore {
                occurred_at: Utc::now(),
            },
        )
    }

    /// Fetch a snapshot, failing with `NotFound` for unknown numbers.
    pub fn require(&self, number: &str) -> DomainResult<Document> {
        self.repo.get(number)
    }

    /// Load → decide/evolve → save.
    fn execute(&self, number: &str, command: &DocumentCommand) -> DomainResult<()> {
        let mut doc = self.repo.get(number)?;
        doc.execute(command)?;
        self.repo.save(&doc)?;
        Ok(())
    }
}
