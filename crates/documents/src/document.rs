//! Document aggregate: lifecycle status machine, versions, attachments,
//! signatures and the advisory lock.
//!
//! # Invariants
//! - `status` only changes through the transitions encoded in `handle`.
//! - `versions` is append-only with 1-based sequential numbering; at least
//!   one version must exist before signing.
//! - An active lock rejects lock/unlock from non-owners.
//! - A rejected command leaves the aggregate untouched (`handle` is pure).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docflow_core::{
    Aggregate, AggregateRoot, CertificateId, DocumentId, DomainError, DomainResult, UserId,
    ValueObject,
};
use docflow_events::Event;
use docflow_workflow::ApprovalRoute;

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

/// Document lifecycle status.
///
/// `New → InReview → Approved → Archived`, with `New → Archived` also
/// permitted and `Archived → New` via restore. `Rejected` is reached by an
/// explicit reject from review; restore always resets to `New` (no state
/// history is kept).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    New,
    InReview,
    Approved,
    Rejected,
    Archived,
}

impl core::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            DocumentStatus::New => "new",
            DocumentStatus::InReview => "in_review",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Archived => "archived",
        };
        write!(f, "{s}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Value objects
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable content snapshot. Created only by `AddVersion`, never deleted
/// or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVersion {
    /// 1-based sequential number within the document.
    pub number: u32,
    pub content: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl ValueObject for DocumentVersion {}

/// Immutable record of a signing act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub user_id: UserId,
    pub certificate_id: CertificateId,
    pub signed_at: DateTime<Utc>,
}

impl ValueObject for Signature {}

/// File attached to a document. `size` is in bytes and is what the storage
/// quota accounts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAttachment {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub checksum: String,
}

impl ValueObject for DocumentAttachment {}

/// Cooperative, owner-checked marker. Does not itself provide mutual
/// exclusion; canonical copies are guarded by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLock {
    pub owner_id: UserId,
    pub acquired_at: DateTime<Utc>,
}

impl ValueObject for DocumentLock {}

/// Free-form tags and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DocumentMetadata {
    pub tags: Vec<String>,
    pub attributes: HashMap<String, String>,
}

/// Certificate referenced by signatures. Validity is a plain time window;
/// no cryptographic verification happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalCertificate {
    pub id: CertificateId,
    pub subject: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

impl DigitalCertificate {
    pub fn is_valid(&self, moment: DateTime<Utc>) -> bool {
        self.valid_from <= moment && moment <= self.valid_to
    }
}

impl ValueObject for DigitalCertificate {}

// ─────────────────────────────────────────────────────────────────────────────
// Kind
// ─────────────────────────────────────────────────────────────────────────────

/// Type-specific payload of a document.
///
/// One record with a variant discriminator instead of a class hierarchy;
/// `validate` dispatches on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentKind {
    Generic,
    Incoming {
        sender: String,
    },
    Outgoing {
        recipient: String,
    },
    Contract {
        effective_from: Option<DateTime<Utc>>,
        effective_to: Option<DateTime<Utc>>,
        /// Contract value in minor currency units.
        total_amount: i64,
    },
    Invoice {
        /// Amount owed in minor currency units.
        amount_due: i64,
        due_date: Option<DateTime<Utc>>,
        paid: bool,
    },
    Order {
        items: Vec<String>,
    },
}

impl DocumentKind {
    pub fn invoice(amount_due: i64, due_date: Option<DateTime<Utc>>) -> Self {
        Self::Invoice {
            amount_due,
            due_date,
            paid: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate root: Document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    /// Externally visible unique business key, distinct from `id`.
    number: String,
    title: String,
    author: UserId,
    kind: DocumentKind,
    status: DocumentStatus,
    versions: Vec<DocumentVersion>,
    attachments: Vec<DocumentAttachment>,
    signatures: Vec<Signature>,
    approval_route: Option<ApprovalRoute>,
    metadata: DocumentMetadata,
    lock: Option<DocumentLock>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Document {
    pub fn new(
        id: DocumentId,
        number: impl Into<String>,
        title: impl Into<String>,
        author: UserId,
        kind: DocumentKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            number: number.into(),
            title: title.into(),
            author,
            kind,
            status: DocumentStatus::New,
            versions: Vec::new(),
            attachments: Vec::new(),
            signatures: Vec::new(),
            approval_route: None,
            metadata: DocumentMetadata::default(),
            lock: None,
            created_at,
            updated_at: created_at,
            version: 0,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> UserId {
        self.author
    }

    pub fn kind(&self) -> &DocumentKind {
        &self.kind
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn versions(&self) -> &[DocumentVersion] {
        &self.versions
    }

    pub fn attachments(&self) -> &[DocumentAttachment] {
        &self.attachments
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn approval_route(&self) -> Option<&ApprovalRoute> {
        self.approval_route.as_ref()
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut DocumentMetadata {
        &mut self.metadata
    }

    pub fn lock_holder(&self) -> Option<UserId> {
        self.lock.as_ref().map(|l| l.owner_id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether an invoice document has been settled. `false` for every other
    /// kind.
    pub fn is_paid(&self) -> bool {
        matches!(self.kind, DocumentKind::Invoice { paid: true, .. })
    }

    /// Field-level validation. Kind variants add their own constraints on
    /// top of the shared title/number checks.
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.is_empty() || self.number.is_empty() {
            return Err(DomainError::validation("title and number are required"));
        }
        if let DocumentKind::Contract {
            effective_from: Some(from),
            effective_to: Some(to),
            ..
        } = &self.kind
        {
            if to < from {
                return Err(DomainError::validation(
                    "contract effective_to precedes effective_from",
                ));
            }
        }
        Ok(())
    }
}

impl AggregateRoot for Document {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentCommand {
    /// Attach an approval route and move the document into review.
    SubmitForApproval {
        route: ApprovalRoute,
        occurred_at: DateTime<Utc>,
    },
    Approve {
        occurred_at: DateTime<Utc>,
    },
    Reject {
        reason: String,
        occurred_at: DateTime<Utc>,
    },
    AddVersion {
        content: String,
        author_id: UserId,
        occurred_at: DateTime<Utc>,
    },
    AddAttachment {
        attachment: DocumentAttachment,
        occurred_at: DateTime<Utc>,
    },
    Sign {
        user_id: UserId,
        certificate_id: CertificateId,
        occurred_at: DateTime<Utc>,
    },
    Lock {
        user_id: UserId,
        occurred_at: DateTime<Utc>,
    },
    Unlock {
        user_id: UserId,
        occurred_at: DateTime<Utc>,
    },
    Archive {
        occurred_at: DateTime<Utc>,
    },
    Restore {
        occurred_at: DateTime<Utc>,
    },
    /// Settle an invoice document. Legal only for the invoice kind.
    MarkPaid {
        occurred_at: DateTime<Utc>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentEvent {
    SubmittedForApproval {
        route: ApprovalRoute,
        occurred_at: DateTime<Utc>,
    },
    Approved {
        occurred_at: DateTime<Utc>,
    },
    Rejected {
        reason: String,
        occurred_at: DateTime<Utc>,
    },
    VersionAdded {
        version: DocumentVersion,
        occurred_at: DateTime<Utc>,
    },
    AttachmentAdded {
        attachment: DocumentAttachment,
        occurred_at: DateTime<Utc>,
    },
    Signed {
        signature: Signature,
        occurred_at: DateTime<Utc>,
    },
    Locked {
        lock: DocumentLock,
        occurred_at: DateTime<Utc>,
    },
    Unlocked {
        occurred_at: DateTime<Utc>,
    },
    Archived {
        occurred_at: DateTime<Utc>,
    },
    Restored {
        occurred_at: DateTime<Utc>,
    },
    MarkedPaid {
        occurred_at: DateTime<Utc>,
    },
}

impl Event for DocumentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::SubmittedForApproval { .. } => {
                "documents.document.submitted_for_approval"
            }
            DocumentEvent::Approved { .. } => "documents.document.approved",
            DocumentEvent::Rejected { .. } => "documents.document.rejected",
            DocumentEvent::VersionAdded { .. } => "documents.document.version_added",
            DocumentEvent::AttachmentAdded { .. } => "documents.document.attachment_added",
            DocumentEvent::Signed { .. } => "documents.document.signed",
            DocumentEvent::Locked { .. } => "documents.document.locked",
            DocumentEvent::Unlocked { .. } => "documents.document.unlocked",
            DocumentEvent::Archived { .. } => "documents.document.archived",
            DocumentEvent::Restored { .. } => "documents.document.restored",
            DocumentEvent::MarkedPaid { .. } => "documents.document.marked_paid",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DocumentEvent::SubmittedForApproval { occurred_at, .. }
            | DocumentEvent::Approved { occurred_at }
            | DocumentEvent::Rejected { occurred_at, .. }
            | DocumentEvent::VersionAdded { occurred_at, .. }
            | DocumentEvent::AttachmentAdded { occurred_at, .. }
            | DocumentEvent::Signed { occurred_at, .. }
            | DocumentEvent::Locked { occurred_at, .. }
            | DocumentEvent::Unlocked { occurred_at }
            | DocumentEvent::Archived { occurred_at }
            | DocumentEvent::Restored { occurred_at }
            | DocumentEvent::MarkedPaid { occurred_at } => *occurred_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Execution
// ─────────────────────────────────────────────────────────────────────────────

impl Aggregate for Document {
    type Command = DocumentCommand;
    type Event = DocumentEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DocumentEvent::SubmittedForApproval { route, .. } => {
                self.approval_route = Some(route.clone());
                self.status = DocumentStatus::InReview;
            }
            DocumentEvent::Approved { .. } => {
                self.status = DocumentStatus::Approved;
            }
            DocumentEvent::Rejected { .. } => {
                self.status = DocumentStatus::Rejected;
            }
            DocumentEvent::VersionAdded { version, .. } => {
                self.versions.push(version.clone());
            }
            DocumentEvent::AttachmentAdded { attachment, .. } => {
                self.attachments.push(attachment.clone());
            }
            DocumentEvent::Signed { signature, .. } => {
                self.signatures.push(signature.clone());
            }
            DocumentEvent::Locked { lock, .. } => {
                self.lock = Some(lock.clone());
            }
            DocumentEvent::Unlocked { .. } => {
                self.lock = None;
            }
            DocumentEvent::Archived { .. } => {
                self.status = DocumentStatus::Archived;
            }
            DocumentEvent::Restored { .. } => {
                // No state history is kept; restore always lands on New.
                self.status = DocumentStatus::New;
            }
            DocumentEvent::MarkedPaid { .. } => {
                if let DocumentKind::Invoice { paid, .. } = &mut self.kind {
                    *paid = true;
                }
            }
        }

        self.updated_at = event.occurred_at();
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            DocumentCommand::SubmitForApproval { route, occurred_at } => {
                if self.status != DocumentStatus::New {
                    return Err(DomainError::invalid_state(format!(
                        "cannot submit for approval from status '{}'",
                        self.status
                    )));
                }
                Ok(vec![DocumentEvent::SubmittedForApproval {
                    route: route.clone(),
                    occurred_at: *occurred_at,
                }])
            }
            DocumentCommand::Approve { occurred_at } => {
                if !matches!(self.status, DocumentStatus::New | DocumentStatus::InReview) {
                    return Err(DomainError::invalid_state(format!(
                        "cannot approve from status '{}'",
                        self.status
                    )));
                }
                Ok(vec![DocumentEvent::Approved {
                    occurred_at: *occurred_at,
                }])
            }
            DocumentCommand::Reject {
                reason,
                occurred_at,
            } => {
                if self.status != DocumentStatus::InReview {
                    return Err(DomainError::invalid_state(format!(
                        "cannot reject from status '{}'",
                        self.status
                    )));
                }
                Ok(vec![DocumentEvent::Rejected {
                    reason: reason.clone(),
                    occurred_at: *occurred_at,
                }])
            }
            DocumentCommand::AddVersion {
                content,
                author_id,
                occurred_at,
            } => Ok(vec![DocumentEvent::VersionAdded {
                version: DocumentVersion {
                    number: self.versions.len() as u32 + 1,
                    content: content.clone(),
                    author_id: *author_id,
                    created_at: *occurred_at,
                },
                occurred_at: *occurred_at,
            }]),
            DocumentCommand::AddAttachment {
                attachment,
                occurred_at,
            } => Ok(vec![DocumentEvent::AttachmentAdded {
                attachment: attachment.clone(),
                occurred_at: *occurred_at,
            }]),
            DocumentCommand::Sign {
                user_id,
                certificate_id,
                occurred_at,
            } => {
                if self.versions.is_empty() {
                    return Err(DomainError::invalid_signature(
                        "nothing to sign: document has no versions",
                    ));
                }
                Ok(vec![DocumentEvent::Signed {
                    signature: Signature {
                        user_id: *user_id,
                        certificate_id: *certificate_id,
                        signed_at: *occurred_at,
                    },
                    occurred_at: *occurred_at,
                }])
            }
            DocumentCommand::Lock {
                user_id,
                occurred_at,
            } => {
                if let Some(lock) = &self.lock {
                    if lock.owner_id != *user_id {
                        return Err(DomainError::conflict(
                            "document is locked by another user",
                        ));
                    }
                }
                Ok(vec![DocumentEvent::Locked {
                    lock: DocumentLock {
                        owner_id: *user_id,
                        acquired_at: *occurred_at,
                    },
                    occurred_at: *occurred_at,
                }])
            }
            DocumentCommand::Unlock {
                user_id,
                occurred_at,
            } => {
                if let Some(lock) = &self.lock {
                    if lock.owner_id != *user_id {
                        return Err(DomainError::conflict(
                            "only the lock owner may unlock the document",
                        ));
                    }
                }
                Ok(vec![DocumentEvent::Unlocked {
                    occurred_at: *occurred_at,
                }])
            }
            DocumentCommand::Archive { occurred_at } => {
                if self.status == DocumentStatus::Archived {
                    return Err(DomainError::invalid_state("document is already archived"));
                }
                Ok(vec![DocumentEvent::Archived {
                    occurred_at: *occurred_at,
                }])
            }
            DocumentCommand::Restore { occurred_at } => {
                if self.status != DocumentStatus::Archived {
                    return Err(DomainError::invalid_state(
                        "only archived documents can be restored",
                    ));
                }
                Ok(vec![DocumentEvent::Restored {
                    occurred_at: *occurred_at,
                }])
            }
            DocumentCommand::MarkPaid { occurred_at } => match &self.kind {
                DocumentKind::Invoice { .. } => Ok(vec![DocumentEvent::MarkedPaid {
                    occurred_at: *occurred_at,
                }]),
                _ => Err(DomainError::invalid_state(
                    "only invoice documents can be marked paid",
                )),
            },
        }
    }
}

impl Document {
    /// Decide and immediately evolve: `handle` + `apply` for each emitted
    /// event. On failure the document is untouched.
    pub fn execute(&mut self, command: &DocumentCommand) -> DomainResult<Vec<DocumentEvent>> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflow_workflow::ApprovalStep;
    use proptest::prelude::*;

    fn test_doc(kind: DocumentKind) -> Document {
        Document::new(
            DocumentId::new(),
            "DOC-1",
            "Quarterly report",
            UserId::new(),
            kind,
            Utc::now(),
        )
    }

    fn review_route() -> ApprovalRoute {
        ApprovalRoute::new("review", vec![ApprovalStep::new("Review", "manager")])
    }

    fn at() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn sign_without_versions_fails() {
        let mut doc = test_doc(DocumentKind::Generic);
        let err = doc
            .execute(&DocumentCommand::Sign {
                user_id: UserId::new(),
                certificate_id: CertificateId::new(),
                occurred_at: at(),
            })
            .unwrap_err();
        match err {
            DomainError::InvalidSignature(_) => {}
            other => panic!("expected InvalidSignature, got {other:?}"),
        }
        assert!(doc.signatures().is_empty());
    }

    #[test]
    fn sign_after_one_version_appends_exactly_one_signature() {
        let mut doc = test_doc(DocumentKind::Generic);
        doc.execute(&DocumentCommand::AddVersion {
            content: "draft".into(),
            author_id: UserId::new(),
            occurred_at: at(),
        })
        .unwrap();
        doc.execute(&DocumentCommand::Sign {
            user_id: UserId::new(),
            certificate_id: CertificateId::new(),
            occurred_at: at(),
        })
        .unwrap();
        assert_eq!(doc.signatures().len(), 1);
        // Signing does not change status.
        assert_eq!(doc.status(), DocumentStatus::New);
    }

    #[test]
    fn versions_are_numbered_sequentially_from_one() {
        let mut doc = test_doc(DocumentKind::Generic);
        for i in 1..=3u32 {
            doc.execute(&DocumentCommand::AddVersion {
                content: format!("rev {i}"),
                author_id: UserId::new(),
                occurred_at: at(),
            })
            .unwrap();
        }
        let numbers: Vec<u32> = doc.versions().iter().map(|v| v.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn approve_is_legal_from_new_and_in_review_only() {
        let mut doc = test_doc(DocumentKind::Generic);
        doc.execute(&DocumentCommand::Approve { occurred_at: at() })
            .unwrap();
        assert_eq!(doc.status(), DocumentStatus::Approved);

        let err = doc
            .execute(&DocumentCommand::Approve { occurred_at: at() })
            .unwrap_err();
        match err {
            DomainError::InvalidState(_) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn submit_then_approve_through_review() {
        let mut doc = test_doc(DocumentKind::Generic);
        doc.execute(&DocumentCommand::SubmitForApproval {
            route: review_route(),
            occurred_at: at(),
        })
        .unwrap();
        assert_eq!(doc.status(), DocumentStatus::InReview);
        assert!(doc.approval_route().is_some());

        doc.execute(&DocumentCommand::Approve { occurred_at: at() })
            .unwrap();
        assert_eq!(doc.status(), DocumentStatus::Approved);
    }

    #[test]
    fn reject_is_legal_only_from_review() {
        let mut doc = test_doc(DocumentKind::Generic);
        let err = doc
            .execute(&DocumentCommand::Reject {
                reason: "missing data".into(),
                occurred_at: at(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        doc.execute(&DocumentCommand::SubmitForApproval {
            route: review_route(),
            occurred_at: at(),
        })
        .unwrap();
        doc.execute(&DocumentCommand::Reject {
            reason: "missing data".into(),
            occurred_at: at(),
        })
        .unwrap();
        assert_eq!(doc.status(), DocumentStatus::Rejected);
    }

    #[test]
    fn double_archive_fails_and_restore_resets_to_new() {
        let mut doc = test_doc(DocumentKind::Generic);
        doc.execute(&DocumentCommand::Archive { occurred_at: at() })
            .unwrap();
        assert_eq!(doc.status(), DocumentStatus::Archived);

        let err = doc
            .execute(&DocumentCommand::Archive { occurred_at: at() })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        doc.execute(&DocumentCommand::Restore { occurred_at: at() })
            .unwrap();
        assert_eq!(doc.status(), DocumentStatus::New);
    }

    #[test]
    fn restore_requires_archived() {
        let mut doc = test_doc(DocumentKind::Generic);
        let err = doc
            .execute(&DocumentCommand::Restore { occurred_at: at() })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn archive_is_legal_from_approved() {
        let mut doc = test_doc(DocumentKind::Generic);
        doc.execute(&DocumentCommand::Approve { occurred_at: at() })
            .unwrap();
        doc.execute(&DocumentCommand::Archive { occurred_at: at() })
            .unwrap();
        assert_eq!(doc.status(), DocumentStatus::Archived);
    }

    #[test]
    fn lock_is_exclusive_to_its_owner() {
        let mut doc = test_doc(DocumentKind::Generic);
        let alice = UserId::new();
        let bob = UserId::new();

        doc.execute(&DocumentCommand::Lock {
            user_id: alice,
            occurred_at: at(),
        })
        .unwrap();
        assert_eq!(doc.lock_holder(), Some(alice));

        let err = doc
            .execute(&DocumentCommand::Lock {
                user_id: bob,
                occurred_at: at(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err = doc
            .execute(&DocumentCommand::Unlock {
                user_id: bob,
                occurred_at: at(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        doc.execute(&DocumentCommand::Unlock {
            user_id: alice,
            occurred_at: at(),
        })
        .unwrap();
        assert_eq!(doc.lock_holder(), None);
    }

    #[test]
    fn relock_by_owner_refreshes_the_lock() {
        let mut doc = test_doc(DocumentKind::Generic);
        let alice = UserId::new();
        doc.execute(&DocumentCommand::Lock {
            user_id: alice,
            occurred_at: at(),
        })
        .unwrap();
        doc.execute(&DocumentCommand::Lock {
            user_id: alice,
            occurred_at: at(),
        })
        .unwrap();
        assert_eq!(doc.lock_holder(), Some(alice));
    }

    #[test]
    fn validate_rejects_empty_title_or_number() {
        let doc = Document::new(
            DocumentId::new(),
            "",
            "Has a title",
            UserId::new(),
            DocumentKind::Generic,
            Utc::now(),
        );
        assert!(matches!(
            doc.validate().unwrap_err(),
            DomainError::Validation(_)
        ));

        let doc = Document::new(
            DocumentId::new(),
            "DOC-2",
            "",
            UserId::new(),
            DocumentKind::Generic,
            Utc::now(),
        );
        assert!(matches!(
            doc.validate().unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn contract_validation_checks_date_ordering() {
        let now = Utc::now();
        let doc = test_doc(DocumentKind::Contract {
            effective_from: Some(now),
            effective_to: Some(now - chrono::Duration::days(1)),
            total_amount: 5000,
        });
        assert!(matches!(
            doc.validate().unwrap_err(),
            DomainError::Validation(_)
        ));

        let doc = test_doc(DocumentKind::Contract {
            effective_from: Some(now),
            effective_to: Some(now + chrono::Duration::days(30)),
            total_amount: 5000,
        });
        doc.validate().unwrap();
    }

    #[test]
    fn mark_paid_is_invoice_only() {
        let mut doc = test_doc(DocumentKind::Generic);
        let err = doc
            .execute(&DocumentCommand::MarkPaid { occurred_at: at() })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        let mut invoice = test_doc(DocumentKind::invoice(1000, None));
        assert!(!invoice.is_paid());
        invoice
            .execute(&DocumentCommand::MarkPaid { occurred_at: at() })
            .unwrap();
        assert!(invoice.is_paid());
    }

    #[test]
    fn applied_events_bump_aggregate_version_and_updated_at() {
        let mut doc = test_doc(DocumentKind::Generic);
        let created = doc.created_at();
        let later = created + chrono::Duration::seconds(5);
        doc.execute(&DocumentCommand::AddVersion {
            content: "draft".into(),
            author_id: UserId::new(),
            occurred_at: later,
        })
        .unwrap();
        assert_eq!(AggregateRoot::version(&doc), 1);
        assert_eq!(doc.updated_at(), later);
    }

    proptest! {
        /// Property: version numbers are always 1..=n in order, whatever
        /// content gets appended.
        #[test]
        fn version_numbering_is_dense_and_ordered(
            contents in prop::collection::vec(".*", 1..20)
        ) {
            let mut doc = test_doc(DocumentKind::Generic);
            for content in &contents {
                doc.execute(&DocumentCommand::AddVersion {
                    content: content.clone(),
                    author_id: UserId::new(),
                    occurred_at: Utc::now(),
                }).unwrap();
            }
            let numbers: Vec<u32> = doc.versions().iter().map(|v| v.number).collect();
            let expected: Vec<u32> = (1..=contents.len() as u32).collect();
            prop_assert_eq!(numbers, expected);
        }
    }
}
