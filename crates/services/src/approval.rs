//! Approval orchestration: route construction and the approve/reject
//! outcomes of a review.

use std::sync::Arc;

use chrono::Utc;

use docflow_core::DomainResult;
use docflow_documents::DocumentCommand;
use docflow_storage::DocumentRepository;
use docflow_workflow::{ApprovalRoute, ApprovalStep};

use crate::notifier::Notifier;

pub struct ApprovalService {
    repo: Arc<dyn DocumentRepository>,
    notifier: Arc<dyn Notifier>,
}

impl ApprovalService {
    pub fn new(repo: Arc<dyn DocumentRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    /// Single-step review route for one role.
    pub fn route_for_role(&self, role_name: &str) -> ApprovalRoute {
        ApprovalRoute::new(
            format!("route:{role_name}"),
            vec![ApprovalStep::new("Review", role_name)],
        )
    }

    pub fn approve(&self, number: &str) -> DomainResult<()> {
        let mut doc = self.repo.get(number)?;
        doc.execute(&DocumentCommand::Approve {
            occurred_at: Utc::now(),
        })?;
        self.repo.save(&doc)?;
        tracing::info!(number, "document approved");
        self.notifier.notify(&format!("document approved: {number}"));
        Ok(())
    }

    pub fn reject(&self, number: &str, reason: &str) -> DomainResult<()> {
        let mut doc = self.repo.get(number)?;
        doc.execute(&DocumentCommand::Reject {
            reason: reason.to_string(),
            occurred_at: Utc::now(),
        })?;
        self.repo.save(&doc)?;
        tracing::warn!(number, reason, "document rejected");
        self.notifier.notify(&format!("document rejected: {number}"));
        Ok(())
    }
}
