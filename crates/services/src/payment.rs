//! Invoice settlement: transfer first, mark paid second.

use std::sync::Arc;

use chrono::Utc;

use docflow_core::{Aggregate, DomainResult};
use docflow_documents::DocumentCommand;
use docflow_payments::{PaymentOrder, PaymentProcessor, TransactionId};
use docflow_storage::DocumentRepository;

use crate::notifier::Notifier;

pub struct PaymentService {
    processor: Arc<dyn PaymentProcessor>,
    repo: Arc<dyn DocumentRepository>,
    notifier: Arc<dyn Notifier>,
}

impl PaymentService {
    pub fn new(
        processor: Arc<dyn PaymentProcessor>,
        repo: Arc<dyn DocumentRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            processor,
            repo,
            notifier,
        }
    }

    /// Settle an invoice document.
    ///
    /// Ordering is transfer-then-mark: the invoice can never be flagged paid
    /// without a successful underlying transfer. The mark-paid decision is
    /// taken (pure) before money moves, so a non-invoice document fails
    /// before any funds leave `src`.
    pub fn pay_invoice(
        &self,
        number: &str,
        src: &str,
        dst: &str,
        amount: i64,
    ) -> DomainResult<TransactionId> {
        let mut doc = self.repo.get(number)?;
        let events = doc.handle(&DocumentCommand::MarkPaid {
            occurred_at: Utc::now(),
        })?;

        let tx = self.processor.transfer(src, dst, amount)?;

        for event in &events {
            doc.apply(event);
        }
        self.repo.save(&doc)?;

        tracing::info!(number, tx = %tx, amount, "invoice paid");
        self.notifier
            .notify(&format!("invoice {number} paid: {tx}"));
        Ok(tx)
    }

    pub fn pay_order(&self, order: &PaymentOrder) -> DomainResult<TransactionId> {
        self.pay_invoice(
            &order.invoice_number,
            &order.src_account,
            &order.dst_account,
            order.amount,
        )
    }
}
