//! Payment processor: atomic transfers between ledger accounts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docflow_core::{Aggregate, DomainError, DomainResult, ValueObject};

use crate::account::{Account, AccountCommand, Currency};

/// Processor-scoped transaction identifier, rendered `tx-<n>` with a
/// monotonically increasing sequence starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    fn from_sequence(n: usize) -> Self {
        Self(format!("tx-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
    Cancelled,
}

/// Immutable record of a settled transfer. Created exactly once per
/// successful transfer; owned by the processor's history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub src: String,
    pub dst: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl ValueObject for Transaction {}

/// Instruction to settle an invoice from one account to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub invoice_number: String,
    pub src_account: String,
    pub dst_account: String,
    pub amount: i64,
    pub currency: Currency,
}

impl ValueObject for PaymentOrder {}

/// Boundary to the transfer machinery; implementations are swappable
/// adapters.
pub trait PaymentProcessor: Send + Sync {
    /// Move `amount` from `src` to `dst` and record a transaction.
    ///
    /// Debit, credit and the transaction append are one atomic unit: a
    /// failure at any check mutates neither account and appends nothing.
    fn transfer(&self, src: &str, dst: &str, amount: i64) -> DomainResult<TransactionId>;
}

/// In-memory ledger + transfer log.
///
/// Each account sits behind its own mutex; transfers acquire both account
/// locks in account-number order, so transfers sharing an account serialize
/// while disjoint pairs proceed in parallel.
#[derive(Debug, Default)]
pub struct InMemoryPaymentProcessor {
    accounts: RwLock<HashMap<String, Arc<Mutex<Account>>>>,
    transactions: Mutex<Vec<Transaction>>,
}

impl InMemoryPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account to the ledger. The ledger owns the canonical balance
    /// from this point on.
    pub fn open_account(&self, account: Account) -> DomainResult<()> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))?;
        let number = account.number().to_string();
        if accounts.contains_key(&number) {
            return Err(DomainError::duplicate(format!(
                "account '{number}' already exists"
            )));
        }
        accounts.insert(number, Arc::new(Mutex::new(account)));
        Ok(())
    }

    /// Point-in-time copy of an account's state.
    pub fn account_snapshot(&self, number: &str) -> DomainResult<Account> {
        let handle = self.account_handle(number)?;
        let account = handle
            .lock()
            .map_err(|_| DomainError::conflict("account lock poisoned"))?;
        Ok(account.clone())
    }

    /// Run a single account command (freeze, overdraft change, manual
    /// credit) against the ledger's canonical copy.
    pub fn execute_on(&self, number: &str, command: &AccountCommand) -> DomainResult<()> {
        let handle = self.account_handle(number)?;
        let mut account = handle
            .lock()
            .map_err(|_| DomainError::conflict("account lock poisoned"))?;
        account.execute(command)?;
        Ok(())
    }

    /// Copy of the transaction history, in append order.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions
            .lock()
            .map(|txs| txs.clone())
            .unwrap_or_default()
    }

    fn account_handle(&self, number: &str) -> DomainResult<Arc<Mutex<Account>>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))?;
        accounts
            .get(number)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("account '{number}'")))
    }

    fn lock_account<'a>(
        handle: &'a Arc<Mutex<Account>>,
    ) -> DomainResult<MutexGuard<'a, Account>> {
        handle
            .lock()
            .map_err(|_| DomainError::conflict("account lock poisoned"))
    }
}

impl PaymentProcessor for InMemoryPaymentProcessor {
    fn transfer(&self, src: &str, dst: &str, amount: i64) -> DomainResult<TransactionId> {
        if src == dst {
            return Err(DomainError::payment(
                "source and destination accounts must differ",
            ));
        }

        let src_handle = self.account_handle(src)?;
        let dst_handle = self.account_handle(dst)?;

        // Fixed global lock ordering by account number avoids deadlock when
        // two transfers touch the same pair in opposite directions.
        let (mut first, mut second) = if src < dst {
            (
                Self::lock_account(&src_handle)?,
                Self::lock_account(&dst_handle)?,
            )
        } else {
            (
                Self::lock_account(&dst_handle)?,
                Self::lock_account(&src_handle)?,
            )
        };
        let (src_account, dst_account) = if src < dst {
            (&mut *first, &mut *second)
        } else {
            (&mut *second, &mut *first)
        };

        if src_account.currency() != dst_account.currency() {
            return Err(DomainError::payment(format!(
                "currency mismatch: '{}' is {}, '{}' is {}",
                src,
                src_account.currency(),
                dst,
                dst_account.currency()
            )));
        }

        let occurred_at = Utc::now();
        // Decide both legs before applying either, so a failed debit (or a
        // hypothetical failed credit) mutates neither account.
        let debit_events = src_account.handle(&AccountCommand::Debit {
            amount,
            occurred_at,
        })?;
        let credit_events = dst_account.handle(&AccountCommand::Credit {
            amount,
            occurred_at,
        })?;

        for event in &debit_events {
            src_account.apply(event);
        }
        for event in &credit_events {
            dst_account.apply(event);
        }

        // Appended while both account locks are held: the transfer and its
        // record are one atomic unit.
        let mut transactions = self
            .transactions
            .lock()
            .map_err(|_| DomainError::conflict("transaction log poisoned"))?;
        let id = TransactionId::from_sequence(transactions.len() + 1);
        transactions.push(Transaction {
            id: id.clone(),
            src: src.to_string(),
            dst: dst.to_string(),
            amount,
            created_at: occurred_at,
            status: TransactionStatus::Completed,
        });

        tracing::info!(tx = %id, src, dst, amount, "transfer completed");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor_with(accounts: Vec<Account>) -> InMemoryPaymentProcessor {
        let processor = InMemoryPaymentProcessor::new();
        for account in accounts {
            processor.open_account(account).unwrap();
        }
        processor
    }

    #[test]
    fn transfer_moves_funds_and_mints_sequential_ids() {
        let processor = processor_with(vec![
            Account::new("A", Currency::Byn, 10_000),
            Account::new("B", Currency::Byn, 2_000),
        ]);

        let tx = processor.transfer("A", "B", 1_500).unwrap();
        assert_eq!(tx.as_str(), "tx-1");
        assert_eq!(processor.account_snapshot("A").unwrap().balance(), 8_500);
        assert_eq!(processor.account_snapshot("B").unwrap().balance(), 3_500);

        let tx = processor.transfer("B", "A", 500).unwrap();
        assert_eq!(tx.as_str(), "tx-2");

        let history = processor.transactions();
        assert_eq!(history.len(), 2);
        assert!(history
            .iter()
            .all(|t| t.status == TransactionStatus::Completed));
    }

    #[test]
    fn currency_mismatch_mutates_nothing() {
        let processor = processor_with(vec![
            Account::new("A", Currency::Byn, 10_000),
            Account::new("B", Currency::Usd, 2_000),
        ]);

        let err = processor.transfer("A", "B", 1_000).unwrap_err();
        assert!(matches!(err, DomainError::Payment(_)));
        assert_eq!(processor.account_snapshot("A").unwrap().balance(), 10_000);
        assert_eq!(processor.account_snapshot("B").unwrap().balance(), 2_000);
        assert!(processor.transactions().is_empty());
    }

    #[test]
    fn failed_debit_never_touches_the_destination() {
        let processor = processor_with(vec![
            Account::new("A", Currency::Byn, 100),
            Account::new("B", Currency::Byn, 2_000),
        ]);

        let err = processor.transfer("A", "B", 1_000).unwrap_err();
        assert!(matches!(err, DomainError::Payment(_)));
        assert_eq!(processor.account_snapshot("A").unwrap().balance(), 100);
        assert_eq!(processor.account_snapshot("B").unwrap().balance(), 2_000);
        assert!(processor.transactions().is_empty());
    }

    #[test]
    fn unknown_accounts_are_reported() {
        let processor = processor_with(vec![Account::new("A", Currency::Byn, 100)]);
        assert!(matches!(
            processor.transfer("A", "missing", 10).unwrap_err(),
            DomainError::NotFound(_)
        ));
        assert!(matches!(
            processor.transfer("missing", "A", 10).unwrap_err(),
            DomainError::NotFound(_)
        ));
    }

    #[test]
    fn self_transfer_is_rejected() {
        let processor = processor_with(vec![Account::new("A", Currency::Byn, 100)]);
        let err = processor.transfer("A", "A", 10).unwrap_err();
        assert!(matches!(err, DomainError::Payment(_)));
    }

    #[test]
    fn duplicate_account_numbers_are_rejected() {
        let processor = processor_with(vec![Account::new("A", Currency::Byn, 100)]);
        let err = processor
            .open_account(Account::new("A", Currency::Eur, 0))
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[test]
    fn frozen_source_blocks_the_transfer() {
        let processor = processor_with(vec![
            Account::new("A", Currency::Byn, 10_000),
            Account::new("B", Currency::Byn, 0),
        ]);
        processor
            .execute_on(
                "A",
                &AccountCommand::Freeze {
                    occurred_at: Utc::now(),
                },
            )
            .unwrap();

        let err = processor.transfer("A", "B", 100).unwrap_err();
        assert!(matches!(err, DomainError::Payment(_)));
        assert_eq!(processor.account_snapshot("B").unwrap().balance(), 0);
    }

    #[test]
    fn concurrent_transfers_on_a_shared_account_serialize() {
        use std::sync::Arc;

        let processor = Arc::new(processor_with(vec![
            Account::new("A", Currency::Byn, 1_000),
            Account::new("B", Currency::Byn, 0),
            Account::new("C", Currency::Byn, 0),
        ]));

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let processor = Arc::clone(&processor);
                std::thread::spawn(move || {
                    let dst = if i % 2 == 0 { "B" } else { "C" };
                    processor.transfer("A", dst, 100)
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("transfer thread panicked").unwrap();
        }

        assert_eq!(processor.account_snapshot("A").unwrap().balance(), 0);
        let b = processor.account_snapshot("B").unwrap().balance();
        let c = processor.account_snapshot("C").unwrap().balance();
        assert_eq!(b + c, 1_000);
        assert_eq!(processor.transactions().len(), 10);
    }
}
