//! `docflow-payments` — account ledger and the transactional payment
//! processor that settles invoices.

pub mod account;
pub mod processor;

pub use account::{Account, AccountCommand, AccountEvent, Currency};
pub use processor::{
    InMemoryPaymentProcessor, PaymentOrder, PaymentProcessor, Transaction, TransactionId,
    TransactionStatus,
};
