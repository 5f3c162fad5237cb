//! Account aggregate: balance in integer minor units, optional overdraft,
//! freeze policy.
//!
//! # Invariants
//! - `balance + overdraft_limit >= 0` after any debit.
//! - Frozen accounts reject both debit and credit.
//! - A rejected command leaves the balance unchanged (`handle` is pure).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docflow_core::{Aggregate, AggregateRoot, DomainError};
use docflow_events::Event;

/// Supported settlement currencies. No conversion: both sides of a transfer
/// must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Byn,
    Usd,
    Eur,
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Currency::Byn => "BYN",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        };
        write!(f, "{s}")
    }
}

/// Aggregate root: Account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    number: String,
    currency: Currency,
    /// Balance in minor units; may be negative within the overdraft limit.
    balance: i64,
    /// Always >= 0.
    overdraft_limit: i64,
    frozen: bool,
    version: u64,
}

impl Account {
    pub fn new(number: impl Into<String>, currency: Currency, balance: i64) -> Self {
        Self {
            number: number.into(),
            currency,
            balance,
            overdraft_limit: 0,
            frozen: false,
            version: 0,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn overdraft_limit(&self) -> i64 {
        self.overdraft_limit
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn ensure_operable(&self) -> Result<(), DomainError> {
        if self.frozen {
            return Err(DomainError::payment(format!(
                "account '{}' is frozen",
                self.number
            )));
        }
        Ok(())
    }

    fn ensure_non_negative(amount: i64) -> Result<(), DomainError> {
        if amount < 0 {
            return Err(DomainError::payment("amount must not be negative"));
        }
        Ok(())
    }
}

impl AggregateRoot for Account {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.number
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountCommand {
    Debit {
        amount: i64,
        occurred_at: DateTime<Utc>,
    },
    Credit {
        amount: i64,
        occurred_at: DateTime<Utc>,
    },
    Freeze {
        occurred_at: DateTime<Utc>,
    },
    Unfreeze {
        occurred_at: DateTime<Utc>,
    },
    SetOverdraftLimit {
        limit: i64,
        occurred_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountEvent {
    Debited {
        amount: i64,
        new_balance: i64,
        occurred_at: DateTime<Utc>,
    },
    Credited {
        amount: i64,
        new_balance: i64,
        occurred_at: DateTime<Utc>,
    },
    Frozen {
        occurred_at: DateTime<Utc>,
    },
    Unfrozen {
        occurred_at: DateTime<Utc>,
    },
    OverdraftLimitSet {
        limit: i64,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for AccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::Debited { .. } => "payments.account.debited",
            AccountEvent::Credited { .. } => "payments.account.credited",
            AccountEvent::Frozen { .. } => "payments.account.frozen",
            AccountEvent::Unfrozen { .. } => "payments.account.unfrozen",
            AccountEvent::OverdraftLimitSet { .. } => "payments.account.overdraft_limit_set",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AccountEvent::Debited { occurred_at, .. }
            | AccountEvent::Credited { occurred_at, .. }
            | AccountEvent::Frozen { occurred_at }
            | AccountEvent::Unfrozen { occurred_at }
            | AccountEvent::OverdraftLimitSet { occurred_at, .. } => *occurred_at,
        }
    }
}

impl Aggregate for Account {
    type Command = AccountCommand;
    type Event = AccountEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            AccountEvent::Debited { new_balance, .. }
            | AccountEvent::Credited { new_balance, .. } => {
                self.balance = *new_balance;
            }
            AccountEvent::Frozen { .. } => {
                self.frozen = true;
            }
            AccountEvent::Unfrozen { .. } => {
                self.frozen = false;
            }
            AccountEvent::OverdraftLimitSet { limit, .. } => {
                self.overdraft_limit = *limit;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            AccountCommand::Debit {
                amount,
                occurred_at,
            } => {
                Self::ensure_non_negative(*amount)?;
                self.ensure_operable()?;

                // Effective spending power is balance + overdraft_limit.
                let headroom = self
                    .balance
                    .checked_add(self.overdraft_limit)
                    .ok_or_else(|| DomainError::payment("overdraft window overflow"))?;
                if headroom < *amount {
                    return Err(DomainError::payment(format!(
                        "insufficient funds on account '{}'",
                        self.number
                    )));
                }
                let new_balance = self
                    .balance
                    .checked_sub(*amount)
                    .ok_or_else(|| DomainError::payment("balance overflow"))?;
                Ok(vec![AccountEvent::Debited {
                    amount: *amount,
                    new_balance,
                    occurred_at: *occurred_at,
                }])
            }
            AccountCommand::Credit {
                amount,
                occurred_at,
            } => {
                Self::ensure_non_negative(*amount)?;
                self.ensure_operable()?;

                let new_balance = self
                    .balance
                    .checked_add(*amount)
                    .ok_or_else(|| DomainError::payment("balance overflow"))?;
                Ok(vec![AccountEvent::Credited {
                    amount: *amount,
                    new_balance,
                    occurred_at: *occurred_at,
                }])
            }
            AccountCommand::Freeze { occurred_at } => Ok(vec![AccountEvent::Frozen {
                occurred_at: *occurred_at,
            }]),
            AccountCommand::Unfreeze { occurred_at } => Ok(vec![AccountEvent::Unfrozen {
                occurred_at: *occurred_at,
            }]),
            AccountCommand::SetOverdraftLimit {
                limit,
                occurred_at,
            } => {
                if *limit < 0 {
                    return Err(DomainError::payment(
                        "overdraft limit must not be negative",
                    ));
                }
                Ok(vec![AccountEvent::OverdraftLimitSet {
                    limit: *limit,
                    occurred_at: *occurred_at,
                }])
            }
        }
    }
}

impl Account {
    /// `handle` + `apply` in one step. On failure the account is untouched.
    pub fn execute(&mut self, command: &AccountCommand) -> Result<Vec<AccountEvent>, DomainError> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }
}
