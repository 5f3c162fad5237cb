//! Document-number registry: uniqueness of the business key.

use std::collections::HashSet;
use std::sync::RwLock;

use docflow_core::{DomainError, DomainResult};

/// Set of reserved document numbers.
///
/// Check-and-insert is atomic so two callers cannot reserve the same number
/// concurrently. There is no removal operation: numbers stay reserved for the
/// registry's lifetime, even when a later registration step fails.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    numbers: RwLock<HashSet<String>>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `number`. Fails with `Duplicate` if it is already taken.
    pub fn register(&self, number: &str) -> DomainResult<()> {
        let mut numbers = self
            .numbers
            .write()
            .map_err(|_| DomainError::conflict("registry lock poisoned"))?;
        if !numbers.insert(number.to_string()) {
            return Err(DomainError::duplicate(format!(
                "document number '{number}' already exists"
            )));
        }
        Ok(())
    }

    /// Pure lookup.
    pub fn contains(&self, number: &str) -> bool {
        self.numbers
            .read()
            .map(|numbers| numbers.contains(number))
            .unwrap_or(false)
    }
}
