//! Byte-budget accounting for attachment storage.

use std::sync::Mutex;

use docflow_core::{DomainError, DomainResult};

/// Tracks attachment byte usage against a ceiling.
///
/// `allocate` is check-and-commit in one step: a rejected allocation leaves
/// `used_bytes` unchanged.
#[derive(Debug)]
pub struct QuotaManager {
    max_bytes: u64,
    used_bytes: Mutex<u64>,
}

impl QuotaManager {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            used_bytes: Mutex::new(0),
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn used_bytes(&self) -> u64 {
        self.used_bytes.lock().map(|used| *used).unwrap_or(0)
    }

    pub fn can_allocate(&self, size: u64) -> bool {
        self.used_bytes
            .lock()
            .map(|used| used.saturating_add(size) <= self.max_bytes)
            .unwrap_or(false)
    }

    pub fn allocate(&self, size: u64) -> DomainResult<()> {
        let mut used = self
            .used_bytes
            .lock()
            .map_err(|_| DomainError::conflict("quota lock poisoned"))?;
        let next = used.saturating_add(size);
        if next > self.max_bytes {
            return Err(DomainError::quota_exceeded(format!(
                "requested {size} bytes, {} of {} used",
                *used, self.max_bytes
            )));
        }
        *used = next;
        Ok(())
    }
}
