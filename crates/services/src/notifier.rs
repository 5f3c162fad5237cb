//! Notification boundary: fire-and-forget, no delivery guarantee.

use std::sync::Mutex;

/// Outbound notification sink. Implementations are swappable adapters.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Emits notifications as structured log events.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(target: "docflow::notify", "{message}");
    }
}

/// Test double that collects every message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
