use std::sync::{Arc, Mutex};

/// The user-visible status line of one page.
///
/// Clones share the same line. Every new attempt replaces the previous message.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    inner: Arc<Mutex<Option<String>>>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(status = %message, "status updated");
        *self.lock() = Some(message);
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned line still holds a usable string.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
