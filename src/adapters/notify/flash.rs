//! Flash notifier.
//!
//! Queues notices until the presentation layer drains them into the next
//! rendered page.

use std::sync::{Mutex, PoisonError};

use crate::ports::{Notice, UserNotifier};

/// Queue of notices not yet shown to the user.
#[derive(Debug, Default)]
pub struct FlashNotifier {
    pending: Mutex<Vec<Notice>>,
}

impl FlashNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns all pending notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Copies the pending notices without removing them.
    pub fn pending(&self) -> Vec<Notice> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl UserNotifier for FlashNotifier {
    fn notify(&self, notice: Notice) {
        tracing::info!(level = ?notice.level, notice = %notice, "User notice");
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
