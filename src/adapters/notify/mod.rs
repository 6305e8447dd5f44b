//! Notifier adapters
//!
//! - **FlashNotifier** - Queues notices for the next rendered page

mod flash;

pub use flash::FlashNotifier;
