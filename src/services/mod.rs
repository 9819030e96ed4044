//! Service layer for the jackpot watcher.
//!
//! This module contains the business logic for:
//! - Estimate extraction (`extract`)
//! - Threshold evaluation (`exceeds`)
//! - Page retrieval (`PageSource`)
//! - Message rendering and delivery (`AlertMessage`, `Notifier`)

mod extractor;
mod message;
mod notifier;
mod source;
mod threshold;

pub use extractor::{NotFound, extract, parse_amount};
pub use message::AlertMessage;
pub use notifier::{Notifier, TelegramNotifier, require_env};
pub use source::{HttpPageSource, PageSource};
pub use threshold::exceeds;
