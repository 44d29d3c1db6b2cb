//! Local analysis history: entry type and the prepend-only log.

pub mod log;
pub mod types;

pub use log::HistoryLog;
pub use types::HistoryEntry;
