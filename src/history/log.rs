use tracing::debug;

use super::types::HistoryEntry;

/// Session-scoped, prepend-only local history, newest first.
///
/// Single-writer from the UI's perspective. Prepend order is the commit
/// order of completing analyses, which may differ from request-issue
/// order; that is accepted behavior. The log is replaced wholesale at
/// login (remote is authoritative then) and cleared on identity loss.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry at the head.
    pub fn prepend(&mut self, entry: HistoryEntry) {
        debug!("Prepending history entry {} ({})", entry.id, entry.query_preview);
        self.entries.insert(0, entry);
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the whole log, e.g. with the remote collection at login.
    pub fn replace_all(&mut self, entries: Vec<HistoryEntry>) {
        debug!("Replacing local history with {} remote entries", entries.len());
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
