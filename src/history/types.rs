use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::Recipe;
use crate::input::{QueryType, RequestDescriptor};

/// One persisted record of a successful analysis. Created exactly once
/// per qualifying outcome; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub query_type: QueryType,
    pub query_preview: String,
    pub recipes: Vec<Recipe>,
}

impl HistoryEntry {
    /// Mint an entry for a successful outcome's recipes. The id is the
    /// minting time in milliseconds, unique enough for a single-writer
    /// local log.
    pub fn new(descriptor: &RequestDescriptor, recipes: Vec<Recipe>) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis().to_string(),
            timestamp: now,
            query_type: descriptor.query_type,
            query_preview: descriptor.query_preview.clone(),
            recipes,
        }
    }
}
