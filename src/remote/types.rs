use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::Recipe;
use crate::history::HistoryEntry;
use crate::input::QueryType;

/// Row shape of the per-user `history` collection. Column names are the
/// store's snake_case; the recipes payload keeps its wire (camelCase)
/// shape inside the JSON column.
///
/// The row id is the client-minted entry id, so a retried insert stays
/// idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRow {
    pub id: String,
    pub user_id: String,
    pub query_type: QueryType,
    pub query_preview: String,
    pub recipes: Vec<Recipe>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRow {
    pub fn from_entry(user_id: &str, entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            user_id: user_id.to_string(),
            query_type: entry.query_type,
            query_preview: entry.query_preview.clone(),
            recipes: entry.recipes.clone(),
            timestamp: entry.timestamp,
        }
    }

    pub fn into_entry(self) -> HistoryEntry {
        HistoryEntry {
            id: self.id,
            timestamp: self.timestamp,
            query_type: self.query_type,
            query_preview: self.query_preview,
            recipes: self.recipes,
        }
    }
}

/// Row shape of the `pinned_recipes` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinnedRow {
    pub user_id: String,
    pub recipe_data: Recipe,
}

/// Row shape of the `feedback` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRow {
    pub user_id: String,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RequestDescriptor;

    #[test]
    fn test_history_row_round_trip() {
        let entry = HistoryEntry::new(
            &RequestDescriptor {
                query_type: QueryType::Text,
                query_preview: "egg, spinach".to_string(),
            },
            vec![],
        );

        let row = HistoryRow::from_entry("user-1", &entry);
        assert_eq!(row.id, entry.id);
        assert_eq!(row.user_id, "user-1");

        let back = row.into_entry();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_history_row_wire_shape() {
        let entry = HistoryEntry::new(
            &RequestDescriptor {
                query_type: QueryType::Image,
                query_preview: "Fridge Scan".to_string(),
            },
            vec![],
        );
        let row = HistoryRow::from_entry("user-1", &entry);
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["user_id"], "user-1");
        assert_eq!(json["query_type"], "image");
        assert_eq!(json["query_preview"], "Fridge Scan");
        assert!(json["timestamp"].is_string());
    }
}
