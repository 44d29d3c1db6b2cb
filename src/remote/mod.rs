//! Per-user remote store client over a PostgREST-style REST API.
//!
//! Three logical collections — history entries, pinned recipes, free-text
//! feedback — each keyed by user id. Reads are full-collection fetches at
//! login; writes are single-row inserts/deletes, no partial updates. The
//! store is multi-writer across devices and never locked; conflicts
//! resolve by last write observed at insert/delete granularity.

pub mod types;

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use crate::analyzer::Recipe;
use crate::config::RemoteConfig;
use crate::error::PantryError;
use crate::history::HistoryEntry;

pub use types::{FeedbackRow, HistoryRow, PinnedRow};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the per-user remote store.
pub struct RemoteStore {
    url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(config: &RemoteConfig) -> Result<Self, PantryError> {
        url::Url::parse(&config.url)
            .map_err(|e| PantryError::Config(format!("Invalid remote store URL '{}': {}", config.url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PantryError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            client,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.url, collection)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, PantryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        Err(PantryError::RemoteStatus {
            status: status.as_u16(),
            body,
        })
    }

    fn send_error(e: reqwest::Error) -> PantryError {
        if e.is_timeout() {
            PantryError::Remote("Remote store timeout".to_string())
        } else {
            PantryError::Remote(format!("Remote store request failed: {}", e))
        }
    }

    /// Fetch the full history collection for a user, newest first.
    pub async fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryEntry>, PantryError> {
        let url = format!(
            "{}?user_id=eq.{}&order=timestamp.desc",
            self.collection_url("history"),
            urlencoding::encode(user_id)
        );

        let response = self
            .authed(self.client.get(url))
            .send()
            .await
            .map_err(Self::send_error)?;
        let rows: Vec<HistoryRow> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| PantryError::Remote(format!("Failed to parse history rows: {}", e)))?;

        info!("Fetched {} history entries for user {}", rows.len(), user_id);
        Ok(rows.into_iter().map(HistoryRow::into_entry).collect())
    }

    /// Insert one history entry for a user.
    pub async fn insert_history(&self, user_id: &str, entry: &HistoryEntry) -> Result<(), PantryError> {
        let row = HistoryRow::from_entry(user_id, entry);
        let response = self
            .authed(self.client.post(self.collection_url("history")))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::check(response).await?;
        debug!("Mirrored history entry {} for user {}", entry.id, user_id);
        Ok(())
    }

    /// Fetch the full pinned set for a user.
    pub async fn fetch_pinned(&self, user_id: &str) -> Result<Vec<Recipe>, PantryError> {
        let url = format!(
            "{}?user_id=eq.{}",
            self.collection_url("pinned_recipes"),
            urlencoding::encode(user_id)
        );

        let response = self
            .authed(self.client.get(url))
            .send()
            .await
            .map_err(Self::send_error)?;
        let rows: Vec<PinnedRow> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| PantryError::Remote(format!("Failed to parse pinned rows: {}", e)))?;

        info!("Fetched {} pinned recipes for user {}", rows.len(), user_id);
        Ok(rows.into_iter().map(|row| row.recipe_data).collect())
    }

    /// Insert a pinned recipe for a user.
    pub async fn insert_pin(&self, user_id: &str, recipe: &Recipe) -> Result<(), PantryError> {
        let row = PinnedRow {
            user_id: user_id.to_string(),
            recipe_data: recipe.clone(),
        };
        let response = self
            .authed(self.client.post(self.collection_url("pinned_recipes")))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::check(response).await?;
        debug!("Mirrored pin of recipe {} for user {}", recipe.id, user_id);
        Ok(())
    }

    /// Delete a pinned recipe for a user, matching on the id stored inside
    /// the recipe payload.
    pub async fn delete_pin(&self, user_id: &str, recipe_id: &str) -> Result<(), PantryError> {
        let url = format!(
            "{}?user_id=eq.{}&recipe_data->>id=eq.{}",
            self.collection_url("pinned_recipes"),
            urlencoding::encode(user_id),
            urlencoding::encode(recipe_id)
        );

        let response = self
            .authed(self.client.delete(url))
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::check(response).await?;
        debug!("Mirrored unpin of recipe {} for user {}", recipe_id, user_id);
        Ok(())
    }

    /// Insert one free-text feedback row for a user.
    pub async fn insert_feedback(&self, user_id: &str, content: &str) -> Result<(), PantryError> {
        let row = FeedbackRow {
            user_id: user_id.to_string(),
            content: content.to_string(),
            submitted_at: Utc::now(),
        };
        let response = self
            .authed(self.client.post(self.collection_url("feedback")))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::check(response).await?;
        info!("Submitted feedback for user {}", user_id);
        Ok(())
    }
}
