//! Session-scoped orchestration: joins analysis outcomes, local history
//! and pinned state, identity transitions, and best-effort remote
//! mirroring.
//!
//! Local state is authoritative for the current session; the remote store
//! is eventually consistent with it. The two meet only at login-time
//! refetch, never transactionally.

use tracing::{debug, info, warn};

use crate::analyzer::{AnalysisOutcome, Recipe};
use crate::error::PantryError;
use crate::history::{HistoryEntry, HistoryLog};
use crate::input::RequestDescriptor;
use crate::pins::{PinLedger, PinToggle};
use crate::remote::RemoteStore;
use crate::session::{Session, SessionEvent};

/// What a commit did with an analysis completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitDisposition {
    /// A history entry was minted and prepended (and mirrored when a
    /// session exists).
    Committed,
    /// The outcome is for display only: unclear, or a success with no
    /// recipes. Never persisted.
    DisplayedOnly,
    /// A newer request already landed; this completion was discarded.
    Stale,
}

/// Owner of all session-scoped mutable state. Single-writer from the
/// caller's perspective; torn down and rebuilt on every identity change
/// rather than surviving across users.
pub struct PantryCore {
    history: HistoryLog,
    pins: PinLedger,
    session: Option<Session>,
    remote: Option<RemoteStore>,
    issued_generation: u64,
    committed_generation: u64,
}

impl PantryCore {
    /// Create a core with optional remote persistence. Without a remote
    /// store everything stays local-only.
    pub fn new(remote: Option<RemoteStore>) -> Self {
        Self {
            history: HistoryLog::new(),
            pins: PinLedger::new(),
            session: None,
            remote,
            issued_generation: 0,
            committed_generation: 0,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn pins(&self) -> &PinLedger {
        &self.pins
    }

    /// Tag a new in-flight analysis. Completions commit with this tag so
    /// a stale completion for a superseded request can be discarded.
    pub fn begin_analysis(&mut self) -> u64 {
        self.issued_generation += 1;
        self.issued_generation
    }

    /// Commit one analysis completion.
    ///
    /// Commit order is completion order, not request-issue order: two
    /// concurrent analyses may land out of the order they were issued,
    /// and the later-completing one ends up first in history. That is
    /// accepted behavior. Only a completion older than one already
    /// committed is discarded.
    ///
    /// Every non-stale completion advances the watermark, including the
    /// display-only ones: once a newer outcome has been shown, an older
    /// `Success` arriving late may not replace it, even though nothing
    /// newer reached history.
    ///
    /// A remote insert failure is logged and never rolls back the local
    /// prepend: the UI must not lose a result the user already saw.
    pub async fn commit(
        &mut self,
        generation: u64,
        outcome: &AnalysisOutcome,
        descriptor: &RequestDescriptor,
    ) -> CommitDisposition {
        if generation < self.committed_generation {
            debug!(
                "Discarding stale analysis completion (generation {} < {})",
                generation, self.committed_generation
            );
            return CommitDisposition::Stale;
        }
        self.committed_generation = generation;

        let recipes = match outcome {
            AnalysisOutcome::Unclear { .. } => return CommitDisposition::DisplayedOnly,
            AnalysisOutcome::Success { recipes, .. } if recipes.is_empty() => {
                return CommitDisposition::DisplayedOnly
            }
            AnalysisOutcome::Success { recipes, .. } => recipes.clone(),
        };

        let entry = HistoryEntry::new(descriptor, recipes);
        info!(
            "Committing analysis '{}' with {} recipes to history",
            entry.query_preview,
            entry.recipes.len()
        );
        self.history.prepend(entry.clone());

        if let (Some(session), Some(remote)) = (&self.session, &self.remote) {
            if let Err(e) = remote.insert_history(&session.id, &entry).await {
                warn!("Failed to mirror history entry {} to remote store: {}", entry.id, e);
            }
        }

        CommitDisposition::Committed
    }

    /// Toggle a recipe's pinned state. Local mutation is optimistic and
    /// unconditional; the matching remote insert/delete is attempted only
    /// with a session, and its failure does not revert local state.
    pub async fn toggle_pin(&mut self, recipe: &Recipe) -> PinToggle {
        let action = self.pins.toggle(recipe);

        if let (Some(session), Some(remote)) = (&self.session, &self.remote) {
            let result = match action {
                PinToggle::Added => remote.insert_pin(&session.id, recipe).await,
                PinToggle::Removed => remote.delete_pin(&session.id, &recipe.id).await,
            };
            if let Err(e) = result {
                warn!(
                    "Failed to mirror pin toggle for recipe {} to remote store: {}",
                    recipe.id, e
                );
            }
        }

        action
    }

    /// React to an identity transition.
    ///
    /// On loss, local history and pinned state are cleared immediately
    /// and unconditionally, before any new identity's data could load.
    /// On establishment, the remote collections replace local state
    /// (remote is authoritative at login); a failed fetch leaves the
    /// local collection empty rather than stale.
    pub async fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Lost => {
                info!("Identity lost; purging session-scoped local state");
                self.session = None;
                self.history.clear();
                self.pins.clear();
            }
            SessionEvent::Established(session) => {
                info!("Identity established for user {}", session.id);
                self.history.clear();
                self.pins.clear();

                if let Some(remote) = &self.remote {
                    match remote.fetch_history(&session.id).await {
                        Ok(entries) => self.history.replace_all(entries),
                        Err(e) => {
                            warn!("Failed to fetch remote history at login: {}", e)
                        }
                    }
                    match remote.fetch_pinned(&session.id).await {
                        Ok(recipes) => self.pins.replace_all(recipes),
                        Err(e) => {
                            warn!("Failed to fetch remote pinned recipes at login: {}", e)
                        }
                    }
                }

                self.session = Some(session);
            }
        }
    }

    /// Submit free-text feedback to the remote store. Requires a session
    /// and non-empty content; unlike history and pins there is no local
    /// half, so failures propagate to the caller.
    pub async fn submit_feedback(&self, content: &str) -> Result<(), PantryError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(PantryError::EmptyFeedback);
        }
        let session = self.session.as_ref().ok_or(PantryError::NoSession)?;
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| PantryError::Config("Remote store is not configured".to_string()))?;
        remote.insert_feedback(&session.id, content).await
    }
}

/// Fixed showcase recipes displayed before any search. Never enter
/// history or the remote store.
pub fn suggested_recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            id: "s1".to_string(),
            title: "Signature Butter Chicken".to_string(),
            cuisine: "Indian".to_string(),
            description: "A velvet-smooth tomato gravy with charred chicken thigh pieces, finished with a touch of fenugreek.".to_string(),
            ingredients: vec![
                "Chicken Thighs".to_string(),
                "Butter".to_string(),
                "San Marzano Tomatoes".to_string(),
                "Heavy Cream".to_string(),
                "Kashmiri Chili".to_string(),
            ],
            instructions: vec![
                "Marinate chicken in yogurt and spices".to_string(),
                "Grill until charred".to_string(),
                "Simmer in tomato butter sauce".to_string(),
                "Garnish with cream".to_string(),
            ],
            missing_ingredients: vec![],
            prep_time: "45 mins".to_string(),
            calories: Some("650".to_string()),
            difficulty: Some("Medium".to_string()),
            image_url: Some("https://images.unsplash.com/photo-1603894584373-5ac82b2ae398?auto=format&fit=crop&w=800&q=80".to_string()),
        },
        Recipe {
            id: "s2".to_string(),
            title: "Zesty Lemon Garlic Pasta".to_string(),
            cuisine: "Italian".to_string(),
            description: "Al dente linguine tossed in a vibrant emulsion of cold-pressed olive oil, toasted garlic, and fresh lemon zest.".to_string(),
            ingredients: vec![
                "Linguine".to_string(),
                "Extra Virgin Olive Oil".to_string(),
                "Garlic".to_string(),
                "Lemon".to_string(),
                "Parsley".to_string(),
                "Red Pepper Flakes".to_string(),
            ],
            instructions: vec![
                "Boil pasta in salted water".to_string(),
                "Saute garlic in oil until golden".to_string(),
                "Toss pasta with oil and lemon juice".to_string(),
                "Garnish with parsley".to_string(),
            ],
            missing_ingredients: vec![],
            prep_time: "15 mins".to_string(),
            calories: Some("420".to_string()),
            difficulty: Some("Easy".to_string()),
            image_url: Some("https://images.unsplash.com/photo-1473093226795-af9932fe5856?auto=format&fit=crop&w=800&q=80".to_string()),
        },
        Recipe {
            id: "s3".to_string(),
            title: "Mediterranean Quinoa Bowl".to_string(),
            cuisine: "Greek".to_string(),
            description: "A protein-packed bowl featuring fluffy quinoa, crisp cucumbers, and salty feta, drizzled with a balsamic glaze.".to_string(),
            ingredients: vec![
                "Quinoa".to_string(),
                "Cucumber".to_string(),
                "Cherry Tomatoes".to_string(),
                "Feta Cheese".to_string(),
                "Balsamic Glaze".to_string(),
            ],
            instructions: vec![
                "Cook quinoa and let cool".to_string(),
                "Chop vegetables finely".to_string(),
                "Combine all ingredients in a bowl".to_string(),
                "Drizzle with glaze".to_string(),
            ],
            missing_ingredients: vec![],
            prep_time: "20 mins".to_string(),
            calories: Some("380".to_string()),
            difficulty: Some("Easy".to_string()),
            image_url: Some("https://images.unsplash.com/photo-1512621776951-a57141f2eefd?auto=format&fit=crop&w=800&q=80".to_string()),
        },
        Recipe {
            id: "s4".to_string(),
            title: "Sesame Ginger Tofu Stir-fry".to_string(),
            cuisine: "Asian".to_string(),
            description: "Crispy tofu cubes tossed with vibrant snap peas and carrots in a savory, aromatic sesame-ginger reduction.".to_string(),
            ingredients: vec![
                "Firm Tofu".to_string(),
                "Snap Peas".to_string(),
                "Carrots".to_string(),
                "Soy Sauce".to_string(),
                "Ginger".to_string(),
                "Sesame Oil".to_string(),
            ],
            instructions: vec![
                "Press and cube tofu".to_string(),
                "Fry tofu until golden and crispy".to_string(),
                "Stir-fry vegetables quickly".to_string(),
                "Toss with sauce".to_string(),
            ],
            missing_ingredients: vec![],
            prep_time: "25 mins".to_string(),
            calories: Some("310".to_string()),
            difficulty: Some("Medium".to_string()),
            image_url: Some("https://images.unsplash.com/photo-1546069901-ba9599a7e63c?auto=format&fit=crop&w=800&q=80".to_string()),
        },
    ]
}
