//! Pantry Chef core: turns free-form text, a food-storage photo, or a short
//! voice clip into a validated culinary analysis, and keeps that analysis
//! consistent between optimistic local state and a per-user remote store.
//!
//! The crate is UI-agnostic. A frontend drives it by normalizing captures
//! through [`input`], running them through the [`analyzer`] gateway, and
//! committing outcomes into [`PantryCore`], which owns the session-scoped
//! history and pinned-recipe state and mirrors it remotely when an identity
//! is established.

pub mod analyzer;
mod app;
pub mod config;
mod error;
pub mod history;
pub mod input;
pub mod pins;
pub mod remote;
pub mod session;

pub use app::{suggested_recipes, CommitDisposition, PantryCore};
pub use error::PantryError;

/// Initialize tracing with an env-filter, defaulting to `info`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
