//! Best-effort recipe illustration with a deterministic fallback.
//!
//! Image generation is an enhancement, never part of the correctness
//! path: on failure or timeout a recipe gets one of a small fixed set of
//! cuisine-appropriate placeholder images instead.

use std::time::Duration;

use tracing::debug;

use super::gateway::AnalysisGateway;
use super::types::Recipe;

/// Upper bound on how long an illustration attempt may run before the
/// placeholder wins.
const ILLUSTRATION_TIMEOUT: Duration = Duration::from_secs(20);

/// Placeholder images keyed by coarse cuisine keywords. First match wins.
const PLACEHOLDERS: &[(&[&str], &str)] = &[
    (
        &["indian", "curry"],
        "https://images.unsplash.com/photo-1603894584373-5ac82b2ae398?auto=format&fit=crop&w=800&q=80",
    ),
    (
        &["italian", "pasta"],
        "https://images.unsplash.com/photo-1473093226795-af9932fe5856?auto=format&fit=crop&w=800&q=80",
    ),
    (
        &["greek", "mediterranean"],
        "https://images.unsplash.com/photo-1512621776951-a57141f2eefd?auto=format&fit=crop&w=800&q=80",
    ),
    (
        &["asian", "chinese", "japanese", "thai", "korean"],
        "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?auto=format&fit=crop&w=800&q=80",
    ),
    (
        &["mexican"],
        "https://images.unsplash.com/photo-1565299585323-38d6b0865b47?auto=format&fit=crop&w=800&q=80",
    ),
];

/// Generic fallback when no cuisine keyword matches.
const DEFAULT_PLACEHOLDER: &str =
    "https://images.unsplash.com/photo-1504674900247-0877df9cc836?auto=format&fit=crop&w=800&q=80";

/// Pick a placeholder image by a simple keyword match on the cuisine name.
pub fn placeholder_image_for(cuisine: &str) -> &'static str {
    let cuisine = cuisine.to_lowercase();
    for (keywords, image) in PLACEHOLDERS {
        if keywords.iter().any(|k| cuisine.contains(k)) {
            return image;
        }
    }
    DEFAULT_PLACEHOLDER
}

/// Fill in a recipe's illustrative image if it lacks one: generated when
/// the provider cooperates within the timeout, placeholder otherwise. The
/// image is non-authoritative and replaceable.
pub async fn illustrate(gateway: &AnalysisGateway, recipe: &mut Recipe) {
    if recipe.image_url.is_some() {
        return;
    }

    let generated = tokio::time::timeout(
        ILLUSTRATION_TIMEOUT,
        gateway.generate_recipe_image(&recipe.title, &recipe.cuisine),
    )
    .await
    .ok()
    .flatten();

    let image_url = match generated {
        Some(url) => url,
        None => {
            debug!(
                "Falling back to placeholder image for '{}' ({})",
                recipe.title, recipe.cuisine
            );
            placeholder_image_for(&recipe.cuisine).to_string()
        }
    };
    recipe.image_url = Some(image_url);
}
