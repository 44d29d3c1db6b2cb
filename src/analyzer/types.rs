//! Types at the classifier boundary: the wire response shape and the
//! tagged outcome handed to the rest of the system.

use serde::{Deserialize, Serialize};

/// A suggested recipe. Created by the gateway from classifier output and
/// read-only thereafter; `image_url` may be enriched post-hoc with a
/// generated illustration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Stable id, unique within one outcome. The gateway assigns one when
    /// the classifier omits it.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub cuisine: String,
    #[serde(default)]
    pub description: String,
    pub ingredients: Vec<String>,
    /// Ordered preparation steps.
    pub instructions: Vec<String>,
    /// Contractually empty under the zero-waste policy; preserved and
    /// shown as "shopping required" when a response violates that.
    #[serde(default)]
    pub missing_ingredients: Vec<String>,
    pub prep_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipe {
    /// True when the response broke the zero-waste contract and the recipe
    /// needs ingredients beyond what was detected. Informational only.
    pub fn shopping_required(&self) -> bool {
        !self.missing_ingredients.is_empty()
    }
}

/// A flagged food item. Always paired: never an item without a reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpoilageWarning {
    pub item: String,
    /// Why the food looks bad (mold, discoloration, wilting, ...).
    pub reason: String,
}

/// Raw classifier response under the fixed contract. List fields default
/// so a well-formed-but-sparse payload still deserializes; missing
/// required recipe fields are a schema error, enforced here and not
/// re-validated by callers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierResponse {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub detected_ingredients: Vec<String>,
    #[serde(default)]
    pub spoilage_warnings: Vec<SpoilageWarning>,
    #[serde(default)]
    pub is_unclear: bool,
    #[serde(default)]
    pub unclear_message: Option<String>,
}

/// The classifier's structured verdict, exactly one variant active.
///
/// `Unclear` never carries recipes, ingredients, or warnings, no matter
/// what the raw response contained.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The classifier could not read the input. Recoverable by
    /// resubmitting; never persisted.
    Unclear { message: String },
    /// Readable input. `recipes` may be empty, in which case the outcome
    /// is displayed but not persisted either.
    Success {
        recipes: Vec<Recipe>,
        detected_ingredients: Vec<String>,
        spoilage_warnings: Vec<SpoilageWarning>,
    },
}

impl AnalysisOutcome {
    pub fn is_unclear(&self) -> bool {
        matches!(self, AnalysisOutcome::Unclear { .. })
    }

    /// Recipes carried by the outcome; empty for `Unclear`.
    pub fn recipes(&self) -> &[Recipe] {
        match self {
            AnalysisOutcome::Unclear { .. } => &[],
            AnalysisOutcome::Success { recipes, .. } => recipes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_round_trips_camel_case() {
        let json = r#"{
            "id": "r1",
            "title": "Spinach Omelette",
            "cuisine": "French",
            "description": "Fluffy eggs with wilted spinach.",
            "ingredients": ["Eggs", "Spinach"],
            "instructions": ["Whisk eggs", "Fold in spinach", "Cook gently"],
            "missingIngredients": [],
            "prepTime": "10 mins",
            "calories": "220",
            "difficulty": "Easy"
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, "r1");
        assert_eq!(recipe.prep_time, "10 mins");
        assert!(!recipe.shopping_required());
        assert!(recipe.image_url.is_none());

        let out = serde_json::to_value(&recipe).unwrap();
        assert_eq!(out["prepTime"], "10 mins");
        assert!(out["missingIngredients"].is_array());
        // Absent optionals are not serialized at all
        assert!(out.get("imageUrl").is_none());
    }

    #[test]
    fn test_recipe_missing_required_field_is_schema_error() {
        // No instructions: must fail deserialization, not default to empty.
        let json = r#"{
            "id": "r1",
            "title": "Mystery Dish",
            "cuisine": "Fusion",
            "ingredients": ["?"],
            "prepTime": "5 mins"
        }"#;
        assert!(serde_json::from_str::<Recipe>(json).is_err());
    }

    #[test]
    fn test_classifier_response_defaults() {
        let response: ClassifierResponse = serde_json::from_str("{}").unwrap();
        assert!(response.recipes.is_empty());
        assert!(response.detected_ingredients.is_empty());
        assert!(response.spoilage_warnings.is_empty());
        assert!(!response.is_unclear);
        assert!(response.unclear_message.is_none());
    }

    #[test]
    fn test_spoilage_warning_requires_reason() {
        assert!(serde_json::from_str::<SpoilageWarning>(r#"{"item": "milk"}"#).is_err());
        let warning: SpoilageWarning =
            serde_json::from_str(r#"{"item": "milk", "reason": "curdled"}"#).unwrap();
        assert_eq!(warning.reason, "curdled");
    }

    #[test]
    fn test_unclear_outcome_has_no_recipes() {
        let outcome = AnalysisOutcome::Unclear { message: "hazy".into() };
        assert!(outcome.is_unclear());
        assert!(outcome.recipes().is_empty());
    }
}
