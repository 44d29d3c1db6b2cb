//! Prompts and the response schema for the culinary analysis round trip.

/// Canonical message for an unreadable input when the classifier sets the
/// unclear flag but omits its message.
pub const UNCLEAR_FALLBACK_MESSAGE: &str =
    "click pictures clearly so that the chef can give the recipe";

/// System instruction fixing the classifier's role and the zero-waste
/// contract: recipes use only detected ingredients (plus the staple
/// allowance), `missingIngredients` stays empty, and unclear inputs are
/// flagged rather than guessed at.
pub const SYSTEM_INSTRUCTION: &str = r#"You are "Pantry Chef", a world-class culinary AI assistant specializing in zero-waste cooking and food safety.
Your mission is to analyze inputs (text, images, or audio) to:
1. IDENTIFY all food items and ingredients.
2. INSPECT visual inputs for quality: If the picture is hazy, blurry, too dark, or otherwise not understandable, set 'isUnclear' to true and return the specific message: "click pictures clearly so that the chef can give the recipe".
3. INSPECT visual inputs for spoilage: If any food looks rotten, expired, moldy, discolored, or "bad looking", flag it immediately in 'spoilageWarnings'.
4. SUGGEST gourmet recipes using ONLY the fresh ingredients identified.
5. ZERO additional ingredients allowed (except salt, pepper, water, and generic oil).
6. The 'missingIngredients' field MUST be an empty array [].
7. If 'isUnclear' is true, return empty arrays for recipes, ingredients, and warnings."#;

/// Instruction part accompanying an image attachment.
pub const IMAGE_INSTRUCTION: &str = "Carefully analyze this image. First, check if the image is clear enough to identify ingredients. If it is hazy or blurry, flag it. If clear, identify every food item and look for spoilage.";

/// Instruction part accompanying an audio attachment.
pub const AUDIO_INSTRUCTION: &str = "Listen to the ingredients listed.";

/// Text part wrapping user-typed ingredients.
pub fn ingredients_text(text: &str) -> String {
    format!("Ingredients provided: {}.", text)
}

/// Structured-output schema for the analysis response, in the classifier's
/// schema dialect (uppercase type names).
pub fn analysis_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "recipes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "title": { "type": "STRING" },
                        "cuisine": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "instructions": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "missingIngredients": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "prepTime": { "type": "STRING" },
                        "calories": { "type": "STRING" },
                        "difficulty": { "type": "STRING" }
                    },
                    "required": ["id", "title", "cuisine", "ingredients", "instructions", "prepTime", "missingIngredients"]
                }
            },
            "detectedIngredients": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of all food items found in the input."
            },
            "spoilageWarnings": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": { "type": "STRING" },
                        "reason": { "type": "STRING", "description": "Why the food looks bad (e.g., mold, discoloration, wilting)." }
                    },
                    "required": ["item", "reason"]
                }
            },
            "isUnclear": {
                "type": "BOOLEAN",
                "description": "True if the input is too blurry or hazy to identify anything."
            },
            "unclearMessage": {
                "type": "STRING",
                "description": "Mandatory message if isUnclear is true."
            }
        },
        "required": ["recipes", "detectedIngredients", "spoilageWarnings", "isUnclear"]
    })
}

/// Prompt for a best-effort illustrative recipe image.
pub fn illustration_prompt(title: &str, cuisine: &str) -> String {
    format!(
        "A professional food photography shot of {}, a {} dish. High resolution, appetizing.",
        title, cuisine
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_structure() {
        let schema = analysis_response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert!(schema["properties"]["recipes"].is_object());
        assert!(schema["properties"]["spoilageWarnings"].is_object());
        assert!(schema["properties"]["isUnclear"].is_object());
    }

    #[test]
    fn test_schema_requires_core_recipe_fields() {
        let schema = analysis_response_schema();
        let required: Vec<&str> = schema["properties"]["recipes"]["items"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();

        for field in ["id", "title", "cuisine", "ingredients", "instructions", "prepTime", "missingIngredients"] {
            assert!(required.contains(&field), "schema must require {}", field);
        }
    }

    #[test]
    fn test_system_instruction_fixes_contract() {
        assert!(SYSTEM_INSTRUCTION.contains("isUnclear"));
        assert!(SYSTEM_INSTRUCTION.contains("missingIngredients"));
        assert!(SYSTEM_INSTRUCTION.contains(UNCLEAR_FALLBACK_MESSAGE));
    }

    #[test]
    fn test_ingredients_text() {
        assert_eq!(
            ingredients_text("egg, spinach"),
            "Ingredients provided: egg, spinach."
        );
    }

    #[test]
    fn test_illustration_prompt_mentions_dish() {
        let prompt = illustration_prompt("Butter Chicken", "Indian");
        assert!(prompt.contains("Butter Chicken"));
        assert!(prompt.contains("Indian"));
    }
}
