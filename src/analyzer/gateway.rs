//! The analysis gateway: one remote round trip to the multimodal
//! classifier, schema enforcement, and classification of the response
//! into a tagged [`AnalysisOutcome`].
//!
//! Failure discipline: a transport or parse failure is reported as an
//! error so callers can distinguish "the classifier says the picture is
//! bad" from "the request itself broke". It is never downgraded to
//! `Unclear`.

use std::time::Duration;

use base64::Engine;
use chrono::Utc;
use tracing::{error, info};

use super::prompts::{
    analysis_response_schema, illustration_prompt, ingredients_text, AUDIO_INSTRUCTION,
    IMAGE_INSTRUCTION, SYSTEM_INSTRUCTION, UNCLEAR_FALLBACK_MESSAGE,
};
use super::types::{AnalysisOutcome, ClassifierResponse};
use crate::config::ClassifierConfig;
use crate::error::PantryError;
use crate::input::AnalysisRequest;

/// Client for the external multimodal classifier.
pub struct AnalysisGateway {
    endpoint: String,
    model: String,
    image_model: String,
    api_key: String,
    client: reqwest::Client,
}

impl AnalysisGateway {
    pub fn new(config: &ClassifierConfig) -> Result<Self, PantryError> {
        url::Url::parse(&config.endpoint)
            .map_err(|e| PantryError::Config(format!("Invalid classifier endpoint '{}': {}", config.endpoint, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PantryError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            image_model: config.image_model.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, model)
    }

    /// Run one analysis round trip and classify the result.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, PantryError> {
        let body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "parts": build_parts(request) }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": analysis_response_schema(),
                // Low temperature for consistent clarity/spoilage classification
                "temperature": 0.1,
            },
        });

        info!("Sending {:?} analysis request", request.query_type());

        let response = self
            .client
            .post(self.generate_url(&self.model))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let msg = if e.is_timeout() {
                    "Classifier API timeout".to_string()
                } else {
                    format!("Classifier API request failed: {}", e)
                };
                error!("{}", msg);
                PantryError::Classifier(msg)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            let err = PantryError::ClassifierStatus {
                status: status.as_u16(),
                body: truncate(&body, 1024),
            };
            error!("{}", err);
            return Err(err);
        }

        let body_text = response
            .text()
            .await
            .map_err(|e| PantryError::Classifier(format!("Failed to read classifier response body: {}", e)))?;

        let wrapper: serde_json::Value = serde_json::from_str(&body_text)
            .map_err(|e| PantryError::ClassifierSchema(format!("Invalid response wrapper: {}", e)))?;

        let text = first_text_part(&wrapper).ok_or_else(|| {
            let err = PantryError::ClassifierSchema("No text content in classifier response".to_string());
            error!("{}", err);
            err
        })?;

        let payload = strip_markdown_json(text);
        let parsed: ClassifierResponse = serde_json::from_str(&payload).map_err(|e| {
            let err = PantryError::ClassifierSchema(format!(
                "Response does not conform to the analysis schema: {}. Raw (first 500 chars): {}",
                e,
                truncate(&payload, 500)
            ));
            error!("{}", err);
            err
        })?;

        let outcome = classify_response(parsed, Utc::now().timestamp_millis());
        match &outcome {
            AnalysisOutcome::Unclear { message } => {
                info!("Classifier flagged the input as unreadable: {}", message)
            }
            AnalysisOutcome::Success {
                recipes,
                detected_ingredients,
                spoilage_warnings,
            } => info!(
                "Analysis complete: {} recipes, {} ingredients, {} spoilage warnings",
                recipes.len(),
                detected_ingredients.len(),
                spoilage_warnings.len()
            ),
        }
        Ok(outcome)
    }

    /// Best-effort illustrative image for a recipe. Returns a data URL, or
    /// `None` on any failure; never propagates an error into the primary
    /// analysis path.
    pub async fn generate_recipe_image(&self, title: &str, cuisine: &str) -> Option<String> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": illustration_prompt(title, cuisine) }] }],
            "generationConfig": { "imageConfig": { "aspectRatio": "16:9" } },
        });

        let response = self
            .client
            .post(self.generate_url(&self.image_model))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            tracing::warn!("Image generation returned {} for '{}'", response.status(), title);
            return None;
        }

        let wrapper: serde_json::Value = response.json().await.ok()?;
        let parts = wrapper["candidates"][0]["content"]["parts"].as_array()?;
        parts.iter().find_map(|part| {
            let inline = &part["inlineData"];
            let mime = inline["mimeType"].as_str()?;
            let data = inline["data"].as_str()?;
            Some(format!("data:{};base64,{}", mime, data))
        })
    }
}

/// Build the multimodal content parts for a request.
fn build_parts(request: &AnalysisRequest) -> Vec<serde_json::Value> {
    let b64 = base64::engine::general_purpose::STANDARD;
    match request {
        AnalysisRequest::Text { text } => {
            vec![serde_json::json!({ "text": ingredients_text(text) })]
        }
        AnalysisRequest::Image { text, bytes, media_type } => {
            let mut parts = Vec::new();
            if let Some(text) = text {
                parts.push(serde_json::json!({ "text": ingredients_text(text) }));
            }
            parts.push(serde_json::json!({
                "inlineData": { "mimeType": media_type, "data": b64.encode(bytes) }
            }));
            parts.push(serde_json::json!({ "text": IMAGE_INSTRUCTION }));
            parts
        }
        AnalysisRequest::Audio { bytes } => vec![
            serde_json::json!({
                "inlineData": {
                    "mimeType": crate::input::AudioClip::MEDIA_TYPE,
                    "data": b64.encode(bytes)
                }
            }),
            serde_json::json!({ "text": AUDIO_INSTRUCTION }),
        ],
    }
}

/// Classify a schema-conforming response into an outcome.
///
/// The unclear flag wins: any recipes, ingredients, or warnings carried by
/// an unclear response are discarded (the contract requires them empty,
/// but the gateway does not trust that). Successful responses get locally
/// generated ids for recipes missing one, combining a millisecond
/// timestamp with the recipe's position to avoid same-millisecond
/// collisions within the outcome.
pub(crate) fn classify_response(response: ClassifierResponse, now_millis: i64) -> AnalysisOutcome {
    if response.is_unclear {
        let message = response
            .unclear_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UNCLEAR_FALLBACK_MESSAGE.to_string());
        return AnalysisOutcome::Unclear { message };
    }

    let mut recipes = response.recipes;
    for (index, recipe) in recipes.iter_mut().enumerate() {
        if recipe.id.trim().is_empty() {
            recipe.id = format!("recipe-{}-{}", now_millis, index);
        }
    }

    AnalysisOutcome::Success {
        recipes,
        detected_ingredients: response.detected_ingredients,
        spoilage_warnings: response.spoilage_warnings,
    }
}

/// Find the first text part in the provider's response wrapper.
fn first_text_part(wrapper: &serde_json::Value) -> Option<&str> {
    wrapper["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .find_map(|part| part["text"].as_str())
}

/// Strip markdown code fences from a model response if present. Providers
/// without strict JSON mode sometimes wrap JSON in ```json ... ```.
fn strip_markdown_json(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let after_open = if let Some(pos) = trimmed.find('\n') {
            &trimmed[pos + 1..]
        } else {
            trimmed
        };
        let cleaned = after_open.trim_end();
        if cleaned.ends_with("```") {
            cleaned[..cleaned.len() - 3].trim().to_string()
        } else {
            cleaned.to_string()
        }
    } else {
        trimmed.to_string()
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() > max {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::Recipe;

    fn sample_recipe(id: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: "Spinach Omelette".to_string(),
            cuisine: "French".to_string(),
            description: String::new(),
            ingredients: vec!["Eggs".to_string(), "Spinach".to_string()],
            instructions: vec!["Whisk".to_string(), "Cook".to_string()],
            missing_ingredients: vec![],
            prep_time: "10 mins".to_string(),
            calories: None,
            difficulty: None,
            image_url: None,
        }
    }

    #[test]
    fn test_unclear_discards_payload_lists() {
        let response = ClassifierResponse {
            recipes: vec![sample_recipe("r1")],
            detected_ingredients: vec!["egg".to_string()],
            spoilage_warnings: vec![],
            is_unclear: true,
            unclear_message: Some("too hazy".to_string()),
        };

        let outcome = classify_response(response, 1_000);
        match outcome {
            AnalysisOutcome::Unclear { message } => assert_eq!(message, "too hazy"),
            _ => panic!("expected unclear outcome"),
        }
    }

    #[test]
    fn test_unclear_without_message_uses_fallback() {
        let response = ClassifierResponse {
            recipes: vec![],
            detected_ingredients: vec![],
            spoilage_warnings: vec![],
            is_unclear: true,
            unclear_message: None,
        };

        match classify_response(response, 0) {
            AnalysisOutcome::Unclear { message } => {
                assert_eq!(message, UNCLEAR_FALLBACK_MESSAGE)
            }
            _ => panic!("expected unclear outcome"),
        }
    }

    #[test]
    fn test_blank_unclear_message_uses_fallback() {
        let response = ClassifierResponse {
            recipes: vec![],
            detected_ingredients: vec![],
            spoilage_warnings: vec![],
            is_unclear: true,
            unclear_message: Some("   ".to_string()),
        };

        match classify_response(response, 0) {
            AnalysisOutcome::Unclear { message } => {
                assert_eq!(message, UNCLEAR_FALLBACK_MESSAGE)
            }
            _ => panic!("expected unclear outcome"),
        }
    }

    #[test]
    fn test_missing_ids_are_generated_per_position() {
        let mut first = sample_recipe("");
        first.title = "First".to_string();
        let second = sample_recipe("keep-me");
        let mut third = sample_recipe("");
        third.title = "Third".to_string();

        let response = ClassifierResponse {
            recipes: vec![first, second, third],
            detected_ingredients: vec![],
            spoilage_warnings: vec![],
            is_unclear: false,
            unclear_message: None,
        };

        let outcome = classify_response(response, 1_700_000_000_000);
        let recipes = outcome.recipes();
        assert_eq!(recipes[0].id, "recipe-1700000000000-0");
        assert_eq!(recipes[1].id, "keep-me");
        assert_eq!(recipes[2].id, "recipe-1700000000000-2");

        // Unique within the outcome
        let mut ids: Vec<&str> = recipes.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), recipes.len());
    }

    #[test]
    fn test_empty_success_is_still_success() {
        let response = ClassifierResponse {
            recipes: vec![],
            detected_ingredients: vec!["salt".to_string()],
            spoilage_warnings: vec![],
            is_unclear: false,
            unclear_message: None,
        };

        let outcome = classify_response(response, 0);
        assert!(!outcome.is_unclear());
        assert!(outcome.recipes().is_empty());
    }

    #[test]
    fn test_strip_markdown_json() {
        assert_eq!(strip_markdown_json("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_markdown_json("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_markdown_json("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_markdown_json("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_build_parts_text() {
        let request = AnalysisRequest::Text { text: "egg, spinach".to_string() };
        let parts = build_parts(&request);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0]["text"], "Ingredients provided: egg, spinach.");
    }

    #[test]
    fn test_build_parts_image_with_text() {
        let request = AnalysisRequest::Image {
            text: Some("leftovers".to_string()),
            bytes: vec![0xFF, 0xD8],
            media_type: "image/jpeg".to_string(),
        };
        let parts = build_parts(&request);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["text"], "Ingredients provided: leftovers.");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert!(parts[1]["inlineData"]["data"].as_str().is_some());
        assert_eq!(parts[2]["text"], IMAGE_INSTRUCTION);
    }

    #[test]
    fn test_build_parts_audio_uses_fixed_clip_type() {
        let request = AnalysisRequest::Audio { bytes: vec![1, 2, 3] };
        let parts = build_parts(&request);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "audio/wav");
        assert_eq!(parts[1]["text"], AUDIO_INSTRUCTION);
    }

    #[test]
    fn test_first_text_part() {
        let wrapper = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "thought": true },
                        { "text": "{\"recipes\":[]}" }
                    ]
                }
            }]
        });
        assert_eq!(first_text_part(&wrapper), Some("{\"recipes\":[]}"));
        assert_eq!(first_text_part(&serde_json::json!({})), None);
    }

    #[test]
    fn test_gateway_rejects_bad_endpoint() {
        let config = ClassifierConfig {
            endpoint: "not a url".to_string(),
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            AnalysisGateway::new(&config),
            Err(PantryError::Config(_))
        ));
    }
}
