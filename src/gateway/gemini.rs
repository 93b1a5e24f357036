//! `generateContent` client for the Gemini REST API.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::{audio, prompts, GatewayError, ModelGateway, SuggestionRequest};
use crate::config::GeminiConfig;
use crate::recipes::model::Recipe;

pub struct GeminiGateway {
    client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
    }

    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }

    fn inline_data(&self) -> Option<&InlineData> {
        self.parts().find_map(|p| p.inline_data.as_ref())
    }

    /// Structured output arrives as JSON text in the first candidate.
    fn json<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        let text = self.text().ok_or(GatewayError::EmptyResponse)?;
        serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    async fn generate(&self, model: &str, body: Value) -> Result<GenerateContentResponse, GatewayError> {
        let url = format!("{}/models/{}:generateContent", self.config.base_url, model);
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }
        let parsed = response.json::<GenerateContentResponse>().await?;
        debug!(model, candidates = parsed.candidates.len(), "model responded");
        Ok(parsed)
    }
}

/// Keeps every well-formed recipe of a batch. Only a batch with entries but
/// none usable counts as a decode failure.
fn decode_recipes(entries: Vec<Value>) -> Result<Vec<Recipe>, GatewayError> {
    let total = entries.len();
    let mut last_error = None;
    let recipes: Vec<Recipe> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value::<Recipe>(entry) {
            Ok(recipe) => Some(recipe),
            Err(e) => {
                warn!(index = idx, error = %e, "skipping malformed recipe");
                last_error = Some(e.to_string());
                None
            }
        })
        .collect();

    match last_error {
        Some(e) if recipes.is_empty() => Err(GatewayError::Decode(e)),
        _ => {
            debug!(total, kept = recipes.len(), "recipes decoded");
            Ok(recipes)
        }
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn analyze_image(&self, image: &[u8], mime: &str) -> Result<Vec<String>, GatewayError> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": mime, "data": STANDARD.encode(image) } },
                    { "text": prompts::ANALYZE_FRIDGE }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": prompts::ingredient_list_schema()
            }
        });
        let names: Vec<String> = self.generate(&self.config.text_model, body).await?.json()?;
        Ok(names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect())
    }

    #[instrument(skip(self, request), fields(fridge = request.fridge.len(), pantry = request.pantry.len()))]
    async fn suggest_recipes(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<Recipe>, GatewayError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompts::suggestion_prompt(request) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": prompts::recipe_list_schema()
            }
        });
        let entries: Vec<Value> = self.generate(&self.config.text_model, body).await?.json()?;
        decode_recipes(entries)
    }

    #[instrument(skip(self, description))]
    async fn generate_image(&self, description: &str) -> Result<String, GatewayError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompts::image_prompt(description) }] }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
                "imageConfig": { "aspectRatio": "16:9" }
            }
        });
        let response = self.generate(&self.config.image_model, body).await?;
        let inline = response.inline_data().ok_or(GatewayError::EmptyResponse)?;
        let mime = inline.mime_type.as_deref().unwrap_or("image/png");
        Ok(format!("data:{};base64,{}", mime, inline.data))
    }

    #[instrument(skip(self, text))]
    async fn speak_text(&self, text: &str) -> Result<Vec<i16>, GatewayError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompts::speech_prompt(text) }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.config.tts_voice }
                    }
                }
            }
        });
        let response = self.generate(&self.config.tts_model, body).await?;
        let inline = response.inline_data().ok_or(GatewayError::EmptyResponse)?;
        let raw = STANDARD
            .decode(&inline.data)
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        let samples = audio::pcm_from_le_bytes(&raw);
        if samples.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod gemini_tests {
    use super::*;

    fn parse(raw: &str) -> GenerateContentResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let r = parse(r#"{"candidates":[{"content":{"parts":[{"text":"[\"Milk\","},{"text":"\"Eggs\"]"}]}}]}"#);
        let names: Vec<String> = r.json().unwrap();
        assert_eq!(names, vec!["Milk", "Eggs"]);
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        let r = parse(r#"{}"#);
        assert!(matches!(r.json::<Vec<String>>(), Err(GatewayError::EmptyResponse)));
        assert!(r.inline_data().is_none());
    }

    #[test]
    fn malformed_json_text_is_decode_error() {
        let r = parse(r#"{"candidates":[{"content":{"parts":[{"text":"not json"}]}}]}"#);
        assert!(matches!(r.json::<Vec<String>>(), Err(GatewayError::Decode(_))));
    }

    #[test]
    fn malformed_recipes_are_skipped_individually() {
        let entries: Vec<Value> = serde_json::from_str(
            r#"[
                {"id":"a","name":"Soup","difficulty":"Easy","steps":["Simmer"]},
                {"id":"b","name":"Stew","difficulty":"easy"},
                {"id":"c","difficulty":"Hard"},
                {"id":"d","name":"Pie","difficulty":"Hard","calories":"lots"},
                {"id":"e","name":"Salad","difficulty":"Medium","calories":320.0}
            ]"#,
        )
        .unwrap();
        let recipes = decode_recipes(entries).unwrap();
        let ids: Vec<_> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "e"]);
        assert_eq!(recipes[1].calories, 320);
    }

    #[test]
    fn batch_with_no_usable_recipe_is_decode_error() {
        let entries = vec![json!({ "name": "Stew", "difficulty": "easy" })];
        assert!(matches!(decode_recipes(entries), Err(GatewayError::Decode(_))));
        assert_eq!(decode_recipes(Vec::new()).unwrap(), Vec::new());
    }

    #[test]
    fn finds_inline_data_after_text_part() {
        let r = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"here you go"},
                {"inlineData":{"mimeType":"image/png","data":"AAAA"}}
            ]}}]}"#,
        );
        let inline = r.inline_data().unwrap();
        assert_eq!(inline.mime_type.as_deref(), Some("image/png"));
        assert_eq!(inline.data, "AAAA");
    }
}
