//! Boundary to the generative model service.
//!
//! Every call returns a typed [`GatewayError`] on failure. Callers inside the
//! kitchen never propagate it: a failed call is settled to an empty or absent
//! value and recorded as the last failure for the client to show.

pub mod audio;
#[cfg(test)]
pub mod fake;
pub mod gemini;
pub mod prompts;

use async_trait::async_trait;
use serde::Serialize;

use crate::ingredients::model::Ingredient;
use crate::recipes::model::{DietaryRestriction, Recipe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayOperation {
    AnalyzeImage,
    SuggestRecipes,
    GenerateImage,
    SpeakText,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("model request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("model request timed out")]
    Timeout,
    #[error("model service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("could not decode model response: {0}")]
    Decode(String),
    #[error("model response contained no usable content")]
    EmptyResponse,
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

/// Everything a recipe suggestion is conditioned on.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRequest {
    pub fridge: Vec<String>,
    pub pantry: Vec<Ingredient>,
    pub restriction: DietaryRestriction,
    /// Pantry names expiring within the urgent window, to be used first.
    pub urgent: Vec<String>,
}

#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Ingredient names visible in a fridge photo.
    async fn analyze_image(&self, image: &[u8], mime: &str) -> Result<Vec<String>, GatewayError>;

    async fn suggest_recipes(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<Recipe>, GatewayError>;

    /// Illustrative photo as a `data:` URI.
    async fn generate_image(&self, description: &str) -> Result<String, GatewayError>;

    /// Narration as mono 16-bit PCM at [`audio::SPEECH_SAMPLE_RATE`].
    async fn speak_text(&self, text: &str) -> Result<Vec<i16>, GatewayError>;
}
