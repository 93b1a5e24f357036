use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{GatewayError, ModelGateway, SuggestionRequest};
use crate::recipes::model::Recipe;

/// Scripted gateway. A `None` response makes the call fail, as does an image
/// request whose description is listed in `failing_images`.
#[derive(Default)]
pub struct FakeGateway {
    pub ingredients: Option<Vec<String>>,
    pub recipes: Option<Vec<Recipe>>,
    pub image: Option<String>,
    pub speech: Option<Vec<i16>>,
    pub image_delay: Option<Duration>,
    pub failing_images: Vec<String>,
    pub suggestion_requests: Mutex<Vec<SuggestionRequest>>,
    pub image_requests: Mutex<Vec<String>>,
}

fn scripted<T: Clone>(value: &Option<T>) -> Result<T, GatewayError> {
    value.clone().ok_or(GatewayError::Api {
        status: 503,
        body: "scripted failure".into(),
    })
}

#[async_trait]
impl ModelGateway for FakeGateway {
    async fn analyze_image(&self, _image: &[u8], _mime: &str) -> Result<Vec<String>, GatewayError> {
        scripted(&self.ingredients)
    }

    async fn suggest_recipes(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<Recipe>, GatewayError> {
        self.suggestion_requests.lock().unwrap().push(request.clone());
        scripted(&self.recipes)
    }

    async fn generate_image(&self, description: &str) -> Result<String, GatewayError> {
        self.image_requests.lock().unwrap().push(description.to_string());
        if let Some(delay) = self.image_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_images.iter().any(|d| d == description) {
            return Err(GatewayError::Api {
                status: 500,
                body: "scripted image failure".into(),
            });
        }
        scripted(&self.image).map(|base| format!("{base}#{description}"))
    }

    async fn speak_text(&self, _text: &str) -> Result<Vec<i16>, GatewayError> {
        scripted(&self.speech)
    }
}
