use serde::{Deserialize, Serialize};

use super::controller::CookingSession;
use crate::recipes::model::Recipe;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingView {
    pub recipe: Recipe,
    /// Zero-based.
    pub step: usize,
    pub total_steps: usize,
    pub instruction: Option<String>,
    pub is_last_step: bool,
    pub progress: f64,
}

impl From<&CookingSession> for CookingView {
    fn from(session: &CookingSession) -> Self {
        Self {
            recipe: session.recipe.clone(),
            step: session.step,
            total_steps: session.total_steps(),
            instruction: session.instruction().map(str::to_string),
            is_last_step: session.is_last_step(),
            progress: session.progress(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}
