use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{aggregator::ImageSlot, dto::RecipeCard, services};
use crate::kitchen::{dto::KitchenSnapshot, error::rejection};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id/image", get(get_recipe_image))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/refresh", post(refresh))
        .route("/recipes/:id/select", post(select_recipe))
}

#[derive(Debug, Serialize)]
pub struct RecipeImageResponse {
    pub id: String,
    pub url: String,
}

#[instrument(skip(state))]
pub async fn list_recipes(State(state): State<AppState>) -> Json<Vec<RecipeCard>> {
    let kitchen = state.kitchen.lock().await;
    Json(kitchen.recipe_cards())
}

/// 404 while the image is still being generated or after generation failed.
#[instrument(skip(state))]
pub async fn get_recipe_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeImageResponse>, (StatusCode, String)> {
    let kitchen = state.kitchen.lock().await;
    match kitchen.recipes.image_slot(&id) {
        Some(ImageSlot::Ready(url)) => Ok(Json(RecipeImageResponse {
            url: url.clone(),
            id,
        })),
        Some(ImageSlot::Failed) => Err((StatusCode::NOT_FOUND, "Image generation failed".into())),
        None => Err((StatusCode::NOT_FOUND, "Image not available".into())),
    }
}

/// "Find recipes": suggest from what is currently known. Image generation
/// continues in the background after the response.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Json<KitchenSnapshot> {
    let pending = services::refresh_recipes(&state).await;
    info!(images = pending.len(), "recipe images requested");
    let kitchen = state.kitchen.lock().await;
    Json(kitchen.snapshot(OffsetDateTime::now_utc()))
}

#[instrument(skip(state))]
pub async fn select_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<KitchenSnapshot>, (StatusCode, String)> {
    let mut kitchen = state.kitchen.lock().await;
    kitchen.select_recipe(&id).map_err(rejection)?;
    Ok(Json(kitchen.snapshot(OffsetDateTime::now_utc())))
}
