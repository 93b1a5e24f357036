use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::{dto::PantryEntry, model::NewPantryItem, services};
use crate::kitchen::error::rejection;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/pantry", get(list_pantry))
        .route("/pantry/urgent", get(list_urgent))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/pantry", post(add_item))
        .route("/pantry/:id", delete(remove_item))
}

#[instrument(skip(state))]
pub async fn list_pantry(State(state): State<AppState>) -> Json<Vec<PantryEntry>> {
    let now = OffsetDateTime::now_utc();
    let kitchen = state.kitchen.lock().await;
    Json(
        kitchen
            .ingredients
            .pantry()
            .iter()
            .map(|i| PantryEntry::evaluate(i, now))
            .collect(),
    )
}

#[instrument(skip(state))]
pub async fn list_urgent(State(state): State<AppState>) -> Json<Vec<PantryEntry>> {
    let now = OffsetDateTime::now_utc();
    let kitchen = state.kitchen.lock().await;
    Json(
        kitchen
            .ingredients
            .urgent_items(now)
            .into_iter()
            .map(|i| PantryEntry::evaluate(i, now))
            .collect(),
    )
}

#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<NewPantryItem>,
) -> Result<(StatusCode, Json<PantryEntry>), (StatusCode, String)> {
    let now = OffsetDateTime::now_utc();
    let added = services::add_pantry_item(&state, payload, now)
        .await
        .map_err(rejection)?;
    Ok((StatusCode::CREATED, Json(PantryEntry::evaluate(&added, now))))
}

#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    services::remove_pantry_item(&state, &id)
        .await
        .map_err(rejection)?;
    Ok(StatusCode::NO_CONTENT)
}
