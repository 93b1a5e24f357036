use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::{
    dto::{KitchenSnapshot, NavigateRequest, RestrictionRequest},
    error::rejection,
    KitchenError,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/kitchen", get(get_kitchen))
        .route("/view", put(navigate))
        .route("/dietary-restriction", put(set_restriction))
}

#[instrument(skip(state))]
pub async fn get_kitchen(State(state): State<AppState>) -> Json<KitchenSnapshot> {
    let kitchen = state.kitchen.lock().await;
    Json(kitchen.snapshot(OffsetDateTime::now_utc()))
}

#[instrument(skip(state))]
pub async fn navigate(
    State(state): State<AppState>,
    Json(payload): Json<NavigateRequest>,
) -> Result<Json<KitchenSnapshot>, (StatusCode, String)> {
    let mut kitchen = state.kitchen.lock().await;
    kitchen
        .navigation
        .navigate(payload.view)
        .map_err(|e| rejection(KitchenError::from(e)))?;
    Ok(Json(kitchen.snapshot(OffsetDateTime::now_utc())))
}

#[instrument(skip(state))]
pub async fn set_restriction(
    State(state): State<AppState>,
    Json(payload): Json<RestrictionRequest>,
) -> Json<KitchenSnapshot> {
    let mut kitchen = state.kitchen.lock().await;
    kitchen.set_restriction(payload.restriction);
    Json(kitchen.snapshot(OffsetDateTime::now_utc()))
}
