use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{
    dto::ScanBase64Request,
    mime::{decode_data_uri, image_mime, ScanError},
    services,
};
use crate::kitchen::{dto::KitchenSnapshot, error::rejection};
use crate::state::AppState;

pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/scan", post(scan_upload))
        .route("/scan/base64", post(scan_base64))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .route("/scan/retry", post(retry))
}

type Rejection = (StatusCode, String);

#[instrument(skip(state, headers, body), fields(bytes = body.len()))]
pub async fn scan_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<KitchenSnapshot>, Rejection> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let mime = image_mime(content_type).map_err(|e| rejection(e.into()))?;
    if body.is_empty() {
        return Err(rejection(ScanError::EmptyImage.into()));
    }
    scan(&state, body, mime).await
}

#[instrument(skip(state, payload))]
pub async fn scan_base64(
    State(state): State<AppState>,
    Json(payload): Json<ScanBase64Request>,
) -> Result<Json<KitchenSnapshot>, Rejection> {
    let (bytes, mime) = decode_data_uri(&payload.image).map_err(|e| rejection(e.into()))?;
    scan(&state, Bytes::from(bytes), mime).await
}

async fn scan(
    state: &AppState,
    image: Bytes,
    mime: &'static str,
) -> Result<Json<KitchenSnapshot>, Rejection> {
    let pending = services::scan_fridge(state, image, mime).await;
    info!(images = pending.len(), "scan complete");
    let kitchen = state.kitchen.lock().await;
    Ok(Json(kitchen.snapshot(OffsetDateTime::now_utc())))
}

#[instrument(skip(state))]
pub async fn retry(State(state): State<AppState>) -> Json<KitchenSnapshot> {
    services::clear_scan(&state).await;
    let kitchen = state.kitchen.lock().await;
    Json(kitchen.snapshot(OffsetDateTime::now_utc()))
}
