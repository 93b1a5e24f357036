pub mod controller;
pub mod dto;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::cooking_routes())
        .merge(handlers::review_routes())
}
