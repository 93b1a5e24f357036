pub mod dto;
pub mod handlers;
pub mod list;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
