use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{AddItemRequest, ShoppingView};
use crate::kitchen::error::rejection;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shopping", get(list_items).post(add_item))
        .route("/shopping/:name", delete(remove_item))
        .route("/shopping/from-recipe/:id", post(add_missing_from_recipe))
}

#[instrument(skip(state))]
pub async fn list_items(State(state): State<AppState>) -> Json<ShoppingView> {
    let kitchen = state.kitchen.lock().await;
    Json(ShoppingView::from(kitchen.shopping()))
}

/// Names are stored verbatim; only an empty name is refused.
#[instrument(skip(state))]
pub async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<ShoppingView>, (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        warn!("empty shopping item");
        return Err((StatusCode::BAD_REQUEST, "Item name must not be empty".into()));
    }
    let mut kitchen = state.kitchen.lock().await;
    if kitchen.add_to_shopping(payload.name.clone()) {
        info!(name = %payload.name, "added to shopping list");
    }
    Ok(Json(ShoppingView::from(kitchen.shopping())))
}

#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<ShoppingView> {
    let mut kitchen = state.kitchen.lock().await;
    kitchen.remove_from_shopping(&name);
    Json(ShoppingView::from(kitchen.shopping()))
}

/// Adds every ingredient the recipe marks as missing.
#[instrument(skip(state))]
pub async fn add_missing_from_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShoppingView>, (StatusCode, String)> {
    let mut kitchen = state.kitchen.lock().await;
    kitchen.add_missing_from_recipe(&id).map_err(rejection)?;
    Ok(Json(ShoppingView::from(kitchen.shopping())))
}

#[cfg(test)]
mod handler_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{app::build_app, state::AppState};

    async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn add(name: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/shopping")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "name": name }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_adds_collapse_and_removal_is_exact() {
        let app = build_app(AppState::fake());

        send(app.clone(), add("Fresh basil")).await;
        let (_, view) = send(app.clone(), add("Fresh basil")).await;
        assert_eq!(view["count"], 1);

        let (_, view) = send(app.clone(), add("fresh basil")).await;
        assert_eq!(view["count"], 2);

        let (status, view) = send(
            app.clone(),
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/shopping/Fresh%20basil")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["items"], json!(["fresh basil"]));

        let (status, view) = send(
            app,
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/shopping/saffron")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["count"], 1);
    }

    #[tokio::test]
    async fn missing_recipe_ingredients_are_added_once() {
        let state = AppState::fake();
        {
            let mut kitchen = state.kitchen.lock().await;
            kitchen.add_to_shopping("Feta");
            kitchen.publish_batch(vec![serde_json::from_value(json!({
                "id": "r1", "name": "Greek salad", "difficulty": "Easy",
                "ingredients": [
                    { "name": "Cucumber", "isMissing": false },
                    { "name": "Feta", "isMissing": true },
                    { "name": "Olives", "isMissing": true }
                ]
            }))
            .unwrap()]);
        }
        let app = build_app(state);

        let post = |uri: &str| {
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        };
        let (status, view) = send(app.clone(), post("/api/v1/shopping/from-recipe/r1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["items"], json!(["Feta", "Olives"]));

        let (status, _) = send(app, post("/api/v1/shopping/from-recipe/r9")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let app = build_app(AppState::fake());
        let (status, _) = send(app, add("  ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
