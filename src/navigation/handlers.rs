use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{
    controller::NavigationError,
    dto::ReviewRequest,
};
use crate::gateway::{
    audio::{wav_from_pcm, SPEECH_SAMPLE_RATE},
    GatewayOperation,
};
use crate::kitchen::{
    dto::KitchenSnapshot,
    error::{internal, rejection},
    Kitchen, KitchenError,
};
use crate::state::AppState;

pub fn cooking_routes() -> Router<AppState> {
    Router::new()
        .route("/cooking/next", post(next_step))
        .route("/cooking/previous", post(previous_step))
        .route("/cooking/step/:step", post(go_to_step))
        .route("/cooking/speak", post(speak_step))
        .route("/cooking/close", post(close_cooking))
        .route("/cooking/finish", post(finish_cooking))
}

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/review", post(submit_review))
        .route("/review/skip", post(skip_review))
}

type Rejection = (StatusCode, String);

async fn transition<F>(state: &AppState, f: F) -> Result<Json<KitchenSnapshot>, Rejection>
where
    F: FnOnce(&mut Kitchen) -> Result<(), NavigationError>,
{
    let mut kitchen = state.kitchen.lock().await;
    f(&mut kitchen).map_err(|e| rejection(KitchenError::from(e)))?;
    Ok(Json(kitchen.snapshot(OffsetDateTime::now_utc())))
}

#[instrument(skip(state))]
pub async fn next_step(State(state): State<AppState>) -> Result<Json<KitchenSnapshot>, Rejection> {
    transition(&state, |k| k.navigation.next_step().map(drop)).await
}

#[instrument(skip(state))]
pub async fn previous_step(
    State(state): State<AppState>,
) -> Result<Json<KitchenSnapshot>, Rejection> {
    transition(&state, |k| k.navigation.previous_step().map(drop)).await
}

#[instrument(skip(state))]
pub async fn go_to_step(
    State(state): State<AppState>,
    Path(step): Path<usize>,
) -> Result<Json<KitchenSnapshot>, Rejection> {
    transition(&state, |k| k.navigation.go_to_step(step).map(drop)).await
}

#[instrument(skip(state))]
pub async fn close_cooking(
    State(state): State<AppState>,
) -> Result<Json<KitchenSnapshot>, Rejection> {
    transition(&state, |k| k.navigation.close_cooking()).await
}

#[instrument(skip(state))]
pub async fn finish_cooking(
    State(state): State<AppState>,
) -> Result<Json<KitchenSnapshot>, Rejection> {
    transition(&state, |k| k.navigation.finish_cooking()).await
}

/// Reads the current step aloud as WAV. A failed synthesis answers 204 and
/// is reported through the snapshot's failure notice.
#[instrument(skip(state))]
pub async fn speak_step(State(state): State<AppState>) -> Result<Response, Rejection> {
    let text = {
        let kitchen = state.kitchen.lock().await;
        kitchen
            .navigation
            .current_instruction()
            .map(str::to_string)
            .map_err(|e| rejection(e.into()))?
    };

    let outcome = state.gateway.speak_text(&text).await;
    let samples = {
        let mut kitchen = state.kitchen.lock().await;
        kitchen.settle(GatewayOperation::SpeakText, outcome)
    };
    let Some(samples) = samples else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let wav = wav_from_pcm(&samples, SPEECH_SAMPLE_RATE).map_err(internal)?;
    info!(samples = samples.len(), bytes = wav.len(), "step spoken");
    Ok(([(header::CONTENT_TYPE, "audio/wav")], wav).into_response())
}

#[instrument(skip(state, payload))]
pub async fn submit_review(
    State(state): State<AppState>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<KitchenSnapshot>, Rejection> {
    let now = OffsetDateTime::now_utc();
    let mut kitchen = state.kitchen.lock().await;
    kitchen
        .submit_review(payload.rating, payload.comment, now.date())
        .map_err(rejection)?;
    Ok(Json(kitchen.snapshot(now)))
}

#[instrument(skip(state))]
pub async fn skip_review(State(state): State<AppState>) -> Result<Json<KitchenSnapshot>, Rejection> {
    transition(&state, |k| k.navigation.skip_review()).await
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

    use crate::{app::build_app, gateway::fake::FakeGateway, state::AppState};

    fn recipe() -> crate::recipes::model::Recipe {
        serde_json::from_value(json!({
            "id": "r1", "name": "Shakshuka", "difficulty": "Medium",
            "steps": ["Saute peppers", "Add tomatoes", "Crack eggs"],
            "rating": 4, "reviewCount": 1
        }))
        .unwrap()
    }

    async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let content_type = res
            .headers()
            .get("content-type")
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = res.into_body().collect().await.unwrap().to_bytes().to_vec();
        Response {
            status,
            content_type,
            bytes,
        }
    }

    struct Response {
        status: StatusCode,
        content_type: Option<String>,
        bytes: Vec<u8>,
    }

    impl Response {
        fn json(&self) -> Value {
            serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
        }
    }

    async fn cooking_app(gateway: FakeGateway) -> axum::Router {
        let app = build_app(AppState::fake_with(FakeGateway {
            recipes: Some(vec![recipe()]),
            ..gateway
        }));
        send(&app, "POST", "/api/v1/recipes/refresh", None).await;
        let res = send(&app, "POST", "/api/v1/recipes/r1/select", None).await;
        assert_eq!(res.status, StatusCode::OK);
        app
    }

    #[tokio::test]
    async fn step_cursor_moves_and_validates() {
        let app = cooking_app(FakeGateway::default()).await;

        let res = send(&app, "POST", "/api/v1/cooking/next", None).await;
        assert_eq!(res.json()["cooking"]["instruction"], "Add tomatoes");

        let res = send(&app, "POST", "/api/v1/cooking/step/2", None).await;
        assert_eq!(res.json()["cooking"]["isLastStep"], true);

        let res = send(&app, "POST", "/api/v1/cooking/step/7", None).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);

        let res = send(&app, "POST", "/api/v1/cooking/previous", None).await;
        assert_eq!(res.json()["cooking"]["step"], 1);
    }

    #[tokio::test]
    async fn finish_review_folds_rating() {
        let app = cooking_app(FakeGateway::default()).await;

        let res = send(&app, "POST", "/api/v1/cooking/finish", None).await;
        assert_eq!(res.json()["reviewOpen"], true);

        // overlay blocks the step cursor
        let res = send(&app, "POST", "/api/v1/cooking/next", None).await;
        assert_eq!(res.status, StatusCode::CONFLICT);

        let res = send(&app, "POST", "/api/v1/review", Some(json!({ "rating": 0 }))).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);

        let res = send(
            &app,
            "POST",
            "/api/v1/review",
            Some(json!({ "rating": 2, "comment": "too salty" })),
        )
        .await;
        assert_eq!(res.status, StatusCode::OK);
        let snap = res.json();
        assert_eq!(snap["view"], "RECIPES");
        assert_eq!(snap["reviewOpen"], false);
        assert!(snap["cooking"].is_null());
        assert_eq!(snap["recipes"][0]["rating"], 3.0);
        assert_eq!(snap["recipes"][0]["reviewCount"], 2);
        assert_eq!(snap["recipes"][0]["recentReviews"][0]["userName"], "You");
    }

    #[tokio::test]
    async fn skip_and_close_return_to_recipes() {
        let app = cooking_app(FakeGateway::default()).await;
        let res = send(&app, "POST", "/api/v1/review/skip", None).await;
        assert_eq!(res.status, StatusCode::CONFLICT);

        send(&app, "POST", "/api/v1/cooking/finish", None).await;
        let res = send(&app, "POST", "/api/v1/review/skip", None).await;
        assert_eq!(res.json()["view"], "RECIPES");
        assert_eq!(res.json()["recipes"][0]["reviewCount"], 1);

        let res = send(&app, "POST", "/api/v1/cooking/close", None).await;
        assert_eq!(res.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn speak_returns_wav() {
        let app = cooking_app(FakeGateway {
            speech: Some(vec![0, 100, -100, 0]),
            ..Default::default()
        })
        .await;
        let res = send(&app, "POST", "/api/v1/cooking/speak", None).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.content_type.as_deref(), Some("audio/wav"));
        assert_eq!(&res.bytes[..4], b"RIFF");
    }

    #[tokio::test]
    async fn failed_speech_is_no_content_with_notice() {
        let app = cooking_app(FakeGateway {
            image: Some("data:image/png;base64,AA".into()),
            ..Default::default()
        })
        .await;
        let res = send(&app, "POST", "/api/v1/cooking/speak", None).await;
        assert_eq!(res.status, StatusCode::NO_CONTENT);

        let res = send(&app, "GET", "/api/v1/kitchen", None).await;
        assert_eq!(res.json()["lastFailure"]["operation"], "speak_text");
    }

    #[tokio::test]
    async fn speak_outside_cooking_conflicts() {
        let app = build_app(AppState::fake());
        let res = send(&app, "POST", "/api/v1/cooking/speak", None).await;
        assert_eq!(res.status, StatusCode::CONFLICT);
    }
}
