use bytes::Bytes;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

use crate::gateway::GatewayOperation;
use crate::recipes::services::suggest_and_publish;
use crate::state::AppState;

/// Replaces the fridge with what the photo shows and, if anything was
/// found, requests a recipe batch. A failed analysis counts as an empty
/// fridge.
#[instrument(skip(st, image), fields(bytes = image.len()))]
pub async fn scan_fridge(st: &AppState, image: Bytes, mime: &str) -> Vec<JoinHandle<()>> {
    let outcome = st.gateway.analyze_image(&image, mime).await;

    let request = {
        let mut kitchen = st.kitchen.lock().await;
        let names = kitchen
            .settle(GatewayOperation::AnalyzeImage, outcome)
            .unwrap_or_default();
        let now = OffsetDateTime::now_utc();
        let detected = kitchen.ingredients.replace_fridge(names, now).len();
        info!(detected, "fridge scanned");
        if detected == 0 {
            return Vec::new();
        }
        kitchen.suggestion_request(now)
    };

    suggest_and_publish(st, request).await
}

pub async fn clear_scan(st: &AppState) {
    st.kitchen.lock().await.ingredients.clear_fridge();
}
