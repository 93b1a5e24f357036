use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use super::aggregator::{Generation, ImageAttach};
use crate::gateway::{GatewayOperation, SuggestionRequest};
use crate::state::AppState;

struct ImageJob {
    recipe_id: String,
    description: String,
}

/// Suggests recipes from the current fridge, pantry and restriction.
pub async fn refresh_recipes(st: &AppState) -> Vec<JoinHandle<()>> {
    let request = {
        let kitchen = st.kitchen.lock().await;
        kitchen.suggestion_request(OffsetDateTime::now_utc())
    };
    suggest_and_publish(st, request).await
}

/// Requests a batch, publishes it (an empty one when the call failed) and
/// starts one image task per recipe.
///
/// The returned handles may be dropped; the tasks keep running and write
/// their image only if their batch is still current.
#[instrument(skip(st, request), fields(fridge = request.fridge.len()))]
pub async fn suggest_and_publish(st: &AppState, request: SuggestionRequest) -> Vec<JoinHandle<()>> {
    let outcome = st.gateway.suggest_recipes(&request).await;

    let (generation, jobs) = {
        let mut kitchen = st.kitchen.lock().await;
        let recipes = kitchen
            .settle(GatewayOperation::SuggestRecipes, outcome)
            .unwrap_or_default();
        let generation = kitchen.publish_batch(recipes);
        let jobs: Vec<ImageJob> = kitchen
            .recipes
            .recipes()
            .iter()
            .map(|r| ImageJob {
                recipe_id: r.id.clone(),
                description: r.image_description.clone(),
            })
            .collect();
        (generation, jobs)
    };

    jobs.into_iter()
        .map(|job| {
            let st = st.clone();
            tokio::spawn(async move { generate_and_attach(st, generation, job).await })
        })
        .collect()
}

async fn generate_and_attach(st: AppState, generation: Generation, job: ImageJob) {
    let outcome = st.gateway.generate_image(&job.description).await;

    let mut kitchen = st.kitchen.lock().await;
    if !kitchen.recipes.is_current(generation) {
        debug!(generation, recipe_id = %job.recipe_id, "batch superseded; image discarded");
        return;
    }
    match kitchen.settle(GatewayOperation::GenerateImage, outcome) {
        Some(handle) => match kitchen.recipes.attach_image(generation, &job.recipe_id, handle) {
            ImageAttach::Attached => info!(recipe_id = %job.recipe_id, "recipe image attached"),
            other => debug!(recipe_id = %job.recipe_id, ?other, "recipe image discarded"),
        },
        None => {
            let marked = kitchen.recipes.mark_image_failed(generation, &job.recipe_id);
            debug!(recipe_id = %job.recipe_id, ?marked, "recipe image unavailable");
        }
    }
}
