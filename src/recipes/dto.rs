use serde::Serialize;

use super::{aggregator::ImageSlot, model::Recipe};

/// Image state of a recipe card. Images arrive after the batch, one by one;
/// a failed one stays a placeholder for the life of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecipeImage {
    Ready { url: String },
    Pending,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCard {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub rating_label: String,
    pub image: RecipeImage,
}

impl RecipeCard {
    pub fn new(recipe: &Recipe, image: Option<&ImageSlot>) -> Self {
        Self {
            rating_label: recipe.rating_label(),
            recipe: recipe.clone(),
            image: match image {
                Some(ImageSlot::Ready(url)) => RecipeImage::Ready { url: url.clone() },
                Some(ImageSlot::Failed) => RecipeImage::Failed,
                None => RecipeImage::Pending,
            },
        }
    }
}
