use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;

use super::model::{Recipe, Review};

/// Length of the most-recent-first review window kept on each recipe.
pub const RECENT_REVIEWS_WINDOW: usize = 3;

/// Identifies one recipe batch. Image writes carry the generation they were
/// requested for and are dropped once a newer batch has replaced it.
pub type Generation = u64;

/// What the side-table knows about one recipe's image. No entry means the
/// image is still being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    Ready(String),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAttach {
    Attached,
    StaleGeneration,
    UnknownRecipe,
}

/// Current recipe batch, its image side-table and review folding.
#[derive(Debug, Default)]
pub struct RecipeAggregator {
    recipes: Vec<Recipe>,
    index: HashMap<String, usize>,
    images: HashMap<String, ImageSlot>,
    generation: Generation,
}

impl RecipeAggregator {
    /// Replaces the whole batch and prunes the image side-table.
    ///
    /// Ids must be unique for keyed lookups to work, so a recipe arriving with
    /// an empty or repeated id is given a fresh one.
    pub fn replace_batch(&mut self, recipes: Vec<Recipe>) -> Generation {
        let mut seen = HashSet::with_capacity(recipes.len());
        self.recipes = recipes
            .into_iter()
            .map(|mut r| {
                if r.id.trim().is_empty() || !seen.insert(r.id.clone()) {
                    let fresh = Uuid::new_v4().to_string();
                    debug!(old_id = %r.id, new_id = %fresh, "reassigned recipe id");
                    seen.insert(fresh.clone());
                    r.id = fresh;
                }
                r
            })
            .collect();
        self.index = self
            .recipes
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id.clone(), pos))
            .collect();
        self.images.clear();
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.index.get(id).map(|&pos| &self.recipes[pos])
    }

    /// Upserts an image; images for other batches or unknown ids are discarded.
    pub fn attach_image(
        &mut self,
        generation: Generation,
        recipe_id: &str,
        handle: String,
    ) -> ImageAttach {
        self.write_slot(generation, recipe_id, ImageSlot::Ready(handle))
    }

    /// Marks the image as permanently unavailable. A ready image is kept.
    pub fn mark_image_failed(&mut self, generation: Generation, recipe_id: &str) -> ImageAttach {
        let ready = matches!(self.images.get(recipe_id), Some(ImageSlot::Ready(_)));
        if ready && self.is_current(generation) {
            return ImageAttach::Attached;
        }
        self.write_slot(generation, recipe_id, ImageSlot::Failed)
    }

    fn write_slot(
        &mut self,
        generation: Generation,
        recipe_id: &str,
        slot: ImageSlot,
    ) -> ImageAttach {
        if !self.is_current(generation) {
            return ImageAttach::StaleGeneration;
        }
        if !self.index.contains_key(recipe_id) {
            return ImageAttach::UnknownRecipe;
        }
        self.images.insert(recipe_id.to_string(), slot);
        ImageAttach::Attached
    }

    pub fn image_slot(&self, recipe_id: &str) -> Option<&ImageSlot> {
        self.images.get(recipe_id)
    }

    pub fn image(&self, recipe_id: &str) -> Option<&str> {
        match self.images.get(recipe_id) {
            Some(ImageSlot::Ready(url)) => Some(url),
            _ => None,
        }
    }

    /// Folds a review into the running mean. `None` when the recipe is no
    /// longer part of the current batch; the batch is left untouched then.
    pub fn submit_review(&mut self, recipe_id: &str, review: Review) -> Option<&Recipe> {
        let pos = *self.index.get(recipe_id)?;
        let recipe = &mut self.recipes[pos];
        fold_review(recipe, review);
        Some(recipe)
    }
}

fn fold_review(recipe: &mut Recipe, review: Review) {
    let total = recipe.rating * f64::from(recipe.review_count) + f64::from(review.rating);
    recipe.review_count += 1;
    recipe.rating = total / f64::from(recipe.review_count);
    recipe.recent_reviews.insert(0, review);
    recipe.recent_reviews.truncate(RECENT_REVIEWS_WINDOW);
}
