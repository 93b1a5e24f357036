//! Application state root: every collaborator-facing mutation goes through here.

pub mod dto;
pub mod error;
pub mod handlers;

use axum::Router;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::gateway::{GatewayError, GatewayOperation, SuggestionRequest};
use crate::ingredients::{dto::PantryEntry, model::Ingredient, store::IngredientStore};
use crate::navigation::{
    controller::{CookingSession, NavigationError, ViewController},
    dto::CookingView,
};
use crate::recipes::{
    aggregator::{Generation, RecipeAggregator},
    dto::RecipeCard,
    model::{DietaryRestriction, Recipe, Review},
};
use crate::shopping::{dto::ShoppingView, list::ShoppingList};
use crate::state::AppState;

use self::dto::KitchenSnapshot;
pub use self::error::KitchenError;

pub fn router() -> Router<AppState> {
    handlers::routes()
}

/// Most recent failed model call, cleared by the next success of the same kind.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayFailure {
    pub operation: GatewayOperation,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

#[derive(Debug, Default)]
pub struct Kitchen {
    pub ingredients: IngredientStore,
    pub recipes: RecipeAggregator,
    pub navigation: ViewController,
    shopping: ShoppingList,
    restriction: DietaryRestriction,
    last_failure: Option<GatewayFailure>,
}

impl Kitchen {
    pub fn with_pantry(pantry: Vec<Ingredient>) -> Self {
        Self {
            ingredients: IngredientStore::with_pantry(pantry),
            ..Default::default()
        }
    }

    /// Downgrades a model call outcome to a value, remembering failures.
    pub fn settle<T>(
        &mut self,
        operation: GatewayOperation,
        outcome: Result<T, GatewayError>,
    ) -> Option<T> {
        match outcome {
            Ok(value) => {
                if self.last_failure.as_ref().is_some_and(|f| f.operation == operation) {
                    self.last_failure = None;
                }
                Some(value)
            }
            Err(e) => {
                warn!(?operation, error = %e, "model call failed");
                self.last_failure = Some(GatewayFailure {
                    operation,
                    message: e.to_string(),
                    at: OffsetDateTime::now_utc(),
                });
                None
            }
        }
    }

    pub fn last_failure(&self) -> Option<&GatewayFailure> {
        self.last_failure.as_ref()
    }

    /// Applies to the next suggestion request; the current batch is kept.
    pub fn set_restriction(&mut self, restriction: DietaryRestriction) {
        self.restriction = restriction;
        info!(%restriction, "dietary restriction set");
    }

    pub fn shopping(&self) -> &ShoppingList {
        &self.shopping
    }

    pub fn add_to_shopping(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let added = self.shopping.add(name.clone());
        debug!(%name, added, "shopping add");
        added
    }

    pub fn remove_from_shopping(&mut self, name: &str) -> bool {
        let removed = self.shopping.remove(name);
        debug!(%name, removed, "shopping remove");
        removed
    }

    /// Lists every ingredient the recipe marks as missing. Returns how many
    /// were new to the list.
    pub fn add_missing_from_recipe(&mut self, recipe_id: &str) -> Result<usize, KitchenError> {
        let recipe = self
            .recipes
            .get(recipe_id)
            .ok_or_else(|| KitchenError::RecipeNotFound(recipe_id.to_string()))?;
        let mut added = 0;
        for name in recipe.missing_ingredients() {
            if self.shopping.add(name) {
                added += 1;
            }
        }
        info!(recipe_id, added, "missing ingredients listed");
        Ok(added)
    }

    pub fn suggestion_request(&self, now: OffsetDateTime) -> SuggestionRequest {
        SuggestionRequest {
            fridge: self.ingredients.fridge_names(),
            pantry: self.ingredients.pantry().to_vec(),
            restriction: self.restriction,
            urgent: self
                .ingredients
                .urgent_items(now)
                .into_iter()
                .map(|i| i.name.clone())
                .collect(),
        }
    }

    /// Installs a new batch and moves to the recipe grid.
    pub fn publish_batch(&mut self, recipes: Vec<Recipe>) -> Generation {
        let generation = self.recipes.replace_batch(recipes);
        self.navigation.show_recipes();
        info!(generation, count = self.recipes.recipes().len(), "recipe batch published");
        generation
    }

    pub fn select_recipe(&mut self, recipe_id: &str) -> Result<&CookingSession, KitchenError> {
        let recipe = self
            .recipes
            .get(recipe_id)
            .cloned()
            .ok_or_else(|| KitchenError::RecipeNotFound(recipe_id.to_string()))?;
        Ok(self.navigation.select_recipe(recipe)?)
    }

    /// Folds the user's review into the recipe being cooked and closes the
    /// overlay. Returns the updated recipe, or `None` when its batch has been
    /// replaced in the meantime.
    pub fn submit_review(
        &mut self,
        rating: Option<u8>,
        comment: Option<String>,
        today: Date,
    ) -> Result<Option<Recipe>, KitchenError> {
        if !self.navigation.review_open() {
            return Err(NavigationError::ReviewNotOpen.into());
        }
        let review = Review::by_user(rating, comment, today)?;
        let Some(session) = self.navigation.submit_review()? else {
            return Ok(None);
        };
        match self.recipes.submit_review(&session.recipe.id, review) {
            Some(updated) => {
                info!(recipe_id = %updated.id, rating = updated.rating, reviews = updated.review_count, "review folded");
                Ok(Some(updated.clone()))
            }
            None => {
                debug!(recipe_id = %session.recipe.id, "recipe left the batch; review dropped");
                Ok(None)
            }
        }
    }

    pub fn snapshot(&self, now: OffsetDateTime) -> KitchenSnapshot {
        KitchenSnapshot {
            view: self.navigation.view(),
            review_open: self.navigation.review_open(),
            cooking: self.navigation.cooking().map(CookingView::from),
            dietary_restriction: self.restriction,
            fridge: self.ingredients.fridge().to_vec(),
            pantry: self
                .ingredients
                .pantry()
                .iter()
                .map(|i| PantryEntry::evaluate(i, now))
                .collect(),
            urgent_items: self
                .ingredients
                .urgent_items(now)
                .into_iter()
                .map(|i| PantryEntry::evaluate(i, now))
                .collect(),
            recipes: self.recipe_cards(),
            shopping: ShoppingView::from(&self.shopping),
            last_failure: self.last_failure.clone(),
        }
    }

    pub fn recipe_cards(&self) -> Vec<RecipeCard> {
        self.recipes
            .recipes()
            .iter()
            .map(|r| RecipeCard::new(r, self.recipes.image_slot(&r.id)))
            .collect()
    }
}
