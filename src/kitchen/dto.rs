use serde::{Deserialize, Serialize};

use super::GatewayFailure;
use crate::ingredients::{dto::PantryEntry, model::Ingredient};
use crate::navigation::{controller::View, dto::CookingView};
use crate::recipes::{dto::RecipeCard, model::DietaryRestriction};
use crate::shopping::dto::ShoppingView;

/// Everything a client needs to render the current screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenSnapshot {
    pub view: View,
    pub review_open: bool,
    pub cooking: Option<CookingView>,
    pub dietary_restriction: DietaryRestriction,
    pub fridge: Vec<Ingredient>,
    pub pantry: Vec<PantryEntry>,
    pub urgent_items: Vec<PantryEntry>,
    pub recipes: Vec<RecipeCard>,
    pub shopping: ShoppingView,
    pub last_failure: Option<GatewayFailure>,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub view: View,
}

#[derive(Debug, Deserialize)]
pub struct RestrictionRequest {
    pub restriction: DietaryRestriction,
}
