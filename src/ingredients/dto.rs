use serde::Serialize;
use time::OffsetDateTime;

use super::model::Ingredient;
use crate::expiry::{self, ExpiryStatus};

/// Pantry item with its expiry badge, evaluated at request time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryEntry {
    #[serde(flatten)]
    pub item: Ingredient,
    pub expiry: Option<ExpiryStatus>,
    pub urgent: bool,
}

impl PantryEntry {
    pub fn evaluate(item: &Ingredient, now: OffsetDateTime) -> Self {
        let expiry = expiry::evaluate(item.expiry_date, now);
        let urgent = expiry.as_ref().is_some_and(ExpiryStatus::is_urgent);
        Self {
            item: item.clone(),
            expiry,
            urgent,
        }
    }
}
