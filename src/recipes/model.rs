use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietaryRestriction {
    #[default]
    None,
    Vegetarian,
    Vegan,
    Keto,
    Paleo,
    #[serde(rename = "Gluten-Free")]
    GlutenFree,
}

impl fmt::Display for DietaryRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "None",
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
            Self::Keto => "Keto",
            Self::Paleo => "Paleo",
            Self::GlutenFree => "Gluten-Free",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default)]
    pub is_missing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user_name: String,
    #[serde(deserialize_with = "de_star_rating")]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub date: String,
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const DEFAULT_RATING: u8 = 5;
pub const REVIEWER_LABEL: &str = "You";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}

impl Review {
    /// Review written by the local user; `rating` defaults to 5 and `comment` to empty.
    pub fn by_user(
        rating: Option<u8>,
        comment: Option<String>,
        date: time::Date,
    ) -> Result<Self, ReviewError> {
        let rating = rating.unwrap_or(DEFAULT_RATING);
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ReviewError::RatingOutOfRange(rating));
        }
        Ok(Self {
            user_name: REVIEWER_LABEL.to_string(),
            rating,
            comment: comment.unwrap_or_default(),
            date: date.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default, deserialize_with = "de_whole_number")]
    pub calories: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_description: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, deserialize_with = "de_whole_number")]
    pub review_count: u32,
    #[serde(default)]
    pub recent_reviews: Vec<Review>,
}

impl Recipe {
    pub fn missing_ingredients(&self) -> impl Iterator<Item = &str> {
        self.ingredients
            .iter()
            .filter(|i| i.is_missing)
            .map(|i| i.name.as_str())
    }

    /// Display form of the aggregate, one decimal. The stored value is never rounded.
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }
}

// Generated JSON sometimes carries `450.0` where a count is expected.
fn de_whole_number<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let n = f64::deserialize(d)?;
    if !n.is_finite() || n < 0.0 {
        return Err(serde::de::Error::custom(format!("expected a non-negative number, got {n}")));
    }
    Ok(n.round().min(u32::MAX as f64) as u32)
}

fn de_star_rating<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let n = f64::deserialize(d)?;
    if !n.is_finite() {
        return Err(serde::de::Error::custom("rating is not a number"));
    }
    Ok(n.round().clamp(MIN_RATING as f64, MAX_RATING as f64) as u8)
}
