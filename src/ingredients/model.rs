use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<Date>,
}

impl Ingredient {
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity: None,
            expiry_date: None,
        }
    }

    /// `"Flour (500g)"`, or just the name when no quantity is known.
    pub fn describe(&self) -> String {
        match &self.quantity {
            Some(q) => format!("{} ({})", self.name, q),
            None => self.name.clone(),
        }
    }
}

/// Manual pantry entry before it is assigned an id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPantryItem {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default, with = "iso_date::option")]
    pub expiry_date: Option<Date>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PantryError {
    #[error("ingredient name must not be empty")]
    EmptyName,
}
