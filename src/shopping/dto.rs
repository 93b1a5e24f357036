use serde::{Deserialize, Serialize};

use super::list::ShoppingList;

#[derive(Debug, Clone, Serialize)]
pub struct ShoppingView {
    pub items: Vec<String>,
    /// Badge count shown in navigation.
    pub count: usize,
}

impl From<&ShoppingList> for ShoppingView {
    fn from(list: &ShoppingList) -> Self {
        Self {
            items: list.items().to_vec(),
            count: list.len(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
}
