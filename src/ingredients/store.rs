use rand::{distributions::Alphanumeric, Rng};
use time::OffsetDateTime;

use super::model::{Ingredient, NewPantryItem, PantryError};
use crate::expiry;

/// Fridge detections (transient) and the pantry inventory (persisted, newest first).
#[derive(Debug, Default)]
pub struct IngredientStore {
    fridge: Vec<Ingredient>,
    pantry: Vec<Ingredient>,
}

impl IngredientStore {
    pub fn with_pantry(pantry: Vec<Ingredient>) -> Self {
        Self {
            fridge: Vec::new(),
            pantry,
        }
    }

    pub fn fridge(&self) -> &[Ingredient] {
        &self.fridge
    }

    pub fn fridge_names(&self) -> Vec<String> {
        self.fridge.iter().map(|i| i.name.clone()).collect()
    }

    /// A rescan replaces every previous detection.
    pub fn replace_fridge(&mut self, names: Vec<String>, now: OffsetDateTime) -> &[Ingredient] {
        let stamp = unix_millis(now);
        self.fridge = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Ingredient::named(format!("{stamp}-{idx}"), name))
            .collect();
        &self.fridge
    }

    pub fn clear_fridge(&mut self) {
        self.fridge.clear();
    }

    pub fn pantry(&self) -> &[Ingredient] {
        &self.pantry
    }

    pub fn add_pantry(
        &mut self,
        item: NewPantryItem,
        now: OffsetDateTime,
    ) -> Result<Ingredient, PantryError> {
        let name = item.name.trim();
        if name.is_empty() {
            return Err(PantryError::EmptyName);
        }
        let quantity = item
            .quantity
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        let ingredient = Ingredient {
            id: format!("{}-{}", unix_millis(now), suffix),
            name: name.to_string(),
            quantity,
            expiry_date: item.expiry_date,
        };
        self.pantry.insert(0, ingredient.clone());
        Ok(ingredient)
    }

    pub fn remove_pantry(&mut self, id: &str) -> Option<Ingredient> {
        let pos = self.pantry.iter().position(|i| i.id == id)?;
        Some(self.pantry.remove(pos))
    }

    /// Puts back a pantry taken with [`Self::pantry`] when persisting a mutation failed.
    pub fn restore_pantry(&mut self, pantry: Vec<Ingredient>) {
        self.pantry = pantry;
    }

    /// Pantry items expiring within the urgent window, already expired included.
    pub fn urgent_items(&self, now: OffsetDateTime) -> Vec<&Ingredient> {
        self.pantry
            .iter()
            .filter(|i| expiry::is_urgent(i.expiry_date, now))
            .collect()
    }
}

fn unix_millis(now: OffsetDateTime) -> i128 {
    now.unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
mod store_tests {
    use super::*;
    use time::macros::{date, datetime};

    const NOW: OffsetDateTime = datetime!(2024-05-10 12:00 UTC);

    fn entry(name: &str) -> NewPantryItem {
        NewPantryItem {
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn fridge_ids_come_from_timestamp_and_index() {
        let mut store = IngredientStore::default();
        let detected = store.replace_fridge(vec!["Milk".into(), "Eggs".into()], NOW);
        let stamp = NOW.unix_timestamp() * 1000;
        assert_eq!(detected[0].id, format!("{stamp}-0"));
        assert_eq!(detected[1].id, format!("{stamp}-1"));
        assert_eq!(store.fridge_names(), vec!["Milk", "Eggs"]);
    }

    #[test]
    fn rescan_replaces_previous_detections() {
        let mut store = IngredientStore::default();
        store.replace_fridge(vec!["Milk".into()], NOW);
        store.replace_fridge(vec!["Spinach".into()], NOW);
        assert_eq!(store.fridge_names(), vec!["Spinach"]);
        store.clear_fridge();
        assert!(store.fridge().is_empty());
    }

    #[test]
    fn pantry_inserts_newest_first_and_trims() {
        let mut store = IngredientStore::default();
        store.add_pantry(entry("Flour"), NOW).unwrap();
        let added = store
            .add_pantry(
                NewPantryItem {
                    name: "  Olive Oil ".into(),
                    quantity: Some("   ".into()),
                    expiry_date: None,
                },
                NOW,
            )
            .unwrap();
        assert_eq!(added.name, "Olive Oil");
        assert_eq!(added.quantity, None);
        assert_eq!(store.pantry()[0].name, "Olive Oil");
        assert_eq!(store.pantry()[1].name, "Flour");
        assert_ne!(store.pantry()[0].id, store.pantry()[1].id);
    }

    #[test]
    fn pantry_rejects_blank_name() {
        let mut store = IngredientStore::default();
        assert_eq!(store.add_pantry(entry("   "), NOW), Err(PantryError::EmptyName));
        assert!(store.pantry().is_empty());
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut store = IngredientStore::default();
        let flour = store.add_pantry(entry("Flour"), NOW).unwrap();
        assert!(store.remove_pantry("nope").is_none());
        assert_eq!(store.remove_pantry(&flour.id), Some(flour));
        assert!(store.pantry().is_empty());
    }

    #[test]
    fn urgent_items_include_expired_and_three_day_window() {
        let mut store = IngredientStore::default();
        for (name, expiry) in [
            ("Old", Some(date!(2024 - 05 - 01))),
            ("Soon", Some(date!(2024 - 05 - 13))),
            ("Later", Some(date!(2024 - 05 - 30))),
            ("Salt", None),
        ] {
            store
                .add_pantry(
                    NewPantryItem {
                        name: name.into(),
                        quantity: None,
                        expiry_date: expiry,
                    },
                    NOW,
                )
                .unwrap();
        }
        let urgent: Vec<_> = store.urgent_items(NOW).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(urgent, vec!["Soon", "Old"]);
    }
}
