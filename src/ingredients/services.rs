use time::OffsetDateTime;
use tracing::{error, info};

use super::{
    model::{Ingredient, NewPantryItem},
    repo,
    store::IngredientStore,
};
use crate::kitchen::KitchenError;
use crate::state::AppState;

/// Applies a pantry mutation and persists the result before returning.
///
/// The kitchen lock is held across the write so no other request observes
/// an unpersisted pantry. A failed write rolls the mutation back.
async fn mutate_pantry<T>(
    st: &AppState,
    mutation: impl FnOnce(&mut IngredientStore) -> Result<T, KitchenError>,
) -> Result<T, KitchenError> {
    let mut kitchen = st.kitchen.lock().await;
    let previous = kitchen.ingredients.pantry().to_vec();
    let out = mutation(&mut kitchen.ingredients)?;

    if let Err(e) =
        repo::save_pantry(st.storage.as_ref(), &st.config.pantry_key, kitchen.ingredients.pantry())
            .await
    {
        error!(error = %e, "pantry write failed; rolling back");
        kitchen.ingredients.restore_pantry(previous);
        return Err(KitchenError::Persistence(e));
    }
    Ok(out)
}

pub async fn add_pantry_item(
    st: &AppState,
    item: NewPantryItem,
    now: OffsetDateTime,
) -> Result<Ingredient, KitchenError> {
    let added = mutate_pantry(st, |store| Ok(store.add_pantry(item, now)?)).await?;
    info!(id = %added.id, name = %added.name, "pantry item added");
    Ok(added)
}

pub async fn remove_pantry_item(st: &AppState, id: &str) -> Result<Ingredient, KitchenError> {
    let removed = mutate_pantry(st, |store| {
        store
            .remove_pantry(id)
            .ok_or_else(|| KitchenError::PantryItemNotFound(id.to_string()))
    })
    .await?;
    info!(id = %removed.id, name = %removed.name, "pantry item removed");
    Ok(removed)
}

#[cfg(test)]
mod services_tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::*;
    use crate::gateway::fake::FakeGateway;
    use crate::storage::memory::MemoryStorage;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-05-10 12:00 UTC);

    fn item(name: &str) -> NewPantryItem {
        NewPantryItem {
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn every_mutation_is_written_through() {
        let storage = Arc::new(MemoryStorage::default());
        let st = AppState::fake_parts(FakeGateway::default(), storage.clone());

        let flour = add_pantry_item(&st, item("Flour"), NOW).await.unwrap();
        add_pantry_item(&st, item("Rice"), NOW).await.unwrap();
        let stored = repo::load_pantry(storage.as_ref(), &st.config.pantry_key).await.unwrap();
        assert_eq!(stored.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(), vec!["Rice", "Flour"]);

        remove_pantry_item(&st, &flour.id).await.unwrap();
        let stored = repo::load_pantry(storage.as_ref(), &st.config.pantry_key).await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn failed_write_rolls_back() {
        let storage = Arc::new(MemoryStorage::default());
        let st = AppState::fake_parts(FakeGateway::default(), storage.clone());
        add_pantry_item(&st, item("Flour"), NOW).await.unwrap();

        storage.fail_writes.store(true, Ordering::SeqCst);
        let err = add_pantry_item(&st, item("Rice"), NOW).await.unwrap_err();
        assert!(matches!(err, KitchenError::Persistence(_)));
        let kitchen = st.kitchen.lock().await;
        assert_eq!(kitchen.ingredients.pantry().len(), 1);
        assert_eq!(kitchen.ingredients.pantry()[0].name, "Flour");
    }

    #[tokio::test]
    async fn unknown_id_and_blank_name_are_rejected_without_writing() {
        let st = AppState::fake();
        assert!(matches!(
            remove_pantry_item(&st, "missing").await,
            Err(KitchenError::PantryItemNotFound(_))
        ));
        assert!(matches!(
            add_pantry_item(&st, item("  "), NOW).await,
            Err(KitchenError::Pantry(_))
        ));
        let stored = st.storage.get_object(&st.config.pantry_key).await.unwrap();
        assert!(stored.is_none());
    }
}
