use anyhow::Context;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::model::Ingredient;
use crate::storage::StorageClient;

pub const PANTRY_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PantryDocument {
    version: u32,
    items: Vec<Ingredient>,
}

/// Accepts the versioned document and the bare array written before versioning.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredPantry {
    Versioned(PantryDocument),
    Legacy(Vec<Ingredient>),
}

pub async fn load_pantry(storage: &dyn StorageClient, key: &str) -> anyhow::Result<Vec<Ingredient>> {
    let Some(raw) = storage
        .get_object(key)
        .await
        .with_context(|| format!("load pantry from {key}"))?
    else {
        debug!(key, "no stored pantry; starting empty");
        return Ok(Vec::new());
    };

    let items = match serde_json::from_slice::<StoredPantry>(&raw)
        .with_context(|| format!("decode pantry at {key}"))?
    {
        StoredPantry::Versioned(doc) => {
            if doc.version > PANTRY_SCHEMA_VERSION {
                warn!(version = doc.version, "pantry written by a newer schema; unknown fields ignored");
            }
            doc.items
        }
        StoredPantry::Legacy(items) => items,
    };
    debug!(key, count = items.len(), "pantry loaded");
    Ok(items)
}

pub async fn save_pantry(
    storage: &dyn StorageClient,
    key: &str,
    items: &[Ingredient],
) -> anyhow::Result<()> {
    let doc = serde_json::json!({
        "version": PANTRY_SCHEMA_VERSION,
        "items": items,
    });
    let body = serde_json::to_vec(&doc).context("encode pantry")?;
    storage
        .put_object(key, Bytes::from(body), "application/json")
        .await
        .with_context(|| format!("save pantry to {key}"))
}
