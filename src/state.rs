use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::{AppConfig, StorageConfig};
use crate::gateway::{gemini::GeminiGateway, ModelGateway};
use crate::ingredients::repo;
use crate::kitchen::Kitchen;
use crate::storage::{FsStorage, S3Storage, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub kitchen: Arc<Mutex<Kitchen>>,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub gateway: Arc<dyn ModelGateway>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let storage = match &config.storage {
            StorageConfig::Fs { dir } => Arc::new(FsStorage::new(dir)) as Arc<dyn StorageClient>,
            StorageConfig::S3 {
                endpoint,
                bucket,
                access_key,
                secret_key,
                region,
            } => Arc::new(
                S3Storage::new(endpoint, bucket, access_key, secret_key, region)
                    .await
                    .context("connect object storage")?,
            ) as Arc<dyn StorageClient>,
        };

        let gateway = Arc::new(
            GeminiGateway::new(config.gemini.clone()).context("build model gateway")?,
        ) as Arc<dyn ModelGateway>;

        let pantry = repo::load_pantry(storage.as_ref(), &config.pantry_key).await?;
        info!(items = pantry.len(), "pantry restored");

        Ok(Self::from_parts(
            Kitchen::with_pantry(pantry),
            config,
            storage,
            gateway,
        ))
    }

    pub fn from_parts(
        kitchen: Kitchen,
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        gateway: Arc<dyn ModelGateway>,
    ) -> Self {
        Self {
            kitchen: Arc::new(Mutex::new(kitchen)),
            config,
            storage,
            gateway,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with(crate::gateway::fake::FakeGateway::default())
    }

    #[cfg(test)]
    pub fn fake_with(gateway: crate::gateway::fake::FakeGateway) -> Self {
        Self::fake_parts(
            gateway,
            Arc::new(crate::storage::memory::MemoryStorage::default()),
        )
    }

    #[cfg(test)]
    pub fn fake_parts(
        gateway: crate::gateway::fake::FakeGateway,
        storage: Arc<crate::storage::memory::MemoryStorage>,
    ) -> Self {
        use crate::config::GeminiConfig;

        let config = Arc::new(AppConfig {
            gemini: GeminiConfig {
                api_key: "test".into(),
                base_url: "http://fake.local".into(),
                text_model: "text".into(),
                image_model: "image".into(),
                tts_model: "tts".into(),
                tts_voice: "Kore".into(),
                timeout_secs: 5,
            },
            storage: StorageConfig::Fs {
                dir: "unused".into(),
            },
            pantry_key: "chefvision_pantry.json".into(),
        });

        Self::from_parts(
            Kitchen::default(),
            config,
            storage as Arc<dyn StorageClient>,
            Arc::new(gateway) as Arc<dyn ModelGateway>,
        )
    }
}
