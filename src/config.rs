use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub enum StorageConfig {
    Fs {
        dir: String,
    },
    S3 {
        endpoint: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        region: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
    pub pantry_key: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY")?,
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
            text_model: std::env::var("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".into()),
            image_model: std::env::var("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-image".into()),
            tts_model: std::env::var("GEMINI_TTS_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-preview-tts".into()),
            tts_voice: std::env::var("GEMINI_TTS_VOICE").unwrap_or_else(|_| "Kore".into()),
            timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };

        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "fs".into());
        let storage = match backend.as_str() {
            "fs" => StorageConfig::Fs {
                dir: std::env::var("STORAGE_DIR").unwrap_or_else(|_| "./data".into()),
            },
            "s3" => StorageConfig::S3 {
                endpoint: std::env::var("S3_ENDPOINT")?,
                bucket: std::env::var("S3_BUCKET")?,
                access_key: std::env::var("S3_ACCESS_KEY")?,
                secret_key: std::env::var("S3_SECRET_KEY")?,
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            },
            other => anyhow::bail!("unknown STORAGE_BACKEND {other:?}, expected fs or s3"),
        };

        let pantry_key = std::env::var("PANTRY_STORAGE_KEY")
            .unwrap_or_else(|_| "chefvision_pantry.json".into());

        Ok(Self {
            gemini,
            storage,
            pantry_key,
        })
    }
}
