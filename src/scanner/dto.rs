use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ScanBase64Request {
    /// Data URI or bare base64.
    pub image: String,
}
