use base64::{engine::general_purpose::STANDARD, Engine};
use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("image is empty")]
    EmptyImage,
    #[error("unsupported image type {0}")]
    UnsupportedType(String),
    #[error("image is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Canonical mime for an uploaded photo. Parameters and case are ignored;
/// a missing or generic type falls back to JPEG.
pub fn image_mime(content_type: Option<&str>) -> Result<&'static str, ScanError> {
    let Some(ct) = content_type else {
        return Ok(DEFAULT_IMAGE_MIME);
    };
    let essence = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    match essence.as_str() {
        "" | "application/octet-stream" => Ok(DEFAULT_IMAGE_MIME),
        "image/jpeg" | "image/jpg" => Ok("image/jpeg"),
        "image/png" => Ok("image/png"),
        "image/webp" => Ok("image/webp"),
        "image/heic" => Ok("image/heic"),
        _ => Err(ScanError::UnsupportedType(essence)),
    }
}

/// Decodes `data:<mime>;base64,<payload>`. A bare base64 payload is accepted
/// as JPEG.
pub fn decode_data_uri(uri: &str) -> Result<(Vec<u8>, &'static str), ScanError> {
    lazy_static! {
        static ref DATA_URI_RE: Regex =
            Regex::new(r"(?s)^data:([^;,]*)(?:;[^,]*)?;base64,(.*)$").unwrap();
    }

    let uri = uri.trim();
    let (mime, payload) = match DATA_URI_RE.captures(uri) {
        Some(caps) => {
            let declared = caps.get(1).map(|m| m.as_str()).filter(|m| !m.is_empty());
            (
                image_mime(declared)?,
                caps.get(2).map_or("", |m| m.as_str()),
            )
        }
        None => (DEFAULT_IMAGE_MIME, uri),
    };

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    if bytes.is_empty() {
        return Err(ScanError::EmptyImage);
    }
    Ok((bytes, mime))
}
