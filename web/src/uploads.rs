//! Filesystem storage for post images. Files land under the configured
//! upload directory and are referenced by stored filename only.

use std::path::Path;

use chrono::Utc;

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{0}")]
    Invalid(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for crate::error::AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Invalid(msg) => crate::error::AppError::Validation(msg.to_string()),
            UploadError::Io(e) => crate::error::AppError::Internal(e.to_string()),
        }
    }
}

/// Writes the uploaded bytes under `dir` and returns the stored filename.
/// The name is prefixed with a millisecond timestamp so re-uploads of the
/// same file never clash.
pub async fn save_image(dir: &str, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
    if original_name.is_empty()
        || original_name.contains("..")
        || original_name.contains('/')
        || original_name.contains('\\')
        || original_name.contains('\0')
    {
        return Err(UploadError::Invalid("invalid image filename"));
    }

    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::Invalid("unsupported image type"));
    }

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::Invalid("image too large"));
    }

    tokio::fs::create_dir_all(dir).await?;

    let stored = format!("{}-{}", Utc::now().timestamp_millis(), original_name);
    tokio::fs::write(Path::new(dir).join(&stored), bytes).await?;

    Ok(stored)
}
