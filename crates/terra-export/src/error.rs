//! Export error types.

use std::path::PathBuf;

/// Errors that can occur while encoding or writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The buffer could not be turned into image bytes.
    #[error("encoding failed: {0}")]
    EncodingFailure(String),

    /// The image codec rejected the data.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// Creating the export directory or writing the file failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path that was being created or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An export with the same name already exists and was left untouched.
    #[error("export target already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
