//! Timestamped export files and the `Exports/` directory layout.
//!
//! Files are named `<base>_<yyyy-MM-dd_HH-mm-ss>.png`. Bytes are staged in a
//! temporary file inside the target directory and moved into place without
//! clobbering, so a failed export never leaves a visible partial file and an
//! existing export is never overwritten.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use image::ImageFormat;
use terra_terrain::HeightmapBuffer;

use crate::codec::{RangePolicy, encode_grayscale_png};
use crate::error::ExportError;

/// `strftime` pattern for export timestamps, e.g. `2025-01-31_23-59-07`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// File name prefix for heightmap exports.
pub const HEIGHTMAP_BASE_NAME: &str = "terrain_heightmap";

/// File name prefix for screenshot exports.
pub const SCREENSHOT_BASE_NAME: &str = "terrain_screenshot";

/// Encoded bytes paired with their final, timestamped location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// PNG-encoded payload.
    pub bytes: Vec<u8>,
    /// Final file path.
    pub target_path: PathBuf,
    /// Wall-clock time embedded in the file name.
    pub timestamp: NaiveDateTime,
}

impl ExportArtifact {
    /// Place `bytes` at `directory/<base_name>_<timestamp>.png`.
    pub fn new(
        bytes: Vec<u8>,
        directory: &Path,
        base_name: &str,
        timestamp: NaiveDateTime,
    ) -> Self {
        let file_name = format!("{base_name}_{}.png", timestamp.format(TIMESTAMP_FORMAT));
        Self {
            bytes,
            target_path: directory.join(file_name),
            timestamp,
        }
    }

    /// Like [`new`](Self::new), stamped with the current local time.
    pub fn stamped_now(bytes: Vec<u8>, directory: &Path, base_name: &str) -> Self {
        Self::new(bytes, directory, base_name, Local::now().naive_local())
    }

    /// Write the artifact, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::AlreadyExists`] if the target name is taken, or
    /// [`ExportError::Io`] if the directory or file cannot be written. In
    /// both cases no new file is left behind.
    pub fn write(&self) -> Result<PathBuf, ExportError> {
        let directory = match self.target_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(directory).map_err(ExportError::io(directory))?;

        if self.target_path.exists() {
            return Err(ExportError::AlreadyExists(self.target_path.clone()));
        }

        let mut staging = tempfile::Builder::new()
            .prefix(".terra-export-")
            .suffix(".partial")
            .tempfile_in(directory)
            .map_err(ExportError::io(directory))?;
        staging
            .write_all(&self.bytes)
            .map_err(ExportError::io(&self.target_path))?;
        staging
            .as_file()
            .sync_all()
            .map_err(ExportError::io(&self.target_path))?;

        // Dropping the returned `PersistError` removes the staged file.
        staging
            .persist_noclobber(&self.target_path)
            .map_err(|e| match e.error.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    ExportError::AlreadyExists(self.target_path.clone())
                }
                _ => ExportError::Io {
                    path: self.target_path.clone(),
                    source: e.error,
                },
            })?;

        tracing::info!(
            path = %self.target_path.display(),
            bytes = self.bytes.len(),
            "export written"
        );
        Ok(self.target_path.clone())
    }
}

/// Write `bytes` to `directory/<base_name>_<now>.png`.
///
/// # Errors
///
/// See [`ExportArtifact::write`].
pub fn export_to_file(
    bytes: &[u8],
    directory: &Path,
    base_name: &str,
) -> Result<PathBuf, ExportError> {
    ExportArtifact::stamped_now(bytes.to_vec(), directory, base_name).write()
}

/// Sibling `Exports/Heightmaps` and `Exports/Screenshots` directories under
/// an application-defined root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportLayout {
    root: PathBuf,
}

impl ExportLayout {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The application-defined root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `root/Exports/Heightmaps`.
    pub fn heightmaps_dir(&self) -> PathBuf {
        self.root.join("Exports").join("Heightmaps")
    }

    /// `root/Exports/Screenshots`.
    pub fn screenshots_dir(&self) -> PathBuf {
        self.root.join("Exports").join("Screenshots")
    }

    /// Encode `buffer` into an artifact stamped with `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::EncodingFailure`] if encoding fails.
    pub fn heightmap_artifact(
        &self,
        buffer: &HeightmapBuffer,
        policy: RangePolicy,
        timestamp: NaiveDateTime,
    ) -> Result<ExportArtifact, ExportError> {
        let bytes = encode_grayscale_png(buffer, policy)?;
        Ok(ExportArtifact::new(
            bytes,
            &self.heightmaps_dir(),
            HEIGHTMAP_BASE_NAME,
            timestamp,
        ))
    }

    /// Wrap renderer-captured PNG bytes into an artifact stamped with
    /// `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::EncodingFailure`] if `png` is not PNG data.
    pub fn screenshot_artifact(
        &self,
        png: Vec<u8>,
        timestamp: NaiveDateTime,
    ) -> Result<ExportArtifact, ExportError> {
        match image::guess_format(&png) {
            Ok(ImageFormat::Png) => Ok(ExportArtifact::new(
                png,
                &self.screenshots_dir(),
                SCREENSHOT_BASE_NAME,
                timestamp,
            )),
            _ => Err(ExportError::EncodingFailure(
                "screenshot bytes are not PNG data".to_string(),
            )),
        }
    }

    /// Encode and write `buffer` to `Exports/Heightmaps`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] on encoding or I/O failure.
    pub fn export_heightmap(
        &self,
        buffer: &HeightmapBuffer,
        policy: RangePolicy,
    ) -> Result<PathBuf, ExportError> {
        self.heightmap_artifact(buffer, policy, Local::now().naive_local())?
            .write()
    }

    /// Write renderer-captured PNG bytes to `Exports/Screenshots`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the bytes are not PNG or cannot be written.
    pub fn export_screenshot(&self, png: &[u8]) -> Result<PathBuf, ExportError> {
        self.screenshot_artifact(png.to_vec(), Local::now().naive_local())?
            .write()
    }
}
