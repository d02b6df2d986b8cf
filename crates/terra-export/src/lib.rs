//! Heightmap export: grayscale PNG encoding and timestamped, atomic file
//! output under an `Exports/` directory layout.

mod codec;
mod error;
mod export;
mod reveal;

pub use codec::{RangePolicy, decode_grayscale_png, encode_grayscale_png, to_intensities};
pub use error::ExportError;
pub use export::{
    ExportArtifact, ExportLayout, HEIGHTMAP_BASE_NAME, SCREENSHOT_BASE_NAME, TIMESTAMP_FORMAT,
    export_to_file,
};
pub use reveal::reveal_in_file_manager;
