//! Grayscale PNG codec for heightmap buffers.
//!
//! Each cell maps to one 8-bit intensity `round(v * 255)`. Values outside
//! `[0, 1]` are handled according to a [`RangePolicy`]; non-finite values are
//! always rejected.

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use image::{GrayImage, ImageFormat};
use terra_terrain::HeightmapBuffer;

use crate::error::ExportError;

/// What to do with samples outside the encodable `[0, 1]` band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RangePolicy {
    /// Saturate at 0 and 255.
    #[default]
    Clamp,
    /// Map the buffer's own `[min, max]` onto `[0, 1]`.
    Rescale,
    /// Refuse to encode.
    Reject,
}

impl fmt::Display for RangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Clamp => "clamp",
            Self::Rescale => "rescale",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

impl FromStr for RangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "rescale" => Ok(Self::Rescale),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown range policy `{other}` (expected clamp, rescale or reject)"
            )),
        }
    }
}

/// Convert every cell to an 8-bit intensity under `policy`.
///
/// # Errors
///
/// Returns [`ExportError::EncodingFailure`] for a non-finite cell, or for an
/// out-of-range cell under [`RangePolicy::Reject`].
pub fn to_intensities(
    buffer: &HeightmapBuffer,
    policy: RangePolicy,
) -> Result<Vec<u8>, ExportError> {
    let values = buffer.values();
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(ExportError::EncodingFailure(format!(
            "cell {index} holds non-finite value {}",
            values[index]
        )));
    }

    let out_of_range = values.iter().filter(|v| !(0.0..=1.0).contains(*v)).count();

    // Cells are mapped as `(v - min) / span` in f64, then saturated to [0, 1].
    let (min, span): (f64, f64) = match policy {
        RangePolicy::Clamp => {
            if out_of_range > 0 {
                tracing::warn!(
                    cells = out_of_range,
                    "heightmap values outside [0, 1] clamped during encoding"
                );
            }
            (0.0, 1.0)
        }
        RangePolicy::Rescale => {
            let (min, max) = buffer.min_max();
            (f64::from(min), f64::from(max) - f64::from(min))
        }
        RangePolicy::Reject => {
            if out_of_range > 0 {
                return Err(ExportError::EncodingFailure(format!(
                    "{out_of_range} cells lie outside [0, 1]"
                )));
            }
            (0.0, 1.0)
        }
    };

    Ok(values
        .iter()
        .map(|&v| {
            let t = if span > 0.0 {
                (f64::from(v) - min) / span
            } else {
                0.0
            };
            (t.clamp(0.0, 1.0) * 255.0).round() as u8
        })
        .collect())
}

/// Encode `buffer` as a single-channel 8-bit PNG of
/// `resolution × resolution` pixels.
///
/// Row `y` of the buffer becomes pixel row `y` of the image.
///
/// # Errors
///
/// Returns [`ExportError::EncodingFailure`] if the buffer cannot be encoded.
pub fn encode_grayscale_png(
    buffer: &HeightmapBuffer,
    policy: RangePolicy,
) -> Result<Vec<u8>, ExportError> {
    let resolution = buffer.resolution();
    let intensities = to_intensities(buffer, policy)?;
    let image = GrayImage::from_raw(resolution, resolution, intensities).ok_or_else(|| {
        ExportError::EncodingFailure(format!(
            "intensity buffer does not fill a {resolution}x{resolution} image"
        ))
    })?;

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ExportError::EncodingFailure(e.to_string()))?;
    Ok(bytes)
}

/// Decode PNG bytes into an 8-bit grayscale image.
///
/// # Errors
///
/// Returns [`ExportError::Image`] if the bytes are not a readable PNG.
pub fn decode_grayscale_png(bytes: &[u8]) -> Result<GrayImage, ExportError> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.into_luma8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_terrain::{NoiseConfig, build_heightmap};

    fn buffer(resolution: u32, values: Vec<f32>) -> HeightmapBuffer {
        HeightmapBuffer::from_values(resolution, values).unwrap()
    }

    #[test]
    fn test_round_trip_recovers_rounded_intensities() {
        let heightmap = build_heightmap(NoiseConfig::default(), 64, 64, 1.0).unwrap();
        let png = encode_grayscale_png(&heightmap, RangePolicy::Reject).unwrap();
        let decoded = decode_grayscale_png(&png).unwrap();

        assert_eq!(decoded.dimensions(), (64, 64));
        for y in 0..64 {
            for x in 0..64 {
                let expected = (heightmap.get(x, y) * 255.0).round() as u8;
                let actual = decoded.get_pixel(x, y).0[0];
                assert!(
                    expected.abs_diff(actual) <= 1,
                    "Pixel ({x}, {y}): expected {expected}, got {actual}"
                );
            }
        }
    }

    #[test]
    fn test_png_signature() {
        let png = encode_grayscale_png(&buffer(1, vec![0.5]), RangePolicy::Clamp).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_clamp_saturates_out_of_range() {
        let intensities =
            to_intensities(&buffer(2, vec![-0.5, 0.5, 1.0, 2.5]), RangePolicy::Clamp).unwrap();
        assert_eq!(intensities, vec![0, 128, 255, 255]);
    }

    #[test]
    fn test_rescale_spans_full_range() {
        let intensities =
            to_intensities(&buffer(2, vec![0.0, 1.25, 2.5, 2.5]), RangePolicy::Rescale).unwrap();
        assert_eq!(intensities, vec![0, 128, 255, 255]);
    }

    #[test]
    fn test_rescale_extreme_finite_range() {
        // `f32::MAX - -f32::MAX` overflows f32; the span must still be finite.
        let values = vec![-f32::MAX, 0.0, f32::MAX, f32::MAX];
        let intensities = to_intensities(&buffer(2, values), RangePolicy::Rescale).unwrap();
        assert_eq!(intensities, vec![0, 128, 255, 255]);
    }

    #[test]
    fn test_rescale_flat_buffer_is_black() {
        let intensities = to_intensities(&buffer(2, vec![3.0; 4]), RangePolicy::Rescale).unwrap();
        assert_eq!(intensities, vec![0; 4]);
    }

    #[test]
    fn test_reject_out_of_range() {
        let err = to_intensities(&buffer(2, vec![0.0, 0.2, 1.5, 0.1]), RangePolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, ExportError::EncodingFailure(_)), "{err:?}");
    }

    #[test]
    fn test_non_finite_rejected_under_every_policy() {
        for policy in [RangePolicy::Clamp, RangePolicy::Rescale, RangePolicy::Reject] {
            let result = encode_grayscale_png(&buffer(2, vec![0.0, f32::NAN, 0.5, 0.5]), policy);
            assert!(
                matches!(result, Err(ExportError::EncodingFailure(_))),
                "NaN must be rejected under {policy}"
            );
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_grayscale_png(b"definitely not a png"),
            Err(ExportError::Image(_))
        ));
    }

    #[test]
    fn test_range_policy_parsing() {
        assert_eq!("clamp".parse::<RangePolicy>(), Ok(RangePolicy::Clamp));
        assert_eq!(" Rescale ".parse::<RangePolicy>(), Ok(RangePolicy::Rescale));
        assert_eq!("REJECT".parse::<RangePolicy>(), Ok(RangePolicy::Reject));
        assert!("normalize".parse::<RangePolicy>().is_err());
        assert_eq!(RangePolicy::Rescale.to_string(), "rescale");
    }
}
