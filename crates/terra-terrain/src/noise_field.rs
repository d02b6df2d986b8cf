//! Multi-octave fractal noise evaluated over a normalized sampling grid.
//!
//! Each octave samples Perlin noise at `(x / resolution) * scale * frequency`
//! plus a fixed offset, and the octaves are combined as an amplitude-weighted
//! average, so the output stays inside the base primitive's `[0, 1]` range.

use noise::{NoiseFn, Perlin};

use crate::error::TerrainError;

/// Upper bound on the octave count accepted by [`NoiseConfig::validate`].
pub const MAX_OCTAVES: u32 = 10;

/// Parameters for fractal noise evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseConfig {
    /// Number of base-noise periods spanned by the full grid at octave 0.
    /// Must be strictly positive.
    pub scale: f64,
    /// Offset added to the horizontal sample coordinate of every octave.
    pub offset_x: f64,
    /// Offset added to the vertical sample coordinate of every octave.
    pub offset_y: f64,
    /// Number of octaves to composite, in `[1, MAX_OCTAVES]`.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves, in `[0, 1]`.
    pub persistence: f64,
    /// Frequency multiplier between successive octaves. Must be positive.
    pub lacunarity: f64,
    /// Permutation seed for the Perlin primitive.
    pub seed: u32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: 15.0,
            offset_x: 350.0,
            offset_y: 780.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.2,
            seed: 0,
        }
    }
}

impl NoiseConfig {
    /// Check every parameter against its domain.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfiguration`] naming the first
    /// offending field.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !(1..=MAX_OCTAVES).contains(&self.octaves) {
            return Err(TerrainError::invalid(
                "octaves",
                format!("must be in [1, {MAX_OCTAVES}], got {}", self.octaves),
            ));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(TerrainError::invalid(
                "scale",
                format!("must be a finite value > 0, got {}", self.scale),
            ));
        }
        if !self.lacunarity.is_finite() || self.lacunarity <= 0.0 {
            return Err(TerrainError::invalid(
                "lacunarity",
                format!("must be a finite value > 0, got {}", self.lacunarity),
            ));
        }
        if !(0.0..=1.0).contains(&self.persistence) {
            return Err(TerrainError::invalid(
                "persistence",
                format!("must be in [0, 1], got {}", self.persistence),
            ));
        }
        if !self.offset_x.is_finite() {
            return Err(TerrainError::invalid("offset_x", "must be finite"));
        }
        if !self.offset_y.is_finite() {
            return Err(TerrainError::invalid("offset_y", "must be finite"));
        }
        Ok(())
    }
}

/// Deterministic fractal noise over a `resolution`-wide sampling grid.
///
/// Holds no mutable state: identical `(x, y)` always yields a bit-identical
/// result, and the field can be shared across threads.
#[derive(Clone, Debug)]
pub struct NoiseField {
    perlin: Perlin,
    config: NoiseConfig,
    resolution: u32,
}

impl NoiseField {
    /// Validate `config` and build a field normalized to `resolution` cells
    /// per side. A resolution of zero is treated as one.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfiguration`] if `config` fails
    /// [`NoiseConfig::validate`].
    pub fn new(config: NoiseConfig, resolution: u32) -> Result<Self, TerrainError> {
        config.validate()?;
        Ok(Self {
            perlin: Perlin::new(config.seed),
            config,
            resolution: resolution.max(1),
        })
    }

    /// Sample the fractal height at grid coordinate `(x, y)`.
    ///
    /// Returns a value in `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f32 {
        let resolution = f64::from(self.resolution);
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;
        let mut normalizer = 0.0;

        for _ in 0..self.config.octaves {
            let sx = (x / resolution) * self.config.scale * frequency + self.config.offset_x;
            let sy = (y / resolution) * self.config.scale * frequency + self.config.offset_y;
            total += self.base_noise(sx, sy) * amplitude;
            normalizer += amplitude;

            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        (total / normalizer) as f32
    }

    /// Perlin noise remapped from `[-1, 1]` to `[0, 1]`.
    fn base_noise(&self, x: f64, y: f64) -> f64 {
        ((self.perlin.get([x, y]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Parameters this field was built from.
    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Grid resolution used to normalize sample coordinates.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(config: NoiseConfig) -> NoiseField {
        NoiseField::new(config, 256).unwrap()
    }

    #[test]
    fn test_determinism_same_config_same_coord() {
        let a = field(NoiseConfig::default());
        let b = field(NoiseConfig::default());

        for &(x, y) in &[(0.0, 0.0), (17.0, 203.0), (255.0, 255.0), (3.25, 99.5)] {
            let h1 = a.sample(x, y);
            let h2 = b.sample(x, y);
            assert_eq!(
                h1.to_bits(),
                h2.to_bits(),
                "Same config + same coord must be bit-identical at ({x}, {y})"
            );
        }
    }

    #[test]
    fn test_output_within_unit_range() {
        let configs = [
            NoiseConfig::default(),
            NoiseConfig {
                octaves: 1,
                ..Default::default()
            },
            NoiseConfig {
                octaves: MAX_OCTAVES,
                persistence: 1.0,
                lacunarity: 3.0,
                ..Default::default()
            },
        ];

        for config in configs {
            let field = field(config);
            for y in (0..256).step_by(7) {
                for x in (0..256).step_by(5) {
                    let h = field.sample(x as f64, y as f64);
                    assert!(
                        (0.0..=1.0).contains(&h),
                        "Sample {h} at ({x}, {y}) escapes [0, 1] for {config:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_zero_persistence_matches_single_octave() {
        let layered = field(NoiseConfig {
            octaves: 6,
            persistence: 0.0,
            ..Default::default()
        });
        let single = field(NoiseConfig {
            octaves: 1,
            ..Default::default()
        });

        for i in 0..64 {
            let (x, y) = (i as f64 * 3.0, i as f64 * 2.0);
            assert_eq!(
                layered.sample(x, y),
                single.sample(x, y),
                "Octaves beyond the first carry zero weight when persistence is 0"
            );
        }
    }

    #[test]
    fn test_offset_shifts_the_field() {
        let base = field(NoiseConfig::default());
        let shifted = field(NoiseConfig {
            offset_x: NoiseConfig::default().offset_x + 0.37,
            ..Default::default()
        });

        let differing = (0..64)
            .filter(|&i| base.sample(i as f64, 10.0) != shifted.sample(i as f64, 10.0))
            .count();
        assert!(differing > 0, "Changing offset_x should move the field");
    }

    #[test]
    fn test_smooth_gradient_no_discontinuities() {
        let field = field(NoiseConfig {
            octaves: 1,
            ..Default::default()
        });
        let step = 0.01;

        for i in 0..10_000 {
            let x = i as f64 * step;
            let delta = (field.sample(x + step, 40.0) - field.sample(x, 40.0)).abs();
            assert!(delta < 0.05, "Discontinuity at x={x}: delta={delta}");
        }
    }

    #[test]
    fn test_zero_resolution_treated_as_one() {
        let field = NoiseField::new(NoiseConfig::default(), 0).unwrap();
        assert_eq!(field.resolution(), 1);
        assert!(field.sample(0.0, 0.0).is_finite());
    }

    #[test]
    fn test_rejects_invalid_octaves() {
        for octaves in [0, MAX_OCTAVES + 1] {
            let err = NoiseField::new(
                NoiseConfig {
                    octaves,
                    ..Default::default()
                },
                64,
            )
            .unwrap_err();
            assert!(
                matches!(err, TerrainError::InvalidConfiguration { field: "octaves", .. }),
                "octaves={octaves} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_rejects_non_positive_scale_and_lacunarity() {
        let cases = [
            (
                NoiseConfig {
                    scale: 0.0,
                    ..Default::default()
                },
                "scale",
            ),
            (
                NoiseConfig {
                    scale: -2.0,
                    ..Default::default()
                },
                "scale",
            ),
            (
                NoiseConfig {
                    lacunarity: 0.0,
                    ..Default::default()
                },
                "lacunarity",
            ),
            (
                NoiseConfig {
                    persistence: 1.5,
                    ..Default::default()
                },
                "persistence",
            ),
            (
                NoiseConfig {
                    offset_y: f64::NAN,
                    ..Default::default()
                },
                "offset_y",
            ),
        ];

        for (config, expected) in cases {
            match config.validate() {
                Err(TerrainError::InvalidConfiguration { field, .. }) => {
                    assert_eq!(field, expected, "Wrong field reported for {config:?}")
                }
                other => panic!("Expected rejection of {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(NoiseConfig::default().validate().is_ok());
    }
}
