//! Square heightmap grids sampled from a [`NoiseField`].

use std::time::Instant;

use crate::error::TerrainError;
use crate::noise_field::{NoiseConfig, NoiseField};

/// Logical terrain footprint reported to a renderer.
///
/// The sampling resolution is always `max(width, height)`; a non-square
/// footprint stretches the same square grid rather than resampling it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainSize {
    width: u32,
    height: u32,
}

impl TerrainSize {
    /// Build a footprint from caller-supplied dimensions.
    ///
    /// Zero is raised to one. Negative values are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfiguration`] for a negative width or
    /// height.
    pub fn new(width: i32, height: i32) -> Result<Self, TerrainError> {
        if width < 0 {
            return Err(TerrainError::invalid(
                "width",
                format!("must not be negative, got {width}"),
            ));
        }
        if height < 0 {
            return Err(TerrainError::invalid(
                "height",
                format!("must not be negative, got {height}"),
            ));
        }
        Ok(Self {
            width: width.max(1) as u32,
            height: height.max(1) as u32,
        })
    }

    /// Footprint width in terrain units.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Footprint depth in terrain units.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cells per side of the sampling grid.
    pub fn resolution(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Vertical extent of the terrain volume: a quarter of its width.
    pub fn vertical_scale(&self) -> f32 {
        self.width as f32 / 4.0
    }

    /// `[width, vertical_scale, height]`, the terrain volume in world units.
    pub fn footprint(&self) -> [f32; 3] {
        [self.width as f32, self.vertical_scale(), self.height as f32]
    }
}

/// Immutable `resolution × resolution` grid of height samples.
///
/// Samples are stored row-major: `values()[y * resolution + x]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightmapBuffer {
    resolution: u32,
    values: Vec<f32>,
}

impl HeightmapBuffer {
    /// Wrap raw row-major samples.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::DimensionMismatch`] if `values.len()` is not
    /// `resolution * resolution`, or if `resolution` is zero.
    pub fn from_values(resolution: u32, values: Vec<f32>) -> Result<Self, TerrainError> {
        let expected = resolution as usize * resolution as usize;
        if resolution == 0 || values.len() != expected {
            return Err(TerrainError::DimensionMismatch {
                resolution,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { resolution, values })
    }

    /// Cells per side.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Height at cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= resolution` or `y >= resolution`.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.resolution && y < self.resolution);
        self.values[(y * self.resolution + x) as usize]
    }

    /// All samples in row-major order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// `(min, max)` over all samples.
    pub fn min_max(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Bilinearly interpolated height at normalized `(u, v)`.
    ///
    /// `u` runs along `x` and `v` along `y`; both are clamped to `[0, 1]`,
    /// where `1` addresses the last row or column.
    pub fn interpolated_height(&self, u: f32, v: f32) -> f32 {
        let last = self.resolution - 1;
        if last == 0 {
            return self.values[0];
        }

        let gx = u.clamp(0.0, 1.0) * last as f32;
        let gy = v.clamp(0.0, 1.0) * last as f32;
        let x0 = (gx.floor() as u32).min(last);
        let y0 = (gy.floor() as u32).min(last);
        let x1 = (x0 + 1).min(last);
        let y1 = (y0 + 1).min(last);
        let fx = gx - x0 as f32;
        let fy = gy - y0 as f32;

        let top = lerp(self.get(x0, y0), self.get(x1, y0), fx);
        let bottom = lerp(self.get(x0, y1), self.get(x1, y1), fx);
        lerp(top, bottom, fy)
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Samples a [`NoiseField`] over the full grid of a [`TerrainSize`].
#[derive(Clone, Debug)]
pub struct HeightmapBuilder {
    field: NoiseField,
    size: TerrainSize,
    height_multiplier: f32,
}

impl HeightmapBuilder {
    /// Validate the inputs and prepare a builder.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfiguration`] for an invalid noise
    /// config or a non-finite `height_multiplier`.
    pub fn new(
        config: NoiseConfig,
        size: TerrainSize,
        height_multiplier: f32,
    ) -> Result<Self, TerrainError> {
        if !height_multiplier.is_finite() {
            return Err(TerrainError::invalid(
                "height_multiplier",
                format!("must be finite, got {height_multiplier}"),
            ));
        }
        let field = NoiseField::new(config, size.resolution())?;
        Ok(Self {
            field,
            size,
            height_multiplier,
        })
    }

    /// Footprint this builder samples.
    pub fn size(&self) -> TerrainSize {
        self.size
    }

    /// Scaled height of a single cell.
    pub fn sample_cell(&self, x: u32, y: u32) -> f32 {
        self.field.sample(f64::from(x), f64::from(y)) * self.height_multiplier
    }

    /// Sample every cell on the calling thread.
    pub fn build(&self) -> HeightmapBuffer {
        let start = Instant::now();
        let resolution = self.size.resolution();
        let mut values = Vec::with_capacity(resolution as usize * resolution as usize);
        for y in 0..resolution {
            for x in 0..resolution {
                values.push(self.sample_cell(x, y));
            }
        }
        tracing::debug!(
            resolution,
            elapsed_us = start.elapsed().as_micros() as u64,
            "heightmap built"
        );
        HeightmapBuffer { resolution, values }
    }

    /// Sample the grid in contiguous row bands on up to `threads` scoped
    /// worker threads. Output is bit-identical to [`build`](Self::build).
    pub fn build_parallel(&self, threads: usize) -> HeightmapBuffer {
        let start = Instant::now();
        let resolution = self.size.resolution();
        let row_len = resolution as usize;
        let threads = threads.clamp(1, row_len);
        let rows_per_band = row_len.div_ceil(threads);
        let mut values = vec![0.0_f32; row_len * row_len];

        std::thread::scope(|scope| {
            for (band, cells) in values.chunks_mut(rows_per_band * row_len).enumerate() {
                scope.spawn(move || {
                    let first_row = band * rows_per_band;
                    for (offset, row) in cells.chunks_mut(row_len).enumerate() {
                        let y = (first_row + offset) as u32;
                        for (x, cell) in row.iter_mut().enumerate() {
                            *cell = self.sample_cell(x as u32, y);
                        }
                    }
                });
            }
        });

        tracing::debug!(
            resolution,
            threads,
            elapsed_us = start.elapsed().as_micros() as u64,
            "heightmap built in parallel"
        );
        HeightmapBuffer { resolution, values }
    }
}

/// Build a heightmap from the raw configuration surface.
///
/// # Errors
///
/// Returns [`TerrainError::InvalidConfiguration`] before any sampling if any
/// parameter is invalid.
pub fn build_heightmap(
    config: NoiseConfig,
    width: i32,
    height: i32,
    height_multiplier: f32,
) -> Result<HeightmapBuffer, TerrainError> {
    let size = TerrainSize::new(width, height)?;
    Ok(HeightmapBuilder::new(config, size, height_multiplier)?.build())
}

/// Worker count for [`HeightmapBuilder::build_parallel`]: one per logical CPU.
pub fn default_thread_count() -> usize {
    num_cpus::get().max(1)
}
