//! Decoration placement: a uniform grass detail mask and scattered tree
//! instances whose heights follow the generated heightmap.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::heightmap::HeightmapBuffer;

/// Cells per side of the grass detail grid, independent of terrain resolution.
pub const GRASS_DETAIL_RESOLUTION: u32 = 256;

/// Detail cells grouped into one render patch.
pub const GRASS_RESOLUTION_PER_PATCH: u32 = 8;

/// Number of trees placed under [`TreeCountPolicy::Fixed`].
pub const TREE_COUNT_FIXED: usize = 100;

/// Appearance of the grass billboard a renderer should draw.
#[derive(Clone, Debug, PartialEq)]
pub struct GrassPrototype {
    /// Identifier of the grass texture in the renderer's asset space.
    pub texture: String,
    /// Minimum and maximum billboard width.
    pub width_range: (f32, f32),
    /// Minimum and maximum billboard height.
    pub height_range: (f32, f32),
    /// RGBA tint for healthy grass.
    pub healthy_color: [f32; 4],
    /// RGBA tint for dry grass.
    pub dry_color: [f32; 4],
    /// Render as camera-facing billboards rather than meshes.
    pub billboard: bool,
}

impl GrassPrototype {
    /// Billboard grass with the default size and colour ranges.
    pub fn with_texture(texture: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
            width_range: (0.5, 1.0),
            height_range: (0.5, 1.0),
            healthy_color: [0.0, 1.0, 0.0, 1.0],
            dry_color: [1.0, 0.92, 0.016, 1.0],
            billboard: true,
        }
    }
}

/// Row-major grass density over the detail grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GrassMask {
    /// Prototype drawn in every non-zero cell.
    pub prototype: GrassPrototype,
    /// Cells per side.
    pub resolution: u32,
    /// Detail cells per render patch.
    pub resolution_per_patch: u32,
    density: Vec<u8>,
}

impl GrassMask {
    /// Density of cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is outside the detail grid.
    pub fn density(&self, x: u32, y: u32) -> u8 {
        assert!(x < self.resolution && y < self.resolution);
        self.density[(y * self.resolution + x) as usize]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[u8] {
        &self.density
    }
}

/// Build the uniform grass mask, or skip it when no prototype is available.
pub fn grass_mask(prototype: Option<&GrassPrototype>) -> Option<GrassMask> {
    let Some(prototype) = prototype else {
        tracing::warn!("grass requested but no grass texture is assigned; skipping");
        return None;
    };

    let cells = GRASS_DETAIL_RESOLUTION as usize * GRASS_DETAIL_RESOLUTION as usize;
    Some(GrassMask {
        prototype: prototype.clone(),
        resolution: GRASS_DETAIL_RESOLUTION,
        resolution_per_patch: GRASS_RESOLUTION_PER_PATCH,
        density: vec![1; cells],
    })
}

/// Identifies the tree asset a renderer should instantiate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreePrototype {
    /// Identifier of the tree prefab in the renderer's asset space.
    pub prefab: String,
}

/// One placed tree in the terrain's normalized coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeInstance {
    /// `[x, height, z]`, each in `[0, 1]` relative to the terrain volume.
    pub position: [f32; 3],
    /// Index into the prototype list handed to the renderer.
    pub prototype_index: u32,
    /// Horizontal scale multiplier.
    pub width_scale: f32,
    /// Vertical scale multiplier.
    pub height_scale: f32,
}

/// How many trees to place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TreeCountPolicy {
    /// Always place [`TREE_COUNT_FIXED`] trees, whatever count is configured.
    #[default]
    Fixed,
    /// Place exactly the configured count.
    Configured,
}

impl TreeCountPolicy {
    /// Resolve the number of trees to place for a configured count.
    pub fn resolve(self, configured: u32) -> usize {
        match self {
            Self::Fixed => {
                if configured as usize != TREE_COUNT_FIXED {
                    tracing::debug!(
                        configured,
                        placed = TREE_COUNT_FIXED,
                        "fixed tree count policy ignores configured tree_count"
                    );
                }
                TREE_COUNT_FIXED
            }
            Self::Configured => configured as usize,
        }
    }
}

/// Scatter `count` trees uniformly over the terrain.
///
/// Each tree's height is the heightmap interpolated at its position, clamped
/// to the terrain volume's normalized `[0, 1]` band.
pub fn place_trees<R: Rng + ?Sized>(
    heightmap: &HeightmapBuffer,
    count: usize,
    rng: &mut R,
) -> Vec<TreeInstance> {
    (0..count)
        .map(|_| {
            let x: f32 = rng.random();
            let z: f32 = rng.random();
            let height = heightmap.interpolated_height(x, z).clamp(0.0, 1.0);
            TreeInstance {
                position: [x, height, z],
                prototype_index: 0,
                width_scale: 1.0,
                height_scale: 1.0,
            }
        })
        .collect()
}

/// RNG for decoration placement: seeded when `seed` is given, otherwise
/// drawn from the thread-local entropy source.
pub fn placement_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

/// Secondary output handed to the renderer next to the heightmap.
#[derive(Clone, Debug, PartialEq)]
pub enum DecorationRequest {
    /// Paint the grass detail layer.
    Grass(GrassMask),
    /// Instantiate trees.
    Trees {
        /// Prototype at index 0.
        prototype: TreePrototype,
        /// Placed instances.
        instances: Vec<TreeInstance>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_buffer() -> HeightmapBuffer {
        // Height rises linearly with x from 0 to 2.
        let resolution = 16;
        let values = (0..resolution * resolution)
            .map(|i| (i % resolution) as f32 / (resolution - 1) as f32 * 2.0)
            .collect();
        HeightmapBuffer::from_values(resolution, values).unwrap()
    }

    #[test]
    fn test_grass_mask_uniform_density() {
        let mask = grass_mask(Some(&GrassPrototype::with_texture("grass"))).unwrap();
        assert_eq!(mask.resolution, GRASS_DETAIL_RESOLUTION);
        assert_eq!(mask.resolution_per_patch, GRASS_RESOLUTION_PER_PATCH);
        assert_eq!(
            mask.cells().len(),
            (GRASS_DETAIL_RESOLUTION * GRASS_DETAIL_RESOLUTION) as usize
        );
        assert!(mask.cells().iter().all(|&d| d == 1));
        assert_eq!(mask.density(255, 0), 1);
    }

    #[test]
    fn test_grass_without_prototype_is_skipped() {
        assert!(grass_mask(None).is_none());
    }

    #[test]
    fn test_seeded_tree_placement_reproducible() {
        let buffer = ramp_buffer();

        let a = place_trees(&buffer, 50, &mut placement_rng(Some(7)));
        let b = place_trees(&buffer, 50, &mut placement_rng(Some(7)));
        let c = place_trees(&buffer, 50, &mut placement_rng(Some(8)));

        assert_eq!(a, b, "Same seed must give the same placement");
        assert_ne!(a, c, "Different seeds should give different placement");
    }

    #[test]
    fn test_tree_heights_follow_heightmap() {
        // The ramp rises to 2.0, so trees past x = 0.5 sit at the top.
        let buffer = ramp_buffer();

        let trees = place_trees(&buffer, 200, &mut placement_rng(Some(99)));
        assert_eq!(trees.len(), 200);
        for tree in &trees {
            let [x, h, z] = tree.position;
            assert!((0.0..1.0).contains(&x), "x={x} out of range");
            assert!((0.0..1.0).contains(&z), "z={z} out of range");
            let expected = (2.0 * x).min(1.0);
            assert!((h - expected).abs() < 1e-5, "height {h} != {expected}");
        }
    }

    #[test]
    fn test_tree_on_full_height_terrain_reaches_top() {
        let resolution = 256;
        let values = vec![1.0; (resolution * resolution) as usize];
        let buffer = HeightmapBuffer::from_values(resolution, values).unwrap();

        let trees = place_trees(&buffer, 100, &mut placement_rng(Some(1)));
        assert!(
            trees.iter().all(|t| t.position[1] == 1.0),
            "trees on a flat 1.0 terrain must sit at normalized height 1.0"
        );
    }

    #[test]
    fn test_tree_count_policy() {
        assert_eq!(TreeCountPolicy::Fixed.resolve(1), TREE_COUNT_FIXED);
        assert_eq!(TreeCountPolicy::Fixed.resolve(5000), TREE_COUNT_FIXED);
        assert_eq!(TreeCountPolicy::Configured.resolve(5), 5);
        assert_eq!(TreeCountPolicy::Configured.resolve(0), 0);
        assert_eq!(TreeCountPolicy::default(), TreeCountPolicy::Fixed);
    }
}
