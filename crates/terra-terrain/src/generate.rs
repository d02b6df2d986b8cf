//! Validated end-to-end generation: heightmap plus optional decorations.

use rand::Rng;

use crate::decoration::{
    DecorationRequest, GrassPrototype, TreeCountPolicy, TreePrototype, grass_mask, place_trees,
};
use crate::error::TerrainError;
use crate::heightmap::{HeightmapBuffer, HeightmapBuilder, TerrainSize};
use crate::noise_field::NoiseConfig;

/// Everything a single generation call needs, as typed parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    /// Terrain footprint width. Zero is raised to one; negative is rejected.
    pub width: i32,
    /// Terrain footprint depth. Zero is raised to one; negative is rejected.
    pub height: i32,
    /// Fractal noise parameters.
    pub noise: NoiseConfig,
    /// Factor applied to every normalized sample.
    pub height_multiplier: f32,
    /// Produce a grass detail mask.
    pub add_grass: bool,
    /// Scatter tree instances.
    pub add_trees: bool,
    /// Configured tree count, interpreted through `tree_count_policy`.
    pub tree_count: u32,
    /// Whether `tree_count` is honoured.
    pub tree_count_policy: TreeCountPolicy,
    /// Grass appearance. Grass is skipped when absent.
    pub grass_prototype: Option<GrassPrototype>,
    /// Tree asset. Trees are skipped when absent.
    pub tree_prototype: Option<TreePrototype>,
    /// Sample rows on worker threads. The output does not change.
    pub parallel: bool,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            noise: NoiseConfig::default(),
            height_multiplier: 2.5,
            add_grass: false,
            add_trees: false,
            tree_count: 1,
            tree_count_policy: TreeCountPolicy::Fixed,
            grass_prototype: None,
            tree_prototype: None,
            parallel: false,
        }
    }
}

/// Result of one generation call.
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    /// Footprint the renderer should stretch the heightmap over.
    pub size: TerrainSize,
    /// Freshly sampled heights.
    pub heightmap: HeightmapBuffer,
    /// Requested decorations that had their required resources.
    pub decorations: Vec<DecorationRequest>,
}

/// Validate `request`, sample its heightmap and derive decorations.
///
/// Tree positions are drawn from `rng`; pass a seeded RNG for reproducible
/// placement.
///
/// # Errors
///
/// Returns [`TerrainError::InvalidConfiguration`] before any sampling if a
/// parameter is invalid. Missing decoration resources are not errors: the
/// decoration is skipped with a warning.
pub fn generate<R: Rng + ?Sized>(
    request: &GenerationRequest,
    rng: &mut R,
) -> Result<Generation, TerrainError> {
    let size = TerrainSize::new(request.width, request.height)?;
    let builder = HeightmapBuilder::new(request.noise, size, request.height_multiplier)?;

    let heightmap = if request.parallel {
        builder.build_parallel(crate::heightmap::default_thread_count())
    } else {
        builder.build()
    };

    let mut decorations = Vec::new();

    if request.add_grass
        && let Some(mask) = grass_mask(request.grass_prototype.as_ref())
    {
        decorations.push(DecorationRequest::Grass(mask));
    }

    if request.add_trees {
        match &request.tree_prototype {
            Some(prototype) => {
                let count = request.tree_count_policy.resolve(request.tree_count);
                let instances = place_trees(&heightmap, count, rng);
                tracing::debug!(count = instances.len(), "trees placed");
                decorations.push(DecorationRequest::Trees {
                    prototype: prototype.clone(),
                    instances,
                });
            }
            None => tracing::warn!("trees requested but no tree prefab is assigned; skipping"),
        }
    }

    tracing::info!(
        width = size.width(),
        height = size.height(),
        resolution = heightmap.resolution(),
        decorations = decorations.len(),
        "terrain generated"
    );

    Ok(Generation {
        size,
        heightmap,
        decorations,
    })
}
