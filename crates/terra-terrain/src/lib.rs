//! Procedural terrain synthesis: multi-octave noise, heightmap grids, and
//! decoration placement (grass masks and tree instances).
//!
//! Every stage is a pure function of its inputs. The only randomness lives in
//! tree placement, and it is drawn from an RNG the caller owns.

mod decoration;
mod error;
mod generate;
mod heightmap;
mod noise_field;

pub use decoration::{
    DecorationRequest, GRASS_DETAIL_RESOLUTION, GRASS_RESOLUTION_PER_PATCH, GrassMask,
    GrassPrototype, TREE_COUNT_FIXED, TreeCountPolicy, TreeInstance, TreePrototype, grass_mask,
    place_trees, placement_rng,
};
pub use error::TerrainError;
pub use generate::{Generation, GenerationRequest, generate};
pub use heightmap::{
    HeightmapBuffer, HeightmapBuilder, TerrainSize, build_heightmap, default_thread_count,
};
pub use noise_field::{MAX_OCTAVES, NoiseConfig, NoiseField};
