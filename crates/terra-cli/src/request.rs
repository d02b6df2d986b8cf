//! Translation from the persisted configuration into typed library inputs.

use std::path::PathBuf;

use terra_config::Config;
use terra_export::{ExportLayout, RangePolicy};
use terra_terrain::{
    DecorationRequest, GenerationRequest, GrassPrototype, NoiseConfig, TreeCountPolicy,
    TreePrototype,
};

use crate::platform::PlatformDirs;

/// Build the generation request described by `config`.
pub fn generation_request(config: &Config) -> GenerationRequest {
    let terrain = &config.terrain;
    let decoration = &config.decoration;

    GenerationRequest {
        width: terrain.width,
        height: terrain.height,
        noise: NoiseConfig {
            scale: terrain.scale,
            offset_x: terrain.offset_x,
            offset_y: terrain.offset_y,
            octaves: terrain.octaves,
            persistence: terrain.persistence,
            lacunarity: terrain.lacunarity,
            seed: terrain.seed,
        },
        height_multiplier: terrain.height_multiplier,
        add_grass: decoration.add_grass,
        add_trees: decoration.add_trees,
        tree_count: decoration.tree_count,
        tree_count_policy: if decoration.honor_tree_count {
            TreeCountPolicy::Configured
        } else {
            TreeCountPolicy::Fixed
        },
        grass_prototype: decoration
            .grass_texture
            .as_deref()
            .map(GrassPrototype::with_texture),
        tree_prototype: decoration.tree_prefab.as_ref().map(|prefab| TreePrototype {
            prefab: prefab.clone(),
        }),
        parallel: terrain.parallel,
    }
}

/// Parse the configured out-of-range policy.
///
/// # Errors
///
/// Returns a description of the accepted values if the string is unknown.
pub fn range_policy(config: &Config) -> Result<RangePolicy, String> {
    config.export.range_policy.parse()
}

/// Export layout rooted at the configured root, or the platform data dir.
pub fn export_layout(config: &Config, dirs: &PlatformDirs) -> ExportLayout {
    let root: PathBuf = config
        .export
        .root
        .clone()
        .unwrap_or_else(|| dirs.data_dir.clone());
    ExportLayout::new(root)
}

/// One-line summary of a decoration for the run log.
pub fn describe_decoration(decoration: &DecorationRequest) -> String {
    match decoration {
        DecorationRequest::Grass(mask) => format!(
            "grass mask {res}x{res} ({} per patch, texture {})",
            mask.resolution_per_patch,
            mask.prototype.texture,
            res = mask.resolution,
        ),
        DecorationRequest::Trees {
            prototype,
            instances,
        } => format!("{} trees (prefab {})", instances.len(), prototype.prefab),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_default_config_maps_to_default_request() {
        assert_eq!(
            generation_request(&Config::default()),
            GenerationRequest::default()
        );
    }

    #[test]
    fn test_decoration_resources_and_policy() {
        let mut config = Config::default();
        config.decoration.add_grass = true;
        config.decoration.add_trees = true;
        config.decoration.tree_count = 12;
        config.decoration.honor_tree_count = true;
        config.decoration.grass_texture = Some("meadow".to_string());
        config.decoration.tree_prefab = Some("oak".to_string());

        let request = generation_request(&config);
        assert_eq!(request.tree_count_policy, TreeCountPolicy::Configured);
        assert_eq!(request.tree_count, 12);
        assert_eq!(request.grass_prototype.map(|p| p.texture), Some("meadow".to_string()));
        assert_eq!(request.tree_prototype.map(|p| p.prefab), Some("oak".to_string()));
    }

    #[test]
    fn test_noise_parameters_carried_over() {
        let mut config = Config::default();
        config.terrain.octaves = 3;
        config.terrain.offset_x = -40.0;
        config.terrain.seed = 7;

        let noise = generation_request(&config).noise;
        assert_eq!(noise.octaves, 3);
        assert_eq!(noise.offset_x, -40.0);
        assert_eq!(noise.seed, 7);
        assert_eq!(noise.lacunarity, 2.2);
    }

    #[test]
    fn test_range_policy_parsing() {
        let mut config = Config::default();
        assert_eq!(range_policy(&config), Ok(RangePolicy::Clamp));

        config.export.range_policy = "Rescale".to_string();
        assert_eq!(range_policy(&config), Ok(RangePolicy::Rescale));

        config.export.range_policy = "wrap".to_string();
        assert!(range_policy(&config).is_err());
    }

    #[test]
    fn test_export_root_selection() {
        let dirs = PlatformDirs::resolve_with_root(Path::new("/base"));
        let mut config = Config::default();
        assert_eq!(export_layout(&config, &dirs).root(), dirs.data_dir.as_path());

        config.export.root = Some(PathBuf::from("renders"));
        assert_eq!(export_layout(&config, &dirs).root(), Path::new("renders"));
    }

    #[test]
    fn test_configured_request_generates() {
        let mut config = Config::default();
        config.terrain.width = 16;
        config.terrain.height = 8;
        config.decoration.add_trees = true;
        config.decoration.tree_prefab = Some("pine".to_string());
        config.decoration.placement_seed = Some(3);

        let mut rng = terra_terrain::placement_rng(config.decoration.placement_seed);
        let generation = terra_terrain::generate(&generation_request(&config), &mut rng).unwrap();
        assert_eq!(generation.heightmap.resolution(), 16);
        assert_eq!(generation.decorations.len(), 1);
        assert_eq!(
            describe_decoration(&generation.decorations[0]),
            "100 trees (prefab pine)"
        );
    }

    #[test]
    fn test_describe_grass_and_configured_trees() {
        let mut config = Config::default();
        config.terrain.width = 8;
        config.terrain.height = 8;
        config.decoration.add_grass = true;
        config.decoration.grass_texture = Some("meadow".to_string());
        config.decoration.add_trees = true;
        config.decoration.tree_prefab = Some("oak".to_string());
        config.decoration.honor_tree_count = true;
        config.decoration.tree_count = 4;

        let mut rng = terra_terrain::placement_rng(Some(11));
        let generation = terra_terrain::generate(&generation_request(&config), &mut rng).unwrap();
        let summaries: Vec<String> =
            generation.decorations.iter().map(describe_decoration).collect();
        assert_eq!(
            summaries,
            vec![
                "grass mask 256x256 (8 per patch, texture meadow)".to_string(),
                "4 trees (prefab oak)".to_string(),
            ]
        );
    }
}
