use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

/// Engine settings loaded from TOML. Every field has a default, so an empty
/// file (or no file at all) is a valid configuration.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(default)]
    pub workers: WorkersConfig,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StreamingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Horizontal Chebyshev radius of the needed-set, in chunks.
    #[serde(default = "default_render_distance")]
    pub render_distance: i32,
    /// Vertical radius; the needed-set is a cube when absent.
    #[serde(default)]
    pub vertical_distance: Option<i32>,
    #[serde(default = "default_rebuilds_per_tick")]
    pub rebuilds_per_tick: usize,
    /// Cap on generation jobs in flight; unbounded when absent.
    #[serde(default)]
    pub max_inflight: Option<usize>,
    #[serde(default = "default_gen_retries")]
    pub gen_retries: u32,
}
fn default_chunk_size() -> usize {
    strata_world::CHUNK_SIZE
}
fn default_render_distance() -> i32 {
    4
}
fn default_rebuilds_per_tick() -> usize {
    1
}
fn default_gen_retries() -> u32 {
    2
}
impl StreamingConfig {
    #[inline]
    pub fn vertical(&self) -> i32 {
        self.vertical_distance.unwrap_or(self.render_distance)
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            render_distance: default_render_distance(),
            vertical_distance: None,
            rebuilds_per_tick: default_rebuilds_per_tick(),
            max_inflight: None,
            gen_retries: default_gen_retries(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct WorkersConfig {
    /// Generation threads; `0` picks one less than the available cores.
    #[serde(default)]
    pub count: usize,
}

impl WorkersConfig {
    pub fn resolved(&self) -> usize {
        if self.count > 0 {
            return self.count;
        }
        thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1))
            .unwrap_or(1)
            .max(1)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default)]
    pub worldgen: Option<PathBuf>,
    #[serde(default)]
    pub materials: Option<PathBuf>,
}
fn default_seed() -> i32 {
    1337
}
impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            worldgen: None,
            materials: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_spawn")]
    pub spawn: [f32; 3],
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    #[serde(default = "default_jump_speed")]
    pub jump_speed: f32,
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
    /// Maximum raycast distance for break/place.
    #[serde(default = "default_reach")]
    pub reach: f32,
    #[serde(default = "default_ray_step")]
    pub ray_step: f32,
}
fn default_spawn() -> [f32; 3] {
    [0.5, 72.0, 0.5]
}
fn default_gravity() -> f32 {
    -25.0
}
fn default_walk_speed() -> f32 {
    5.0
}
fn default_jump_speed() -> f32 {
    7.5
}
fn default_eye_height() -> f32 {
    1.6
}
fn default_reach() -> f32 {
    6.0
}
fn default_ray_step() -> f32 {
    0.05
}
impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: default_spawn(),
            gravity: default_gravity(),
            walk_speed: default_walk_speed(),
            jump_speed: default_jump_speed(),
            eye_height: default_eye_height(),
            reach: default_reach(),
            ray_step: default_ray_step(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: EngineConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let s = &self.streaming;
        if s.chunk_size == 0 {
            return Err("streaming.chunk_size must be at least 1".into());
        }
        if s.render_distance < 0 || s.vertical() < 0 {
            return Err("streaming distances must not be negative".into());
        }
        if s.max_inflight == Some(0) {
            return Err("streaming.max_inflight must be at least 1 when set".into());
        }
        if self.player.ray_step <= 0.0 {
            return Err("player.ray_step must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.streaming.chunk_size, 16);
        assert_eq!(cfg.streaming.rebuilds_per_tick, 1);
        assert_eq!(cfg.streaming.gen_retries, 2);
        assert_eq!(cfg.streaming.max_inflight, None);
        assert_eq!(cfg.streaming.vertical_distance, None);
        assert_eq!(cfg.streaming.vertical(), cfg.streaming.render_distance);
        assert_eq!(cfg.world.seed, 1337);
        assert!(cfg.workers.resolved() >= 1);
    }

    #[test]
    fn sections_override_independently() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [streaming]
            chunk_size = 8
            max_inflight = 4
            [workers]
            count = 3
            [world]
            seed = -5
            worldgen = "assets/worldgen.toml"
        "#,
        )
        .unwrap();
        assert_eq!(cfg.streaming.chunk_size, 8);
        assert_eq!(cfg.streaming.render_distance, 4);
        assert_eq!(cfg.streaming.vertical(), 4);
        assert_eq!(cfg.streaming.max_inflight, Some(4));
        assert_eq!(cfg.workers.resolved(), 3);
        assert_eq!(cfg.world.seed, -5);
        assert_eq!(
            cfg.world.worldgen.as_deref(),
            Some(Path::new("assets/worldgen.toml"))
        );
        assert_eq!(cfg.player.reach, 6.0);
    }

    #[test]
    fn vertical_radius_overrides_the_cube() {
        let cfg =
            EngineConfig::from_toml_str("[streaming]\nrender_distance = 6\nvertical_distance = 2")
                .unwrap();
        assert_eq!(cfg.streaming.render_distance, 6);
        assert_eq!(cfg.streaming.vertical(), 2);
    }

    #[test]
    fn shipped_engine_config_parses() {
        let cfg = EngineConfig::from_toml_str(include_str!("../assets/engine.toml")).unwrap();
        assert_eq!(cfg.streaming.chunk_size, 16);
        assert_eq!(cfg.player.spawn, [0.5, 72.0, 0.5]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(EngineConfig::from_toml_str("[streaming]\nchunk_size = 0").is_err());
        assert!(EngineConfig::from_toml_str("[streaming]\nmax_inflight = 0").is_err());
        assert!(EngineConfig::from_toml_str("[streaming]\nrender_distance = -1").is_err());
        assert!(EngineConfig::from_toml_str("[streaming]\nvertical_distance = -1").is_err());
        assert!(EngineConfig::from_toml_str("[streaming\n").is_err());
    }
}
