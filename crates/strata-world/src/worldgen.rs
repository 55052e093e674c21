use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub mountains: Mountains,
    #[serde(default)]
    pub detail: Detail,
    #[serde(default)]
    pub biomes: Biomes,
    #[serde(default)]
    pub strata: Strata,
    #[serde(default)]
    pub ores: Ores,
    #[serde(default)]
    pub materials: MaterialNames,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_base_height")]
    pub base_height: f32,
    #[serde(default = "default_terrain_freq")]
    pub frequency: f32,
    #[serde(default = "default_terrain_amp")]
    pub amplitude: f32,
    #[serde(default = "default_terrain_octaves")]
    pub octaves: i32,
}
fn default_base_height() -> f32 {
    32.0
}
fn default_terrain_freq() -> f32 {
    0.004
}
fn default_terrain_amp() -> f32 {
    20.0
}
fn default_terrain_octaves() -> i32 {
    4
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            base_height: default_base_height(),
            frequency: default_terrain_freq(),
            amplitude: default_terrain_amp(),
            octaves: default_terrain_octaves(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Mountains {
    #[serde(default = "default_mountain_freq")]
    pub frequency: f32,
    #[serde(default = "default_mountain_amp")]
    pub amplitude: f32,
    #[serde(default = "default_mountain_octaves")]
    pub octaves: i32,
}
fn default_mountain_freq() -> f32 {
    0.0025
}
fn default_mountain_amp() -> f32 {
    96.0
}
fn default_mountain_octaves() -> i32 {
    5
}
impl Default for Mountains {
    fn default() -> Self {
        Self {
            frequency: default_mountain_freq(),
            amplitude: default_mountain_amp(),
            octaves: default_mountain_octaves(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Detail {
    #[serde(default = "default_detail_freq")]
    pub frequency: f32,
    #[serde(default = "default_detail_amp")]
    pub amplitude: f32,
}
fn default_detail_freq() -> f32 {
    0.045
}
fn default_detail_amp() -> f32 {
    4.0
}
impl Default for Detail {
    fn default() -> Self {
        Self {
            frequency: default_detail_freq(),
            amplitude: default_detail_amp(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Biomes {
    #[serde(default = "default_biome_freq")]
    pub frequency: f32,
    // Biome channel cut points in [-1, 1]: desert | plains | highlands | tundra
    #[serde(default = "default_desert_below")]
    pub desert_below: f32,
    #[serde(default = "default_plains_below")]
    pub plains_below: f32,
    #[serde(default = "default_highlands_below")]
    pub highlands_below: f32,
}
fn default_biome_freq() -> f32 {
    0.0015
}
fn default_desert_below() -> f32 {
    -0.45
}
fn default_plains_below() -> f32 {
    0.1
}
fn default_highlands_below() -> f32 {
    0.5
}
impl Default for Biomes {
    fn default() -> Self {
        Self {
            frequency: default_biome_freq(),
            desert_below: default_desert_below(),
            plains_below: default_plains_below(),
            highlands_below: default_highlands_below(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Strata {
    #[serde(default = "default_soil_depth")]
    pub soil_depth: f32,
    #[serde(default = "default_sedimentary_depth")]
    pub sedimentary_depth: f32,
    #[serde(default = "default_mid_depth")]
    pub mid_depth: f32,
    #[serde(default = "default_deep_depth")]
    pub deep_depth: f32,
    #[serde(default = "default_bedrock_floor")]
    pub bedrock_floor: i32,
    #[serde(default = "default_layer_thickness")]
    pub layer_thickness: i32,
}
fn default_soil_depth() -> f32 {
    4.0
}
fn default_sedimentary_depth() -> f32 {
    24.0
}
fn default_mid_depth() -> f32 {
    96.0
}
fn default_deep_depth() -> f32 {
    384.0
}
fn default_bedrock_floor() -> i32 {
    -1024
}
fn default_layer_thickness() -> i32 {
    3
}
impl Default for Strata {
    fn default() -> Self {
        Self {
            soil_depth: default_soil_depth(),
            sedimentary_depth: default_sedimentary_depth(),
            mid_depth: default_mid_depth(),
            deep_depth: default_deep_depth(),
            bedrock_floor: default_bedrock_floor(),
            layer_thickness: default_layer_thickness(),
        }
    }
}

// Ore thresholds on the ore channel remapped to [0, 1]; higher is rarer.
#[derive(Clone, Debug, Deserialize)]
pub struct Ores {
    #[serde(default = "default_ore_freq")]
    pub frequency: f32,
    #[serde(default = "default_coal")]
    pub coal: f32,
    #[serde(default = "default_copper")]
    pub copper: f32,
    #[serde(default = "default_iron")]
    pub iron: f32,
    #[serde(default = "default_gold")]
    pub gold: f32,
    #[serde(default = "default_ruby")]
    pub ruby: f32,
    #[serde(default = "default_diamond")]
    pub diamond: f32,
}
fn default_ore_freq() -> f32 {
    0.09
}
fn default_coal() -> f32 {
    0.74
}
fn default_copper() -> f32 {
    0.82
}
fn default_iron() -> f32 {
    0.88
}
fn default_gold() -> f32 {
    0.90
}
fn default_ruby() -> f32 {
    0.94
}
fn default_diamond() -> f32 {
    0.97
}
impl Default for Ores {
    fn default() -> Self {
        Self {
            frequency: default_ore_freq(),
            coal: default_coal(),
            copper: default_copper(),
            iron: default_iron(),
            gold: default_gold(),
            ruby: default_ruby(),
            diamond: default_diamond(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MaterialNames {
    #[serde(default = "default_sedimentary_layers")]
    pub sedimentary: Vec<String>,
    #[serde(default = "default_stone")]
    pub stone: String,
    #[serde(default = "default_deepstone")]
    pub deepstone: String,
    #[serde(default = "default_bedrock_set")]
    pub bedrock: Vec<String>,
}
fn default_sedimentary_layers() -> Vec<String> {
    ["stone", "limestone", "stone", "sandstone", "gravel", "clay"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_stone() -> String {
    "stone".into()
}
fn default_deepstone() -> String {
    "deepstone".into()
}
fn default_bedrock_set() -> Vec<String> {
    ["bedrock", "basalt", "obsidian"]
        .into_iter()
        .map(String::from)
        .collect()
}
impl Default for MaterialNames {
    fn default() -> Self {
        Self {
            sedimentary: default_sedimentary_layers(),
            stone: default_stone(),
            deepstone: default_deepstone(),
            bedrock: default_bedrock_set(),
        }
    }
}

// Flattened params used in tight loops (snapshot of config)
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub base_height: f32,
    pub terrain_frequency: f32,
    pub terrain_amplitude: f32,
    pub terrain_octaves: i32,
    pub mountain_frequency: f32,
    pub mountain_amplitude: f32,
    pub mountain_octaves: i32,
    pub detail_frequency: f32,
    pub detail_amplitude: f32,
    pub biome_frequency: f32,
    pub desert_below: f32,
    pub plains_below: f32,
    pub highlands_below: f32,
    pub soil_depth: f32,
    pub sedimentary_depth: f32,
    pub mid_depth: f32,
    pub deep_depth: f32,
    pub bedrock_floor: i32,
    pub layer_thickness: i32,
    pub ore_frequency: f32,
    pub ore_coal: f32,
    pub ore_copper: f32,
    pub ore_iron: f32,
    pub ore_gold: f32,
    pub ore_ruby: f32,
    pub ore_diamond: f32,
    pub sedimentary_layers: Vec<String>,
    pub stone: String,
    pub deepstone: String,
    pub bedrock_set: Vec<String>,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        Self {
            base_height: cfg.terrain.base_height,
            terrain_frequency: cfg.terrain.frequency,
            terrain_amplitude: cfg.terrain.amplitude,
            terrain_octaves: cfg.terrain.octaves.max(1),
            mountain_frequency: cfg.mountains.frequency,
            mountain_amplitude: cfg.mountains.amplitude,
            mountain_octaves: cfg.mountains.octaves.max(1),
            detail_frequency: cfg.detail.frequency,
            detail_amplitude: cfg.detail.amplitude,
            biome_frequency: cfg.biomes.frequency,
            desert_below: cfg.biomes.desert_below,
            plains_below: cfg.biomes.plains_below,
            highlands_below: cfg.biomes.highlands_below,
            soil_depth: cfg.strata.soil_depth,
            sedimentary_depth: cfg.strata.sedimentary_depth,
            mid_depth: cfg.strata.mid_depth,
            deep_depth: cfg.strata.deep_depth,
            bedrock_floor: cfg.strata.bedrock_floor,
            layer_thickness: cfg.strata.layer_thickness.max(1),
            ore_frequency: cfg.ores.frequency,
            ore_coal: cfg.ores.coal,
            ore_copper: cfg.ores.copper,
            ore_iron: cfg.ores.iron,
            ore_gold: cfg.ores.gold,
            ore_ruby: cfg.ores.ruby,
            ore_diamond: cfg.ores.diamond,
            sedimentary_layers: cfg.materials.sedimentary.clone(),
            stone: cfg.materials.stone.clone(),
            deepstone: cfg.materials.deepstone.clone(),
            bedrock_set: cfg.materials.bedrock.clone(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldGenConfig = toml::from_str(s)?;
        Ok(Self::from_config(&cfg))
    }
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    WorldGenParams::from_toml_str(&s)
}
