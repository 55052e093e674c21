use std::error::Error;
use std::fmt;

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use strata_blocks::{MaterialId, MaterialRegistry};

use crate::generation::Biome;
use crate::worldgen::WorldGenParams;

// Per-channel seed salts so no two features share a noise lattice.
const SALT_TERRAIN: i32 = 0;
const SALT_MOUNTAINS: i32 = 0x5EED_0A11;
const SALT_DETAIL: i32 = 41_337;
const SALT_BIOME: i32 = 0x1203_5F31;
const SALT_ORE: i32 = 99_173;

/// Anything that can answer "which material is at this voxel".
///
/// Implementations must be referentially transparent: the same coordinate
/// always yields the same id.
pub trait VoxelSource: Send + Sync {
    fn material(&self, wx: i32, wy: i32, wz: i32) -> MaterialId;
}

impl<F> VoxelSource for F
where
    F: Fn(i32, i32, i32) -> MaterialId + Send + Sync,
{
    #[inline]
    fn material(&self, wx: i32, wy: i32, wz: i32) -> MaterialId {
        self(wx, wy, wz)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    UnknownMaterial(String),
    EmptyMaterialSet(&'static str),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::UnknownMaterial(name) => {
                write!(f, "worldgen references unknown material '{name}'")
            }
            WorldError::EmptyMaterialSet(which) => write!(f, "worldgen {which} set is empty"),
        }
    }
}

impl Error for WorldError {}

/// Worldgen material names resolved to registry ids once, at construction.
#[derive(Clone, Debug)]
pub(crate) struct Palette {
    pub(crate) top: [MaterialId; Biome::COUNT],
    pub(crate) soil: [MaterialId; Biome::COUNT],
    pub(crate) sedimentary: Vec<MaterialId>,
    pub(crate) stone: MaterialId,
    pub(crate) deepstone: MaterialId,
    pub(crate) coal: MaterialId,
    pub(crate) copper: MaterialId,
    pub(crate) iron: MaterialId,
    pub(crate) gold: MaterialId,
    pub(crate) ruby: MaterialId,
    pub(crate) diamond: MaterialId,
    pub(crate) bedrock: Vec<MaterialId>,
}

impl Palette {
    fn resolve(reg: &MaterialRegistry, params: &WorldGenParams) -> Result<Self, WorldError> {
        let id = |name: &str| -> Result<MaterialId, WorldError> {
            match reg.id_by_name(name) {
                Some(id) if !id.is_air() => Ok(id),
                _ => Err(WorldError::UnknownMaterial(name.to_string())),
            }
        };
        let set = |names: &[String], which: &'static str| -> Result<Vec<MaterialId>, WorldError> {
            if names.is_empty() {
                return Err(WorldError::EmptyMaterialSet(which));
            }
            names.iter().map(|n| id(n)).collect()
        };
        let mut top = [MaterialId::AIR; Biome::COUNT];
        let mut soil = [MaterialId::AIR; Biome::COUNT];
        for biome in Biome::ALL {
            top[biome.index()] = id(biome.top_material())?;
            soil[biome.index()] = id(biome.soil_material())?;
        }
        Ok(Self {
            top,
            soil,
            sedimentary: set(&params.sedimentary_layers, "sedimentary")?,
            stone: id(&params.stone)?,
            deepstone: id(&params.deepstone)?,
            coal: id("coal_ore")?,
            copper: id("copper_ore")?,
            iron: id("iron_ore")?,
            gold: id("gold_ore")?,
            ruby: id("ruby_ore")?,
            diamond: id("diamond_ore")?,
            bedrock: set(&params.bedrock_set, "bedrock")?,
        })
    }
}

/// Procedural world: a pure mapping from voxel coordinate to material.
pub struct World {
    pub seed: i32,
    pub(crate) params: WorldGenParams,
    pub(crate) terrain: FastNoiseLite,
    pub(crate) mountains: FastNoiseLite,
    pub(crate) detail: FastNoiseLite,
    pub(crate) biome: FastNoiseLite,
    pub(crate) ore: FastNoiseLite,
    pub(crate) palette: Palette,
}

impl World {
    pub fn new(
        seed: i32,
        params: WorldGenParams,
        reg: &MaterialRegistry,
    ) -> Result<Self, WorldError> {
        let palette = Palette::resolve(reg, &params)?;

        let mut terrain = FastNoiseLite::with_seed(seed ^ SALT_TERRAIN);
        terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
        terrain.set_frequency(Some(params.terrain_frequency));
        terrain.set_fractal_type(Some(FractalType::FBm));
        terrain.set_fractal_octaves(Some(params.terrain_octaves));

        let mut mountains = FastNoiseLite::with_seed(seed ^ SALT_MOUNTAINS);
        mountains.set_noise_type(Some(NoiseType::OpenSimplex2));
        mountains.set_frequency(Some(params.mountain_frequency));
        mountains.set_fractal_type(Some(FractalType::Ridged));
        mountains.set_fractal_octaves(Some(params.mountain_octaves));

        let mut detail = FastNoiseLite::with_seed(seed ^ SALT_DETAIL);
        detail.set_noise_type(Some(NoiseType::OpenSimplex2));
        detail.set_frequency(Some(params.detail_frequency));

        let mut biome = FastNoiseLite::with_seed(seed ^ SALT_BIOME);
        biome.set_noise_type(Some(NoiseType::OpenSimplex2));
        biome.set_frequency(Some(params.biome_frequency));

        let mut ore = FastNoiseLite::with_seed(seed ^ SALT_ORE);
        ore.set_noise_type(Some(NoiseType::OpenSimplex2));
        ore.set_frequency(Some(params.ore_frequency));

        Ok(Self {
            seed,
            params,
            terrain,
            mountains,
            detail,
            biome,
            ore,
            palette,
        })
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    /// Materials that only ever appear at extreme depth.
    #[inline]
    pub fn bedrock_set(&self) -> &[MaterialId] {
        &self.palette.bedrock
    }
}

impl VoxelSource for World {
    #[inline]
    fn material(&self, wx: i32, wy: i32, wz: i32) -> MaterialId {
        World::material(self, wx, wy, wz)
    }
}
