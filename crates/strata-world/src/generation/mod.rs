mod bands;
mod biome;

pub use self::biome::Biome;

use strata_blocks::MaterialId;

use super::World;

impl World {
    /// Material at world voxel `(wx, wy, wz)`.
    ///
    /// Pure: depends only on the seed, the params and the coordinate.
    pub fn material(&self, wx: i32, wy: i32, wz: i32) -> MaterialId {
        let p = &self.params;
        if wy <= p.bedrock_floor {
            return self.bedrock_at(wx, wy, wz);
        }
        let surface = self.surface_height(wx, wz);
        let depth = surface - wy as f32;
        if depth >= p.deep_depth {
            return self.bedrock_at(wx, wy, wz);
        }
        if self.density(wx, wy, wz, surface) < 0.0 {
            return MaterialId::AIR;
        }
        self.material_for_depth(wx, wy, wz, depth.max(0.0))
    }

    /// Continuous terrain surface height at column `(wx, wz)`.
    pub fn surface_height(&self, wx: i32, wz: i32) -> f32 {
        let p = &self.params;
        let (x, z) = (wx as f32, wz as f32);
        let rolling = self.terrain.get_noise_2d(x, z) * p.terrain_amplitude;
        let ridge = self.mountains.get_noise_2d(x, z).max(0.0);
        let weight = Biome::mountain_weight(self.biome_value(wx, wz));
        p.base_height + rolling + ridge * p.mountain_amplitude * weight
    }

    /// Biome channel in `[-1, 1]` at column `(wx, wz)`.
    #[inline]
    pub fn biome_value(&self, wx: i32, wz: i32) -> f32 {
        self.biome.get_noise_2d(wx as f32, wz as f32)
    }

    pub fn biome_at(&self, wx: i32, wz: i32) -> Biome {
        Biome::select(self.biome_value(wx, wz), &self.params)
    }

    /// Signed density: negative means air.
    #[inline]
    fn density(&self, wx: i32, wy: i32, wz: i32, surface: f32) -> f32 {
        let detail = self
            .detail
            .get_noise_3d(wx as f32, wy as f32, wz as f32)
            * self.params.detail_amplitude;
        surface - wy as f32 + detail
    }
}
