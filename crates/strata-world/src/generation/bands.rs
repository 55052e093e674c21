use strata_blocks::MaterialId;

use super::super::World;

/// Stateless integer hash of a coordinate and the world seed.
#[inline]
pub(super) fn hash3(seed: i32, x: i32, y: i32, z: i32) -> u64 {
    let mut h = (seed as u32 as u64) ^ 0x9E37_79B9_7F4A_7C15;
    for v in [x, y, z] {
        h ^= v as u32 as u64;
        h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h ^= h >> 31;
    }
    h ^= h >> 29;
    h.wrapping_mul(0x94D0_49BB_1331_11EB) ^ (h >> 32)
}

impl World {
    /// Depth-band material selection for a cell already known to be solid.
    pub(super) fn material_for_depth(&self, wx: i32, wy: i32, wz: i32, depth: f32) -> MaterialId {
        let p = &self.params;
        let pal = &self.palette;
        if depth < 1.0 {
            return pal.top[self.biome_at(wx, wz).index()];
        }
        if depth < p.soil_depth {
            return pal.soil[self.biome_at(wx, wz).index()];
        }
        if depth < p.sedimentary_depth {
            return self.sedimentary_layer(wx, wy, wz);
        }
        let ore = self.ore_value(wx, wy, wz);
        if depth < p.mid_depth {
            if ore >= p.ore_iron {
                pal.iron
            } else if ore >= p.ore_copper {
                pal.copper
            } else if ore >= p.ore_coal {
                pal.coal
            } else {
                pal.stone
            }
        } else if ore >= p.ore_diamond {
            pal.diamond
        } else if ore >= p.ore_ruby {
            pal.ruby
        } else if ore >= p.ore_gold {
            pal.gold
        } else if ore >= p.ore_iron {
            pal.iron
        } else {
            pal.deepstone
        }
    }

    /// One of the fixed bedrock-tier materials, never air.
    pub(super) fn bedrock_at(&self, wx: i32, wy: i32, wz: i32) -> MaterialId {
        let set = &self.palette.bedrock;
        let i = (hash3(self.seed, wx, wy, wz) % set.len() as u64) as usize;
        set[i]
    }

    // Horizontal layers, gently warped by the terrain channel.
    fn sedimentary_layer(&self, wx: i32, wy: i32, wz: i32) -> MaterialId {
        let layers = &self.palette.sedimentary;
        let warp = self.terrain.get_noise_2d(wz as f32, wx as f32) * 4.0;
        let layer = ((wy as f32 + warp).floor() as i32).div_euclid(self.params.layer_thickness);
        let i = (hash3(self.seed, 0, layer, 0) % layers.len() as u64) as usize;
        layers[i]
    }

    #[inline]
    fn ore_value(&self, wx: i32, wy: i32, wz: i32) -> f32 {
        let n = self.ore.get_noise_3d(wx as f32, wy as f32, wz as f32);
        ((n + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
