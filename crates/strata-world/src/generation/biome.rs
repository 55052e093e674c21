use crate::worldgen::WorldGenParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Desert = 0,
    Plains = 1,
    Highlands = 2,
    Tundra = 3,
}

impl Biome {
    pub const COUNT: usize = 4;
    pub const ALL: [Biome; Biome::COUNT] =
        [Biome::Desert, Biome::Plains, Biome::Highlands, Biome::Tundra];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Picks a biome from the biome channel value.
    pub fn select(value: f32, params: &WorldGenParams) -> Biome {
        if value < params.desert_below {
            Biome::Desert
        } else if value < params.plains_below {
            Biome::Plains
        } else if value < params.highlands_below {
            Biome::Highlands
        } else {
            Biome::Tundra
        }
    }

    /// Mountain amplitude multiplier; continuous in the channel value so
    /// biome borders never produce height cliffs.
    #[inline]
    pub fn mountain_weight(value: f32) -> f32 {
        let t = ((value + 1.0) * 0.5).clamp(0.0, 1.0);
        0.15 + 0.85 * t * t
    }

    pub fn top_material(self) -> &'static str {
        match self {
            Biome::Desert => "sand",
            Biome::Plains => "grass",
            Biome::Highlands => "grass",
            Biome::Tundra => "snow",
        }
    }

    pub fn soil_material(self) -> &'static str {
        match self {
            Biome::Desert => "sandstone",
            Biome::Plains => "dirt",
            Biome::Highlands => "gravel",
            Biome::Tundra => "dirt",
        }
    }
}
