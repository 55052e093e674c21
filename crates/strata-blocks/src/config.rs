use serde::Deserialize;

// Top-level materials file
#[derive(Deserialize, Debug, Clone)]
pub struct MaterialsConfig {
    #[serde(default = "default_atlas_columns")]
    pub atlas_columns: u16,
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
}

fn default_atlas_columns() -> u16 {
    16
}

#[derive(Deserialize, Debug, Clone)]
pub struct MaterialDef {
    pub name: String,
    #[serde(default = "default_hardness")]
    pub hardness: f32,
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    // Either an explicit [col, row] or a linear slot; falls back to declaration order.
    #[serde(default)]
    pub atlas: Option<[u16; 2]>,
    #[serde(default)]
    pub slot: Option<u16>,
}

fn default_hardness() -> f32 {
    1.0
}

fn default_color() -> [u8; 3] {
    [255, 0, 255]
}
