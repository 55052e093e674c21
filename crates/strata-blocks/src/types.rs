use serde::{Deserialize, Serialize};

/// Index into the [`MaterialRegistry`](crate::MaterialRegistry). `0` is always air.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u16);

impl MaterialId {
    pub const AIR: MaterialId = MaterialId(0);

    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for MaterialId {
    fn from(value: u16) -> Self {
        MaterialId(value)
    }
}

/// Column/row of a material's tile in the texture atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasCell {
    pub col: u16,
    pub row: u16,
}

impl AtlasCell {
    #[inline]
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Cell for a linear slot in an atlas `columns` tiles wide.
    #[inline]
    pub fn from_slot(slot: u16, columns: u16) -> Self {
        let columns = columns.max(1);
        Self {
            col: slot % columns,
            row: slot / columns,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    /// Seconds of work a bare hand needs to break one voxel; consumed by external tools.
    pub hardness: f32,
    pub color: [u8; 3],
    pub atlas: AtlasCell,
}

impl Material {
    pub(crate) fn air() -> Self {
        Self {
            id: MaterialId::AIR,
            name: "air".to_string(),
            hardness: 0.0,
            color: [0, 0, 0],
            atlas: AtlasCell::default(),
        }
    }
}
