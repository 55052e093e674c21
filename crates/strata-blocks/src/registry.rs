use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use super::config::MaterialsConfig;
use super::types::{AtlasCell, Material, MaterialId};

const BUILTIN_MATERIALS: &str = include_str!("../../../assets/voxels/materials.toml");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// `air` is implicit at id 0 and cannot be redeclared.
    ReservedName(String),
    DuplicateName(String),
    TooManyMaterials(usize),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::ReservedName(n) => write!(f, "material name '{n}' is reserved"),
            RegistryError::DuplicateName(n) => write!(f, "material '{n}' declared twice"),
            RegistryError::TooManyMaterials(n) => {
                write!(f, "{n} materials do not fit in a 16-bit id space")
            }
        }
    }
}

impl Error for RegistryError {}

/// Ordered, immutable table of materials. Ids follow declaration order
/// starting at 1; id 0 is reserved for air.
#[derive(Clone, Debug)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    by_name: HashMap<String, MaterialId>,
    atlas_columns: u16,
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialRegistry {
    /// Registry containing only air.
    pub fn new() -> Self {
        let air = Material::air();
        let mut by_name = HashMap::new();
        by_name.insert(air.name.clone(), MaterialId::AIR);
        Self {
            materials: vec![air],
            by_name,
            atlas_columns: 16,
        }
    }

    /// The material set shipped in `assets/voxels/materials.toml`.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(BUILTIN_MATERIALS)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: MaterialsConfig = toml::from_str(toml_str)?;
        Ok(Self::from_config(cfg)?)
    }

    pub fn from_config(cfg: MaterialsConfig) -> Result<Self, RegistryError> {
        if cfg.materials.len() >= usize::from(u16::MAX) {
            return Err(RegistryError::TooManyMaterials(cfg.materials.len()));
        }
        let mut reg = MaterialRegistry::new();
        reg.atlas_columns = cfg.atlas_columns.max(1);
        for (i, def) in cfg.materials.into_iter().enumerate() {
            if def.name == "air" {
                return Err(RegistryError::ReservedName(def.name));
            }
            if reg.by_name.contains_key(&def.name) {
                return Err(RegistryError::DuplicateName(def.name));
            }
            let id = MaterialId(reg.materials.len() as u16);
            let atlas = match (def.atlas, def.slot) {
                (Some([col, row]), _) => AtlasCell::new(col, row),
                (None, Some(slot)) => AtlasCell::from_slot(slot, reg.atlas_columns),
                (None, None) => AtlasCell::from_slot(i as u16, reg.atlas_columns),
            };
            reg.by_name.insert(def.name.clone(), id);
            reg.materials.push(Material {
                id,
                name: def.name,
                hardness: def.hardness.max(0.0),
                color: def.color,
                atlas,
            });
        }
        Ok(reg)
    }

    #[inline]
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    pub fn id_by_name(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    /// True for air and for every declared material.
    #[inline]
    pub fn contains(&self, id: MaterialId) -> bool {
        id.index() < self.materials.len()
    }

    /// Number of entries including air.
    #[inline]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.materials.len() <= 1
    }

    #[inline]
    pub fn atlas_columns(&self) -> u16 {
        self.atlas_columns
    }

    /// Atlas cell for `id`; unknown ids map to the origin cell.
    #[inline]
    pub fn atlas_cell(&self, id: MaterialId) -> AtlasCell {
        self.get(id).map(|m| m.atlas).unwrap_or_default()
    }

    pub fn hardness(&self, id: MaterialId) -> Option<f32> {
        self.get(id).map(|m| m.hardness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_parses() {
        let reg = MaterialRegistry::builtin().unwrap();
        assert!(reg.len() > 10);
        assert_eq!(reg.id_by_name("air"), Some(MaterialId::AIR));
        for name in ["stone", "bedrock", "diamond_ore", "grass"] {
            assert!(reg.id_by_name(name).is_some(), "missing {name}");
        }
    }
}
