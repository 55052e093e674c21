use proptest::prelude::*;
use strata_blocks::config::{MaterialDef, MaterialsConfig};
use strata_blocks::{AtlasCell, MaterialId, MaterialRegistry, RegistryError};

fn def(name: &str) -> MaterialDef {
    MaterialDef {
        name: name.into(),
        hardness: 1.0,
        color: [1, 2, 3],
        atlas: None,
        slot: None,
    }
}

#[test]
fn air_is_reserved_at_zero() {
    let reg = MaterialRegistry::from_toml_str(
        r#"
        [[materials]]
        name = "stone"
        [[materials]]
        name = "dirt"
    "#,
    )
    .unwrap();
    assert_eq!(reg.len(), 3);
    assert!(reg.get(MaterialId::AIR).unwrap().name == "air");
    assert_eq!(reg.id_by_name("stone"), Some(MaterialId(1)));
    assert_eq!(reg.id_by_name("dirt"), Some(MaterialId(2)));
    assert!(!reg.contains(MaterialId(3)));
}

#[test]
fn declaring_air_is_rejected() {
    let cfg = MaterialsConfig {
        atlas_columns: 4,
        materials: vec![def("air")],
    };
    assert_eq!(
        MaterialRegistry::from_config(cfg).unwrap_err(),
        RegistryError::ReservedName("air".into())
    );
}

#[test]
fn duplicate_names_are_rejected() {
    let cfg = MaterialsConfig {
        atlas_columns: 4,
        materials: vec![def("stone"), def("stone")],
    };
    assert_eq!(
        MaterialRegistry::from_config(cfg).unwrap_err(),
        RegistryError::DuplicateName("stone".into())
    );
}

#[test]
fn explicit_atlas_cells_override_slots() {
    let reg = MaterialRegistry::from_toml_str(
        r#"
        atlas_columns = 4
        [[materials]]
        name = "a"
        atlas = [3, 7]
        [[materials]]
        name = "b"
        slot = 6
        [[materials]]
        name = "c"
    "#,
    )
    .unwrap();
    assert_eq!(reg.atlas_cell(MaterialId(1)), AtlasCell::new(3, 7));
    assert_eq!(reg.atlas_cell(MaterialId(2)), AtlasCell::new(2, 1));
    // declaration index 2 in a 4-wide atlas
    assert_eq!(reg.atlas_cell(MaterialId(3)), AtlasCell::new(2, 0));
    assert_eq!(reg.atlas_cell(MaterialId(99)), AtlasCell::default());
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(MaterialRegistry::from_toml_str("materials = 3").is_err());
}

proptest! {
    // Ids follow declaration order and round-trip through names
    #[test]
    fn ids_follow_declaration_order(n in 1usize..64) {
        let cfg = MaterialsConfig {
            atlas_columns: 8,
            materials: (0..n).map(|i| def(&format!("m{i}"))).collect(),
        };
        let reg = MaterialRegistry::from_config(cfg).unwrap();
        prop_assert_eq!(reg.len(), n + 1);
        for i in 0..n {
            let id = reg.id_by_name(&format!("m{i}")).unwrap();
            prop_assert_eq!(id, MaterialId(i as u16 + 1));
            prop_assert_eq!(&reg.get(id).unwrap().name, &format!("m{i}"));
        }
    }

    #[test]
    fn slot_cells_stay_inside_columns(slot in 0u16..1024, cols in 1u16..64) {
        let cell = AtlasCell::from_slot(slot, cols);
        prop_assert!(cell.col < cols);
        prop_assert_eq!(cell.row * cols + cell.col, slot);
    }
}
