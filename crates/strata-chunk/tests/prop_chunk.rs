use proptest::prelude::*;
use strata_blocks::{MaterialId, MaterialRegistry};
use strata_chunk::{ChunkBuf, ChunkOccupancy, GenError, fill_chunk};
use strata_world::ChunkCoord;

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

fn small_i32() -> impl Strategy<Value = i32> {
    -100_000i32..=100_000
}

fn two_material_registry() -> MaterialRegistry {
    MaterialRegistry::from_toml_str(
        r#"
        [[materials]]
        name = "stone"
        [[materials]]
        name = "dirt"
    "#,
    )
    .unwrap()
}

#[test]
fn fill_matches_source_everywhere() {
    let reg = two_material_registry();
    let source = |x: i32, y: i32, z: i32| MaterialId(((x + y + z).rem_euclid(3)) as u16);
    let mut buf = ChunkBuf::new(ChunkCoord::new(-1, 2, 0), 4);
    let occ = fill_chunk(&source, &reg, &mut buf).unwrap();
    assert_eq!(occ, ChunkOccupancy::Populated);
    for wx in -4..0 {
        for wy in 8..12 {
            for wz in 0..4 {
                assert_eq!(buf.get_world(wx, wy, wz), Some(source(wx, wy, wz)));
            }
        }
    }
}

#[test]
fn fill_reports_empty_chunks() {
    let reg = two_material_registry();
    let air = |_x: i32, _y: i32, _z: i32| MaterialId::AIR;
    let mut buf = ChunkBuf::new(ChunkCoord::new(0, 0, 0), 4);
    assert_eq!(fill_chunk(&air, &reg, &mut buf), Ok(ChunkOccupancy::Empty));
    assert!(buf.is_all_air());
}

#[test]
fn fill_rejects_unknown_materials() {
    let reg = two_material_registry();
    let bogus = |_x: i32, _y: i32, _z: i32| MaterialId(42);
    let mut buf = ChunkBuf::new(ChunkCoord::new(1, 0, 0), 2);
    let err = fill_chunk(&bogus, &reg, &mut buf).unwrap_err();
    assert_eq!(
        err,
        GenError::InvalidMaterial {
            id: MaterialId(42),
            at: (2, 0, 0)
        }
    );
}

#[test]
fn fill_rejects_truncated_buffers() {
    let reg = two_material_registry();
    let air = |_x: i32, _y: i32, _z: i32| MaterialId::AIR;
    let mut buf = ChunkBuf::new(ChunkCoord::new(0, 0, 0), 4);
    buf.blocks.truncate(10);
    assert_eq!(
        fill_chunk(&air, &reg, &mut buf),
        Err(GenError::BufferSize {
            expected: 64,
            actual: 10
        })
    );
}

#[test]
fn reset_clears_and_retargets() {
    let mut buf = ChunkBuf::from_blocks_local(ChunkCoord::new(0, 0, 0), 2, vec![MaterialId(1); 8]);
    buf.reset(ChunkCoord::new(5, 5, 5), 3);
    assert_eq!(buf.coord, ChunkCoord::new(5, 5, 5));
    assert_eq!(buf.blocks.len(), 27);
    assert!(buf.is_all_air());
}

proptest! {
    // idx maps each (x,y,z) within bounds to unique in-range indices
    #[test]
    fn idx_is_unique_and_in_range(cx in small_i32(), cy in small_i32(), cz in small_i32(), s in dim()) {
        let buf = ChunkBuf::new(ChunkCoord::new(cx, cy, cz), s);
        let expect = s * s * s;
        let mut seen = vec![false; expect];
        for y in 0..s { for z in 0..s { for x in 0..s {
            let i = buf.idx(x, y, z);
            prop_assert!(i < expect);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }}}
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // set_world then get_world returns the written id; outside cells are rejected
    #[test]
    fn set_world_then_get_world(cx in small_i32(), cy in small_i32(), cz in small_i32(), s in dim(),
                                lx in 0usize..8, ly in 0usize..8, lz in 0usize..8, id in 1u16..100) {
        let (lx, ly, lz) = (lx % s, ly % s, lz % s);
        let coord = ChunkCoord::new(cx, cy, cz);
        let mut buf = ChunkBuf::new(coord, s);
        let (bx, by, bz) = coord.base(s);
        let (wx, wy, wz) = (bx + lx as i32, by + ly as i32, bz + lz as i32);
        prop_assert!(buf.set_world(wx, wy, wz, MaterialId(id)));
        prop_assert_eq!(buf.get_world(wx, wy, wz), Some(MaterialId(id)));
        prop_assert_eq!(buf.get_local(lx, ly, lz), MaterialId(id));
        prop_assert!(!buf.set_world(bx - 1, wy, wz, MaterialId(id)));
        prop_assert_eq!(buf.get_world(wx, by + s as i32, wz), None);
    }

    // from_blocks_local resizes or preserves to exact length
    #[test]
    fn from_blocks_local_resizes(cx in small_i32(), s in dim(), extra in 0usize..5) {
        let expect = s * s * s;
        let ok = ChunkBuf::from_blocks_local(ChunkCoord::new(cx, 0, 0), s, vec![MaterialId::AIR; expect]);
        prop_assert_eq!(ok.blocks.len(), expect);
        let long = ChunkBuf::from_blocks_local(ChunkCoord::new(cx, 0, 0), s, vec![MaterialId::AIR; expect + extra]);
        prop_assert_eq!(long.blocks.len(), expect);
    }
}
