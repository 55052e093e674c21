//! CPU meshing crate: per-voxel face culling into instanced face batches.
#![forbid(unsafe_code)]

mod face;

pub use face::Face;

use strata_blocks::{AtlasCell, MaterialId, MaterialRegistry};
use strata_chunk::ChunkBuf;
use strata_geom::Vec3;

/// Read-only access to voxels outside the chunk being meshed.
pub trait WorldView {
    fn material_at(&self, wx: i32, wy: i32, wz: i32) -> MaterialId;
}

impl<F> WorldView for F
where
    F: Fn(i32, i32, i32) -> MaterialId,
{
    #[inline]
    fn material_at(&self, wx: i32, wy: i32, wz: i32) -> MaterialId {
        self(wx, wy, wz)
    }
}

/// A view in which nothing exists beyond the chunk itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyView;

impl WorldView for EmptyView {
    #[inline]
    fn material_at(&self, _wx: i32, _wy: i32, _wz: i32) -> MaterialId {
        MaterialId::AIR
    }
}

/// One unit quad, ready for instanced rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceInstance {
    /// Face centre in world space.
    pub translation: [f32; 3],
    /// Quaternion `(x, y, z, w)` taking the +Z quad normal onto the face normal.
    pub rotation: [f32; 4],
    pub material: MaterialId,
    pub atlas: AtlasCell,
}

/// All visible faces of a chunk that share one direction.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceBatch {
    pub face: Face,
    pub instances: Vec<FaceInstance>,
}

impl FaceBatch {
    #[inline]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

pub fn total_instances(batches: &[FaceBatch]) -> usize {
    batches.iter().map(FaceBatch::instance_count).sum()
}

#[inline]
fn neighbor_is_air<V: WorldView + ?Sized>(
    buf: &ChunkBuf,
    view: &V,
    base: (i32, i32, i32),
    x: usize,
    y: usize,
    z: usize,
    face: Face,
) -> bool {
    let (dx, dy, dz) = face.delta();
    let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
    match buf.get_local_signed(nx, ny, nz) {
        Some(id) => id.is_air(),
        None => view.material_at(base.0 + nx, base.1 + ny, base.2 + nz).is_air(),
    }
}

/// Builds the visible-face batches of `buf`, at most one per direction.
///
/// Faces are visible when the voxel is solid and its neighbour is air;
/// neighbours outside the chunk are read through `view`. The output order is
/// fixed (y, z, x within each direction), so equal inputs give equal batches.
pub fn build_chunk_faces<V: WorldView + ?Sized>(
    buf: &ChunkBuf,
    view: &V,
    reg: &MaterialRegistry,
) -> Vec<FaceBatch> {
    if buf.is_all_air() {
        return Vec::new();
    }
    let s = buf.size;
    let base = buf.coord.base(s);

    // Pass 1: count.
    let mut counts = [0usize; 6];
    for y in 0..s {
        for z in 0..s {
            for x in 0..s {
                if buf.get_local(x, y, z).is_air() {
                    continue;
                }
                for face in Face::ALL {
                    if neighbor_is_air(buf, view, base, x, y, z, face) {
                        counts[face.index()] += 1;
                    }
                }
            }
        }
    }

    let mut slot = [usize::MAX; 6];
    let mut batches: Vec<FaceBatch> = Vec::with_capacity(counts.iter().filter(|&&c| c > 0).count());
    for face in Face::ALL {
        let n = counts[face.index()];
        if n > 0 {
            slot[face.index()] = batches.len();
            batches.push(FaceBatch {
                face,
                instances: Vec::with_capacity(n),
            });
        }
    }
    if batches.is_empty() {
        return batches;
    }

    // Pass 2: fill.
    for y in 0..s {
        for z in 0..s {
            for x in 0..s {
                let id = buf.get_local(x, y, z);
                if id.is_air() {
                    continue;
                }
                let atlas = reg.atlas_cell(id);
                let center =
                    Vec3::cell_center(base.0 + x as i32, base.1 + y as i32, base.2 + z as i32);
                for face in Face::ALL {
                    if !neighbor_is_air(buf, view, base, x, y, z, face) {
                        continue;
                    }
                    let t = center + face.normal() * 0.5;
                    batches[slot[face.index()]].instances.push(FaceInstance {
                        translation: [t.x, t.y, t.z],
                        rotation: face.rotation().to_array(),
                        material: id,
                        atlas,
                    });
                }
            }
        }
    }

    for b in &batches {
        debug_assert_eq!(b.instances.len(), counts[b.face.index()]);
    }
    log::trace!(
        target: "mesh",
        "chunk {:?}: {} faces in {} batches",
        buf.coord,
        counts.iter().sum::<usize>(),
        batches.len()
    );
    batches
}
