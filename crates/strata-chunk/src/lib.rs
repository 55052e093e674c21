//! Chunk voxel buffer and the per-chunk generation kernel.
#![forbid(unsafe_code)]

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use strata_blocks::{MaterialId, MaterialRegistry};
use strata_world::{ChunkCoord, VoxelSource};

/// Dense `size³` material buffer for one chunk.
///
/// Deliberately not `Clone`: a buffer has exactly one owner, and ownership
/// moves between the chunk manager and a generation worker.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub size: usize,
    pub blocks: Vec<MaterialId>,
}

impl ChunkBuf {
    /// All-air buffer for `coord`.
    pub fn new(coord: ChunkCoord, size: usize) -> Self {
        Self {
            coord,
            size,
            blocks: vec![MaterialId::AIR; size * size * size],
        }
    }

    pub fn from_blocks_local(coord: ChunkCoord, size: usize, blocks: Vec<MaterialId>) -> Self {
        let mut b = blocks;
        let expect = size * size * size;
        if b.len() != expect {
            b.resize(expect, MaterialId::AIR);
        }
        ChunkBuf {
            coord,
            size,
            blocks: b,
        }
    }

    /// Re-targets a recycled buffer at `coord`, clearing it to air and
    /// keeping its allocation when the size matches.
    pub fn reset(&mut self, coord: ChunkCoord, size: usize) {
        self.coord = coord;
        self.size = size;
        self.blocks.clear();
        self.blocks.resize(size * size * size, MaterialId::AIR);
    }

    #[inline]
    pub fn volume(&self) -> usize {
        self.size * self.size * self.size
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.size + z) * self.size + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> MaterialId {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, id: MaterialId) {
        let i = self.idx(x, y, z);
        self.blocks[i] = id;
    }

    /// Local read with signed coordinates; `None` outside this chunk.
    #[inline]
    pub fn get_local_signed(&self, x: i32, y: i32, z: i32) -> Option<MaterialId> {
        let s = self.size as i32;
        if x < 0 || y < 0 || z < 0 || x >= s || y >= s || z >= s {
            return None;
        }
        Some(self.get_local(x as usize, y as usize, z as usize))
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        ChunkCoord::containing(wx, wy, wz, self.size) == self.coord
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<MaterialId> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let (lx, ly, lz) = ChunkCoord::local_of(wx, wy, wz, self.size);
        Some(self.get_local(lx, ly, lz))
    }

    /// Writes a world voxel; returns `false` if it lies outside this chunk.
    #[inline]
    pub fn set_world(&mut self, wx: i32, wy: i32, wz: i32, id: MaterialId) -> bool {
        if !self.contains_world(wx, wy, wz) {
            return false;
        }
        let (lx, ly, lz) = ChunkCoord::local_of(wx, wy, wz, self.size);
        self.set_local(lx, ly, lz, id);
        true
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_air())
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }

    pub fn occupancy(&self) -> ChunkOccupancy {
        if self.has_non_air() {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ChunkOccupancy::Empty)
    }

    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    BufferSize {
        expected: usize,
        actual: usize,
    },
    /// The source produced an id outside the material registry.
    InvalidMaterial {
        id: MaterialId,
        at: (i32, i32, i32),
    },
    /// The source panicked; carries the panic message when it was a string.
    Panicked(String),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::BufferSize { expected, actual } => {
                write!(f, "chunk buffer holds {actual} cells, expected {expected}")
            }
            GenError::InvalidMaterial { id, at } => {
                write!(f, "generator produced unknown material {} at {:?}", id.0, at)
            }
            GenError::Panicked(msg) => write!(f, "generator panicked: {msg}"),
        }
    }
}

impl Error for GenError {}

/// Runs `source` over every cell of `buf.coord`, writing into `buf`.
///
/// On error the buffer contents are unspecified and must not be published.
pub fn fill_chunk<S>(
    source: &S,
    reg: &MaterialRegistry,
    buf: &mut ChunkBuf,
) -> Result<ChunkOccupancy, GenError>
where
    S: VoxelSource + ?Sized,
{
    let size = buf.size;
    if buf.blocks.len() != buf.volume() {
        return Err(GenError::BufferSize {
            expected: buf.volume(),
            actual: buf.blocks.len(),
        });
    }
    let (base_x, base_y, base_z) = buf.coord.base(size);
    let mut has_blocks = false;
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let wx = base_x + x as i32;
                let wy = base_y + y as i32;
                let wz = base_z + z as i32;
                let id = source.material(wx, wy, wz);
                if !reg.contains(id) {
                    return Err(GenError::InvalidMaterial {
                        id,
                        at: (wx, wy, wz),
                    });
                }
                if !id.is_air() {
                    has_blocks = true;
                }
                buf.blocks[(y * size + z) * size + x] = id;
            }
        }
    }
    Ok(if has_blocks {
        ChunkOccupancy::Populated
    } else {
        ChunkOccupancy::Empty
    })
}
