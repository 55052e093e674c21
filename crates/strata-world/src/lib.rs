//! World coordinates, worldgen parameters and the procedural material field.
#![forbid(unsafe_code)]

pub mod worldgen;

mod chunk_coord;
pub mod generation;
mod world;

pub use chunk_coord::ChunkCoord;
pub use generation::Biome;
pub use world::{VoxelSource, World, WorldError};

/// Default chunk side length in voxels.
pub const CHUNK_SIZE: usize = 16;
