//! Voxel world streaming: chunk residency around an observer, background
//! generation, face meshing and point edits.
#![forbid(unsafe_code)]

pub mod config;
pub mod manager;
pub mod player;
pub mod policy;
pub mod raycast;
pub mod scene;

pub use config::EngineConfig;
pub use manager::{ChunkManager, ChunkState, ChunkStats};
pub use player::{InputFrame, Interaction, Player};
pub use policy::{GameMode, PlacementPolicy};
pub use raycast::{RayHit, raycast};
pub use scene::{CountingSink, SceneSink};
