//! Material ids and the read-only material registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{MaterialRegistry, RegistryError};
pub use types::{AtlasCell, Material, MaterialId};
