use hashbrown::HashMap;
use strata_mesh_cpu::{FaceBatch, total_instances};
use strata_world::ChunkCoord;

/// Receiver of per-chunk face batches (a renderer or scene graph).
pub trait SceneSink {
    /// Registers `batches` for `coord`, replacing anything registered before.
    fn add(&mut self, coord: ChunkCoord, batches: &[FaceBatch]);
    fn remove(&mut self, coord: ChunkCoord);
}

/// Headless sink that only tracks how many instances each chunk contributes.
#[derive(Debug, Default)]
pub struct CountingSink {
    pub instances: HashMap<ChunkCoord, usize>,
    pub adds: usize,
    pub removes: usize,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.instances.contains_key(&coord)
    }

    pub fn chunk_count(&self) -> usize {
        self.instances.len()
    }

    pub fn total_instances(&self) -> usize {
        self.instances.values().sum()
    }
}

impl SceneSink for CountingSink {
    fn add(&mut self, coord: ChunkCoord, batches: &[FaceBatch]) {
        self.adds += 1;
        self.instances.insert(coord, total_instances(batches));
    }

    fn remove(&mut self, coord: ChunkCoord) {
        self.removes += 1;
        self.instances.remove(&coord);
    }
}
