//! Chunk table, streaming and remesh scheduling.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use hashbrown::{HashMap, HashSet};
use strata_blocks::{MaterialId, MaterialRegistry};
use strata_chunk::{ChunkBuf, GenError};
use strata_geom::{Aabb, Vec3};
use strata_mesh_cpu::{Face, FaceBatch, WorldView, build_chunk_faces, total_instances};
use strata_runtime::{GenOut, GenerationPool, ThreadPoolBuildError};
use strata_world::{ChunkCoord, VoxelSource};

use crate::config::StreamingConfig;
use crate::scene::SceneSink;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkState {
    Requested,
    Generating,
    Loaded,
    Dirty,
    Rebuilding,
}

impl ChunkState {
    /// Waiting for (or undergoing) generation.
    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(self, ChunkState::Requested | ChunkState::Generating)
    }

    /// Voxel data is resident.
    #[inline]
    pub fn is_resident(self) -> bool {
        !self.is_pending()
    }
}

struct ChunkEntry {
    state: ChunkState,
    attempt: u32,
    job_id: Option<u64>,
    buf: Option<ChunkBuf>,
    batches: Vec<FaceBatch>,
}

impl ChunkEntry {
    fn requested(attempt: u32) -> Self {
        Self {
            state: ChunkState::Requested,
            attempt,
            job_id: None,
            buf: None,
            batches: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkStats {
    pub requested: usize,
    pub generating: usize,
    pub loaded: usize,
    pub dirty: usize,
    pub queued_rebuilds: usize,
    pub inflight: usize,
    pub abandoned: usize,
    pub instances: usize,
}

/// Cube of chunk coordinates around `center`: Chebyshev radius `h`
/// horizontally and `v` vertically.
pub fn needed_set(center: ChunkCoord, h: i32, v: i32) -> HashSet<ChunkCoord> {
    let mut out = HashSet::with_capacity(((2 * h + 1) * (2 * h + 1) * (2 * v + 1)) as usize);
    for dy in -v..=v {
        for dz in -h..=h {
            for dx in -h..=h {
                out.insert(center.offset(dx, dy, dz));
            }
        }
    }
    out
}

pub struct ChunkManager<S: SceneSink> {
    cfg: StreamingConfig,
    reg: Arc<MaterialRegistry>,
    pool: GenerationPool,
    sink: S,
    chunks: HashMap<ChunkCoord, ChunkEntry>,
    needed: HashSet<ChunkCoord>,
    center: Option<ChunkCoord>,
    abandoned: HashSet<ChunkCoord>,
    dirty: VecDeque<ChunkCoord>,
    inflight: usize,
}

impl<S: SceneSink> ChunkManager<S> {
    pub fn new(
        cfg: StreamingConfig,
        workers: usize,
        source: Arc<dyn VoxelSource>,
        reg: Arc<MaterialRegistry>,
        sink: S,
    ) -> Result<Self, ThreadPoolBuildError> {
        let pool = GenerationPool::new(source, reg.clone(), workers, cfg.chunk_size)?;
        Ok(Self {
            cfg,
            reg,
            pool,
            sink,
            chunks: HashMap::new(),
            needed: HashSet::new(),
            center: None,
            abandoned: HashSet::new(),
            dirty: VecDeque::new(),
            inflight: 0,
        })
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.cfg.chunk_size
    }

    pub fn registry(&self) -> &MaterialRegistry {
        &self.reg
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn is_needed(&self, coord: ChunkCoord) -> bool {
        self.needed.contains(&coord)
    }

    pub fn needed(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.needed.iter().copied()
    }

    pub fn chunk_state(&self, coord: ChunkCoord) -> Option<ChunkState> {
        self.chunks.get(&coord).map(|e| e.state)
    }

    /// Resident voxel data for `coord`, for snapshots and external savers.
    pub fn chunk_buf(&self, coord: ChunkCoord) -> Option<&ChunkBuf> {
        self.chunks.get(&coord).and_then(|e| e.buf.as_ref())
    }

    pub fn batches(&self, coord: ChunkCoord) -> Option<&[FaceBatch]> {
        self.chunks
            .get(&coord)
            .filter(|e| e.state.is_resident())
            .map(|e| e.batches.as_slice())
    }

    /// World-space bounds of a chunk, for culling by the scene.
    pub fn chunk_bounds(&self, coord: ChunkCoord) -> Aabb {
        Aabb::of_chunk(coord.cx, coord.cy, coord.cz, self.cfg.chunk_size)
    }

    pub fn is_abandoned(&self, coord: ChunkCoord) -> bool {
        self.abandoned.contains(&coord)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// No generation outstanding and no rebuild queued.
    pub fn is_settled(&self) -> bool {
        self.dirty.is_empty() && self.chunks.values().all(|e| e.state.is_resident())
    }

    pub fn stats(&self) -> ChunkStats {
        let mut s = ChunkStats {
            queued_rebuilds: self.dirty.len(),
            inflight: self.inflight,
            abandoned: self.abandoned.len(),
            ..ChunkStats::default()
        };
        for e in self.chunks.values() {
            match e.state {
                ChunkState::Requested => s.requested += 1,
                ChunkState::Generating => s.generating += 1,
                ChunkState::Loaded | ChunkState::Rebuilding => s.loaded += 1,
                ChunkState::Dirty => s.dirty += 1,
            }
            s.instances += total_instances(&e.batches);
        }
        s
    }

    /// One streaming step for an observer at `observer`.
    pub fn tick(&mut self, observer: Vec3) {
        let (wx, wy, wz) = observer.floor_cell();
        let center = ChunkCoord::containing(wx, wy, wz, self.cfg.chunk_size);
        if self.center != Some(center) {
            self.center = Some(center);
            self.needed = needed_set(
                center,
                self.cfg.render_distance,
                self.cfg.vertical(),
            );
            log::debug!(target: "stream", "center {center:?}, {} chunks needed", self.needed.len());
        }
        self.evict_unneeded();
        self.request_missing();
        self.dispatch_requested(center);
        for out in self.pool.drain_results() {
            self.handle_result(out);
        }
        self.rebuild_dirty(self.cfg.rebuilds_per_tick);
    }

    /// Blocks up to `timeout` for generation results and applies them.
    /// Returns how many results arrived.
    pub fn pump(&mut self, timeout: Duration) -> usize {
        let results = self.pool.wait_results(timeout);
        let n = results.len();
        for out in results {
            self.handle_result(out);
        }
        n
    }

    fn evict_unneeded(&mut self) {
        let gone: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|c| !self.needed.contains(*c))
            .copied()
            .collect();
        for coord in gone {
            let Some(entry) = self.chunks.remove(&coord) else {
                continue;
            };
            if entry.state.is_resident() {
                self.sink.remove(coord);
            }
            if let Some(buf) = entry.buf {
                self.pool.recycle(buf);
            }
            log::trace!(target: "stream", "evicted {coord:?} ({:?})", entry.state);
        }
        let needed = &self.needed;
        self.dirty.retain(|c| needed.contains(c));
        self.abandoned.retain(|c| needed.contains(c));
    }

    fn request_missing(&mut self) {
        for &coord in &self.needed {
            if self.abandoned.contains(&coord) {
                continue;
            }
            self.chunks
                .entry(coord)
                .or_insert_with(|| ChunkEntry::requested(0));
        }
    }

    fn dispatch_requested(&mut self, center: ChunkCoord) {
        let budget = match self.cfg.max_inflight {
            Some(cap) => cap.saturating_sub(self.inflight),
            None => usize::MAX,
        };
        if budget == 0 {
            return;
        }
        let mut todo: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(_, e)| e.state == ChunkState::Requested)
            .map(|(c, _)| *c)
            .collect();
        todo.sort_by_key(|c| (c.distance_sq(center), *c));
        for coord in todo.into_iter().take(budget) {
            let Some(entry) = self.chunks.get_mut(&coord) else {
                continue;
            };
            let job_id = self.pool.submit(coord, entry.attempt);
            entry.state = ChunkState::Generating;
            entry.job_id = Some(job_id);
            self.inflight += 1;
        }
    }

    fn handle_result(&mut self, out: GenOut) {
        self.inflight = self.inflight.saturating_sub(1);
        match out {
            GenOut::Done { coord, buf, .. } => self.on_generation_complete(coord, buf),
            GenOut::Failed {
                coord,
                job_id,
                error,
                ..
            } => {
                let current = self
                    .chunks
                    .get(&coord)
                    .is_some_and(|e| e.state.is_pending() && e.job_id == Some(job_id));
                if current {
                    self.on_generation_failed(coord, &error);
                } else {
                    log::debug!(target: "stream", "ignoring stale failure for {coord:?}: {error}");
                }
            }
        }
    }

    /// Installs a generated buffer if `coord` is still waiting for one;
    /// otherwise the buffer is discarded. Loaded face-neighbours are queued
    /// for rebuild so their border faces see the new voxels.
    pub fn on_generation_complete(&mut self, coord: ChunkCoord, buf: ChunkBuf) {
        let pending = self
            .chunks
            .get(&coord)
            .is_some_and(|e| e.state.is_pending());
        if !pending || buf.coord != coord || buf.size != self.cfg.chunk_size {
            log::debug!(target: "stream", "discarding stale result for {coord:?}");
            self.pool.recycle(buf);
            return;
        }
        let batches = build_chunk_faces(&buf, &*self, &self.reg);
        self.sink.add(coord, &batches);
        if let Some(entry) = self.chunks.get_mut(&coord) {
            log::trace!(
                target: "stream",
                "loaded {coord:?}: {} faces",
                total_instances(&batches)
            );
            entry.state = ChunkState::Loaded;
            entry.job_id = None;
            entry.buf = Some(buf);
            entry.batches = batches;
        }
        for face in Face::ALL {
            let (dx, dy, dz) = face.delta();
            self.mark_dirty(coord.offset(dx, dy, dz));
        }
    }

    /// Retries a failed chunk up to `gen_retries` times, then leaves it
    /// absent until it drops out of the needed-set.
    pub fn on_generation_failed(&mut self, coord: ChunkCoord, error: &GenError) {
        let Some(entry) = self.chunks.get_mut(&coord) else {
            return;
        };
        if !entry.state.is_pending() {
            return;
        }
        if entry.attempt < self.cfg.gen_retries {
            entry.attempt += 1;
            entry.state = ChunkState::Requested;
            entry.job_id = None;
            log::info!(
                target: "stream",
                "retrying {coord:?} (attempt {}) after: {error}",
                entry.attempt
            );
        } else {
            self.chunks.remove(&coord);
            self.abandoned.insert(coord);
            log::warn!(target: "stream", "giving up on {coord:?}: {error}");
        }
    }

    /// Whether the chunk owning a world voxel has resident voxel data.
    pub fn is_resident_at(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let coord = ChunkCoord::containing(wx, wy, wz, self.cfg.chunk_size);
        self.chunks
            .get(&coord)
            .is_some_and(|e| e.state.is_resident())
    }

    /// Material at a world voxel; air when the owning chunk is not resident.
    pub fn get_atom(&self, wx: i32, wy: i32, wz: i32) -> MaterialId {
        let coord = ChunkCoord::containing(wx, wy, wz, self.cfg.chunk_size);
        self.chunks
            .get(&coord)
            .and_then(|e| e.buf.as_ref())
            .and_then(|b| b.get_world(wx, wy, wz))
            .unwrap_or(MaterialId::AIR)
    }

    /// Writes a world voxel and schedules the affected chunks for rebuild.
    /// Returns `false` (and changes nothing) when the chunk is not resident
    /// or `id` is not a registered material.
    pub fn set_atom(&mut self, wx: i32, wy: i32, wz: i32, id: MaterialId) -> bool {
        if !self.reg.contains(id) {
            log::warn!(target: "edit", "rejecting unknown material {} at ({wx},{wy},{wz})", id.0);
            return false;
        }
        let cs = self.cfg.chunk_size;
        let coord = ChunkCoord::containing(wx, wy, wz, cs);
        let Some(buf) = self.chunks.get_mut(&coord).and_then(|e| e.buf.as_mut()) else {
            return false;
        };
        if !buf.set_world(wx, wy, wz, id) {
            return false;
        }
        log::debug!(target: "edit", "set ({wx},{wy},{wz}) = {}", id.0);
        self.mark_dirty(coord);

        // Faces of the neighbour across a border depend on this cell too.
        let (lx, ly, lz) = ChunkCoord::local_of(wx, wy, wz, cs);
        let last = cs - 1;
        let axes = [(lx, (1, 0, 0)), (ly, (0, 1, 0)), (lz, (0, 0, 1))];
        for (l, (dx, dy, dz)) in axes {
            if l == 0 {
                self.mark_dirty(coord.offset(-dx, -dy, -dz));
            }
            if l == last {
                self.mark_dirty(coord.offset(dx, dy, dz));
            }
        }
        true
    }

    fn mark_dirty(&mut self, coord: ChunkCoord) {
        if let Some(entry) = self.chunks.get_mut(&coord) {
            if entry.state == ChunkState::Loaded {
                entry.state = ChunkState::Dirty;
                self.dirty.push_back(coord);
            }
        }
    }

    /// Rebuilds up to `limit` queued dirty chunks, oldest first.
    pub fn rebuild_dirty(&mut self, limit: usize) -> usize {
        let mut rebuilt = 0;
        while rebuilt < limit {
            let Some(coord) = self.dirty.pop_front() else {
                break;
            };
            match self.chunks.get_mut(&coord) {
                Some(e) if e.state == ChunkState::Dirty => e.state = ChunkState::Rebuilding,
                _ => continue,
            }
            let Some(buf) = self.chunks.get(&coord).and_then(|e| e.buf.as_ref()) else {
                continue;
            };
            let batches = build_chunk_faces(buf, &*self, &self.reg);
            self.sink.add(coord, &batches);
            if let Some(entry) = self.chunks.get_mut(&coord) {
                entry.batches = batches;
                entry.state = ChunkState::Loaded;
            }
            log::trace!(target: "stream", "rebuilt {coord:?}");
            rebuilt += 1;
        }
        rebuilt
    }
}

impl<S: SceneSink> WorldView for ChunkManager<S> {
    #[inline]
    fn material_at(&self, wx: i32, wy: i32, wz: i32) -> MaterialId {
        self.get_atom(wx, wy, wz)
    }
}
