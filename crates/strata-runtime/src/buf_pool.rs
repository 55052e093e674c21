use crossbeam_channel::{Receiver, Sender, bounded};
use strata_chunk::ChunkBuf;
use strata_world::ChunkCoord;

/// Lock-free free-list of chunk buffers shared by the manager and workers.
///
/// Buffers beyond `capacity` are dropped on release.
pub struct BufPool {
    spare_tx: Sender<ChunkBuf>,
    spare_rx: Receiver<ChunkBuf>,
    capacity: usize,
}

impl BufPool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = bounded(capacity);
        Self {
            spare_tx: tx,
            spare_rx: rx,
            capacity,
        }
    }

    pub fn with_capacity_from_workers(worker_count: usize) -> Self {
        Self::new(worker_count.max(1) * 8)
    }

    /// All-air buffer for `coord`, reusing a spare allocation when one exists.
    pub fn acquire(&self, coord: ChunkCoord, size: usize) -> ChunkBuf {
        match self.spare_rx.try_recv() {
            Ok(mut buf) => {
                buf.reset(coord, size);
                buf
            }
            Err(_) => ChunkBuf::new(coord, size),
        }
    }

    pub fn release(&self, buf: ChunkBuf) {
        let _ = self.spare_tx.try_send(buf);
    }

    pub fn spare(&self) -> usize {
        self.spare_rx.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::MaterialId;

    #[test]
    fn released_buffers_come_back_cleared() {
        let pool = BufPool::new(2);
        let mut buf = pool.acquire(ChunkCoord::new(0, 0, 0), 4);
        buf.set_local(1, 2, 3, MaterialId(5));
        pool.release(buf);
        assert_eq!(pool.spare(), 1);
        let again = pool.acquire(ChunkCoord::new(9, 9, 9), 4);
        assert_eq!(again.coord, ChunkCoord::new(9, 9, 9));
        assert!(again.is_all_air());
        assert_eq!(pool.spare(), 0);
    }

    #[test]
    fn release_beyond_capacity_drops() {
        let pool = BufPool::new(1);
        pool.release(ChunkBuf::new(ChunkCoord::new(0, 0, 0), 2));
        pool.release(ChunkBuf::new(ChunkCoord::new(1, 0, 0), 2));
        assert_eq!(pool.spare(), 1);
    }
}
