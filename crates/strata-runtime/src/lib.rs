//! Generation worker pool: chunk jobs in, filled buffers out.
#![forbid(unsafe_code)]

mod buf_pool;

pub use buf_pool::BufPool;
pub use rayon::ThreadPoolBuildError;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};
use strata_blocks::MaterialRegistry;
use strata_chunk::{ChunkBuf, ChunkOccupancy, GenError, fill_chunk};
use strata_world::{ChunkCoord, VoxelSource};

/// One chunk to generate. The job owns its buffer until the result comes back.
#[derive(Debug)]
pub struct GenJob {
    pub coord: ChunkCoord,
    pub buf: ChunkBuf,
    pub attempt: u32,
    pub job_id: u64,
}

#[derive(Debug)]
pub enum GenOut {
    Done {
        job_id: u64,
        coord: ChunkCoord,
        attempt: u32,
        buf: ChunkBuf,
        occupancy: ChunkOccupancy,
        t_gen_ms: u32,
    },
    /// The buffer of a failed job has already gone back to the buffer pool.
    Failed {
        job_id: u64,
        coord: ChunkCoord,
        attempt: u32,
        error: GenError,
    },
}

impl GenOut {
    pub fn coord(&self) -> ChunkCoord {
        match self {
            GenOut::Done { coord, .. } | GenOut::Failed { coord, .. } => *coord,
        }
    }

    pub fn job_id(&self) -> u64 {
        match self {
            GenOut::Done { job_id, .. } | GenOut::Failed { job_id, .. } => *job_id,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn process_gen_job(
    job: GenJob,
    source: &dyn VoxelSource,
    reg: &MaterialRegistry,
    bufs: &BufPool,
    tx: &Sender<GenOut>,
) {
    let GenJob {
        coord,
        mut buf,
        attempt,
        job_id,
    } = job;
    let t0 = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| fill_chunk(source, reg, &mut buf)));
    let error = match result {
        Ok(Ok(occupancy)) => {
            let t_gen_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
            log::trace!(target: "gen", "job {job_id} {coord:?} done in {t_gen_ms}ms ({occupancy:?})");
            let _ = tx.send(GenOut::Done {
                job_id,
                coord,
                attempt,
                buf,
                occupancy,
                t_gen_ms,
            });
            return;
        }
        Ok(Err(e)) => e,
        Err(payload) => GenError::Panicked(panic_message(payload.as_ref())),
    };
    log::warn!(target: "gen", "job {job_id} {coord:?} attempt {attempt} failed: {error}");
    bufs.release(buf);
    let _ = tx.send(GenOut::Failed {
        job_id,
        coord,
        attempt,
        error,
    });
}

/// Fixed set of generation workers fed from one unbounded job queue.
pub struct GenerationPool {
    job_tx: Sender<GenJob>,
    res_rx: Receiver<GenOut>,
    _pool: Arc<ThreadPool>,
    bufs: Arc<BufPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    next_job_id: AtomicU64,
    chunk_size: usize,
    pub workers: usize,
}

impl GenerationPool {
    /// Spawns `workers` generation threads (at least one) over `source`.
    pub fn new(
        source: Arc<dyn VoxelSource>,
        reg: Arc<MaterialRegistry>,
        workers: usize,
        chunk_size: usize,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<GenJob>();
        let (res_tx, res_rx) = unbounded::<GenOut>();
        let bufs = Arc::new(BufPool::with_capacity_from_workers(workers));
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("strata-gen-{i}"))
                .build()?,
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let source = source.clone();
            let reg = reg.clone();
            let bufs = bufs.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_gen_job(job, source.as_ref(), reg.as_ref(), bufs.as_ref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }
        log::info!(target: "gen", "generation pool started with {workers} workers");

        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            bufs,
            queued,
            inflight,
            next_job_id: AtomicU64::new(1),
            chunk_size,
            workers,
        })
    }

    /// Queues generation of `coord` into a pooled buffer. Returns the job id.
    pub fn submit(&self, coord: ChunkCoord, attempt: u32) -> u64 {
        let job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        let buf = self.bufs.acquire(coord, self.chunk_size);
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self
            .job_tx
            .send(GenJob {
                coord,
                buf,
                attempt,
                job_id,
            })
            .is_err()
        {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
        job_id
    }

    pub fn drain_results(&self) -> Vec<GenOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks up to `timeout` for the first result, then drains the rest.
    pub fn wait_results(&self, timeout: Duration) -> Vec<GenOut> {
        match self.res_rx.recv_timeout(timeout) {
            Ok(first) => {
                let mut out = vec![first];
                out.extend(self.res_rx.try_iter());
                out
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => Vec::new(),
        }
    }

    /// Returns a buffer that will never be published.
    pub fn recycle(&self, buf: ChunkBuf) {
        self.bufs.release(buf);
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    pub fn spare_buffers(&self) -> usize {
        self.bufs.spare()
    }
}
