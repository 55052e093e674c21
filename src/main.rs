use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use log::LevelFilter;
use simplelog::{Config as LogConfig, WriteLogger};

use strata::{
    ChunkManager, CountingSink, EngineConfig, GameMode, InputFrame, PlacementPolicy, Player,
};
use strata_blocks::{MaterialId, MaterialRegistry};
use strata_world::worldgen::{WorldGenParams, load_params_from_path};
use strata_world::{VoxelSource, World};

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Headless voxel streaming driver")]
struct Args {
    /// Engine config TOML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<i32>,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    #[arg(long)]
    render_distance: Option<i32>,
    /// Generation threads (0 = cores - 1)
    #[arg(long)]
    workers: Option<usize>,
    /// Materials TOML; the built-in table is used when absent
    #[arg(long)]
    materials: Option<PathBuf>,
    /// Worldgen TOML; built-in defaults when absent
    #[arg(long)]
    worldgen: Option<PathBuf>,
    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Creative can do anything; survival cannot break bedrock-tier materials;
/// adventure cannot edit at all.
struct DemoPolicy {
    unbreakable: Vec<MaterialId>,
}

impl PlacementPolicy for DemoPolicy {
    fn can_place(&self, mode: GameMode, _id: MaterialId) -> bool {
        mode != GameMode::Adventure
    }

    fn can_break(&self, mode: GameMode, id: MaterialId) -> bool {
        match mode {
            GameMode::Creative => true,
            GameMode::Survival => !self.unbreakable.contains(&id),
            GameMode::Adventure => false,
        }
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => {
            WriteLogger::init(LevelFilter::Info, LogConfig::default(), File::create(path)?)?;
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
        }
    }
    Ok(())
}

// Walk in a slow circle, breaking and placing now and then.
fn scripted_input(tick: u32) -> InputFrame {
    InputFrame {
        forward: 1.0,
        strafe: 0.0,
        jump: tick % 90 == 45,
        yaw: tick as f32 * 0.5,
        pitch: -35.0,
        break_block: tick % 40 == 10,
        place_block: tick % 40 == 30,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let mut cfg = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.world.seed = seed;
    }
    if let Some(r) = args.render_distance {
        cfg.streaming.render_distance = r;
    }
    if let Some(n) = args.workers {
        cfg.workers.count = n;
    }
    if args.materials.is_some() {
        cfg.world.materials = args.materials.clone();
    }
    if args.worldgen.is_some() {
        cfg.world.worldgen = args.worldgen.clone();
    }
    cfg.validate()?;

    let reg = Arc::new(match &cfg.world.materials {
        Some(path) => MaterialRegistry::from_path(path)?,
        None => MaterialRegistry::builtin()?,
    });
    let params = match &cfg.world.worldgen {
        Some(path) => load_params_from_path(path)?,
        None => WorldGenParams::default(),
    };
    let world = World::new(cfg.world.seed, params, &reg)?;
    let policy = DemoPolicy {
        unbreakable: world.bedrock_set().to_vec(),
    };
    let source: Arc<dyn VoxelSource> = Arc::new(world);

    let workers = cfg.workers.resolved();
    log::info!(
        "seed {} chunk {} radius {}x{} workers {}",
        cfg.world.seed,
        cfg.streaming.chunk_size,
        cfg.streaming.render_distance,
        cfg.streaming.vertical(),
        workers
    );
    let mut mgr = ChunkManager::new(
        cfg.streaming.clone(),
        workers,
        source,
        reg.clone(),
        CountingSink::new(),
    )?;
    let mut player = Player::new(&cfg.player);
    player.selected = reg.id_by_name("planks").unwrap_or(MaterialId(1));

    let dt = 1.0 / 60.0;
    let t0 = Instant::now();
    let (mut broken, mut placed) = (0usize, 0usize);
    for tick in 0..args.ticks {
        mgr.tick(player.pos);
        // Hold the player still until the ground under them has streamed in.
        let (fx, fy, fz) = player.pos.floor_cell();
        if mgr.is_resident_at(fx, fy - 1, fz) {
            let input = scripted_input(tick);
            let act = player.apply(&input, dt, &mut mgr, &policy);
            broken += usize::from(act.broken.is_some());
            placed += usize::from(act.placed.is_some());
        }
        if !mgr.is_settled() {
            mgr.pump(Duration::from_millis(2));
        }
        if tick % 120 == 0 {
            let s = mgr.stats();
            log::info!(
                "tick {tick}: loaded {} pending {} dirty {} instances {}",
                s.loaded,
                s.requested + s.generating,
                s.dirty,
                s.instances
            );
        }
    }

    let s = mgr.stats();
    log::info!(
        "done in {:.2}s: {} chunks loaded, {} abandoned, {} face instances, {} broken, {} placed",
        t0.elapsed().as_secs_f32(),
        s.loaded + s.dirty,
        s.abandoned,
        mgr.sink().total_instances(),
        broken,
        placed
    );
    Ok(())
}
