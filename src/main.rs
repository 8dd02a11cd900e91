//! Headless driver: streams road chunks around a viewpoint travelling along the corridor.
#![forbid(unsafe_code)]

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ralli_road::{DesignedPiecePool, RoadGenConfig, RoadGenParams, load_config_from_path};
use ralli_runtime::RoadStream;
use simplelog::{ColorChoice, CombinedLogger, LevelFilter, TermLogger, TerminalMode, WriteLogger};

#[derive(Parser, Debug)]
#[command(name = "ralli", about = "Procedural road corridor streamer")]
struct Args {
    /// Road generation config (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Designed piece pool (TOML); overrides `designed.pool_path`
    #[arg(long)]
    pool: Option<PathBuf>,
    #[arg(long)]
    seed: Option<i32>,
    /// Distance to drive in meters
    #[arg(long, default_value_t = 2000.0)]
    distance: f64,
    /// Viewpoint advance per tick in meters
    #[arg(long, default_value_t = 25.0)]
    step: f64,
    #[arg(long)]
    max_chunks_per_tick: Option<usize>,
    /// Log smoothness diagnostics after the initial rebuild
    #[arg(long)]
    diagnostics: bool,
    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => {
            CombinedLogger::init(vec![
                TermLogger::new(
                    LevelFilter::Info,
                    simplelog::Config::default(),
                    TerminalMode::Mixed,
                    ColorChoice::Auto,
                ),
                WriteLogger::new(
                    LevelFilter::Debug,
                    simplelog::Config::default(),
                    File::create(path)?,
                ),
            ])?;
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
        }
    }
    Ok(())
}

fn resolve_pool_path(args: &Args, cfg: &RoadGenConfig) -> Option<PathBuf> {
    if let Some(p) = &args.pool {
        return Some(p.clone());
    }
    let rel = PathBuf::from(cfg.designed.pool_path.as_ref()?);
    if rel.is_absolute() {
        return Some(rel);
    }
    let base = args
        .config
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Some(base.join(rel))
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => load_config_from_path(path)
            .map_err(|e| format!("failed to load config {}: {e}", path.display()))?,
        None => RoadGenConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(cap) = args.max_chunks_per_tick {
        cfg.chunking.max_chunks_per_tick = cap;
    }
    if args.diagnostics {
        cfg.debug.log_smoothness_diagnostics = true;
    }

    let pool = match resolve_pool_path(args, &cfg) {
        Some(path) => {
            let pool = DesignedPiecePool::from_path(&path)
                .map_err(|e| format!("failed to load designed pool {}: {e}", path.display()))?;
            log::info!("loaded {} designed pieces from {}", pool.entries.len(), path.display());
            Some(Arc::new(pool))
        }
        None => None,
    };

    let params = RoadGenParams::from_config(&cfg);
    let mut stream = RoadStream::new(params, pool);
    stream.rebuild_from_scratch();

    let step = args.step.max(0.1);
    let mut s = 0.0;
    let mut ticks = 0usize;
    let (mut created, mut destroyed) = (0usize, 0usize);
    while s <= args.distance {
        let t = stream.update(s);
        created += t.created;
        destroyed += t.destroyed;
        if t.created > 0 || t.destroyed > 0 {
            log::info!(
                target: "drive",
                "[tick {}] s={:.1} chunk={} +{} -{} pending={}",
                ticks,
                s,
                t.viewpoint_chunk,
                t.created,
                t.destroyed,
                t.pending
            );
        }
        ticks += 1;
        s += step;
    }

    if let Some(f) = stream.road_frame_at(args.distance) {
        log::info!(
            "frame at s={:.1}: pos=({:.2}, {:.2}, {:.2}) heading={:.1}deg turn_rate={:.3}deg/m",
            args.distance,
            f.position.x,
            f.position.y,
            f.position.z,
            f.forward.yaw_deg(),
            f.turn_rate
        );
    }
    let designed = stream.synth().samples().iter().filter(|x| x.designed).count();
    log::info!(
        "drove {:.0} m in {} ticks: created={} destroyed={} resident={:?} samples={} designed_samples={} trees={}",
        args.distance,
        ticks,
        created,
        destroyed,
        stream.active_chunk_range(),
        stream.synth().samples().len(),
        designed,
        stream.tree_count()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
