//! # Sprite Bench
//!
//! Headless batching benchmark: a simulation thread moves sprites and fills
//! staging buffers while the render thread merges last frame's buffers and
//! draws them into a recording backend.
//!
//! ## Usage
//!
//! ```bash
//! # 1000 float sprites for 600 frames
//! RUST_LOG=info ./sprite_bench --sprites 1000 --frames 600
//!
//! # Fixed-point pipeline with custom config and atlas
//! ./sprite_bench --fixed --config data/batch.toml --atlas data/atlas.toml
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{bounded, Receiver, Sender};
use quadbatch::{
    BatchConfig, BatchResult, BatchStats, DoubleBuffer, Fixed16, QuadBatcher, QuadStagingBuffer,
    RecordingBackend, Scalar, Sprite, TextureAtlas,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Simulated view size.
const VIEW_WIDTH: f32 = 320.0;
const VIEW_HEIGHT: f32 = 480.0;

const SPRITE_SIZE: f32 = 64.0;

const USAGE: &str = "usage: sprite_bench [--sprites N] [--frames N] [--seed N] [--fixed] \
                     [--config PATH] [--atlas PATH]";

#[derive(Debug)]
struct Options {
    sprites: usize,
    frames: usize,
    seed: u64,
    fixed: bool,
    config: Option<PathBuf>,
    atlas: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sprites: 100,
            frames: 300,
            seed: 0x5EED,
            fixed: false,
            config: None,
            atlas: None,
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| format!("{name} needs a value"));
        match arg.as_str() {
            "--sprites" => options.sprites = parse_number(&value("--sprites")?)?,
            "--frames" => options.frames = parse_number(&value("--frames")?)?,
            "--seed" => options.seed = parse_number(&value("--seed")?)?,
            "--fixed" => options.fixed = true,
            "--config" => options.config = Some(PathBuf::from(value("--config")?)),
            "--atlas" => options.atlas = Some(PathBuf::from(value("--atlas")?)),
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn parse_number<T: std::str::FromStr>(text: &str) -> Result<T, String> {
    text.parse().map_err(|_| format!("not a number: {text}"))
}

/// Bounces a sprite off the view edges.
fn step(sprite: &mut Sprite) {
    let (vx, vy) = (sprite.velocity_x.float(), sprite.velocity_y.float());
    sprite.x.offset(vx);
    sprite.y.offset(vy);

    let x = sprite.x.float();
    if (x < 0.0 && vx < 0.0) || (x + sprite.width.float() > VIEW_WIDTH && vx > 0.0) {
        sprite.velocity_x.set(-vx);
    }
    let y = sprite.y.float();
    if (y < 0.0 && vy < 0.0) || (y + sprite.height.float() > VIEW_HEIGHT && vy > 0.0) {
        sprite.velocity_y.set(-vy);
    }
}

fn build_scene(atlas: &TextureAtlas, options: &Options) -> BatchResult<Vec<Sprite>> {
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let frames = [
        *atlas.region("skate1")?,
        *atlas.region("skate2")?,
        *atlas.region("skate3")?,
    ];

    Ok((0..options.sprites)
        .map(|i| {
            Sprite::new(
                rng.gen_range(0.0..VIEW_WIDTH - SPRITE_SIZE),
                rng.gen_range(0.0..VIEW_HEIGHT - SPRITE_SIZE),
                SPRITE_SIZE,
                SPRITE_SIZE,
                frames[i % frames.len()],
            )
            .with_velocity(rng.gen_range(-4.0..4.0), rng.gen_range(-4.0..4.0))
        })
        .collect())
}

fn run_frames<S: Scalar>(
    config: &BatchConfig,
    atlas: &TextureAtlas,
    options: &Options,
) -> BatchResult<BatchStats> {
    let mut batcher = QuadBatcher::<S>::new(config)?;
    let background_group = batcher.plan().index_of("background").ok();
    let sprite_group = batcher
        .plan()
        .index_of("sprites")
        .unwrap_or(batcher.plan().len() - 1);

    let background = match background_group {
        Some(_) => Some(Sprite::new(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT, *atlas.region("background")?)),
        None => None,
    };
    let mut sprites = build_scene(atlas, options)?;
    let frames = DoubleBuffer::from_fn(|| config.staging_buffers::<S>());
    let frame_total = options.frames;
    let mut backend = RecordingBackend::new();

    tracing::info!(
        scalar = S::NAME,
        sprites = sprites.len(),
        frames = frame_total,
        groups = batcher.plan().len(),
        "sprite bench starting"
    );

    std::thread::scope(|scope| -> BatchResult<()> {
        // go: render thread → simulation ("slot is yours")
        // ready: simulation → render thread ("slot is filled")
        let (go_tx, go_rx) = bounded::<()>(1);
        let (ready_tx, ready_rx) = bounded::<()>(1);
        let producer_frames = Arc::clone(&frames);

        scope.spawn(move || {
            for _ in 0..frame_total {
                if go_rx.recv().is_err() {
                    break;
                }
                {
                    let mut slot = producer_frames.producer_handle();
                    if let (Some(group), Some(background)) = (background_group, &background) {
                        background.emit(&mut slot[group]);
                    }
                    for sprite in &mut sprites {
                        step(sprite);
                        sprite.emit(&mut slot[sprite_group]);
                    }
                }
                if ready_tx.send(()).is_err() {
                    break;
                }
            }
        });

        let drawn = render_frames(
            &mut batcher,
            &frames,
            &mut backend,
            &go_tx,
            &ready_rx,
            frame_total,
        )?;
        if drawn < frame_total {
            tracing::warn!(drawn, frames = frame_total, "simulation thread stopped early");
        }
        Ok(())
    })?;

    Ok(*batcher.stats())
}

/// Render side of the handoff. Returns the number of frames drawn.
///
/// Stops as soon as the simulation side hangs up on either channel.
fn render_frames<S: Scalar>(
    batcher: &mut QuadBatcher<S>,
    frames: &DoubleBuffer<Vec<QuadStagingBuffer<S>>>,
    backend: &mut RecordingBackend,
    go_tx: &Sender<()>,
    ready_rx: &Receiver<()>,
    frame_total: usize,
) -> BatchResult<usize> {
    if go_tx.send(()).is_err() {
        return Ok(0);
    }
    for frame in 0..frame_total {
        {
            let mut slot = frames.consumer_handle();
            batcher.merge(&mut slot)?;
        }
        backend.clear();
        let stats = batcher.draw(backend);
        tracing::trace!(
            frame,
            draw_calls = stats.draw_calls,
            quads = stats.quads(),
            uploaded = stats.uploaded_vertices,
            rebound = stats.rebound,
            "frame drawn"
        );

        if ready_rx.recv().is_err() {
            return Ok(frame + 1);
        }
        frames.swap_buffers();
        if frame + 1 < frame_total && go_tx.send(()).is_err() {
            return Ok(frame + 1);
        }
    }
    Ok(frame_total)
}

fn run(options: &Options) -> BatchResult<()> {
    let config = match &options.config {
        Some(path) => BatchConfig::load(path)?,
        None => BatchConfig::default(),
    };
    let atlas = match &options.atlas {
        Some(path) => TextureAtlas::load(path)?,
        None => TextureAtlas::builtin(),
    };

    let started = Instant::now();
    let stats = if options.fixed {
        run_frames::<Fixed16>(&config, &atlas, options)?
    } else {
        run_frames::<f32>(&config, &atlas, options)?
    };
    let elapsed = started.elapsed();

    tracing::info!(
        frames = stats.frames,
        elapsed_ms = elapsed.as_millis() as u64,
        draw_calls_per_frame = stats.draw_calls_per_frame(),
        quads_per_draw = stats.quads_per_draw(),
        skipped_groups = stats.skipped_groups,
        capacity_vertices = stats.capacity_vertices,
        growths = stats.growths,
        rebinds = stats.rebinds,
        "sprite bench finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            tracing::error!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "sprite bench failed");
            ExitCode::FAILURE
        }
    }
}
