use anyhow::{Context, Result};
use clap::Parser;
use skeleton_core::{FrameQueue, LayoutEngine, ManualClock, MaskCompositor, SkeletonConfig};
use skia_safe::{Color, EncodedImageFormat};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;

/// Renders one shimmer cycle of a list skeleton to PNG frames.
#[derive(Parser, Debug)]
#[command(name = "skeleton-render", version, about)]
struct Cli {
    /// JSON skeleton config; missing fields use the defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving `frame_###.png`.
    #[arg(short, long, default_value = "skeleton_frames")]
    output: PathBuf,

    #[arg(long, default_value_t = 360)]
    width: u32,

    #[arg(long, default_value_t = 3)]
    rows: usize,

    /// Frames sampled evenly across one sweep.
    #[arg(long, default_value_t = 12)]
    frames: u32,
}

fn load_config(path: Option<&PathBuf>) -> Result<SkeletonConfig> {
    let Some(path) = path else {
        return Ok(SkeletonConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    SkeletonConfig::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let duration = config.shimmer_duration_millis;

    let width = cli.width as f32;
    let height = demo::ROW_HEIGHT * cli.rows as f32;
    let (mut tree, list) = demo::list_screen(width, cli.rows);

    let mut host = FrameQueue::new(ManualClock::new(0));
    let mut engine = LayoutEngine::new();
    let mut compositor = MaskCompositor::try_new(&mut tree, Some(list), config)?;
    compositor.bind(&mut tree);
    compositor.on_attached(&mut host);

    let changes = engine.compute_layout(&mut tree, width, height);
    compositor.dispatch_layout(&tree, &changes, &mut host);

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;

    let mut surface = skia_safe::surfaces::raster_n32_premul((cli.width as i32, height as i32))
        .context("Failed to create Skia surface")?;

    let frames = cli.frames.max(1);
    for frame in 0..frames {
        host.clock().set(duration * frame as u64 / frames as u64);
        for request in host.take_due() {
            compositor.on_frame(request, &mut host);
        }

        let canvas = surface.canvas();
        canvas.clear(Color::WHITE);
        compositor.draw(canvas);

        let data = surface
            .image_snapshot()
            .encode(None, EncodedImageFormat::PNG, 100)
            .context("Failed to encode frame to PNG")?;
        let path = cli.output.join(format!("frame_{:03}.png", frame));
        fs::write(&path, data.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    if let Some(target) = compositor.release(&mut tree, &mut host) {
        info!("Released view {} after {} frames", target, frames);
    }
    Ok(())
}
