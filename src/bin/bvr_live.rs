//! bvr_live - replay recorded detections over a folder of frames

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{anyhow, Result};
use clap::Parser;

use bvr_live::common::{ModelVariant, Resolution};
use bvr_live::data::{control_channels, DetectionConfig, LoadProgress};
use bvr_live::detection_runners::{DetectionLoop, ImageFolderSource, ModelLoader, ReplayProvider,
                                  DEFAULT_REFRESH_INTERVAL};
use bvr_live::overlay::{OverlayLayer, SnapshotExporter};
use bvr_live::LiveView;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory of frames served as the camera feed.
    #[arg(long)]
    frames: PathBuf,
    /// Recorded model output, one JSON prediction array per line.
    #[arg(long)]
    predictions: PathBuf,
    /// Optional JSON detection config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop after this many display frames (runs until Ctrl-C otherwise).
    #[arg(long)]
    cycles: Option<u64>,
    /// Confidence threshold override, 0..1.
    #[arg(long)]
    confidence: Option<f32>,
    /// Model variant override (full, lite).
    #[arg(long)]
    model: Option<String>,
    /// Resolution override, e.g. 1280x720.
    #[arg(long)]
    resolution: Option<Resolution>,
    /// Minimum milliseconds between detections.
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Enable centroid tracking.
    #[arg(long, default_value_t = false)]
    tracking: bool,
    /// Simulated inference latency in milliseconds.
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,
    /// Save a snapshot with overlays here when the run ends.
    #[arg(long)]
    capture_dir: Option<PathBuf>,
    /// TTF/OTF font used for snapshot labels.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<DetectionConfig> {
    let mut config = match &args.config {
        Some(path) => DetectionConfig::from_file(path)?,
        None => DetectionConfig::new(),
    };
    if let Some(x) = args.confidence {
        config = config.with_confidence_threshold(x);
    }
    if let Some(name) = &args.model {
        let variant = ModelVariant::from_str(name).ok_or_else(|| {
            anyhow!("unknown model '{}', expected one of {:?}", name, ModelVariant::all_model_variants())
        })?;
        config = config.with_model_variant(variant);
    }
    if let Some(res) = args.resolution {
        config = config.with_resolution(res);
    }
    if let Some(ms) = args.interval_ms {
        config = config.with_min_detection_interval(Duration::from_millis(ms));
    }
    if args.tracking {
        config = config.with_tracking(true);
    }
    config.validate()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(&args)?;
    log::info!("Starting live view\n{}", config.to_string());

    let (send_state, control_state) = control_channels();
    let progress_rx = send_state.progress_rx;
    let progress_thread = std::thread::spawn(move || {
        for progress in progress_rx.iter() {
            match progress {
                LoadProgress::Started(variant) => log::info!("Loading {}...", variant),
                LoadProgress::Percent(p) => log::info!("{}%", p),
                LoadProgress::Completed(variant) => log::info!("{} ready", variant),
                LoadProgress::Failed(reason) => log::error!("Model failed to load. Please refresh. ({})", reason),
            }
        }
    });

    let provider = ReplayProvider::new(&args.predictions)
        .with_latency(Duration::from_millis(args.latency_ms));
    let mut loader = ModelLoader::new(provider);
    if let Some(tx) = control_state.progress_tx {
        loader = loader.with_progress(tx);
    }

    let source = ImageFolderSource::new(&args.frames);
    let handle = source.handle();
    ctrlc::set_handler(move || handle.stop())?;

    let mut exporter = match &args.capture_dir {
        Some(dir) => SnapshotExporter::new(dir),
        None => SnapshotExporter::new(bvr_live::data::FsAccess::captures_dir()?),
    };
    if let Some(font) = &args.font {
        exporter = exporter.with_font_file(font)?;
    }

    let mut live_view = LiveView::new(loader, source, OverlayLayer::new(), config)
        .with_controls(control_state.cmd_rx)
        .with_exporter(exporter)
        .with_detection_loop(DetectionLoop::new(DEFAULT_REFRESH_INTERVAL));

    live_view.enable_camera().await?;
    let frames = live_view.run(args.cycles).await;

    if args.capture_dir.is_some() {
        match live_view.capture(None)? {
            Some(path) => println!("Snapshot: {}", path.display()),
            None => log::warn!("No frame was displayed, snapshot skipped"),
        }
    }

    let stats = live_view.stats();
    println!("Frames: {} | Detections: {} | Last: {} ms | Avg: {:.2?} | FPS: {} | Objects: {}",
             frames, stats.n(),
             stats.last_ms().map(|ms| ms.to_string()).unwrap_or_else(|| "-".to_string()),
             stats.avg(), stats.fps(), live_view.object_count());
    for entry in live_view.history().entries().collect::<Vec<_>>().into_iter().rev() {
        println!("[{}] {:<7} {}", entry.time_string(), entry.severity.as_str(), entry.message);
    }

    live_view.stop_camera();
    drop(live_view);
    drop(send_state.cmd_tx);
    if progress_thread.join().is_err() {
        log::warn!("Progress reporter panicked");
    }
    Ok(())
}
