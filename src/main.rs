//! Hand gesture control: replays or streams hand landmarks and triggers the
//! bound desktop actions.
//!
//! Frames are read as JSON lines (one landmark array or `null` per line) from
//! `--replay <file>` or standard input. Actions and pointer events are logged;
//! a desktop integration supplies real handlers through the library.

use anyhow::{Context, Result};
use clap::Parser;
use hand_gesture_control::{
    actions::{ActionKind, ActionRegistry},
    app::{FrameSource, GestureApp, JsonLinesSource},
    bindings::ActionMap,
    config::Config,
    constants::SCROLL_STEP,
    cursor_control::{dynamic_scroll_amount, CursorMapper, CursorTracker, PointerSink},
    gesture_store::GestureStore,
    pipeline::{FramePipeline, Mode},
    state::SharedState,
};
use log::{debug, info, warn};
use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
    time::Duration,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Gesture sample file (overrides the config)
    #[arg(short, long)]
    gestures: Option<PathBuf>,

    /// Gesture to action bindings file (overrides the config)
    #[arg(short, long)]
    bindings: Option<PathBuf>,

    /// Replay recorded landmark frames (JSON lines) instead of reading stdin
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Frames per second to pace a replay at (0 = as fast as possible)
    #[arg(long, default_value = "0")]
    fps: u32,

    /// Starting mode (detect, record, mouse)
    #[arg(short, long, default_value = "detect")]
    mode: String,

    /// Print training statistics for the gesture store and exit
    #[arg(long)]
    stats: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// Pointer backend that only logs
struct LoggingPointer;

impl PointerSink for LoggingPointer {
    fn move_to(&mut self, x: i32, y: i32) -> hand_gesture_control::Result<()> {
        debug!("pointer move ({x}, {y})");
        Ok(())
    }

    fn press_left(&mut self) -> hand_gesture_control::Result<()> {
        info!("pointer left down");
        Ok(())
    }

    fn release_left(&mut self) -> hand_gesture_control::Result<()> {
        info!("pointer left up");
        Ok(())
    }

    fn right_click(&mut self) -> hand_gesture_control::Result<()> {
        info!("pointer right click");
        Ok(())
    }
}

fn logging_registry(config: &Config) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    for &kind in ActionKind::ALL {
        match kind {
            ActionKind::DynamicScroll => registry.register(kind, |pose| {
                if let Some(pose) = pose {
                    let amount = dynamic_scroll_amount(pose);
                    if amount != 0 {
                        debug!("scroll {amount}");
                    }
                }
                Ok(())
            }),
            ActionKind::ScrollUp => registry.register(kind, |_| {
                debug!("scroll {SCROLL_STEP}");
                Ok(())
            }),
            ActionKind::ScrollDown => registry.register(kind, |_| {
                debug!("scroll -{SCROLL_STEP}");
                Ok(())
            }),
            ActionKind::TrackCursor => {
                let mapper = CursorMapper::new(
                    config.screen.width,
                    config.screen.height,
                    config.smart_mouse.mirror_x,
                );
                let mut tracker = CursorTracker::new(mapper, config.smart_mouse.smoothing_factor);
                let mut pointer = LoggingPointer;
                registry.register(kind, move |pose| {
                    if let Some(pose) = pose {
                        tracker.track(pose, &mut pointer)?;
                    }
                    Ok(())
                })
            }
            _ => registry.register(kind, move |_| {
                info!("action: {kind}");
                Ok(())
            }),
        };
    }
    registry
        .on_type_text(|text| {
            info!("type: {text}");
            Ok(())
        })
        .on_command(|cmd| {
            warn!("command execution is disabled in the logging backend: {cmd}");
            Ok(())
        });
    registry
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Hand Gesture Control");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    if let Some(path) = args.gestures {
        config.storage.gestures_file = path;
    }
    if let Some(path) = args.bindings {
        config.storage.bindings_file = path;
    }
    config.validate().context("invalid configuration")?;

    let store = GestureStore::open(&config.storage.gestures_file, &config.storage.samples_dir)
        .context("failed to open gesture store")?;

    if args.stats {
        let stats = store.training_stats();
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let bindings =
        ActionMap::open(&config.storage.bindings_file).context("failed to open bindings")?;
    let mode: Mode = args.mode.parse()?;

    let pipeline = FramePipeline::from_config(
        &config,
        Box::new(logging_registry(&config)),
        Box::new(LoggingPointer),
    )?;
    let state = SharedState::new(
        store,
        bindings,
        pipeline,
        Duration::from_secs_f64(config.dispatch.status_clear_secs),
    );
    state.set_mode(mode)?;

    let mut app = GestureApp::new(state);
    if args.fps > 0 {
        app = app.with_frame_interval(Duration::from_secs_f64(1.0 / f64::from(args.fps)));
    }

    let mut source: Box<dyn FrameSource> = match &args.replay {
        Some(path) => {
            info!("Replaying frames from {}", path.display());
            let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(JsonLinesSource::new(BufReader::new(file)))
        }
        None => {
            info!("Reading frames from stdin");
            Box::new(JsonLinesSource::new(BufReader::new(io::stdin())))
        }
    };

    let summary = app.run(source.as_mut())?;
    let status = app.state().snapshot()?;
    info!(
        "Done: {} frames, {} actions, last gesture {:?}",
        summary.frames, summary.actions, status.current_gesture
    );

    Ok(())
}
