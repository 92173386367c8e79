//! Hand gesture recognition and desktop control.
//!
//! This library turns per-frame hand landmarks (21 points from an external
//! hand-tracking model) into desktop actions:
//! - angle-based feature extraction, invariant to hand position and size
//! - nearest-sample classification against user-recorded gestures
//! - frame-wise debouncing and one-shot / continuous action triggering
//! - a pinch-driven "smart mouse"
//!
//! The recognition pipeline consists of:
//! 1. Feature extraction: 20 joint angles from the 21 landmarks
//! 2. Classification: nearest recorded sample per label, with a match
//!    threshold and an ambiguity margin
//! 3. Stabilization: a label must repeat for several frames
//! 4. Dispatch: the bound action runs once per hold, or every frame for
//!    continuous actions
//!
//! # Examples
//!
//! ## Classifying a pose
//!
//! ```no_run
//! use hand_gesture_control::{
//!     classifier::Classifier, features::extract_pose, gesture_store::GestureStore,
//!     landmarks::{HandPose, Landmark},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = GestureStore::open("gestures.json", "samples")?;
//! let classifier = Classifier::default();
//!
//! // Landmarks come from the hand-tracking model
//! let points = vec![Landmark::new(0.5, 0.5, 0.0); 21];
//! let pose = HandPose::new(points)?;
//!
//! match classifier.classify(&store, &extract_pose(&pose)) {
//!     Some(label) => println!("Gesture: {label}"),
//!     None => println!("No gesture"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the full pipeline
//!
//! ```no_run
//! use hand_gesture_control::{
//!     actions::{ActionKind, ActionRegistry},
//!     app::{GestureApp, JsonLinesSource},
//!     bindings::ActionMap,
//!     config::Config,
//!     cursor_control::PointerSink,
//!     gesture_store::GestureStore,
//!     pipeline::FramePipeline,
//!     state::SharedState,
//! };
//! use std::{fs::File, io::BufReader, time::Duration};
//!
//! struct NullPointer;
//!
//! impl PointerSink for NullPointer {
//!     fn move_to(&mut self, _x: i32, _y: i32) -> hand_gesture_control::Result<()> { Ok(()) }
//!     fn press_left(&mut self) -> hand_gesture_control::Result<()> { Ok(()) }
//!     fn release_left(&mut self) -> hand_gesture_control::Result<()> { Ok(()) }
//!     fn right_click(&mut self) -> hand_gesture_control::Result<()> { Ok(()) }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut registry = ActionRegistry::new();
//! registry.register(ActionKind::Screenshot, |_| {
//!     println!("click!");
//!     Ok(())
//! });
//!
//! let pipeline = FramePipeline::from_config(&config, Box::new(registry), Box::new(NullPointer))?;
//! let state = SharedState::new(
//!     GestureStore::open(&config.storage.gestures_file, &config.storage.samples_dir)?,
//!     ActionMap::open(&config.storage.bindings_file)?,
//!     pipeline,
//!     Duration::from_secs_f64(config.dispatch.status_clear_secs),
//! );
//!
//! let app = GestureApp::new(state);
//! let mut source = JsonLinesSource::new(BufReader::new(File::open("frames.jsonl")?));
//! let summary = app.run(&mut source)?;
//! println!("{} frames, {} actions", summary.frames, summary.actions);
//! # Ok(())
//! # }
//! ```

/// Hand landmark and pose types
pub mod landmarks;

/// Angle-based feature extraction
pub mod features;

/// Persistent gesture samples
pub mod gesture_store;

/// Nearest-sample gesture classifier
pub mod classifier;

/// Frame-wise debouncing of classifier output
pub mod stability;

/// Action vocabulary, executor seam and handler registry
pub mod actions;

/// Gesture to action bindings
pub mod bindings;

/// One-shot and continuous trigger policy
pub mod dispatch;

/// Cursor smoothing filters
pub mod filters;

/// Cursor mapping and pointer output
pub mod cursor_control;

/// Pinch-driven mouse control
pub mod smart_mouse;

/// Hand size and orientation feedback
pub mod hand_metrics;

/// Per-frame recognition pipeline
pub mod pipeline;

/// Shared state container
pub mod state;

/// Frame worker and frame sources
pub mod app;

/// Utility math and safe casts
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
