//! Frame worker: pulls landmark frames from a source and feeds the shared
//! state, one frame at a time, until the source ends or a stop is requested.

use crate::{
    landmarks::Landmark,
    state::SharedState,
    Error, Result,
};
use log::{debug, info, warn};
use std::{
    io::BufRead,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// One frame from the hand-landmark model
#[derive(Debug, Clone, PartialEq)]
pub enum FrameInput {
    /// A hand was detected; landmarks are not yet validated
    Hand(Vec<Landmark>),
    /// No hand in this frame
    NoHand,
}

/// Producer of frames (camera + landmark model, or a recording)
pub trait FrameSource: Send {
    /// Next frame, or `None` at end of stream
    ///
    /// # Errors
    ///
    /// Source-specific read failures; these end the run.
    fn next_frame(&mut self) -> Result<Option<FrameInput>>;
}

/// Replays frames recorded as JSON lines.
///
/// Each line is either `null` / `[]` (no hand) or an array of
/// `{"x": .., "y": .., "z": ..}` objects. Blank lines are skipped and
/// unparseable lines are logged and skipped.
pub struct JsonLinesSource<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead + Send> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead + Send> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<FrameInput>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Option<Vec<Landmark>>>(line) {
                Ok(Some(points)) if !points.is_empty() => return Ok(Some(FrameInput::Hand(points))),
                Ok(_) => return Ok(Some(FrameInput::NoHand)),
                Err(e) => warn!("Skipping line {}: {e}", self.line_no),
            }
        }
    }
}

/// Totals for one worker run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    /// Frames rejected as malformed
    pub dropped: usize,
    /// Frames on which an action ran
    pub actions: usize,
    /// True if the run ended because of a stop request
    pub stopped: bool,
}

/// The per-stream worker
pub struct GestureApp {
    state: SharedState,
    stop: Arc<AtomicBool>,
    frame_interval: Option<Duration>,
}

impl GestureApp {
    #[must_use]
    pub fn new(state: SharedState) -> Self {
        Self {
            state,
            stop: Arc::new(AtomicBool::new(false)),
            frame_interval: None,
        }
    }

    /// Pace frames to at most one per `interval` (for replays)
    #[must_use]
    pub const fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    /// Flag that ends the run between frames when set
    #[must_use]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    #[must_use]
    pub const fn state(&self) -> &SharedState {
        &self.state
    }

    /// Process frames until the source ends or a stop is requested.
    ///
    /// Recognition state is reset before the first frame, so a stopped run
    /// can be restarted safely.
    ///
    /// # Errors
    ///
    /// Source read failures and [`Error::LockPoisoned`].
    pub fn run(&self, source: &mut dyn FrameSource) -> Result<RunSummary> {
        info!("Starting frame worker");
        self.stop.store(false, Ordering::SeqCst);
        self.state.reset_stream()?;

        let mut summary = RunSummary::default();
        let start = Instant::now();
        let mut last_report = Instant::now();

        loop {
            if self.stop.load(Ordering::SeqCst) {
                info!("Stop requested");
                summary.stopped = true;
                break;
            }
            let frame_start = Instant::now();
            let Some(input) = source.next_frame()? else {
                info!("End of frame stream reached");
                break;
            };

            let landmarks = match input {
                FrameInput::Hand(points) => Some(points),
                FrameInput::NoHand => None,
            };
            summary.frames += 1;
            match self.state.process_landmarks(landmarks, Instant::now())? {
                Some(result) => {
                    if result.dispatch.as_ref().is_some_and(|d| d.executed()) {
                        summary.actions += 1;
                    }
                }
                None => summary.dropped += 1,
            }

            if last_report.elapsed() >= Duration::from_secs(1) {
                let status = self.state.snapshot()?;
                debug!(
                    "{} frames, {} fps, mode {}, gesture {:?}",
                    summary.frames, status.fps, status.mode, status.current_gesture
                );
                last_report = Instant::now();
            }

            if let Some(interval) = self.frame_interval {
                let spent = frame_start.elapsed();
                if spent < interval {
                    thread::sleep(interval - spent);
                }
            }
        }

        info!(
            "Frame worker finished: {} frames ({} dropped, {} actions) in {:.1}s",
            summary.frames,
            summary.dropped,
            summary.actions,
            start.elapsed().as_secs_f64()
        );
        Ok(summary)
    }

    /// Run on a background thread
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the thread cannot be spawned.
    pub fn spawn(self, mut source: Box<dyn FrameSource>) -> Result<JoinHandle<Result<RunSummary>>> {
        thread::Builder::new()
            .name("gesture-worker".to_string())
            .spawn(move || self.run(source.as_mut()))
            .map_err(Error::Io)
    }
}
