//! Benchmarks for the per-frame path: cursor smoothing, smart mouse and the
//! full shared-state frame step

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hand_gesture_control::{
    actions::{Action, ActionExecutor, ExecStatus},
    bindings::ActionMap,
    config::Config,
    cursor_control::{CursorMapper, CursorTracker, PointerSink},
    filters::create_filter,
    gesture_store::GestureStore,
    landmarks::{HandPose, Landmark},
    pipeline::{FramePipeline, Mode},
    smart_mouse::SmartMouseController,
    state::SharedState,
    Result,
};
use std::time::{Duration, Instant};

struct NullExecutor;

impl ActionExecutor for NullExecutor {
    fn execute(&mut self, action: &Action, _pose: Option<&HandPose>) -> Result<ExecStatus> {
        Ok(ExecStatus::Executed(action.to_string()))
    }
}

struct NullPointer;

impl PointerSink for NullPointer {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        black_box((x, y));
        Ok(())
    }

    fn press_left(&mut self) -> Result<()> {
        Ok(())
    }

    fn release_left(&mut self) -> Result<()> {
        Ok(())
    }

    fn right_click(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Hand drifting across the frame; `pinch` brings the thumb to the index base
fn drifting_pose(i: usize, pinch: bool) -> HandPose {
    let t = i as f64 * 0.05;
    let cx = 0.5 + 0.2 * t.sin();
    let cy = 0.5 + 0.15 * t.cos();
    let noise = rand::random::<f64>() * 0.002;
    let mut points = vec![Landmark::new(cx, cy + 0.2, 0.0); 21];
    points[5] = Landmark::new(cx, cy, 0.0);
    points[4] = Landmark::new(cx + if pinch { 0.02 } else { 0.15 }, cy, 0.0);
    points[8] = Landmark::new(cx + noise, cy - 0.2, 0.0);
    HandPose::new(points).expect("21 finite landmarks")
}

fn bench_cursor_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor_filters");
    let poses: Vec<HandPose> = (0..100).map(|i| drifting_pose(i, false)).collect();

    for name in ["none", "exponential", "exponential:0.6"] {
        group.bench_with_input(BenchmarkId::new("track_100", name), &poses, |b, poses| {
            let mapper = CursorMapper::default();
            let mut tracker = CursorTracker::with_filter(mapper, create_filter(name).expect("known filter"));
            b.iter(|| {
                tracker.reset();
                for pose in poses {
                    black_box(tracker.update(black_box(pose)));
                }
            });
        });
    }

    group.finish();
}

fn bench_smart_mouse(c: &mut Criterion) {
    let poses: Vec<HandPose> = (0..100).map(|i| drifting_pose(i, i % 20 < 5)).collect();
    let mut mouse = SmartMouseController::default();
    let mut pointer = NullPointer;
    let start = Instant::now();

    c.bench_function("smart_mouse_100_frames", |b| {
        b.iter(|| {
            for (i, pose) in poses.iter().enumerate() {
                let now = start + Duration::from_millis(i as u64 * 33);
                black_box(mouse.update(pose, now, &mut pointer));
            }
            mouse.release_all(&mut pointer);
        });
    });
}

fn bench_frame_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_step");
    let poses: Vec<HandPose> = (0..30).map(|i| drifting_pose(i, false)).collect();

    for mode in [Mode::Detect, Mode::Mouse, Mode::Record] {
        let mut store = GestureStore::in_memory();
        for (i, pose) in poses.iter().enumerate() {
            store
                .add_sample(&format!("gesture_{}", i % 6), pose)
                .expect("in-memory store accepts samples");
        }
        let pipeline = FramePipeline::from_config(&Config::default(), Box::new(NullExecutor), Box::new(NullPointer))
            .expect("default config is valid");
        let state = SharedState::new(store, ActionMap::in_memory(), pipeline, Duration::from_secs(3));
        state.set_mode(mode).expect("fresh lock");

        group.bench_with_input(BenchmarkId::new("process_30", mode.as_str()), &poses, |b, poses| {
            b.iter(|| {
                for pose in poses {
                    black_box(state.process_frame(Some(pose.clone()), Instant::now()).expect("fresh lock"));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cursor_filters, bench_smart_mouse, bench_frame_step);
criterion_main!(benches);
