//! Debouncing and trigger policy


use hand_gesture_control::{
    actions::{Action, ActionExecutor, ActionKind, ActionRegistry, ExecStatus},
    dispatch::{DispatchOutcome, DispatchPolicy},
    landmarks::HandPose,
    stability::{StabilityFilter, StabilityPhase},
    Error, Result,
};
use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use test_helpers::open_palm;

/// Executor that records every action it runs
#[derive(Default)]
struct Recorder {
    calls: Vec<(String, bool)>,
}

impl ActionExecutor for Recorder {
    fn execute(&mut self, action: &Action, pose: Option<&HandPose>) -> Result<ExecStatus> {
        self.calls.push((action.to_string(), pose.is_some()));
        Ok(ExecStatus::Executed(action.to_string()))
    }
}

fn screenshot() -> Action {
    Action::Builtin(ActionKind::Screenshot)
}

#[test]
fn test_confirmation_after_required_frames() {
    let mut filter = StabilityFilter::new(3);
    assert_eq!(filter.update(Some("fist")), None);
    assert_eq!(filter.update(Some("fist")), None);
    assert_eq!(filter.update(Some("fist")), Some("fist"));
    // Stays confirmed while the same label keeps arriving
    assert_eq!(filter.update(Some("fist")), Some("fist"));
    assert_eq!(filter.progress(), 1.0);
}

#[test]
fn test_different_candidate_restarts_count() {
    let mut filter = StabilityFilter::new(3);
    filter.update(Some("fist"));
    filter.update(Some("fist"));
    assert_eq!(filter.update(Some("peace")), None);
    assert_eq!(filter.count(), 1);
    assert_eq!(
        filter.phase(),
        StabilityPhase::Pending {
            label: "peace".to_string(),
            count: 1
        }
    );
    filter.update(Some("peace"));
    assert_eq!(filter.update(Some("peace")), Some("peace"));
}

#[test]
fn test_no_candidate_returns_to_idle() {
    let mut filter = StabilityFilter::new(2);
    filter.update(Some("fist"));
    filter.update(Some("fist"));
    assert_eq!(filter.update(None), None);
    assert_eq!(filter.phase(), StabilityPhase::Idle);
    assert_eq!(filter.progress(), 0.0);
    assert_eq!(filter.update(Some("fist")), None);
}

#[test]
fn test_one_shot_fires_once_within_cooldown() {
    let mut policy = DispatchPolicy::new(Duration::from_millis(500));
    let mut rec = Recorder::default();
    let pose = open_palm();
    let t0 = Instant::now();

    let first = policy.dispatch("peace", Some(&screenshot()), &pose, t0, &mut rec);
    assert_eq!(first, DispatchOutcome::Fired("screenshot".to_string()));
    let second = policy.dispatch(
        "peace",
        Some(&screenshot()),
        &pose,
        t0 + Duration::from_millis(100),
        &mut rec,
    );
    assert_eq!(second, DispatchOutcome::Cooldown);
    assert_eq!(rec.calls.len(), 1);
}

#[test]
fn test_hand_lost_allows_immediate_retrigger() {
    let mut policy = DispatchPolicy::new(Duration::from_millis(500));
    let mut rec = Recorder::default();
    let pose = open_palm();
    let t0 = Instant::now();

    policy.dispatch("peace", Some(&screenshot()), &pose, t0, &mut rec);
    policy.hand_lost();
    assert_eq!(policy.last_triggered(), None);

    assert_eq!(policy.last_trigger_time(), None);

    // Well inside the cooldown of the previous session
    let t1 = t0 + Duration::from_millis(200);
    assert!(policy.dispatch("peace", Some(&screenshot()), &pose, t1, &mut rec).executed());
    assert_eq!(rec.calls.len(), 2);

    // The new firing starts a fresh cooldown
    assert_eq!(
        policy.dispatch("fist", Some(&screenshot()), &pose, t1 + Duration::from_millis(100), &mut rec),
        DispatchOutcome::Cooldown
    );
}

#[test]
fn test_switching_gesture_fires_after_cooldown() {
    let mut policy = DispatchPolicy::new(Duration::from_millis(500));
    let mut rec = Recorder::default();
    let pose = open_palm();
    let t0 = Instant::now();
    let mute = Action::Builtin(ActionKind::VolumeMute);

    policy.dispatch("peace", Some(&screenshot()), &pose, t0, &mut rec);
    assert_eq!(
        policy.dispatch("fist", Some(&mute), &pose, t0 + Duration::from_millis(200), &mut rec),
        DispatchOutcome::Cooldown
    );
    assert!(policy
        .dispatch("fist", Some(&mute), &pose, t0 + Duration::from_millis(700), &mut rec)
        .executed());
    assert_eq!(policy.last_triggered(), Some("fist"));
}

#[test]
fn test_continuous_runs_every_frame() {
    let mut policy = DispatchPolicy::new(Duration::from_secs(10));
    let mut rec = Recorder::default();
    let pose = open_palm();
    let t0 = Instant::now();
    let scroll = Action::Builtin(ActionKind::ScrollUp);

    for i in 0..5 {
        let outcome = policy.dispatch("point", Some(&scroll), &pose, t0 + Duration::from_millis(i), &mut rec);
        assert_eq!(outcome, DispatchOutcome::Continuous("scroll_up".to_string()));
    }
    assert_eq!(rec.calls.len(), 5);
    // Continuous actions leave the one-shot state alone
    assert_eq!(policy.last_triggered(), None);
    assert_eq!(policy.last_trigger_time(), None);
}

#[test]
fn test_pose_passed_only_to_pose_actions() {
    let mut policy = DispatchPolicy::default();
    let mut rec = Recorder::default();
    let pose = open_palm();
    let now = Instant::now();

    policy.dispatch("point", Some(&Action::Builtin(ActionKind::TrackCursor)), &pose, now, &mut rec);
    policy.dispatch("up", Some(&Action::Builtin(ActionKind::VolumeUp)), &pose, now, &mut rec);
    assert_eq!(
        rec.calls,
        vec![("track_cursor".to_string(), true), ("volume_up".to_string(), false)]
    );
}

#[test]
fn test_missing_handler_is_a_no_op() {
    let mut policy = DispatchPolicy::default();
    let mut registry = ActionRegistry::new();
    let pose = open_palm();

    let outcome = policy.dispatch("peace", Some(&screenshot()), &pose, Instant::now(), &mut registry);
    assert_eq!(outcome, DispatchOutcome::NoHandler);
    assert_eq!(policy.last_triggered(), None);

    let unknown = Action::parse("teleport");
    let outcome = policy.dispatch("peace", Some(&unknown), &pose, Instant::now(), &mut registry);
    assert_eq!(outcome, DispatchOutcome::NoHandler);
}

#[test]
fn test_handler_error_is_swallowed() {
    let mut policy = DispatchPolicy::default();
    let hits = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&hits);
    let mut registry = ActionRegistry::new();
    registry
        .register(ActionKind::Screenshot, |_| Err(Error::ActionFailed("no display".to_string())))
        .register(ActionKind::VolumeMute, move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });
    let pose = open_palm();
    let t0 = Instant::now();

    assert_eq!(
        policy.dispatch("peace", Some(&screenshot()), &pose, t0, &mut registry),
        DispatchOutcome::Failed
    );
    // The failure did not start a cooldown
    let mute = Action::Builtin(ActionKind::VolumeMute);
    assert!(policy.dispatch("fist", Some(&mute), &pose, t0, &mut registry).executed());
    assert_eq!(*hits.lock().unwrap(), 1);
}
