//! One-shot versus continuous trigger policy for confirmed gestures.
//!
//! Continuous actions run on every confirmed frame. One-shot actions fire
//! once per hold: they need the cooldown to have elapsed and the gesture to
//! differ from the one that last fired. Losing the hand ends the session and
//! clears both, so the next confirmed gesture fires immediately.

use crate::{
    actions::{Action, ActionExecutor, ExecStatus},
    constants::DEFAULT_COOLDOWN_SECS,
    landmarks::HandPose,
};
use log::{debug, error, info};
use std::time::{Duration, Instant};

/// What happened to a confirmed gesture on one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A continuous action ran
    Continuous(String),
    /// A one-shot action fired
    Fired(String),
    /// One-shot suppressed: cooldown still running
    Cooldown,
    /// One-shot suppressed: this gesture already fired during the current hold
    AlreadyTriggered,
    /// Gesture has no bound action
    Unbound,
    /// Bound action has no registered handler
    NoHandler,
    /// Executor returned an error (logged)
    Failed,
}

impl DispatchOutcome {
    /// Whether an action actually ran
    #[must_use]
    pub const fn executed(&self) -> bool {
        matches!(self, Self::Continuous(_) | Self::Fired(_))
    }
}

/// Trigger state for one recognition stream
#[derive(Debug, Clone)]
pub struct DispatchPolicy {
    cooldown: Duration,
    last_triggered: Option<String>,
    last_trigger_time: Option<Instant>,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs_f64(DEFAULT_COOLDOWN_SECS))
    }
}

impl DispatchPolicy {
    #[must_use]
    pub const fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_triggered: None,
            last_trigger_time: None,
        }
    }

    /// Handle one frame on which `label` is confirmed.
    ///
    /// Executor errors are logged and reported as [`DispatchOutcome::Failed`];
    /// they never propagate.
    pub fn dispatch(
        &mut self,
        label: &str,
        action: Option<&Action>,
        pose: &HandPose,
        now: Instant,
        executor: &mut dyn ActionExecutor,
    ) -> DispatchOutcome {
        let Some(action) = action else {
            return DispatchOutcome::Unbound;
        };
        let pose_arg = action.needs_pose().then_some(pose);

        if action.is_continuous() {
            return match executor.execute(action, pose_arg) {
                Ok(ExecStatus::Executed(_)) => DispatchOutcome::Continuous(action.to_string()),
                Ok(ExecStatus::NoHandler) => {
                    debug!("No handler found for action: {action}");
                    DispatchOutcome::NoHandler
                }
                Err(e) => {
                    error!("Action execution error for {action}: {e}");
                    DispatchOutcome::Failed
                }
            };
        }

        if !self.cooldown_elapsed(now) {
            return DispatchOutcome::Cooldown;
        }
        if self.last_triggered.as_deref() == Some(label) {
            return DispatchOutcome::AlreadyTriggered;
        }

        info!("Triggering: {label} -> {action}");
        match executor.execute(action, pose_arg) {
            Ok(ExecStatus::Executed(description)) => {
                info!("Action Executed: {description}");
                self.last_triggered = Some(label.to_string());
                self.last_trigger_time = Some(now);
                DispatchOutcome::Fired(description)
            }
            Ok(ExecStatus::NoHandler) => {
                debug!("No handler found for action: {action}");
                DispatchOutcome::NoHandler
            }
            Err(e) => {
                error!("Execution failed for {action}: {e}");
                DispatchOutcome::Failed
            }
        }
    }

    /// The hand left the frame: forget the last trigger and its cooldown
    pub fn hand_lost(&mut self) {
        self.last_triggered = None;
        self.last_trigger_time = None;
    }

    #[must_use]
    pub fn last_triggered(&self) -> Option<&str> {
        self.last_triggered.as_deref()
    }

    #[must_use]
    pub const fn last_trigger_time(&self) -> Option<Instant> {
        self.last_trigger_time
    }

    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    fn cooldown_elapsed(&self, now: Instant) -> bool {
        self.last_trigger_time
            .map_or(true, |t| now.saturating_duration_since(t) > self.cooldown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        actions::ActionKind,
        landmarks::Landmark,
        Error, Result,
    };

    struct Recorder {
        calls: Vec<String>,
        fail: bool,
    }

    impl ActionExecutor for Recorder {
        fn execute(&mut self, action: &Action, _pose: Option<&HandPose>) -> Result<ExecStatus> {
            if self.fail {
                return Err(Error::ActionFailed("boom".to_string()));
            }
            self.calls.push(action.to_string());
            Ok(ExecStatus::Executed(action.to_string()))
        }
    }

    fn pose() -> HandPose {
        HandPose::new(vec![Landmark::new(0.5, 0.5, 0.0); 21]).unwrap()
    }

    #[test]
    fn test_unbound_gesture() {
        let mut policy = DispatchPolicy::default();
        let mut rec = Recorder { calls: vec![], fail: false };
        let outcome = policy.dispatch("fist", None, &pose(), Instant::now(), &mut rec);
        assert_eq!(outcome, DispatchOutcome::Unbound);
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn test_failure_is_swallowed_and_not_recorded() {
        let mut policy = DispatchPolicy::default();
        let mut rec = Recorder { calls: vec![], fail: true };
        let action = Action::Builtin(ActionKind::Screenshot);
        let outcome = policy.dispatch("peace", Some(&action), &pose(), Instant::now(), &mut rec);
        assert_eq!(outcome, DispatchOutcome::Failed);
        assert_eq!(policy.last_triggered(), None);
        assert_eq!(policy.last_trigger_time(), None);
    }

    #[test]
    fn test_same_gesture_does_not_refire_after_cooldown() {
        let mut policy = DispatchPolicy::new(Duration::from_millis(500));
        let mut rec = Recorder { calls: vec![], fail: false };
        let action = Action::Builtin(ActionKind::Screenshot);
        let t0 = Instant::now();

        assert!(policy.dispatch("peace", Some(&action), &pose(), t0, &mut rec).executed());
        let later = t0 + Duration::from_secs(5);
        assert_eq!(
            policy.dispatch("peace", Some(&action), &pose(), later, &mut rec),
            DispatchOutcome::AlreadyTriggered
        );
        assert_eq!(rec.calls.len(), 1);
    }
}
