use std::time::Duration;

use crate::scheduler::DismissTimer;

use super::ToastState;

/// Presentation delay before an entering toast becomes visible. The
/// dismiss timer starts counting only once the toast is visible.
pub const ENTER_DELAY: Duration = Duration::from_millis(50);

/// How long the exit animation plays before the record is dropped.
pub const EXIT_DELAY: Duration = Duration::from_millis(300);

/// State machine for one toast.
///
/// The controller never touches the store: it reports transitions and
/// the orchestrator applies them, which keeps the store single-writer.
/// All methods take clock readings from the caller; `None` means the
/// host clock failed, which degrades gracefully (see [`Self::new`] and
/// [`Self::request_close`]).
#[derive(Debug)]
pub struct LifecycleController {
    state: ToastState,
    timer: DismissTimer,
    /// Deadline of the pending enter or exit phase, if one is running.
    phase_deadline: Option<Duration>,
    /// The clock was unavailable when the timer should have been armed;
    /// the toast stays up until explicitly closed.
    degraded: bool,
}

impl LifecycleController {
    /// Start a lifecycle in `Entering`.
    ///
    /// Without a clock reading the enter phase cannot be timed, so the
    /// toast goes straight to `Visible` and never auto-dismisses.
    pub fn new(duration: Duration, now: Option<Duration>) -> Self {
        match now {
            Some(now) => Self {
                state: ToastState::Entering,
                timer: DismissTimer::new(duration),
                phase_deadline: Some(now + ENTER_DELAY),
                degraded: false,
            },
            None => Self {
                state: ToastState::Visible,
                timer: DismissTimer::new(Duration::ZERO),
                phase_deadline: None,
                degraded: true,
            },
        }
    }

    pub fn state(&self) -> ToastState {
        self.state
    }

    /// Advance one time-driven transition whose deadline has passed,
    /// returning the new state. Callers loop until `None`, so a large
    /// clock jump crosses several phases in a single poll.
    pub fn step(&mut self, now: Duration) -> Option<ToastState> {
        match self.state {
            ToastState::Entering => {
                if self.phase_deadline.is_none_or(|d| now >= d) {
                    self.phase_deadline = None;
                    self.state = ToastState::Visible;
                    self.timer.arm(now);
                    return Some(self.state);
                }
                None
            }
            ToastState::Visible => {
                if self.timer.fired(now) {
                    self.timer.expire();
                    self.state = ToastState::Exiting;
                    self.phase_deadline = Some(now + EXIT_DELAY);
                    return Some(self.state);
                }
                None
            }
            ToastState::Paused => None,
            ToastState::Exiting => {
                if self.phase_deadline.is_none_or(|d| now >= d) {
                    self.phase_deadline = None;
                    self.state = ToastState::Removed;
                    return Some(self.state);
                }
                None
            }
            ToastState::Removed => None,
        }
    }

    /// Explicit close, honored from any non-terminal, non-exiting
    /// state. Cancels the pending dismiss timer before the exit phase
    /// begins, so a canceled deadline can never fire afterwards.
    ///
    /// Returns false when already exiting or removed (idempotent).
    pub fn request_close(&mut self, now: Option<Duration>) -> bool {
        if !self.state.is_live() {
            return false;
        }
        self.timer.cancel();
        self.state = ToastState::Exiting;
        // Without a reading the exit animation cannot be timed; the
        // next poll removes the record immediately.
        self.phase_deadline = now.map(|n| n + EXIT_DELAY);
        true
    }

    /// Hover pause. Only meaningful while visible; the timer callback
    /// is canceled, not merely ignored, so a stale fire cannot race a
    /// later resume.
    pub fn pause(&mut self, now: Duration) -> bool {
        if self.state != ToastState::Visible {
            return false;
        }
        self.timer.pause(now);
        self.state = ToastState::Paused;
        true
    }

    /// Hover resume: a fresh countdown for the *current* remainder.
    pub fn resume(&mut self, now: Duration) -> bool {
        if self.state != ToastState::Paused {
            return false;
        }
        self.state = ToastState::Visible;
        if !self.degraded {
            self.timer.arm(now);
        }
        true
    }

    /// Apply a caller-supplied duration change. Consumed time is kept;
    /// the new duration only affects remaining-time math from here on.
    pub fn set_duration(&mut self, duration: Duration, now: Option<Duration>) {
        if self.degraded || !self.state.is_live() {
            return;
        }
        self.timer.set_duration(duration, now);
    }

    /// Remaining-time percentage for renderer consumption. Derived
    /// only - reading it never causes a transition.
    pub fn progress(&self, now: Option<Duration>) -> f32 {
        match self.state {
            ToastState::Visible => self.timer.progress(now),
            // Frozen while paused or still entering.
            ToastState::Entering | ToastState::Paused => self.timer.progress(None),
            ToastState::Exiting | ToastState::Removed => 0.0,
        }
    }

    /// Earliest deadline this controller is waiting on, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.phase_deadline, self.timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether the dismiss countdown is currently running.
    pub fn has_armed_timer(&self) -> bool {
        self.state == ToastState::Visible && self.timer.is_armed()
    }
}
