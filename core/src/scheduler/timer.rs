//! Auto-dismiss timer with pause/resume bookkeeping.

use std::time::Duration;

/// Remaining-time budget for one toast's auto-dismissal.
///
/// The invariant that matters: total time spent armed before the
/// deadline fires always equals the original duration, no matter how
/// many pause/resume cycles happen in between. Pausing snapshots the
/// elapsed slice into `remaining`; re-arming schedules whatever is
/// left, never the full duration again.
///
/// A zero total means "never auto-dismiss": [`DismissTimer::arm`] is a
/// no-op and no deadline ever exists.
#[derive(Debug)]
pub struct DismissTimer {
    /// Current duration budget. Updated when the caller changes a live
    /// toast's duration.
    total: Duration,
    /// Budget left, excluding the currently running slice.
    remaining: Duration,
    /// Clock reading when the timer was last armed, while armed.
    armed_at: Option<Duration>,
    deadline: Option<Duration>,
}

impl DismissTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            total: duration,
            remaining: duration,
            armed_at: None,
            deadline: None,
        }
    }

    /// Start (or restart after a pause) the countdown for the current
    /// remainder. No-op for zero-duration timers.
    pub fn arm(&mut self, now: Duration) {
        if self.total.is_zero() {
            return;
        }
        self.armed_at = Some(now);
        self.deadline = Some(now + self.remaining);
    }

    /// Suspend the countdown, folding the elapsed slice into
    /// `remaining`. No-op if not armed.
    pub fn pause(&mut self, now: Duration) {
        if let Some(at) = self.armed_at.take() {
            self.remaining = self.remaining.saturating_sub(now.saturating_sub(at));
        }
        self.deadline = None;
    }

    /// Drop the pending deadline. Idempotent: canceling an unarmed,
    /// already-fired or already-canceled timer is a no-op.
    pub fn cancel(&mut self) {
        self.armed_at = None;
        self.deadline = None;
    }

    /// Mark the budget as fully consumed (natural expiry).
    pub fn expire(&mut self) {
        self.remaining = Duration::ZERO;
        self.armed_at = None;
        self.deadline = None;
    }

    /// Whether the deadline has been reached at `now`.
    pub fn fired(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Replace the duration budget. Time already consumed is kept: the
    /// new remainder is `duration - consumed`, clamped at zero (which
    /// makes an armed timer fire on the next poll). A zero duration
    /// disarms the timer for good.
    pub fn set_duration(&mut self, duration: Duration, now: Option<Duration>) {
        let consumed = self.consumed(now);
        self.total = duration;
        if duration.is_zero() {
            self.remaining = Duration::ZERO;
            self.armed_at = None;
            self.deadline = None;
            return;
        }
        self.remaining = duration.saturating_sub(consumed);
        if self.armed_at.is_some() {
            if let Some(now) = now {
                self.armed_at = Some(now);
                self.deadline = Some(now + self.remaining);
            }
        }
    }

    /// Remaining budget as a percentage, 100.0 (untouched) down to 0.0.
    ///
    /// Passing `None` for `now` freezes the value at the last
    /// pause/arm boundary - used while paused and when the clock fails.
    pub fn progress(&self, now: Option<Duration>) -> f32 {
        if self.total.is_zero() {
            return 100.0;
        }
        let consumed = self.consumed(now).min(self.total);
        let fraction = consumed.as_secs_f64() / self.total.as_secs_f64();
        (100.0 * (1.0 - fraction)).clamp(0.0, 100.0) as f32
    }

    /// Total time consumed so far, including the currently running
    /// slice when armed and a reading is available.
    fn consumed(&self, now: Option<Duration>) -> Duration {
        let settled = self.total.saturating_sub(self.remaining);
        let running = match (self.armed_at, now) {
            (Some(at), Some(now)) => now.saturating_sub(at).min(self.remaining),
            _ => Duration::ZERO,
        };
        settled + running
    }
}
