//! Orchestrator: the engine's public entry point.
//!
//! Owns the store and one lifecycle controller per toast. Everything is
//! synchronous and run-to-completion: callers (or the bundled async
//! service) invoke operations and drive deadlines via [`ToastEngine::poll`].
//! The store is mutated here and nowhere else - controllers report
//! transitions back instead of touching shared state.

mod options;

#[cfg(test)]
mod engine_tests;

pub use options::{ToastArgs, ToastOptions};

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use herald_types::{Position, ProviderConfig, Severity};

use crate::events::{ToastObserver, ToastSignal};
use crate::lifecycle::{LifecycleController, ToastState};
use crate::scheduler::{Clock, SystemClock};
use crate::store::{Toast, ToastId, ToastStore};

/// Construction-time validation failures. Everything else the engine
/// encounters at runtime (unknown ids, clock hiccups) is deliberately
/// not an error - see the individual operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A zero cap would make every insert evict itself.
    #[error("max visible toasts per position must be at least 1 (got {0})")]
    InvalidMax(usize),
}

/// Toast scheduling engine.
///
/// Explicitly constructed and explicitly owned - no globals - so
/// independent engines (per window, per test) can coexist. Generic over
/// the clock for deterministic tests; production code uses
/// [`SystemClock`] or the service layer's tokio clock.
pub struct ToastEngine<C: Clock = SystemClock> {
    config: ProviderConfig,
    clock: C,
    store: ToastStore,
    controllers: HashMap<ToastId, LifecycleController>,
    observers: Vec<Box<dyn ToastObserver>>,
    pending: Vec<ToastSignal>,
    next_id: u64,
}

impl ToastEngine<SystemClock> {
    pub fn new(config: ProviderConfig) -> Result<Self, EngineError> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> ToastEngine<C> {
    pub fn with_clock(config: ProviderConfig, clock: C) -> Result<Self, EngineError> {
        if config.max == 0 {
            return Err(EngineError::InvalidMax(config.max));
        }
        Ok(Self {
            config,
            clock,
            store: ToastStore::new(),
            controllers: HashMap::new(),
            observers: Vec::new(),
            pending: Vec::new(),
            next_id: 0,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Register an observer for engine signals.
    pub fn add_observer(&mut self, observer: Box<dyn ToastObserver>) {
        self.observers.push(observer);
    }

    // ─── Public operations ───────────────────────────────────────────────────

    /// Open a toast. Missing fields fall back to provider defaults;
    /// inserting beyond the per-position cap evicts the oldest toast in
    /// that position. Returns the generated id.
    pub fn open(&mut self, options: ToastOptions) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;

        let position = options.position.unwrap_or(self.config.position);
        let duration_ms = options.duration_ms.unwrap_or(self.config.duration_ms);

        let now = self.read_clock();
        if now.is_none() {
            warn!(%id, "clock unavailable at open; toast will not auto-dismiss");
        }
        let controller = LifecycleController::new(Duration::from_millis(duration_ms), now);

        let toast = Toast {
            id,
            severity: options.severity.unwrap_or_default(),
            position,
            duration_ms,
            title: options.title,
            description: options.description,
            payload: options.payload,
            closable: options.closable.unwrap_or(true),
            show_icon: options.show_icon.unwrap_or(true),
            show_progress: options.show_progress.unwrap_or(true),
            pause_on_hover: options.pause_on_hover.unwrap_or(true),
            created_at: Utc::now(),
            state: controller.state(),
            progress: 100.0,
        };
        if !toast.is_renderable() {
            warn!(%id, "toast has no title, description or payload; it will render empty");
        }

        if let Some(evicted) = self.store.insert(toast, self.config.max) {
            debug!(id = %evicted.id, position = ?evicted.position, "position at capacity; evicting oldest");
            self.controllers.remove(&evicted.id);
            self.pending.push(ToastSignal::Evicted {
                id: evicted.id,
                position: evicted.position,
            });
        }
        self.controllers.insert(id, controller);
        debug!(%id, ?position, duration_ms, "toast opened");
        self.pending.push(ToastSignal::Opened { id, position });
        self.dispatch();
        id
    }

    /// Info shorthand: description plus a bare title, options, or both.
    pub fn info(&mut self, description: impl Into<String>, args: impl Into<ToastArgs>) -> ToastId {
        self.open_shorthand(Severity::Info, description.into(), args.into())
    }

    /// Success shorthand; see [`Self::info`].
    pub fn success(
        &mut self,
        description: impl Into<String>,
        args: impl Into<ToastArgs>,
    ) -> ToastId {
        self.open_shorthand(Severity::Success, description.into(), args.into())
    }

    /// Warning shorthand; see [`Self::info`].
    pub fn warning(
        &mut self,
        description: impl Into<String>,
        args: impl Into<ToastArgs>,
    ) -> ToastId {
        self.open_shorthand(Severity::Warning, description.into(), args.into())
    }

    /// Error shorthand (danger severity); see [`Self::info`].
    pub fn error(&mut self, description: impl Into<String>, args: impl Into<ToastArgs>) -> ToastId {
        self.open_shorthand(Severity::Danger, description.into(), args.into())
    }

    fn open_shorthand(
        &mut self,
        severity: Severity,
        description: String,
        args: ToastArgs,
    ) -> ToastId {
        self.open(ToastOptions::from_shorthand(severity, description, args))
    }

    /// Merge a partial patch into a live record. Unknown ids are a
    /// benign race with auto-dismissal, silently ignored.
    pub fn update(&mut self, id: ToastId, patch: ToastOptions) {
        let now = self.read_clock();
        let Some(toast) = self.store.get_mut(id) else {
            debug!(%id, "update for unknown toast ignored");
            return;
        };
        if let Some(severity) = patch.severity {
            toast.severity = severity;
        }
        if let Some(position) = patch.position {
            toast.position = position;
        }
        if patch.title.is_some() {
            toast.title = patch.title;
        }
        if patch.description.is_some() {
            toast.description = patch.description;
        }
        if patch.payload.is_some() {
            toast.payload = patch.payload;
        }
        if let Some(closable) = patch.closable {
            toast.closable = closable;
        }
        if let Some(show_icon) = patch.show_icon {
            toast.show_icon = show_icon;
        }
        if let Some(show_progress) = patch.show_progress {
            toast.show_progress = show_progress;
        }
        if let Some(pause_on_hover) = patch.pause_on_hover {
            toast.pause_on_hover = pause_on_hover;
        }
        if let Some(duration_ms) = patch.duration_ms {
            toast.duration_ms = duration_ms;
            if let Some(controller) = self.controllers.get_mut(&id) {
                controller.set_duration(Duration::from_millis(duration_ms), now);
            }
        }
        // A position change re-anchors the record; the destination
        // partition must still honor the cap.
        if let Some(position) = patch.position {
            if let Some(evicted) = self.store.evict_overflow(position, self.config.max) {
                debug!(id = %evicted.id, ?position, "position at capacity after move; evicting oldest");
                self.controllers.remove(&evicted.id);
                self.pending.push(ToastSignal::Evicted {
                    id: evicted.id,
                    position: evicted.position,
                });
            }
        }
        self.pending.push(ToastSignal::Updated { id });
        self.dispatch();
    }

    /// Request the exit transition. Idempotent; unknown ids and toasts
    /// already exiting are ignored.
    pub fn close(&mut self, id: ToastId) {
        let now = self.read_clock();
        self.request_close(id, now);
        self.dispatch();
    }

    /// Request the exit transition for every live toast, across all
    /// positions.
    pub fn close_all(&mut self) {
        let now = self.read_clock();
        for id in self.store.ids() {
            self.request_close(id, now);
        }
        self.dispatch();
    }

    /// Hover pause. Honored only while visible and only when the toast
    /// opted into `pause_on_hover`.
    pub fn pause(&mut self, id: ToastId) {
        let Some(now) = self.read_clock() else {
            return;
        };
        let Some(toast) = self.store.get(id) else {
            debug!(%id, "pause for unknown toast ignored");
            return;
        };
        if !toast.pause_on_hover {
            return;
        }
        let Some(controller) = self.controllers.get_mut(&id) else {
            return;
        };
        if controller.pause(now) {
            let frozen = controller.progress(None);
            if let Some(toast) = self.store.get_mut(id) {
                toast.state = ToastState::Paused;
                toast.progress = frozen;
            }
            self.pending.push(ToastSignal::StateChanged {
                id,
                state: ToastState::Paused,
            });
        }
        self.dispatch();
    }

    /// Hover resume: schedules a fresh countdown for the current
    /// remainder, never the original duration.
    pub fn resume(&mut self, id: ToastId) {
        let Some(now) = self.read_clock() else {
            return;
        };
        let Some(controller) = self.controllers.get_mut(&id) else {
            debug!(%id, "resume for unknown toast ignored");
            return;
        };
        if controller.resume(now) {
            if let Some(toast) = self.store.get_mut(id) {
                toast.state = ToastState::Visible;
            }
            self.pending.push(ToastSignal::StateChanged {
                id,
                state: ToastState::Visible,
            });
        }
        self.dispatch();
    }

    /// Process every deadline that has passed: enter-phase promotions,
    /// natural expiries and exit-phase removals. Toasts are walked in
    /// insertion order, so two toasts expiring in the same tick exit
    /// oldest-first.
    pub fn poll(&mut self) {
        let Some(now) = self.read_clock() else {
            // No reading, no deadline evaluation; everything freezes
            // until the clock recovers.
            return;
        };
        for id in self.store.ids() {
            loop {
                let Some(state) = self
                    .controllers
                    .get_mut(&id)
                    .and_then(|controller| controller.step(now))
                else {
                    break;
                };
                match state {
                    ToastState::Removed => {
                        self.controllers.remove(&id);
                        if let Some(removed) = self.store.remove(id) {
                            debug!(%id, "toast removed");
                            self.pending.push(ToastSignal::Removed {
                                id,
                                position: removed.position,
                            });
                        }
                        break;
                    }
                    state => {
                        if let Some(toast) = self.store.get_mut(id) {
                            toast.state = state;
                        }
                        self.pending.push(ToastSignal::StateChanged { id, state });
                    }
                }
            }
            if let Some(progress) = self
                .controllers
                .get(&id)
                .map(|controller| controller.progress(Some(now)))
            {
                if let Some(toast) = self.store.get_mut(id) {
                    toast.progress = progress;
                }
            }
        }
        self.dispatch();
    }

    // ─── Read-side projections ───────────────────────────────────────────────

    /// Current store contents grouped by position, for the renderer.
    pub fn snapshot(&self) -> Vec<(Position, Vec<Toast>)> {
        self.store.by_position()
    }

    pub fn toast(&self, id: ToastId) -> Option<&Toast> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Earliest deadline any controller is waiting on, as a clock
    /// reading.
    pub fn next_wakeup(&self) -> Option<Duration> {
        self.controllers
            .values()
            .filter_map(|controller| controller.next_deadline())
            .min()
    }

    /// Time from now until the earliest deadline, for driver sleeps.
    /// `None` when nothing is scheduled or the clock is unavailable.
    pub fn time_until_next_wakeup(&self) -> Option<Duration> {
        let now = self.clock.now().ok()?;
        self.next_wakeup().map(|deadline| deadline.saturating_sub(now))
    }

    /// Whether any dismiss countdown is currently running (drives the
    /// progress refresh cadence in the service layer).
    pub fn has_armed_timer(&self) -> bool {
        self.controllers
            .values()
            .any(|controller| controller.has_armed_timer())
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    fn request_close(&mut self, id: ToastId, now: Option<Duration>) {
        let Some(controller) = self.controllers.get_mut(&id) else {
            debug!(%id, "close for unknown toast ignored");
            return;
        };
        if !controller.request_close(now) {
            return;
        }
        if let Some(toast) = self.store.get_mut(id) {
            toast.state = ToastState::Exiting;
        }
        self.pending.push(ToastSignal::StateChanged {
            id,
            state: ToastState::Exiting,
        });
    }

    fn read_clock(&self) -> Option<Duration> {
        match self.clock.now() {
            Ok(now) => Some(now),
            Err(err) => {
                warn!(%err, "clock read failed");
                None
            }
        }
    }

    fn dispatch(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);
        for observer in &mut self.observers {
            observer.handle_signals(&batch);
        }
    }
}
