//! Async service driver.
//!
//! Wraps a [`ToastEngine`] in a tokio task so callers on any thread can
//! open, update and close toasts through a cloneable handle. The task
//! is the sole owner of the engine: commands arrive over an mpsc
//! channel and are applied in order, which preserves the engine's
//! single-writer discipline. Renderers watch a snapshot channel that is
//! republished after every engine mutation or deadline.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use herald_types::{Position, ProviderConfig};

use crate::engine::{EngineError, ToastArgs, ToastEngine, ToastOptions};
use crate::scheduler::{Clock, ClockError};
use crate::store::{Toast, ToastId};

/// Refresh cadence for progress while any countdown is running.
const PROGRESS_TICK: Duration = Duration::from_millis(16);

const COMMAND_BUFFER: usize = 64;

/// What renderers consume: live toasts grouped by position, in display
/// order, empty positions skipped.
pub type Snapshot = Vec<(Position, Vec<Toast>)>;

/// Clock anchored to tokio's virtual-capable time source, so
/// `start_paused` tests drive the whole service deterministically.
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Result<Duration, ClockError> {
        Ok(self.origin.elapsed())
    }
}

/// The service task has shut down and can no longer accept commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("toast service is no longer running")]
pub struct ServiceError;

enum ServiceCommand {
    Open(ToastOptions, oneshot::Sender<ToastId>),
    Update(ToastId, ToastOptions),
    Close(ToastId),
    CloseAll,
    Pause(ToastId),
    Resume(ToastId),
}

/// Handle to communicate with the toast service and observe its state.
///
/// Cheap to clone; dropping every handle closes the command channel and
/// stops the service task.
#[derive(Clone)]
pub struct ToastHandle {
    cmd_tx: mpsc::Sender<ServiceCommand>,
    snapshot_rx: watch::Receiver<Snapshot>,
    config: ProviderConfig,
}

impl ToastHandle {
    /// Open a toast and wait for its generated id.
    pub async fn open(&self, options: ToastOptions) -> Result<ToastId, ServiceError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(ServiceCommand::Open(options, reply_tx))
            .await
            .map_err(|_| ServiceError)?;
        reply_rx.await.map_err(|_| ServiceError)
    }

    pub async fn info(
        &self,
        description: impl Into<String>,
        args: impl Into<ToastArgs>,
    ) -> Result<ToastId, ServiceError> {
        self.open(ToastOptions::from_shorthand(
            herald_types::Severity::Info,
            description.into(),
            args.into(),
        ))
        .await
    }

    pub async fn success(
        &self,
        description: impl Into<String>,
        args: impl Into<ToastArgs>,
    ) -> Result<ToastId, ServiceError> {
        self.open(ToastOptions::from_shorthand(
            herald_types::Severity::Success,
            description.into(),
            args.into(),
        ))
        .await
    }

    pub async fn warning(
        &self,
        description: impl Into<String>,
        args: impl Into<ToastArgs>,
    ) -> Result<ToastId, ServiceError> {
        self.open(ToastOptions::from_shorthand(
            herald_types::Severity::Warning,
            description.into(),
            args.into(),
        ))
        .await
    }

    pub async fn error(
        &self,
        description: impl Into<String>,
        args: impl Into<ToastArgs>,
    ) -> Result<ToastId, ServiceError> {
        self.open(ToastOptions::from_shorthand(
            herald_types::Severity::Danger,
            description.into(),
            args.into(),
        ))
        .await
    }

    /// Merge caller-supplied fields into a live toast.
    pub async fn update(&self, id: ToastId, patch: ToastOptions) -> Result<(), ServiceError> {
        self.send(ServiceCommand::Update(id, patch)).await
    }

    /// Begin a toast's exit transition.
    pub async fn close(&self, id: ToastId) -> Result<(), ServiceError> {
        self.send(ServiceCommand::Close(id)).await
    }

    /// Begin the exit transition for every live toast.
    pub async fn close_all(&self) -> Result<(), ServiceError> {
        self.send(ServiceCommand::CloseAll).await
    }

    /// Suspend a toast's dismiss countdown (hover-enter).
    pub async fn pause(&self, id: ToastId) -> Result<(), ServiceError> {
        self.send(ServiceCommand::Pause(id)).await
    }

    /// Resume a paused countdown with its conserved remaining time.
    pub async fn resume(&self, id: ToastId) -> Result<(), ServiceError> {
        self.send(ServiceCommand::Resume(id)).await
    }

    /// Watch receiver for render state; awaiting `changed()` on it
    /// yields a new snapshot after every engine mutation.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    /// Latest published render state.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Provider configuration the service was spawned with. Renderers
    /// read `gap` and `offset` from here; the engine never touches them.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn send(&self, cmd: ServiceCommand) -> Result<(), ServiceError> {
        self.cmd_tx.send(cmd).await.map_err(|_| ServiceError)
    }
}

/// Spawn the service task on the current tokio runtime.
pub fn spawn(config: ProviderConfig) -> Result<ToastHandle, EngineError> {
    let engine = ToastEngine::with_clock(config.clone(), TokioClock::new())?;
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(Vec::new());
    tokio::spawn(run(engine, cmd_rx, snapshot_tx));
    Ok(ToastHandle {
        cmd_tx,
        snapshot_rx,
        config,
    })
}

async fn run(
    mut engine: ToastEngine<TokioClock>,
    mut cmd_rx: mpsc::Receiver<ServiceCommand>,
    snapshot_tx: watch::Sender<Snapshot>,
) {
    debug!("toast service started");
    let mut progress = tokio::time::interval(PROGRESS_TICK);
    progress.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        engine.poll();
        snapshot_tx.send_replace(engine.snapshot());

        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    // Every handle dropped.
                    break;
                };
                apply(&mut engine, cmd);
            }
            () = sleep_until_deadline(engine.time_until_next_wakeup()) => {}
            // Progress is only worth republishing while a countdown runs.
            _ = progress.tick(), if engine.has_armed_timer() => {}
        }
    }
    debug!("toast service stopped");
}

fn apply(engine: &mut ToastEngine<TokioClock>, cmd: ServiceCommand) {
    match cmd {
        ServiceCommand::Open(options, reply_tx) => {
            let id = engine.open(options);
            // The caller may have given up waiting; that is fine.
            let _ = reply_tx.send(id);
        }
        ServiceCommand::Update(id, patch) => engine.update(id, patch),
        ServiceCommand::Close(id) => engine.close(id),
        ServiceCommand::CloseAll => engine.close_all(),
        ServiceCommand::Pause(id) => engine.pause(id),
        ServiceCommand::Resume(id) => engine.resume(id),
    }
}

/// Sleep until the engine's next deadline, or forever when none is
/// scheduled (a command will wake the loop instead).
async fn sleep_until_deadline(until: Option<Duration>) {
    match until {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}
