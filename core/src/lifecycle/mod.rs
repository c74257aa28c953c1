//! Per-toast lifecycle state machine.
//!
//! One [`LifecycleController`] per toast drives the
//! enter/visible/paused/exit/removed phases. It is deliberately
//! renderer-agnostic: the renderer is a pure subscriber that reads the
//! state from snapshots and sends close/hover signals back through the
//! orchestrator.

mod controller;
mod state;


pub use controller::{ENTER_DELAY, EXIT_DELAY, LifecycleController};
pub use state::ToastState;
