//! Engine signals and observer plumbing.
//!
//! Every mutation the engine performs is reported as a batch of
//! [`ToastSignal`]s, dispatched to registered observers once the store
//! mutation is already visible in snapshots. One batch corresponds to
//! one engine operation (an open, a close, one poll pass, ...).

mod signal;

pub use signal::ToastSignal;

/// Receives signal batches emitted by the engine.
pub trait ToastObserver: Send {
    fn handle_signals(&mut self, signals: &[ToastSignal]);
}
