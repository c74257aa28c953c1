use herald_types::Position;

use crate::lifecycle::ToastState;
use crate::store::ToastId;

/// Signals emitted by the engine for cross-cutting concerns.
/// These represent "interesting things that happened" at a higher level
/// than individual field mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum ToastSignal {
    /// A toast was validated, inserted and its lifecycle started.
    Opened { id: ToastId, position: Position },

    /// A toast was force-removed because its position partition hit the
    /// capacity cap. Eviction skips the exit animation.
    Evicted { id: ToastId, position: Position },

    /// Caller-supplied fields were merged into a live record.
    Updated { id: ToastId },

    /// A lifecycle transition fired (promotion to visible, pause,
    /// resume, exit).
    StateChanged { id: ToastId, state: ToastState },

    /// Terminal removal; the record has left the store.
    Removed { id: ToastId, position: Position },
}
