//! Timer primitives for auto-dismissal.
//!
//! The engine never reads the wall clock directly: all scheduling math
//! goes through the [`Clock`] trait so tests can drive time by hand.
//! [`DismissTimer`] owns the remaining-time arithmetic for one toast;
//! it does not schedule anything itself - the orchestrator compares its
//! deadline against clock readings on every poll.

mod clock;
mod timer;


pub use clock::{Clock, ClockError, ManualClock, SystemClock};
pub use timer::DismissTimer;
