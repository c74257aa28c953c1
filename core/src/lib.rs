pub mod engine;
pub mod events;
pub mod lifecycle;
pub mod scheduler;
pub mod service;
pub mod store;

// Re-exports for convenience
pub use engine::{EngineError, ToastArgs, ToastEngine, ToastOptions};
pub use events::{ToastObserver, ToastSignal};
pub use lifecycle::{ENTER_DELAY, EXIT_DELAY, LifecycleController, ToastState};
pub use scheduler::{Clock, ClockError, DismissTimer, ManualClock, SystemClock};
pub use service::{ServiceError, Snapshot, ToastHandle, TokioClock, spawn};
pub use store::{Toast, ToastId, ToastStore};

pub use herald_types::{Position, ProviderConfig, Severity, SlideEdge};
