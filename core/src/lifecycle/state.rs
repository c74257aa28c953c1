use serde::{Deserialize, Serialize};

/// Lifecycle phase of a single toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastState {
    /// Inserted, waiting out the short presentation delay so enter
    /// animation classes can apply before first paint.
    Entering,
    /// On screen; the dismiss timer (if any) is counting.
    Visible,
    /// On screen with the dismiss timer suspended (pointer hover).
    Paused,
    /// Exit animation playing; removal is already scheduled.
    Exiting,
    /// Terminal. The record has left the store; no transition leaves
    /// this state.
    Removed,
}

impl ToastState {
    /// States from which an explicit close is still honored.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            ToastState::Entering | ToastState::Visible | ToastState::Paused
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ToastState::Removed)
    }
}
