//! Shared vocabulary for the HERALD toast engine.
//!
//! These types are consumed by both the scheduling core and renderers,
//! so they live apart from the engine: screen positions, severities,
//! the animation-edge hint, and provider-wide defaults.

use serde::{Deserialize, Serialize};

/// Screen anchor a toast stack is pinned to.
///
/// Each position is an independent partition: ordering and the
/// per-position cap apply within one anchor, never across anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Position {
    /// All positions in a stable display order (top row first, left to right).
    pub const ALL: [Position; 6] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Screen edge the enter/exit animation slides from.
    ///
    /// Side columns slide horizontally; center columns slide from the
    /// vertical edge they are anchored to.
    pub fn slide_edge(&self) -> SlideEdge {
        match self {
            Position::TopLeft | Position::BottomLeft => SlideEdge::Left,
            Position::TopRight | Position::BottomRight => SlideEdge::Right,
            Position::TopCenter => SlideEdge::Top,
            Position::BottomCenter => SlideEdge::Bottom,
        }
    }

    /// Whether the anchor is on the top row.
    pub fn is_top(&self) -> bool {
        matches!(
            self,
            Position::TopLeft | Position::TopCenter | Position::TopRight
        )
    }
}

/// Edge a toast slides in from and out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Severity of a toast.
///
/// Presentational only - the scheduler never consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

/// Provider-wide defaults, applied to any toast that does not override them.
///
/// `gap` and `offset` are passed through to the renderer untouched; the
/// engine only acts on `position`, `duration_ms` and `max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Default screen anchor.
    pub position: Position,
    /// Default auto-dismiss duration in milliseconds. `0` disables
    /// auto-dismissal entirely.
    pub duration_ms: u64,
    /// Maximum visible toasts per position. Inserting beyond the cap
    /// evicts the oldest toast in that position. Must be at least 1.
    pub max: usize,
    /// Gap between stacked toasts, in pixels.
    pub gap: u32,
    /// Offset from the screen edges, in pixels.
    pub offset: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            position: Position::TopRight,
            duration_ms: 5000,
            max: 5,
            gap: 12,
            offset: 16,
        }
    }
}
