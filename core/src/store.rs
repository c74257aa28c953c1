//! Notification store.
//!
//! Insertion-ordered collection of active toast records, partitioned by
//! screen position. The orchestrator is the only writer; everything
//! else sees read-time projections. Grouping by position is computed on
//! demand, never stored redundantly.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use herald_types::{Position, Severity};

use crate::lifecycle::ToastState;

/// Opaque toast identifier, unique across all positions for the life
/// of an engine. Generated by the orchestrator; callers only ever hand
/// it back for `update`/`close`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ToastId(pub(crate) u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// A single active toast record.
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub severity: Severity,
    pub position: Position,
    /// Auto-dismiss budget in milliseconds; 0 means never.
    pub duration_ms: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Opaque caller data (icon, action payload, anything). Never
    /// inspected beyond the renderability check at open.
    pub payload: Option<serde_json::Value>,
    pub closable: bool,
    pub show_icon: bool,
    pub show_progress: bool,
    pub pause_on_hover: bool,
    pub created_at: DateTime<Utc>,
    pub state: ToastState,
    /// Remaining-time percentage, 100.0 down to 0.0, refreshed on every
    /// poll. Renderer consumption only.
    pub progress: f32,
}

impl Toast {
    /// A toast with no title, description or payload is legal but
    /// almost certainly a caller bug; the orchestrator warns on open.
    pub fn is_renderable(&self) -> bool {
        self.title.is_some() || self.description.is_some() || self.payload.is_some()
    }
}

/// Record collection with per-position capacity.
///
/// Records are kept in one flat insertion-ordered sequence; positions
/// are projections over it, which makes "oldest in this position" and
/// global iteration order trivially consistent.
#[derive(Debug, Default)]
pub struct ToastStore {
    records: Vec<Toast>,
}

impl ToastStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. If its position partition is at `max`, the
    /// oldest record in that same position is evicted first and
    /// returned - a flood of new toasts never loses the newest one.
    pub fn insert(&mut self, toast: Toast, max: usize) -> Option<Toast> {
        debug_assert!(
            self.get(toast.id).is_none(),
            "duplicate toast id {}",
            toast.id
        );
        let evicted = if self.position_len(toast.position) >= max {
            self.records
                .iter()
                .position(|t| t.position == toast.position)
                .map(|idx| self.records.remove(idx))
        } else {
            None
        };
        self.records.push(toast);
        evicted
    }

    /// Evict the oldest record in `position` if the partition holds
    /// more than `max`. Re-anchoring a record via update can overfill a
    /// partition; this restores the cap.
    pub fn evict_overflow(&mut self, position: Position, max: usize) -> Option<Toast> {
        if self.position_len(position) <= max {
            return None;
        }
        self.records
            .iter()
            .position(|t| t.position == position)
            .map(|idx| self.records.remove(idx))
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.records.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: ToastId) -> Option<&mut Toast> {
        self.records.iter_mut().find(|t| t.id == id)
    }

    pub fn remove(&mut self, id: ToastId) -> Option<Toast> {
        let idx = self.records.iter().position(|t| t.id == id)?;
        Some(self.records.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position_len(&self, position: Position) -> usize {
        self.records.iter().filter(|t| t.position == position).count()
    }

    /// Live ids in insertion order, oldest first. This is the iteration
    /// order for polling, which makes same-tick expiry deterministic.
    pub fn ids(&self) -> Vec<ToastId> {
        self.records.iter().map(|t| t.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.records.iter()
    }

    /// Read-time projection grouped by position, in display order.
    /// Empty positions are skipped.
    pub fn by_position(&self) -> Vec<(Position, Vec<Toast>)> {
        Position::ALL
            .iter()
            .filter_map(|&position| {
                let group: Vec<Toast> = self
                    .records
                    .iter()
                    .filter(|t| t.position == position)
                    .cloned()
                    .collect();
                (!group.is_empty()).then_some((position, group))
            })
            .collect()
    }
}
