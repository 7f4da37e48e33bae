//! Input and notification events exchanged with the host.
//!
//! [`PointerEvent`] flows from the host into the engine. [`PanelEvent`] flows
//! the other way: the panel queues one for every observable change and the
//! host drains them at its own pace.
//!
//! # Example
//!
//! ```rust
//! use floatpanel_api::{GestureKind, PanelEvent, Rect};
//!
//! let event = PanelEvent::GeometryCommitted {
//!     gesture: GestureKind::Drag,
//!     rect: Rect::new(100.0, 80.0, 400.0, 300.0),
//! };
//! assert_eq!(event.name(), "geometry_committed");
//! ```

use crate::{Rect, VisibilityState};
use serde::{Deserialize, Serialize};

/// A pointer sample in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Identifier of the pointer that produced the sample
    pub pointer_id: u64,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    /// A sample from the primary pointer (id 0).
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pointer_id: 0,
            x,
            y,
        }
    }

    pub fn with_id(mut self, pointer_id: u64) -> Self {
        self.pointer_id = pointer_id;
        self
    }
}

/// Which kind of gesture a controller is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureKind {
    Drag,
    Resize,
}

impl GestureKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            GestureKind::Drag => "drag",
            GestureKind::Resize => "resize",
        }
    }
}

/// The two kinds of content a panel can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// A row in the panel's vertical flow
    Row,
    /// An absolutely positioned element
    Element,
}

impl ContentKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ContentKind::Row => "row",
            ContentKind::Element => "element",
        }
    }
}

/// Notification emitted by a floating panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PanelEvent {
    /// The panel was shown or hidden
    VisibilityChanged(VisibilityState),
    /// A drag or resize gesture began
    GestureStarted { gesture: GestureKind },
    /// A gesture ended and its final rectangle was handed to storage
    GeometryCommitted { gesture: GestureKind, rect: Rect },
    /// Content with an already registered id was not added
    DuplicateSkipped { kind: ContentKind, id: String },
    /// Persisted geometry for the panel was cleared
    StateReset,
}

impl PanelEvent {
    /// Stable snake_case name, handy for logging.
    pub fn name(&self) -> &'static str {
        match self {
            PanelEvent::VisibilityChanged(_) => "visibility_changed",
            PanelEvent::GestureStarted { .. } => "gesture_started",
            PanelEvent::GeometryCommitted { .. } => "geometry_committed",
            PanelEvent::DuplicateSkipped { .. } => "duplicate_skipped",
            PanelEvent::StateReset => "state_reset",
        }
    }

    /// Whether the host should surface this event as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, PanelEvent::DuplicateSkipped { .. })
    }
}
