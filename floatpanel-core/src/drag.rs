//! Drag gesture state machine.
//!
//! `Idle -> Dragging -> Idle`. While dragging, every pointer move places the
//! panel at `start_rect + (dx, dy)` run through [`clamp_position`]. The
//! in-motion cue is switched on at [`begin`](DragController::begin) and off in
//! [`end`](DragController::end), which is also the cancellation path.

use crate::clamp::clamp_position;
use crate::gesture::ActiveGesture;
use floatpanel_api::{PanelSurface, Point, PointerEvent, Rect};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Which element size the drag clamp uses on each move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragSizing {
    /// Re-read the surface's bounding box on every move
    #[default]
    Live,
    /// Use the size captured at gesture start for the whole drag
    Frozen,
}

#[derive(Debug, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(ActiveGesture),
}

/// Converts a pointer-down/move/up sequence into panel position updates.
///
/// # Example
///
/// ```rust
/// use floatpanel_api::{PanelSurface, PointerEvent, Rect, RetainedSurface, Size};
/// use floatpanel_core::drag::{DragController, DragSizing};
///
/// let mut surface = RetainedSurface::new(Rect::new(50.0, 50.0, 400.0, 300.0), Size::new(1920.0, 1080.0));
/// let mut drag = DragController::new(DragSizing::Live);
///
/// assert!(drag.begin(PointerEvent::new(100.0, 100.0), &mut surface));
/// drag.on_move(PointerEvent::new(150.0, 130.0), &mut surface);
/// let committed = drag.end(&mut surface).unwrap();
/// assert_eq!((committed.left, committed.top), (100.0, 80.0));
/// ```
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
    sizing: DragSizing,
}

impl DragController {
    pub fn new(sizing: DragSizing) -> Self {
        Self {
            state: DragState::Idle,
            sizing,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Whether `pointer_id` drives the drag in progress.
    pub fn accepts(&self, pointer_id: u64) -> bool {
        match &self.state {
            DragState::Dragging(gesture) => gesture.accepts(pointer_id),
            DragState::Idle => false,
        }
    }

    pub fn set_sizing(&mut self, sizing: DragSizing) {
        self.sizing = sizing;
    }

    /// Start dragging from `pointer`.
    ///
    /// Pins the surface at its current rectangle with fixed positioning and
    /// turns the visual cue on. Returns `false` and changes nothing if a drag
    /// is already running.
    pub fn begin<S: PanelSurface + ?Sized>(&mut self, pointer: PointerEvent, surface: &mut S) -> bool {
        if self.is_active() {
            trace!("drag already in progress, ignoring pointer-down");
            return false;
        }

        let gesture = ActiveGesture::start(pointer, surface);
        let start = gesture.snapshot().start_rect;
        surface.set_visual_cue(true);
        surface.set_position(start.left, start.top);

        debug!(x = pointer.x, y = pointer.y, left = start.left, top = start.top, "drag started");
        self.state = DragState::Dragging(gesture);
        true
    }

    /// Move the panel to follow `pointer`.
    ///
    /// Returns the position written to the surface, or `None` when idle or
    /// when the sample belongs to another pointer.
    pub fn on_move<S: PanelSurface + ?Sized>(&mut self, pointer: PointerEvent, surface: &mut S) -> Option<Point> {
        let DragState::Dragging(gesture) = &self.state else {
            return None;
        };
        if !gesture.accepts(pointer.pointer_id) {
            return None;
        }

        let snapshot = gesture.snapshot();
        let (dx, dy) = snapshot.delta(pointer);
        let element = match self.sizing {
            DragSizing::Live => surface.bounding_rect().size(),
            DragSizing::Frozen => snapshot.start_rect.size(),
        };
        let position = clamp_position(
            snapshot.start_rect.left + dx,
            snapshot.start_rect.top + dy,
            element,
            surface.viewport_size(),
        );

        surface.set_position(position.x, position.y);
        trace!(left = position.x, top = position.y, "drag move");
        Some(position)
    }

    /// Finish the drag.
    ///
    /// Clears the visual cue, releases the pointer and returns the rectangle
    /// to persist. Calling this while idle is a no-op returning `None`.
    pub fn end<S: PanelSurface + ?Sized>(&mut self, surface: &mut S) -> Option<Rect> {
        let DragState::Dragging(gesture) = std::mem::take(&mut self.state) else {
            return None;
        };

        surface.set_visual_cue(false);
        gesture.finish(surface);

        let rect = surface.bounding_rect();
        debug!(left = rect.left, top = rect.top, "drag ended");
        Some(rect)
    }
}
