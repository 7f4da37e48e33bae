//! State shared by the drag and resize controllers while a gesture runs.
//!
//! A gesture owns two things for its whole lifetime: the [`GestureSnapshot`]
//! taken at pointer-down, and a [`PointerCapture`] handle that keeps the
//! pointer routed to the panel. Both live inside [`ActiveGesture`], which the
//! controllers store in their non-idle state and consume on every exit path,
//! so the capture is released exactly once.

use floatpanel_api::{PanelSurface, Point, PointerEvent, Rect};
use tracing::{debug, trace};

/// Pointer position and panel rectangle at the moment a gesture began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSnapshot {
    pub start_pointer: Point,
    pub start_rect: Rect,
}

impl GestureSnapshot {
    pub fn new(pointer: PointerEvent, start_rect: Rect) -> Self {
        Self {
            start_pointer: Point::new(pointer.x, pointer.y),
            start_rect,
        }
    }

    /// Pointer displacement since gesture start.
    ///
    /// Always measured against the start sample, never the previous move, so
    /// replaying the same pointer position yields the same delta.
    pub fn delta(&self, pointer: PointerEvent) -> (f32, f32) {
        (
            pointer.x - self.start_pointer.x,
            pointer.y - self.start_pointer.y,
        )
    }
}

/// Handle for a pointer captured by the panel for the duration of a gesture.
///
/// Acquiring the handle calls [`PanelSurface::capture_pointer`]; the only way
/// to get rid of it cleanly is [`release`](Self::release), which calls
/// [`PanelSurface::release_pointer`].
#[derive(Debug)]
#[must_use = "a captured pointer must be released when the gesture ends"]
pub struct PointerCapture {
    pointer_id: u64,
    released: bool,
}

impl PointerCapture {
    pub fn acquire<S: PanelSurface + ?Sized>(surface: &mut S, pointer_id: u64) -> Self {
        surface.capture_pointer(pointer_id);
        trace!(pointer_id, "pointer captured");
        Self {
            pointer_id,
            released: false,
        }
    }

    pub fn pointer_id(&self) -> u64 {
        self.pointer_id
    }

    /// Whether events from `pointer_id` belong to this capture.
    pub fn accepts(&self, pointer_id: u64) -> bool {
        self.pointer_id == pointer_id
    }

    pub fn release<S: PanelSurface + ?Sized>(mut self, surface: &mut S) {
        surface.release_pointer(self.pointer_id);
        self.released = true;
        trace!(pointer_id = self.pointer_id, "pointer released");
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        if !self.released {
            debug!(
                pointer_id = self.pointer_id,
                "pointer capture dropped while a gesture was still active"
            );
        }
    }
}

/// Everything a controller owns while it is not idle.
#[derive(Debug)]
pub struct ActiveGesture {
    snapshot: GestureSnapshot,
    capture: PointerCapture,
}

impl ActiveGesture {
    /// Snapshot the surface and capture the pointer.
    pub fn start<S: PanelSurface + ?Sized>(pointer: PointerEvent, surface: &mut S) -> Self {
        let snapshot = GestureSnapshot::new(pointer, surface.bounding_rect());
        let capture = PointerCapture::acquire(surface, pointer.pointer_id);
        Self { snapshot, capture }
    }

    pub fn snapshot(&self) -> &GestureSnapshot {
        &self.snapshot
    }

    pub fn accepts(&self, pointer_id: u64) -> bool {
        self.capture.accepts(pointer_id)
    }

    /// Release the pointer capture, dropping the snapshot.
    pub fn finish<S: PanelSurface + ?Sized>(self, surface: &mut S) {
        self.capture.release(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floatpanel_api::{RetainedSurface, Size};

    fn surface() -> RetainedSurface {
        RetainedSurface::new(Rect::new(50.0, 50.0, 400.0, 300.0), Size::new(1920.0, 1080.0))
    }

    #[test]
    fn test_snapshot_delta_is_relative_to_start() {
        let snapshot = GestureSnapshot::new(PointerEvent::new(100.0, 100.0), Rect::default());
        assert_eq!(snapshot.delta(PointerEvent::new(150.0, 130.0)), (50.0, 30.0));
        assert_eq!(snapshot.delta(PointerEvent::new(150.0, 130.0)), (50.0, 30.0));
        assert_eq!(snapshot.delta(PointerEvent::new(90.0, 100.0)), (-10.0, 0.0));
    }

    #[test]
    fn test_active_gesture_captures_and_releases() {
        let mut surface = surface();
        let gesture = ActiveGesture::start(PointerEvent::new(1.0, 2.0).with_id(9), &mut surface);

        assert_eq!(surface.captured_pointer(), Some(9));
        assert!(gesture.accepts(9));
        assert!(!gesture.accepts(1));
        assert_eq!(gesture.snapshot().start_rect, Rect::new(50.0, 50.0, 400.0, 300.0));

        gesture.finish(&mut surface);
        assert_eq!(surface.captured_pointer(), None);
    }
}
