//! Resize gesture state machine.
//!
//! Structured like [`DragController`](crate::drag::DragController) but drives
//! width and height. The panel grows from its fixed top-left corner; size is
//! floored at the configured minimum and has no viewport ceiling.

use crate::gesture::ActiveGesture;
use floatpanel_api::{PanelSurface, PointerEvent, Rect, Size};
use tracing::{debug, trace};

/// Smallest width a panel can be resized to.
pub const MIN_WIDTH: f32 = 100.0;
/// Smallest height a panel can be resized to.
pub const MIN_HEIGHT: f32 = 80.0;

#[derive(Debug, Default)]
enum ResizeState {
    #[default]
    Idle,
    Resizing(ActiveGesture),
}

/// Converts a pointer gesture on the resize handle into size updates.
///
/// # Example
///
/// ```rust
/// use floatpanel_api::{PointerEvent, Rect, RetainedSurface, Size};
/// use floatpanel_core::resize::ResizeController;
///
/// let mut surface = RetainedSurface::new(Rect::new(0.0, 0.0, 300.0, 200.0), Size::new(800.0, 600.0));
/// let mut resize = ResizeController::default();
///
/// resize.begin(PointerEvent::new(300.0, 200.0), &mut surface);
/// let size = resize.on_move(PointerEvent::new(50.0, 50.0), &mut surface).unwrap();
/// assert_eq!(size, Size::new(100.0, 80.0));
/// ```
#[derive(Debug)]
pub struct ResizeController {
    state: ResizeState,
    min_size: Size,
}

impl Default for ResizeController {
    fn default() -> Self {
        Self::new(Size::new(MIN_WIDTH, MIN_HEIGHT))
    }
}

impl ResizeController {
    pub fn new(min_size: Size) -> Self {
        Self {
            state: ResizeState::Idle,
            min_size,
        }
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ResizeState::Resizing(_))
    }

    pub fn accepts(&self, pointer_id: u64) -> bool {
        match &self.state {
            ResizeState::Resizing(gesture) => gesture.accepts(pointer_id),
            ResizeState::Idle => false,
        }
    }

    /// Start resizing from `pointer`, capturing the current width and height.
    pub fn begin<S: PanelSurface + ?Sized>(&mut self, pointer: PointerEvent, surface: &mut S) -> bool {
        if self.is_active() {
            trace!("resize already in progress, ignoring pointer-down");
            return false;
        }

        let gesture = ActiveGesture::start(pointer, surface);
        let start = gesture.snapshot().start_rect;
        debug!(width = start.width, height = start.height, "resize started");
        self.state = ResizeState::Resizing(gesture);
        true
    }

    /// Resize to follow `pointer`; returns the size written to the surface.
    pub fn on_move<S: PanelSurface + ?Sized>(&mut self, pointer: PointerEvent, surface: &mut S) -> Option<Size> {
        let ResizeState::Resizing(gesture) = &self.state else {
            return None;
        };
        if !gesture.accepts(pointer.pointer_id) {
            return None;
        }

        let snapshot = gesture.snapshot();
        let (dx, dy) = snapshot.delta(pointer);
        let size = Size::new(
            (snapshot.start_rect.width + dx).max(self.min_size.width),
            (snapshot.start_rect.height + dy).max(self.min_size.height),
        );

        surface.set_size(size.width, size.height);
        trace!(width = size.width, height = size.height, "resize move");
        Some(size)
    }

    /// Finish the resize and return the rectangle to persist.
    pub fn end<S: PanelSurface + ?Sized>(&mut self, surface: &mut S) -> Option<Rect> {
        let ResizeState::Resizing(gesture) = std::mem::take(&mut self.state) else {
            return None;
        };

        gesture.finish(surface);

        let rect = surface.bounding_rect();
        debug!(width = rect.width, height = rect.height, "resize ended");
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floatpanel_api::{Point, RetainedSurface};

    fn surface() -> RetainedSurface {
        RetainedSurface::new(Rect::new(20.0, 30.0, 300.0, 200.0), Size::new(800.0, 600.0))
    }

    #[test]
    fn test_resize_grows_from_top_left() {
        let mut surface = surface();
        let mut resize = ResizeController::default();
        resize.begin(PointerEvent::new(320.0, 230.0), &mut surface);

        let size = resize.on_move(PointerEvent::new(420.0, 260.0), &mut surface);
        assert_eq!(size, Some(Size::new(400.0, 230.0)));
        assert_eq!(surface.bounding_rect().position(), Point::new(20.0, 30.0));
    }

    #[test]
    fn test_resize_floors_at_minimum() {
        let mut surface = surface();
        let mut resize = ResizeController::default();
        resize.begin(PointerEvent::new(0.0, 0.0), &mut surface);

        let size = resize.on_move(PointerEvent::new(-250.0, -150.0), &mut surface);
        assert_eq!(size, Some(Size::new(100.0, 80.0)));
    }

    #[test]
    fn test_resize_floor_holds_for_any_delta() {
        let mut surface = surface();
        let mut resize = ResizeController::default();
        resize.begin(PointerEvent::new(0.0, 0.0), &mut surface);

        for step in -20..=20 {
            let d = step as f32 * 37.5;
            let size = resize.on_move(PointerEvent::new(d, -d), &mut surface).unwrap();
            assert!(size.width >= MIN_WIDTH);
            assert!(size.height >= MIN_HEIGHT);
        }
    }

    #[test]
    fn test_resize_has_no_viewport_ceiling() {
        let mut surface = surface();
        let mut resize = ResizeController::default();
        resize.begin(PointerEvent::new(0.0, 0.0), &mut surface);

        let size = resize.on_move(PointerEvent::new(2000.0, 2000.0), &mut surface);
        assert_eq!(size, Some(Size::new(2300.0, 2200.0)));
    }

    #[test]
    fn test_custom_minimum() {
        let mut surface = surface();
        let mut resize = ResizeController::new(Size::new(250.0, 150.0));
        resize.begin(PointerEvent::new(0.0, 0.0), &mut surface);

        let size = resize.on_move(PointerEvent::new(-100.0, -100.0), &mut surface);
        assert_eq!(size, Some(Size::new(250.0, 150.0)));
    }

    #[test]
    fn test_end_commits_and_releases() {
        let mut surface = surface();
        let mut resize = ResizeController::default();
        resize.begin(PointerEvent::new(0.0, 0.0).with_id(4), &mut surface);
        assert_eq!(surface.captured_pointer(), Some(4));

        resize.on_move(PointerEvent::new(10.0, 20.0).with_id(4), &mut surface);
        let rect = resize.end(&mut surface);

        assert_eq!(rect, Some(Rect::new(20.0, 30.0, 310.0, 220.0)));
        assert_eq!(surface.captured_pointer(), None);
        assert!(!resize.is_active());
        assert_eq!(resize.end(&mut surface), None);
    }

    #[test]
    fn test_resize_does_not_touch_visual_cue() {
        let mut surface = surface();
        let mut resize = ResizeController::default();
        resize.begin(PointerEvent::new(0.0, 0.0), &mut surface);
        assert!(!surface.visual_cue());
        resize.end(&mut surface);
        assert!(!surface.visual_cue());
    }
}
