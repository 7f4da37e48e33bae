//! The surface a floating panel is drawn on.
//!
//! The engine never renders anything itself. It reads the panel's current
//! bounding box and the viewport size from a [`PanelSurface`] and pushes
//! one-way style writes back into it. Hosts implement the trait over their
//! own widget tree; [`RetainedSurface`] is a ready-made implementation that
//! simply records the writes so an immediate-mode renderer can read them back
//! each frame.
//!
//! # Example
//!
//! ```rust
//! use floatpanel_api::{PanelSurface, Rect, RetainedSurface, Size};
//!
//! let mut surface = RetainedSurface::new(Rect::new(0.0, 0.0, 400.0, 300.0), Size::new(1920.0, 1080.0));
//! surface.set_position(120.0, 40.0);
//! assert_eq!(surface.bounding_rect().left, 120.0);
//! assert!(surface.is_positioned());
//! ```

use crate::{Rect, Size, VisibilityState};

/// Presentation-layer collaborator driven by the geometry engine.
///
/// Setters are fire-and-forget style mutations and are assumed to always
/// succeed.
pub trait PanelSurface {
    /// Current on-screen geometry of the panel surface.
    fn bounding_rect(&self) -> Rect;

    /// Current viewport dimensions.
    fn viewport_size(&self) -> Size;

    /// Place the panel's top-left corner at `(left, top)` using fixed
    /// (viewport-relative) positioning.
    fn set_position(&mut self, left: f32, top: f32);

    fn set_size(&mut self, width: f32, height: f32);

    /// Toggle the transient "in motion" styling shown while dragging.
    fn set_visual_cue(&mut self, active: bool);

    fn set_visibility(&mut self, state: VisibilityState);

    /// Route all further events of `pointer_id` to this surface until
    /// [`release_pointer`](Self::release_pointer) is called.
    fn capture_pointer(&mut self, pointer_id: u64) {
        let _ = pointer_id;
    }

    fn release_pointer(&mut self, pointer_id: u64) {
        let _ = pointer_id;
    }
}

/// A surface that stores every style write in plain fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedSurface {
    rect: Rect,
    viewport: Size,
    visual_cue: bool,
    visibility: VisibilityState,
    positioned: bool,
    captured_pointer: Option<u64>,
}

impl RetainedSurface {
    /// Create a surface laid out at `rect` inside a viewport of `viewport`.
    ///
    /// The surface starts hidden and in flow layout, i.e. not pinned to a
    /// fixed position until the first [`PanelSurface::set_position`].
    pub fn new(rect: Rect, viewport: Size) -> Self {
        Self {
            rect,
            viewport,
            visual_cue: false,
            visibility: VisibilityState::Hidden,
            positioned: false,
            captured_pointer: None,
        }
    }

    /// Update the viewport after the host window was resized.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Move the surface as the host's layout would, without switching it to
    /// fixed positioning.
    pub fn set_layout_position(&mut self, left: f32, top: f32) {
        if !self.positioned {
            self.rect = self.rect.with_position(left, top);
        }
    }

    pub fn visual_cue(&self) -> bool {
        self.visual_cue
    }

    pub fn visibility(&self) -> VisibilityState {
        self.visibility
    }

    /// Whether the surface has been switched to fixed positioning.
    pub fn is_positioned(&self) -> bool {
        self.positioned
    }

    pub fn captured_pointer(&self) -> Option<u64> {
        self.captured_pointer
    }
}

impl PanelSurface for RetainedSurface {
    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn set_position(&mut self, left: f32, top: f32) {
        self.positioned = true;
        self.rect = self.rect.with_position(left, top);
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.rect = self.rect.with_size(width, height);
    }

    fn set_visual_cue(&mut self, active: bool) {
        self.visual_cue = active;
    }

    fn set_visibility(&mut self, state: VisibilityState) {
        self.visibility = state;
    }

    fn capture_pointer(&mut self, pointer_id: u64) {
        self.captured_pointer = Some(pointer_id);
    }

    fn release_pointer(&mut self, pointer_id: u64) {
        if self.captured_pointer == Some(pointer_id) {
            self.captured_pointer = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RetainedSurface {
        RetainedSurface::new(Rect::new(10.0, 10.0, 400.0, 300.0), Size::new(800.0, 600.0))
    }

    #[test]
    fn test_retained_surface_defaults() {
        let surface = surface();
        assert_eq!(surface.visibility(), VisibilityState::Hidden);
        assert!(!surface.visual_cue());
        assert!(!surface.is_positioned());
        assert_eq!(surface.captured_pointer(), None);
    }

    #[test]
    fn test_layout_position_ignored_once_positioned() {
        let mut surface = surface();
        surface.set_layout_position(30.0, 40.0);
        assert_eq!(surface.bounding_rect().position().x, 30.0);

        surface.set_position(100.0, 100.0);
        surface.set_layout_position(0.0, 0.0);
        assert_eq!(surface.bounding_rect(), Rect::new(100.0, 100.0, 400.0, 300.0));
    }

    #[test]
    fn test_release_only_matching_pointer() {
        let mut surface = surface();
        surface.capture_pointer(3);
        surface.release_pointer(4);
        assert_eq!(surface.captured_pointer(), Some(3));
        surface.release_pointer(3);
        assert_eq!(surface.captured_pointer(), None);
    }
}
