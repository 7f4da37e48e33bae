//! Viewport bounds clamping for panel positions.
//!
//! A panel's top-left corner is kept inside `[0, viewport - element]` on each
//! axis. When the panel is larger than the viewport the upper bound collapses
//! to zero, so the panel is pinned to the top-left edge and overflows to the
//! right/bottom instead of getting negative coordinates.

use floatpanel_api::{Point, Size};

/// Compute the legal top-left position closest to `(desired_left, desired_top)`.
///
/// # Example
///
/// ```rust
/// use floatpanel_api::{Point, Size};
/// use floatpanel_core::clamp::clamp_position;
///
/// let position = clamp_position(750.0, -20.0, Size::new(400.0, 300.0), Size::new(800.0, 600.0));
/// assert_eq!(position, Point::new(400.0, 0.0));
/// ```
pub fn clamp_position(desired_left: f32, desired_top: f32, element: Size, viewport: Size) -> Point {
    Point::new(
        clamp_axis(desired_left, element.width, viewport.width),
        clamp_axis(desired_top, element.height, viewport.height),
    )
}

/// Clamp one coordinate to `[0, max(0, viewport_extent - element_extent)]`.
pub fn clamp_axis(desired: f32, element_extent: f32, viewport_extent: f32) -> f32 {
    let upper = (viewport_extent - element_extent).max(0.0);
    desired.max(0.0).min(upper)
}
