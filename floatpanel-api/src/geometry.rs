//! Geometry value types shared by the engine and the presentation layer.
//!
//! All coordinates are pixel offsets relative to the viewport's top-left
//! corner. The types are plain `Copy` values; nothing here talks to a
//! renderer.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// On-screen rectangle of a panel surface.
///
/// # Example
///
/// ```rust
/// use floatpanel_api::Rect;
///
/// let rect = Rect::new(50.0, 50.0, 400.0, 300.0);
/// assert_eq!(rect.right(), 450.0);
/// assert_eq!(rect.bottom(), 350.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Same size, moved so the top-left corner sits at `(left, top)`.
    pub fn with_position(self, left: f32, top: f32) -> Self {
        Self { left, top, ..self }
    }

    /// Same top-left corner, new size.
    pub fn with_size(self, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    /// Whether `point` lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }
}
