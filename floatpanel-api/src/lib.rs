//! # Floatpanel API
//!
//! This crate defines the boundary between the floatpanel geometry engine and
//! whatever presentation layer draws the panel. It contains the geometry value
//! types, the pointer and notification events, and the [`PanelSurface`] trait
//! a host implements so the engine can read the panel's bounding box and
//! write its position, size, visibility and drag cue.
//!
//! ## Example
//!
//! ```rust
//! use floatpanel_api::{PanelSurface, Rect, RetainedSurface, Size, VisibilityState};
//!
//! let mut surface = RetainedSurface::new(
//!     Rect::new(50.0, 50.0, 400.0, 300.0),
//!     Size::new(1920.0, 1080.0),
//! );
//! surface.set_visibility(VisibilityState::Visible);
//! assert!(surface.visibility().is_visible());
//! ```

pub mod event;
pub mod geometry;
pub mod surface;
pub mod visibility;

pub use event::{ContentKind, GestureKind, PanelEvent, PointerEvent};
pub use geometry::{Point, Rect, Size};
pub use surface::{PanelSurface, RetainedSurface};
pub use visibility::VisibilityState;
