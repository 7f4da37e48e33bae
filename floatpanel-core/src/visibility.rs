//! Show/hide/toggle logic, independent of geometry.

use floatpanel_api::{PanelSurface, VisibilityState};
use tracing::debug;

/// Owns a panel's [`VisibilityState`]. Starts hidden.
///
/// Every method writes the resulting state to the surface and reports whether
/// the state actually changed.
///
/// # Example
///
/// ```rust
/// use floatpanel_api::{Rect, RetainedSurface, Size, VisibilityState};
/// use floatpanel_core::visibility::VisibilityController;
///
/// let mut surface = RetainedSurface::new(Rect::default(), Size::new(800.0, 600.0));
/// let mut visibility = VisibilityController::new();
///
/// visibility.toggle(&mut surface);
/// visibility.toggle(&mut surface);
/// assert_eq!(visibility.state(), VisibilityState::Hidden);
/// ```
#[derive(Debug, Default)]
pub struct VisibilityController {
    state: VisibilityState,
}

impl VisibilityController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn show<S: PanelSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.apply(VisibilityState::Visible, surface)
    }

    pub fn hide<S: PanelSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.apply(VisibilityState::Hidden, surface)
    }

    pub fn toggle<S: PanelSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.apply(self.state.toggled(), surface)
    }

    fn apply<S: PanelSurface + ?Sized>(&mut self, next: VisibilityState, surface: &mut S) -> bool {
        surface.set_visibility(next);
        let changed = self.state != next;
        if changed {
            debug!(from = ?self.state, to = ?next, "visibility changed");
        }
        self.state = next;
        changed
    }
}
