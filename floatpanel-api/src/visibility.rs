use serde::{Deserialize, Serialize};

/// Whether a panel is currently shown.
///
/// Panels always start [`Hidden`](VisibilityState::Hidden); visibility is
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisibilityState {
    #[default]
    Hidden,
    Visible,
}

impl VisibilityState {
    pub fn is_visible(&self) -> bool {
        matches!(self, VisibilityState::Visible)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VisibilityState::Hidden => "hidden",
            VisibilityState::Visible => "visible",
        }
    }

    /// The opposite state.
    pub fn toggled(&self) -> Self {
        match self {
            VisibilityState::Hidden => VisibilityState::Visible,
            VisibilityState::Visible => VisibilityState::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_hidden() {
        assert_eq!(VisibilityState::default(), VisibilityState::Hidden);
        assert!(!VisibilityState::default().is_visible());
    }

    #[test]
    fn test_toggled_twice_is_identity() {
        let state = VisibilityState::Hidden;
        assert_eq!(state.toggled(), VisibilityState::Visible);
        assert_eq!(state.toggled().toggled(), state);
    }
}
