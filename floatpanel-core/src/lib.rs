//! # Floatpanel Core
//!
//! Geometry engine for floating panels: dragging by the header, resizing from
//! a corner handle, showing and hiding, and remembering where each panel was
//! left between sessions.
//!
//! ## Architecture
//!
//! - [`FloatingPanel`] is the entry point a host talks to
//! - [`DragController`] and [`ResizeController`] run one pointer gesture each
//! - [`VisibilityController`] owns the visible/hidden state
//! - [`GeometryStore`] persists geometry through a [`StorageBackend`]
//!
//! Rendering is the host's job. The engine only writes through the
//! [`PanelSurface`](floatpanel_api::PanelSurface) it was given.
//!
//! ## Example
//!
//! ```rust
//! use floatpanel_api::{PanelEvent, PointerEvent, Rect, RetainedSurface, Size};
//! use floatpanel_core::{config::PanelConfig, FloatingPanel, GeometryStore};
//!
//! let config = PanelConfig { resizable: true, ..PanelConfig::default() };
//! let surface = RetainedSurface::new(Rect::new(0.0, 0.0, 0.0, 0.0), Size::new(800.0, 600.0));
//! let mut panel = FloatingPanel::mount(config, surface, GeometryStore::in_memory());
//!
//! panel.show();
//! panel.begin_resize(PointerEvent::new(400.0, 300.0));
//! panel.pointer_move(PointerEvent::new(50.0, 50.0));
//! panel.pointer_up(PointerEvent::new(50.0, 50.0));
//!
//! // Clamped to the minimum size.
//! assert_eq!(panel.geometry().size(), Size::new(100.0, 80.0));
//! assert!(matches!(
//!     panel.drain_events().last(),
//!     Some(PanelEvent::GeometryCommitted { .. })
//! ));
//! ```

pub mod backend;
pub mod clamp;
pub mod config;
pub mod content;
pub mod drag;
pub mod error;
pub mod gesture;
pub mod panel;
pub mod resize;
pub mod store;
pub mod visibility;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use config::{Config, PanelConfig, PanelOption};
pub use content::{ChildSpec, ElementSpec, PanelContent, RowSpec};
pub use drag::{DragController, DragSizing};
pub use error::{Error, Result};
pub use panel::FloatingPanel;
pub use resize::ResizeController;
pub use store::{GeometryStore, Length, PanelIdentity, PersistedState};
pub use visibility::VisibilityController;

use tracing_subscriber::EnvFilter;

/// Initialize tracing with the default formatter.
///
/// Does nothing if a global subscriber is already installed.
///
/// # Example
///
/// ```rust
/// floatpanel_core::init_tracing();
/// tracing::info!("Panel host started");
/// ```
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// Initialize tracing filtered at `level` (for example `"info"` or
/// `"floatpanel_core=debug"`). `RUST_LOG`, when set, takes precedence.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing_with_level(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
