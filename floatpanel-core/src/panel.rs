//! # Floating panel
//!
//! [`FloatingPanel`] wires the controllers, the geometry store and the content
//! registry to one [`PanelSurface`]. It is the object a host talks to: it
//! routes pointer events to whichever gesture is active, persists geometry
//! once per completed gesture, and queues [`PanelEvent`]s describing what
//! changed.
//!
//! At most one gesture runs at a time. A pointer-down on the resize handle
//! while a drag is running (or the other way round) is refused.

use crate::config::{PanelConfig, PanelOption};
use crate::content::{ChildSpec, ElementSpec, PanelContent, RowSpec};
use crate::drag::DragController;
use crate::resize::ResizeController;
use crate::store::{GeometryStore, PanelIdentity, PersistedState};
use crate::visibility::VisibilityController;
use floatpanel_api::{
    ContentKind, GestureKind, PanelEvent, PanelSurface, PointerEvent, Rect, VisibilityState,
};
use tracing::{debug, info, trace};

/// A floating, draggable, resizable panel bound to a surface.
///
/// # Example
///
/// ```rust
/// use floatpanel_api::{PointerEvent, Rect, RetainedSurface, Size};
/// use floatpanel_core::config::PanelConfig;
/// use floatpanel_core::panel::FloatingPanel;
/// use floatpanel_core::store::GeometryStore;
///
/// let config = PanelConfig { draggable: true, ..PanelConfig::default() };
/// let surface = RetainedSurface::new(Rect::new(50.0, 50.0, 0.0, 0.0), Size::new(1920.0, 1080.0));
/// let mut panel = FloatingPanel::mount(config, surface, GeometryStore::in_memory());
///
/// panel.show();
/// panel.begin_drag(PointerEvent::new(100.0, 100.0));
/// panel.pointer_move(PointerEvent::new(150.0, 130.0));
/// panel.pointer_up(PointerEvent::new(150.0, 130.0));
///
/// assert_eq!(panel.geometry(), Rect::new(100.0, 80.0, 400.0, 300.0));
/// assert_eq!(panel.persisted_state().to_rect(), Some(panel.geometry()));
/// ```
#[derive(Debug)]
pub struct FloatingPanel<S: PanelSurface> {
    config: PanelConfig,
    identity: PanelIdentity,
    surface: S,
    store: GeometryStore,
    drag: DragController,
    resize: ResizeController,
    visibility: VisibilityController,
    content: PanelContent,
    events: Vec<PanelEvent>,
}

impl<S: PanelSurface> FloatingPanel<S> {
    /// Bind a panel to `surface` and restore its persisted geometry.
    ///
    /// Persisted state is read exactly once, here. The persisted size (or
    /// the configured default) is applied; the persisted position is applied
    /// only when both coordinates were saved, otherwise the surface keeps its
    /// layout position. The size never goes below the configured minimum.
    /// The panel always starts hidden.
    pub fn mount(config: PanelConfig, mut surface: S, store: GeometryStore) -> Self {
        let identity = PanelIdentity::new(config.identity.as_deref());
        let saved = store.read(&identity);

        let size = saved.size_or(config.default_size());
        let min = config.min_size();
        surface.set_size(size.width.max(min.width), size.height.max(min.height));
        if let Some(position) = saved.position() {
            surface.set_position(position.x, position.y);
        }

        let mut visibility = VisibilityController::new();
        visibility.hide(&mut surface);

        info!(
            identity = %identity,
            restored = !saved.is_empty(),
            "Mounted floating panel"
        );

        Self {
            drag: DragController::new(config.drag_sizing),
            resize: ResizeController::new(config.min_size()),
            config,
            identity,
            surface,
            store,
            visibility,
            content: PanelContent::new(),
            events: Vec::new(),
        }
    }

    pub fn identity(&self) -> &PanelIdentity {
        &self.identity
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for host-side updates such as viewport changes.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current rectangle of the panel surface.
    pub fn geometry(&self) -> Rect {
        self.surface.bounding_rect()
    }

    pub fn visibility(&self) -> VisibilityState {
        self.visibility.state()
    }

    pub fn show(&mut self) -> &mut Self {
        if self.visibility.show(&mut self.surface) {
            self.events.push(PanelEvent::VisibilityChanged(VisibilityState::Visible));
        }
        self
    }

    /// Hide the panel. A running gesture ends as if its pointer was
    /// cancelled.
    pub fn hide(&mut self) -> &mut Self {
        self.finish_active_gesture();
        if self.visibility.hide(&mut self.surface) {
            self.events.push(PanelEvent::VisibilityChanged(VisibilityState::Hidden));
        }
        self
    }

    pub fn toggle(&mut self) -> &mut Self {
        if self.visibility.state().is_visible() {
            self.finish_active_gesture();
        }
        if self.visibility.toggle(&mut self.surface) {
            self.events.push(PanelEvent::VisibilityChanged(self.visibility.state()));
        }
        self
    }

    /// The gesture currently running, if any.
    pub fn active_gesture(&self) -> Option<GestureKind> {
        if self.drag.is_active() {
            Some(GestureKind::Drag)
        } else if self.resize.is_active() {
            Some(GestureKind::Resize)
        } else {
            None
        }
    }

    /// Pointer-down on the drag handle (the header).
    ///
    /// Returns `false` when dragging is disabled, the panel is hidden, or a
    /// gesture is already running.
    pub fn begin_drag(&mut self, pointer: PointerEvent) -> bool {
        if !self.config.draggable {
            trace!("Drag ignored: panel is not draggable");
            return false;
        }
        if !self.visibility.state().is_visible() {
            trace!("Drag ignored: panel is hidden");
            return false;
        }
        if let Some(active) = self.active_gesture() {
            trace!("Drag ignored: {} in progress", active.display_name());
            return false;
        }

        let started = self.drag.begin(pointer, &mut self.surface);
        if started {
            self.events.push(PanelEvent::GestureStarted {
                gesture: GestureKind::Drag,
            });
        }
        started
    }

    /// Pointer-down on the resize handle.
    pub fn begin_resize(&mut self, pointer: PointerEvent) -> bool {
        if !self.config.resizable {
            trace!("Resize ignored: panel is not resizable");
            return false;
        }
        if !self.visibility.state().is_visible() {
            trace!("Resize ignored: panel is hidden");
            return false;
        }
        if let Some(active) = self.active_gesture() {
            trace!("Resize ignored: {} in progress", active.display_name());
            return false;
        }

        let started = self.resize.begin(pointer, &mut self.surface);
        if started {
            self.events.push(PanelEvent::GestureStarted {
                gesture: GestureKind::Resize,
            });
        }
        started
    }

    /// Pointer movement anywhere in the viewport. A no-op when idle.
    pub fn pointer_move(&mut self, pointer: PointerEvent) {
        if self.drag.is_active() {
            self.drag.on_move(pointer, &mut self.surface);
        } else if self.resize.is_active() {
            self.resize.on_move(pointer, &mut self.surface);
        }
    }

    /// Pointer release. Ends the gesture driven by this pointer, if any.
    pub fn pointer_up(&mut self, pointer: PointerEvent) {
        self.end_gesture_for(pointer.pointer_id);
    }

    /// The surface lost capture of `pointer_id` (or the host cancelled the
    /// pointer). Ends the gesture exactly like a release.
    pub fn pointer_cancel(&mut self, pointer_id: u64) {
        if self.end_gesture_for(pointer_id) {
            debug!(pointer_id, "Gesture ended by pointer cancellation");
        }
    }

    fn end_gesture_for(&mut self, pointer_id: u64) -> bool {
        let ended = if self.drag.accepts(pointer_id) {
            self.drag
                .end(&mut self.surface)
                .map(|rect| (GestureKind::Drag, rect))
        } else if self.resize.accepts(pointer_id) {
            self.resize
                .end(&mut self.surface)
                .map(|rect| (GestureKind::Resize, rect))
        } else {
            None
        };

        match ended {
            Some((gesture, rect)) => {
                self.commit(gesture, rect);
                true
            }
            None => false,
        }
    }

    /// End whichever gesture is running, regardless of its pointer, and
    /// commit it.
    fn finish_active_gesture(&mut self) -> bool {
        let ended = match self.active_gesture() {
            Some(GestureKind::Drag) => self
                .drag
                .end(&mut self.surface)
                .map(|rect| (GestureKind::Drag, rect)),
            Some(GestureKind::Resize) => self
                .resize
                .end(&mut self.surface)
                .map(|rect| (GestureKind::Resize, rect)),
            None => None,
        };

        match ended {
            Some((gesture, rect)) => {
                self.commit(gesture, rect);
                true
            }
            None => false,
        }
    }

    fn commit(&mut self, gesture: GestureKind, rect: Rect) {
        self.store.write(&self.identity, rect);
        self.events.push(PanelEvent::GeometryCommitted { gesture, rect });
    }

    /// Geometry currently persisted for this panel's identity.
    pub fn persisted_state(&self) -> PersistedState {
        self.store.read(&self.identity)
    }

    /// Forget the persisted geometry for this panel's identity.
    ///
    /// The on-screen geometry is left as it is; the defaults apply on the
    /// next mount.
    pub fn reset_state(&mut self) -> &mut Self {
        self.store.reset(&self.identity);
        self.events.push(PanelEvent::StateReset);
        self
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    /// Append a row; duplicates are skipped with a warning event.
    pub fn add_row(&mut self, row: RowSpec) -> bool {
        let id = row.id.clone();
        let added = self.content.add_row(row);
        self.note_duplicate(ContentKind::Row, id, added);
        added
    }

    /// Append a freely positioned element; duplicates are skipped with a
    /// warning event.
    pub fn add_element(&mut self, element: ElementSpec) -> bool {
        let id = element.id.clone();
        let added = self.content.add_element(element);
        self.note_duplicate(ContentKind::Element, id, added);
        added
    }

    /// Register initial children in order, naming anonymous ones by position.
    ///
    /// Returns how many were added.
    pub fn populate<I>(&mut self, children: I) -> usize
    where
        I: IntoIterator<Item = ChildSpec>,
    {
        let before = self.content.len();
        for (kind, id) in self.content.add_children(children) {
            self.note_duplicate(kind, id, false);
        }
        self.content.len() - before
    }

    fn note_duplicate(&mut self, kind: ContentKind, id: String, added: bool) {
        if !added {
            self.events.push(PanelEvent::DuplicateSkipped { kind, id });
        }
    }

    /// Apply a typed option.
    ///
    /// Behaviour flags take effect for the next gesture; a running gesture is
    /// not interrupted. Size options only change the defaults used by the
    /// next mount. Changing the identity redirects future persistence.
    pub fn apply_option(&mut self, option: PanelOption) {
        if let PanelOption::Identity(identity) = &option {
            self.identity = PanelIdentity::new(identity.as_deref());
        }
        debug!("Applying panel option '{}'", option.attribute_name());
        self.config.apply(option);
    }

    /// String-attribute entry point for hosts that reflect markup attributes.
    ///
    /// Returns `false` for unrecognised names or unparseable values.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> bool {
        match PanelOption::parse(name, value) {
            Some(option) => {
                self.apply_option(option);
                true
            }
            None => false,
        }
    }

    /// Take all queued notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Detach from the surface, ending (and committing) any running gesture.
    pub fn unmount(mut self) -> S {
        self.finish_active_gesture();
        info!(identity = %self.identity, "Unmounted floating panel");
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::store::Length;
    use floatpanel_api::{Point, RetainedSurface, Size};

    fn interactive_config() -> PanelConfig {
        PanelConfig {
            draggable: true,
            resizable: true,
            ..PanelConfig::default()
        }
    }

    fn surface(viewport: Size) -> RetainedSurface {
        RetainedSurface::new(Rect::new(50.0, 50.0, 0.0, 0.0), viewport)
    }

    fn mount(store: GeometryStore) -> FloatingPanel<RetainedSurface> {
        FloatingPanel::mount(interactive_config(), surface(Size::new(1920.0, 1080.0)), store)
    }

    fn mount_shown(store: GeometryStore) -> FloatingPanel<RetainedSurface> {
        let mut panel = mount(store);
        panel.show();
        panel
    }

    #[test]
    fn test_mount_without_state_uses_defaults() {
        let panel = mount(GeometryStore::in_memory());

        assert_eq!(panel.geometry(), Rect::new(50.0, 50.0, 400.0, 300.0));
        assert!(!panel.surface().is_positioned());
        assert_eq!(panel.visibility(), VisibilityState::Hidden);
        assert_eq!(panel.surface().visibility(), VisibilityState::Hidden);
        assert_eq!(panel.identity().as_str(), "panel-component-default");
    }

    #[test]
    fn test_scenario_drag_commits_to_store() {
        let backend = MemoryBackend::new();
        let mut panel = mount_shown(GeometryStore::new(backend.clone()));

        assert!(panel.begin_drag(PointerEvent::new(100.0, 100.0)));
        panel.pointer_move(PointerEvent::new(150.0, 130.0));
        assert_eq!(panel.geometry().position(), Point::new(100.0, 80.0));
        panel.pointer_up(PointerEvent::new(150.0, 130.0));

        use crate::backend::StorageBackend;
        let raw = backend
            .get_item("panel-state:panel-component-default")
            .unwrap()
            .unwrap();
        assert_eq!(
            raw,
            r#"{"left":"100px","top":"80px","width":"400px","height":"300px"}"#
        );
        assert!(!panel.surface().visual_cue());
        assert_eq!(panel.active_gesture(), None);
    }

    #[test]
    fn test_no_persistence_during_moves() {
        let backend = MemoryBackend::new();
        let mut panel = mount_shown(GeometryStore::new(backend.clone()));

        panel.begin_drag(PointerEvent::new(0.0, 0.0));
        panel.pointer_move(PointerEvent::new(10.0, 10.0));
        panel.pointer_move(PointerEvent::new(20.0, 20.0));
        assert!(backend.is_empty());

        panel.pointer_up(PointerEvent::new(20.0, 20.0));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_mount_restores_persisted_geometry() {
        let backend = MemoryBackend::new();
        let store = GeometryStore::new(backend.clone());
        store.write(&PanelIdentity::default(), Rect::new(300.0, 200.0, 520.0, 240.0));

        let panel = mount(GeometryStore::new(backend));
        assert_eq!(panel.geometry(), Rect::new(300.0, 200.0, 520.0, 240.0));
        assert!(panel.surface().is_positioned());
    }

    #[test]
    fn test_mount_with_size_only_keeps_layout_position() {
        let store = GeometryStore::in_memory();
        store.write_state(
            &PanelIdentity::default(),
            &PersistedState {
                width: Length::px(250.0),
                left: Length::px(10.0),
                ..PersistedState::default()
            },
        );

        let panel = mount(store);
        assert_eq!(panel.geometry(), Rect::new(50.0, 50.0, 250.0, 300.0));
        assert!(!panel.surface().is_positioned());
    }

    #[test]
    fn test_resize_commits_size_and_position() {
        let mut panel = mount_shown(GeometryStore::in_memory());

        assert!(panel.begin_resize(PointerEvent::new(450.0, 350.0)));
        panel.pointer_move(PointerEvent::new(200.0, 200.0));
        panel.pointer_up(PointerEvent::new(200.0, 200.0));

        assert_eq!(
            panel.persisted_state().to_rect(),
            Some(Rect::new(50.0, 50.0, 150.0, 150.0))
        );
    }

    #[test]
    fn test_gestures_are_mutually_exclusive() {
        let mut panel = mount_shown(GeometryStore::in_memory());

        assert!(panel.begin_drag(PointerEvent::new(0.0, 0.0)));
        assert!(!panel.begin_resize(PointerEvent::new(0.0, 0.0)));
        assert_eq!(panel.active_gesture(), Some(GestureKind::Drag));

        panel.pointer_up(PointerEvent::new(0.0, 0.0));
        assert!(panel.begin_resize(PointerEvent::new(0.0, 0.0)));
        assert!(!panel.begin_drag(PointerEvent::new(0.0, 0.0)));
        assert_eq!(panel.active_gesture(), Some(GestureKind::Resize));
    }

    #[test]
    fn test_disabled_handles_refuse_gestures() {
        let surface = surface(Size::new(800.0, 600.0));
        let mut panel = FloatingPanel::mount(PanelConfig::default(), surface, GeometryStore::in_memory());
        panel.show();

        assert!(!panel.begin_drag(PointerEvent::new(0.0, 0.0)));
        assert!(!panel.begin_resize(PointerEvent::new(0.0, 0.0)));

        assert!(panel.set_attribute("draggable", Some("")));
        assert!(panel.begin_drag(PointerEvent::new(0.0, 0.0)));
    }

    #[test]
    fn test_cancel_clears_cue_and_commits() {
        let mut panel = mount_shown(GeometryStore::in_memory());

        panel.begin_drag(PointerEvent::new(0.0, 0.0).with_id(5));
        panel.pointer_move(PointerEvent::new(30.0, 40.0).with_id(5));
        assert!(panel.surface().visual_cue());

        panel.pointer_cancel(5);
        assert!(!panel.surface().visual_cue());
        assert_eq!(panel.surface().captured_pointer(), None);
        assert_eq!(panel.active_gesture(), None);
        assert_eq!(panel.persisted_state().position(), Some(Point::new(80.0, 90.0)));
    }

    #[test]
    fn test_release_of_other_pointer_is_ignored() {
        let mut panel = mount_shown(GeometryStore::in_memory());

        panel.begin_drag(PointerEvent::new(0.0, 0.0).with_id(1));
        panel.pointer_up(PointerEvent::new(0.0, 0.0).with_id(2));
        assert_eq!(panel.active_gesture(), Some(GestureKind::Drag));
        panel.pointer_cancel(3);
        assert_eq!(panel.active_gesture(), Some(GestureKind::Drag));
    }

    #[test]
    fn test_stray_events_when_idle_are_noops() {
        let mut panel = mount(GeometryStore::in_memory());
        let before = panel.surface().clone();

        panel.pointer_move(PointerEvent::new(500.0, 500.0));
        panel.pointer_up(PointerEvent::new(500.0, 500.0));
        panel.pointer_cancel(0);

        assert_eq!(panel.surface(), &before);
        assert!(panel.persisted_state().is_empty());
        assert!(panel.drain_events().is_empty());
    }

    #[test]
    fn test_visibility_events() {
        let mut panel = mount(GeometryStore::in_memory());
        panel.show().show();
        panel.toggle();

        assert_eq!(
            panel.drain_events(),
            vec![
                PanelEvent::VisibilityChanged(VisibilityState::Visible),
                PanelEvent::VisibilityChanged(VisibilityState::Hidden),
            ]
        );
        assert!(panel.drain_events().is_empty());
    }

    #[test]
    fn test_reset_state() {
        let mut panel = mount_shown(GeometryStore::in_memory());
        panel.begin_drag(PointerEvent::new(0.0, 0.0));
        panel.pointer_up(PointerEvent::new(0.0, 0.0));
        assert!(!panel.persisted_state().is_empty());

        panel.reset_state();
        assert!(panel.persisted_state().is_empty());
        assert_eq!(panel.drain_events().last(), Some(&PanelEvent::StateReset));
    }

    #[test]
    fn test_duplicate_content_emits_warning_event() {
        let mut panel = mount(GeometryStore::in_memory());

        assert!(panel.add_row(RowSpec::new("r")));
        assert!(!panel.add_row(RowSpec::new("r")));
        assert!(panel.add_element(ElementSpec::new("e", 1.0, 2.0)));
        assert!(!panel.add_element(ElementSpec::new("e", 1.0, 2.0)));

        let warnings: Vec<_> = panel
            .drain_events()
            .into_iter()
            .filter(PanelEvent::is_warning)
            .collect();
        assert_eq!(
            warnings,
            vec![
                PanelEvent::DuplicateSkipped { kind: ContentKind::Row, id: "r".to_string() },
                PanelEvent::DuplicateSkipped { kind: ContentKind::Element, id: "e".to_string() },
            ]
        );
    }

    #[test]
    fn test_populate_names_and_classifies_children() {
        let mut panel = mount(GeometryStore::in_memory());
        let children = vec![
            ChildSpec::default(),
            ChildSpec {
                y: Some("12".to_string()),
                ..ChildSpec::default()
            },
            ChildSpec {
                id: Some("row-1".to_string()),
                ..ChildSpec::default()
            },
        ];

        assert_eq!(panel.populate(children), 2);
        assert!(panel.content().row("row-1").is_some());
        assert_eq!(panel.content().element("row-2").map(|e| e.y), Some(12.0));
        assert_eq!(panel.content().rows().len(), 1);
    }

    #[test]
    fn test_identity_option_redirects_persistence() {
        let backend = MemoryBackend::new();
        let mut panel = mount_shown(GeometryStore::new(backend.clone()));
        panel.set_attribute("id", Some("sidebar"));

        panel.begin_drag(PointerEvent::new(0.0, 0.0));
        panel.pointer_up(PointerEvent::new(0.0, 0.0));

        use crate::backend::StorageBackend;
        assert!(backend.get_item("panel-state:sidebar").unwrap().is_some());
        assert!(backend.get_item("panel-state:panel-component-default").unwrap().is_none());
    }

    #[test]
    fn test_unmount_finishes_running_gesture() {
        let mut panel = mount_shown(GeometryStore::in_memory());
        panel.begin_drag(PointerEvent::new(0.0, 0.0));

        let surface = panel.unmount();
        assert!(!surface.visual_cue());
        assert_eq!(surface.captured_pointer(), None);
    }

    #[test]
    fn test_hidden_panel_refuses_gestures() {
        let mut panel = mount(GeometryStore::in_memory());

        assert!(!panel.begin_drag(PointerEvent::new(100.0, 100.0)));
        assert!(!panel.begin_resize(PointerEvent::new(100.0, 100.0)));
        panel.pointer_up(PointerEvent::new(100.0, 100.0));

        assert_eq!(panel.active_gesture(), None);
        assert!(!panel.surface().visual_cue());
        assert!(!panel.surface().is_positioned());
        assert!(panel.persisted_state().is_empty());

        panel.show();
        assert!(panel.begin_drag(PointerEvent::new(100.0, 100.0)));
    }

    #[test]
    fn test_hide_ends_running_gesture() {
        let mut panel = mount_shown(GeometryStore::in_memory());
        panel.begin_drag(PointerEvent::new(0.0, 0.0).with_id(2));
        panel.pointer_move(PointerEvent::new(20.0, 10.0).with_id(2));

        panel.hide();
        assert_eq!(panel.active_gesture(), None);
        assert!(!panel.surface().visual_cue());
        assert_eq!(panel.surface().captured_pointer(), None);
        assert_eq!(panel.persisted_state().position(), Some(Point::new(70.0, 60.0)));

        panel.show();
        assert!(panel.begin_resize(PointerEvent::new(0.0, 0.0)));
        panel.toggle();
        assert_eq!(panel.active_gesture(), None);
        assert_eq!(panel.visibility(), VisibilityState::Hidden);
    }

    #[test]
    fn test_mount_floors_undersized_persisted_state() {
        let backend = MemoryBackend::new();
        use crate::backend::StorageBackend;
        backend
            .set_item(
                "panel-state:panel-component-default",
                r#"{"width":"5px","height":"3px"}"#,
            )
            .unwrap();

        let panel = mount(GeometryStore::new(backend));
        assert_eq!(panel.geometry().size(), Size::new(100.0, 80.0));
    }

    #[test]
    fn test_undersized_width_attribute_is_floored() {
        let mut panel = mount(GeometryStore::in_memory());
        assert!(panel.set_attribute("width", Some("10")));
        assert_eq!(panel.config().width, 100.0);
    }
}
