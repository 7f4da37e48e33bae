//! Main application structure for Floatpanel.
//!
//! Renders a [`FloatingPanel`] from its [`RetainedSurface`] each frame and
//! feeds egui pointer input back into the engine. The engine owns the
//! geometry; this module only reads it.

use eframe::egui;
use floatpanel_api::{PanelEvent, PanelSurface, PointerEvent, RetainedSurface, Rect, Size};
use floatpanel_core::{ChildSpec, Config, FloatingPanel, GeometryStore};

/// Side length of the square resize handle, in points.
const RESIZE_HANDLE: f32 = 14.0;

/// egui reports a single primary pointer.
const PRIMARY_POINTER: u64 = 0;

/// Main Floatpanel application state
pub struct FloatpanelApp {
    panel: FloatingPanel<RetainedSurface>,
    /// Opacity applied while the drag cue is active
    drag_opacity: f32,
    /// Most recent notifications, newest last
    recent_events: Vec<String>,
}

impl FloatpanelApp {
    pub fn new(config: Config, store: GeometryStore) -> Self {
        let surface = RetainedSurface::new(Rect::default(), Size::default());
        let drag_opacity = config.panel.drag_opacity;
        let mut panel = FloatingPanel::mount(config.panel, surface, store);
        panel.populate(demo_children());
        panel.show();

        Self {
            panel,
            drag_opacity,
            recent_events: Vec::new(),
        }
    }

    fn sync_viewport(&mut self, viewport: egui::Rect) {
        let viewport = Size::new(viewport.width(), viewport.height());
        let size = self.panel.geometry().size();
        let origin = layout_origin(viewport, size);

        let surface = self.panel.surface_mut();
        surface.set_viewport(viewport);
        surface.set_layout_position(origin.0, origin.1);
    }

    /// Route raw pointer state to the running gesture, if any.
    fn route_pointer(&mut self, ctx: &egui::Context) {
        if self.panel.active_gesture().is_none() {
            return;
        }

        let (position, released, present) = ctx.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.any_released(),
                i.pointer.has_pointer(),
            )
        });

        match position {
            Some(pos) => {
                let pointer = pointer_event(pos);
                self.panel.pointer_move(pointer);
                if released {
                    self.panel.pointer_up(pointer);
                }
            }
            None if !present => self.panel.pointer_cancel(PRIMARY_POINTER),
            None => {}
        }
    }

    fn render_controls(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Show").clicked() {
                    self.panel.show();
                }
                if ui.button("Hide").clicked() {
                    self.panel.hide();
                }
                if ui.button("Toggle").clicked() {
                    self.panel.toggle();
                }
                if ui.button("Reset saved geometry").clicked() {
                    self.panel.reset_state();
                }
            });

            ui.separator();

            let rect = self.panel.geometry();
            ui.label(format!(
                "Identity: {}   Visibility: {}",
                self.panel.identity(),
                self.panel.visibility().display_name()
            ));
            ui.label(format!(
                "Geometry: {:.0}, {:.0}  {:.0} x {:.0}",
                rect.left, rect.top, rect.width, rect.height
            ));
            match self.panel.persisted_state().to_rect() {
                Some(saved) => ui.label(format!(
                    "Saved: {:.0}, {:.0}  {:.0} x {:.0}",
                    saved.left, saved.top, saved.width, saved.height
                )),
                None => ui.label("Saved: nothing"),
            };

            ui.separator();
            for line in &self.recent_events {
                ui.monospace(line);
            }
        });
    }

    fn render_panel(&mut self, ctx: &egui::Context) {
        if !self.panel.visibility().is_visible() {
            return;
        }

        let rect = self.panel.geometry();
        let opacity = if self.panel.surface().visual_cue() {
            self.drag_opacity
        } else {
            1.0
        };
        let config = self.panel.config().clone();

        let mut begin_drag = None;
        let mut begin_resize = None;
        let mut close = false;

        egui::Area::new(egui::Id::new("floatpanel"))
            .fixed_pos(egui::pos2(rect.left, rect.top))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let outer = egui::Rect::from_min_size(
                    egui::pos2(rect.left, rect.top),
                    egui::vec2(rect.width, rect.height),
                );

                egui::Frame::window(ui.style())
                    .multiply_with_opacity(opacity)
                    .show(ui, |ui| {
                        ui.set_width(rect.width - 2.0 * RESIZE_HANDLE);
                        ui.set_height(rect.height - 2.0 * RESIZE_HANDLE);

                        let header = ui
                            .horizontal(|ui| {
                                ui.strong(&config.title);
                                if config.show_close {
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| {
                                            close = ui.small_button("x").clicked();
                                        },
                                    );
                                }
                            })
                            .response;

                        if config.draggable {
                            let handle =
                                ui.interact(header.rect, ui.id().with("header"), egui::Sense::drag());
                            if handle.drag_started() {
                                begin_drag = handle.interact_pointer_pos();
                            }
                            handle.on_hover_cursor(egui::CursorIcon::Grab);
                        }

                        ui.separator();
                        render_content(ui, &self.panel);
                    });

                if config.resizable {
                    let handle_rect = egui::Rect::from_min_size(
                        outer.max - egui::vec2(RESIZE_HANDLE, RESIZE_HANDLE),
                        egui::vec2(RESIZE_HANDLE, RESIZE_HANDLE),
                    );
                    let handle =
                        ui.interact(handle_rect, ui.id().with("resize"), egui::Sense::drag());
                    if handle.drag_started() {
                        begin_resize = handle.interact_pointer_pos();
                    }
                    ui.painter().text(
                        handle_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "◢",
                        egui::FontId::proportional(RESIZE_HANDLE),
                        ui.visuals().weak_text_color(),
                    );
                    handle.on_hover_cursor(egui::CursorIcon::ResizeNwSe);
                }
            });

        if let Some(pos) = begin_drag {
            self.panel.begin_drag(pointer_event(pos));
        }
        if let Some(pos) = begin_resize {
            self.panel.begin_resize(pointer_event(pos));
        }
        if close {
            self.panel.hide();
        }
    }

    fn log_events(&mut self) {
        for event in self.panel.drain_events() {
            let line = describe_event(&event);
            if event.is_warning() {
                tracing::warn!("{}", line);
            } else {
                tracing::debug!("{}", line);
            }
            self.recent_events.push(line);
        }

        let overflow = self.recent_events.len().saturating_sub(8);
        self.recent_events.drain(..overflow);
    }
}

impl eframe::App for FloatpanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_viewport(ctx.screen_rect());
        self.route_pointer(ctx);

        self.render_controls(ctx);
        self.render_panel(ctx);
        self.log_events();

        if self.panel.active_gesture().is_some() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        tracing::info!("Application shutting down");
        if self.panel.active_gesture().is_some() {
            self.panel.pointer_cancel(PRIMARY_POINTER);
        }
    }
}

fn render_content(ui: &mut egui::Ui, panel: &FloatingPanel<RetainedSurface>) {
    let content = panel.content();
    for row in content.rows() {
        ui.horizontal_wrapped(|ui| {
            for item in &row.items {
                ui.label(item);
            }
        });
    }

    let origin = ui.min_rect().left_bottom();
    for element in content.elements() {
        ui.painter().text(
            origin + egui::vec2(element.x, element.y),
            egui::Align2::LEFT_TOP,
            &element.markup,
            egui::FontId::default(),
            ui.visuals().text_color(),
        );
    }
}

fn pointer_event(pos: egui::Pos2) -> PointerEvent {
    PointerEvent::new(pos.x, pos.y).with_id(PRIMARY_POINTER)
}

/// Top-left corner that centres a panel of `size` in `viewport`.
fn layout_origin(viewport: Size, size: Size) -> (f32, f32) {
    (
        ((viewport.width - size.width) / 2.0).max(0.0),
        ((viewport.height - size.height) / 2.0).max(0.0),
    )
}

fn describe_event(event: &PanelEvent) -> String {
    match event {
        PanelEvent::VisibilityChanged(state) => format!("panel is now {}", state.display_name()),
        PanelEvent::GestureStarted { gesture } => format!("{} started", gesture.display_name()),
        PanelEvent::GeometryCommitted { gesture, rect } => format!(
            "{} saved at {:.0}, {:.0} ({:.0} x {:.0})",
            gesture.display_name(),
            rect.left,
            rect.top,
            rect.width,
            rect.height
        ),
        PanelEvent::DuplicateSkipped { kind, id } => {
            format!("{} \"{}\" already exists, skipped", kind.display_name(), id)
        }
        PanelEvent::StateReset => "saved geometry cleared".to_string(),
    }
}

fn demo_children() -> Vec<ChildSpec> {
    vec![
        ChildSpec {
            id: Some("hint".to_string()),
            items: vec!["Drag the header to move this panel.".to_string()],
            ..ChildSpec::default()
        },
        ChildSpec {
            items: vec!["Resize it from the bottom-right corner.".to_string()],
            ..ChildSpec::default()
        },
        ChildSpec {
            id: Some("badge".to_string()),
            x: Some("8".to_string()),
            y: Some("12px".to_string()),
            items: vec!["Position and size are remembered.".to_string()],
            ..ChildSpec::default()
        },
    ]
}
