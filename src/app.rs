use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::SurfaceConfig;
use crate::export::{self, RasterFormat};
use crate::input::InputHandler;
use crate::renderer::{Renderer, ToolbarAction};
use crate::surface::DrawingSurface;
use crate::tools::ToolSettings;

/// What we persist between runs.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct PersistedState {
    tools: Option<ToolSettings>,
}

/// One line of feedback shown under the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

pub struct PaintApp {
    config: SurfaceConfig,
    renderer: Renderer,
    input: InputHandler,
    /// Created on the first frame, once the panel width is known
    surface: Option<DrawingSurface>,
    restored_tools: Option<ToolSettings>,
    /// Written by background export jobs, read every frame
    status: Arc<Mutex<Option<Status>>>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: SurfaceConfig) -> Self {
        let persisted: PersistedState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        Self {
            config: config.sanitized(),
            renderer: Renderer::new(cc),
            input: InputHandler::new(egui::Rect::NOTHING),
            surface: None,
            restored_tools: persisted.tools,
            status: Arc::new(Mutex::new(None)),
        }
    }

    fn set_status(&self, status: Status) {
        *self.status.lock() = Some(status);
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: ToolbarAction) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        match action {
            ToolbarAction::Undo => {
                if let Err(err) = surface.undo() {
                    log::warn!("Undo failed: {err}");
                }
            }
            ToolbarAction::Redo => {
                if let Err(err) = surface.redo() {
                    log::warn!("Redo failed: {err}");
                }
            }
            ToolbarAction::Clear => surface.clear(),
            ToolbarAction::Export(format) => self.spawn_export(ctx, format),
            ToolbarAction::CopyToClipboard => self.copy_to_clipboard(),
        }
    }

    /// Encode and write the export off the UI thread. The job owns a copy of
    /// the pixels, so drawing can continue meanwhile.
    #[cfg(not(target_arch = "wasm32"))]
    fn spawn_export(&self, ctx: &egui::Context, format: RasterFormat) {
        let Some(surface) = &self.surface else {
            return;
        };
        let pixels = surface.canvas().image().clone();
        let dir = self.config.export_dir.clone();
        let status = Arc::clone(&self.status);
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let outcome = match export::export(&pixels, format).and_then(|image| image.save_to(&dir)) {
                Ok(path) => Status::info(format!("Saved {}", path.display())),
                Err(err) => {
                    log::error!("Export failed: {err}");
                    Status::error(format!("Export failed: {err}"))
                }
            };
            *status.lock() = Some(outcome);
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn_export(&self, _ctx: &egui::Context, format: RasterFormat) {
        let Some(surface) = &self.surface else {
            return;
        };
        // Encoding still runs so failures surface the same way as on native.
        match export::export(surface.canvas().image(), format) {
            Ok(image) => {
                log::warn!("Saving {} is not supported in the browser build", image.file_name);
                self.set_status(Status::error("Saving files is not supported in the browser"));
            }
            Err(err) => self.set_status(Status::error(format!("Export failed: {err}"))),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn copy_to_clipboard(&self) {
        let Some(surface) = &self.surface else {
            return;
        };
        let status = if surface.copy_to_clipboard(&mut export::SystemClipboard) {
            Status::info("Copied to clipboard")
        } else {
            Status::error("Copy to clipboard failed")
        };
        self.set_status(status);
    }

    #[cfg(target_arch = "wasm32")]
    fn copy_to_clipboard(&self) {
        log::warn!("Clipboard images are not supported in the browser build");
        self.set_status(Status::error("Copy to clipboard is not supported in the browser"));
    }

    fn route_input(&mut self, ctx: &egui::Context) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        // Clicks on an open color picker must not reach the canvas underneath.
        if !ctx.memory(|memory| memory.any_popup_open()) {
            for event in self.input.process_input(ctx) {
                surface.handle_input(&event);
            }
        }
        if !ctx.wants_keyboard_input() {
            for shortcut in InputHandler::shortcuts(ctx) {
                shortcut.apply(surface);
            }
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = PersistedState {
            tools: self
                .surface
                .as_ref()
                .map(|surface| surface.tools().clone())
                .or_else(|| self.restored_tools.clone()),
        };
        eframe::set_value(storage, eframe::APP_KEY, &state);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            if let Some(surface) = &mut self.surface {
                actions = self
                    .renderer
                    .render_tools_panel(ui, surface, self.config.jpeg_quality);
            }
        });
        for action in actions {
            self.handle_action(ctx, action);
        }

        self.route_input(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(surface) = &self.surface {
                    let history = surface.history();
                    ui.label(format!(
                        "{}x{}  ·  history {}/{}",
                        surface.width(),
                        surface.height(),
                        history.cursor() + 1,
                        history.len()
                    ));
                }
                if let Some(status) = self.status.lock().as_ref() {
                    ui.separator();
                    if status.is_error {
                        ui.colored_label(ui.visuals().error_fg_color, &status.message);
                    } else {
                        ui.label(&status.message);
                    }
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let width = ui.available_width().floor().max(1.0) as u32;
            let surface = self.surface.get_or_insert_with(|| {
                let mut surface = DrawingSurface::new(width, &self.config);
                if let Some(tools) = self.restored_tools.take() {
                    surface.set_tool_settings(tools);
                }
                surface
            });
            surface.resize(width, surface.height());

            let size = egui::vec2(surface.width() as f32, surface.height() as f32);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::drag());
            let response = response.on_hover_cursor(surface.tools().tool.cursor());
            self.input.set_canvas_rect(response.rect);
            self.renderer.render(&painter, response.rect, surface);
        });
    }
}
