// src/renderer.rs
use eframe::egui::{self, Color32, Slider};

use crate::color::{self, Rgb};
use crate::export::RasterFormat;
use crate::surface::DrawingSurface;
use crate::tools::{MIN_BRUSH_SIZE, SLIDER_MAX_BRUSH_SIZE, ToolType};

/// Toolbar buttons that the application has to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Undo,
    Redo,
    Clear,
    Export(RasterFormat),
    CopyToClipboard,
}

pub struct Renderer {
    texture: Option<egui::TextureHandle>,
    /// Surface revision the texture currently shows
    uploaded_revision: Option<u64>,
    ctx: egui::Context,
}

impl Renderer {
    /// Creates a new renderer bound to the app's egui context
    ///
    /// Args:
    ///     cc (CreationContext): The eframe creation context
    ///
    /// Returns:
    ///     Self: Renderer with no texture uploaded yet
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_context(cc.egui_ctx.clone())
    }

    pub fn with_context(ctx: egui::Context) -> Self {
        Self {
            texture: None,
            uploaded_revision: None,
            ctx,
        }
    }

    /// Renders the tools panel
    ///
    /// Tool, color and size changes are applied to the surface directly; the
    /// remaining buttons are returned for the caller to handle.
    pub fn render_tools_panel(
        &mut self,
        ui: &mut egui::Ui,
        surface: &mut DrawingSurface,
        jpeg_quality: u8,
    ) -> Vec<ToolbarAction> {
        let mut actions = Vec::new();

        ui.horizontal_wrapped(|ui| {
            // Tool selection buttons
            let current = surface.tools().tool;
            for (index, tool) in ToolType::ALL.into_iter().enumerate() {
                let label = format!("{} {}", tool.icon(), tool.name());
                let hover = format!("{} ({})", tool.name(), index + 1);
                if ui.selectable_label(current == tool, label).on_hover_text(hover).clicked() {
                    surface.set_tool(tool);
                }
            }

            ui.separator();

            // Color pickers
            ui.label("Color:");
            let mut brush: Color32 = surface.tools().brush_color.into();
            if egui::color_picker::color_edit_button_srgba(ui, &mut brush, egui::color_picker::Alpha::Opaque)
                .changed()
            {
                surface.set_brush_color(brush.into());
            }
            for preset in color::PRESETS {
                let swatch = egui::Button::new("")
                    .fill(Color32::from(preset))
                    .min_size(egui::vec2(16.0, 16.0));
                if ui.add(swatch).on_hover_text(preset.to_hex()).clicked() {
                    surface.set_brush_color(preset);
                }
            }

            ui.label("Fill:");
            let mut fill: Color32 = surface.tools().fill_color.into();
            if egui::color_picker::color_edit_button_srgba(ui, &mut fill, egui::color_picker::Alpha::Opaque)
                .changed()
            {
                surface.set_fill_color(Rgb::from(fill));
            }

            ui.separator();

            // Brush size slider
            ui.label("Size:");
            let mut size = surface.tools().brush_size();
            if ui
                .add(Slider::new(&mut size, MIN_BRUSH_SIZE..=SLIDER_MAX_BRUSH_SIZE).suffix("px"))
                .changed()
            {
                surface.set_brush_size(size);
            }
        });

        ui.horizontal(|ui| {
            if ui.add_enabled(surface.can_undo(), egui::Button::new("↩ Undo")).clicked() {
                actions.push(ToolbarAction::Undo);
            }
            if ui.add_enabled(surface.can_redo(), egui::Button::new("↪ Redo")).clicked() {
                actions.push(ToolbarAction::Redo);
            }
            if ui.button("🗑 Clear").clicked() {
                actions.push(ToolbarAction::Clear);
            }

            ui.separator();

            if ui.button("💾 Export PNG").clicked() {
                actions.push(ToolbarAction::Export(RasterFormat::Png));
            }
            if ui.button("📷 Export JPG").clicked() {
                actions.push(ToolbarAction::Export(RasterFormat::Jpeg { quality: jpeg_quality }));
            }
            if ui.button("📋 Copy").clicked() {
                actions.push(ToolbarAction::CopyToClipboard);
            }
        });

        actions
    }

    /// Renders the canvas into `rect`, re-uploading the texture only when the
    /// surface changed since the last frame
    pub fn render(&mut self, painter: &egui::Painter, rect: egui::Rect, surface: &DrawingSurface) {
        let Some(texture) = self.texture_for(surface) else {
            return;
        };
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(texture.id(), rect, uv, Color32::WHITE);
    }

    fn texture_for(&mut self, surface: &DrawingSurface) -> Option<&egui::TextureHandle> {
        let revision = surface.revision();
        if self.texture.is_none() || self.uploaded_revision != Some(revision) {
            let canvas = surface.canvas();
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [canvas.width() as usize, canvas.height() as usize],
                canvas.as_raw(),
            );
            if let Some(texture) = &mut self.texture {
                texture.set(image, egui::TextureOptions::NEAREST);
            } else {
                let texture = self.create_texture(image, "drawing-canvas");
                self.texture = Some(texture);
            }
            self.uploaded_revision = Some(revision);
        }
        self.texture.as_ref()
    }

    pub fn uploaded_revision(&self) -> Option<u64> {
        self.uploaded_revision
    }

    pub fn create_texture(&self, image: egui::ColorImage, name: &str) -> egui::TextureHandle {
        self.ctx.load_texture(name, image, egui::TextureOptions::NEAREST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurfaceConfig;

    #[test]
    fn test_texture_follows_revision() {
        let ctx = egui::Context::default();
        let mut renderer = Renderer::with_context(ctx.clone());
        let mut surface = DrawingSurface::with_size(16, 8, &SurfaceConfig::default());
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(16.0, 8.0));
        let painter = egui::Painter::new(ctx, egui::LayerId::background(), rect);

        assert_eq!(renderer.uploaded_revision(), None);
        renderer.render(&painter, rect, &surface);
        assert_eq!(renderer.uploaded_revision(), Some(surface.revision()));

        surface.clear();
        renderer.render(&painter, rect, &surface);
        assert_eq!(renderer.uploaded_revision(), Some(surface.revision()));
    }
}
