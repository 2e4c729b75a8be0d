use egui::Pos2;

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::config::SurfaceConfig;
use crate::error::SurfaceResult;
use crate::export::{self, ClipboardSink, ExportedImage, RasterFormat};
use crate::flood_fill;
use crate::history::{History, Snapshot};
use crate::input::InputEvent;
use crate::raster;
use crate::state::Gesture;
use crate::tools::{ToolSettings, ToolType};

/// A raster canvas driven by pointer input, with undo/redo history.
///
/// Every finished gesture, fill and clear records exactly one history entry.
/// Intermediate pointer moves never do.
#[derive(Debug)]
pub struct DrawingSurface {
    canvas: Canvas,
    /// Committed pixels as they were when the current shape gesture started.
    preview: Canvas,
    tools: ToolSettings,
    /// Tool that started the current gesture; later tool changes apply to the next one.
    gesture_tool: ToolType,
    gesture: Gesture,
    history: History,
    background: Rgb,
    fill_tolerance: u8,
    revision: u64,
}

impl DrawingSurface {
    pub fn new(width: u32, config: &SurfaceConfig) -> Self {
        Self::with_size(width, config.canvas_height, config)
    }

    pub fn with_size(width: u32, height: u32, config: &SurfaceConfig) -> Self {
        let config = config.clone().sanitized();
        let canvas = Canvas::new(width.max(1), height.max(1), config.background);
        let mut surface = Self {
            preview: canvas.clone(),
            canvas,
            tools: config.tool_settings(),
            gesture_tool: ToolType::default(),
            gesture: Gesture::Idle,
            history: History::new(config.history_capacity),
            background: config.background,
            fill_tolerance: config.fill_tolerance,
            revision: 0,
        };
        surface.commit();
        log::debug!("Drawing surface ready at {}x{}", surface.width(), surface.height());
        surface
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Bumped on every pixel change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // ---- tool configuration -------------------------------------------------

    pub fn set_tool(&mut self, tool: ToolType) {
        if self.tools.tool != tool {
            log::debug!("Tool: {} -> {}", self.tools.tool.name(), tool.name());
            self.tools.tool = tool;
        }
    }

    /// Unknown tags are ignored. Returns whether the tag was recognised.
    pub fn set_tool_by_tag(&mut self, tag: &str) -> bool {
        match ToolType::from_tag(tag) {
            Some(tool) => {
                self.set_tool(tool);
                true
            }
            None => {
                log::debug!("Ignoring unknown tool {tag:?}");
                false
            }
        }
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.tools.set_brush_size(size);
    }

    pub fn set_brush_color(&mut self, color: Rgb) {
        self.tools.brush_color = color;
    }

    pub fn set_fill_color(&mut self, color: Rgb) {
        self.tools.fill_color = color;
    }

    /// Malformed colors are ignored. Returns whether the color was applied.
    pub fn set_brush_color_hex(&mut self, hex: &str) -> bool {
        let Some(color) = Rgb::from_hex(hex) else {
            return false;
        };
        self.set_brush_color(color);
        true
    }

    /// Malformed colors are ignored. Returns whether the color was applied.
    pub fn set_fill_color_hex(&mut self, hex: &str) -> bool {
        let Some(color) = Rgb::from_hex(hex) else {
            return false;
        };
        self.set_fill_color(color);
        true
    }

    /// Replace the whole tool configuration, e.g. with settings restored from storage.
    pub fn set_tool_settings(&mut self, settings: ToolSettings) {
        self.tools = settings.sanitized();
    }

    // ---- pointer input ------------------------------------------------------

    pub fn handle_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { pos } => self.pointer_down(pos),
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::PointerUp => {
                self.pointer_up();
            }
            InputEvent::PointerLeave => {
                self.pointer_leave();
            }
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        // A press without a release in between: keep the earlier gesture.
        self.pointer_up();

        let tool = self.tools.tool;
        if tool == ToolType::Fill {
            self.flood_fill(pos.x.floor() as i64, pos.y.floor() as i64, self.tools.fill_color);
            self.commit();
            return;
        }
        if tool.is_shape() {
            self.preview.copy_from(&self.canvas);
        }
        self.gesture_tool = tool;
        self.gesture = Gesture::begin(pos);
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        let Gesture::Drawing { start, last } = self.gesture else {
            return;
        };
        let size = self.tools.brush_size() as f32;
        let color = self.tools.brush_color;

        match self.gesture_tool {
            ToolType::Pen | ToolType::Pencil => {
                raster::stroke_line(&mut self.canvas, last, pos, size, color);
                self.gesture.advance(pos);
            }
            ToolType::Brush => {
                raster::fill_circle(&mut self.canvas, pos, size / 2.0, color);
                raster::stroke_line(&mut self.canvas, last, pos, size, color);
                self.gesture.advance(pos);
            }
            ToolType::Eraser => {
                raster::fill_circle(&mut self.canvas, pos, size, self.background);
            }
            ToolType::Line | ToolType::Rectangle | ToolType::Circle => {
                self.canvas.copy_from(&self.preview);
                self.draw_shape(self.gesture_tool, start, pos, size, color);
            }
            ToolType::Fill => return,
        }
        self.touch();
    }

    fn draw_shape(&mut self, tool: ToolType, start: Pos2, end: Pos2, size: f32, color: Rgb) {
        match tool {
            ToolType::Line => raster::stroke_line(&mut self.canvas, start, end, size, color),
            ToolType::Rectangle => raster::stroke_rect(&mut self.canvas, start, end, size, color),
            ToolType::Circle => {
                let radius = start.distance(end);
                raster::stroke_circle(&mut self.canvas, start, radius, size, color);
            }
            _ => {}
        }
    }

    /// End the current gesture and record it. Returns false when no gesture was in progress.
    pub fn pointer_up(&mut self) -> bool {
        if !self.gesture.finish() {
            return false;
        }
        self.commit();
        true
    }

    /// Leaving the canvas ends a gesture the same way releasing does.
    pub fn pointer_leave(&mut self) -> bool {
        self.pointer_up()
    }

    // ---- direct edits -------------------------------------------------------

    /// Fill the region around `(x, y)` with `color` without recording history.
    /// Returns the number of pixels changed.
    pub fn flood_fill(&mut self, x: i64, y: i64, color: Rgb) -> usize {
        let written = flood_fill::flood_fill(&mut self.canvas, x, y, color, self.fill_tolerance);
        if written > 0 {
            self.touch();
        }
        written
    }

    /// Paint everything with the background color and record it.
    pub fn clear(&mut self) {
        self.gesture = Gesture::Idle;
        self.canvas.fill(self.background);
        self.preview.fill(self.background);
        self.touch();
        self.commit();
    }

    /// Reallocate both buffers at a new size, keeping the overlapping pixels.
    /// Zero or unchanged sizes are ignored. History is not touched.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || [width, height] == self.canvas.size() {
            return false;
        }
        log::debug!("Resizing canvas {:?} -> {width}x{height}", self.canvas.size());
        self.canvas = self.canvas.resized(width, height, self.background);
        self.preview = self.preview.resized(width, height, self.background);
        self.touch();
        true
    }

    // ---- history ------------------------------------------------------------

    /// Record the current canvas as a new history entry, dropping any redo tail.
    /// Returns false (and leaves history alone) if the canvas could not be encoded.
    pub fn commit(&mut self) -> bool {
        match Snapshot::capture(&self.canvas) {
            Ok(snapshot) => {
                self.history.commit(snapshot);
                true
            }
            Err(err) => {
                log::error!("Failed to record history entry: {err}");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one entry. A gesture in progress is discarded first, even
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> SurfaceResult<()> {
        self.cancel_gesture();
        let previous = self.history.cursor();
        let snapshot = self.history.undo()?.clone();
        self.restore_or_rollback(&snapshot, previous)
    }

    /// Step forward one entry. A gesture in progress is discarded first, even
    /// when there is nothing to redo.
    pub fn redo(&mut self) -> SurfaceResult<()> {
        self.cancel_gesture();
        let previous = self.history.cursor();
        let snapshot = self.history.redo()?.clone();
        self.restore_or_rollback(&snapshot, previous)
    }

    /// Drop an unfinished gesture and put the current entry's pixels back.
    fn cancel_gesture(&mut self) {
        if !self.gesture.finish() {
            return;
        }
        let Some(current) = self.history.current().cloned() else {
            return;
        };
        log::debug!("Discarding unfinished gesture");
        if let Err(err) = self.restore(&current) {
            log::error!("{err}; unfinished gesture stays on the canvas");
        }
    }

    fn restore_or_rollback(&mut self, snapshot: &Snapshot, previous: usize) -> SurfaceResult<()> {
        if let Err(err) = self.restore(snapshot) {
            log::error!("{err}; keeping the current canvas");
            self.history.reset_cursor(previous);
            return Err(err);
        }
        Ok(())
    }

    /// Overwrite the canvas with a snapshot. A snapshot taken at another size
    /// is drawn at the origin over the background. History is not touched, and
    /// on error the canvas is left as it was.
    pub fn restore(&mut self, snapshot: &Snapshot) -> SurfaceResult<()> {
        let pixels = snapshot.decode()?;
        if pixels.dimensions() == (self.width(), self.height()) {
            self.canvas = Canvas::from_image(pixels);
        } else {
            self.canvas.fill(self.background);
            self.canvas.blit(&pixels);
        }
        self.touch();
        Ok(())
    }

    // ---- export -------------------------------------------------------------

    pub fn export_raster(&self, format: RasterFormat) -> SurfaceResult<ExportedImage> {
        export::export(self.canvas.image(), format)
    }

    /// Copy the canvas to `clipboard`. Failures are logged and reported as `false`.
    pub fn copy_to_clipboard(&self, clipboard: &mut dyn ClipboardSink) -> bool {
        match clipboard.set_image(self.width(), self.height(), self.canvas.as_raw()) {
            Ok(()) => {
                log::info!("Copied {}x{} canvas to clipboard", self.width(), self.height());
                true
            }
            Err(err) => {
                log::error!("Copy to clipboard failed: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn surface() -> DrawingSurface {
        DrawingSurface::with_size(20, 20, &SurfaceConfig::default())
    }

    #[test]
    fn test_undo_into_corrupted_entry_rolls_back() {
        let mut surface = surface();
        surface.history.commit(Snapshot::from_bytes(b"garbage".to_vec()));
        surface.set_tool(ToolType::Pen);
        surface.pointer_down(pos2(2.0, 2.0));
        surface.pointer_move(pos2(15.0, 15.0));
        surface.pointer_up();
        let before = surface.canvas().clone();

        assert!(surface.undo().is_err());
        assert_eq!(surface.history().cursor(), 2);
        assert_eq!(surface.canvas(), &before);
    }

    #[test]
    fn test_tool_change_mid_gesture_applies_to_next_gesture() {
        let mut surface = surface();
        surface.set_tool(ToolType::Rectangle);
        surface.pointer_down(pos2(2.0, 2.0));
        surface.set_tool(ToolType::Pen);
        surface.pointer_move(pos2(10.0, 10.0));
        surface.pointer_move(pos2(12.0, 12.0));
        surface.pointer_up();

        let mut expected = Canvas::new(20, 20, surface.background());
        raster::stroke_rect(&mut expected, pos2(2.0, 2.0), pos2(12.0, 12.0), 5.0, surface.tools().brush_color);
        assert_eq!(surface.canvas(), &expected);
    }

    #[test]
    fn test_revision_tracks_pixel_changes() {
        let mut surface = surface();
        let start = surface.revision();
        surface.set_brush_size(3);
        assert_eq!(surface.revision(), start);
        surface.clear();
        assert!(surface.revision() > start);
    }
}
