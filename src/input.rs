use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

use crate::surface::DrawingSurface;
use crate::tools::{MIN_BRUSH_SIZE, SLIDER_MAX_BRUSH_SIZE, ToolType};

/// How much `[` and `]` change the brush size.
pub const BRUSH_SIZE_STEP: u32 = 5;

/// Pointer input in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the canvas
    PointerDown { pos: Pos2 },
    /// Pointer moved over the canvas, with or without a button held
    PointerMove { pos: Pos2 },
    /// Primary button released anywhere
    PointerUp,
    /// Pointer left the canvas
    PointerLeave,
}

/// Keyboard commands understood by the drawing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    SelectTool(ToolType),
    ShrinkBrush,
    GrowBrush,
}

impl Shortcut {
    /// Ctrl/Cmd+Z, Ctrl/Cmd+Y, digits 1 to 8, `[` and `]`.
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        if modifiers.command {
            return match key {
                Key::Z if !modifiers.shift => Some(Self::Undo),
                Key::Y => Some(Self::Redo),
                _ => None,
            };
        }
        if modifiers.any() {
            return None;
        }
        let digit = match key {
            Key::Num1 => 1,
            Key::Num2 => 2,
            Key::Num3 => 3,
            Key::Num4 => 4,
            Key::Num5 => 5,
            Key::Num6 => 6,
            Key::Num7 => 7,
            Key::Num8 => 8,
            Key::OpenBracket => return Some(Self::ShrinkBrush),
            Key::CloseBracket => return Some(Self::GrowBrush),
            _ => return None,
        };
        ToolType::from_shortcut(digit).map(Self::SelectTool)
    }

    pub fn apply(self, surface: &mut DrawingSurface) {
        let size = surface.tools().brush_size();
        match self {
            Self::Undo => {
                if let Err(err) = surface.undo() {
                    log::debug!("Undo: {err}");
                }
            }
            Self::Redo => {
                if let Err(err) = surface.redo() {
                    log::debug!("Redo: {err}");
                }
            }
            Self::SelectTool(tool) => surface.set_tool(tool),
            Self::ShrinkBrush => {
                surface.set_brush_size(size.saturating_sub(BRUSH_SIZE_STEP).max(MIN_BRUSH_SIZE));
            }
            Self::GrowBrush => {
                surface.set_brush_size((size + BRUSH_SIZE_STEP).min(SLIDER_MAX_BRUSH_SIZE).max(size));
            }
        }
    }
}

/// Handles converting raw egui input into canvas-local [`InputEvent`]s
pub struct InputHandler {
    canvas_rect: Rect,
    inside: bool,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            inside: false,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    fn to_canvas(&self, pos: Pos2) -> Pos2 {
        (pos - self.canvas_rect.min).to_pos2()
    }

    /// Translate one raw egui event. Events that do not concern the canvas yield nothing.
    pub fn translate(&mut self, event: &egui::Event) -> Option<InputEvent> {
        match event {
            egui::Event::PointerMoved(pos) => {
                let inside = self.canvas_rect.contains(*pos);
                let was_inside = std::mem::replace(&mut self.inside, inside);
                if inside {
                    Some(InputEvent::PointerMove { pos: self.to_canvas(*pos) })
                } else if was_inside {
                    Some(InputEvent::PointerLeave)
                } else {
                    None
                }
            }
            egui::Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                ..
            } => {
                if !*pressed {
                    Some(InputEvent::PointerUp)
                } else if self.canvas_rect.contains(*pos) {
                    self.inside = true;
                    Some(InputEvent::PointerDown { pos: self.to_canvas(*pos) })
                } else {
                    None
                }
            }
            egui::Event::PointerGone => {
                std::mem::take(&mut self.inside).then_some(InputEvent::PointerLeave)
            }
            _ => None,
        }
    }

    /// Process this frame's raw egui input, in order
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let raw_events = ctx.input(|input| input.events.clone());
        raw_events.iter().filter_map(|event| self.translate(event)).collect()
    }

    /// Keyboard shortcuts pressed this frame
    pub fn shortcuts(ctx: &Context) -> Vec<Shortcut> {
        ctx.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => Shortcut::from_key(*key, *modifiers),
                    _ => None,
                })
                .collect()
        })
    }
}
