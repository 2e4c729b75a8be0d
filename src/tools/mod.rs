use egui::CursorIcon;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 100;
/// Upper end of the toolbar slider and the `]` shortcut.
pub const SLIDER_MAX_BRUSH_SIZE: u32 = 50;

/// Every tool the drawing surface knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolType {
    #[default]
    Pen,
    Pencil,
    Brush,
    Eraser,
    Fill,
    Line,
    Rectangle,
    Circle,
}

impl ToolType {
    /// Toolbar order, which is also the order of the number-key shortcuts.
    pub const ALL: [ToolType; 8] = [
        ToolType::Pen,
        ToolType::Pencil,
        ToolType::Brush,
        ToolType::Eraser,
        ToolType::Line,
        ToolType::Rectangle,
        ToolType::Circle,
        ToolType::Fill,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pen => "Pen",
            Self::Pencil => "Pencil",
            Self::Brush => "Brush",
            Self::Eraser => "Eraser",
            Self::Fill => "Fill",
            Self::Line => "Line",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pen => "🖊",
            Self::Pencil => "✏",
            Self::Brush => "🖌",
            Self::Eraser => "⌫",
            Self::Fill => "💧",
            Self::Line => "╱",
            Self::Rectangle => "◻",
            Self::Circle => "○",
        }
    }

    /// Look a tool up by the tag the hosting UI uses for it.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "pen" => Some(Self::Pen),
            "pencil" => Some(Self::Pencil),
            "brush" => Some(Self::Brush),
            "eraser" => Some(Self::Eraser),
            "fill" => Some(Self::Fill),
            "line" => Some(Self::Line),
            "rect" | "rectangle" => Some(Self::Rectangle),
            "circle" => Some(Self::Circle),
            _ => None,
        }
    }

    /// Number keys 1 to 8 select the tools in toolbar order.
    pub fn from_shortcut(digit: u8) -> Option<Self> {
        Self::ALL.get(usize::from(digit).checked_sub(1)?).copied()
    }

    /// Shape tools draw a live preview from the start point until release.
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Line | Self::Rectangle | Self::Circle)
    }

    pub fn cursor(&self) -> CursorIcon {
        match self {
            Self::Eraser | Self::Fill => CursorIcon::Cell,
            _ => CursorIcon::Crosshair,
        }
    }
}

/// The active tool and brush configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub tool: ToolType,
    brush_size: u32,
    pub brush_color: Rgb,
    pub fill_color: Rgb,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolType::Pen,
            brush_size: 5,
            brush_color: Rgb::new(0x00, 0xD9, 0xFF),
            fill_color: Rgb::new(0xA8, 0x55, 0xF7),
        }
    }
}

impl ToolSettings {
    pub fn new(tool: ToolType, brush_size: u32, brush_color: Rgb, fill_color: Rgb) -> Self {
        let mut settings = Self {
            tool,
            brush_size: MIN_BRUSH_SIZE,
            brush_color,
            fill_color,
        };
        settings.set_brush_size(brush_size);
        settings
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Clamped to `MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE`.
    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    /// Re-apply the size clamp, for settings that came from storage.
    pub fn sanitized(mut self) -> Self {
        self.set_brush_size(self.brush_size);
        self
    }
}
