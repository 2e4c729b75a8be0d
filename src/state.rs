use egui::Pos2;

/// Pointer gesture state of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// A pointer is down. `start` anchors shapes, `last` is where the
    /// freehand tools continue from.
    Drawing { start: Pos2, last: Pos2 },
}

impl Gesture {
    pub fn begin(at: Pos2) -> Self {
        Self::Drawing { start: at, last: at }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    /// Move the continuation point. Does nothing while idle.
    pub fn advance(&mut self, to: Pos2) {
        if let Self::Drawing { last, .. } = self {
            *last = to;
        }
    }

    /// Leave the drawing state, returning whether a gesture was in progress.
    pub fn finish(&mut self) -> bool {
        std::mem::take(self).is_drawing()
    }
}
