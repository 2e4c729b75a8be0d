use std::sync::Arc;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

use crate::canvas::Canvas;
use crate::error::{SurfaceError, SurfaceResult};

pub const DEFAULT_CAPACITY: usize = 50;

/// An immutable, PNG-encoded copy of the whole canvas.
///
/// Cloning shares the encoded bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    png: Arc<[u8]>,
}

impl Snapshot {
    /// Encode the current canvas.
    pub fn capture(canvas: &Canvas) -> SurfaceResult<Self> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(canvas.as_raw(), canvas.width(), canvas.height(), ExtendedColorType::Rgba8)
            .map_err(SurfaceError::Encode)?;
        Ok(Self { png: png.into() })
    }

    /// Wrap already-encoded bytes. Nothing is validated until [`Snapshot::decode`].
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self { png: bytes.into() }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn decode(&self) -> SurfaceResult<RgbaImage> {
        image::load_from_memory_with_format(&self.png, ImageFormat::Png)
            .map(|image| image.into_rgba8())
            .map_err(SurfaceError::Decode)
    }
}

/// Linear undo history of canvas snapshots with a cursor on the current one.
///
/// The cursor always points at a valid entry once anything has been
/// committed. Committing after an undo discards the redo tail, and the oldest
/// entry is evicted once `capacity` is exceeded.
#[derive(Debug)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    /// A capacity of zero is raised to one: the current state is always kept.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn commit(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back and return the entry that is now current.
    pub fn undo(&mut self) -> SurfaceResult<&Snapshot> {
        if !self.can_undo() {
            return Err(SurfaceError::NothingToUndo);
        }
        self.cursor -= 1;
        Ok(&self.entries[self.cursor])
    }

    /// Step forward and return the entry that is now current.
    pub fn redo(&mut self) -> SurfaceResult<&Snapshot> {
        if !self.can_redo() {
            return Err(SurfaceError::NothingToRedo);
        }
        self.cursor += 1;
        Ok(&self.entries[self.cursor])
    }

    /// Move the cursor back to `cursor`, used when restoring the entry it moved to failed.
    pub(crate) fn reset_cursor(&mut self, cursor: usize) {
        if cursor < self.entries.len() {
            self.cursor = cursor;
        }
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tag: u8) -> Snapshot {
        Snapshot::from_bytes(vec![tag])
    }

    #[test]
    fn test_empty_history_cannot_move() {
        let mut history = History::new(3);
        assert!(history.is_empty());
        assert!(matches!(history.undo(), Err(SurfaceError::NothingToUndo)));
        assert!(matches!(history.redo(), Err(SurfaceError::NothingToRedo)));
    }

    #[test]
    fn test_undo_redo_walks_entries() {
        let mut history = History::new(10);
        for tag in 0..3 {
            history.commit(entry(tag));
        }
        assert_eq!(history.cursor(), 2);

        assert_eq!(history.undo().unwrap().bytes(), &[1]);
        assert_eq!(history.undo().unwrap().bytes(), &[0]);
        assert!(history.undo().is_err());
        assert_eq!(history.cursor(), 0);

        assert_eq!(history.redo().unwrap().bytes(), &[1]);
        assert_eq!(history.redo().unwrap().bytes(), &[2]);
        assert!(history.redo().is_err());
    }

    #[test]
    fn test_commit_drops_redo_tail() {
        let mut history = History::new(10);
        for tag in 0..4 {
            history.commit(entry(tag));
        }
        history.undo().unwrap();
        history.undo().unwrap();

        history.commit(entry(9));
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().unwrap().bytes(), &[9]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new(3);
        for tag in 0..5 {
            history.commit(entry(tag));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        history.undo().unwrap();
        assert_eq!(history.undo().unwrap().bytes(), &[2]);
    }

    #[test]
    fn test_zero_capacity_keeps_current() {
        let mut history = History::new(0);
        history.commit(entry(1));
        history.commit(entry(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().unwrap().bytes(), &[2]);
    }

    #[test]
    fn test_corrupted_snapshot_fails_to_decode() {
        let snapshot = Snapshot::from_bytes(b"definitely not a png".to_vec());
        assert!(matches!(snapshot.decode(), Err(SurfaceError::Decode(_))));
    }
}
