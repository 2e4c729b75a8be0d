use thiserror::Error;

/// Errors reported by the drawing surface.
///
/// None of these are fatal: every failing operation leaves the canvas and
/// the history exactly as they were before the call.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Failed to decode snapshot: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
