use canvas_draw::{ClipboardSink, DrawingSurface, RasterFormat, Rgb, SurfaceConfig, SurfaceError, SurfaceResult};
use egui::pos2;

// Helper: a surface with one committed stroke on it
fn create_drawn_surface() -> DrawingSurface {
    let config = SurfaceConfig {
        brush_color: Rgb::new(0xFF, 0x00, 0x00),
        ..SurfaceConfig::default()
    };
    let mut surface = DrawingSurface::with_size(64, 48, &config);
    surface.pointer_down(pos2(4.0, 4.0));
    surface.pointer_move(pos2(60.0, 40.0));
    surface.pointer_up();
    surface
}

#[derive(Default)]
struct RecordingClipboard {
    copied: Option<(u32, u32, Vec<u8>)>,
}

impl ClipboardSink for RecordingClipboard {
    fn set_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> SurfaceResult<()> {
        self.copied = Some((width, height, rgba.to_vec()));
        Ok(())
    }
}

struct UnavailableClipboard;

impl ClipboardSink for UnavailableClipboard {
    fn set_image(&mut self, _width: u32, _height: u32, _rgba: &[u8]) -> SurfaceResult<()> {
        Err(SurfaceError::Clipboard("no clipboard in this session".to_string()))
    }
}

#[test]
fn test_png_export_is_lossless() {
    let surface = create_drawn_surface();
    let exported = surface.export_raster(RasterFormat::Png).unwrap();

    assert!(exported.file_name.starts_with("drawing-"));
    assert!(exported.file_name.ends_with(".png"));
    let decoded = image::load_from_memory(&exported.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (64, 48));
    assert_eq!(decoded.as_raw(), surface.canvas().as_raw());
}

#[test]
fn test_jpeg_export_matches_canvas_size() {
    let surface = create_drawn_surface();
    let exported = surface.export_raster(RasterFormat::Jpeg { quality: 90 }).unwrap();

    assert!(exported.file_name.ends_with(".jpg"));
    assert_eq!(
        image::guess_format(&exported.bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
    let decoded = image::load_from_memory(&exported.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}

#[test]
fn test_export_does_not_touch_history() {
    let surface = create_drawn_surface();
    let before = surface.canvas().clone();
    surface.export_raster(RasterFormat::Png).unwrap();
    assert_eq!(surface.canvas(), &before);
    assert_eq!(surface.history().len(), 2);
}

#[test]
fn test_save_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let surface = create_drawn_surface();
    let exported = surface.export_raster(RasterFormat::Png).unwrap();

    let path = exported.save_to(dir.path()).unwrap();
    assert_eq!(path, dir.path().join(&exported.file_name));
    assert_eq!(std::fs::read(&path).unwrap(), exported.bytes);
}

#[test]
fn test_save_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let surface = create_drawn_surface();
    let exported = surface.export_raster(RasterFormat::Png).unwrap();

    let result = exported.save_to(dir.path().join("missing"));
    assert!(matches!(result, Err(SurfaceError::Io(_))));
}

#[test]
fn test_copy_to_clipboard() {
    let surface = create_drawn_surface();
    let mut clipboard = RecordingClipboard::default();

    assert!(surface.copy_to_clipboard(&mut clipboard));
    let (width, height, rgba) = clipboard.copied.unwrap();
    assert_eq!((width, height), (64, 48));
    assert_eq!(rgba, surface.canvas().as_raw());
}

#[test]
fn test_clipboard_failure_is_reported() {
    let surface = create_drawn_surface();
    let before = surface.canvas().clone();

    assert!(!surface.copy_to_clipboard(&mut UnavailableClipboard));
    assert_eq!(surface.canvas(), &before);
}
