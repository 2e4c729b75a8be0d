use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

use crate::error::{SurfaceError, SurfaceResult};
use crate::util::time;

/// Output format for [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// Lossless, keeps alpha.
    Png,
    /// Lossy, alpha is dropped. Quality is 1 (worst) to 100 (best).
    Jpeg { quality: u8 },
}

impl RasterFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// An encoded image ready to be saved or handed to the user.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub format: RasterFormat,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    /// Write into `dir` under the generated file name.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> SurfaceResult<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        log::info!("Exported {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// `drawing-<unix millis>.<ext>`
pub fn file_name(format: RasterFormat, timestamp_millis: u64) -> String {
    format!("drawing-{timestamp_millis}.{}", format.extension())
}

pub fn encode(pixels: &RgbaImage, format: RasterFormat) -> SurfaceResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let (width, height) = pixels.dimensions();
    let encoded = match format {
        RasterFormat::Png => PngEncoder::new(&mut bytes).write_image(
            pixels.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        RasterFormat::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgba8(pixels.clone()).into_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
    };
    encoded.map_err(SurfaceError::Encode)?;
    Ok(bytes)
}

/// Encode and name an export, stamped with the current time.
pub fn export(pixels: &RgbaImage, format: RasterFormat) -> SurfaceResult<ExportedImage> {
    Ok(ExportedImage {
        file_name: file_name(format, time::timestamp_millis()),
        format,
        bytes: encode(pixels, format)?,
    })
}

/// Somewhere an image can be copied to.
pub trait ClipboardSink {
    /// `rgba` is row-major, 4 bytes per pixel, `width * height` pixels.
    fn set_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> SurfaceResult<()>;
}

/// The operating system clipboard.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[cfg(not(target_arch = "wasm32"))]
impl ClipboardSink for SystemClipboard {
    fn set_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> SurfaceResult<()> {
        let image = arboard::ImageData {
            width: width as usize,
            height: height as usize,
            bytes: std::borrow::Cow::Borrowed(rgba),
        };
        let mut clipboard = arboard::Clipboard::new().map_err(|e| SurfaceError::Clipboard(e.to_string()))?;
        clipboard
            .set_image(image)
            .map_err(|e| SurfaceError::Clipboard(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(file_name(RasterFormat::Png, 1_700_000_000_000), "drawing-1700000000000.png");
        assert_eq!(file_name(RasterFormat::Jpeg { quality: 90 }, 42), "drawing-42.jpg");
    }

    #[test]
    fn test_formats() {
        assert_eq!(RasterFormat::Png.mime_type(), "image/png");
        assert_eq!(RasterFormat::Jpeg { quality: 10 }.mime_type(), "image/jpeg");
    }
}
