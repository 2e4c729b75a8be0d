use crate::canvas::Canvas;
use crate::color::Rgb;

/// Per-channel distance below which two colors count as the same region.
pub const DEFAULT_TOLERANCE: u8 = 10;

/// Recolor the 4-connected region around `(x, y)` with `fill`.
///
/// A pixel joins the region when each of its R, G and B channels is within
/// `tolerance` of the seed pixel's color (alpha is ignored). Written pixels are
/// opaque. Uses an explicit stack so large regions cannot overflow the call
/// stack.
///
/// A tolerance of 0 is treated as 1, so exact matches always fill.
///
/// Returns the number of pixels written. A seed outside the canvas, or a seed
/// that already has the fill color, writes nothing.
pub fn flood_fill(canvas: &mut Canvas, x: i64, y: i64, fill: Rgb, tolerance: u8) -> usize {
    let tolerance = tolerance.max(1);
    if !canvas.in_bounds(x, y) {
        return 0;
    }
    let Some(seed) = canvas.pixel(x as u32, y as u32) else {
        return 0;
    };
    let target = Rgb::from(seed);
    if fill.matches(seed, tolerance) {
        return 0;
    }

    let replacement = fill.to_rgba();
    let mut written = 0;
    let mut stack = vec![(x, y)];

    while let Some((x, y)) = stack.pop() {
        if !canvas.in_bounds(x, y) {
            continue;
        }
        let Some(current) = canvas.pixel(x as u32, y as u32) else {
            continue;
        };
        // `fill` is outside the target range, so written pixels stop matching.
        if !target.matches(current, tolerance) {
            continue;
        }

        canvas.put(x, y, replacement);
        written += 1;

        stack.push((x + 1, y));
        stack.push((x - 1, y));
        stack.push((x, y + 1));
        stack.push((x, y - 1));
    }

    log::debug!("Flood fill at ({x}, {y}) with {fill} wrote {written} pixels");
    written
}
