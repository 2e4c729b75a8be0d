//! Hard-edged rasterisation of the primitives the tools need.
//!
//! A pixel is painted when its center lies inside the shape. Every primitive
//! clips to the canvas, so callers may pass coordinates outside of it.

use egui::{Pos2, vec2};
use image::Rgba;

use crate::canvas::Canvas;
use crate::color::Rgb;

/// Smallest half-width we rasterise with, so that a 1px brush placed exactly
/// on a pixel corner still touches the pixels around it.
const MIN_RADIUS: f32 = 0.75;

fn paint_where(canvas: &mut Canvas, min: Pos2, max: Pos2, color: Rgba<u8>, covers: impl Fn(Pos2) -> bool) {
    let x0 = (min.x.floor() as i64).max(0);
    let y0 = (min.y.floor() as i64).max(0);
    let x1 = (max.x.ceil() as i64).min(i64::from(canvas.width()) - 1);
    let y1 = (max.y.ceil() as i64).min(i64::from(canvas.height()) - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            if covers(center) {
                canvas.put(x, y, color);
            }
        }
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// A segment of the given width with round caps.
pub fn stroke_line(canvas: &mut Canvas, from: Pos2, to: Pos2, width: f32, color: Rgb) {
    let radius = (width / 2.0).max(MIN_RADIUS);
    let pad = vec2(radius, radius);
    paint_where(canvas, from.min(to) - pad, from.max(to) + pad, color.to_rgba(), |p| {
        distance_to_segment(p, from, to) <= radius
    });
}

/// A solid disc.
pub fn fill_circle(canvas: &mut Canvas, center: Pos2, radius: f32, color: Rgb) {
    let radius = radius.max(MIN_RADIUS);
    let pad = vec2(radius, radius);
    paint_where(canvas, center - pad, center + pad, color.to_rgba(), |p| {
        p.distance_sq(center) <= radius * radius
    });
}

/// Outline of the axis-aligned rectangle spanned by two opposite corners,
/// centered on the rectangle edges, with square (mitred) corners.
pub fn stroke_rect(canvas: &mut Canvas, a: Pos2, b: Pos2, width: f32, color: Rgb) {
    let half = (width / 2.0).max(MIN_RADIUS);
    let lo = a.min(b);
    let hi = a.max(b);
    let outer_min = lo - vec2(half, half);
    let outer_max = hi + vec2(half, half);
    let inner_min = lo + vec2(half, half);
    let inner_max = hi - vec2(half, half);

    paint_where(canvas, outer_min, outer_max, color.to_rgba(), |p| {
        let in_outer = p.x >= outer_min.x && p.x <= outer_max.x && p.y >= outer_min.y && p.y <= outer_max.y;
        let in_inner = p.x > inner_min.x && p.x < inner_max.x && p.y > inner_min.y && p.y < inner_max.y;
        in_outer && !in_inner
    });
}

/// Outline of a circle; the stroke is centered on the radius.
pub fn stroke_circle(canvas: &mut Canvas, center: Pos2, radius: f32, width: f32, color: Rgb) {
    let half = (width / 2.0).max(MIN_RADIUS);
    let reach = radius + half;
    paint_where(canvas, center - vec2(reach, reach), center + vec2(reach, reach), color.to_rgba(), |p| {
        (p.distance(center) - radius).abs() <= half
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    const BG: Rgb = Rgb::BLACK;
    const INK: Rgb = Rgb::new(255, 0, 0);

    fn painted(canvas: &Canvas, x: u32, y: u32) -> bool {
        canvas.pixel(x, y) == Some(INK.to_rgba())
    }

    #[test]
    fn test_line_covers_its_path_only() {
        let mut canvas = Canvas::new(20, 20, BG);
        stroke_line(&mut canvas, pos2(2.0, 10.0), pos2(17.0, 10.0), 3.0, INK);

        assert!(painted(&canvas, 2, 10));
        assert!(painted(&canvas, 10, 9));
        assert!(painted(&canvas, 16, 10));
        assert!(!painted(&canvas, 10, 13));
        assert!(!painted(&canvas, 10, 6));
    }

    #[test]
    fn test_degenerate_line_is_a_dot() {
        let mut canvas = Canvas::new(10, 10, BG);
        stroke_line(&mut canvas, pos2(5.0, 5.0), pos2(5.0, 5.0), 1.0, INK);
        assert!(painted(&canvas, 4, 4));
        assert!(painted(&canvas, 5, 5));
        assert!(canvas.count_not(BG) <= 4);
    }

    #[test]
    fn test_shapes_clip_to_canvas() {
        let mut canvas = Canvas::new(10, 10, BG);
        fill_circle(&mut canvas, pos2(-50.0, -50.0), 5.0, INK);
        assert_eq!(canvas.count_not(BG), 0);

        fill_circle(&mut canvas, pos2(0.0, 0.0), 3.0, INK);
        assert!(painted(&canvas, 0, 0));
        assert!(!painted(&canvas, 5, 5));
    }

    #[test]
    fn test_rect_outline_is_hollow() {
        let mut canvas = Canvas::new(30, 30, BG);
        stroke_rect(&mut canvas, pos2(20.0, 20.0), pos2(5.0, 5.0), 2.0, INK);

        // corners and edges
        assert!(painted(&canvas, 5, 5));
        assert!(painted(&canvas, 19, 19));
        assert!(painted(&canvas, 12, 5));
        assert!(painted(&canvas, 5, 12));
        // inside and outside
        assert!(!painted(&canvas, 12, 12));
        assert!(!painted(&canvas, 25, 25));
    }

    #[test]
    fn test_circle_outline_is_hollow() {
        let mut canvas = Canvas::new(40, 40, BG);
        stroke_circle(&mut canvas, pos2(20.0, 20.0), 10.0, 2.0, INK);

        assert!(painted(&canvas, 29, 19));
        assert!(painted(&canvas, 19, 10));
        assert!(!painted(&canvas, 20, 20));
        assert!(!painted(&canvas, 35, 35));
    }
}
