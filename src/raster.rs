//! Path construction and pen styles shared by the drawing tools.
//!
//! Committed strokes are drawn without anti-aliasing so region boundaries
//! stay crisp for the fill tool.

use egui::{Color32, Pos2};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PremultipliedColorU8, Rect,
    Stroke, StrokeDash, Transform,
};

/// Corner radius used by the rounded-rectangle tool
pub const ROUNDED_RADIUS: f32 = 25.0;

/// Dash pattern of selection outlines
const SELECTION_DASH: [f32; 2] = [4.0, 4.0];

pub fn skia_color(color: Color32) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

pub fn premultiplied(color: Color32) -> PremultipliedColorU8 {
    skia_color(color).premultiply().to_color_u8()
}

pub fn paint(color: tiny_skia::Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = false;
    paint
}

fn point(pos: Pos2) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(pos.x, pos.y)
}

/// Pen shapes, named after the tools that use them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenStyle {
    /// Square cap, round join
    Pen,
    /// Round cap, round join: brush, eraser, lines and polylines
    Round,
    /// Square cap, miter join: shape outlines
    Outline,
}

pub fn stroke(width: f32, style: PenStyle) -> Stroke {
    let (line_cap, line_join) = match style {
        PenStyle::Pen => (LineCap::Square, LineJoin::Round),
        PenStyle::Round => (LineCap::Round, LineJoin::Round),
        PenStyle::Outline => (LineCap::Square, LineJoin::Miter),
    };
    Stroke {
        width: width.max(1.0),
        line_cap,
        line_join,
        ..Stroke::default()
    }
}

/// One-pixel outline for previews, dashed when `dash_offset` is given
pub fn preview_stroke(dash_offset: Option<f32>) -> Stroke {
    Stroke {
        width: 1.0,
        dash: dash_offset.and_then(|offset| StrokeDash::new(SELECTION_DASH.to_vec(), offset)),
        ..Stroke::default()
    }
}

/// Normalized rectangle spanned by two corners, `None` when degenerate
pub fn corners_rect(a: Pos2, b: Pos2) -> Option<Rect> {
    Rect::from_ltrb(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
}

pub fn line_path(from: Pos2, to: Pos2) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    pb.finish()
}

pub fn rect_path(a: Pos2, b: Pos2) -> Option<Path> {
    let rect = corners_rect(a, b)?;
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        // Collapsed drags still show as a line
        return line_path(a, b);
    }
    Some(PathBuilder::from_rect(rect))
}

pub fn ellipse_path(a: Pos2, b: Pos2) -> Option<Path> {
    PathBuilder::from_oval(corners_rect(a, b)?)
}

pub fn rounded_rect_path(a: Pos2, b: Pos2, radius: f32) -> Option<Path> {
    let rect = corners_rect(a, b)?;
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
    if r <= 0.0 {
        return rect_path(a, b);
    }
    // Cubic approximation of a quarter circle
    let k = r * 0.552_284_8;
    let (l, t, rt, bt) = (rect.left(), rect.top(), rect.right(), rect.bottom());

    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.cubic_to(rt - r + k, t, rt, t + r - k, rt, t + r);
    pb.line_to(rt, bt - r);
    pb.cubic_to(rt, bt - r + k, rt - r + k, bt, rt - r, bt);
    pb.line_to(l + r, bt);
    pb.cubic_to(l + r - k, bt, l, bt - r + k, l, bt - r);
    pb.line_to(l, t + r);
    pb.cubic_to(l, t + r - k, l + r - k, t, l + r, t);
    pb.close();
    pb.finish()
}

pub fn polyline_path(points: &[Pos2]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.finish()
}

pub fn polygon_path(points: &[Pos2]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

/// Stroke a path onto `pixmap`
pub fn stroke_path(pixmap: &mut Pixmap, path: &Path, color: tiny_skia::Color, stroke: &Stroke) {
    pixmap.stroke_path(path, &paint(color), stroke, Transform::identity(), None);
}

/// Fill a path onto `pixmap`
pub fn fill_path(pixmap: &mut Pixmap, path: &Path, color: tiny_skia::Color) {
    pixmap.fill_path(path, &paint(color), FillRule::Winding, Transform::identity(), None);
}

/// Paint a segment between two pointer positions
pub fn segment(
    pixmap: &mut Pixmap,
    from: Pos2,
    to: Pos2,
    color: tiny_skia::Color,
    stroke: &Stroke,
) {
    if from == to {
        // Zero-length segments draw nothing through the stroker; put down a dot
        let half = stroke.width / 2.0;
        if let Some(rect) = Rect::from_xywh(to.x - half, to.y - half, stroke.width, stroke.width) {
            let path = match stroke.line_cap {
                LineCap::Round => PathBuilder::from_oval(rect),
                _ => Some(PathBuilder::from_rect(rect)),
            };
            if let Some(path) = path {
                fill_path(pixmap, &path, color);
            }
        }
        return;
    }
    if let Some(path) = line_path(from, to) {
        stroke_path(pixmap, &path, color, stroke);
    }
}

/// Set a single pixel, blending with what is underneath
pub fn dot(pixmap: &mut Pixmap, pos: Pos2, color: tiny_skia::Color) {
    let p = point(pos);
    if let Some(rect) = Rect::from_xywh(p.x.floor(), p.y.floor(), 1.0, 1.0) {
        pixmap.fill_rect(rect, &paint(color), Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_colored(pixmap: &Pixmap) -> usize {
        pixmap.pixels().iter().filter(|p| p.alpha() > 0).count()
    }

    #[test]
    fn rect_path_normalizes_any_drag_direction() {
        let forward = rect_path(Pos2::new(10.0, 10.0), Pos2::new(30.0, 20.0)).unwrap();
        let backward = rect_path(Pos2::new(30.0, 20.0), Pos2::new(10.0, 10.0)).unwrap();
        assert_eq!(forward.bounds(), backward.bounds());
    }

    #[test]
    fn rounded_radius_is_clamped() {
        let path = rounded_rect_path(Pos2::new(0.0, 0.0), Pos2::new(10.0, 40.0), ROUNDED_RADIUS)
            .unwrap();
        let bounds = path.bounds();
        assert!((bounds.width() - 10.0).abs() < 0.01);
        assert!((bounds.height() - 40.0).abs() < 0.01);
    }

    #[test]
    fn zero_length_segment_leaves_a_dot() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        let stroke = stroke(3.0, PenStyle::Pen);
        let dot = Pos2::new(10.0, 10.0);
        segment(&mut pixmap, dot, dot, tiny_skia::Color::BLACK, &stroke);
        assert_eq!(count_colored(&pixmap), 9);
    }

    #[test]
    fn polygon_needs_a_point() {
        assert!(polygon_path(&[]).is_none());
        assert!(polyline_path(&[Pos2::new(1.0, 1.0), Pos2::new(5.0, 1.0)]).is_some());
    }

    #[test]
    fn dashed_preview_leaves_gaps() {
        let mut solid = Pixmap::new(40, 5).unwrap();
        let mut dashed = Pixmap::new(40, 5).unwrap();
        let path = line_path(Pos2::new(0.0, 2.5), Pos2::new(40.0, 2.5)).unwrap();
        stroke_path(&mut solid, &path, tiny_skia::Color::WHITE, &preview_stroke(None));
        stroke_path(&mut dashed, &path, tiny_skia::Color::WHITE, &preview_stroke(Some(0.0)));
        assert!(count_colored(&dashed) < count_colored(&solid));
        assert!(count_colored(&dashed) > 0);
    }
}
