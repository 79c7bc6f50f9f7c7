//! Projection of arbitrary point sets into a fixed-size viewport.
//!
//! Used to draw compact field previews in list views, where each field gets the
//! same thumbnail box regardless of its real-world size.

use std::fmt::Write as _;

use crate::geometry::GeometryKind;
use crate::models::{Coordinate, Point};

/// Target box for a projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Scale and translate `points` so their bounding box maps onto
/// `[0, width] x [0, height]`, keeping point order.
///
/// An axis on which every point shares the same value collapses to 0.
/// Empty input yields empty output.
pub fn fit_to_viewport(points: &[Point], viewport: Viewport) -> Vec<Point> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let scale_x = viewport.width / non_degenerate_span(max_x - min_x);
    let scale_y = viewport.height / non_degenerate_span(max_y - min_y);

    points
        .iter()
        .map(|p| Point::new((p.x - min_x) * scale_x, (p.y - min_y) * scale_y))
        .collect()
}

/// Project geographic coordinates (x = longitude, y = latitude).
pub fn fit_coordinates(coordinates: &[Coordinate], viewport: Viewport) -> Vec<Point> {
    let points: Vec<Point> = coordinates.iter().copied().map(Point::from).collect();
    fit_to_viewport(&points, viewport)
}

// A zero span would divide by zero; every offset on that axis is 0 anyway.
fn non_degenerate_span(span: f64) -> f64 {
    if span > 0.0 {
        span
    } else {
        1.0
    }
}

/// Render a field boundary as a standalone SVG preview.
///
/// SVG's y axis grows downwards, so latitudes are flipped to keep north up.
/// Boundaries with fewer than 3 points produce an empty canvas.
pub fn thumbnail_svg(boundary: &[Coordinate], viewport: Viewport) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = viewport.width,
        h = viewport.height,
    );

    if GeometryKind::Boundary.is_renderable(boundary.len()) {
        let points = fit_coordinates(boundary, viewport)
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, viewport.height - p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            svg,
            r##"<polygon points="{points}" fill="#2ecc71" fill-opacity="0.4" stroke="#27ae60" stroke-width="1"/>"##
        );
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn assert_close(actual: &[Point], expected: &[Point]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!(
                (a.x - e.x).abs() < EPS && (a.y - e.y).abs() < EPS,
                "expected {e:?}, got {a:?}"
            );
        }
    }

    fn extent(points: &[Point]) -> (f64, f64, f64, f64) {
        points.iter().fold(
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
            |(min_x, max_x, min_y, max_y), p| {
                (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
            },
        )
    }

    #[test]
    fn square_fills_viewport() {
        let square = pts(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let out = fit_to_viewport(&square, Viewport::new(100.0, 100.0));
        assert_close(
            &out,
            &pts(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0)]),
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(fit_to_viewport(&[], Viewport::new(100.0, 50.0)).is_empty());
    }

    #[test]
    fn irregular_shape_maps_onto_full_box() {
        let shape = pts(&[(3.0, -2.0), (7.5, 4.0), (-1.0, 1.0), (2.0, 9.0), (5.0, 0.5)]);
        let out = fit_to_viewport(&shape, Viewport::new(120.0, 80.0));
        let (min_x, max_x, min_y, max_y) = extent(&out);
        assert!(min_x.abs() < EPS && (max_x - 120.0).abs() < EPS);
        assert!(min_y.abs() < EPS && (max_y - 80.0).abs() < EPS);
        // order is preserved: the third input point is the leftmost
        assert!(out[2].x.abs() < EPS);
    }

    #[test]
    fn small_geographic_spans_still_fill_viewport() {
        let field = vec![
            Coordinate::new(55.750, 37.610),
            Coordinate::new(55.752, 37.614),
            Coordinate::new(55.749, 37.616),
        ];
        let out = fit_coordinates(&field, Viewport::new(64.0, 64.0));
        let (min_x, max_x, min_y, max_y) = extent(&out);
        assert!(min_x.abs() < EPS && (max_x - 64.0).abs() < 1e-6);
        assert!(min_y.abs() < EPS && (max_y - 64.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_axis_collapses_to_zero() {
        let line = pts(&[(0.0, 5.0), (4.0, 5.0), (10.0, 5.0)]);
        let out = fit_to_viewport(&line, Viewport::new(100.0, 100.0));
        assert_close(&out, &pts(&[(0.0, 0.0), (40.0, 0.0), (100.0, 0.0)]));

        let single = fit_to_viewport(&pts(&[(7.0, 3.0)]), Viewport::new(10.0, 10.0));
        assert_close(&single, &pts(&[(0.0, 0.0)]));
    }

    #[test]
    fn reapplying_is_a_fixed_point() {
        let viewport = Viewport::new(200.0, 150.0);
        let shapes = [
            pts(&[(3.0, -2.0), (7.5, 4.0), (-1.0, 1.0), (2.0, 9.0)]),
            pts(&[(0.0, 5.0), (4.0, 5.0), (10.0, 5.0)]),
            pts(&[(0.001, 0.002), (0.003, 0.0025), (0.002, 0.004)]),
        ];
        for shape in shapes {
            let once = fit_to_viewport(&shape, viewport);
            let twice = fit_to_viewport(&once, viewport);
            assert_close(&twice, &once);
        }
    }

    #[test]
    fn thumbnail_flips_latitude_and_skips_small_boundaries() {
        let boundary = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 10.0),
        ];
        let svg = thumbnail_svg(&boundary, Viewport::new(100.0, 100.0));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"points="0.00,100.00 0.00,0.00 100.00,0.00""#));

        let empty = thumbnail_svg(&boundary[..2], Viewport::new(100.0, 100.0));
        assert!(!empty.contains("<polygon"));
    }
}
