//! Closed polyline primitives used for clipping and sheet shapes.

use std::f64::consts::PI;

use cavalier_contours::polyline::PlineSource;

use crate::{PlineVertex, Polyline};

pub fn bulge_for_quarter_circle() -> f64 {
    (PI / 8.0).tan()
}

/// Full circle as two 180-degree bulge arcs.
pub fn circle(center: (f64, f64), radius: f64) -> Polyline<f64> {
    let (cx, cy) = center;
    let mut pl = Polyline::new_closed();
    pl.vertex_data.push(PlineVertex::new(cx - radius, cy, 1.0));
    pl.vertex_data.push(PlineVertex::new(cx + radius, cy, 1.0));
    pl
}

pub fn rect(min: (f64, f64), size: (f64, f64)) -> Polyline<f64> {
    let (x, y) = min;
    let (w, h) = size;
    let mut pl = Polyline::new_closed();
    pl.vertex_data.push(PlineVertex::new(x, y, 0.0));
    pl.vertex_data.push(PlineVertex::new(x + w, y, 0.0));
    pl.vertex_data.push(PlineVertex::new(x + w, y + h, 0.0));
    pl.vertex_data.push(PlineVertex::new(x, y + h, 0.0));
    pl
}

/// Rectangle with rounded corners. The bulge sits on the vertex that starts
/// each corner arc.
pub fn rounded_rect(min: (f64, f64), size: (f64, f64), corner_radius: f64) -> Polyline<f64> {
    let (x, y) = min;
    let (w, h) = size;
    let r = corner_radius.min(w / 2.0).min(h / 2.0).max(0.0);
    if r == 0.0 {
        return rect(min, size);
    }

    let b = bulge_for_quarter_circle();
    let mut pl = Polyline::new_closed();
    for (vx, vy, bulge) in [
        (x + r, y, 0.0),
        (x + w - r, y, b),
        (x + w, y + r, 0.0),
        (x + w, y + h - r, b),
        (x + w - r, y + h, 0.0),
        (x + r, y + h, b),
        (x, y + h - r, 0.0),
        (x, y + r, b),
    ] {
        pl.vertex_data.push(PlineVertex::new(vx, vy, bulge));
    }
    pl
}

/// Stadium shape: a rectangle whose short sides are half circles.
pub fn capsule(min: (f64, f64), size: (f64, f64)) -> Polyline<f64> {
    let (w, h) = size;
    rounded_rect(min, size, w.min(h) / 2.0)
}

pub fn polygon(vertices: &[(f64, f64)]) -> Polyline<f64> {
    let mut pl = Polyline::new_closed();
    for &(x, y) in vertices {
        pl.vertex_data.push(PlineVertex::new(x, y, 0.0));
    }
    pl
}

pub fn is_valid_closed(pl: &Polyline<f64>) -> bool {
    pl.is_closed()
        && pl.vertex_count() >= 2
        && pl
            .vertex_data
            .iter()
            .all(|v| v.x.is_finite() && v.y.is_finite() && v.bulge.is_finite())
}
