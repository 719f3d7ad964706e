//! Conversions between segment paths and cavalier polylines.
//!
//! Arcs survive both directions exactly through the bulge relation
//! `bulge = tan(sweep / 4)`. Cubics have no polyline counterpart and are
//! sampled into short line runs before any boolean or offset call.

use std::f64::consts::PI;

use cavalier_contours::core::math::angle_from_bulge;
use cavalier_contours::polyline::{seg_arc_radius_and_center, PlineSource};
use jiggen_core::path::{arc_center, cubic_point};
use jiggen_core::{PathSeg, PiecePath, Vec2};

use crate::{PlineVertex, Polyline};

/// Samples per cubic segment when a path enters the polyline world.
pub const CURVE_STEPS: usize = 16;

const DEDUP_EPS: f64 = 1e-9;
const BULGE_EPS: f64 = 1e-8;

fn push_vertex(pl: &mut Polyline<f64>, p: Vec2, bulge: f64) {
    if let Some(last) = pl.vertex_data.last_mut() {
        if (last.x - p.x).abs() <= DEDUP_EPS && (last.y - p.y).abs() <= DEDUP_EPS {
            // Zero-length segment; keep the arc data if the new vertex has any.
            if bulge != 0.0 {
                last.bulge = bulge;
            }
            return;
        }
    }
    pl.vertex_data.push(PlineVertex::new(p.x, p.y, bulge));
}

/// Converts a closed path into a closed polyline. Lines and arcs map onto
/// single vertices; cubics are flattened with `curve_steps` samples.
pub fn path_to_polyline(path: &PiecePath, curve_steps: usize) -> Polyline<f64> {
    let steps = curve_steps.max(2);
    let mut pl = Polyline::new_closed();
    let mut from = path.start;

    for seg in &path.segs {
        match *seg {
            PathSeg::Line { to } => {
                push_vertex(&mut pl, from, 0.0);
                from = to;
            }
            PathSeg::Cubic { c1, c2, to } => {
                push_vertex(&mut pl, from, 0.0);
                for k in 1..steps {
                    let t = k as f64 / steps as f64;
                    push_vertex(&mut pl, cubic_point(from, c1, c2, to, t), 0.0);
                }
                from = to;
            }
            PathSeg::Arc {
                radius,
                large_arc,
                sweep,
                to,
            } => {
                let bulge = arc_center(from, to, radius, large_arc, sweep)
                    .map_or(0.0, |arc| (arc.sweep_angle / 4.0).tan());
                push_vertex(&mut pl, from, bulge);
                from = to;
            }
        }
    }

    // The closing vertex duplicates the start on closed input.
    if pl.vertex_count() >= 2 {
        let first = pl.vertex_data[0];
        let last = pl.vertex_data[pl.vertex_count() - 1];
        if (last.x - first.x).abs() <= DEDUP_EPS
            && (last.y - first.y).abs() <= DEDUP_EPS
            && last.bulge == 0.0
        {
            pl.vertex_data.pop();
        }
    }
    pl
}

/// Converts a closed polyline back into a path of lines and arcs.
pub fn polyline_to_path(pl: &Polyline<f64>) -> PiecePath {
    let n = pl.vertex_count();
    let mut path = PiecePath::new(if n > 0 {
        Vec2::new(pl.vertex_data[0].x, pl.vertex_data[0].y)
    } else {
        Vec2::ZERO
    });

    for i in 0..n {
        let v1 = pl.vertex_data[i];
        let v2 = pl.vertex_data[(i + 1) % n];
        let to = Vec2::new(v2.x, v2.y);
        if v1.bulge.abs() <= BULGE_EPS {
            path.line_to(to);
        } else {
            let (radius, _) = seg_arc_radius_and_center(v1, PlineVertex::new(v2.x, v2.y, 0.0));
            let angle = angle_from_bulge(v1.bulge);
            path.arc_to(radius.abs(), angle.abs() > PI, v1.bulge > 0.0, to);
        }
    }
    path
}
