//! Panel template outlines.
//!
//! Each shape is authored as a closed `PiecePath` spanning the panel box,
//! plus a flattened ring for the cell-centre containment predicate used in
//! diagnostics and in the degraded clipping path.

use jiggen_core::{Affine, PiecePath, PuzzleConfig, TemplateShape, Vec2};
use jiggen_geometry::polygon;

use crate::knob::KAPPA;

const PREDICATE_STEPS: usize = 24;

#[derive(Debug, Clone)]
pub struct Template {
    pub outline: PiecePath,
    flat: Vec<Vec2>,
}

impl Template {
    /// The clipping template for this configuration, if any. A plain
    /// rectangle with square corners needs no clipping.
    pub fn from_config(config: &PuzzleConfig) -> Option<Template> {
        if config.template == TemplateShape::Rectangle && config.corner_radius <= 0.0 {
            return None;
        }
        Some(Template::new(shape_outline(
            config.template,
            config.width,
            config.height,
            config.corner_radius,
        )))
    }

    fn new(outline: PiecePath) -> Self {
        let flat = polygon::dedup_ring(outline.flatten(PREDICATE_STEPS), 1e-9);
        Self { outline, flat }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        polygon::point_in_polygon(p, &self.flat)
    }

    pub fn ring(&self) -> &[Vec2] {
        &self.flat
    }
}

/// Outer border of the cut document: the template outline, or the plain
/// panel rectangle when no template applies.
pub fn panel_outline(config: &PuzzleConfig) -> PiecePath {
    shape_outline(
        config.template,
        config.width,
        config.height,
        config.corner_radius,
    )
}

/// Centre-cutout outline: the panel shape scaled about the panel centre.
pub fn cutout_outline(config: &PuzzleConfig) -> Option<PiecePath> {
    if !config.center_cutout {
        return None;
    }
    let ratio = config.cutout_ratio;
    let scale = Affine::new(
        ratio,
        0.0,
        0.0,
        ratio,
        config.width / 2.0 * (1.0 - ratio),
        config.height / 2.0 * (1.0 - ratio),
    );
    Some(panel_outline(config).transform(&scale))
}

fn shape_outline(shape: TemplateShape, w: f64, h: f64, corner_radius: f64) -> PiecePath {
    match shape {
        TemplateShape::Rectangle => {
            if corner_radius > 0.0 {
                rounded_rect_path(w, h, corner_radius)
            } else {
                rect_path(w, h)
            }
        }
        TemplateShape::Circle => circle_path(w, h),
        TemplateShape::Oval => oval_path(w, h),
        TemplateShape::Heart => heart_path(w, h),
        TemplateShape::Star => star_path(w, h),
        TemplateShape::Hexagon => hexagon_path(w, h),
    }
}

fn rect_path(w: f64, h: f64) -> PiecePath {
    let mut p = PiecePath::new(Vec2::ZERO);
    p.line_to(Vec2::new(w, 0.0));
    p.line_to(Vec2::new(w, h));
    p.line_to(Vec2::new(0.0, h));
    p.line_to(Vec2::ZERO);
    p
}

fn rounded_rect_path(w: f64, h: f64, radius: f64) -> PiecePath {
    let r = radius.min(w / 2.0).min(h / 2.0);
    let mut p = PiecePath::new(Vec2::new(r, 0.0));
    p.line_to(Vec2::new(w - r, 0.0));
    p.arc_to(r, false, true, Vec2::new(w, r));
    p.line_to(Vec2::new(w, h - r));
    p.arc_to(r, false, true, Vec2::new(w - r, h));
    p.line_to(Vec2::new(r, h));
    p.arc_to(r, false, true, Vec2::new(0.0, h - r));
    p.line_to(Vec2::new(0.0, r));
    p.arc_to(r, false, true, Vec2::new(r, 0.0));
    p
}

/// Inscribed circle, radius half the short panel side.
fn circle_path(w: f64, h: f64) -> PiecePath {
    let r = w.min(h) / 2.0;
    let c = Vec2::new(w / 2.0, h / 2.0);
    let mut p = PiecePath::new(Vec2::new(c.x - r, c.y));
    p.arc_to(r, false, true, Vec2::new(c.x + r, c.y));
    p.arc_to(r, false, true, Vec2::new(c.x - r, c.y));
    p
}

/// Full-panel ellipse from four quarter cubics.
fn oval_path(w: f64, h: f64) -> PiecePath {
    let rx = w / 2.0;
    let ry = h / 2.0;
    let cx = rx;
    let cy = ry;
    let mut p = PiecePath::new(Vec2::new(w, cy));
    p.cubic_to(
        Vec2::new(w, cy + KAPPA * ry),
        Vec2::new(cx + KAPPA * rx, h),
        Vec2::new(cx, h),
    );
    p.cubic_to(
        Vec2::new(cx - KAPPA * rx, h),
        Vec2::new(0.0, cy + KAPPA * ry),
        Vec2::new(0.0, cy),
    );
    p.cubic_to(
        Vec2::new(0.0, cy - KAPPA * ry),
        Vec2::new(cx - KAPPA * rx, 0.0),
        Vec2::new(cx, 0.0),
    );
    p.cubic_to(
        Vec2::new(cx + KAPPA * rx, 0.0),
        Vec2::new(w, cy - KAPPA * ry),
        Vec2::new(w, cy),
    );
    p
}

/// Two round lobes meeting in a dip at the top, a point at the bottom.
/// Control table in the unit square, scaled to the panel.
fn heart_path(w: f64, h: f64) -> PiecePath {
    let pt = |x: f64, y: f64| Vec2::new(x * w, y * h);
    let mut p = PiecePath::new(pt(0.5, 0.3));
    p.cubic_to(pt(0.5, 0.22), pt(0.42, 0.1), pt(0.3, 0.1));
    p.cubic_to(pt(0.12, 0.1), pt(0.02, 0.22), pt(0.02, 0.36));
    p.cubic_to(pt(0.02, 0.52), pt(0.15, 0.65), pt(0.5, 0.95));
    p.cubic_to(pt(0.85, 0.65), pt(0.98, 0.52), pt(0.98, 0.36));
    p.cubic_to(pt(0.98, 0.22), pt(0.88, 0.1), pt(0.7, 0.1));
    p.cubic_to(pt(0.58, 0.1), pt(0.5, 0.22), pt(0.5, 0.3));
    p
}

/// Five-point star, outer vertices on the panel half-extents, inner ring at
/// 45 percent.
fn star_path(w: f64, h: f64) -> PiecePath {
    const INNER: f64 = 0.45;
    let c = Vec2::new(w / 2.0, h / 2.0);
    let points: Vec<Vec2> = (0..10u32)
        .map(|k| {
            let ratio = if k % 2 == 0 { 1.0 } else { INNER };
            let ang = (-90.0 + f64::from(k) * 36.0).to_radians();
            Vec2::new(
                c.x + c.x * ratio * ang.cos(),
                c.y + c.y * ratio * ang.sin(),
            )
        })
        .collect();
    polygon_path(&points)
}

/// Pointy-top hexagon spanning the panel.
fn hexagon_path(w: f64, h: f64) -> PiecePath {
    let c = Vec2::new(w / 2.0, h / 2.0);
    let points: Vec<Vec2> = (0..6u32)
        .map(|k| {
            let ang = (-90.0 + f64::from(k) * 60.0).to_radians();
            Vec2::new(c.x + c.x * ang.cos(), c.y + c.y * ang.sin())
        })
        .collect();
    polygon_path(&points)
}

fn polygon_path(points: &[Vec2]) -> PiecePath {
    let mut p = PiecePath::new(points[0]);
    for &pt in &points[1..] {
        p.line_to(pt);
    }
    p.line_to(points[0]);
    p
}
