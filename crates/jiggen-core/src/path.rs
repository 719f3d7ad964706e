//! Structured curve model for piece outlines.
//!
//! Outlines are held as segment lists, never as path text, so reversal,
//! reflection and affine placement are plain list and tuple operations.
//! Coordinates are millimetres in SVG orientation: y grows downward and row 0
//! is the top row of the grid.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn scale(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    /// Rotate around the origin by `rad` (positive = clockwise on screen,
    /// since y points down).
    pub fn rotated(self, rad: f64) -> Vec2 {
        let (s, c) = rad.sin_cos();
        Vec2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn include(&mut self, p: Vec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.x <= self.max.x
    }

    /// Whether two boxes, each grown by `pad / 2`, overlap.
    pub fn overlaps_padded(&self, other: &Aabb, pad: f64) -> bool {
        self.min.x - pad < other.max.x
            && other.min.x - pad < self.max.x
            && self.min.y - pad < other.max.y
            && other.min.y - pad < self.max.y
    }
}

/// Row-major 2x3 affine transform: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    /// Rotation by `rad` about `pivot` (y-down screen convention).
    pub fn rotation_about(rad: f64, pivot: Vec2) -> Self {
        let (s, c) = rad.sin_cos();
        let e = pivot.x - c * pivot.x + s * pivot.y;
        let f = pivot.y - s * pivot.x - c * pivot.y;
        Self::new(c, s, -s, c, e, f)
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// A negative determinant flips orientation, which swaps arc sweep.
    pub fn flips_orientation(&self) -> bool {
        self.a * self.d - self.b * self.c < 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSeg {
    Line {
        to: Vec2,
    },
    Cubic {
        c1: Vec2,
        c2: Vec2,
        to: Vec2,
    },
    /// Circular arc in SVG endpoint form (`rx == ry`, no axis rotation).
    Arc {
        radius: f64,
        large_arc: bool,
        sweep: bool,
        to: Vec2,
    },
}

impl PathSeg {
    pub fn endpoint(&self) -> Vec2 {
        match self {
            PathSeg::Line { to } | PathSeg::Cubic { to, .. } | PathSeg::Arc { to, .. } => *to,
        }
    }
}

/// An open or closed outline: a start point plus an ordered segment list.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecePath {
    pub start: Vec2,
    pub segs: Vec<PathSeg>,
}

impl PiecePath {
    pub fn new(start: Vec2) -> Self {
        Self {
            start,
            segs: Vec::new(),
        }
    }

    pub fn line_to(&mut self, to: Vec2) -> &mut Self {
        self.segs.push(PathSeg::Line { to });
        self
    }

    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, to: Vec2) -> &mut Self {
        self.segs.push(PathSeg::Cubic { c1, c2, to });
        self
    }

    pub fn arc_to(&mut self, radius: f64, large_arc: bool, sweep: bool, to: Vec2) -> &mut Self {
        self.segs.push(PathSeg::Arc {
            radius,
            large_arc,
            sweep,
            to,
        });
        self
    }

    pub fn end(&self) -> Vec2 {
        self.segs.last().map_or(self.start, PathSeg::endpoint)
    }

    pub fn is_closed_within(&self, eps: f64) -> bool {
        !self.segs.is_empty() && self.end().distance(self.start) <= eps
    }

    /// Start point of segment `i`.
    fn seg_start(&self, i: usize) -> Vec2 {
        if i == 0 {
            self.start
        } else {
            self.segs[i - 1].endpoint()
        }
    }

    /// The same boundary as seen by the piece on the other side: segment order
    /// reversed and the perpendicular (y) coordinate negated, re-anchored so
    /// the result again runs from `(0, 0)` to `(len, 0)`.
    ///
    /// Point-wise this is a half-turn about `(len / 2, 0)`; combined with the
    /// order reversal each arc's sweep flag flips while its geometry is
    /// untouched.
    pub fn mirror_view(&self, len: f64) -> PiecePath {
        let m = |p: Vec2| Vec2::new(len - p.x, -p.y);
        let mut out = PiecePath::new(m(self.end()));
        for i in (0..self.segs.len()).rev() {
            let to = m(self.seg_start(i));
            match self.segs[i] {
                PathSeg::Line { .. } => {
                    out.line_to(to);
                }
                PathSeg::Cubic { c1, c2, .. } => {
                    out.cubic_to(m(c2), m(c1), to);
                }
                PathSeg::Arc {
                    radius,
                    large_arc,
                    sweep,
                    ..
                } => {
                    out.arc_to(radius, large_arc, !sweep, to);
                }
            }
        }
        out
    }

    /// Reflect across the edge baseline (`y -> -y`), keeping direction.
    pub fn reflect_baseline(&self) -> PiecePath {
        let m = |p: Vec2| Vec2::new(p.x, -p.y);
        let mut out = PiecePath::new(m(self.start));
        for seg in &self.segs {
            match *seg {
                PathSeg::Line { to } => {
                    out.line_to(m(to));
                }
                PathSeg::Cubic { c1, c2, to } => {
                    out.cubic_to(m(c1), m(c2), m(to));
                }
                PathSeg::Arc {
                    radius,
                    large_arc,
                    sweep,
                    to,
                } => {
                    out.arc_to(radius, large_arc, !sweep, m(to));
                }
            }
        }
        out
    }

    pub fn transform(&self, t: &Affine) -> PiecePath {
        let flip = t.flips_orientation();
        let mut out = PiecePath::new(t.apply(self.start));
        for seg in &self.segs {
            match *seg {
                PathSeg::Line { to } => {
                    out.line_to(t.apply(to));
                }
                PathSeg::Cubic { c1, c2, to } => {
                    out.cubic_to(t.apply(c1), t.apply(c2), t.apply(to));
                }
                PathSeg::Arc {
                    radius,
                    large_arc,
                    sweep,
                    to,
                } => {
                    out.arc_to(radius, large_arc, sweep != flip, t.apply(to));
                }
            }
        }
        out
    }

    pub fn translated(&self, d: Vec2) -> PiecePath {
        self.transform(&Affine::translation(d.x, d.y))
    }

    /// Append another path's segments, bridging any positional gap larger
    /// than `joint_eps` with a straight correction segment.
    pub fn append(&mut self, other: &PiecePath, joint_eps: f64) {
        if self.end().distance(other.start) > joint_eps {
            self.line_to(other.start);
        }
        self.segs.extend_from_slice(&other.segs);
    }

    /// Sample the outline into a point list. Curved segments get
    /// `steps_per_curve` uniform samples; lines contribute their endpoint.
    pub fn flatten(&self, steps_per_curve: usize) -> Vec<Vec2> {
        let steps = steps_per_curve.max(1);
        let mut pts = Vec::with_capacity(self.segs.len() * steps + 1);
        pts.push(self.start);
        for (i, seg) in self.segs.iter().enumerate() {
            let from = self.seg_start(i);
            match *seg {
                PathSeg::Line { to } => pts.push(to),
                PathSeg::Cubic { c1, c2, to } => {
                    for k in 1..=steps {
                        let t = k as f64 / steps as f64;
                        pts.push(cubic_point(from, c1, c2, to, t));
                    }
                }
                PathSeg::Arc {
                    radius,
                    large_arc,
                    sweep,
                    to,
                } => match arc_center(from, to, radius, large_arc, sweep) {
                    Some(arc) => {
                        for k in 1..=steps {
                            let t = k as f64 / steps as f64;
                            let ang = arc.start_angle + arc.sweep_angle * t;
                            pts.push(arc.center + Vec2::new(ang.cos(), ang.sin()).scale(arc.radius));
                        }
                    }
                    None => pts.push(to),
                },
            }
        }
        pts
    }

    pub fn bbox(&self) -> Aabb {
        let mut bb = Aabb::empty();
        for p in self.flatten(12) {
            bb.include(p);
        }
        bb
    }
}

pub fn cubic_point(p0: Vec2, c1: Vec2, c2: Vec2, p1: Vec2, t: f64) -> Vec2 {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = mt * mt * t * 3.0;
    let c = mt * t * t * 3.0;
    let d = t * t * t;
    Vec2::new(
        a * p0.x + b * c1.x + c * c2.x + d * p1.x,
        a * p0.y + b * c1.y + c * c2.y + d * p1.y,
    )
}

#[derive(Debug, Clone, Copy)]
pub struct ArcCenter {
    pub center: Vec2,
    pub radius: f64,
    pub start_angle: f64,
    /// Signed sweep in radians; positive follows the numeric angle direction
    /// (clockwise on screen with y down).
    pub sweep_angle: f64,
}

/// SVG endpoint-to-centre conversion for circular arcs.
///
/// Returns `None` when the endpoints coincide. An undersized radius is scaled
/// up to the minimum that can span the chord, as SVG rendering does.
pub fn arc_center(
    from: Vec2,
    to: Vec2,
    radius: f64,
    large_arc: bool,
    sweep: bool,
) -> Option<ArcCenter> {
    let half = (from - to).scale(0.5);
    let chord_sq = half.x * half.x + half.y * half.y;
    if chord_sq <= f64::EPSILON {
        return None;
    }

    let mut r = radius.abs();
    if r * r < chord_sq {
        r = chord_sq.sqrt();
    }

    let factor_sq = ((r * r - chord_sq) / chord_sq).max(0.0);
    let mut factor = factor_sq.sqrt();
    if large_arc == sweep {
        factor = -factor;
    }

    let center = Vec2::new(
        (from.x + to.x) / 2.0 + factor * half.y,
        (from.y + to.y) / 2.0 - factor * half.x,
    );

    let start_angle = (from.y - center.y).atan2(from.x - center.x);
    let end_angle = (to.y - center.y).atan2(to.x - center.x);
    let mut sweep_angle = end_angle - start_angle;
    if sweep && sweep_angle < 0.0 {
        sweep_angle += std::f64::consts::TAU;
    } else if !sweep && sweep_angle > 0.0 {
        sweep_angle -= std::f64::consts::TAU;
    }

    Some(ArcCenter {
        center,
        radius: r,
        start_angle,
        sweep_angle,
    })
}
