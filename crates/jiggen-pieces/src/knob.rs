//! Knob curve generator.
//!
//! Every knob is authored in the edge's local frame: the edge runs from
//! `(0, 0)` to `(len, 0)` and the bump always rises toward negative y. The
//! caller reflects across the baseline for slots. All shape parameters are
//! ratios of the edge length, perturbed from the edge's own seed stream, so a
//! knob never depends on anything but `(seed, edge position)`.

use jiggen_core::{KnobSpec, KnobStyle, PiecePath, SeedStream, Vec2, Warnings};

/// Cubic control distance approximating a quarter circle.
pub const KAPPA: f64 = 0.5522847498307936;

/// Below this edge length the knob still generates, but cutting it is
/// unrealistic; the caller gets a warning.
pub const MIN_KNOB_EDGE_MM: f64 = 10.0;

/// Fraction of the edge length kept clear at both ends of the knob footprint.
const END_MARGIN: f64 = 0.08;

/// The bump may use at most this fraction of the neighbouring cell depth.
const MAX_DEPTH_RATIO: f64 = 0.4;

/// Generates the bump path for one interior edge, tab side up (negative y).
///
/// `perp` is the cell extent perpendicular to the edge; it limits how far the
/// bulb may reach into the neighbouring piece.
pub fn edge_bump(
    len: f64,
    perp: f64,
    spec: &KnobSpec,
    stream: &mut SeedStream,
    warnings: &mut Warnings,
    context: &str,
) -> PiecePath {
    if len < MIN_KNOB_EDGE_MM {
        warnings.push(format!(
            "{context}: edge length {len:.2}mm is below {MIN_KNOB_EDGE_MM}mm, knob ratios clamped"
        ));
    }
    match spec.style {
        KnobStyle::Classic => classic(len, perp, spec, stream),
        KnobStyle::Organic => organic(len, perp, spec, stream),
        KnobStyle::Simple => simple(len, perp, spec, stream),
    }
}

/// Jitter amplitude: base range scaled by difficulty. `wide` doubles the base
/// range for the organic style.
fn jitter_amp(spec: &KnobSpec, wide: bool) -> f64 {
    let scale = 0.7 + 0.15 * f64::from(spec.difficulty);
    let base = if wide {
        0.10 + 0.15 * spec.jitter
    } else {
        0.05 + 0.10 * spec.jitter
    };
    (base * scale).clamp(0.03, 0.25)
}

fn bulb_radius_base(len: f64, spec: &KnobSpec) -> f64 {
    (spec.size / 100.0).clamp(0.08, 0.35) * len / 2.0
}

/// Clamp the knob centre so the footprint keeps the end margins.
fn knob_center(len: f64, shift: f64, half_extent: f64) -> f64 {
    let margin = END_MARGIN * len;
    let lo = margin + half_extent;
    let hi = len - margin - half_extent;
    if lo >= hi {
        return len / 2.0;
    }
    (len / 2.0 + shift).clamp(lo, hi)
}

/// Scale factor keeping the bump height within the neighbouring cell.
fn depth_scale(height: f64, perp: f64) -> f64 {
    let max = MAX_DEPTH_RATIO * perp;
    if height > max && height > 0.0 {
        max / height
    } else {
        1.0
    }
}

/// Shoulder line, cubic into the neck, bulb as two quarter-circle cubic arcs,
/// cubic back out, closing shoulder line. Tangents agree at every joint.
fn classic(len: f64, perp: f64, spec: &KnobSpec, stream: &mut SeedStream) -> PiecePath {
    let amp = jitter_amp(spec, false);

    // Fixed draw order: bulb, neck, shoulder, shift.
    let mut bulb_r = bulb_radius_base(len, spec) * stream.vary(amp);
    let mut neck_h = bulb_r * (1.1 + 0.5 * spec.roundness) * stream.vary(amp);
    let span = 1.8 * bulb_r * stream.vary(amp);
    let shift = (stream.next_f64() * 2.0 - 1.0) * END_MARGIN * len;

    let scale = depth_scale(neck_h + bulb_r, perp);
    bulb_r *= scale;
    neck_h *= scale;
    let span = span.clamp(1.25 * bulb_r, 0.42 * len);
    let c = knob_center(len, shift, span);

    let sl = Vec2::new(c - span, 0.0);
    let al = Vec2::new(c - bulb_r, -neck_h);
    let top = Vec2::new(c, -(neck_h + bulb_r));
    let ar = Vec2::new(c + bulb_r, -neck_h);
    let sr = Vec2::new(c + span, 0.0);

    let mut p = PiecePath::new(Vec2::ZERO);
    p.line_to(sl);
    p.cubic_to(
        Vec2::new(sl.x + 0.6 * span, 0.0),
        Vec2::new(al.x, -0.55 * neck_h),
        al,
    );
    p.cubic_to(
        Vec2::new(al.x, al.y - KAPPA * bulb_r),
        Vec2::new(top.x - KAPPA * bulb_r, top.y),
        top,
    );
    p.cubic_to(
        Vec2::new(top.x + KAPPA * bulb_r, top.y),
        Vec2::new(ar.x, ar.y - KAPPA * bulb_r),
        ar,
    );
    p.cubic_to(
        Vec2::new(ar.x, -0.55 * neck_h),
        Vec2::new(sr.x - 0.6 * span, 0.0),
        sr,
    );
    p.line_to(Vec2::new(len, 0.0));
    p
}

/// Round bulb emitted as one big arc segment with an undercut throat; the
/// entry and exit cubics meet the arc tangentially.
fn organic(len: f64, perp: f64, spec: &KnobSpec, stream: &mut SeedStream) -> PiecePath {
    let amp = jitter_amp(spec, true);

    // Fixed draw order: bulb, depth, attach angle, shoulder, shift.
    let mut bulb_r = bulb_radius_base(len, spec) * stream.vary(amp);
    let mut depth = bulb_r * (1.05 + 0.45 * spec.roundness) * stream.vary(amp);
    let phi = (38.0 + 14.0 * stream.next_f64()).to_radians();
    let span = 1.6 * bulb_r * stream.vary(amp);
    let shift = (stream.next_f64() * 2.0 - 1.0) * END_MARGIN * len;

    // Keep the attach points clearly above the baseline so the neck cubics
    // (whose control points stay below the attach height) cannot dip under
    // the edge line.
    depth = depth.max(bulb_r * (phi.cos() + 0.45 * phi.sin()));
    let scale = depth_scale(depth + bulb_r, perp);
    bulb_r *= scale;
    depth *= scale;
    let span = span
        .max(1.1 * bulb_r * phi.sin())
        .min(0.42 * len);
    let c = knob_center(len, shift, span);

    let al = Vec2::new(c - bulb_r * phi.sin(), -depth + bulb_r * phi.cos());
    let ar = Vec2::new(c + bulb_r * phi.sin(), -depth + bulb_r * phi.cos());
    let k = (0.35 * bulb_r).min(0.8 * -al.y / phi.sin());
    let k2 = 0.4 * span;

    let mut p = PiecePath::new(Vec2::ZERO);
    p.line_to(Vec2::new(c - span, 0.0));
    p.cubic_to(
        Vec2::new(c - span + k2, 0.0),
        al + Vec2::new(k * phi.cos(), k * phi.sin()),
        al,
    );
    // Sweeps 2pi - 2*phi around the bulb centre.
    p.arc_to(bulb_r, true, true, ar);
    p.cubic_to(
        ar + Vec2::new(-k * phi.cos(), k * phi.sin()),
        Vec2::new(c + span - k2, 0.0),
        Vec2::new(c + span, 0.0),
    );
    p.line_to(Vec2::new(len, 0.0));
    p
}

/// Rectangular tab from line segments only.
fn simple(len: f64, perp: f64, spec: &KnobSpec, stream: &mut SeedStream) -> PiecePath {
    let amp = jitter_amp(spec, false);

    // Fixed draw order: width, height, shift.
    let half_w = 0.8 * bulb_radius_base(len, spec) * stream.vary(amp);
    let mut height = 1.4 * bulb_radius_base(len, spec) * stream.vary(amp);
    let shift = (stream.next_f64() * 2.0 - 1.0) * END_MARGIN * len;

    height *= depth_scale(height, perp);
    let c = knob_center(len, shift, half_w);

    let mut p = PiecePath::new(Vec2::ZERO);
    p.line_to(Vec2::new(c - half_w, 0.0));
    p.line_to(Vec2::new(c - half_w, -height));
    p.line_to(Vec2::new(c + half_w, -height));
    p.line_to(Vec2::new(c + half_w, 0.0));
    p.line_to(Vec2::new(len, 0.0));
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use jiggen_core::PathSeg;

    fn spec(style: KnobStyle) -> KnobSpec {
        KnobSpec {
            style,
            ..KnobSpec::default()
        }
    }

    fn bump(style: KnobStyle, len: f64, perp: f64, seed: u32) -> PiecePath {
        let mut stream = SeedStream::new(seed);
        let mut warnings = Warnings::new();
        edge_bump(len, perp, &spec(style), &mut stream, &mut warnings, "test")
    }

    #[test]
    fn terminals_are_exact_for_every_style() {
        for style in [KnobStyle::Classic, KnobStyle::Organic, KnobStyle::Simple] {
            let p = bump(style, 40.0, 40.0, 7);
            assert_eq!(p.start, Vec2::ZERO);
            assert_eq!(p.end(), Vec2::new(40.0, 0.0));
        }
    }

    #[test]
    fn bump_rises_above_the_baseline_within_margins() {
        for seed in [1, 99, 4242] {
            let p = bump(KnobStyle::Classic, 50.0, 50.0, seed);
            let bb = p.bbox();
            assert!(bb.min.y < -2.0, "no visible bump: {:?}", bb);
            assert_abs_diff_eq!(bb.max.y, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(bb.min.x, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(bb.max.x, 50.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn same_stream_replays_the_same_knob() {
        let a = bump(KnobStyle::Organic, 33.0, 40.0, 123);
        let b = bump(KnobStyle::Organic, 33.0, 40.0, 123);
        assert_eq!(a, b);
    }

    #[test]
    fn organic_bulb_is_one_large_arc() {
        let p = bump(KnobStyle::Organic, 45.0, 45.0, 5);
        let arcs: Vec<_> = p
            .segs
            .iter()
            .filter_map(|s| match *s {
                PathSeg::Arc {
                    large_arc, sweep, ..
                } => Some((large_arc, sweep)),
                _ => None,
            })
            .collect();
        assert_eq!(arcs, vec![(true, true)]);
    }

    #[test]
    fn simple_style_uses_lines_only() {
        let p = bump(KnobStyle::Simple, 30.0, 30.0, 11);
        assert_eq!(p.segs.len(), 5);
        assert!(p.segs.iter().all(|s| matches!(s, PathSeg::Line { .. })));
    }

    #[test]
    fn shallow_neighbour_cell_limits_bump_depth() {
        for style in [KnobStyle::Classic, KnobStyle::Organic, KnobStyle::Simple] {
            let p = bump(style, 60.0, 12.0, 3);
            let bb = p.bbox();
            assert!(
                -bb.min.y <= MAX_DEPTH_RATIO * 12.0 + 1e-6,
                "{style:?} bump too deep: {}",
                -bb.min.y
            );
        }
    }

    #[test]
    fn short_edge_warns_and_still_generates() {
        let mut stream = SeedStream::new(1);
        let mut warnings = Warnings::new();
        let p = edge_bump(
            6.0,
            6.0,
            &spec(KnobStyle::Classic),
            &mut stream,
            &mut warnings,
            "h edge (1, 0)",
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings.as_slice()[0].contains("h edge (1, 0)"));
        assert_eq!(p.end(), Vec2::new(6.0, 0.0));
    }

    #[test]
    fn organic_attach_points_stay_above_baseline() {
        for seed in 0..20 {
            let p = bump(KnobStyle::Organic, 35.0, 35.0, seed);
            for pt in p.flatten(16) {
                assert!(pt.y <= 1e-9, "outline dipped below baseline: {pt:?}");
            }
        }
    }
}
