//! Template clipping and the centre cutout.
//!
//! Both stages run through the boolean engine and keep a piece's authored
//! path (cubics intact) whenever the boolean turns out to be a no-op for it.
//! Under a degraded engine they fall back to predicates and warnings instead
//! of failing the run.

use cavalier_contours::polyline::PlineSource;
use jiggen_core::{PiecePath, Vec2, Warnings};
use jiggen_geometry::convert::{path_to_polyline, polyline_to_path, CURVE_STEPS};
use jiggen_geometry::{polygon, Engine, Polyline};

use crate::assemble::Piece;
use crate::template::Template;

/// Area change below this is treated as "the boolean did nothing".
const AREA_KEEP_EPS: f64 = 1e-6;

const MIN_LOOP_AREA: f64 = 1e-6;

fn degenerate(p: &Polyline<f64>) -> bool {
    if p.vertex_count() < 2 {
        return true;
    }
    if p.vertex_data
        .iter()
        .any(|v| !v.x.is_finite() || !v.y.is_finite() || !v.bulge.is_finite())
    {
        return true;
    }
    p.area().abs() < MIN_LOOP_AREA
}

pub(crate) fn real_loops(plines: Vec<Polyline<f64>>) -> Vec<Polyline<f64>> {
    plines.into_iter().filter(|p| !degenerate(p)).collect()
}

pub(crate) fn largest_real_loop(plines: Vec<Polyline<f64>>) -> Option<Polyline<f64>> {
    real_loops(plines)
        .into_iter()
        .max_by(|a, b| a.area().abs().total_cmp(&b.area().abs()))
}

fn replace_path(piece: &mut Piece, path: PiecePath) {
    piece.bbox = path.bbox();
    piece.path = path;
}

/// Intersects every piece with the template outline. Pieces left with no
/// geometry are dropped with a warning; pieces the template does not touch
/// keep their original path.
pub fn clip_to_template(
    pieces: Vec<Piece>,
    template: &Template,
    engine: &Engine,
    cell: (f64, f64),
    warnings: &mut Warnings,
) -> Vec<Piece> {
    let centre_of = |p: &Piece| {
        Vec2::new(
            (f64::from(p.col) + 0.5) * cell.0,
            (f64::from(p.row) + 0.5) * cell.1,
        )
    };

    if engine.is_degraded() {
        warnings.push("template clipping approximated by cell centres (degraded engine)");
        let mut kept = Vec::with_capacity(pieces.len());
        for piece in pieces {
            if template.contains(centre_of(&piece)) {
                kept.push(piece);
            } else {
                warnings.push(format!(
                    "piece {} removed: cell centre outside the template outline",
                    piece.id
                ));
            }
        }
        return kept;
    }

    let clip = path_to_polyline(&template.outline, CURVE_STEPS);
    let mut kept = Vec::with_capacity(pieces.len());
    for mut piece in pieces {
        let base = path_to_polyline(&piece.path, CURVE_STEPS);
        let base_area = base.area().abs();
        let loops = real_loops(engine.backend().intersect(&base, &clip));
        if loops.len() > 1 {
            warnings.push(format!(
                "piece {} split into {} parts by the template, keeping the largest",
                piece.id,
                loops.len()
            ));
        }
        let best = loops
            .into_iter()
            .max_by(|a, b| a.area().abs().total_cmp(&b.area().abs()));
        let Some(best) = best else {
            let mut msg = format!("piece {} removed by template clip", piece.id);
            if template.contains(centre_of(&piece)) {
                msg.push_str(" (cell centre was inside the outline)");
            }
            warnings.push(msg);
            continue;
        };
        if (best.area().abs() - base_area).abs() > AREA_KEEP_EPS {
            replace_path(&mut piece, polyline_to_path(&engine.backend().simplify(best)));
        }
        kept.push(piece);
    }
    kept
}

/// Subtracts the centre cutout from every piece it overlaps. A piece fully
/// inside the cutout is dropped with a warning.
pub fn apply_cutout(
    pieces: Vec<Piece>,
    cutout: &PiecePath,
    engine: &Engine,
    warnings: &mut Warnings,
) -> Vec<Piece> {
    if engine.is_degraded() {
        warnings.push("centre cutout skipped (degraded engine)");
        return pieces;
    }

    let cutter = path_to_polyline(cutout, CURVE_STEPS);
    let cut_bb = cutout.bbox();
    let cut_centre = cut_bb.center();

    let mut kept = Vec::with_capacity(pieces.len());
    for mut piece in pieces {
        if !piece.bbox.overlaps_padded(&cut_bb, 0.0) {
            kept.push(piece);
            continue;
        }
        let base = path_to_polyline(&piece.path, CURVE_STEPS);
        let base_area = base.area().abs();
        let result = engine
            .backend()
            .difference(vec![base], std::slice::from_ref(&cutter));
        let Some(best) = largest_real_loop(result) else {
            warnings.push(format!("piece {} swallowed by the centre cutout", piece.id));
            continue;
        };
        if (best.area().abs() - base_area).abs() <= AREA_KEEP_EPS {
            // Unchanged area with overlapping boxes: either the boxes alone
            // overlapped, or the cutter sits fully inside this piece and the
            // difference left a hole a single outline cannot carry.
            let ring = polygon::dedup_ring(piece.path.flatten(CURVE_STEPS), 1e-9);
            if polygon::point_in_polygon(cut_centre, &ring) {
                warnings.push(format!(
                    "centre cutout forms a hole inside piece {} and was dropped",
                    piece.id
                ));
            }
        } else {
            replace_path(&mut piece, polyline_to_path(&engine.backend().simplify(best)));
        }
        kept.push(piece);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use jiggen_core::{KnobSpec, PuzzleConfig, TemplateShape};

    use crate::assemble::assemble_pieces;
    use crate::edges::EdgeMap;
    use crate::template::cutout_outline;

    fn config(rows: u32, columns: u32, w: f64, h: f64) -> PuzzleConfig {
        PuzzleConfig {
            rows,
            columns,
            width: w,
            height: h,
            seed: 77,
            ..PuzzleConfig::default()
        }
    }

    fn pieces_for(cfg: &PuzzleConfig) -> Vec<Piece> {
        let mut warnings = Warnings::new();
        let edges = EdgeMap::build(cfg, &mut warnings);
        assemble_pieces(cfg, &edges)
    }

    fn path_of<'a>(pieces: &'a [Piece], id: &str) -> Option<&'a PiecePath> {
        pieces.iter().find(|p| p.id == id).map(|p| &p.path)
    }

    fn flat_area(path: &PiecePath) -> f64 {
        polygon::signed_area(&polygon::dedup_ring(path.flatten(CURVE_STEPS), 1e-9)).abs()
    }

    #[test]
    fn star_template_drops_corner_pieces() {
        // Small knobs keep every corner cell clear of the star limbs.
        let cfg = PuzzleConfig {
            template: TemplateShape::Star,
            knob: KnobSpec {
                size: 10.0,
                ..KnobSpec::default()
            },
            ..config(6, 6, 120.0, 120.0)
        };
        let template = Template::from_config(&cfg).unwrap();
        let engine = Engine::primary();
        let mut warnings = Warnings::new();

        let kept = clip_to_template(
            pieces_for(&cfg),
            &template,
            &engine,
            (cfg.cell_width(), cfg.cell_height()),
            &mut warnings,
        );

        assert!(kept.len() < 36);
        for corner in ["A1", "A6", "F1", "F6"] {
            assert!(path_of(&kept, corner).is_none(), "{corner} should be gone");
        }
        for inner in ["C3", "C4", "D3", "D4"] {
            assert!(path_of(&kept, inner).is_some(), "{inner} should survive");
        }
        assert!(warnings.as_slice().iter().any(|w| w.contains("A1")));
    }

    #[test]
    fn circle_template_keeps_interior_pieces_untouched() {
        let cfg = PuzzleConfig {
            template: TemplateShape::Circle,
            ..config(3, 3, 100.0, 100.0)
        };
        let template = Template::from_config(&cfg).unwrap();
        let engine = Engine::primary();
        let mut warnings = Warnings::new();

        let original = pieces_for(&cfg);
        let centre_before = path_of(&original, "B2").unwrap().clone();
        let corner_before = path_of(&original, "A1").unwrap().clone();

        let kept = clip_to_template(
            original,
            &template,
            &engine,
            (cfg.cell_width(), cfg.cell_height()),
            &mut warnings,
        );

        assert_eq!(kept.len(), 9);
        // The centre piece lies inside the circle, so its cubics survive.
        assert_eq!(path_of(&kept, "B2").unwrap(), &centre_before);
        assert_ne!(path_of(&kept, "A1").unwrap(), &corner_before);
    }

    #[test]
    fn degraded_engine_clips_by_cell_centre() {
        let cfg = PuzzleConfig {
            template: TemplateShape::Star,
            ..config(6, 6, 120.0, 120.0)
        };
        let template = Template::from_config(&cfg).unwrap();
        let engine = Engine::degraded();
        let mut warnings = Warnings::new();

        let original = pieces_for(&cfg);
        let kept = clip_to_template(
            original.clone(),
            &template,
            &engine,
            (cfg.cell_width(), cfg.cell_height()),
            &mut warnings,
        );

        assert!(path_of(&kept, "A1").is_none());
        assert!(path_of(&kept, "C3").is_some());
        // Surviving pieces keep their geometry untouched.
        for piece in &kept {
            assert_eq!(Some(&piece.path), path_of(&original, &piece.id));
        }
        assert!(warnings.as_slice().iter().any(|w| w.contains("degraded")));
    }

    #[test]
    fn cutout_carves_every_overlapping_piece() {
        let cfg = PuzzleConfig {
            center_cutout: true,
            cutout_ratio: 0.4,
            ..config(2, 2, 100.0, 100.0)
        };
        let cutout = cutout_outline(&cfg).unwrap();
        let engine = Engine::primary();
        let mut warnings = Warnings::new();

        let original = pieces_for(&cfg);
        let kept = apply_cutout(original.clone(), &cutout, &engine, &mut warnings);

        assert_eq!(kept.len(), 4);
        for piece in &kept {
            assert_ne!(Some(&piece.path), path_of(&original, &piece.id));
        }
        // Knob bumps cancel between neighbours, so the kept area is the
        // panel minus the 40x40 cutout.
        let total: f64 = kept.iter().map(|p| flat_area(&p.path)).sum();
        assert_abs_diff_eq!(total, 8400.0, epsilon = 1e-6);
    }

    #[test]
    fn cutout_swallows_the_centre_piece() {
        let cfg = PuzzleConfig {
            center_cutout: true,
            cutout_ratio: 0.8,
            ..config(3, 3, 100.0, 100.0)
        };
        let cutout = cutout_outline(&cfg).unwrap();
        let engine = Engine::primary();
        let mut warnings = Warnings::new();

        let kept = apply_cutout(pieces_for(&cfg), &cutout, &engine, &mut warnings);

        assert_eq!(kept.len(), 8);
        assert!(path_of(&kept, "B2").is_none());
        assert!(warnings.as_slice().iter().any(|w| w.contains("B2")));
    }

    #[test]
    fn cutout_inside_a_single_piece_only_warns() {
        let cfg = PuzzleConfig {
            center_cutout: true,
            cutout_ratio: 0.4,
            ..config(1, 1, 100.0, 100.0)
        };
        let cutout = cutout_outline(&cfg).unwrap();
        let engine = Engine::primary();
        let mut warnings = Warnings::new();

        let original = pieces_for(&cfg);
        let kept = apply_cutout(original.clone(), &cutout, &engine, &mut warnings);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].path, original[0].path);
        assert!(warnings.as_slice().iter().any(|w| w.contains("hole")));
    }

    #[test]
    fn degraded_engine_skips_the_cutout() {
        let cfg = PuzzleConfig {
            center_cutout: true,
            cutout_ratio: 0.4,
            ..config(2, 2, 100.0, 100.0)
        };
        let cutout = cutout_outline(&cfg).unwrap();
        let engine = Engine::degraded();
        let mut warnings = Warnings::new();

        let original = pieces_for(&cfg);
        let kept = apply_cutout(original.clone(), &cutout, &engine, &mut warnings);

        assert_eq!(kept.len(), 4);
        for piece in &kept {
            assert_eq!(Some(&piece.path), path_of(&original, &piece.id));
        }
        assert!(warnings.as_slice().iter().any(|w| w.contains("skipped")));
    }
}
