//! True-shape nesting over simplified piece outlines.
//!
//! Clearance between outlines is tested vertex-to-vertex only; see
//! [`polygon::min_point_distance`]. Flattened knob curves leave the rings
//! dense enough for that test to hold at laser-cut gaps.

use jiggen_core::{
    sub_seed, Aabb, LayoutMode, LayoutSpec, NestStrategy, SeedStream, Vec2, Warnings,
};
use jiggen_geometry::polygon;
use jiggen_pieces::Piece;

use crate::{piece_area, LayoutResult, Placement};

/// Stream tag reserved for layout jitter, distinct from the edge streams.
const LAYOUT_STREAM_TAG: u32 = 2;
const FLATTEN_STEPS: usize = 12;
/// Douglas-Peucker tolerance for nesting outlines, mm.
const SIMPLIFY_TOLERANCE: f64 = 0.15;
const GRID_COLS: usize = 10;
const GRID_ROWS: usize = 6;

struct Outline {
    index: usize,
    area: f64,
    centre: Vec2,
    ring: Vec<Vec2>,
}

struct PlacedPoly {
    pts: Vec<Vec2>,
    bb: Aabb,
}

fn attempt_budget(strategy: NestStrategy) -> usize {
    match strategy {
        NestStrategy::Fast => 150,
        NestStrategy::Balanced | NestStrategy::MaximizeSaving => 400,
    }
}

/// Broad phase on padded boxes, narrow phase on vertex distance. The
/// translated ring is only materialised once a box actually gets close.
fn clear_of_placed(
    ring: &[Vec2],
    shift: Vec2,
    bb: &Aabb,
    placed: &[PlacedPoly],
    gap: f64,
) -> bool {
    let mut moved: Option<Vec<Vec2>> = None;
    for other in placed {
        if !bb.overlaps_padded(&other.bb, gap) {
            continue;
        }
        let pts = moved.get_or_insert_with(|| polygon::translated(ring, shift));
        if polygon::min_point_distance(pts, &other.pts) < gap {
            return false;
        }
    }
    true
}

/// Nests pieces on the sheet largest-first, trying each allowed rotation at
/// grid-aligned candidates before seeded jitter ones. Candidate boxes stay
/// inside the margins by construction, so only piece spacing is searched.
pub fn nest(
    pieces: &[Piece],
    spec: &LayoutSpec,
    seed: u32,
    warnings: &mut Warnings,
) -> LayoutResult {
    let (sheet_w, sheet_h) = spec.sheet.dims();
    let margin = spec.margin;
    let gap = spec.gap;
    let inner_w = sheet_w - 2.0 * margin;
    let inner_h = sheet_h - 2.0 * margin;

    let mut outlines: Vec<Outline> = pieces
        .iter()
        .enumerate()
        .map(|(index, piece)| {
            let flat = polygon::dedup_ring(piece.path.flatten(FLATTEN_STEPS), 1e-9);
            let ring = polygon::simplify_ring(&flat, SIMPLIFY_TOLERANCE);
            Outline {
                index,
                area: polygon::signed_area(&ring).abs(),
                centre: piece.bbox.center(),
                ring,
            }
        })
        .collect();
    // Stable sort: equal areas keep row-major order.
    outlines.sort_by(|a, b| b.area.total_cmp(&a.area));

    let angles = spec.rotations.angles_deg();
    let per_rotation = (attempt_budget(spec.strategy) / angles.len()).max(1);
    let mut stream = SeedStream::new(sub_seed(seed, LAYOUT_STREAM_TAG, 0, 0));

    let mut results: Vec<Option<Placement>> = vec![None; pieces.len()];
    let mut placed: Vec<PlacedPoly> = Vec::with_capacity(pieces.len());
    let mut area = 0.0;
    let mut used_bottom: f64 = 0.0;

    for outline in &outlines {
        let piece = &pieces[outline.index];
        let mut best: Option<(f64, f64, Vec2)> = None;

        'rotations: for &deg in angles {
            let pts_r = polygon::rotated_about(&outline.ring, deg.to_radians(), outline.centre);
            let rbb = polygon::bounding_box(&pts_r);
            let (rw, rh) = (rbb.width(), rbb.height());
            if rw > inner_w + 1e-9 || rh > inner_h + 1e-9 {
                continue;
            }
            let free_w = (inner_w - rw).max(0.0);
            let free_h = (inner_h - rh).max(0.0);

            for attempt in 0..per_rotation {
                let (px, py) = if attempt < GRID_COLS * GRID_ROWS {
                    let gx = (attempt % GRID_COLS) as f64;
                    let gy = (attempt / GRID_COLS) as f64;
                    (
                        margin + free_w * gx / (GRID_COLS - 1) as f64,
                        margin + free_h * gy / (GRID_ROWS - 1) as f64,
                    )
                } else {
                    (
                        margin + free_w * stream.next_f64(),
                        margin + free_h * stream.next_f64(),
                    )
                };
                let shift = Vec2::new(px - rbb.min.x, py - rbb.min.y);
                let bb = Aabb {
                    min: rbb.min + shift,
                    max: rbb.max + shift,
                };
                if !clear_of_placed(&pts_r, shift, &bb, &placed, gap) {
                    continue;
                }
                match spec.strategy {
                    NestStrategy::Fast => {
                        best = Some((0.0, deg, shift));
                        break 'rotations;
                    }
                    NestStrategy::Balanced => {
                        let score = py * sheet_w + px;
                        if best.is_none_or(|(s, _, _)| score < s) {
                            best = Some((score, deg, shift));
                        }
                    }
                    NestStrategy::MaximizeSaving => {
                        let score = (py + rh) * sheet_w + px;
                        if best.is_none_or(|(s, _, _)| score < s) {
                            best = Some((score, deg, shift));
                        }
                    }
                }
            }
        }

        match best {
            Some((_, deg, shift)) => {
                let rotated =
                    polygon::rotated_about(&outline.ring, deg.to_radians(), outline.centre);
                let pts = polygon::translated(&rotated, shift);
                let bb = polygon::bounding_box(&pts);
                area += piece_area(piece);
                used_bottom = used_bottom.max(bb.max.y);
                placed.push(PlacedPoly { pts, bb });
                results[outline.index] = Some(Placement {
                    id: piece.id.clone(),
                    row: piece.row,
                    col: piece.col,
                    x: outline.centre.x + shift.x,
                    y: outline.centre.y + shift.y,
                    rotation_deg: deg,
                });
            }
            None => {
                warnings.push(format!(
                    "piece {} could not be nested on the {:.0}x{:.0}mm sheet",
                    piece.id, sheet_w, sheet_h
                ));
            }
        }
    }

    let mut placements = Vec::with_capacity(pieces.len());
    let mut unplaced = Vec::new();
    for (piece, slot) in pieces.iter().zip(results) {
        match slot {
            Some(placement) => placements.push(placement),
            None => unplaced.push(piece.id.clone()),
        }
    }

    let success = unplaced.is_empty();
    let used = sheet_w * used_bottom;
    LayoutResult {
        mode: LayoutMode::Nested,
        sheet: (sheet_w, sheet_h),
        placements,
        unplaced,
        fits: success,
        success,
        utilization: if used > 0.0 { 100.0 * area / used } else { 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use jiggen_core::{PiecePath, PuzzleConfig, RotationSet, SheetSpec};
    use jiggen_pieces::{assemble_pieces, EdgeMap};

    fn rect_piece(id: &str, w: f64, h: f64) -> Piece {
        let mut path = PiecePath::new(Vec2::ZERO);
        path.line_to(Vec2::new(w, 0.0));
        path.line_to(Vec2::new(w, h));
        path.line_to(Vec2::new(0.0, h));
        path.line_to(Vec2::ZERO);
        let bbox = path.bbox();
        Piece {
            row: 0,
            col: 0,
            id: id.to_string(),
            path,
            bbox,
        }
    }

    fn nest_spec(w: f64, h: f64, strategy: NestStrategy) -> LayoutSpec {
        LayoutSpec {
            mode: LayoutMode::Nested,
            strategy,
            rotations: RotationSet::None,
            sheet: SheetSpec::Custom {
                width: w,
                height: h,
            },
            margin: 5.0,
            gap: 2.0,
        }
    }

    fn real_pieces(rows: u32, cols: u32, seed: u32) -> Vec<Piece> {
        let config = PuzzleConfig {
            width: 100.0,
            height: 100.0,
            rows,
            columns: cols,
            seed,
            ..PuzzleConfig::default()
        };
        let mut warnings = Warnings::new();
        let edges = EdgeMap::build(&config, &mut warnings);
        assemble_pieces(&config, &edges)
    }

    #[test]
    fn single_piece_lands_in_the_margin_corner() {
        let pieces = vec![rect_piece("A1", 40.0, 30.0)];
        let mut warnings = Warnings::new();
        let result = nest(&pieces, &nest_spec(200.0, 100.0, NestStrategy::Fast), 7, &mut warnings);

        assert!(result.success && result.fits);
        assert_eq!(result.placements.len(), 1);
        let p = &result.placements[0];
        assert_abs_diff_eq!(p.x, 25.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 20.0, epsilon = 1e-9);
        assert_eq!(p.rotation_deg, 0.0);
        // 1200 mm^2 of piece over the 200 x 35 mm sheet strip in use.
        assert_abs_diff_eq!(result.utilization, 100.0 * 1200.0 / 7000.0, epsilon = 1e-9);
    }

    #[test]
    fn placed_pieces_keep_the_configured_gap() {
        let pieces = real_pieces(2, 2, 12_345);
        let spec = nest_spec(400.0, 300.0, NestStrategy::Fast);
        let mut warnings = Warnings::new();
        let result = nest(&pieces, &spec, 12_345, &mut warnings);

        assert!(result.success, "unplaced: {:?}", result.unplaced);
        assert_eq!(result.placements.len(), 4);

        let rings: Vec<Vec<Vec2>> = result
            .placements
            .iter()
            .map(|p| {
                let piece = pieces.iter().find(|c| c.id == p.id).unwrap();
                let flat = polygon::dedup_ring(piece.path.flatten(FLATTEN_STEPS), 1e-9);
                let ring = polygon::simplify_ring(&flat, SIMPLIFY_TOLERANCE);
                let centre = piece.bbox.center();
                let rotated = polygon::rotated_about(&ring, p.rotation_deg.to_radians(), centre);
                polygon::translated(&rotated, Vec2::new(p.x - centre.x, p.y - centre.y))
            })
            .collect();
        for i in 0..rings.len() {
            for j in i + 1..rings.len() {
                assert!(
                    polygon::min_point_distance(&rings[i], &rings[j]) >= spec.gap - 1e-9,
                    "pieces {} and {} sit closer than the gap",
                    result.placements[i].id,
                    result.placements[j].id
                );
            }
        }
    }

    #[test]
    fn every_strategy_places_the_full_set() {
        let pieces = real_pieces(2, 2, 9);
        for strategy in [
            NestStrategy::Fast,
            NestStrategy::Balanced,
            NestStrategy::MaximizeSaving,
        ] {
            let mut warnings = Warnings::new();
            let result = nest(&pieces, &nest_spec(400.0, 300.0, strategy), 9, &mut warnings);
            assert!(result.success, "{strategy:?} left {:?}", result.unplaced);
            assert_eq!(result.placements.len(), 4);
            assert!(result.utilization > 0.0);
        }
    }

    #[test]
    fn nesting_is_deterministic_for_a_seed() {
        let pieces = real_pieces(3, 3, 4242);
        let spec = nest_spec(500.0, 400.0, NestStrategy::Balanced);
        let run = |warnings: &mut Warnings| {
            nest(&pieces, &spec, 4242, warnings)
                .placements
                .iter()
                .map(|p| (p.id.clone(), p.x, p.y, p.rotation_deg))
                .collect::<Vec<_>>()
        };
        let first = run(&mut Warnings::new());
        let second = run(&mut Warnings::new());
        assert_eq!(first, second);
    }

    #[test]
    fn oversized_piece_is_reported_unplaced() {
        let pieces = vec![rect_piece("A1", 500.0, 400.0), rect_piece("A2", 40.0, 30.0)];
        let mut warnings = Warnings::new();
        let result = nest(&pieces, &nest_spec(200.0, 150.0, NestStrategy::Fast), 1, &mut warnings);

        assert!(!result.success && !result.fits);
        assert_eq!(result.unplaced, vec!["A1"]);
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.placements[0].id, "A2");
        assert!(warnings
            .as_slice()
            .iter()
            .any(|w| w.contains("could not be nested")));
    }
}
