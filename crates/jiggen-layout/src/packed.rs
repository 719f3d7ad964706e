//! Row-major bounding-box packing.

use jiggen_core::{LayoutMode, LayoutSpec, Warnings};
use jiggen_pieces::Piece;

use crate::{piece_area, LayoutResult, Placement};

/// Packs piece bounding boxes onto the sheet row by row. The boxes already
/// include knob overhang, so box spacing is real cut spacing. Packing stops
/// the moment a row would run past the sheet height.
pub fn pack(pieces: &[Piece], spec: &LayoutSpec, warnings: &mut Warnings) -> LayoutResult {
    let (sheet_w, sheet_h) = spec.sheet.dims();
    let margin = spec.margin;
    let gap = spec.gap;

    let mut placements = Vec::with_capacity(pieces.len());
    let mut unplaced = Vec::new();

    let mut x = margin;
    let mut y = margin;
    let mut row_h: f64 = 0.0;
    let mut area = 0.0;
    let mut used_bottom: f64 = 0.0;

    for (i, piece) in pieces.iter().enumerate() {
        let w = piece.bbox.width();
        let h = piece.bbox.height();

        if w > sheet_w - 2.0 * margin {
            warnings.push(format!(
                "piece {} is wider than the usable sheet ({:.1}mm > {:.1}mm)",
                piece.id,
                w,
                sheet_w - 2.0 * margin
            ));
            unplaced.push(piece.id.clone());
            continue;
        }
        if x > margin && x + w > sheet_w - margin {
            x = margin;
            y += row_h + gap;
            row_h = 0.0;
        }
        if y + h > sheet_h - margin {
            warnings.push(format!(
                "sheet {:.0}x{:.0}mm holds only {} of {} pieces",
                sheet_w,
                sheet_h,
                placements.len(),
                pieces.len()
            ));
            unplaced.extend(pieces[i..].iter().map(|p| p.id.clone()));
            break;
        }

        placements.push(Placement {
            id: piece.id.clone(),
            row: piece.row,
            col: piece.col,
            x: x + w / 2.0,
            y: y + h / 2.0,
            rotation_deg: 0.0,
        });
        area += piece_area(piece);
        used_bottom = used_bottom.max(y + h);
        x += w + gap;
        row_h = row_h.max(h);
    }

    let success = unplaced.is_empty();
    let used = sheet_w * used_bottom;
    LayoutResult {
        mode: LayoutMode::Packed,
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
    use jiggen_core::{PiecePath, SheetSpec, Vec2};

    fn rect_piece(id: &str, row: u32, col: u32, w: f64, h: f64) -> Piece {
        let mut path = PiecePath::new(Vec2::ZERO);
        path.line_to(Vec2::new(w, 0.0));
        path.line_to(Vec2::new(w, h));
        path.line_to(Vec2::new(0.0, h));
        path.line_to(Vec2::ZERO);
        let bbox = path.bbox();
        Piece {
            row,
            col,
            id: id.to_string(),
            path,
            bbox,
        }
    }

    fn spec(w: f64, h: f64) -> LayoutSpec {
        LayoutSpec {
            sheet: SheetSpec::Custom {
                width: w,
                height: h,
            },
            margin: 5.0,
            gap: 2.0,
            ..LayoutSpec::default()
        }
    }

    #[test]
    fn rows_wrap_at_the_sheet_edge() {
        let pieces = vec![
            rect_piece("A1", 0, 0, 50.0, 40.0),
            rect_piece("A2", 0, 1, 50.0, 40.0),
            rect_piece("B1", 1, 0, 50.0, 40.0),
            rect_piece("B2", 1, 1, 50.0, 40.0),
        ];
        let mut warnings = Warnings::new();
        let result = pack(&pieces, &spec(130.0, 300.0), &mut warnings);

        assert!(result.fits && result.success);
        assert!(warnings.is_empty());
        let centres: Vec<(f64, f64)> = result.placements.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            centres,
            vec![(30.0, 25.0), (82.0, 25.0), (30.0, 67.0), (82.0, 67.0)]
        );
        // 4 * 2000 mm^2 over 130 * 87 mm^2 of used sheet.
        assert_abs_diff_eq!(result.utilization, 100.0 * 8000.0 / 11310.0, epsilon = 1e-9);
    }

    #[test]
    fn height_overflow_stops_packing() {
        let pieces = vec![
            rect_piece("A1", 0, 0, 50.0, 30.0),
            rect_piece("A2", 0, 1, 50.0, 30.0),
            rect_piece("B1", 1, 0, 50.0, 30.0),
        ];
        let mut warnings = Warnings::new();
        let result = pack(&pieces, &spec(60.0, 60.0), &mut warnings);

        assert!(!result.fits && !result.success);
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.unplaced, vec!["A2", "B1"]);
        assert!(warnings.as_slice().iter().any(|w| w.contains("1 of 3")));
    }

    #[test]
    fn overwide_piece_is_skipped_but_packing_continues() {
        let pieces = vec![
            rect_piece("A1", 0, 0, 200.0, 20.0),
            rect_piece("A2", 0, 1, 30.0, 20.0),
        ];
        let mut warnings = Warnings::new();
        let result = pack(&pieces, &spec(100.0, 100.0), &mut warnings);

        assert!(!result.fits);
        assert_eq!(result.unplaced, vec!["A1"]);
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.placements[0].id, "A2");
        assert!(warnings.as_slice().iter().any(|w| w.contains("wider")));
    }
}
