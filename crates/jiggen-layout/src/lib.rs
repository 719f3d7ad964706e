//! Sheet layout: assembled, packed grid, and true-shape nesting.
//!
//! Layout never changes piece geometry. A `Placement` records where a piece's
//! bounding-box centre lands on the sheet and how far the piece is rotated
//! about that centre; exporters apply it as a transform.

pub mod nest;
pub mod packed;

use jiggen_core::{LayoutMode, LayoutSpec, Warnings};
use jiggen_geometry::polygon;
use jiggen_pieces::Piece;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Placement {
    pub id: String,
    pub row: u32,
    pub col: u32,
    /// Sheet position of the piece's bounding-box centre, mm.
    pub x: f64,
    pub y: f64,
    /// Rotation about that centre, degrees.
    pub rotation_deg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    pub mode: LayoutMode,
    /// Sheet dimensions the layout ran against, mm.
    pub sheet: (f64, f64),
    pub placements: Vec<Placement>,
    /// Ids that found no spot, in input order.
    pub unplaced: Vec<String>,
    pub fits: bool,
    pub success: bool,
    /// Placed piece area over used sheet area, percent.
    pub utilization: f64,
}

/// Sampled outline area of one piece.
pub(crate) fn piece_area(piece: &Piece) -> f64 {
    polygon::signed_area(&piece.path.flatten(12)).abs()
}

/// Lays the pieces out according to `spec.mode`. Infeasible layouts come back
/// as `fits`/`success` flags and warnings, never errors.
pub fn layout_pieces(
    pieces: &[Piece],
    spec: &LayoutSpec,
    panel: (f64, f64),
    seed: u32,
    warnings: &mut Warnings,
) -> LayoutResult {
    match spec.mode {
        LayoutMode::Assembled => assembled(pieces, panel),
        LayoutMode::Packed => packed::pack(pieces, spec, warnings),
        LayoutMode::Nested => nest::nest(pieces, spec, seed, warnings),
    }
}

/// Identity layout: every piece stays at its grid position on the panel.
pub fn assembled(pieces: &[Piece], panel: (f64, f64)) -> LayoutResult {
    let placements = pieces
        .iter()
        .map(|p| Placement {
            id: p.id.clone(),
            row: p.row,
            col: p.col,
            x: p.bbox.center().x,
            y: p.bbox.center().y,
            rotation_deg: 0.0,
        })
        .collect();
    let area: f64 = pieces.iter().map(piece_area).sum();
    let sheet_area = panel.0 * panel.1;
    LayoutResult {
        mode: LayoutMode::Assembled,
        sheet: panel,
        placements,
        unplaced: Vec::new(),
        fits: true,
        success: true,
        utilization: if sheet_area > 0.0 {
            100.0 * area / sheet_area
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use jiggen_core::PuzzleConfig;
    use jiggen_pieces::{assemble_pieces, EdgeMap};

    #[test]
    fn assembled_layout_is_the_identity() {
        let config = PuzzleConfig {
            width: 100.0,
            height: 100.0,
            rows: 2,
            columns: 2,
            seed: 9,
            ..PuzzleConfig::default()
        };
        let mut warnings = Warnings::new();
        let edges = EdgeMap::build(&config, &mut warnings);
        let pieces = assemble_pieces(&config, &edges);

        let result = layout_pieces(
            &pieces,
            &config.layout,
            (config.width, config.height),
            config.seed,
            &mut warnings,
        );

        assert!(result.fits && result.success);
        assert_eq!(result.placements.len(), 4);
        for (placement, piece) in result.placements.iter().zip(pieces.iter()) {
            assert_eq!(placement.id, piece.id);
            assert_eq!(placement.rotation_deg, 0.0);
            assert_abs_diff_eq!(placement.x, piece.bbox.center().x, epsilon = 1e-12);
            assert_abs_diff_eq!(placement.y, piece.bbox.center().y, epsilon = 1e-12);
        }
        // Pieces tile the whole panel.
        assert_abs_diff_eq!(result.utilization, 100.0, epsilon = 1e-6);
        assert!(warnings.is_empty());
    }
}
