//! Kerf and clearance compensation.
//!
//! The laser burns away `kerf` millimetres centred on the cut line, so half
//! of it is returned to every outline. The configured clearance is taken back
//! off to leave intentional play between pieces.

use jiggen_core::Warnings;
use jiggen_geometry::convert::{path_to_polyline, polyline_to_path, CURVE_STEPS};
use jiggen_geometry::Engine;

use crate::assemble::Piece;
use crate::clip::largest_real_loop;

/// Deltas below this are not worth an offset pass.
pub const MIN_OFFSET_MM: f64 = 1e-4;

/// Offsets every piece outline by `kerf / 2 - clearance` (positive grows).
/// Returns the pieces and the delta actually applied; a piece whose offset
/// fails keeps its uncompensated outline with a warning.
pub fn compensate(
    pieces: Vec<Piece>,
    kerf: f64,
    clearance: f64,
    engine: &Engine,
    warnings: &mut Warnings,
) -> (Vec<Piece>, f64) {
    let delta = kerf / 2.0 - clearance;
    if delta.abs() < MIN_OFFSET_MM {
        return (pieces, 0.0);
    }
    if engine.is_degraded() {
        warnings.push("kerf compensation skipped (degraded engine)");
        return (pieces, 0.0);
    }

    let mut out = Vec::with_capacity(pieces.len());
    for mut piece in pieces {
        let base = path_to_polyline(&piece.path, CURVE_STEPS);
        match engine.backend().offset(&base, delta) {
            Ok(loops) => match largest_real_loop(loops) {
                Some(best) => {
                    let path = polyline_to_path(&engine.backend().simplify(best));
                    piece.bbox = path.bbox();
                    piece.path = path;
                }
                None => warnings.push(format!(
                    "piece {}: offset by {delta:.3}mm collapsed, keeping the uncompensated outline",
                    piece.id
                )),
            },
            Err(err) => warnings.push(format!(
                "piece {}: {err}, keeping the uncompensated outline",
                piece.id
            )),
        }
        out.push(piece);
    }
    (out, delta)
}
