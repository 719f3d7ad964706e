//! Piece assembly.
//!
//! A piece outline is four edge views placed by affine transforms: top and
//! bottom horizontals, left and right verticals (authored horizontally and
//! rotated into place, never regenerated). All four placement transforms have
//! determinant +1, so arc sweep flags survive unchanged and both neighbours
//! of an edge trace bitwise-identical world coordinates.

use jiggen_core::{Aabb, Affine, PiecePath, PuzzleConfig};

use crate::edges::{EdgeKey, EdgeMap, Traversal};

/// Maximum joint gap tolerated without a correction segment, mm.
pub const JOINT_EPS: f64 = 1e-3;

#[derive(Debug, Clone)]
pub struct Piece {
    pub row: u32,
    pub col: u32,
    pub id: String,
    pub path: PiecePath,
    pub bbox: Aabb,
}

/// Spreadsheet-style row letters: 0 -> A, 25 -> Z, 26 -> AA.
pub fn row_label(mut row: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (row % 26) as u8));
        if row < 26 {
            break;
        }
        row = row / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// `A1` style id: row letters plus 1-based column.
pub fn piece_id(row: u32, col: u32) -> String {
    format!("{}{}", row_label(row), col + 1)
}

/// Assembles every piece of the grid, row-major.
pub fn assemble_pieces(config: &PuzzleConfig, edges: &EdgeMap) -> Vec<Piece> {
    let cell_w = config.cell_width();
    let cell_h = config.cell_height();
    let mut pieces = Vec::with_capacity(config.piece_count() as usize);
    for row in 0..config.rows {
        for col in 0..config.columns {
            pieces.push(assemble_piece(edges, row, col, cell_w, cell_h));
        }
    }
    pieces
}

fn assemble_piece(edges: &EdgeMap, row: u32, col: u32, cell_w: f64, cell_h: f64) -> Piece {
    let x0 = f64::from(col) * cell_w;
    let y0 = f64::from(row) * cell_h;
    let x1 = x0 + cell_w;
    let y1 = y0 + cell_h;

    // Walk order: top rightward, right downward, bottom leftward, left upward.
    let top = edges
        .view(EdgeKey::horizontal(row, col), Traversal::Forward)
        .transform(&Affine::translation(x0, y0));
    let right = edges
        .view(EdgeKey::vertical(row, col + 1), Traversal::Forward)
        .transform(&Affine::new(0.0, 1.0, -1.0, 0.0, x1, y0));
    let bottom = edges
        .view(EdgeKey::horizontal(row + 1, col), Traversal::Reverse)
        .transform(&Affine::new(-1.0, 0.0, 0.0, -1.0, x1, y1));
    let left = edges
        .view(EdgeKey::vertical(row, col), Traversal::Reverse)
        .transform(&Affine::new(0.0, -1.0, 1.0, 0.0, x0, y1));

    let mut path = top;
    path.append(&right, JOINT_EPS);
    path.append(&bottom, JOINT_EPS);
    path.append(&left, JOINT_EPS);
    let start = path.start;
    if path.end().distance(start) > JOINT_EPS {
        path.line_to(start);
    }

    let bbox = path.bbox();
    Piece {
        row,
        col,
        id: piece_id(row, col),
        path,
        bbox,
    }
}
