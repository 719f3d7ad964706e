//! Shared edge map.
//!
//! Every grid line is generated exactly once, keyed by orientation and
//! position, and both adjacent pieces read the same stored path. The reverse
//! view is derived arithmetically from the stored one, so the two sides of an
//! edge cannot drift apart and the randomness budget is one draw sequence per
//! interior line.

use std::fmt;

use indexmap::IndexMap;
use jiggen_core::{sub_seed, PiecePath, PuzzleConfig, SeedStream, Vec2, Warnings};

use crate::knob;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    fn tag(self) -> u32 {
        match self {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        }
    }
}

/// Identity of one grid line. Horizontal line `(r, c)` is the top edge of
/// cell `(r, c)` with `r` in `0..=rows`; vertical line `(r, c)` is the left
/// edge of cell `(r, c)` with `c` in `0..=cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub orientation: Orientation,
    pub row: u32,
    pub col: u32,
}

impl EdgeKey {
    pub fn horizontal(row: u32, col: u32) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            row,
            col,
        }
    }

    pub fn vertical(row: u32, col: u32) -> Self {
        Self {
            orientation: Orientation::Vertical,
            row,
            col,
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = match self.orientation {
            Orientation::Horizontal => "h",
            Orientation::Vertical => "v",
        };
        write!(f, "{} edge ({}, {})", o, self.row, self.col)
    }
}

/// A stored edge in its local frame `(0, 0) -> (len, 0)`.
///
/// `is_tab` means the forward-viewing piece (the piece whose top edge a
/// horizontal line is, or whose right edge a vertical line is) owns the tab;
/// the stored path then bumps toward negative y. Border edges are straight.
#[derive(Debug, Clone)]
pub struct Edge {
    pub path: PiecePath,
    pub len: f64,
    pub is_tab: bool,
    pub is_border: bool,
}

/// Direction an adjacent piece walks the stored edge in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    Forward,
    Reverse,
}

#[derive(Debug)]
pub struct EdgeMap {
    edges: IndexMap<EdgeKey, Edge>,
    rows: u32,
    cols: u32,
}

impl EdgeMap {
    /// Generates every edge of the grid, row-major, horizontals first.
    pub fn build(config: &PuzzleConfig, warnings: &mut Warnings) -> Self {
        let rows = config.rows;
        let cols = config.columns;
        let cell_w = config.cell_width();
        let cell_h = config.cell_height();

        let count = ((rows + 1) * cols + rows * (cols + 1)) as usize;
        let mut edges = IndexMap::with_capacity(count);

        for row in 0..=rows {
            for col in 0..cols {
                let key = EdgeKey::horizontal(row, col);
                let border = row == 0 || row == rows;
                edges.insert(key, make_edge(config, key, cell_w, cell_h, border, warnings));
            }
        }
        for row in 0..rows {
            for col in 0..=cols {
                let key = EdgeKey::vertical(row, col);
                let border = col == 0 || col == cols;
                edges.insert(key, make_edge(config, key, cell_h, cell_w, border, warnings));
            }
        }

        Self { edges, rows, cols }
    }

    pub fn get(&self, key: &EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    /// The stored path as seen from one side. `Forward` is the stored frame;
    /// `Reverse` is the mirrored walk of the same curve. The key must name an
    /// edge of this grid.
    pub fn view(&self, key: EdgeKey, traversal: Traversal) -> PiecePath {
        let edge = &self.edges[&key];
        match traversal {
            Traversal::Forward => edge.path.clone(),
            Traversal::Reverse => edge.path.mirror_view(edge.len),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey, &Edge)> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn interior_horizontal(&self) -> usize {
        (self.rows.saturating_sub(1) * self.cols) as usize
    }

    pub fn interior_vertical(&self) -> usize {
        (self.rows * self.cols.saturating_sub(1)) as usize
    }

    pub fn interior_total(&self) -> usize {
        self.interior_horizontal() + self.interior_vertical()
    }
}

fn make_edge(
    config: &PuzzleConfig,
    key: EdgeKey,
    len: f64,
    perp: f64,
    border: bool,
    warnings: &mut Warnings,
) -> Edge {
    if border {
        let mut path = PiecePath::new(Vec2::ZERO);
        path.line_to(Vec2::new(len, 0.0));
        return Edge {
            path,
            len,
            is_tab: false,
            is_border: true,
        };
    }

    let seed = sub_seed(config.seed, key.orientation.tag(), key.row, key.col);
    let mut stream = SeedStream::new(seed);
    // Tab side first, then the knob parameters, always in this order.
    let is_tab = stream.chance(0.5);
    let bump = knob::edge_bump(
        len,
        perp,
        &config.knob,
        &mut stream,
        warnings,
        &key.to_string(),
    );
    let path = if is_tab { bump } else { bump.reflect_baseline() };
    Edge {
        path,
        len,
        is_tab,
        is_border: false,
    }
}
