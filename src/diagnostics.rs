//! Run summary for `diagnostics.json`.
//!
//! Aggregation only, nothing in here can fail. A run that degraded or shed
//! pieces still gets a complete diagnostics block with its warnings attached.

use jiggen_core::LayoutMode;
use jiggen_layout::LayoutResult;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LayoutDiagnostics {
    pub mode: LayoutMode,
    pub fits: bool,
    pub success: bool,
    pub placed: usize,
    pub unplaced: usize,
    pub utilization_pct: f64,
}

impl From<&LayoutResult> for LayoutDiagnostics {
    fn from(layout: &LayoutResult) -> Self {
        Self {
            mode: layout.mode,
            fits: layout.fits,
            success: layout.success,
            placed: layout.placements.len(),
            unplaced: layout.unplaced.len(),
            utilization_pct: layout.utilization,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub piece_count: usize,
    pub interior_horizontal_edges: usize,
    pub interior_vertical_edges: usize,
    /// Offset actually applied to the outlines, mm. Zero when compensation
    /// was skipped or below the minimum.
    pub realized_offset_mm: f64,
    pub engine: String,
    pub degraded_engine: bool,
    pub duration_ms: u64,
    pub layout: LayoutDiagnostics,
    pub warnings: Vec<String>,
}
