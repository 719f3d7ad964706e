//! The generation pipeline: validate, draw edges, assemble, clip, compensate,
//! lay out.
//!
//! Only configuration validation can fail. Every later stage reports problems
//! through the warning list and keeps going, possibly with reduced output.

use std::time::Instant;

use jiggen_core::{ConfigError, PiecePath, PuzzleConfig, Warnings};
use jiggen_geometry::engine;
use jiggen_layout::{layout_pieces, LayoutResult};
use jiggen_pieces::{
    apply_cutout, assemble_pieces, clip_to_template, compensate, cutout_outline, panel_outline,
    EdgeMap, Piece, Template,
};
use tracing::info;

use crate::diagnostics::{Diagnostics, LayoutDiagnostics};

/// Everything one run produces; the render layer serializes from here.
#[derive(Debug)]
pub struct PuzzleOutput {
    pub pieces: Vec<Piece>,
    /// Outer border cut: the template outline, or the (possibly rounded)
    /// panel rectangle.
    pub border: PiecePath,
    pub layout: LayoutResult,
    pub diagnostics: Diagnostics,
}

pub async fn generate(config: &PuzzleConfig) -> Result<PuzzleOutput, ConfigError> {
    config.validate()?;
    let started = Instant::now();
    let mut warnings = Warnings::new();

    let engine = engine().await;
    if engine.is_degraded() {
        warnings.push("boolean geometry unavailable, template and offset stages run degraded");
    }

    let edges = EdgeMap::build(config, &mut warnings);
    let interior_horizontal = edges.interior_horizontal();
    let interior_vertical = edges.interior_vertical();
    let mut pieces = assemble_pieces(config, &edges);
    info!(
        target: "jiggen",
        pieces = pieces.len(),
        edges = edges.len(),
        "assembled grid"
    );

    if let Some(template) = Template::from_config(config) {
        let cell = (config.cell_width(), config.cell_height());
        pieces = clip_to_template(pieces, &template, engine, cell, &mut warnings);
    }
    if let Some(cutout) = cutout_outline(config) {
        pieces = apply_cutout(pieces, &cutout, engine, &mut warnings);
    }
    let (pieces, realized_offset) =
        compensate(pieces, config.kerf, config.clearance, engine, &mut warnings);

    let layout = layout_pieces(
        &pieces,
        &config.layout,
        (config.width, config.height),
        config.seed,
        &mut warnings,
    );

    let diagnostics = Diagnostics {
        piece_count: pieces.len(),
        interior_horizontal_edges: interior_horizontal,
        interior_vertical_edges: interior_vertical,
        realized_offset_mm: realized_offset,
        engine: engine.name().to_string(),
        degraded_engine: engine.is_degraded(),
        duration_ms: started.elapsed().as_millis() as u64,
        layout: LayoutDiagnostics::from(&layout),
        warnings: warnings.into_vec(),
    };

    Ok(PuzzleOutput {
        pieces,
        border: panel_outline(config),
        layout,
        diagnostics,
    })
}
