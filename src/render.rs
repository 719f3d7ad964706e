//! `jiggen render`: read a configuration, run the pipeline, write the
//! output directory.

use std::path::{Path, PathBuf};

use jiggen_core::PuzzleConfig;
use jiggen_export::svg::{path_d, puzzle_document, SvgError};
use jiggen_layout::LayoutResult;
use serde::Serialize;

use crate::error::CliError;
use crate::pipeline::{generate, PuzzleOutput};

pub async fn run_render(input: PathBuf, output: PathBuf, debug: bool) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(&input).map_err(|source| CliError::ReadConfig {
        path: input.clone(),
        source,
    })?;
    let config = parse_config(&input, &raw)?;

    log_header(debug);
    println!("Validating configuration...");
    println!("Drawing edges...");
    println!("Assembling pieces...");
    println!("Applying template and offsets...");
    println!("Laying out the sheet...");
    println!("Writing output to disk...");

    let out = generate(&config).await?;

    std::fs::create_dir_all(&output).map_err(|source| CliError::Write {
        path: output.clone(),
        source,
    })?;
    write_svg_outputs(&output, &config, &out)?;
    write_json_outputs(&output, &out)?;

    println!(
        "Generated {} pieces ({} warnings).",
        out.diagnostics.piece_count,
        out.diagnostics.warnings.len()
    );
    if debug {
        for warning in &out.diagnostics.warnings {
            println!("  warning: {warning}");
        }
    }
    println!("Done.");
    Ok(())
}

fn log_header(debug: bool) {
    if debug {
        println!("Jiggen CLI (Debug Mode)\n");
    } else {
        println!("Jiggen CLI\n");
    }
}

fn parse_config(input: &Path, raw: &str) -> Result<PuzzleConfig, CliError> {
    let is_json = input
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(raw).map_err(CliError::InvalidJson)
    } else {
        serde_yaml::from_str(raw).map_err(CliError::InvalidYaml)
    }
}

/// `puzzle.svg` is the assembled preview with the outer border; `cut.svg`
/// places pieces by the configured layout on the sheet. An empty piece set
/// skips the SVGs instead of failing, the JSON outputs still record it.
fn write_svg_outputs(
    output: &Path,
    config: &PuzzleConfig,
    out: &PuzzleOutput,
) -> Result<(), CliError> {
    let preview = jiggen_layout::assembled(&out.pieces, (config.width, config.height));
    let puzzle = puzzle_document(
        &out.pieces,
        &preview.placements,
        (config.width, config.height),
        Some(&out.border),
    );
    write_svg(&output.join("puzzle.svg"), puzzle)?;

    let cut = puzzle_document(&out.pieces, &out.layout.placements, out.layout.sheet, None);
    write_svg(&output.join("cut.svg"), cut)
}

fn write_svg(path: &Path, doc: Result<String, SvgError>) -> Result<(), CliError> {
    match doc {
        Ok(svg) => std::fs::write(path, svg).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
        Err(SvgError::Empty) => Ok(()),
        Err(e) => Err(CliError::Svg(e)),
    }
}

#[derive(Debug, Serialize)]
struct PieceRecord<'a> {
    id: &'a str,
    row: u32,
    col: u32,
    d: String,
}

#[derive(Debug, Serialize)]
struct PiecesFile<'a> {
    pieces: Vec<PieceRecord<'a>>,
    layout: &'a LayoutResult,
}

fn write_json_outputs(output: &Path, out: &PuzzleOutput) -> Result<(), CliError> {
    let records: Vec<PieceRecord> = out
        .pieces
        .iter()
        .map(|piece| PieceRecord {
            id: &piece.id,
            row: piece.row,
            col: piece.col,
            d: path_d(&piece.path),
        })
        .collect();
    let pieces_file = PiecesFile {
        pieces: records,
        layout: &out.layout,
    };

    write_json(&output.join("pieces.json"), &pieces_file)?;
    write_json(&output.join("diagnostics.json"), &out.diagnostics)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| CliError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}
