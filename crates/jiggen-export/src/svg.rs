//! SVG cut-document writer.
//!
//! Everything is millimetres in a y-down frame, so paths go out without an
//! axis flip. Numbers run through `ryu` with a trailing `.0` stripped, which
//! keeps documents byte-identical for a given seed and configuration.

use std::collections::HashMap;

use jiggen_core::{PathSeg, PiecePath, Vec2};
use jiggen_layout::Placement;
use jiggen_pieces::Piece;

#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    #[error("SVG export requires at least one piece")]
    Empty,
    #[error("placement {id} has no matching piece")]
    UnknownPlacement { id: String },
}

const EPS: f64 = 1e-3;

fn fmt_num(v: f64) -> String {
    let v = if v.abs() < 1e-9 { 0.0 } else { v };
    let mut buf = ryu::Buffer::new();
    let s = buf.format(v);
    s.strip_suffix(".0").unwrap_or(s).to_string()
}

/// Path data for one outline: absolute `M`/`L`/`C`/`A` commands, plus a
/// closing `Z` when the path returns to its start.
pub fn path_d(path: &PiecePath) -> String {
    let mut d = format!("M {} {}", fmt_num(path.start.x), fmt_num(path.start.y));
    for seg in &path.segs {
        match *seg {
            PathSeg::Line { to } => {
                d.push_str(&format!(" L {} {}", fmt_num(to.x), fmt_num(to.y)));
            }
            PathSeg::Cubic { c1, c2, to } => {
                d.push_str(&format!(
                    " C {} {} {} {} {} {}",
                    fmt_num(c1.x),
                    fmt_num(c1.y),
                    fmt_num(c2.x),
                    fmt_num(c2.y),
                    fmt_num(to.x),
                    fmt_num(to.y)
                ));
            }
            PathSeg::Arc {
                radius,
                large_arc,
                sweep,
                to,
            } => {
                let r = fmt_num(radius);
                let large = if large_arc { 1 } else { 0 };
                let sweep = if sweep { 1 } else { 0 };
                d.push_str(&format!(
                    " A {} {} 0 {} {} {} {}",
                    r,
                    r,
                    large,
                    sweep,
                    fmt_num(to.x),
                    fmt_num(to.y)
                ));
            }
        }
    }
    if path.is_closed_within(EPS) {
        d.push_str(" Z");
    }
    d
}

/// `transform` attribute for a placement, rotating about the authored
/// bounding-box centre. Identity placements return `None`, so assembled
/// documents carry no transforms at all.
pub fn transform_attr(placement: &Placement, centre: Vec2) -> Option<String> {
    let dx = placement.x - centre.x;
    let dy = placement.y - centre.y;
    let mut parts = Vec::new();
    if dx.abs() > 1e-9 || dy.abs() > 1e-9 {
        parts.push(format!("translate({} {})", fmt_num(dx), fmt_num(dy)));
    }
    if placement.rotation_deg.abs() > 1e-9 {
        parts.push(format!(
            "rotate({} {} {})",
            fmt_num(placement.rotation_deg),
            fmt_num(centre.x),
            fmt_num(centre.y)
        ));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Full cut document: one `<path>` per placed piece inside a `pieces` group,
/// then a single border path. Placements choose which pieces appear and
/// where; `size` is the document size in mm.
pub fn puzzle_document(
    pieces: &[Piece],
    placements: &[Placement],
    size: (f64, f64),
    border: Option<&PiecePath>,
) -> Result<String, SvgError> {
    if pieces.is_empty() {
        return Err(SvgError::Empty);
    }
    let by_id: HashMap<&str, &Piece> = pieces.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut body = String::new();
    for placement in placements {
        let piece = by_id
            .get(placement.id.as_str())
            .copied()
            .ok_or_else(|| SvgError::UnknownPlacement {
                id: placement.id.clone(),
            })?;
        body.push_str(&format!(
            "<path id=\"{}\" data-row=\"{}\" data-col=\"{}\" d=\"{}\"",
            piece.id,
            piece.row,
            piece.col,
            path_d(&piece.path)
        ));
        if let Some(transform) = transform_attr(placement, piece.bbox.center()) {
            body.push_str(&format!(" transform=\"{transform}\""));
        }
        body.push_str(" vector-effect=\"non-scaling-stroke\"/>");
    }

    let border = border
        .map(|outline| {
            format!(
                "<path id=\"border\" d=\"{}\" vector-effect=\"non-scaling-stroke\"/>",
                path_d(outline)
            )
        })
        .unwrap_or_default();

    Ok(format!(
        "<svg width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\"><g stroke-linecap=\"round\" fill-rule=\"evenodd\" stroke=\"#000\" stroke-width=\"0.25mm\" fill=\"none\" style=\"stroke:#000;stroke-width:0.25mm;fill:none\"><g id=\"pieces\">{body}</g>{border}</g></svg>",
        w = fmt_num(size.0),
        h = fmt_num(size.1),
    ))
}
