//! Boolean backend facade.
//!
//! The primary backend drives cavalier_contours. If its startup self-check
//! fails, or `JIGGEN_FORCE_DEGRADED=1` is set, a degraded backend takes over:
//! every operation returns its input unchanged so a run still produces
//! cuttable output, just without clipping or kerf compensation. The active
//! backend is probed once per process and memoized.

use cavalier_contours::polyline::{PlineOffsetOptions, PlineOrientation, PlineSource};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::primitives;
use crate::{BooleanOp, BooleanResultInfo, Polyline};

pub const FORCE_DEGRADED_ENV: &str = "JIGGEN_FORCE_DEGRADED";

#[derive(Debug, thiserror::Error)]
pub enum GeomError {
    #[error("offset by {delta}mm left no outline")]
    EmptyOffset { delta: f64 },
}

/// Boolean and offset operations on closed polylines.
///
/// All operations take and return outer loops only; hole loops emitted by a
/// backend are discarded. `union`, `difference` and `intersect` signal failure
/// through empty output, never through an error.
pub trait BoolGeom: Send + Sync {
    fn name(&self) -> &'static str;

    /// Merge overlapping outlines into their combined boundaries.
    fn union(&self, plines: Vec<Polyline<f64>>) -> Vec<Polyline<f64>>;

    /// Remove every cutter from every outline in `base`.
    fn difference(&self, base: Vec<Polyline<f64>>, cutters: &[Polyline<f64>])
        -> Vec<Polyline<f64>>;

    /// Keep the parts of `base` that lie inside `clip`.
    fn intersect(&self, base: &Polyline<f64>, clip: &Polyline<f64>) -> Vec<Polyline<f64>>;

    /// Drop redundant vertices without changing the traced outline.
    fn simplify(&self, pline: Polyline<f64>) -> Polyline<f64>;

    /// Offset outward (positive `delta`) or inward (negative), independent of
    /// the outline's winding direction.
    fn offset(&self, pline: &Polyline<f64>, delta: f64) -> Result<Vec<Polyline<f64>>, GeomError>;
}

pub struct CavalierEngine;

impl BoolGeom for CavalierEngine {
    fn name(&self) -> &'static str {
        "cavalier"
    }

    fn union(&self, plines: Vec<Polyline<f64>>) -> Vec<Polyline<f64>> {
        union_set(plines)
    }

    fn difference(
        &self,
        base: Vec<Polyline<f64>>,
        cutters: &[Polyline<f64>],
    ) -> Vec<Polyline<f64>> {
        let mut current: Vec<Polyline<f64>> = base
            .into_iter()
            .filter(is_real_loop)
            .map(simplify)
            .collect();
        for cutter in cutters {
            if !is_real_loop(cutter) {
                continue;
            }
            let mut next: Vec<Polyline<f64>> = Vec::new();
            for pline in &current {
                let res = pline.boolean(cutter, BooleanOp::Not);
                next.extend(res.pos_plines.into_iter().map(|p| simplify(p.pline)));
            }
            current = next;
        }
        current
    }

    fn intersect(&self, base: &Polyline<f64>, clip: &Polyline<f64>) -> Vec<Polyline<f64>> {
        if !is_real_loop(base) || !is_real_loop(clip) {
            return Vec::new();
        }
        let res = base.boolean(clip, BooleanOp::And);
        match res.result_info {
            BooleanResultInfo::InvalidInput => Vec::new(),
            _ => res
                .pos_plines
                .into_iter()
                .map(|p| simplify(p.pline))
                .collect(),
        }
    }

    fn simplify(&self, pline: Polyline<f64>) -> Polyline<f64> {
        simplify(pline)
    }

    fn offset(&self, pline: &Polyline<f64>, delta: f64) -> Result<Vec<Polyline<f64>>, GeomError> {
        if delta == 0.0 {
            return Ok(vec![pline.clone()]);
        }
        let opts = PlineOffsetOptions {
            handle_self_intersects: true,
            ..Default::default()
        };
        let out: Vec<Polyline<f64>> = pline
            .parallel_offset_opt(signed_offset_for(pline, delta), &opts)
            .into_iter()
            .map(simplify)
            .collect();
        if out.is_empty() {
            return Err(GeomError::EmptyOffset { delta });
        }
        Ok(out)
    }
}

/// Identity backend used when the primary one is unavailable. Operations keep
/// their inputs so downstream stages still have geometry to work with.
pub struct DegradedEngine;

impl BoolGeom for DegradedEngine {
    fn name(&self) -> &'static str {
        "degraded"
    }

    fn union(&self, mut plines: Vec<Polyline<f64>>) -> Vec<Polyline<f64>> {
        plines.retain(is_real_loop);
        plines
    }

    fn difference(
        &self,
        base: Vec<Polyline<f64>>,
        _cutters: &[Polyline<f64>],
    ) -> Vec<Polyline<f64>> {
        base
    }

    fn intersect(&self, base: &Polyline<f64>, _clip: &Polyline<f64>) -> Vec<Polyline<f64>> {
        vec![base.clone()]
    }

    fn simplify(&self, pline: Polyline<f64>) -> Polyline<f64> {
        pline
    }

    fn offset(&self, pline: &Polyline<f64>, _delta: f64) -> Result<Vec<Polyline<f64>>, GeomError> {
        Ok(vec![pline.clone()])
    }
}

pub struct Engine {
    backend: Box<dyn BoolGeom>,
    degraded: bool,
}

impl Engine {
    /// The cavalier backend, skipping the self-check.
    pub fn primary() -> Self {
        Self {
            backend: Box::new(CavalierEngine),
            degraded: false,
        }
    }

    /// The identity fallback backend.
    pub fn degraded() -> Self {
        Self {
            backend: Box::new(DegradedEngine),
            degraded: true,
        }
    }

    fn detect() -> Self {
        if std::env::var(FORCE_DEGRADED_ENV).is_ok_and(|v| v == "1") {
            warn!(target: "jiggen", "boolean engine forced into degraded mode");
            return Self::degraded();
        }
        if self_check() {
            debug!(target: "jiggen", "boolean engine self-check passed");
            Self::primary()
        } else {
            warn!(
                target: "jiggen",
                "boolean engine self-check failed, falling back to degraded mode"
            );
            Self::degraded()
        }
    }

    pub fn backend(&self) -> &dyn BoolGeom {
        self.backend.as_ref()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn name(&self) -> &'static str {
        self.backend.name()
    }
}

static ENGINE: OnceCell<Engine> = OnceCell::const_new();

/// The process-wide boolean engine, probed on first call and reused after.
pub async fn engine() -> &'static Engine {
    ENGINE.get_or_init(|| async { Engine::detect() }).await
}

/// Intersects two known-overlapping squares and checks the resulting area.
fn self_check() -> bool {
    let a = primitives::rect((0.0, 0.0), (10.0, 10.0));
    let b = primitives::rect((5.0, 5.0), (10.0, 10.0));
    let res = a.boolean(&b, BooleanOp::And);
    if matches!(res.result_info, BooleanResultInfo::InvalidInput) {
        return false;
    }
    let area: f64 = res.pos_plines.iter().map(|p| p.pline.area().abs()).sum();
    (area - 25.0).abs() <= 1e-6
}

fn is_real_loop(p: &Polyline<f64>) -> bool {
    p.is_closed() && p.vertex_count() >= 2
}

fn simplify(p: Polyline<f64>) -> Polyline<f64> {
    p.remove_redundant(1e-6).unwrap_or(p)
}

/// Maps an outward-positive delta onto cavalier's convention, where a
/// positive offset moves inward for counter-clockwise outlines.
fn signed_offset_for(pline: &Polyline<f64>, outward: f64) -> f64 {
    match pline.orientation() {
        PlineOrientation::CounterClockwise => -outward,
        PlineOrientation::Clockwise | PlineOrientation::Open => outward,
    }
}

/// Pairwise merge until no pair of outlines overlaps. Inputs are a few dozen
/// loops at most, so quadratic passes are fine.
fn union_set(mut plines: Vec<Polyline<f64>>) -> Vec<Polyline<f64>> {
    plines.retain(is_real_loop);
    plines = plines.into_iter().map(simplify).collect();

    'merge: loop {
        for i in 0..plines.len() {
            for j in (i + 1)..plines.len() {
                let res = plines[i].boolean(&plines[j], BooleanOp::Or);
                match res.result_info {
                    BooleanResultInfo::Disjoint | BooleanResultInfo::InvalidInput => {}
                    _ => {
                        let merged: Vec<Polyline<f64>> = res
                            .pos_plines
                            .into_iter()
                            .map(|p| simplify(p.pline))
                            .collect();
                        plines.swap_remove(j);
                        plines.swap_remove(i);
                        plines.extend(merged);
                        continue 'merge;
                    }
                }
            }
        }
        return plines;
    }
}
