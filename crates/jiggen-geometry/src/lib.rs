//! Boolean geometry backends and polygon helpers for puzzle outlines.

pub mod convert;
pub mod engine;
pub mod polygon;
pub mod primitives;

pub use cavalier_contours::polyline::{BooleanOp, BooleanResultInfo, PlineVertex, Polyline};
pub use engine::{engine, BoolGeom, Engine, GeomError};
