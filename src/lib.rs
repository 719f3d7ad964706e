//! Deterministic jigsaw puzzle generator for laser cutting.
//!
//! A seeded configuration goes through edge drawing, piece assembly, template
//! clipping, kerf compensation and sheet layout, and comes out as SVG cut
//! documents plus JSON diagnostics. The same `(seed, config)` pair produces
//! byte-identical output on every platform.

pub mod diagnostics;
pub mod error;
pub mod pipeline;
pub mod render;

pub use diagnostics::Diagnostics;
pub use error::CliError;
pub use pipeline::{generate, PuzzleOutput};
