//! Core types for puzzle generation: seeded RNG, curve paths, configuration.

pub mod config;
pub mod path;
pub mod rng;
pub mod warn;

pub use config::{
    ConfigError, KnobSpec, KnobStyle, LayoutMode, LayoutSpec, NestStrategy, PuzzleConfig,
    RotationSet, SheetSpec, TemplateShape,
};
pub use path::{Aabb, Affine, PathSeg, PiecePath, Vec2};
pub use rng::{sub_seed, SeedStream};
pub use warn::Warnings;
