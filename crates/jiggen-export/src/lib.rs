//! Output writers for cut documents.

pub mod svg;
