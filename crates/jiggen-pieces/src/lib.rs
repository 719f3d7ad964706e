//! Piece geometry: knob curves, the shared edge map, assembly into closed
//! outlines, template clipping and kerf compensation.

pub mod assemble;
pub mod clip;
pub mod edges;
pub mod knob;
pub mod offset;
pub mod template;

pub use assemble::{assemble_pieces, piece_id, Piece, JOINT_EPS};
pub use clip::{apply_cutout, clip_to_template};
pub use edges::{Edge, EdgeKey, EdgeMap, Orientation, Traversal};
pub use offset::compensate;
pub use template::{cutout_outline, panel_outline, Template};
