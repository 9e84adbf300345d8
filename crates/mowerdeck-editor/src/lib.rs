//! # MowerDeck Editor
//!
//! The point-editor engine for boundary and route geometry:
//!
//! - [`model`] — point/line/label entities and their registry
//! - [`engine`] — selection, nudge/grow moves, commit protocol and
//!   per-cardinality capability enablement
//! - [`transform`] — pure device-pixel ↔ normalized ↔ metre conversions
//!   and the calibration-matrix mapping
//!
//! The engine operates entirely on plain data in the [0,10000]² normalized
//! square; rendering and networking live elsewhere.

pub mod engine;
pub mod model;
pub mod transform;

pub use engine::{PointEditor, PointInsertion};
pub use model::{parse_point_id, LabelEntity, LineEntity, PointEntity, PointId, PointSet};
pub use transform::Mat3;
