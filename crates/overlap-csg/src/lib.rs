//! Overlap CSG - boolean evaluation of two brushes
//!
//! The editor treats evaluation as an injected strategy behind the
//! `BooleanEvaluator` trait. `MeshEvaluator` is the production
//! implementation: solid output comes from parry's mesh intersection and
//! the intersection edges from direct triangle-triangle tests.

mod edges;
mod evaluator;
mod mesh;

pub use edges::{intersection_edges, triangle_intersection};
pub use evaluator::{BooleanEvaluator, Operation};
pub use mesh::MeshEvaluator;
