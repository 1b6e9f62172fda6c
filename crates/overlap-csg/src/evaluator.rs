//! The boolean evaluation seam

use overlap_core::Result;
use overlap_scene::{EdgeSegment, EvaluatedMesh, MeshNode};

/// Boolean operator applied to brush A and brush B
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Volume inside both brushes
    Intersection,
}

/// Combines two closed brushes into one mesh.
///
/// On success `out.geometry` holds the world-space result partitioned into
/// groups and `out.materials[i]` is the brush material that produced group
/// `i`. Implementations must be deterministic: identical inputs yield
/// identical geometry and edges.
pub trait BooleanEvaluator {
    fn evaluate(
        &mut self,
        a: &MeshNode,
        b: &MeshNode,
        operation: Operation,
        out: &mut EvaluatedMesh,
    ) -> Result<()>;

    /// World-space segments where the two brush surfaces cross, from the last evaluation
    fn intersection_edges(&self) -> &[EdgeSegment];
}
