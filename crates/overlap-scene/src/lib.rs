//! Overlap Scene - the editable scene graph
//!
//! Holds the two editable solids (each a visual mesh plus a boolean brush
//! sharing one geometry), the point light, the derived evaluated mesh, the
//! intersection edge helper, materials, and the perspective camera.

mod camera;
mod evaluated;
mod geometry;
mod material;
mod node;
mod scene;
mod solid;

pub use camera::{Camera, OrbitControls, Ray};
pub use evaluated::{EdgeSegment, EdgesHelper, EvaluatedMesh, GridHelper};
pub use geometry::{Aabb, Geometry, GeometryGroup, BOX_SEGMENTS, SPHERE_SEGMENTS};
pub use material::{
    Material, MaterialId, MaterialKind, MaterialLibrary, MaterialMap, PolygonOffset, Side,
};
pub use node::{MeshNode, SceneNode};
pub use scene::{Scene, SceneOptions};
pub use solid::{AmbientLight, EditableSolid, LightSource, SolidPair};
