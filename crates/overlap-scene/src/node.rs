//! Transformable scene nodes

use crate::geometry::{Aabb, Geometry};
use crate::material::MaterialId;
use glam::Mat4;
use overlap_core::Transform;
use std::sync::Arc;

/// A transform plus a visibility flag
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub transform: Transform,
    pub visible: bool,
}

impl SceneNode {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            visible: true,
        }
    }

    pub fn hidden(transform: Transform) -> Self {
        Self {
            transform,
            visible: false,
        }
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new(Transform::IDENTITY)
    }
}

/// A renderable mesh: node + shared local geometry + one material
#[derive(Clone, Debug)]
pub struct MeshNode {
    pub node: SceneNode,
    pub geometry: Arc<Geometry>,
    pub material: MaterialId,
}

impl MeshNode {
    pub fn new(geometry: Arc<Geometry>, material: MaterialId) -> Self {
        Self {
            node: SceneNode::default(),
            geometry,
            material,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.node.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.node.transform
    }

    pub fn is_visible(&self) -> bool {
        self.node.visible
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.node.world_matrix()
    }

    /// World-space bounds of the mesh at its current transform
    pub fn world_bounds(&self) -> Option<Aabb> {
        let local = self.geometry.bounds()?;
        Some(local.transformed(&self.world_matrix()))
    }
}
