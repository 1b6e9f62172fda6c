//! Editable solids and lights

use crate::geometry::Geometry;
use crate::material::MaterialId;
use crate::node::{MeshNode, SceneNode};
use overlap_core::{Color, SolidKind, Transform};
use std::sync::Arc;

/// One of the two user-editable solids.
///
/// The visual mesh is what the user manipulates and sees when nothing
/// overlaps. The brush is the proxy handed to the boolean evaluator and is
/// drawn translucently while an intersection exists. Both are built from
/// the same geometry.
#[derive(Clone, Debug)]
pub struct EditableSolid {
    pub kind: SolidKind,
    pub visual: MeshNode,
    pub brush: MeshNode,
    pub enabled: bool,
}

impl EditableSolid {
    /// Build both representations from one geometry. The brush starts hidden.
    pub fn new(
        kind: SolidKind,
        geometry: Geometry,
        visual_material: MaterialId,
        brush_material: MaterialId,
    ) -> Self {
        let geometry = Arc::new(geometry);
        let visual = MeshNode::new(Arc::clone(&geometry), visual_material);
        let mut brush = MeshNode::new(geometry, brush_material);
        brush.node.visible = false;

        Self {
            kind,
            visual,
            brush,
            enabled: true,
        }
    }

    pub fn with_position(mut self, position: glam::Vec3) -> Self {
        self.visual.node.transform.position = position;
        self
    }

    /// Show the brush (`true`) or the visual mesh (`false`). A disabled solid shows neither.
    pub fn set_brush_visible(&mut self, show_brush: bool) {
        self.brush.node.visible = self.enabled && show_brush;
        self.visual.node.visible = self.enabled && !show_brush;
    }

    pub fn shares_geometry(&self) -> bool {
        Arc::ptr_eq(&self.visual.geometry, &self.brush.geometry)
    }

    pub fn transforms_match(&self) -> bool {
        self.visual.node.transform == self.brush.node.transform
    }
}

/// The box and the sphere
#[derive(Clone, Debug)]
pub struct SolidPair {
    pub box_solid: EditableSolid,
    pub sphere: EditableSolid,
}

impl SolidPair {
    pub fn get(&self, kind: SolidKind) -> &EditableSolid {
        match kind {
            SolidKind::Box => &self.box_solid,
            SolidKind::Sphere => &self.sphere,
        }
    }

    pub fn get_mut(&mut self, kind: SolidKind) -> &mut EditableSolid {
        match kind {
            SolidKind::Box => &mut self.box_solid,
            SolidKind::Sphere => &mut self.sphere,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditableSolid> {
        [&self.box_solid, &self.sphere].into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EditableSolid> {
        [&mut self.box_solid, &mut self.sphere].into_iter()
    }

    pub fn both_enabled(&self) -> bool {
        self.box_solid.enabled && self.sphere.enabled
    }
}

/// The selectable point light
#[derive(Clone, Debug)]
pub struct LightSource {
    pub node: SceneNode,
    pub color: Color,
    pub intensity: f32,
    pub enabled: bool,
}

impl LightSource {
    pub fn point(color: Color, intensity: f32, transform: Transform) -> Self {
        Self {
            node: SceneNode::new(transform),
            color,
            intensity,
            enabled: true,
        }
    }

    /// Mirror the enabled flag onto the node's visibility
    pub fn apply_enabled(&mut self) {
        self.node.visible = self.enabled;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}
