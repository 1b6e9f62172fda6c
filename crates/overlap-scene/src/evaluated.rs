//! Derived scene content: the evaluated mesh, the intersection edge overlay, and the grid

use crate::geometry::Geometry;
use crate::material::MaterialId;
use crate::node::SceneNode;
use glam::Vec3;
use overlap_core::Color;

/// A line segment between two points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSegment {
    pub start: Vec3,
    pub end: Vec3,
}

impl EdgeSegment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// Mesh produced by the boolean evaluator. Never authored directly.
///
/// `materials[i]` is the material of `geometry.groups[i]`.
#[derive(Clone, Debug)]
pub struct EvaluatedMesh {
    pub node: SceneNode,
    pub geometry: Geometry,
    pub materials: Vec<MaterialId>,
}

impl EvaluatedMesh {
    pub fn new(default_material: MaterialId) -> Self {
        Self {
            node: SceneNode::default(),
            geometry: Geometry::new(),
            materials: vec![default_material],
        }
    }

    /// Whether anything would actually be drawn
    pub fn is_shown(&self) -> bool {
        self.node.visible && !self.geometry.is_empty()
    }

    /// Drop the geometry, keeping the current materials
    pub fn clear(&mut self) {
        self.geometry.clear();
    }
}

/// Line overlay showing where the two solids' surfaces cross.
///
/// Its node follows the box's visual transform. Edges are stored in that
/// local frame, so `world_edges` reproduces what the evaluator reported.
#[derive(Clone, Debug)]
pub struct EdgesHelper {
    pub node: SceneNode,
    pub color: Color,
    edges: Vec<EdgeSegment>,
}

impl EdgesHelper {
    pub fn new(color: Color) -> Self {
        Self {
            node: SceneNode::default(),
            color,
            edges: Vec::new(),
        }
    }

    /// Replace the overlay with world-space `edges`
    pub fn set_edges(&mut self, edges: &[EdgeSegment]) {
        let to_local = self.node.world_matrix().inverse();
        self.edges = edges
            .iter()
            .map(|e| {
                EdgeSegment::new(
                    to_local.transform_point3(e.start),
                    to_local.transform_point3(e.end),
                )
            })
            .collect();
    }

    /// Edges in the helper's local frame
    pub fn edges(&self) -> &[EdgeSegment] {
        &self.edges
    }

    pub fn world_edges(&self) -> Vec<EdgeSegment> {
        let to_world = self.node.world_matrix();
        self.edges
            .iter()
            .map(|e| {
                EdgeSegment::new(
                    to_world.transform_point3(e.start),
                    to_world.transform_point3(e.end),
                )
            })
            .collect()
    }
}

/// Ground-plane grid on y = 0
#[derive(Clone, Copy, Debug)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color,
    pub line_color: Color,
}

impl GridHelper {
    pub fn new(size: f32, divisions: u32, center_color: Color, line_color: Color) -> Self {
        Self {
            size,
            divisions: divisions.max(1),
            center_color,
            line_color,
        }
    }

    /// Grid lines as (segment, color). The two lines through the origin use `center_color`.
    pub fn lines(&self) -> Vec<(EdgeSegment, Color)> {
        let half = self.size / 2.0;
        let step = self.size / self.divisions as f32;
        let center = self.divisions / 2;
        let mut lines = Vec::with_capacity((self.divisions as usize + 1) * 2);

        for i in 0..=self.divisions {
            let k = -half + i as f32 * step;
            let color = if i == center {
                self.center_color
            } else {
                self.line_color
            };
            lines.push((
                EdgeSegment::new(Vec3::new(-half, 0.0, k), Vec3::new(half, 0.0, k)),
                color,
            ));
            lines.push((
                EdgeSegment::new(Vec3::new(k, 0.0, -half), Vec3::new(k, 0.0, half)),
                color,
            ));
        }

        lines
    }
}
