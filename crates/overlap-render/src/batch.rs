//! CPU-side draw batches
//!
//! Every frame the visible scene is flattened into world-space vertex lists,
//! one per pipeline. Meshes here are small enough that re-uploading them each
//! frame is cheaper than tracking which buffers went stale.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use overlap_core::Color;
use overlap_scene::{Camera, EdgeSegment, Geometry, MaterialId, Scene, SceneNode};
use std::ops::Range;

const LIGHT_MARKER_RADIUS: f32 = 0.08;
const LIGHT_MARKER_SEGMENTS: u32 = 8;

/// A world-space vertex with normal and linear RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Vertex lists for one frame, one per pipeline
#[derive(Debug, Default)]
pub struct FrameBatches {
    /// Opaque lit triangles: visual meshes and the evaluated mesh
    pub lit: Vec<Vertex>,
    /// Premultiplied translucent triangles: brushes, far to near
    pub translucent: Vec<Vertex>,
    /// Unlit triangles: the light marker
    pub unlit: Vec<Vertex>,
    /// Depth-tested lines: the ground grid
    pub lines: Vec<Vertex>,
    /// Lines drawn over coplanar surfaces: intersection edges
    pub overlay_lines: Vec<Vertex>,
}

impl FrameBatches {
    pub fn collect(scene: &Scene, camera: &Camera) -> Self {
        let mut batches = Self::default();

        for (segment, color) in scene.grid.lines() {
            push_line(&mut batches.lines, &segment, to_linear(color));
        }

        for solid in scene.solids.iter() {
            let visual = &solid.visual;
            if visual.is_visible() {
                let color = material_color(scene, visual.material);
                let range = 0..visual.geometry.indices.len();
                push_mesh(&mut batches.lit, &visual.geometry, &visual.node, range, color);
            }
        }

        let evaluated = &scene.evaluated;
        if evaluated.is_shown() {
            for (range, material) in group_ranges(&evaluated.geometry, &evaluated.materials) {
                let color = material_color(scene, material);
                push_mesh(&mut batches.lit, &evaluated.geometry, &evaluated.node, range, color);
            }
        }

        let mut brushes: Vec<_> = scene
            .solids
            .iter()
            .map(|solid| &solid.brush)
            .filter(|brush| brush.is_visible())
            .collect();
        brushes.sort_by(|a, b| {
            let da = a.node.transform.position.distance_squared(camera.position);
            let db = b.node.transform.position.distance_squared(camera.position);
            db.total_cmp(&da)
        });
        for brush in brushes {
            let color = material_color(scene, brush.material);
            let range = 0..brush.geometry.indices.len();
            push_mesh(&mut batches.translucent, &brush.geometry, &brush.node, range, color);
        }

        if scene.edges.node.visible {
            let color = to_linear(scene.edges.color);
            for segment in scene.edges.world_edges() {
                push_line(&mut batches.overlay_lines, &segment, color);
            }
        }

        if scene.light.node.visible {
            let marker = Geometry::uv_sphere(
                LIGHT_MARKER_RADIUS,
                LIGHT_MARKER_SEGMENTS,
                LIGHT_MARKER_SEGMENTS,
            );
            let color = to_linear(scene.light.color);
            let range = 0..marker.indices.len();
            push_mesh(&mut batches.unlit, &marker, &scene.light.node, range, color);
        }

        batches
    }

    pub fn triangle_count(&self) -> usize {
        (self.lit.len() + self.translucent.len() + self.unlit.len()) / 3
    }
}

/// Index ranges per material. A geometry without groups is drawn whole with the first material.
fn group_ranges(geometry: &Geometry, materials: &[MaterialId]) -> Vec<(Range<usize>, MaterialId)> {
    if geometry.groups.is_empty() {
        return materials
            .first()
            .map(|&material| vec![(0..geometry.indices.len(), material)])
            .unwrap_or_default();
    }

    geometry
        .groups
        .iter()
        .filter_map(|group| {
            let material = *materials.get(group.material_index)?;
            let start = group.start as usize;
            let end = (start + group.count as usize).min(geometry.indices.len());
            Some((start..end, material))
        })
        .collect()
}

fn push_mesh(
    out: &mut Vec<Vertex>,
    geometry: &Geometry,
    node: &SceneNode,
    range: Range<usize>,
    color: [f32; 4],
) {
    let model = node.world_matrix();
    let normal_matrix = normal_matrix(&model);
    let Some(indices) = geometry.indices.get(range) else {
        return;
    };

    out.reserve(indices.len());
    for &index in indices {
        let i = index as usize;
        let (Some(&position), normal) = (geometry.positions.get(i), geometry.normals.get(i)) else {
            continue;
        };
        let normal = normal.copied().unwrap_or(Vec3::Y);
        out.push(Vertex {
            position: model.transform_point3(position).to_array(),
            normal: (normal_matrix * normal).normalize_or_zero().to_array(),
            color,
        });
    }
}

fn push_line(out: &mut Vec<Vertex>, segment: &EdgeSegment, color: [f32; 4]) {
    for point in [segment.start, segment.end] {
        out.push(Vertex {
            position: point.to_array(),
            normal: [0.0; 3],
            color,
        });
    }
}

fn normal_matrix(model: &Mat4) -> Mat3 {
    Mat3::from_mat4(*model).inverse().transpose()
}

/// Linear color of a material, premultiplied when the material asks for it
fn material_color(scene: &Scene, id: MaterialId) -> [f32; 4] {
    let Some(material) = scene.materials.get(id) else {
        log::warn!("Drawing with unknown material {:?}", id);
        return [1.0, 0.0, 1.0, 1.0];
    };

    let mut color = to_linear(material.color);
    let alpha = if material.transparent { material.opacity } else { 1.0 };
    color[3] = alpha;
    if material.premultiplied_alpha {
        for channel in &mut color[..3] {
            *channel *= alpha;
        }
    }
    color
}

pub(crate) fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub(crate) fn to_linear(color: Color) -> [f32; 4] {
    [
        srgb_channel_to_linear(color.r),
        srgb_channel_to_linear(color.g),
        srgb_channel_to_linear(color.b),
        color.a,
    ]
}
