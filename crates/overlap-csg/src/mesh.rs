//! Production evaluator backed by parry's triangle-mesh intersection

use crate::edges::intersection_edges;
use crate::evaluator::{BooleanEvaluator, Operation};
use glam::Vec3;
use overlap_core::{OverlapError, Result};
use overlap_scene::{EdgeSegment, EvaluatedMesh, Geometry, GeometryGroup, MeshNode};
use rapier3d::parry::math::{Isometry, Point, Real};
use rapier3d::parry::query::PointQuery;
use rapier3d::parry::shape::{TriMesh, TriMeshFlags};
use rapier3d::parry::transformation::intersect_meshes;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

/// Faces whose normals differ by less than this share smoothed vertex normals
const CREASE_COS: f32 = 0.866; // cos(30°)
const WELD_SCALE: f32 = 1e4;

/// Evaluates brushes with `parry3d` and reports triangle-triangle crossing edges
#[derive(Debug, Default)]
pub struct MeshEvaluator {
    edges: Vec<EdgeSegment>,
    evaluations: u64,
}

impl MeshEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed evaluations, for diagnostics
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }
}

/// A brush's triangles baked into world space
struct WorldSurface {
    triangles: Vec<[Vec3; 3]>,
}

impl WorldSurface {
    fn from_node(node: &MeshNode) -> Self {
        let m = node.world_matrix();
        let triangles = node
            .geometry
            .triangles()
            .map(|t| {
                [
                    m.transform_point3(t[0]),
                    m.transform_point3(t[1]),
                    m.transform_point3(t[2]),
                ]
            })
            .collect();
        Self { triangles }
    }

    fn to_trimesh(&self) -> Result<TriMesh> {
        let mut vertices = Vec::with_capacity(self.triangles.len() * 3);
        let mut indices = Vec::with_capacity(self.triangles.len());
        for tri in &self.triangles {
            let base = vertices.len() as u32;
            vertices.extend(tri.iter().map(|p| Point::new(p.x, p.y, p.z)));
            indices.push([base, base + 1, base + 2]);
        }
        if indices.is_empty() {
            return Err(OverlapError::Evaluation("brush has no triangles".into()));
        }

        let mut mesh = TriMesh::new(vertices, indices);
        mesh.set_flags(
            TriMeshFlags::MERGE_DUPLICATE_VERTICES
                | TriMeshFlags::DELETE_DEGENERATE_TRIANGLES
                | TriMeshFlags::HALF_EDGE_TOPOLOGY
                | TriMeshFlags::ORIENTED,
        )
        .map_err(|e| OverlapError::Evaluation(format!("brush topology: {e:?}")))?;
        Ok(mesh)
    }
}

fn distance_to(mesh: &TriMesh, p: &Point<Real>) -> f32 {
    let projection = mesh.project_local_point(p, false);
    (projection.point - p).norm()
}

fn quantize(p: Vec3) -> (i64, i64, i64) {
    (
        (p.x * WELD_SCALE).round() as i64,
        (p.y * WELD_SCALE).round() as i64,
        (p.z * WELD_SCALE).round() as i64,
    )
}

/// Intersect two world surfaces, splitting the result by source brush.
///
/// A panic inside parry's triangulation is returned as an evaluation error.
fn intersect_solids(
    surface_a: &WorldSurface,
    surface_b: &WorldSurface,
) -> Result<(Vec<[Vec3; 3]>, Vec<[Vec3; 3]>)> {
    let mesh_a = surface_a.to_trimesh()?;
    let mesh_b = surface_b.to_trimesh()?;
    let identity = Isometry::identity();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        intersect_meshes(&identity, &mesh_a, false, &identity, &mesh_b, false)
    }))
    .map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        OverlapError::Evaluation(format!("mesh intersection panicked: {reason}"))
    })?
    .map_err(|e| OverlapError::Evaluation(format!("mesh intersection failed: {e:?}")))?;

    let mut from_a = Vec::new();
    let mut from_b = Vec::new();
    if let Some(result) = result {
        let vertices = result.vertices();
        for idx in result.indices() {
            let pts = [
                vertices[idx[0] as usize],
                vertices[idx[1] as usize],
                vertices[idx[2] as usize],
            ];
            let centroid = Point::from((pts[0].coords + pts[1].coords + pts[2].coords) / 3.0);
            let tri = pts.map(|p| Vec3::new(p.x, p.y, p.z));

            if distance_to(&mesh_a, &centroid) <= distance_to(&mesh_b, &centroid) {
                from_a.push(tri);
            } else {
                from_b.push(tri);
            }
        }
    }

    sort_triangles(&mut from_a);
    sort_triangles(&mut from_b);
    Ok((from_a, from_b))
}

/// Put triangles in a canonical order independent of how parry emitted them.
///
/// Each triangle is rotated so its smallest vertex comes first, which keeps
/// the winding, then the list is sorted by vertex.
fn sort_triangles(triangles: &mut [[Vec3; 3]]) {
    for tri in triangles.iter_mut() {
        let first = (0..3).min_by_key(|&i| vertex_key(tri[i])).unwrap_or(0);
        tri.rotate_left(first);
    }
    triangles.sort_by(|x, y| triangle_key(x).cmp(&triangle_key(y)));
}

/// Quantized position, then exact bits to break ties between nearly equal points
fn vertex_key(p: Vec3) -> ((i64, i64, i64), [u32; 3]) {
    (quantize(p), p.to_array().map(f32::to_bits))
}

fn triangle_key(tri: &[Vec3; 3]) -> [((i64, i64, i64), [u32; 3]); 3] {
    tri.map(vertex_key)
}

/// Build grouped, smooth-shaded geometry from per-group triangle lists
fn assemble(groups: &[Vec<[Vec3; 3]>]) -> Geometry {
    let mut geometry = Geometry::new();

    for (group_index, triangles) in groups.iter().enumerate() {
        if triangles.is_empty() {
            continue;
        }

        let face_normals: Vec<Vec3> = triangles
            .iter()
            .map(|t| (t[1] - t[0]).cross(t[2] - t[0]).normalize_or_zero())
            .collect();

        let mut incident: HashMap<(i64, i64, i64), Vec<Vec3>> = HashMap::new();
        for (tri, n) in triangles.iter().zip(&face_normals) {
            for p in tri {
                incident.entry(quantize(*p)).or_default().push(*n);
            }
        }

        let start = geometry.indices.len() as u32;
        for (tri, n) in triangles.iter().zip(&face_normals) {
            for p in tri {
                let smoothed = incident
                    .get(&quantize(*p))
                    .map(|normals| {
                        normals
                            .iter()
                            .filter(|other| other.dot(*n) >= CREASE_COS)
                            .fold(Vec3::ZERO, |acc, other| acc + *other)
                    })
                    .and_then(|sum| sum.try_normalize())
                    .unwrap_or(*n);

                geometry.indices.push(geometry.positions.len() as u32);
                geometry.positions.push(*p);
                geometry.normals.push(smoothed);
            }
        }

        geometry.groups.push(GeometryGroup {
            start,
            count: geometry.indices.len() as u32 - start,
            material_index: group_index,
        });
    }

    geometry
}

impl BooleanEvaluator for MeshEvaluator {
    fn evaluate(
        &mut self,
        a: &MeshNode,
        b: &MeshNode,
        operation: Operation,
        out: &mut EvaluatedMesh,
    ) -> Result<()> {
        self.edges.clear();
        out.clear();
        out.materials = vec![a.material, b.material];

        let overlapping = match (a.world_bounds(), b.world_bounds()) {
            (Some(ba), Some(bb)) => ba.intersects(&bb),
            _ => false,
        };
        if !overlapping {
            self.evaluations += 1;
            return Ok(());
        }

        let surface_a = WorldSurface::from_node(a);
        let surface_b = WorldSurface::from_node(b);

        // Edges come from the surfaces alone, independent of the solid result
        self.edges = intersection_edges(&surface_a.triangles, &surface_b.triangles);

        let (from_a, from_b) = match intersect_solids(&surface_a, &surface_b) {
            Ok(groups) => groups,
            Err(e) => {
                log::warn!("Intersection solid unavailable, keeping crossing edges only: {}", e);
                (Vec::new(), Vec::new())
            }
        };

        let mut materials = Vec::with_capacity(2);
        if !from_a.is_empty() {
            materials.push(a.material);
        }
        if !from_b.is_empty() {
            materials.push(b.material);
        }
        out.geometry = assemble(&[from_a, from_b]);
        for (i, group) in out.geometry.groups.iter_mut().enumerate() {
            group.material_index = i;
        }
        out.materials = materials;
        self.evaluations += 1;

        log::debug!(
            "Evaluated {:?}: {} triangles in {} groups, {} intersection edges",
            operation,
            out.geometry.triangle_count(),
            out.geometry.groups.len(),
            self.edges.len()
        );
        Ok(())
    }

    fn intersection_edges(&self) -> &[EdgeSegment] {
        &self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlap_scene::Scene;

    fn scene_with_sphere_at(position: Vec3) -> Scene {
        let mut scene = Scene::default();
        scene.solids.sphere.brush.node.transform.position = position;
        scene.solids.box_solid.brush.node.transform.position = Vec3::new(0.0, 0.5, 0.0);
        scene
    }

    #[test]
    fn disjoint_brushes_produce_nothing() {
        let mut scene = scene_with_sphere_at(Vec3::new(-1.0, 2.0, 0.5));
        let mut evaluator = MeshEvaluator::new();
        let (box_brush, sphere_brush) = (
            scene.solids.box_solid.brush.clone(),
            scene.solids.sphere.brush.clone(),
        );
        evaluator
            .evaluate(&box_brush, &sphere_brush, Operation::Intersection, &mut scene.evaluated)
            .unwrap();
        assert!(evaluator.intersection_edges().is_empty());
        assert!(scene.evaluated.geometry.is_empty());
    }

    #[test]
    fn overlapping_brushes_report_edges_and_groups() {
        // Sphere poking through the top face of the box
        let center = Vec3::new(0.0, 1.2, 0.0);
        let mut scene = scene_with_sphere_at(center);
        let mut evaluator = MeshEvaluator::new();
        let (box_brush, sphere_brush) = (
            scene.solids.box_solid.brush.clone(),
            scene.solids.sphere.brush.clone(),
        );
        evaluator
            .evaluate(&box_brush, &sphere_brush, Operation::Intersection, &mut scene.evaluated)
            .unwrap();

        assert!(!evaluator.intersection_edges().is_empty());
        // Every crossing point lies on the box's top face and the sphere surface
        for edge in evaluator.intersection_edges() {
            assert!((edge.start.y - 1.0).abs() < 1e-3);
            assert!(((edge.start - center).length() - 0.5).abs() < 0.02);
        }
        assert_eq!(scene.evaluated.materials.len(), scene.evaluated.geometry.groups.len());
    }

    #[test]
    fn triangle_order_is_canonical() {
        let t1 = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO];
        let t2 = [Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 2.0), Vec3::new(0.0, 1.0, 2.0)];
        let mut forward = vec![t1, t2];
        let mut backward = vec![[t2[1], t2[2], t2[0]], t1];
        sort_triangles(&mut forward);
        sort_triangles(&mut backward);

        assert_eq!(forward, backward);
        // Rotation keeps the winding of the first triangle
        assert_eq!(forward[0], [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]);
    }

    #[test]
    fn repeated_evaluation_is_deterministic() {
        let mut scene = scene_with_sphere_at(Vec3::new(0.3, 1.2, 0.2));
        let mut evaluator = MeshEvaluator::new();
        let (box_brush, sphere_brush) = (
            scene.solids.box_solid.brush.clone(),
            scene.solids.sphere.brush.clone(),
        );
        evaluator
            .evaluate(&box_brush, &sphere_brush, Operation::Intersection, &mut scene.evaluated)
            .unwrap();
        let first_geometry = scene.evaluated.geometry.clone();
        let first_edges = evaluator.intersection_edges().to_vec();

        evaluator
            .evaluate(&box_brush, &sphere_brush, Operation::Intersection, &mut scene.evaluated)
            .unwrap();
        assert_eq!(scene.evaluated.geometry, first_geometry);
        assert_eq!(evaluator.intersection_edges(), first_edges.as_slice());
        assert_eq!(evaluator.evaluations(), 2);
    }
}
