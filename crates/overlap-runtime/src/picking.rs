//! Pointer picking against transformable entities
//!
//! A ray through the pointer is tested against each solid's visual mesh
//! (bounding box first, then triangles) and against a small sphere around the
//! light. Brushes, the evaluated mesh and helpers are never candidates.

use glam::{Vec2, Vec3};
use overlap_core::{EntityKind, SolidKind};
use overlap_scene::{Camera, MeshNode, Ray, Scene};

/// Radius of the invisible pick sphere around the light
pub const LIGHT_PICK_RADIUS: f32 = 0.15;

/// Normalized device coordinates for a pointer position in viewport pixels
pub fn pointer_to_ndc(x: f32, y: f32, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new((x / viewport.x) * 2.0 - 1.0, -(y / viewport.y) * 2.0 + 1.0)
}

/// Möller-Trumbore ray/triangle test. Returns the hit distance.
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;
    let edge1 = b - a;
    let edge2 = c - a;
    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = inv_det * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    (t > EPSILON).then_some(t)
}

fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let t = if -b - sqrt > 0.0 { -b - sqrt } else { -b + sqrt };
    (t > 0.0).then_some(t)
}

/// Nearest hit distance against a mesh, ignoring its visibility
fn ray_mesh(ray: &Ray, mesh: &MeshNode) -> Option<f32> {
    let bounds = mesh.world_bounds()?;
    bounds.ray_intersect(ray.origin, ray.direction)?;

    let world = mesh.world_matrix();
    mesh.geometry
        .triangles()
        .filter_map(|t| {
            ray_triangle(
                ray,
                world.transform_point3(t[0]),
                world.transform_point3(t[1]),
                world.transform_point3(t[2]),
            )
        })
        .min_by(|a, b| a.total_cmp(b))
}

/// Nearest transformable entity along `ray`
pub fn pick(scene: &Scene, ray: &Ray) -> Option<(EntityKind, f32)> {
    let mut best: Option<(EntityKind, f32)> = None;
    let mut consider = |entity: EntityKind, dist: Option<f32>| {
        if let Some(dist) = dist {
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((entity, dist));
            }
        }
    };

    for kind in SolidKind::ALL {
        consider(kind.into(), ray_mesh(ray, &scene.solids.get(kind).visual));
    }
    consider(
        EntityKind::Light,
        ray_sphere(ray, scene.light.node.transform.position, LIGHT_PICK_RADIUS),
    );

    best
}

/// Pick at a pointer position given in viewport pixels
pub fn pick_at(scene: &Scene, camera: &Camera, x: f32, y: f32, viewport: Vec2) -> Option<EntityKind> {
    let ray = camera.ray_from_ndc(pointer_to_ndc(x, y, viewport));
    pick(scene, &ray).map(|(entity, _)| entity)
}
