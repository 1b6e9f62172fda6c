//! Projection math shared by the gizmo overlay: world-to-screen, pointer
//! rays, and the ray queries used to pick and drag handles.

use glam::{Vec2, Vec3};
use overlap_runtime::pointer_to_ndc;
use overlap_scene::{Camera, Ray};

/// Project a world-space point to screen pixels. None if behind the camera.
pub fn world_to_screen(camera: &Camera, screen_size: Vec2, pos: Vec3) -> Option<egui::Pos2> {
    let clip = camera.view_projection_matrix() * pos.extend(1.0);
    if clip.w <= 0.001 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(egui::pos2(
        (ndc.x + 1.0) * 0.5 * screen_size.x,
        (1.0 - ndc.y) * 0.5 * screen_size.y,
    ))
}

/// World-space ray through a screen pixel
pub fn screen_to_world_ray(camera: &Camera, screen_size: Vec2, sx: f32, sy: f32) -> Ray {
    camera.ray_from_ndc(pointer_to_ndc(sx, sy, screen_size))
}

/// View-space depth of a point, larger is farther
pub fn point_depth(camera: &Camera, pos: Vec3) -> f32 {
    -camera.view_matrix().transform_point3(pos).z
}

pub fn ray_point_distance(ray: &Ray, point: Vec3) -> f32 {
    let t = (point - ray.origin).dot(ray.direction).max(0.0);
    ray.at(t).distance(point)
}

/// Closest distance between a ray and the segment `a`-`b`
pub fn ray_segment_distance(ray: &Ray, a: Vec3, b: Vec3) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < 1e-12 {
        return ray_point_distance(ray, a);
    }

    let w = ray.origin - a;
    let d = ray.direction;
    let b_dot = d.dot(seg);
    let denom = len_sq - b_dot * b_dot;

    // Segment parameter of the closest approach between the two lines
    let s = if denom.abs() < 1e-9 {
        0.0
    } else {
        ((seg.dot(w) - b_dot * d.dot(w)) / denom).clamp(0.0, 1.0)
    };
    ray_point_distance(ray, a + seg * s)
}

/// Intersect a ray with the plane through `point` with `normal`
pub fn ray_plane_intersect(ray: &Ray, normal: Vec3, point: Vec3) -> Option<Vec3> {
    let denom = normal.dot(ray.direction);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = normal.dot(point - ray.origin) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray.at(t))
}
