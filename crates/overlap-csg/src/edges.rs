//! Triangle-triangle intersection segments between two surfaces

use glam::Vec3;
use overlap_scene::{Aabb, EdgeSegment};

const EPSILON: f32 = 1e-6;

/// Segment where `tri` crosses the plane `n . p = d`
fn plane_crossing(tri: &[Vec3; 3], normal: Vec3, d: f32) -> Option<(Vec3, Vec3)> {
    let mut dist = [0.0f32; 3];
    for (i, p) in tri.iter().enumerate() {
        let s = normal.dot(*p) - d;
        dist[i] = if s.abs() < EPSILON { 0.0 } else { s };
    }

    if dist.iter().all(|s| *s > 0.0) || dist.iter().all(|s| *s < 0.0) {
        return None;
    }
    // Coplanar contact leaves no crossing line
    if dist.iter().all(|s| *s == 0.0) {
        return None;
    }

    let mut points: Vec<Vec3> = Vec::with_capacity(3);
    for i in 0..3 {
        if dist[i] == 0.0 {
            points.push(tri[i]);
        }
    }
    for (i, j) in [(0, 1), (1, 2), (2, 0)] {
        if dist[i] * dist[j] < 0.0 {
            let t = dist[i] / (dist[i] - dist[j]);
            points.push(tri[i] + (tri[j] - tri[i]) * t);
        }
    }

    if points.len() < 2 {
        return None;
    }
    Some((points[0], points[1]))
}

fn triangle_plane(tri: &[Vec3; 3]) -> Option<(Vec3, f32)> {
    let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]).try_normalize()?;
    Some((normal, normal.dot(tri[0])))
}

/// Intersection segment of two triangles, if they cross along a line
pub fn triangle_intersection(t1: &[Vec3; 3], t2: &[Vec3; 3]) -> Option<EdgeSegment> {
    let (n1, d1) = triangle_plane(t1)?;
    let (n2, d2) = triangle_plane(t2)?;

    let line = n1.cross(n2);
    if line.length_squared() < EPSILON * EPSILON {
        return None;
    }

    let (a0, a1) = plane_crossing(t1, n2, d2)?;
    let (b0, b1) = plane_crossing(t2, n1, d1)?;

    let (sa0, sa1) = (line.dot(a0), line.dot(a1));
    let (sb0, sb1) = (line.dot(b0), line.dot(b1));
    let lo = sa0.min(sa1).max(sb0.min(sb1));
    let hi = sa0.max(sa1).min(sb0.max(sb1));
    if hi - lo <= EPSILON {
        return None;
    }

    // Interpolate along whichever crossing is not degenerate
    let (p0, p1, s0, s1) = if (sa1 - sa0).abs() > EPSILON {
        (a0, a1, sa0, sa1)
    } else {
        (b0, b1, sb0, sb1)
    };
    let at = |s: f32| p0 + (p1 - p0) * ((s - s0) / (s1 - s0));

    Some(EdgeSegment::new(at(lo), at(hi)))
}

fn triangle_bounds(tri: &[Vec3; 3]) -> Aabb {
    Aabb::new(
        tri[0].min(tri[1]).min(tri[2]),
        tri[0].max(tri[1]).max(tri[2]),
    )
}

fn surface_bounds(tris: &[[Vec3; 3]]) -> Option<Aabb> {
    let mut iter = tris.iter().map(triangle_bounds);
    let first = iter.next()?;
    Some(iter.fold(first, |acc, b| Aabb::new(acc.min.min(b.min), acc.max.max(b.max))))
}

/// All segments where surface `a` crosses surface `b`, in input order
pub fn intersection_edges(a: &[[Vec3; 3]], b: &[[Vec3; 3]]) -> Vec<EdgeSegment> {
    let (Some(bounds_a), Some(bounds_b)) = (surface_bounds(a), surface_bounds(b)) else {
        return Vec::new();
    };
    if !bounds_a.intersects(&bounds_b) {
        return Vec::new();
    }

    let overlap = Aabb::new(bounds_a.min.max(bounds_b.min), bounds_a.max.min(bounds_b.max));
    let near = |tris: &[[Vec3; 3]]| -> Vec<([Vec3; 3], Aabb)> {
        tris.iter()
            .map(|t| (*t, triangle_bounds(t)))
            .filter(|(_, bb)| bb.intersects(&overlap))
            .collect()
    };
    let near_a = near(a);
    let near_b = near(b);

    let mut edges = Vec::new();
    for (ta, ba) in &near_a {
        for (tb, bb) in &near_b {
            if !ba.intersects(bb) {
                continue;
            }
            if let Some(edge) = triangle_intersection(ta, tb) {
                edges.push(edge);
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn crossing_triangles_meet_along_a_segment() {
        // Horizontal triangle in y = 0, vertical triangle in x = 0.2
        let flat = [
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let wall = [
            Vec3::new(0.2, -1.0, -0.5),
            Vec3::new(0.2, 1.0, -0.5),
            Vec3::new(0.2, 0.0, 0.5),
        ];
        let edge = triangle_intersection(&flat, &wall).unwrap();
        assert_relative_eq!(edge.start.x, 0.2, epsilon = 1e-5);
        assert_relative_eq!(edge.end.x, 0.2, epsilon = 1e-5);
        assert_relative_eq!(edge.start.y, 0.0, epsilon = 1e-5);
        assert!(edge.length() > 0.1);
    }

    #[test]
    fn separated_triangles_do_not_intersect() {
        let low = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let high = [
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(0.0, 2.0, 1.0),
        ];
        assert!(triangle_intersection(&low, &high).is_none());
    }

    #[test]
    fn coplanar_triangles_report_nothing() {
        let a = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let b = [Vec3::new(0.2, 0.0, 0.2), Vec3::new(1.2, 0.0, 0.2), Vec3::new(0.2, 0.0, 1.2)];
        assert!(triangle_intersection(&a, &b).is_none());
    }

    #[test]
    fn disjoint_surfaces_short_circuit() {
        let a = [[Vec3::ZERO, Vec3::X, Vec3::Z]];
        let b = [[
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
            Vec3::new(5.0, 1.0, 0.0),
        ]];
        assert!(intersection_edges(&a, &b).is_empty());
        assert!(intersection_edges(&[], &b).is_empty());
    }
}
