//! Indexed triangle geometry and primitive builders (box, sphere)

use glam::{Mat4, Vec3};

/// Segments per box edge. The effective value of `round(lerp(1, 10, 1))`.
pub const BOX_SEGMENTS: u32 = 10;
/// Width and height segments of the sphere. The effective value of `lerp(5, 32, 1)`.
pub const SPHERE_SEGMENTS: u32 = 32;

/// A contiguous index range drawn with one material
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeometryGroup {
    /// First index (not triangle) of the range
    pub start: u32,
    /// Number of indices in the range
    pub count: u32,
    pub material_index: usize,
}

/// Indexed triangle mesh in local space
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    /// Material groups. Empty means the whole mesh uses material 0.
    pub groups: Vec<GeometryGroup>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
        self.groups.clear();
    }

    /// Iterate triangles as vertex position triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Local-space bounds, or None for an empty geometry
    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.positions.first()?;
        let mut aabb = Aabb::new(first, first);
        for p in &self.positions[1..] {
            aabb.min = aabb.min.min(*p);
            aabb.max = aabb.max.max(*p);
        }
        Some(aabb)
    }

    /// Axis-aligned box centered on the origin, each face split into a
    /// `segments` x `segments` grid. Faces are ordered +X, -X, +Y, -Y, +Z, -Z.
    pub fn cuboid(width: f32, height: f32, depth: f32, segments: u32) -> Self {
        let segments = segments.max(1);
        let mut geometry = Self::new();

        // (u, v, w, udir, vdir, plane width, plane height, signed depth)
        let planes: [(usize, usize, usize, f32, f32, f32, f32, f32); 6] = [
            (2, 1, 0, -1.0, -1.0, depth, height, width),
            (2, 1, 0, 1.0, -1.0, depth, height, -width),
            (0, 2, 1, 1.0, 1.0, width, depth, height),
            (0, 2, 1, 1.0, -1.0, width, depth, -height),
            (0, 1, 2, 1.0, -1.0, width, height, depth),
            (0, 1, 2, -1.0, -1.0, width, height, -depth),
        ];

        for (u, v, w, udir, vdir, plane_w, plane_h, plane_d) in planes {
            geometry.push_plane(u, v, w, udir, vdir, plane_w, plane_h, plane_d, segments, segments);
        }

        geometry
    }

    #[allow(clippy::too_many_arguments)]
    fn push_plane(
        &mut self,
        u: usize,
        v: usize,
        w: usize,
        udir: f32,
        vdir: f32,
        width: f32,
        height: f32,
        depth: f32,
        grid_x: u32,
        grid_y: u32,
    ) {
        let start = self.positions.len() as u32;
        let segment_w = width / grid_x as f32;
        let segment_h = height / grid_y as f32;
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let half_d = depth / 2.0;
        let grid_x1 = grid_x + 1;

        for iy in 0..=grid_y {
            let y = iy as f32 * segment_h - half_h;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_w - half_w;

                let mut position = Vec3::ZERO;
                position[u] = x * udir;
                position[v] = y * vdir;
                position[w] = half_d;

                let mut normal = Vec3::ZERO;
                normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };

                self.positions.push(position);
                self.normals.push(normal);
            }
        }

        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = start + ix + grid_x1 * iy;
                let b = start + ix + grid_x1 * (iy + 1);
                let c = start + (ix + 1) + grid_x1 * (iy + 1);
                let d = start + (ix + 1) + grid_x1 * iy;
                self.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
    }

    /// Latitude/longitude sphere centered on the origin
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let mut geometry = Self::new();
        let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let mut row = Vec::with_capacity(width_segments as usize + 1);
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * std::f32::consts::TAU;
                let theta = v * std::f32::consts::PI;

                let position = Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                row.push(geometry.positions.len() as u32);
                geometry.positions.push(position);
                geometry.normals.push(position.normalize_or_zero());
            }
            grid.push(row);
        }

        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                if iy != 0 {
                    geometry.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments as usize - 1 {
                    geometry.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        geometry
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounds of this box after transforming by `mat`
    pub fn transformed(&self, mat: &Mat4) -> Self {
        let translation = mat.w_axis.truncate();
        let mut new_min = translation;
        let mut new_max = translation;
        let cols = [mat.x_axis.truncate(), mat.y_axis.truncate(), mat.z_axis.truncate()];

        for (i, col) in cols.iter().enumerate() {
            let a = *col * self.min[i];
            let b = *col * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        Self {
            min: new_min,
            max: new_max,
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// Slab test. Returns the distance to the nearest hit in front of the origin.
    pub fn ray_intersect(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for i in 0..3 {
            if direction[i].abs() < 1e-8 {
                if origin[i] < self.min[i] || origin[i] > self.max[i] {
                    return None;
                }
            } else {
                let inv_d = 1.0 / direction[i];
                let mut t1 = (self.min[i] - origin[i]) * inv_d;
                let mut t2 = (self.max[i] - origin[i]) * inv_d;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                tmin = tmin.max(t1);
                tmax = tmax.min(t2);
                if tmin > tmax {
                    return None;
                }
            }
        }

        if tmax < 0.0 {
            None
        } else if tmin >= 0.0 {
            Some(tmin)
        } else {
            Some(tmax)
        }
    }
}
