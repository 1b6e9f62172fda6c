//! Perspective camera with orbit controls

use glam::{Mat4, Vec2, Vec3, Vec4};

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A perspective camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Width / height
    pub aspect: f32,

    // Orbit state
    pub distance: f32,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(1.0, 2.5, 4.0), Vec3::ZERO, 75.0, 0.1, 100.0)
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the camera at `position` looking at `target`, deriving the orbit state
    pub fn looking_at(position: Vec3, target: Vec3, fov: f32, near: f32, far: f32) -> Self {
        let offset = position - target;
        let distance = offset.length().max(1e-3);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);

        Self {
            position,
            target,
            up: Vec3::Y,
            fov,
            near,
            far,
            aspect: 16.0 / 9.0,
            distance,
            yaw,
            pitch,
        }
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Update position based on orbit parameters
    pub fn update_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.position = self.target + Vec3::new(x, y, z);
    }

    pub fn orbit_horizontal(&mut self, delta: f32) {
        self.yaw += delta;
        self.update_orbit();
    }

    pub fn orbit_vertical(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-1.56, 1.56);
        self.update_orbit();
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(0.5, self.far * 0.5);
        self.update_orbit();
    }

    /// Move the target (and camera) in the view plane
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        self.target += right * dx + up * dy;
        self.update_orbit();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Perspective projection with a [0, 1] depth range
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn inverse_view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix().inverse()
    }

    /// Ray through a normalized device coordinate (x, y in [-1, 1], y up)
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv_vp = self.inverse_view_projection_matrix();
        let near = inv_vp * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv_vp * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        let direction = (far - near).try_normalize().unwrap_or(Vec3::NEG_Z);
        Ray {
            origin: near,
            direction,
        }
    }

    /// Project a world point to NDC. None when behind the camera.
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection_matrix() * point.extend(1.0);
        if clip.w <= 1e-3 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }
}

/// Pointer-driven orbit/pan/zoom. Disabled while the transform widget drags.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enabled: bool,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate_speed: 0.01,
            pan_speed: 0.005,
            zoom_speed: 0.5,
        }
    }
}

impl OrbitControls {
    pub fn rotate(&self, camera: &mut Camera, dx: f32, dy: f32) {
        if self.enabled {
            camera.orbit_horizontal(-dx * self.rotate_speed);
            camera.orbit_vertical(dy * self.rotate_speed);
        }
    }

    pub fn pan(&self, camera: &mut Camera, dx: f32, dy: f32) {
        if self.enabled {
            let scale = self.pan_speed * camera.distance;
            camera.pan(-dx * scale, dy * scale);
        }
    }

    pub fn zoom(&self, camera: &mut Camera, scroll: f32) {
        if self.enabled {
            camera.zoom(scroll * self.zoom_speed);
        }
    }
}
