//! Transform gizmo drawn as an egui overlay.
//!
//! Translate shows axis arrows and plane handles, rotate shows one ring per
//! axis, scale shows axis handles with square tips and a uniform center
//! handle. Dragging a handle produces cumulative [`WidgetDrag`] values
//! measured from where the drag started.

use crate::projection::*;
use glam::{Quat, Vec2, Vec3};
use overlap_core::{Transform, TransformMode, TransformSpace};
use overlap_runtime::WidgetDrag;
use overlap_scene::{Camera, Ray};

const X_COLOR: egui::Color32 = egui::Color32::from_rgb(214, 67, 67);
const Y_COLOR: egui::Color32 = egui::Color32::from_rgb(67, 172, 67);
const Z_COLOR: egui::Color32 = egui::Color32::from_rgb(67, 118, 214);
const X_BRIGHT: egui::Color32 = egui::Color32::from_rgb(255, 100, 100);
const Y_BRIGHT: egui::Color32 = egui::Color32::from_rgb(100, 230, 100);
const Z_BRIGHT: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);
const PLANE_ALPHA: u8 = 60;
const PLANE_HOVER_ALPHA: u8 = 120;
const DIM_ALPHA: f32 = 0.25;

/// Handle length as a fraction of the camera's orbit distance, before the configured size
const SCREEN_FRACTION: f32 = 0.12;
const RING_SEGMENTS: usize = 48;
const MIN_SCALE_FACTOR: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// The two axes spanning the plane perpendicular to this one
    fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }

    fn colors(self) -> (egui::Color32, egui::Color32) {
        match self {
            Axis::X => (X_COLOR, X_BRIGHT),
            Axis::Y => (Y_COLOR, Y_BRIGHT),
            Axis::Z => (Z_COLOR, Z_BRIGHT),
        }
    }
}

/// Part of the gizmo under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoHandle {
    /// Arrow, ring or scale handle of one axis, depending on mode
    Axis(Axis),
    /// Translate plane handle, named by the plane's normal
    Plane(Axis),
    /// Uniform scale handle at the center
    Uniform,
}

/// Where and how the gizmo is drawn for the attached entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoFrame {
    pub origin: Vec3,
    /// Orientation of the handle axes. Identity in world space.
    pub rotation: Quat,
    pub mode: TransformMode,
    pub space: TransformSpace,
}

impl GizmoFrame {
    /// Scale handles always follow the entity's own axes
    pub fn new(transform: &Transform, mode: TransformMode, space: TransformSpace) -> Self {
        let local = space == TransformSpace::Local || mode == TransformMode::Scale;
        Self {
            origin: transform.position,
            rotation: if local {
                transform.quaternion()
            } else {
                Quat::IDENTITY
            },
            mode,
            space,
        }
    }

    pub fn axis_dir(&self, axis: Axis) -> Vec3 {
        self.rotation * axis.unit()
    }
}

pub fn handle_length(camera: &Camera, size: f32) -> f32 {
    camera.distance * SCREEN_FRACTION * size
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    handle: GizmoHandle,
    frame: GizmoFrame,
    plane_normal: Vec3,
    start_hit: Vec3,
    length: f32,
}

#[derive(Debug, Default)]
pub struct TransformGizmo {
    pub hovered: Option<GizmoHandle>,
    drag: Option<DragState>,
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn active(&self) -> Option<GizmoHandle> {
        self.drag.map(|d| d.handle)
    }

    /// Which handle, if any, is under the pointer
    pub fn pick(
        &self,
        camera: &Camera,
        screen: Vec2,
        mx: f32,
        my: f32,
        frame: &GizmoFrame,
        size: f32,
    ) -> Option<GizmoHandle> {
        let ray = screen_to_world_ray(camera, screen, mx, my);
        let length = handle_length(camera, size);
        let axis_threshold = camera.distance * 0.015;
        let plane_threshold = camera.distance * 0.02;

        match frame.mode {
            TransformMode::Translate => {
                for axis in Axis::ALL {
                    let center = plane_handle_center(frame, axis, length);
                    if ray_point_distance(&ray, center) < plane_threshold {
                        return Some(GizmoHandle::Plane(axis));
                    }
                }
                pick_axis(&ray, frame, length, axis_threshold)
            }
            TransformMode::Rotate => {
                let mut best: Option<(Axis, f32)> = None;
                for axis in Axis::ALL {
                    let normal = frame.axis_dir(axis);
                    let Some(hit) = ray_plane_intersect(&ray, normal, frame.origin) else {
                        continue;
                    };
                    let off_ring = (hit.distance(frame.origin) - length).abs();
                    if off_ring < axis_threshold && best.map_or(true, |(_, d)| off_ring < d) {
                        best = Some((axis, off_ring));
                    }
                }
                best.map(|(axis, _)| GizmoHandle::Axis(axis))
            }
            TransformMode::Scale => {
                if ray_point_distance(&ray, frame.origin) < plane_threshold {
                    return Some(GizmoHandle::Uniform);
                }
                pick_axis(&ray, frame, length, axis_threshold)
            }
        }
    }

    pub fn update_hover(
        &mut self,
        camera: &Camera,
        screen: Vec2,
        mx: f32,
        my: f32,
        frame: &GizmoFrame,
        size: f32,
    ) {
        if self.drag.is_none() {
            self.hovered = self.pick(camera, screen, mx, my, frame, size);
        }
    }

    /// Start dragging `handle`. Fails when the pointer ray misses the drag plane.
    #[allow(clippy::too_many_arguments)]
    pub fn begin_drag(
        &mut self,
        handle: GizmoHandle,
        camera: &Camera,
        screen: Vec2,
        mx: f32,
        my: f32,
        frame: &GizmoFrame,
        size: f32,
    ) -> bool {
        let plane_normal = drag_plane_normal(handle, frame, camera);
        let ray = screen_to_world_ray(camera, screen, mx, my);
        let Some(start_hit) = ray_plane_intersect(&ray, plane_normal, frame.origin) else {
            return false;
        };

        self.drag = Some(DragState {
            handle,
            frame: *frame,
            plane_normal,
            start_hit,
            length: handle_length(camera, size),
        });
        true
    }

    /// Drag value for the current pointer position, relative to the drag start
    pub fn drag(&self, camera: &Camera, screen: Vec2, mx: f32, my: f32) -> Option<WidgetDrag> {
        let state = self.drag?;
        let frame = &state.frame;
        let ray = screen_to_world_ray(camera, screen, mx, my);
        let hit = ray_plane_intersect(&ray, state.plane_normal, frame.origin)?;
        let delta = hit - state.start_hit;

        match (frame.mode, state.handle) {
            (TransformMode::Translate, handle) => {
                let moved = match handle {
                    GizmoHandle::Axis(axis) => {
                        let dir = frame.axis_dir(axis);
                        dir * delta.dot(dir)
                    }
                    GizmoHandle::Plane(axis) => {
                        let normal = frame.axis_dir(axis);
                        delta - normal * delta.dot(normal)
                    }
                    GizmoHandle::Uniform => delta,
                };
                let offset = match frame.space {
                    TransformSpace::World => moved,
                    TransformSpace::Local => frame.rotation.inverse() * moved,
                };
                Some(WidgetDrag::Translate(offset))
            }
            (TransformMode::Rotate, GizmoHandle::Axis(axis)) => {
                let normal = state.plane_normal;
                let from = state.start_hit - frame.origin;
                let to = hit - frame.origin;
                let angle = normal.dot(from.cross(to)).atan2(from.dot(to));
                Some(WidgetDrag::Rotate {
                    axis: axis.unit(),
                    angle,
                })
            }
            (TransformMode::Scale, GizmoHandle::Axis(axis)) => {
                let amount = delta.dot(frame.axis_dir(axis)) / state.length;
                let mut factor = Vec3::ONE;
                factor[axis as usize] = (1.0 + amount).max(MIN_SCALE_FACTOR);
                Some(WidgetDrag::Scale(factor))
            }
            (TransformMode::Scale, GizmoHandle::Uniform) => {
                let grown = hit.distance(frame.origin) - state.start_hit.distance(frame.origin);
                let factor = (1.0 + grown / state.length).max(MIN_SCALE_FACTOR);
                Some(WidgetDrag::Scale(Vec3::splat(factor)))
            }
            _ => None,
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn draw_overlay(
        &self,
        painter: &egui::Painter,
        camera: &Camera,
        screen: Vec2,
        frame: &GizmoFrame,
        size: f32,
    ) {
        let Some(center) = world_to_screen(camera, screen, frame.origin) else {
            return;
        };
        let length = handle_length(camera, size);

        match frame.mode {
            TransformMode::Translate => {
                for axis in Axis::ALL {
                    self.draw_plane_handle(painter, camera, screen, frame, length, axis);
                }
                for axis in sorted_far_first(camera, frame, length) {
                    self.draw_axis(painter, camera, screen, frame, length, axis, TipShape::Arrow);
                }
            }
            TransformMode::Rotate => {
                for axis in Axis::ALL {
                    self.draw_ring(painter, camera, screen, frame, length, axis);
                }
            }
            TransformMode::Scale => {
                for axis in sorted_far_first(camera, frame, length) {
                    self.draw_axis(painter, camera, screen, frame, length, axis, TipShape::Square);
                }
                let emphasized = self.emphasis(GizmoHandle::Uniform);
                let half = if emphasized.is_some() { 6.0 } else { 5.0 };
                painter.rect_filled(
                    egui::Rect::from_center_size(center, egui::vec2(half * 2.0, half * 2.0)),
                    0.0,
                    egui::Color32::from_gray(if emphasized.is_some() { 255 } else { 200 }),
                );
                return;
            }
        }

        painter.circle_filled(center, 3.0, egui::Color32::WHITE);
    }

    /// Some(true) when active, Some(false) when hovered, None otherwise
    fn emphasis(&self, handle: GizmoHandle) -> Option<bool> {
        if self.active() == Some(handle) {
            Some(true)
        } else if self.hovered == Some(handle) && self.drag.is_none() {
            Some(false)
        } else {
            None
        }
    }

    fn handle_color(&self, handle: GizmoHandle, axis: Axis) -> (egui::Color32, bool) {
        let (color, bright) = axis.colors();
        let other_active = self.drag.is_some() && self.active() != Some(handle);
        match self.emphasis(handle) {
            Some(_) => (bright, true),
            None if other_active => (color.gamma_multiply(DIM_ALPHA), false),
            None => (color, false),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_axis(
        &self,
        painter: &egui::Painter,
        camera: &Camera,
        screen: Vec2,
        frame: &GizmoFrame,
        length: f32,
        axis: Axis,
        tip: TipShape,
    ) {
        let (Some(start), Some(end)) = (
            world_to_screen(camera, screen, frame.origin),
            world_to_screen(camera, screen, frame.origin + frame.axis_dir(axis) * length),
        ) else {
            return;
        };

        let (color, emphasized) = self.handle_color(GizmoHandle::Axis(axis), axis);
        let thickness = if emphasized { 3.5 } else { 2.5 };
        painter.line_segment([start, end], egui::Stroke::new(thickness, color));

        let dir = end - start;
        let len = dir.length();
        if len <= 1.0 {
            return;
        }
        let norm = dir / len;
        let tip_size = if emphasized { 10.0 } else { 8.0 };
        match tip {
            TipShape::Arrow => {
                let perp = egui::vec2(-norm.y, norm.x);
                let base = end - norm * tip_size;
                painter.add(egui::Shape::convex_polygon(
                    vec![end, base + perp * tip_size * 0.4, base - perp * tip_size * 0.4],
                    color,
                    egui::Stroke::NONE,
                ));
            }
            TipShape::Square => {
                painter.rect_filled(
                    egui::Rect::from_center_size(end, egui::vec2(tip_size, tip_size)),
                    0.0,
                    color,
                );
            }
        }
    }

    fn draw_plane_handle(
        &self,
        painter: &egui::Painter,
        camera: &Camera,
        screen: Vec2,
        frame: &GizmoFrame,
        length: f32,
        normal_axis: Axis,
    ) {
        let [a, b] = normal_axis.others();
        let (dir_a, dir_b) = (frame.axis_dir(a), frame.axis_dir(b));
        let offset = length * 0.3;
        let corners: Vec<egui::Pos2> = [(0.4, 0.4), (1.0, 0.4), (1.0, 1.0), (0.4, 1.0)]
            .iter()
            .filter_map(|&(u, v)| {
                let p = frame.origin + dir_a * offset * u + dir_b * offset * v;
                world_to_screen(camera, screen, p)
            })
            .collect();
        if corners.len() != 4 {
            return;
        }

        let handle = GizmoHandle::Plane(normal_axis);
        let (color, _) = normal_axis.colors();
        let other_active = self.drag.is_some() && self.active() != Some(handle);
        let (fill_alpha, stroke_alpha) = match self.emphasis(handle) {
            Some(_) => (PLANE_HOVER_ALPHA, 200),
            None if other_active => (15, 0),
            None => (PLANE_ALPHA, 100),
        };

        painter.add(egui::Shape::convex_polygon(
            corners,
            egui::Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), fill_alpha),
            egui::Stroke::new(
                1.0,
                egui::Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), stroke_alpha),
            ),
        ));
    }

    fn draw_ring(
        &self,
        painter: &egui::Painter,
        camera: &Camera,
        screen: Vec2,
        frame: &GizmoFrame,
        radius: f32,
        axis: Axis,
    ) {
        let [a, b] = axis.others();
        let (dir_a, dir_b) = (frame.axis_dir(a), frame.axis_dir(b));
        let points: Vec<egui::Pos2> = (0..=RING_SEGMENTS)
            .filter_map(|i| {
                let t = i as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU;
                let p = frame.origin + (dir_a * t.cos() + dir_b * t.sin()) * radius;
                world_to_screen(camera, screen, p)
            })
            .collect();
        if points.len() < 2 {
            return;
        }

        let (color, emphasized) = self.handle_color(GizmoHandle::Axis(axis), axis);
        let thickness = if emphasized { 3.0 } else { 2.0 };
        painter.add(egui::Shape::line(points, egui::Stroke::new(thickness, color)));
    }
}

#[derive(Clone, Copy)]
enum TipShape {
    Arrow,
    Square,
}

fn pick_axis(ray: &Ray, frame: &GizmoFrame, length: f32, threshold: f32) -> Option<GizmoHandle> {
    Axis::ALL
        .into_iter()
        .map(|axis| {
            let tip = frame.origin + frame.axis_dir(axis) * length;
            (axis, ray_segment_distance(ray, frame.origin, tip))
        })
        .filter(|&(_, d)| d < threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(axis, _)| GizmoHandle::Axis(axis))
}

fn plane_handle_center(frame: &GizmoFrame, normal_axis: Axis, length: f32) -> Vec3 {
    let [a, b] = normal_axis.others();
    let offset = length * 0.3 * 0.7;
    frame.origin + (frame.axis_dir(a) + frame.axis_dir(b)) * offset
}

/// Plane the pointer is projected onto while dragging `handle`
fn drag_plane_normal(handle: GizmoHandle, frame: &GizmoFrame, camera: &Camera) -> Vec3 {
    let forward = (camera.target - camera.position).normalize_or_zero();
    match (frame.mode, handle) {
        (TransformMode::Rotate, GizmoHandle::Axis(axis)) => frame.axis_dir(axis),
        (_, GizmoHandle::Plane(axis)) => frame.axis_dir(axis),
        (_, GizmoHandle::Uniform) => forward,
        (_, GizmoHandle::Axis(axis)) => {
            // The plane contains the axis and faces the camera as much as possible
            let [a, b] = axis.others();
            let (na, nb) = (frame.axis_dir(a), frame.axis_dir(b));
            if na.dot(forward).abs() >= nb.dot(forward).abs() {
                na
            } else {
                nb
            }
        }
    }
}

fn sorted_far_first(camera: &Camera, frame: &GizmoFrame, length: f32) -> Vec<Axis> {
    let mut axes = Axis::ALL.to_vec();
    axes.sort_by(|a, b| {
        let da = point_depth(camera, frame.origin + frame.axis_dir(*a) * length);
        let db = point_depth(camera, frame.origin + frame.axis_dir(*b) * length);
        db.total_cmp(&da)
    });
    axes
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SIZE: f32 = 1.0;

    fn front_camera() -> Camera {
        Camera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 50.0, 0.1, 100.0)
    }

    fn screen() -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    fn pixel(camera: &Camera, p: Vec3) -> (f32, f32) {
        let pos = world_to_screen(camera, screen(), p).unwrap();
        (pos.x, pos.y)
    }

    fn frame(mode: TransformMode, space: TransformSpace, transform: Transform) -> GizmoFrame {
        GizmoFrame::new(&transform, mode, space)
    }

    #[test]
    fn picks_translate_axis_under_pointer() {
        let camera = front_camera();
        let f = frame(TransformMode::Translate, TransformSpace::World, Transform::IDENTITY);
        let length = handle_length(&camera, SIZE);
        let gizmo = TransformGizmo::new();

        let (x, y) = pixel(&camera, Vec3::X * length * 0.7);
        assert_eq!(
            gizmo.pick(&camera, screen(), x, y, &f, SIZE),
            Some(GizmoHandle::Axis(Axis::X))
        );
        assert_eq!(gizmo.pick(&camera, screen(), 5.0, 5.0, &f, SIZE), None);
    }

    #[test]
    fn world_translate_drag_follows_axis() {
        let camera = front_camera();
        let f = frame(TransformMode::Translate, TransformSpace::World, Transform::IDENTITY);
        let mut gizmo = TransformGizmo::new();

        let (x0, y0) = pixel(&camera, Vec3::ZERO);
        assert!(gizmo.begin_drag(GizmoHandle::Axis(Axis::X), &camera, screen(), x0, y0, &f, SIZE));
        let (x1, y1) = pixel(&camera, Vec3::new(1.0, 0.5, 0.0));
        let Some(WidgetDrag::Translate(offset)) = gizmo.drag(&camera, screen(), x1, y1) else {
            panic!("expected a translate drag");
        };
        assert_relative_eq!(offset.x, 1.0, epsilon = 1e-3);
        assert_relative_eq!(offset.y, 0.0, epsilon = 1e-5);

        gizmo.end_drag();
        assert!(!gizmo.is_dragging());
        assert!(gizmo.drag(&camera, screen(), x1, y1).is_none());
    }

    #[test]
    fn local_translate_reports_local_offset() {
        let camera = front_camera();
        let rotated = Transform::IDENTITY
            .with_rotation(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        let f = frame(TransformMode::Translate, TransformSpace::Local, rotated);
        let mut gizmo = TransformGizmo::new();

        let (x0, y0) = pixel(&camera, Vec3::ZERO);
        assert!(gizmo.begin_drag(GizmoHandle::Axis(Axis::X), &camera, screen(), x0, y0, &f, SIZE));
        // Local X points along world Y
        let (x1, y1) = pixel(&camera, Vec3::Y);
        let Some(WidgetDrag::Translate(offset)) = gizmo.drag(&camera, screen(), x1, y1) else {
            panic!("expected a translate drag");
        };
        assert_relative_eq!(offset.x, 1.0, epsilon = 1e-3);
        assert_relative_eq!(offset.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn rotate_ring_reports_signed_angle() {
        let camera = front_camera();
        let f = frame(TransformMode::Rotate, TransformSpace::World, Transform::IDENTITY);
        let radius = handle_length(&camera, SIZE);
        let mut gizmo = TransformGizmo::new();

        let (x0, y0) = pixel(&camera, Vec3::X * radius);
        let handle = gizmo.pick(&camera, screen(), x0, y0, &f, SIZE);
        assert_eq!(handle, Some(GizmoHandle::Axis(Axis::Z)));

        assert!(gizmo.begin_drag(GizmoHandle::Axis(Axis::Z), &camera, screen(), x0, y0, &f, SIZE));
        let (x1, y1) = pixel(&camera, Vec3::Y * radius);
        let Some(WidgetDrag::Rotate { axis, angle }) = gizmo.drag(&camera, screen(), x1, y1) else {
            panic!("expected a rotate drag");
        };
        assert_eq!(axis, Vec3::Z);
        assert_relative_eq!(angle, std::f32::consts::FRAC_PI_2, epsilon = 1e-3);
    }

    #[test]
    fn scale_axis_stretches_one_component() {
        let camera = front_camera();
        let f = frame(TransformMode::Scale, TransformSpace::World, Transform::IDENTITY);
        let length = handle_length(&camera, SIZE);
        let mut gizmo = TransformGizmo::new();

        let (x0, y0) = pixel(&camera, Vec3::ZERO);
        assert!(gizmo.begin_drag(GizmoHandle::Axis(Axis::X), &camera, screen(), x0, y0, &f, SIZE));
        let (x1, y1) = pixel(&camera, Vec3::X * length);
        let Some(WidgetDrag::Scale(factor)) = gizmo.drag(&camera, screen(), x1, y1) else {
            panic!("expected a scale drag");
        };
        assert_relative_eq!(factor.x, 2.0, epsilon = 1e-3);
        assert_eq!(factor.y, 1.0);
        assert_eq!(factor.z, 1.0);
    }

    #[test]
    fn scale_handles_use_entity_axes_in_world_space() {
        let rotated = Transform::IDENTITY.with_rotation(Vec3::new(0.0, 1.0, 0.0));
        let scale = frame(TransformMode::Scale, TransformSpace::World, rotated);
        let translate = frame(TransformMode::Translate, TransformSpace::World, rotated);
        assert_ne!(scale.rotation, Quat::IDENTITY);
        assert_eq!(translate.rotation, Quat::IDENTITY);
    }
}
