//! Transform manipulation widget state
//!
//! Holds the widget's mode, reference frame, snapping and attachment. A drag
//! is reported as a cumulative offset from the transform captured when the
//! drag began, so snapping is applied to the result rather than per event.

use glam::{Quat, Vec3};
use overlap_core::{EntityKind, Transform, TransformMode, TransformSpace};

/// Snap steps enabled while the snap modifier is held
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapIncrements {
    pub translation: f32,
    /// Radians
    pub rotation: f32,
    pub scale: f32,
}

/// Cumulative manipulation since the drag began.
///
/// Axes are in the widget's current reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetDrag {
    Translate(Vec3),
    Rotate { axis: Vec3, angle: f32 },
    /// Per-axis factor applied to the starting scale
    Scale(Vec3),
}

#[derive(Debug, Clone)]
pub struct TransformWidget {
    mode: TransformMode,
    space: TransformSpace,
    translation_snap: Option<f32>,
    rotation_snap: Option<f32>,
    scale_snap: Option<f32>,
    attached: Option<EntityKind>,
    dragging: bool,
    drag_start: Option<Transform>,
    /// Screen-relative handle size
    pub size: f32,
}

impl Default for TransformWidget {
    fn default() -> Self {
        Self::new(0.75)
    }
}

impl TransformWidget {
    pub fn new(size: f32) -> Self {
        Self {
            mode: TransformMode::Translate,
            space: TransformSpace::World,
            translation_snap: None,
            rotation_snap: None,
            scale_snap: None,
            attached: None,
            dragging: false,
            drag_start: None,
            size,
        }
    }

    pub fn attach(&mut self, entity: EntityKind) {
        self.attached = Some(entity);
    }

    /// Release the attached entity, ending any drag in progress
    pub fn detach(&mut self) {
        self.attached = None;
        self.dragging = false;
        self.drag_start = None;
    }

    pub fn attached(&self) -> Option<EntityKind> {
        self.attached
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
    }

    pub fn space(&self) -> TransformSpace {
        self.space
    }

    pub fn set_space(&mut self, space: TransformSpace) {
        self.space = space;
    }

    pub fn set_snaps(&mut self, snaps: SnapIncrements) {
        self.translation_snap = Some(snaps.translation);
        self.rotation_snap = Some(snaps.rotation);
        self.scale_snap = Some(snaps.scale);
    }

    pub fn clear_snaps(&mut self) {
        self.translation_snap = None;
        self.rotation_snap = None;
        self.scale_snap = None;
    }

    pub fn translation_snap(&self) -> Option<f32> {
        self.translation_snap
    }

    pub fn rotation_snap(&self) -> Option<f32> {
        self.rotation_snap
    }

    pub fn scale_snap(&self) -> Option<f32> {
        self.scale_snap
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start or stop a drag. `start` is the attached entity's transform at drag start.
    ///
    /// Returns true when the dragging state actually changed.
    pub fn set_dragging(&mut self, dragging: bool, start: Option<Transform>) -> bool {
        if dragging && self.attached.is_none() {
            return false;
        }
        if self.dragging == dragging {
            return false;
        }
        self.dragging = dragging;
        self.drag_start = if dragging { start } else { None };
        true
    }

    /// Write the result of `drag` into `target`. Returns false when nothing was applied.
    pub fn apply_drag(&self, drag: WidgetDrag, target: &mut Transform) -> bool {
        let (Some(entity), Some(start)) = (self.attached, self.drag_start) else {
            return false;
        };
        if !self.dragging {
            return false;
        }

        match drag {
            WidgetDrag::Translate(offset) => {
                *target = start;
                match self.space {
                    TransformSpace::World => {
                        target.position = snap_vec(start.position + offset, self.translation_snap);
                    }
                    TransformSpace::Local => {
                        let local = snap_vec(offset, self.translation_snap);
                        target.position = start.position + start.quaternion() * local;
                    }
                }
            }
            WidgetDrag::Rotate { axis, angle } => {
                let Some(axis) = axis.try_normalize() else {
                    return false;
                };
                let angle = snap(angle, self.rotation_snap);
                let delta = Quat::from_axis_angle(axis, angle);
                let rotated = match self.space {
                    TransformSpace::World => delta * start.quaternion(),
                    TransformSpace::Local => start.quaternion() * delta,
                };
                *target = start;
                target.set_quaternion(rotated);
            }
            WidgetDrag::Scale(factor) => {
                if !entity.is_scalable() {
                    return false;
                }
                *target = start;
                let scaled = start.scale * factor;
                target.scale = match self.scale_snap {
                    Some(step) if step > 0.0 => Vec3::new(
                        snap_scale(scaled.x, step),
                        snap_scale(scaled.y, step),
                        snap_scale(scaled.z, step),
                    ),
                    _ => scaled,
                };
            }
        }
        true
    }
}

fn snap(value: f32, step: Option<f32>) -> f32 {
    match step {
        Some(step) if step > 0.0 => (value / step).round() * step,
        _ => value,
    }
}

fn snap_vec(v: Vec3, step: Option<f32>) -> Vec3 {
    Vec3::new(snap(v.x, step), snap(v.y, step), snap(v.z, step))
}

/// Scale never snaps to zero
fn snap_scale(value: f32, step: f32) -> f32 {
    let snapped = (value / step).round() * step;
    if snapped == 0.0 {
        step
    } else {
        snapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dragging_widget(entity: EntityKind, start: Transform) -> TransformWidget {
        let mut widget = TransformWidget::default();
        widget.attach(entity);
        assert!(widget.set_dragging(true, Some(start)));
        widget
    }

    #[test]
    fn defaults() {
        let widget = TransformWidget::default();
        assert_eq!(widget.mode(), TransformMode::Translate);
        assert_eq!(widget.space(), TransformSpace::World);
        assert!(widget.translation_snap().is_none());
        assert!(widget.attached().is_none());
    }

    #[test]
    fn cannot_drag_without_attachment() {
        let mut widget = TransformWidget::default();
        assert!(!widget.set_dragging(true, Some(Transform::IDENTITY)));
        assert!(!widget.is_dragging());
    }

    #[test]
    fn world_translation_snaps_result() {
        let start = Transform::from_position(Vec3::new(0.1, 0.5, 0.0));
        let mut widget = dragging_widget(EntityKind::BOX, start);
        widget.set_snaps(SnapIncrements {
            translation: 0.5,
            rotation: 45f32.to_radians(),
            scale: 1.0,
        });

        let mut target = start;
        assert!(widget.apply_drag(WidgetDrag::Translate(Vec3::new(0.62, 0.0, 0.0)), &mut target));
        assert_relative_eq!(target.position.x, 0.5);
        assert_relative_eq!(target.position.y, 0.5);
    }

    #[test]
    fn local_translation_follows_rotation() {
        let start = Transform::IDENTITY.with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        let mut widget = dragging_widget(EntityKind::SPHERE, start);
        widget.set_space(TransformSpace::Local);

        let mut target = start;
        widget.apply_drag(WidgetDrag::Translate(Vec3::X), &mut target);
        // Local +X points along world -Z after a quarter turn about Y
        assert_relative_eq!(target.position.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(target.position.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn rotation_snaps_angle() {
        let mut widget = dragging_widget(EntityKind::BOX, Transform::IDENTITY);
        widget.set_snaps(SnapIncrements {
            translation: 0.5,
            rotation: 45f32.to_radians(),
            scale: 1.0,
        });
        let mut target = Transform::IDENTITY;
        widget.apply_drag(
            WidgetDrag::Rotate {
                axis: Vec3::Y,
                angle: 50f32.to_radians(),
            },
            &mut target,
        );
        assert_relative_eq!(target.rotation.y, 45f32.to_radians(), epsilon = 1e-5);
    }

    #[test]
    fn scale_is_rejected_for_light() {
        let mut widget = dragging_widget(EntityKind::Light, Transform::IDENTITY);
        let mut target = Transform::IDENTITY;
        assert!(!widget.apply_drag(WidgetDrag::Scale(Vec3::splat(2.0)), &mut target));
        assert_eq!(target.scale, Vec3::ONE);
        widget.detach();
        assert!(!widget.is_dragging());
    }

    #[test]
    fn scale_snap_never_reaches_zero() {
        let mut widget = dragging_widget(EntityKind::BOX, Transform::IDENTITY);
        widget.set_snaps(SnapIncrements {
            translation: 0.5,
            rotation: 1.0,
            scale: 1.0,
        });
        let mut target = Transform::IDENTITY;
        widget.apply_drag(WidgetDrag::Scale(Vec3::new(0.2, 2.4, 1.0)), &mut target);
        assert_eq!(target.scale, Vec3::new(1.0, 2.0, 1.0));

        widget.clear_snaps();
        widget.apply_drag(WidgetDrag::Scale(Vec3::new(0.2, 2.4, 1.0)), &mut target);
        assert_relative_eq!(target.scale.x, 0.2);
    }
}
