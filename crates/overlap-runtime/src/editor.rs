//! Editor application state
//!
//! Owns the scene, camera, selection, widget, panels and the pending
//! re-evaluation flag. Input is applied through [`Editor::handle_input`] and
//! frames are produced by [`Editor::frame`]. Everything runs on one thread.

use crate::config::EditorConfig;
use crate::input::{interpret, EditorCommand, InputContext, InputEvent};
use crate::panels::Panels;
use crate::picking::pick_at;
use crate::pipeline::{EvaluationOutcome, EvaluationPipeline};
use crate::render_loop::{FrameReport, FrameRenderer, PendingWork, RenderLoop};
use crate::selection::Selection;
use crate::widget::{SnapIncrements, TransformWidget};
use glam::Vec2;
use overlap_core::{Result, Transform, TransformMode};
use overlap_csg::BooleanEvaluator;
use overlap_scene::{Camera, OrbitControls, Scene};

pub struct Editor {
    pub scene: Scene,
    pub camera: Camera,
    pub orbit: OrbitControls,
    pub selection: Selection,
    pub widget: TransformWidget,
    pub panels: Panels,
    snaps: SnapIncrements,
    pending: PendingWork,
    viewport: Vec2,
    render_loop: RenderLoop,
}

impl Editor {
    /// Build the scene and run the initial evaluation
    pub fn new(config: &EditorConfig, evaluator: Box<dyn BooleanEvaluator>) -> Result<Self> {
        let mut scene = Scene::new(config.scene_options());
        let pipeline = EvaluationPipeline::new(evaluator, &mut scene);
        let mut render_loop = RenderLoop::new(pipeline);
        render_loop.prime(&mut scene)?;

        Ok(Self {
            scene,
            camera: config.build_camera(),
            orbit: OrbitControls::default(),
            selection: Selection::default(),
            widget: TransformWidget::new(config.widget.size),
            panels: Panels::new(),
            snaps: config.snap_increments(),
            pending: PendingWork::default(),
            viewport: Vec2::new(config.window.width as f32, config.window.height as f32),
            render_loop,
        })
    }

    pub fn input_context(&self) -> InputContext {
        InputContext {
            selected: self.selection.entity(),
            mode: self.widget.mode(),
            dragging: self.widget.is_dragging(),
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Whether a re-evaluation will run on the next frame
    pub fn needs_evaluation(&self) -> bool {
        self.pending.is_set()
    }

    pub fn last_evaluation(&self) -> Option<EvaluationOutcome> {
        self.render_loop.pipeline().last_outcome()
    }

    /// Transform of the entity the widget is attached to
    pub fn attached_transform(&self) -> Option<&Transform> {
        self.widget
            .attached()
            .map(|entity| self.scene.entity_transform(entity))
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        let commands = interpret(&event, &self.input_context());
        for command in commands {
            self.handle_command(command);
        }
    }

    pub fn handle_command(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::Select(entity) => {
                self.selection
                    .select(Some(entity), &mut self.widget, &self.panels);
            }
            EditorCommand::Deselect => self.selection.deselect(&mut self.widget),
            EditorCommand::PickAt { x, y } => {
                let hit = pick_at(&self.scene, &self.camera, x, y, self.viewport);
                self.selection.select(hit, &mut self.widget, &self.panels);
            }
            EditorCommand::SetMode(mode) => {
                let light_selected = self
                    .selection
                    .entity()
                    .is_some_and(|entity| !entity.is_scalable());
                if mode == TransformMode::Scale && light_selected {
                    return;
                }
                self.widget.set_mode(mode);
                log::info!("Transform mode: {}", mode.label());
            }
            EditorCommand::ToggleSpace => {
                let space = self.widget.space().toggled();
                self.widget.set_space(space);
                log::info!("Transform space: {}", space.label());
            }
            EditorCommand::EnableSnap => {
                if self.widget.translation_snap().is_none() {
                    log::info!("Snapping on");
                }
                self.widget.set_snaps(self.snaps);
            }
            EditorCommand::ClearSnap => {
                self.widget.clear_snaps();
                log::info!("Snapping off");
            }
            EditorCommand::ToggleEnabled => {
                let Some(entity) = self.selection.entity() else {
                    return;
                };
                let enabled = self.scene.toggle_enabled(entity);
                self.pending.request();
                if let Some(panel) = self.selection.panel() {
                    self.panels.set_disabled(panel, !enabled);
                }
                log::info!("{} {}", entity, if enabled { "enabled" } else { "disabled" });
            }
            EditorCommand::Resize { width, height } => {
                self.viewport = Vec2::new(width as f32, height as f32);
                self.camera.set_aspect(self.viewport.x, self.viewport.y);
            }
            EditorCommand::SetDragging(dragging) => {
                let start = self
                    .widget
                    .attached()
                    .map(|entity| *self.scene.entity_transform(entity));
                if self.widget.set_dragging(dragging, start) {
                    log::debug!("Widget dragging: {}", dragging);
                }
            }
            EditorCommand::ApplyDrag(drag) => {
                let Some(entity) = self.widget.attached() else {
                    return;
                };
                let target = self.scene.entity_transform_mut(entity);
                if self.widget.apply_drag(drag, target) {
                    self.pending.request();
                }
            }
            EditorCommand::OrbitCamera { dx, dy } => self.orbit.rotate(&mut self.camera, dx, dy),
            EditorCommand::PanCamera { dx, dy } => self.orbit.pan(&mut self.camera, dx, dy),
            EditorCommand::ZoomCamera(amount) => self.orbit.zoom(&mut self.camera, amount),
        }

        // Orbit input is suspended exactly while the widget drags
        self.orbit.enabled = !self.widget.is_dragging();
    }

    /// Run one frame: pending evaluation, light state, then a single draw
    pub fn frame(&mut self, renderer: &mut dyn FrameRenderer) -> Result<FrameReport> {
        self.render_loop
            .tick(&mut self.scene, &self.camera, &mut self.pending, renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use overlap_core::{EntityKind, TransformSpace};
    use overlap_csg::MeshEvaluator;

    fn editor() -> Editor {
        Editor::new(&EditorConfig::default(), Box::new(MeshEvaluator::new())).unwrap()
    }

    #[test]
    fn starts_evaluated_and_idle() {
        let editor = editor();
        assert!(!editor.needs_evaluation());
        let outcome = editor.last_evaluation().unwrap();
        assert!(!outcome.intersecting);
        assert_eq!(editor.viewport(), Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn q_toggles_space() {
        let mut editor = editor();
        editor.handle_input(InputEvent::KeyDown(Key::Char('q')));
        assert_eq!(editor.widget.space(), TransformSpace::Local);
        editor.handle_input(InputEvent::KeyDown(Key::Char('q')));
        assert_eq!(editor.widget.space(), TransformSpace::World);
    }

    #[test]
    fn shift_snaps_use_configured_increments() {
        let mut editor = editor();
        editor.handle_input(InputEvent::KeyDown(Key::Shift));
        assert_eq!(editor.widget.translation_snap(), Some(0.5));
        assert_eq!(editor.widget.scale_snap(), Some(1.0));
        editor.handle_input(InputEvent::KeyUp(Key::Shift));
        assert_eq!(editor.widget.rotation_snap(), None);
    }

    #[test]
    fn dragging_disables_orbit() {
        let mut editor = editor();
        editor.handle_input(InputEvent::KeyDown(Key::Char('s')));
        editor.handle_input(InputEvent::WidgetDragging(true));
        assert!(!editor.orbit.enabled);
        editor.handle_input(InputEvent::WidgetDragging(false));
        assert!(editor.orbit.enabled);
    }

    #[test]
    fn resize_updates_camera_aspect() {
        let mut editor = editor();
        editor.handle_input(InputEvent::Resize {
            width: 800,
            height: 800,
        });
        assert_eq!(editor.camera.aspect, 1.0);
        assert_eq!(editor.viewport(), Vec2::new(800.0, 800.0));
    }

    #[test]
    fn space_without_selection_is_a_no_op() {
        let mut editor = editor();
        editor.handle_input(InputEvent::KeyDown(Key::Char(' ')));
        assert!(!editor.needs_evaluation());
        assert!(editor.scene.is_enabled(EntityKind::BOX));
    }
}
