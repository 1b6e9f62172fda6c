//! End-to-end editor flows driven through input events with a stub evaluator

use glam::Vec3;
use overlap_core::{EntityKind, Result, TransformMode};
use overlap_csg::{BooleanEvaluator, Operation};
use overlap_runtime::{
    Editor, EditorConfig, HeadlessRenderer, InputEvent, Key, PanelId, WidgetDrag,
};
use overlap_scene::{EdgeSegment, EvaluatedMesh, Geometry, GeometryGroup, MeshNode};

/// Reports two fixed edges and a two-group mesh whenever the brush bounds overlap
#[derive(Default)]
struct StubEvaluator {
    edges: Vec<EdgeSegment>,
}

impl BooleanEvaluator for StubEvaluator {
    fn evaluate(
        &mut self,
        a: &MeshNode,
        b: &MeshNode,
        _operation: Operation,
        out: &mut EvaluatedMesh,
    ) -> Result<()> {
        self.edges.clear();
        out.geometry = Geometry::new();
        out.materials = vec![a.material, b.material];

        let overlap = match (a.world_bounds(), b.world_bounds()) {
            (Some(x), Some(y)) => x.intersects(&y),
            _ => false,
        };
        if overlap {
            self.edges = vec![
                EdgeSegment::new(Vec3::ZERO, Vec3::X),
                EdgeSegment::new(Vec3::X, Vec3::new(1.0, 1.0, 0.0)),
            ];
            let mut geometry = Geometry::cuboid(0.5, 0.5, 0.5, 1);
            let half = geometry.indices.len() as u32 / 2;
            geometry.groups = vec![
                GeometryGroup { start: 0, count: half, material_index: 0 },
                GeometryGroup { start: half, count: half, material_index: 1 },
            ];
            out.geometry = geometry;
        }
        Ok(())
    }

    fn intersection_edges(&self) -> &[EdgeSegment] {
        &self.edges
    }
}

fn editor() -> Editor {
    Editor::new(&EditorConfig::default(), Box::<StubEvaluator>::default()).unwrap()
}

fn key(editor: &mut Editor, name: &str) {
    editor.handle_input(InputEvent::KeyDown(Key::parse(name)));
}

/// Drag the selected entity by `offset` in one gesture
fn drag_by(editor: &mut Editor, offset: Vec3) {
    editor.handle_input(InputEvent::WidgetDragging(true));
    editor.handle_input(InputEvent::WidgetDrag(WidgetDrag::Translate(offset)));
    editor.handle_input(InputEvent::WidgetDragging(false));
}

fn assert_invariants(editor: &Editor) {
    let scene = &editor.scene;
    let both = scene.solids.both_enabled();
    assert_eq!(scene.evaluated.node.visible, both);
    if scene.evaluated.node.visible {
        assert!(scene.edges.node.visible);
    }

    let intersecting = editor
        .last_evaluation()
        .map(|o| o.intersecting)
        .unwrap_or(false);
    for solid in scene.solids.iter() {
        if solid.enabled {
            assert_ne!(solid.brush.is_visible(), solid.visual.is_visible());
            assert_eq!(solid.brush.is_visible(), intersecting);
        } else {
            assert!(!solid.brush.is_visible() && !solid.visual.is_visible());
        }
    }
}

fn overlap_sphere_with_box(editor: &mut Editor) {
    key(editor, "d");
    key(editor, "w");
    let sphere = editor.scene.solids.sphere.visual.node.transform.position;
    let target = editor.scene.solids.box_solid.visual.node.transform.position;
    drag_by(editor, target - sphere);
}

#[test]
fn default_layout_shows_opaque_solids() {
    let mut editor = editor();
    let mut renderer = HeadlessRenderer::default();
    editor.frame(&mut renderer).unwrap();

    assert!(editor.scene.edges.edges().is_empty());
    assert!(!editor.scene.evaluated.is_shown());
    for solid in editor.scene.solids.iter() {
        assert!(solid.visual.is_visible());
        assert!(!solid.brush.is_visible());
    }
    assert_invariants(&editor);
}

#[test]
fn dragging_sphere_into_box_switches_to_brushes() {
    let mut editor = editor();
    let mut renderer = HeadlessRenderer::default();

    overlap_sphere_with_box(&mut editor);
    assert_eq!(editor.selection.entity(), Some(EntityKind::SPHERE));
    assert_eq!(editor.widget.mode(), TransformMode::Translate);
    assert!(editor.needs_evaluation());

    let report = editor.frame(&mut renderer).unwrap();
    let outcome = report.evaluation.unwrap();
    assert!(outcome.intersecting);
    assert!(!editor.needs_evaluation());
    assert_eq!(editor.scene.edges.world_edges().len(), 2);
    assert!(editor.scene.evaluated.is_shown());
    for solid in editor.scene.solids.iter() {
        assert!(solid.brush.is_visible());
        assert!(solid.transforms_match());
    }
    assert_invariants(&editor);
}

#[test]
fn disabling_sphere_hides_evaluated_mesh() {
    let mut editor = editor();
    let mut renderer = HeadlessRenderer::default();
    overlap_sphere_with_box(&mut editor);
    editor.frame(&mut renderer).unwrap();

    key(&mut editor, " ");
    assert!(!editor.scene.solids.sphere.enabled);
    assert!(editor.panels.is_disabled(PanelId::Sphere));
    assert!(editor.needs_evaluation());

    editor.frame(&mut renderer).unwrap();
    assert!(!editor.scene.evaluated.node.visible);
    assert!(!editor.scene.edges.node.visible);
    assert!(editor.scene.solids.box_solid.visual.is_visible());
    assert_invariants(&editor);

    key(&mut editor, " ");
    assert!(!editor.panels.is_disabled(PanelId::Sphere));
    editor.frame(&mut renderer).unwrap();
    assert!(editor.scene.evaluated.is_shown());
    assert_invariants(&editor);
}

#[test]
fn light_selection_forbids_scale() {
    let mut editor = editor();
    key(&mut editor, "s");
    key(&mut editor, "r");
    assert_eq!(editor.widget.mode(), TransformMode::Scale);

    key(&mut editor, "f");
    assert_eq!(editor.selection.entity(), Some(EntityKind::Light));
    assert_eq!(editor.widget.mode(), TransformMode::Translate);

    key(&mut editor, "r");
    assert_eq!(editor.widget.mode(), TransformMode::Translate);
}

#[test]
fn escape_clears_selection() {
    let mut editor = editor();
    key(&mut editor, "d");
    assert_eq!(editor.selection.panel(), Some(PanelId::Sphere));

    key(&mut editor, "Escape");
    assert_eq!(editor.selection.entity(), None);
    assert_eq!(editor.selection.panel(), None);
    assert!(editor.widget.attached().is_none());
}

#[test]
fn clicking_empty_space_deselects_and_clicking_a_solid_selects() {
    let mut editor = editor();
    key(&mut editor, "d");

    editor.handle_input(InputEvent::PointerDown {
        x: 0.0,
        y: 0.0,
        target_key: None,
    });
    assert_eq!(editor.selection.entity(), None);

    let ndc = editor
        .camera
        .project(editor.scene.solids.box_solid.visual.node.transform.position)
        .unwrap();
    let viewport = editor.viewport();
    editor.handle_input(InputEvent::PointerDown {
        x: (ndc.x + 1.0) * 0.5 * viewport.x,
        y: (1.0 - ndc.y) * 0.5 * viewport.y,
        target_key: None,
    });
    assert_eq!(editor.selection.entity(), Some(EntityKind::BOX));
}

#[test]
fn panel_button_dispatches_as_hotkey() {
    let mut editor = editor();
    editor.handle_input(InputEvent::PointerDown {
        x: 5.0,
        y: 5.0,
        target_key: Some("F".into()),
    });
    assert_eq!(editor.selection.entity(), Some(EntityKind::Light));
}

#[test]
fn evaluation_runs_only_when_requested() {
    let mut editor = editor();
    let mut renderer = HeadlessRenderer::default();
    for _ in 0..3 {
        let report = editor.frame(&mut renderer).unwrap();
        assert!(report.evaluation.is_none());
    }
    assert_eq!(renderer.frames, 3);

    key(&mut editor, "s");
    drag_by(&mut editor, Vec3::new(0.0, 0.1, 0.0));
    assert!(editor.frame(&mut renderer).unwrap().evaluation.is_some());
}

#[test]
fn selecting_another_entity_detaches_the_widget_first() {
    let mut editor = editor();
    key(&mut editor, "s");
    editor.handle_input(InputEvent::WidgetDragging(true));
    assert!(editor.widget.is_dragging());

    key(&mut editor, "d");
    assert!(!editor.widget.is_dragging());
    assert_eq!(editor.widget.attached(), Some(EntityKind::SPHERE));
    assert!(editor.orbit.enabled);
}
