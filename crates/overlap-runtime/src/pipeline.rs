//! Re-evaluation of the intersection mesh
//!
//! One cycle: synchronize brushes, decide visibility, evaluate, remap group
//! materials to presentation materials, publish the intersection edges, and
//! swap each solid between its brush and visual mesh.

use crate::sync::synchronize_scene;
use overlap_core::Result;
use overlap_csg::{BooleanEvaluator, Operation};
use overlap_scene::{MaterialMap, Scene};

/// Summary of one evaluation cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationOutcome {
    /// Both solids enabled, so the evaluated mesh and edges are visible
    pub visible: bool,
    /// The evaluator reported at least one intersection edge
    pub intersecting: bool,
    pub edge_count: usize,
    pub triangle_count: usize,
}

pub struct EvaluationPipeline {
    evaluator: Box<dyn BooleanEvaluator>,
    material_map: MaterialMap,
    operation: Operation,
    last: Option<EvaluationOutcome>,
}

impl EvaluationPipeline {
    /// Build the pipeline, registering presentation materials in `scene`
    pub fn new(evaluator: Box<dyn BooleanEvaluator>, scene: &mut Scene) -> Self {
        let material_map = scene.create_material_map();
        Self::with_material_map(evaluator, material_map)
    }

    pub fn with_material_map(evaluator: Box<dyn BooleanEvaluator>, material_map: MaterialMap) -> Self {
        Self {
            evaluator,
            material_map,
            operation: Operation::Intersection,
            last: None,
        }
    }

    pub fn material_map(&self) -> &MaterialMap {
        &self.material_map
    }

    pub fn last_outcome(&self) -> Option<EvaluationOutcome> {
        self.last
    }

    /// First evaluation, run once before the first frame
    pub fn prime(&mut self, scene: &mut Scene) -> Result<EvaluationOutcome> {
        let outcome = self.update(scene)?;
        log::info!(
            "Initial evaluation: intersecting={} edges={}",
            outcome.intersecting,
            outcome.edge_count
        );
        Ok(outcome)
    }

    /// Run one full cycle.
    ///
    /// Fails only when a group material has no presentation mapping. Evaluator
    /// errors are logged and treated as no intersection.
    pub fn update(&mut self, scene: &mut Scene) -> Result<EvaluationOutcome> {
        synchronize_scene(scene);

        let visible = scene.solids.both_enabled();
        scene.evaluated.node.visible = visible;
        scene.edges.node.visible = visible;

        let mut outcome = EvaluationOutcome {
            visible,
            ..Default::default()
        };

        if visible {
            let evaluated = self.evaluator.evaluate(
                &scene.solids.box_solid.brush,
                &scene.solids.sphere.brush,
                self.operation,
                &mut scene.evaluated,
            );

            match evaluated {
                Ok(()) => {
                    scene.evaluated.materials =
                        match self.material_map.remap(&scene.evaluated.materials) {
                            Ok(materials) => materials,
                            Err(e) => {
                                hide_evaluation(scene);
                                return Err(e);
                            }
                        };
                    let edges = self.evaluator.intersection_edges();
                    scene.edges.set_edges(edges);
                    outcome.edge_count = edges.len();
                    outcome.triangle_count = scene.evaluated.geometry.triangle_count();
                }
                Err(e) => {
                    log::warn!("Boolean evaluation failed, showing solids unmerged: {}", e);
                    scene.evaluated.clear();
                    scene.edges.set_edges(&[]);
                }
            }
        }

        outcome.intersecting = outcome.visible && outcome.edge_count > 0;
        for solid in scene.solids.iter_mut() {
            solid.set_brush_visible(outcome.intersecting);
        }

        log::debug!(
            "Evaluation: visible={} intersecting={} triangles={} edges={}",
            outcome.visible,
            outcome.intersecting,
            outcome.triangle_count,
            outcome.edge_count
        );
        self.last = Some(outcome);
        Ok(outcome)
    }
}

/// Drop the evaluated mesh and edges and fall back to the visual meshes
fn hide_evaluation(scene: &mut Scene) {
    scene.evaluated.clear();
    scene.evaluated.node.visible = false;
    scene.edges.set_edges(&[]);
    scene.edges.node.visible = false;
    for solid in scene.solids.iter_mut() {
        solid.set_brush_visible(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use overlap_core::{OverlapError, SolidKind};
    use overlap_scene::{EdgeSegment, EvaluatedMesh, Geometry, GeometryGroup, MaterialId, MeshNode};

    /// Overlapping world bounds produce one fixed edge and a two-group cube
    #[derive(Default)]
    struct BoundsEvaluator {
        edges: Vec<EdgeSegment>,
        calls: usize,
        fail: bool,
        foreign_material: Option<MaterialId>,
    }

    impl BooleanEvaluator for BoundsEvaluator {
        fn evaluate(
            &mut self,
            a: &MeshNode,
            b: &MeshNode,
            _operation: Operation,
            out: &mut EvaluatedMesh,
        ) -> Result<()> {
            self.calls += 1;
            if self.fail {
                return Err(OverlapError::Evaluation("degenerate input".into()));
            }
            let overlap = match (a.world_bounds(), b.world_bounds()) {
                (Some(x), Some(y)) => x.intersects(&y),
                _ => false,
            };
            self.edges.clear();
            out.geometry = Geometry::new();
            out.materials = vec![a.material, b.material];
            if overlap {
                self.edges.push(EdgeSegment::new(Vec3::ZERO, Vec3::X));
                let mut g = Geometry::cuboid(0.5, 0.5, 0.5, 1);
                let half = g.indices.len() as u32 / 2;
                g.groups = vec![
                    GeometryGroup { start: 0, count: half, material_index: 0 },
                    GeometryGroup { start: half, count: half, material_index: 1 },
                ];
                out.geometry = g;
            }
            if let Some(m) = self.foreign_material {
                out.materials.push(m);
            }
            Ok(())
        }

        fn intersection_edges(&self) -> &[EdgeSegment] {
            &self.edges
        }
    }

    fn overlap(scene: &mut Scene) {
        scene.solids.sphere.visual.node.transform.position = Vec3::new(0.2, 0.8, 0.0);
    }

    #[test]
    fn default_layout_does_not_intersect() {
        let mut scene = Scene::default();
        let mut pipeline = EvaluationPipeline::new(Box::<BoundsEvaluator>::default(), &mut scene);
        let outcome = pipeline.prime(&mut scene).unwrap();

        assert!(outcome.visible);
        assert!(!outcome.intersecting);
        assert!(!scene.evaluated.is_shown());
        for solid in scene.solids.iter() {
            assert!(solid.visual.is_visible());
            assert!(!solid.brush.is_visible());
        }
    }

    #[test]
    fn overlap_shows_brushes_and_presentation_materials() {
        let mut scene = Scene::default();
        let mut pipeline = EvaluationPipeline::new(Box::<BoundsEvaluator>::default(), &mut scene);
        overlap(&mut scene);
        let outcome = pipeline.update(&mut scene).unwrap();

        assert!(outcome.intersecting);
        assert_eq!(outcome.edge_count, 1);
        assert!(scene.evaluated.is_shown());
        assert!(scene.edges.node.visible);
        for solid in scene.solids.iter() {
            assert!(solid.brush.is_visible());
            assert!(!solid.visual.is_visible());
            assert!(solid.transforms_match());
        }
        let expected = pipeline
            .material_map()
            .remap(&[
                scene.solids.box_solid.brush.material,
                scene.solids.sphere.brush.material,
            ])
            .unwrap();
        assert_eq!(scene.evaluated.materials, expected);
    }

    #[test]
    fn disabled_solid_skips_evaluation() {
        let mut scene = Scene::default();
        let mut pipeline = EvaluationPipeline::new(Box::<BoundsEvaluator>::default(), &mut scene);
        overlap(&mut scene);
        scene.solids.get_mut(SolidKind::Sphere).enabled = false;

        let outcome = pipeline.update(&mut scene).unwrap();
        assert!(!outcome.visible);
        assert!(!outcome.intersecting);
        assert!(!scene.evaluated.node.visible);
        assert!(!scene.edges.node.visible);
        assert!(!scene.solids.sphere.visual.is_visible());
        assert!(!scene.solids.sphere.brush.is_visible());
        assert!(scene.solids.box_solid.visual.is_visible());
    }

    #[test]
    fn evaluator_failure_counts_as_no_intersection() {
        let mut scene = Scene::default();
        let evaluator = BoundsEvaluator {
            fail: true,
            ..Default::default()
        };
        let mut pipeline = EvaluationPipeline::new(Box::new(evaluator), &mut scene);
        overlap(&mut scene);

        let outcome = pipeline.update(&mut scene).unwrap();
        assert!(!outcome.intersecting);
        assert!(scene.evaluated.geometry.is_empty());
        assert!(scene.solids.iter().all(|s| s.visual.is_visible()));
    }

    #[test]
    fn unmapped_group_material_is_fatal() {
        let mut scene = Scene::default();
        let stray = scene.materials.add_standard("stray", |m| m);
        let evaluator = BoundsEvaluator {
            foreign_material: Some(stray),
            ..Default::default()
        };
        let mut pipeline = EvaluationPipeline::new(Box::new(evaluator), &mut scene);

        overlap(&mut scene);

        let err = pipeline.update(&mut scene).unwrap_err();
        assert!(err.is_fatal());
        assert!(!scene.evaluated.node.visible);
        assert!(scene.evaluated.geometry.is_empty());
        assert!(!scene.edges.node.visible);
        assert!(scene.edges.edges().is_empty());
        for solid in scene.solids.iter() {
            assert!(solid.visual.is_visible());
            assert!(!solid.brush.is_visible());
        }
    }

    #[test]
    fn repeated_update_is_idempotent() {
        let mut scene = Scene::default();
        let mut pipeline = EvaluationPipeline::new(Box::<BoundsEvaluator>::default(), &mut scene);
        overlap(&mut scene);

        let first = pipeline.update(&mut scene).unwrap();
        let geometry = scene.evaluated.geometry.clone();
        let edges = scene.edges.edges().to_vec();

        let second = pipeline.update(&mut scene).unwrap();
        assert_eq!(first, second);
        assert_eq!(scene.evaluated.geometry, geometry);
        assert_eq!(scene.edges.edges(), edges.as_slice());
    }
}
