//! Transform synchronization between a solid's representations

use overlap_core::{SolidKind, Transform};
use overlap_scene::Scene;

/// Copy position, rotation and scale from `source` into `target`
pub fn synchronize(source: &Transform, target: &mut Transform) {
    target.copy_from(source);
}

/// Bring every brush and the edges helper up to date with the visual meshes.
///
/// The edges helper follows the box, so intersection edges are displayed in the
/// box's frame.
pub fn synchronize_scene(scene: &mut Scene) {
    let box_transform = scene.solids.box_solid.visual.node.transform;
    synchronize(&box_transform, &mut scene.edges.node.transform);

    for kind in [SolidKind::Sphere, SolidKind::Box] {
        let solid = scene.solids.get_mut(kind);
        let source = solid.visual.node.transform;
        synchronize(&source, &mut solid.brush.node.transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn copies_all_nine_components() {
        let source = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Vec3::new(0.1, 0.2, 0.3))
            .with_scale(Vec3::new(2.0, 1.5, 0.5));
        let mut target = Transform::IDENTITY;
        synchronize(&source, &mut target);
        assert_eq!(target, source);
    }

    #[test]
    fn scene_brushes_and_edges_follow_visuals() {
        let mut scene = Scene::default();
        scene.solids.sphere.visual.node.transform.rotation = Vec3::new(0.0, 1.0, 0.0);
        scene.solids.box_solid.visual.node.transform.scale = Vec3::splat(1.5);

        synchronize_scene(&mut scene);

        assert!(scene.solids.iter().all(|s| s.transforms_match()));
        assert_eq!(
            scene.edges.node.transform,
            scene.solids.box_solid.visual.node.transform
        );
    }
}
