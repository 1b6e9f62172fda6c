//! The editable scene: two solids, a light, and the derived evaluation output

use crate::evaluated::{EdgesHelper, EvaluatedMesh, GridHelper};
use crate::geometry::{Geometry, BOX_SEGMENTS, SPHERE_SEGMENTS};
use crate::material::{MaterialLibrary, MaterialMap};
use crate::solid::{AmbientLight, EditableSolid, LightSource, SolidPair};
use glam::Vec3;
use overlap_core::{Color, EntityKind, SolidKind, Transform};

const ACCENT: u32 = 0xE91E63;

/// Presentation settings that do not affect editing
#[derive(Clone, Copy, Debug)]
pub struct SceneOptions {
    pub clear_color: u32,
    pub grid_size: f32,
    pub grid_divisions: u32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            clear_color: 0x111111,
            grid_size: 8.0,
            grid_divisions: 16,
        }
    }
}

pub struct Scene {
    pub solids: SolidPair,
    pub light: LightSource,
    pub ambient: AmbientLight,
    pub evaluated: EvaluatedMesh,
    pub edges: EdgesHelper,
    pub grid: GridHelper,
    pub materials: MaterialLibrary,
    pub clear_color: Color,
}

impl Scene {
    pub fn new(options: SceneOptions) -> Self {
        let mut materials = MaterialLibrary::new();
        let accent = Color::from_hex(ACCENT);

        let box_visual = materials.add_standard("box.visual", |m| m);
        let box_brush = materials.add_brush_preview("box.brush", |m| m);
        let sphere_visual = materials.add_standard("sphere.visual", |m| m.with_color(accent));
        let sphere_brush = materials.add_brush_preview("sphere.brush", |m| {
            m.with_roughness(0.25).with_color(accent)
        });
        let evaluated_default = materials.add_standard("evaluated", |m| m);

        let start = Vec3::new(0.0, 0.5, 0.0);
        let box_solid = EditableSolid::new(
            SolidKind::Box,
            Geometry::cuboid(1.0, 1.0, 1.0, BOX_SEGMENTS),
            box_visual,
            box_brush,
        )
        .with_position(start);
        let sphere = EditableSolid::new(
            SolidKind::Sphere,
            Geometry::uv_sphere(0.5, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
            sphere_visual,
            sphere_brush,
        )
        .with_position(Vec3::new(-1.0, 2.0, 0.5));

        let light = LightSource::point(
            Color::WHITE,
            20.0,
            Transform::from_position(Vec3::new(-1.0, 2.0, 3.0)),
        );

        Self {
            solids: SolidPair { box_solid, sphere },
            light,
            ambient: AmbientLight {
                color: Color::from_hex(0xb0bec5),
                intensity: 0.35,
            },
            evaluated: EvaluatedMesh::new(evaluated_default),
            edges: EdgesHelper::new(accent),
            grid: GridHelper::new(
                options.grid_size,
                options.grid_divisions,
                Color::from_hex(0x888888),
                Color::from_hex(0x444444),
            ),
            materials,
            clear_color: Color::from_hex(options.clear_color),
        }
    }

    /// Register a presentation material for each brush material and map one to the other
    pub fn create_material_map(&mut self) -> MaterialMap {
        let mut map = MaterialMap::new();
        for kind in SolidKind::ALL {
            let brush = self.solids.get(kind).brush.material;
            if map.contains(brush) {
                continue;
            }
            if let Some(presentation) = self.materials.add_presentation_of(brush) {
                map.insert(brush, presentation);
            }
        }
        log::debug!("Material map built with {} entries", map.len());
        map
    }

    /// Current transform of an entity's manipulated node
    pub fn entity_transform(&self, entity: EntityKind) -> &Transform {
        match entity {
            EntityKind::Solid(kind) => &self.solids.get(kind).visual.node.transform,
            EntityKind::Light => &self.light.node.transform,
        }
    }

    pub fn entity_transform_mut(&mut self, entity: EntityKind) -> &mut Transform {
        match entity {
            EntityKind::Solid(kind) => &mut self.solids.get_mut(kind).visual.node.transform,
            EntityKind::Light => &mut self.light.node.transform,
        }
    }

    pub fn is_enabled(&self, entity: EntityKind) -> bool {
        match entity {
            EntityKind::Solid(kind) => self.solids.get(kind).enabled,
            EntityKind::Light => self.light.enabled,
        }
    }

    /// Flip the enabled flag and return the new value
    pub fn toggle_enabled(&mut self, entity: EntityKind) -> bool {
        let flag = match entity {
            EntityKind::Solid(kind) => &mut self.solids.get_mut(kind).enabled,
            EntityKind::Light => &mut self.light.enabled,
        };
        *flag = !*flag;
        *flag
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneOptions::default())
    }
}
