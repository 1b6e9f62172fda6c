//! Materials, the material library, and the brush-to-presentation map

use overlap_core::{Color, OverlapError, Result};
use std::collections::HashMap;
use std::fmt;

/// Stable handle to a material in a `MaterialLibrary`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material#{}", self.0)
    }
}

/// Which triangle faces are drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

/// Depth offset applied while rasterizing, to avoid z-fighting with coplanar surfaces
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonOffset {
    pub factor: f32,
    pub units: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    /// Lit, physically-based surface
    Standard,
    /// Brush preview surface with an optional grid pattern
    Grid,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub kind: MaterialKind,
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub depth_write: bool,
    pub side: Side,
    pub polygon_offset: Option<PolygonOffset>,
    pub premultiplied_alpha: bool,
    pub enable_grid: bool,
}

impl Material {
    /// Opaque standard surface used by visual meshes
    fn standard(id: MaterialId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: MaterialKind::Standard,
            color: Color::WHITE,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            transparent: false,
            depth_write: true,
            side: Side::Front,
            polygon_offset: None,
            premultiplied_alpha: false,
            enable_grid: false,
        }
    }

    /// Translucent brush preview, offset so it never z-fights the visual mesh
    fn brush_preview(id: MaterialId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: MaterialKind::Grid,
            color: Color::WHITE,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 0.15,
            transparent: true,
            depth_write: false,
            side: Side::Double,
            polygon_offset: Some(PolygonOffset {
                factor: 0.2,
                units: 0.2,
            }),
            premultiplied_alpha: true,
            enable_grid: false,
        }
    }

    /// Opaque, front-sided clone of this material for the evaluated mesh
    fn presentation_of(&self, id: MaterialId) -> Self {
        Self {
            id,
            name: format!("{}.evaluated", self.name),
            side: Side::Front,
            opacity: 1.0,
            transparent: false,
            depth_write: true,
            enable_grid: false,
            ..self.clone()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }
}

/// Owns every material in the scene
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> MaterialId {
        MaterialId(self.materials.len() as u32)
    }

    fn push(&mut self, material: Material) -> MaterialId {
        let id = material.id;
        self.materials.push(material);
        id
    }

    pub fn add_standard(&mut self, name: &str, configure: impl FnOnce(Material) -> Material) -> MaterialId {
        let material = configure(Material::standard(self.next_id(), name));
        self.push(material)
    }

    pub fn add_brush_preview(
        &mut self,
        name: &str,
        configure: impl FnOnce(Material) -> Material,
    ) -> MaterialId {
        let material = configure(Material::brush_preview(self.next_id(), name));
        self.push(material)
    }

    /// Register the presentation clone of `source`. Returns None if `source` is unknown.
    pub fn add_presentation_of(&mut self, source: MaterialId) -> Option<MaterialId> {
        let material = self.get(source)?.presentation_of(self.next_id());
        Some(self.push(material))
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Maps each brush material the evaluator can emit to its presentation material.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct MaterialMap {
    entries: HashMap<MaterialId, MaterialId>,
}

impl MaterialMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, brush: MaterialId, presentation: MaterialId) {
        self.entries.insert(brush, presentation);
    }

    pub fn contains(&self, brush: MaterialId) -> bool {
        self.entries.contains_key(&brush)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the presentation material for a brush material
    pub fn resolve(&self, brush: MaterialId) -> Result<MaterialId> {
        self.entries
            .get(&brush)
            .copied()
            .ok_or_else(|| OverlapError::UnmappedMaterial(brush.to_string()))
    }

    /// Resolve every per-group material, failing on the first unmapped one
    pub fn remap(&self, materials: &[MaterialId]) -> Result<Vec<MaterialId>> {
        materials.iter().map(|m| self.resolve(*m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brush_preview_defaults() {
        let mut lib = MaterialLibrary::new();
        let id = lib.add_brush_preview("box.brush", |m| m);
        let m = lib.get(id).unwrap();
        assert_eq!(m.kind, MaterialKind::Grid);
        assert_eq!(m.opacity, 0.15);
        assert!(m.transparent);
        assert!(!m.depth_write);
        assert_eq!(m.side, Side::Double);
        assert!(m.premultiplied_alpha);
        assert!(!m.enable_grid);
        assert_eq!(
            m.polygon_offset,
            Some(PolygonOffset {
                factor: 0.2,
                units: 0.2
            })
        );
    }

    #[test]
    fn presentation_clone_is_opaque_front_sided() {
        let mut lib = MaterialLibrary::new();
        let pink = Color::from_hex(0xE91E63);
        let brush = lib.add_brush_preview("sphere.brush", |m| {
            m.with_color(pink).with_roughness(0.25)
        });
        let shown = lib.add_presentation_of(brush).unwrap();
        assert_ne!(brush, shown);

        let m = lib.get(shown).unwrap();
        assert_eq!(m.side, Side::Front);
        assert_eq!(m.opacity, 1.0);
        assert!(!m.transparent);
        assert!(m.depth_write);
        assert_eq!(m.color, pink);
        assert_eq!(m.roughness, 0.25);
        assert_eq!(m.kind, MaterialKind::Grid);
    }

    #[test]
    fn map_resolves_known_and_rejects_unknown() {
        let mut lib = MaterialLibrary::new();
        let brush = lib.add_brush_preview("box.brush", |m| m);
        let shown = lib.add_presentation_of(brush).unwrap();
        let stray = lib.add_standard("stray", |m| m);

        let mut map = MaterialMap::new();
        map.insert(brush, shown);

        assert_eq!(map.resolve(brush).unwrap(), shown);
        assert_eq!(map.remap(&[brush, brush]).unwrap(), vec![shown, shown]);

        let err = map.remap(&[brush, stray]).unwrap_err();
        assert!(matches!(err, OverlapError::UnmappedMaterial(_)));
        assert!(err.is_fatal());
    }
}
