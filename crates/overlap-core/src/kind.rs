//! Explicit capability tags for the editable entities in a scene

use std::fmt;

/// One of the two solids taking part in the boolean evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolidKind {
    Box,
    Sphere,
}

impl SolidKind {
    pub const ALL: [SolidKind; 2] = [SolidKind::Box, SolidKind::Sphere];
}

/// A transformable, selectable scene entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Solid(SolidKind),
    Light,
}

impl EntityKind {
    pub const BOX: EntityKind = EntityKind::Solid(SolidKind::Box);
    pub const SPHERE: EntityKind = EntityKind::Solid(SolidKind::Sphere);

    /// Type name used to look up the entity's info panel (`info__<name>`)
    pub fn type_name(self) -> &'static str {
        match self {
            EntityKind::Solid(SolidKind::Box) => "BoxGeometry",
            EntityKind::Solid(SolidKind::Sphere) => "SphereGeometry",
            EntityKind::Light => "PointLight",
        }
    }

    /// Lights have no meaningful scale
    pub fn is_scalable(self) -> bool {
        !matches!(self, EntityKind::Light)
    }

    pub fn solid(self) -> Option<SolidKind> {
        match self {
            EntityKind::Solid(kind) => Some(kind),
            EntityKind::Light => None,
        }
    }
}

impl From<SolidKind> for EntityKind {
    fn from(kind: SolidKind) -> Self {
        EntityKind::Solid(kind)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Solid(SolidKind::Box) => "box",
            EntityKind::Solid(SolidKind::Sphere) => "sphere",
            EntityKind::Light => "light",
        };
        f.write_str(label)
    }
}

/// Which transformation the widget applies while dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl TransformMode {
    pub fn label(self) -> &'static str {
        match self {
            TransformMode::Translate => "Translate",
            TransformMode::Rotate => "Rotate",
            TransformMode::Scale => "Scale",
        }
    }
}

/// Reference frame for widget axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformSpace {
    Local,
    #[default]
    World,
}

impl TransformSpace {
    pub fn toggled(self) -> Self {
        match self {
            TransformSpace::Local => TransformSpace::World,
            TransformSpace::World => TransformSpace::Local,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransformSpace::Local => "Local",
            TransformSpace::World => "World",
        }
    }
}
