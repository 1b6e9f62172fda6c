//! Info panels shown beside the viewport
//!
//! Panels are looked up by class name (`info__<TypeName>`), never owned by the
//! selection. Each panel carries key buttons that dispatch as hotkeys.

use overlap_core::EntityKind;

pub const CLASS_PREFIX: &str = "info__";
pub const DISABLED_CLASS: &str = "info__disabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Box,
    Sphere,
    Light,
    Controls,
}

/// A clickable label that behaves like pressing `key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyButton {
    pub label: &'static str,
    pub key: &'static str,
}

impl KeyButton {
    const fn new(label: &'static str, key: &'static str) -> Self {
        Self { label, key }
    }
}

#[derive(Debug, Clone)]
pub struct InfoPanel {
    pub id: PanelId,
    pub class_name: String,
    pub title: &'static str,
    pub buttons: Vec<KeyButton>,
    pub disabled: bool,
}

impl InfoPanel {
    fn new(id: PanelId, type_name: &str, title: &'static str, buttons: Vec<KeyButton>) -> Self {
        Self {
            id,
            class_name: format!("{CLASS_PREFIX}{type_name}"),
            title,
            buttons,
            disabled: false,
        }
    }

    /// Class list as it would appear on the element
    pub fn classes(&self) -> Vec<&str> {
        let mut classes = vec!["info", self.class_name.as_str()];
        if self.disabled {
            classes.push(DISABLED_CLASS);
        }
        classes
    }
}

#[derive(Debug, Clone)]
pub struct Panels {
    panels: Vec<InfoPanel>,
}

impl Default for Panels {
    fn default() -> Self {
        Self::new()
    }
}

impl Panels {
    pub fn new() -> Self {
        let toggle = KeyButton::new("Space", " ");
        let panels = vec![
            InfoPanel::new(
                PanelId::Box,
                EntityKind::BOX.type_name(),
                "Box",
                vec![KeyButton::new("S", "s"), toggle.clone()],
            ),
            InfoPanel::new(
                PanelId::Sphere,
                EntityKind::SPHERE.type_name(),
                "Sphere",
                vec![KeyButton::new("D", "d"), toggle.clone()],
            ),
            InfoPanel::new(
                PanelId::Light,
                EntityKind::Light.type_name(),
                "Light",
                vec![KeyButton::new("F", "f"), toggle],
            ),
            InfoPanel::new(
                PanelId::Controls,
                "Controls",
                "Controls",
                vec![
                    KeyButton::new("W", "w"),
                    KeyButton::new("E", "e"),
                    KeyButton::new("R", "r"),
                    KeyButton::new("Q", "q"),
                    KeyButton::new("Esc", "Escape"),
                ],
            ),
        ];
        Self { panels }
    }

    /// Find a panel by its `info__*` class name
    pub fn query(&self, class_name: &str) -> Option<PanelId> {
        self.panels
            .iter()
            .find(|p| p.class_name == class_name)
            .map(|p| p.id)
    }

    pub fn for_entity(&self, entity: EntityKind) -> Option<PanelId> {
        self.query(&format!("{CLASS_PREFIX}{}", entity.type_name()))
    }

    pub fn get(&self, id: PanelId) -> Option<&InfoPanel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn set_disabled(&mut self, id: PanelId, disabled: bool) {
        if let Some(panel) = self.panels.iter_mut().find(|p| p.id == id) {
            panel.disabled = disabled;
        }
    }

    pub fn is_disabled(&self, id: PanelId) -> bool {
        self.get(id).is_some_and(|p| p.disabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InfoPanel> {
        self.panels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_resolve_to_their_panels() {
        let panels = Panels::new();
        assert_eq!(panels.for_entity(EntityKind::BOX), Some(PanelId::Box));
        assert_eq!(panels.for_entity(EntityKind::SPHERE), Some(PanelId::Sphere));
        assert_eq!(panels.for_entity(EntityKind::Light), Some(PanelId::Light));
        assert_eq!(panels.query("info__SphereGeometry"), Some(PanelId::Sphere));
        assert_eq!(panels.query("info__Missing"), None);
    }

    #[test]
    fn disabled_flag_adds_class() {
        let mut panels = Panels::new();
        panels.set_disabled(PanelId::Sphere, true);
        let sphere = panels.get(PanelId::Sphere).unwrap();
        assert!(sphere.classes().contains(&DISABLED_CLASS));
        assert!(!panels.is_disabled(PanelId::Box));
    }
}
