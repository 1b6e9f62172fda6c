//! Which entity is being edited

use crate::panels::{PanelId, Panels};
use crate::widget::TransformWidget;
use overlap_core::{EntityKind, TransformMode};

/// The selected entity and the panel bound to it. At most one entity is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entity: Option<EntityKind>,
    panel: Option<PanelId>,
}

impl Selection {
    pub fn entity(&self) -> Option<EntityKind> {
        self.entity
    }

    pub fn panel(&self) -> Option<PanelId> {
        self.panel
    }

    pub fn is_selected(&self, entity: EntityKind) -> bool {
        self.entity == Some(entity)
    }

    /// Select `entity` and attach the widget to it. `None` deselects.
    pub fn select(
        &mut self,
        entity: Option<EntityKind>,
        widget: &mut TransformWidget,
        panels: &Panels,
    ) {
        let Some(entity) = entity else {
            self.deselect(widget);
            return;
        };

        widget.detach();
        if !entity.is_scalable() && widget.mode() == TransformMode::Scale {
            widget.set_mode(TransformMode::Translate);
        }

        self.entity = Some(entity);
        self.panel = panels.for_entity(entity);
        widget.attach(entity);
        log::debug!("Selected {}", entity);
    }

    pub fn deselect(&mut self, widget: &mut TransformWidget) {
        if let Some(previous) = self.entity.take() {
            log::debug!("Deselected {}", previous);
        }
        self.panel = None;
        widget.detach();
    }
}
