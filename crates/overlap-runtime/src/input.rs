//! Input interpretation
//!
//! Platform events arrive as [`InputEvent`]s and are turned into
//! [`EditorCommand`]s by [`interpret`], which only reads the current editor
//! state. The editor applies the commands.

use crate::widget::WidgetDrag;
use overlap_core::{EntityKind, TransformMode};

/// A keyboard key, normalized so that character keys are lower case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Shift,
    Escape,
    Other(String),
}

impl Key {
    /// Parse a key name as delivered by a platform or a panel button
    pub fn parse(name: &str) -> Self {
        match name {
            "Shift" | "ShiftLeft" | "ShiftRight" => return Key::Shift,
            "Escape" | "Esc" => return Key::Escape,
            "Space" => return Key::Char(' '),
            _ => {}
        }

        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
            _ => Key::Other(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed at viewport pixel (`x`, `y`). `target_key` is set when
    /// the press landed on a panel button carrying a key.
    PointerDown {
        x: f32,
        y: f32,
        target_key: Option<String>,
    },
    KeyDown(Key),
    KeyUp(Key),
    Resize {
        width: u32,
        height: u32,
    },
    /// The widget started or stopped a drag
    WidgetDragging(bool),
    /// The widget moved its entity
    WidgetDrag(WidgetDrag),
    Orbit {
        dx: f32,
        dy: f32,
    },
    Pan {
        dx: f32,
        dy: f32,
    },
    Zoom(f32),
}

/// Everything the editor knows how to do in response to input
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    Select(EntityKind),
    Deselect,
    /// Ray-pick at a viewport pixel and select what is hit
    PickAt { x: f32, y: f32 },
    SetMode(TransformMode),
    ToggleSpace,
    EnableSnap,
    ClearSnap,
    ToggleEnabled,
    Resize { width: u32, height: u32 },
    SetDragging(bool),
    ApplyDrag(WidgetDrag),
    OrbitCamera { dx: f32, dy: f32 },
    PanCamera { dx: f32, dy: f32 },
    ZoomCamera(f32),
}

/// The parts of editor state that decide how input is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub selected: Option<EntityKind>,
    pub mode: TransformMode,
    pub dragging: bool,
}

/// Commands for a key press. Unbound keys produce nothing.
pub fn key_down_commands(key: &Key, ctx: &InputContext) -> Vec<EditorCommand> {
    match key {
        Key::Shift => vec![EditorCommand::EnableSnap],
        Key::Escape => vec![EditorCommand::Deselect],
        Key::Char('q') => vec![EditorCommand::ToggleSpace],
        Key::Char('w') => vec![EditorCommand::SetMode(TransformMode::Translate)],
        Key::Char('e') => vec![EditorCommand::SetMode(TransformMode::Rotate)],
        Key::Char('r') => {
            if ctx.selected == Some(EntityKind::Light) {
                Vec::new()
            } else {
                vec![EditorCommand::SetMode(TransformMode::Scale)]
            }
        }
        Key::Char('s') => vec![EditorCommand::Select(EntityKind::BOX)],
        Key::Char('d') => vec![EditorCommand::Select(EntityKind::SPHERE)],
        Key::Char('f') => {
            let mut commands = Vec::with_capacity(2);
            if ctx.mode == TransformMode::Scale {
                commands.push(EditorCommand::SetMode(TransformMode::Translate));
            }
            commands.push(EditorCommand::Select(EntityKind::Light));
            commands
        }
        Key::Char(' ') if ctx.selected.is_some() => vec![EditorCommand::ToggleEnabled],
        _ => Vec::new(),
    }
}

pub fn interpret(event: &InputEvent, ctx: &InputContext) -> Vec<EditorCommand> {
    match event {
        InputEvent::PointerDown { x, y, target_key } => {
            if let Some(key) = target_key {
                return key_down_commands(&Key::parse(key), ctx);
            }
            if ctx.dragging {
                return Vec::new();
            }
            vec![EditorCommand::PickAt { x: *x, y: *y }]
        }
        InputEvent::KeyDown(key) => key_down_commands(key, ctx),
        InputEvent::KeyUp(Key::Shift) => vec![EditorCommand::ClearSnap],
        InputEvent::KeyUp(_) => Vec::new(),
        InputEvent::Resize { width, height } => vec![EditorCommand::Resize {
            width: *width,
            height: *height,
        }],
        InputEvent::WidgetDragging(dragging) => vec![EditorCommand::SetDragging(*dragging)],
        InputEvent::WidgetDrag(drag) => vec![EditorCommand::ApplyDrag(*drag)],
        InputEvent::Orbit { dx, dy } => vec![EditorCommand::OrbitCamera { dx: *dx, dy: *dy }],
        InputEvent::Pan { dx, dy } => vec![EditorCommand::PanCamera { dx: *dx, dy: *dy }],
        InputEvent::Zoom(amount) => vec![EditorCommand::ZoomCamera(*amount)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(selected: Option<EntityKind>, mode: TransformMode) -> InputContext {
        InputContext {
            selected,
            mode,
            dragging: false,
        }
    }

    #[test]
    fn key_parsing_normalizes_case() {
        assert_eq!(Key::parse("W"), Key::Char('w'));
        assert_eq!(Key::parse(" "), Key::Char(' '));
        assert_eq!(Key::parse("Shift"), Key::Shift);
        assert_eq!(Key::parse("Escape"), Key::Escape);
        assert_eq!(Key::parse("F5"), Key::Other("F5".into()));
    }

    #[test]
    fn scale_is_ignored_while_light_selected() {
        let light = ctx(Some(EntityKind::Light), TransformMode::Translate);
        assert!(key_down_commands(&Key::Char('r'), &light).is_empty());

        let sphere = ctx(Some(EntityKind::SPHERE), TransformMode::Translate);
        assert_eq!(
            key_down_commands(&Key::Char('r'), &sphere),
            vec![EditorCommand::SetMode(TransformMode::Scale)]
        );
    }

    #[test]
    fn light_hotkey_leaves_scale_mode_first() {
        let commands = key_down_commands(&Key::Char('f'), &ctx(None, TransformMode::Scale));
        assert_eq!(
            commands,
            vec![
                EditorCommand::SetMode(TransformMode::Translate),
                EditorCommand::Select(EntityKind::Light),
            ]
        );
        let commands = key_down_commands(&Key::Char('f'), &ctx(None, TransformMode::Rotate));
        assert_eq!(commands, vec![EditorCommand::Select(EntityKind::Light)]);
    }

    #[test]
    fn space_needs_a_selection() {
        assert!(key_down_commands(&Key::Char(' '), &ctx(None, TransformMode::Translate)).is_empty());
        assert_eq!(
            key_down_commands(&Key::Char(' '), &ctx(Some(EntityKind::BOX), TransformMode::Translate)),
            vec![EditorCommand::ToggleEnabled]
        );
    }

    #[test]
    fn panel_button_bypasses_picking() {
        let event = InputEvent::PointerDown {
            x: 10.0,
            y: 10.0,
            target_key: Some("D".into()),
        };
        let mut context = ctx(None, TransformMode::Translate);
        context.dragging = true;
        assert_eq!(
            interpret(&event, &context),
            vec![EditorCommand::Select(EntityKind::SPHERE)]
        );
    }

    #[test]
    fn pointer_is_ignored_mid_drag() {
        let event = InputEvent::PointerDown {
            x: 10.0,
            y: 20.0,
            target_key: None,
        };
        let mut context = ctx(Some(EntityKind::BOX), TransformMode::Translate);
        assert_eq!(
            interpret(&event, &context),
            vec![EditorCommand::PickAt { x: 10.0, y: 20.0 }]
        );
        context.dragging = true;
        assert!(interpret(&event, &context).is_empty());
    }

    #[test]
    fn shift_release_clears_snaps() {
        let context = InputContext::default();
        assert_eq!(
            interpret(&InputEvent::KeyDown(Key::Shift), &context),
            vec![EditorCommand::EnableSnap]
        );
        assert_eq!(
            interpret(&InputEvent::KeyUp(Key::Shift), &context),
            vec![EditorCommand::ClearSnap]
        );
        assert!(interpret(&InputEvent::KeyUp(Key::Char('w')), &context).is_empty());
    }
}
