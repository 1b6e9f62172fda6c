//! winit keyboard events to editor keys

use overlap_runtime::Key;
use winit::keyboard::{Key as WinitKey, NamedKey};

/// Editor key for a logical winit key. Keys the editor never binds map to None.
pub fn editor_key(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(NamedKey::Shift) => Some(Key::Shift),
        WinitKey::Named(NamedKey::Escape) => Some(Key::Escape),
        WinitKey::Named(NamedKey::Space) => Some(Key::Char(' ')),
        WinitKey::Character(text) => Some(Key::parse(text.as_str())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_are_lower_cased() {
        assert_eq!(editor_key(&WinitKey::Character("W".into())), Some(Key::Char('w')));
        assert_eq!(editor_key(&WinitKey::Character(" ".into())), Some(Key::Char(' ')));
    }

    #[test]
    fn named_keys() {
        assert_eq!(editor_key(&WinitKey::Named(NamedKey::Shift)), Some(Key::Shift));
        assert_eq!(editor_key(&WinitKey::Named(NamedKey::Escape)), Some(Key::Escape));
        assert_eq!(editor_key(&WinitKey::Named(NamedKey::Space)), Some(Key::Char(' ')));
        assert_eq!(editor_key(&WinitKey::Named(NamedKey::Tab)), None);
    }
}
