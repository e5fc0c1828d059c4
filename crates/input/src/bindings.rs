use crate::action::{Action, KeyEvent};
use serde::{Deserialize, Serialize};
use skatepark_common::{MoveDir, Trick};
use std::collections::BTreeMap;

/// Errors from building or loading key bindings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("unknown action '{0}' (expected a trick or a movement direction)")]
    UnknownAction(String),
    #[error("empty key code bound to '{0}'")]
    EmptyCode(String),
}

/// What a physical key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Binding {
    Trick(Trick),
    Move(MoveDir),
}

impl TryFrom<String> for Binding {
    type Error = BindingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if let Ok(trick) = value.parse::<Trick>() {
            return Ok(Self::Trick(trick));
        }
        value
            .parse::<MoveDir>()
            .map(Self::Move)
            .map_err(|_| BindingError::UnknownAction(value))
    }
}

impl From<Binding> for String {
    fn from(b: Binding) -> Self {
        match b {
            Binding::Trick(t) => t.name().to_string(),
            Binding::Move(d) => d.name().to_string(),
        }
    }
}

/// Physical key code to binding table.
///
/// Defaults follow the AZERTY layout: ZQSD moves, Space jumps, E/R/F flip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Binding>", into = "BTreeMap<String, Binding>")]
pub struct KeyBindings {
    map: BTreeMap<String, Binding>,
}

impl TryFrom<BTreeMap<String, Binding>> for KeyBindings {
    type Error = BindingError;

    fn try_from(map: BTreeMap<String, Binding>) -> Result<Self, Self::Error> {
        if let Some((_, b)) = map.iter().find(|(code, _)| code.trim().is_empty()) {
            return Err(BindingError::EmptyCode(String::from(*b)));
        }
        Ok(Self { map })
    }
}

impl From<KeyBindings> for BTreeMap<String, Binding> {
    fn from(b: KeyBindings) -> Self {
        b.map
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::azerty()
    }
}

impl KeyBindings {
    /// An empty table; every key is ignored.
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub fn azerty() -> Self {
        Self::with_movement(["KeyZ", "KeyS", "KeyQ", "KeyD"])
    }

    pub fn qwerty() -> Self {
        Self::with_movement(["KeyW", "KeyS", "KeyA", "KeyD"])
    }

    fn with_movement(codes: [&str; 4]) -> Self {
        let mut b = Self::empty();
        b.bind("Space", Binding::Trick(Trick::Jump));
        b.bind("KeyE", Binding::Trick(Trick::Flip));
        b.bind("KeyR", Binding::Trick(Trick::TreFlip));
        b.bind("KeyF", Binding::Trick(Trick::HardFlip));
        for (code, dir) in codes.into_iter().zip(MoveDir::ALL) {
            b.bind(code, Binding::Move(dir));
        }
        b
    }

    /// Bind a key, returning what it was bound to before.
    pub fn bind(&mut self, code: impl Into<String>, binding: Binding) -> Option<Binding> {
        let code = code.into();
        tracing::debug!(%code, binding = %String::from(binding), "bind key");
        self.map.insert(code, binding)
    }

    pub fn get(&self, code: &str) -> Option<Binding> {
        self.map.get(code).copied()
    }

    /// Key codes bound to `binding`, in code order.
    pub fn codes_for(&self, binding: Binding) -> impl Iterator<Item = &str> {
        self.map
            .iter()
            .filter(move |(_, b)| **b == binding)
            .map(|(code, _)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Translate a key event into an action.
    ///
    /// Trick keys fire on every key-down, auto-repeat included. Movement keys
    /// ignore auto-repeat and report both press and release. Unbound keys and
    /// trick key releases produce nothing.
    pub fn translate(&self, event: &KeyEvent) -> Option<Action> {
        let binding = self.get(event.code())?;
        match (binding, event) {
            (Binding::Trick(trick), KeyEvent::Down { .. }) => Some(Action::Trick(trick)),
            (Binding::Trick(_), KeyEvent::Up { .. }) => None,
            (Binding::Move(_), KeyEvent::Down { repeat: true, .. }) => None,
            (Binding::Move(dir), KeyEvent::Down { repeat: false, .. }) => {
                Some(Action::Move { dir, held: true })
            }
            (Binding::Move(dir), KeyEvent::Up { .. }) => Some(Action::Move { dir, held: false }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_trick_keys() {
        let b = KeyBindings::default();
        assert_eq!(b.get("Space"), Some(Binding::Trick(Trick::Jump)));
        assert_eq!(b.get("KeyE"), Some(Binding::Trick(Trick::Flip)));
        assert_eq!(b.get("KeyR"), Some(Binding::Trick(Trick::TreFlip)));
        assert_eq!(b.get("KeyF"), Some(Binding::Trick(Trick::HardFlip)));
        assert_eq!(b.len(), 8);
    }

    #[test]
    fn azerty_and_qwerty_movement() {
        assert_eq!(
            KeyBindings::azerty().get("KeyZ"),
            Some(Binding::Move(MoveDir::Forward))
        );
        assert_eq!(
            KeyBindings::azerty().get("KeyQ"),
            Some(Binding::Move(MoveDir::Left))
        );
        assert_eq!(
            KeyBindings::qwerty().get("KeyW"),
            Some(Binding::Move(MoveDir::Forward))
        );
        assert_eq!(KeyBindings::qwerty().get("KeyZ"), None);
    }

    #[test]
    fn trick_fires_on_repeat() {
        let b = KeyBindings::default();
        assert_eq!(
            b.translate(&KeyEvent::repeat("KeyE")),
            Some(Action::Trick(Trick::Flip))
        );
        assert_eq!(b.translate(&KeyEvent::up("KeyE")), None);
    }

    #[test]
    fn movement_ignores_repeat() {
        let b = KeyBindings::default();
        assert_eq!(b.translate(&KeyEvent::repeat("KeyZ")), None);
        assert_eq!(
            b.translate(&KeyEvent::down("KeyZ")),
            Some(Action::Move {
                dir: MoveDir::Forward,
                held: true
            })
        );
        assert_eq!(
            b.translate(&KeyEvent::up("KeyZ")),
            Some(Action::Move {
                dir: MoveDir::Forward,
                held: false
            })
        );
    }

    #[test]
    fn unknown_codes_ignored() {
        let b = KeyBindings::default();
        assert_eq!(b.translate(&KeyEvent::down("KeyX")), None);
        assert_eq!(b.translate(&KeyEvent::up("Escape")), None);
    }

    #[test]
    fn rebinding_returns_previous() {
        let mut b = KeyBindings::default();
        let prev = b.bind("KeyE", Binding::Trick(Trick::HardFlip));
        assert_eq!(prev, Some(Binding::Trick(Trick::Flip)));
        let codes: Vec<&str> = b.codes_for(Binding::Trick(Trick::HardFlip)).collect();
        assert_eq!(codes, vec!["KeyE", "KeyF"]);
    }

    #[test]
    fn yaml_table_parses() {
        let b: KeyBindings = serde_yaml::from_str("Space: jump\nKeyJ: treflip\nArrowUp: forward\n")
            .unwrap();
        assert_eq!(b.get("KeyJ"), Some(Binding::Trick(Trick::TreFlip)));
        assert_eq!(b.get("ArrowUp"), Some(Binding::Move(MoveDir::Forward)));
    }

    #[test]
    fn yaml_unknown_action_rejected() {
        let res: Result<KeyBindings, _> = serde_yaml::from_str("KeyO: ollie\n");
        assert!(res.is_err());
    }

    #[test]
    fn yaml_empty_code_rejected() {
        let res: Result<KeyBindings, _> = serde_yaml::from_str("'': jump\n");
        assert!(res.is_err());
    }
}
