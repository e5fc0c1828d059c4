use skatepark_common::{MoveDir, Trick};

/// A high-level action produced from raw key events.
///
/// The kernel consumes actions, never raw input events, so the desktop
/// window, the CLI and tests all drive the skater the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Launch into a trick. Only honored while the skater is idle.
    Trick(Trick),
    /// A movement key was pressed (`held = true`) or released.
    Move { dir: MoveDir, held: bool },
}

/// A physical key event as delivered by the host window.
///
/// `code` uses the physical key names shared by DOM `KeyboardEvent.code`
/// and winit's `KeyCode` (`"Space"`, `"KeyE"`, `"ArrowUp"` ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Down { code: String, repeat: bool },
    Up { code: String },
}

impl KeyEvent {
    pub fn down(code: impl Into<String>) -> Self {
        Self::Down {
            code: code.into(),
            repeat: false,
        }
    }

    pub fn repeat(code: impl Into<String>) -> Self {
        Self::Down {
            code: code.into(),
            repeat: true,
        }
    }

    pub fn up(code: impl Into<String>) -> Self {
        Self::Up { code: code.into() }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Down { code, .. } | Self::Up { code } => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_code_accessor() {
        assert_eq!(KeyEvent::down("KeyE").code(), "KeyE");
        assert_eq!(KeyEvent::up("Space").code(), "Space");
    }

    #[test]
    fn repeat_constructor_sets_flag() {
        assert!(matches!(
            KeyEvent::repeat("KeyZ"),
            KeyEvent::Down { repeat: true, .. }
        ));
    }

    #[test]
    fn action_move_is_constructible() {
        let a = Action::Move {
            dir: MoveDir::Left,
            held: true,
        };
        assert!(matches!(a, Action::Move { held: true, .. }));
    }
}
