use crate::action::{Action, KeyEvent};
use crate::bindings::KeyBindings;
use std::collections::VecDeque;

/// Default number of pending actions held between frames.
pub const DEFAULT_CAPACITY: usize = 64;

/// Bounded queue of actions waiting for the next frame.
///
/// Host event handlers push key events as they arrive; the frame scheduler
/// drains the queue once at the start of each frame, so per-frame behavior
/// does not depend on when the host dispatches events.
///
/// Movement actions collapse to the latest held/released value per
/// direction and are never dropped, so a key release always reaches the
/// session. The capacity bounds trick presses only; surplus presses are
/// dropped and counted.
#[derive(Debug, Clone)]
pub struct InputQueue {
    bindings: KeyBindings,
    pending: VecDeque<Action>,
    capacity: usize,
    dropped: u64,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputQueue {
    pub fn new(bindings: KeyBindings) -> Self {
        Self::with_capacity(bindings, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(bindings: KeyBindings, capacity: usize) -> Self {
        Self {
            bindings,
            pending: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Translate and enqueue a key event. Returns true if an action was queued.
    pub fn push_key(&mut self, event: &KeyEvent) -> bool {
        match self.bindings.translate(event) {
            Some(action) => self.push(action),
            None => false,
        }
    }

    /// Enqueue an action directly. Returns false if a trick press was
    /// dropped because the queue was full.
    pub fn push(&mut self, action: Action) -> bool {
        match action {
            Action::Move { dir, .. } => {
                self.pending
                    .retain(|pending| !matches!(pending, Action::Move { dir: d, .. } if *d == dir));
            }
            Action::Trick(_) => {
                if self.pending_tricks() >= self.capacity {
                    self.dropped += 1;
                    tracing::warn!(?action, dropped = self.dropped, "input queue full, dropping trick");
                    return false;
                }
            }
        }
        self.pending.push_back(action);
        true
    }

    fn pending_tricks(&self) -> usize {
        self.pending
            .iter()
            .filter(|a| matches!(a, Action::Trick(_)))
            .count()
    }

    /// Take every pending action in arrival order.
    pub fn drain(&mut self) -> Vec<Action> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total trick presses dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skatepark_common::{MoveDir, Trick};

    #[test]
    fn drain_preserves_order() {
        let mut q = InputQueue::default();
        assert!(q.push_key(&KeyEvent::down("KeyZ")));
        assert!(q.push_key(&KeyEvent::down("KeyE")));
        assert!(q.push_key(&KeyEvent::down("KeyD")));
        assert!(q.push_key(&KeyEvent::down("KeyR")));
        let actions = q.drain();
        assert_eq!(
            actions,
            vec![
                Action::Move {
                    dir: MoveDir::Forward,
                    held: true
                },
                Action::Trick(Trick::Flip),
                Action::Move {
                    dir: MoveDir::Right,
                    held: true
                },
                Action::Trick(Trick::TreFlip),
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn movement_collapses_to_latest_per_direction() {
        let mut q = InputQueue::default();
        q.push_key(&KeyEvent::down("KeyZ"));
        q.push_key(&KeyEvent::down("KeyQ"));
        q.push_key(&KeyEvent::up("KeyZ"));
        assert_eq!(
            q.drain(),
            vec![
                Action::Move {
                    dir: MoveDir::Left,
                    held: true
                },
                Action::Move {
                    dir: MoveDir::Forward,
                    held: false
                },
            ]
        );
    }

    #[test]
    fn release_survives_full_queue() {
        let mut q = InputQueue::with_capacity(KeyBindings::default(), 2);
        assert!(q.push_key(&KeyEvent::down("KeyZ")));
        assert!(q.push_key(&KeyEvent::repeat("Space")));
        assert!(q.push_key(&KeyEvent::repeat("Space")));
        assert!(!q.push_key(&KeyEvent::repeat("Space")));
        assert!(q.push_key(&KeyEvent::up("KeyZ")));
        assert_eq!(q.dropped(), 1);
        let actions = q.drain();
        assert_eq!(
            actions.last(),
            Some(&Action::Move {
                dir: MoveDir::Forward,
                held: false
            })
        );
        assert!(!actions.iter().any(|a| matches!(a, Action::Move { held: true, .. })));
    }

    #[test]
    fn unbound_keys_not_queued() {
        let mut q = InputQueue::default();
        assert!(!q.push_key(&KeyEvent::down("KeyP")));
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn overflow_drops_newest() {
        let mut q = InputQueue::with_capacity(KeyBindings::default(), 2);
        assert!(q.push(Action::Trick(Trick::Jump)));
        assert!(q.push(Action::Trick(Trick::Flip)));
        assert!(!q.push(Action::Trick(Trick::HardFlip)));
        assert_eq!(q.dropped(), 1);
        assert_eq!(
            q.drain(),
            vec![Action::Trick(Trick::Jump), Action::Trick(Trick::Flip)]
        );
    }

    #[test]
    fn swapping_bindings_changes_translation() {
        let mut q = InputQueue::default();
        q.set_bindings(KeyBindings::qwerty());
        assert!(q.push_key(&KeyEvent::down("KeyW")));
        assert!(!q.push_key(&KeyEvent::down("KeyZ")));
    }
}
