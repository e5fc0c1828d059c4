//! Input mapping: physical key events to skater actions.
//!
//! # Invariants
//! - The kernel only ever sees `Action`s, never raw key events.
//! - Actions are queued and sampled once per frame.

pub mod action;
pub mod bindings;
pub mod queue;

pub use action::{Action, KeyEvent};
pub use bindings::{Binding, BindingError, KeyBindings};
pub use queue::InputQueue;
