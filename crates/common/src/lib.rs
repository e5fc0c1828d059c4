//! Shared types and tuning for the skatepark demo.

pub mod tuning;
pub mod types;

pub use tuning::{ConfigError, Tuning, load_yaml};
pub use types::{MoveDir, MoveIntent, Trick, euler_to_quat};
