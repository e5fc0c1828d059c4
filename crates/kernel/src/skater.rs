use glam::Vec3;
use serde::{Deserialize, Serialize};
use skatepark_common::Trick;

/// What the skater is currently doing.
///
/// `Idle` is the only grounded state. Airborne states are entered from
/// `Idle` only and always return to `Idle` on landing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrickState {
    #[default]
    Idle,
    Airborne(Trick),
}

impl TrickState {
    pub fn is_idle(self) -> bool {
        matches!(self, TrickState::Idle)
    }

    pub fn name(self) -> &'static str {
        match self {
            TrickState::Idle => "idle",
            TrickState::Airborne(trick) => trick.name(),
        }
    }
}

impl std::fmt::Display for TrickState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The single controllable board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Skater {
    pub position: Vec3,
    /// Per-axis Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub velocity_y: f32,
    /// Grows while a flip trick is airborne; drives every rotation curve.
    pub flip_rotation: f32,
}

impl Skater {
    /// A board resting on the ground at the origin.
    pub fn at_rest(resting_height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, resting_height, 0.0),
            rotation: Vec3::ZERO,
            velocity_y: 0.0,
            flip_rotation: 0.0,
        }
    }

    /// Snap back onto the ground with all motion cleared.
    pub(crate) fn land(&mut self, resting_height: f32) {
        self.position.y = resting_height;
        self.rotation = Vec3::ZERO;
        self.velocity_y = 0.0;
        self.flip_rotation = 0.0;
    }
}

/// Board rotation for `trick` given the current flip accumulator.
///
/// A plain jump leaves the rotation as it was.
pub fn trick_rotation(trick: Trick, flip: f32, current: Vec3) -> Vec3 {
    match trick {
        Trick::Jump => current,
        Trick::Flip => Vec3::new(0.0, 0.0, flip),
        Trick::TreFlip => Vec3::new(0.0, -flip, flip),
        Trick::HardFlip => Vec3::new(0.0, flip / 2.0, flip),
    }
}
