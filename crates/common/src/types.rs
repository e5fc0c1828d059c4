use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// An airborne trick the skater can be launched into.
///
/// A plain `Jump` carries no rotation; the flips each drive their own
/// rotation curve from the flip accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trick {
    Jump,
    Flip,
    TreFlip,
    HardFlip,
}

impl Trick {
    pub const ALL: [Trick; 4] = [Trick::Jump, Trick::Flip, Trick::TreFlip, Trick::HardFlip];

    /// Whether the flip accumulator advances while this trick is in the air.
    pub fn rotates(self) -> bool {
        !matches!(self, Trick::Jump)
    }

    pub fn name(self) -> &'static str {
        match self {
            Trick::Jump => "jump",
            Trick::Flip => "flip",
            Trick::TreFlip => "treflip",
            Trick::HardFlip => "hardflip",
        }
    }
}

impl std::fmt::Display for Trick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Trick {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Trick::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown trick '{s}'"))
    }
}

/// One of the four ground-plane movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDir {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveDir {
    pub const ALL: [MoveDir; 4] = [MoveDir::Forward, MoveDir::Back, MoveDir::Left, MoveDir::Right];

    pub fn name(self) -> &'static str {
        match self {
            MoveDir::Forward => "forward",
            MoveDir::Back => "back",
            MoveDir::Left => "left",
            MoveDir::Right => "right",
        }
    }
}

impl std::str::FromStr for MoveDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveDir::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown direction '{s}'"))
    }
}

/// Currently held movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn set(&mut self, dir: MoveDir, held: bool) {
        match dir {
            MoveDir::Forward => self.forward = held,
            MoveDir::Back => self.back = held,
            MoveDir::Left => self.left = held,
            MoveDir::Right => self.right = held,
        }
    }

    pub fn is_held(&self, dir: MoveDir) -> bool {
        match dir {
            MoveDir::Forward => self.forward,
            MoveDir::Back => self.back,
            MoveDir::Left => self.left,
            MoveDir::Right => self.right,
        }
    }

    /// Unnormalized ground-plane direction: x = right - left, z = back - forward.
    pub fn direction(&self) -> Vec3 {
        let axis = |pos: bool, neg: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        Vec3::new(axis(self.right, self.left), 0.0, axis(self.back, self.forward))
    }
}

/// Convert per-axis Euler angles (applied in XYZ order) to a quaternion.
pub fn euler_to_quat(angles: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z)
}
