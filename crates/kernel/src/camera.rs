use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Chase camera that trails the skater by a fixed offset.
///
/// The eye moves a fixed fraction of the way toward its desired position
/// every frame, independent of frame time, so smoothing varies with frame
/// rate. The look target snaps to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
    offset: Vec3,
    blend: f32,
}

impl CameraRig {
    /// A rig framing the origin from `offset`.
    pub fn new(offset: Vec3, blend: f32) -> Self {
        Self {
            eye: offset,
            target: Vec3::ZERO,
            offset,
            blend,
        }
    }

    /// Where the eye is heading for a subject at `subject`.
    pub fn desired_eye(&self, subject: Vec3) -> Vec3 {
        subject + self.offset
    }

    /// Advance one frame toward `subject`.
    pub fn follow(&mut self, subject: Vec3) {
        let desired = self.desired_eye(subject);
        self.eye = self.eye.lerp(desired, self.blend);
        self.target = subject;
    }
}
