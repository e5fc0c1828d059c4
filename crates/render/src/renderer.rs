use glam::Vec3;
use skatepark_kernel::{CameraRig, Session};
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
        }
    }
}

impl RenderView {
    /// View through the chase camera.
    pub fn from_rig(rig: &CameraRig) -> Self {
        Self {
            eye: rig.eye,
            target: rig.target,
            ..Self::default()
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the session and a view, then produces output. It
/// never mutates the session.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given session and view.
    fn render(&self, session: &Session, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable text frame. Used by the CLI and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, session: &Session, view: &RenderView) -> String {
        let s = session.skater();
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== frame {} state={} ===",
            session.frame(),
            session.state()
        );
        let _ = writeln!(
            out,
            "Board: pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2}) vy={:.2} flip={:.2}",
            s.position.x,
            s.position.y,
            s.position.z,
            s.rotation.x,
            s.rotation.y,
            s.rotation.z,
            s.velocity_y,
            s.flip_rotation
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );
        if let Some(landing) = session.last_landing() {
            let _ = writeln!(
                out,
                "Last: {} airtime={:.2}s turns={:.2}",
                landing.trick, landing.airtime, landing.rotation_turns
            );
        }
        out
    }
}
