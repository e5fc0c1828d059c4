use glam::{Mat4, Vec3};
use skatepark_render::{RenderView, SceneStyle};

/// Perspective projection looking from the chase rig's eye at its target.
///
/// Position comes from the kernel every frame; this type only owns the
/// projection parameters that depend on the window.
#[derive(Debug, Clone, Copy)]
pub struct ChaseCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        let style = SceneStyle::default();
        Self {
            eye: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
            fov: style.fov_degrees.to_radians(),
            aspect: 16.0 / 9.0,
            near: style.near,
            far: style.far,
        }
    }
}

impl ChaseCamera {
    pub fn sync(&mut self, view: &RenderView) {
        self.eye = view.eye;
        self.target = view.target;
        self.fov = view.fov_degrees.to_radians();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        // Degenerate when eye == target; fall back to looking down -Z.
        let target = if self.eye.distance_squared(self.target) < f32::EPSILON {
            self.eye + Vec3::NEG_Z
        } else {
            self.target
        };
        Mat4::look_at_rh(self.eye, target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
