use glam::{Mat4, Vec3};
use skatepark_common::euler_to_quat;
use skatepark_kernel::Skater;

/// Linear RGBA color from an sRGB `0xRRGGBB` hex value.
pub fn rgb(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0), 1.0]
}

/// Decode one sRGB-encoded channel in `[0, 1]`.
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Static look of the scene: sizes, colors and lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStyle {
    pub background: [f32; 4],
    /// Ground plane extent along X and Z.
    pub ground_size: f32,
    pub ground_color: [f32; 4],
    /// Board box dimensions (width, thickness, length).
    pub board_size: Vec3,
    pub board_color: [f32; 4],
    pub ambient_intensity: f32,
    /// Position of the directional light; it shines toward the origin.
    pub sun_position: Vec3,
    pub sun_intensity: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            background: rgb(0x111111),
            ground_size: 50.0,
            ground_color: rgb(0x444444),
            board_size: Vec3::new(0.3, 0.05, 1.0),
            board_color: rgb(0xff4444),
            ambient_intensity: 0.5,
            sun_position: Vec3::new(5.0, 10.0, 5.0),
            sun_intensity: 1.0,
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl SceneStyle {
    /// Unit direction light travels in.
    pub fn sun_direction(&self) -> Vec3 {
        (-self.sun_position).normalize_or(Vec3::NEG_Y)
    }

    /// Model matrix for a unit cube drawn as the board.
    pub fn board_model(&self, skater: &Skater) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.board_size,
            euler_to_quat(skater.rotation),
            skater.position,
        )
    }

    /// Model matrix for a unit cube drawn as a thin ground slab whose top
    /// face sits at y = 0.
    pub fn ground_model(&self) -> Mat4 {
        let thickness = 0.01;
        Mat4::from_scale_rotation_translation(
            Vec3::new(self.ground_size, thickness, self.ground_size),
            glam::Quat::IDENTITY,
            Vec3::new(0.0, -thickness / 2.0, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        let [r, g, b, a] = rgb(0xff0000);
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!([g, b, a], [0.0, 0.0, 1.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn hex_colors_are_decoded_from_srgb() {
        // 0x11 is about 0.0056 linear; an sRGB surface re-encodes it to 0x11.
        let [r, g, b, a] = rgb(0x111111);
        assert!((r - 0.005_605).abs() < 1e-5);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 1.0);
        let grey = rgb(0x808080)[0];
        assert!((grey - 0.2158).abs() < 1e-3);
        assert!(srgb_to_linear(0.04) < 0.04 / 12.0);
    }

    #[test]
    fn board_model_places_board_on_skater() {
        let style = SceneStyle::default();
        let skater = Skater::at_rest(0.1);
        let m = style.board_model(&skater);
        let center = m.transform_point3(Vec3::ZERO);
        assert!(center.distance(Vec3::new(0.0, 0.1, 0.0)) < 1e-6);
        let tip = m.transform_point3(Vec3::new(0.0, 0.0, 0.5));
        assert!((tip.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ground_top_is_at_zero() {
        let m = SceneStyle::default().ground_model();
        let top = m.transform_point3(Vec3::new(0.0, 0.5, 0.0));
        assert!(top.y.abs() < 1e-6);
    }

    #[test]
    fn sun_points_down() {
        assert!(SceneStyle::default().sun_direction().y < 0.0);
    }
}
