//! View transform driven by mouse input
//!
//! The eye is fixed; the scene itself is rotated and translated by the mouse.

use glam::{Mat4, Vec3};

/// Degrees of rotation per pixel of drag
pub const INCREMENT_ROT: f32 = 0.5;
/// Scene units of translation per pixel of right-drag
pub const INCREMENT_TRANSLATE: f32 = 0.01;
/// Scene units of depth per wheel line
pub const ZOOM_STEP: f32 = 0.5;

pub const EYE: Vec3 = Vec3::new(25.0, 25.0, 25.0);
pub const FOVY_DEG: f32 = 45.0;
pub const ZNEAR: f32 = 0.5;
pub const ZFAR: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    /// Rotation about X in degrees
    pub spin_x_face: f32,
    /// Rotation about Y in degrees
    pub spin_y_face: f32,
    pub model_pos: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl TransformState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            spin_x_face: 0.0,
            spin_y_face: 0.0,
            model_pos: Vec3::ZERO,
            view: Mat4::look_at_rh(EYE, Vec3::ZERO, Vec3::Y),
            projection: Self::perspective(width, height),
        }
    }

    fn perspective(width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_rh(FOVY_DEG.to_radians(), aspect, ZNEAR, ZFAR)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection = Self::perspective(width, height);
    }

    /// Accumulate a drag of `(dx, dy)` pixels into the rotation angles.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.spin_y_face += INCREMENT_ROT * dx;
        self.spin_x_face += INCREMENT_ROT * dy;
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.model_pos.x += INCREMENT_TRANSLATE * dx;
        self.model_pos.y -= INCREMENT_TRANSLATE * dy;
    }

    pub fn zoom(&mut self, lines: f32) {
        self.model_pos.z += ZOOM_STEP * lines;
    }

    /// Zero rotation and translation. View and projection are untouched.
    pub fn reset(&mut self) {
        self.spin_x_face = 0.0;
        self.spin_y_face = 0.0;
        self.model_pos = Vec3::ZERO;
    }

    /// Mouse rotation followed by the translation offset
    pub fn mouse_transform(&self) -> Mat4 {
        let rot_x = Mat4::from_rotation_x(self.spin_x_face.to_radians());
        let rot_y = Mat4::from_rotation_y(self.spin_y_face.to_radians());
        Mat4::from_translation(self.model_pos) * rot_x * rot_y
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn mvp(&self) -> Mat4 {
        self.view_projection() * self.mouse_transform()
    }

    /// Inverse-transpose of the mouse transform, for normals
    pub fn normal_matrix(&self) -> Mat4 {
        self.mouse_transform().inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_idempotent() {
        let mut t = TransformState::new(800, 600);
        t.rotate(40.0, -12.0);
        t.translate(3.0, 4.0);
        t.zoom(2.0);

        t.reset();
        assert_eq!((t.spin_x_face, t.spin_y_face), (0.0, 0.0));
        assert_eq!(t.model_pos, Vec3::ZERO);

        let once = t;
        t.reset();
        assert_eq!(t, once);
    }

    #[test]
    fn drag_accumulates() {
        let mut t = TransformState::new(800, 600);
        t.rotate(10.0, 4.0);
        t.rotate(10.0, 4.0);
        assert_eq!(t.spin_y_face, 20.0 * INCREMENT_ROT);
        assert_eq!(t.spin_x_face, 8.0 * INCREMENT_ROT);
    }

    #[test]
    fn identity_mouse_transform_after_reset() {
        let mut t = TransformState::new(1024, 768);
        t.rotate(33.0, 21.0);
        t.reset();
        assert!(t.mouse_transform().abs_diff_eq(Mat4::IDENTITY, 1e-6));
        assert!(t.mvp().abs_diff_eq(t.projection() * t.view(), 1e-6));
    }

    #[test]
    fn translation_lands_in_last_column() {
        let mut t = TransformState::new(640, 480);
        t.rotate(90.0, 45.0);
        t.model_pos = Vec3::new(1.0, -2.0, 3.0);
        let m = t.mouse_transform();
        assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let t = TransformState::new(800, 600);
        let clip = t.mvp() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn resize_changes_only_projection() {
        let mut t = TransformState::new(800, 600);
        let view = t.view();
        let before = t.projection();
        t.resize(1600, 600);
        assert_eq!(t.view(), view);
        assert_ne!(t.projection(), before);
        // Zero height must not produce NaNs.
        t.resize(800, 0);
        assert!(t.projection().is_finite());
    }
}
