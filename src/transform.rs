use cgmath::{perspective, Deg, Matrix4, Rad, Vector3};

use crate::drag::RotationState;

pub const DEFAULT_FOV: f32 = 45.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 100.0;
/// How far in front of the camera the model sits.
pub const DEFAULT_DISTANCE: f32 = 6.0;

/// Perspective projection that only changes when the aspect ratio does.
#[derive(Debug, Clone)]
pub struct Projection {
    fov: Deg<f32>,
    aspect: f32,
    near: f32,
    far: f32,
    matrix: Matrix4<f32>,
    dirty: bool,
}

impl Projection {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let fov = Deg(fov_degrees);
        let aspect = if valid_aspect(aspect) { aspect } else { 1.0 };

        Self {
            fov,
            aspect,
            near,
            far,
            matrix: perspective(fov, aspect, near, far),
            dirty: true,
        }
    }

    pub fn with_aspect(aspect: f32) -> Self {
        Self::new(DEFAULT_FOV, aspect, DEFAULT_NEAR, DEFAULT_FAR)
    }

    /// Recomputes the matrix for a new aspect ratio.
    ///
    /// Returns `false` and keeps the old matrix when the ratio is unchanged or
    /// unusable (zero-sized or minimized surfaces).
    pub fn set_aspect(&mut self, aspect: f32) -> bool {
        if !valid_aspect(aspect) || aspect == self.aspect {
            return false;
        }

        self.aspect = aspect;
        self.matrix = perspective(self.fov, aspect, self.near, self.far);
        self.dirty = true;

        true
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the matrix if it changed since the last call.
    pub fn take_if_dirty(&mut self) -> Option<Matrix4<f32>> {
        std::mem::take(&mut self.dirty).then_some(self.matrix)
    }
}

fn valid_aspect(aspect: f32) -> bool {
    aspect.is_finite() && aspect > 0.0
}

/// Moves the model `distance` units down -Z, then applies the X and Y
/// rotations in model space.
pub fn model_view(rotation: &RotationState, distance: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(0.0, 0.0, -distance))
        * Matrix4::from_angle_x(Rad(rotation.about_x))
        * Matrix4::from_angle_y(Rad(rotation.about_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{SquareMatrix, Vector4};

    fn reference(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
        let f = 1.0 / (fov_deg.to_radians() / 2.0).tan();

        #[rustfmt::skip]
        let m = Matrix4::new(
            f / aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (far + near) / (near - far), -1.0,
            0.0, 0.0, 2.0 * far * near / (near - far), 0.0,
        );
        m
    }

    #[test]
    fn matches_perspective_formula() {
        for aspect in [0.25, 1.0, 16.0 / 9.0, 4.0] {
            let p = Projection::with_aspect(aspect);
            assert_relative_eq!(
                p.matrix(),
                reference(45.0, aspect, 0.1, 100.0),
                max_relative = 1e-5
            );
        }
    }

    #[test]
    fn resize_is_idempotent() {
        let mut p = Projection::with_aspect(1.5);
        assert!(p.take_if_dirty().is_some());

        let before = p.matrix();
        assert!(!p.set_aspect(1.5));
        assert_eq!(p.matrix(), before);
        assert!(p.take_if_dirty().is_none());

        assert!(p.set_aspect(2.0));
        assert!(p.take_if_dirty().is_some());
        assert!(p.take_if_dirty().is_none());
    }

    #[test]
    fn ignores_degenerate_aspect() {
        let mut p = Projection::with_aspect(1.0);
        assert!(!p.set_aspect(0.0));
        assert!(!p.set_aspect(f32::NAN));
        assert!(!p.set_aspect(f32::INFINITY));
        assert_eq!(p.aspect(), 1.0);

        assert_eq!(Projection::with_aspect(0.0).aspect(), 1.0);
    }

    #[test]
    fn identity_rotation_is_translation() {
        let m = model_view(&RotationState::default(), DEFAULT_DISTANCE);
        let expected = Matrix4::from_translation(Vector3::new(0.0, 0.0, -6.0));

        assert_relative_eq!(m, expected);
    }

    #[test]
    fn translate_then_rotate() {
        let rotation = RotationState {
            about_x: 0.7,
            about_y: -1.1,
        };
        let m = model_view(&rotation, DEFAULT_DISTANCE);

        // the origin of the model stays at the translated point
        let origin = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(origin, Vector4::new(0.0, 0.0, -6.0, 1.0), epsilon = 1e-6);

        // rotating first and translating second would be the other product
        let reversed = Matrix4::from_angle_x(Rad(0.7_f32))
            * Matrix4::from_angle_y(Rad(-1.1_f32))
            * Matrix4::from_translation(Vector3::new(0.0_f32, 0.0, -6.0));
        let moved = reversed * Vector4::new(0.0_f32, 0.0, 0.0, 1.0);
        assert!((moved.z + 6.0).abs() > 1e-3);

        // a model-space point is rotated about X after Y
        let p = m * Vector4::new(1.0, 0.0, 0.0, 1.0);
        let expected = Matrix4::from_translation(Vector3::new(0.0_f32, 0.0, -6.0))
            * (Matrix4::from_angle_x(Rad(0.7_f32))
                * (Matrix4::from_angle_y(Rad(-1.1_f32)) * Vector4::new(1.0, 0.0, 0.0, 1.0)));
        assert_relative_eq!(p, expected, epsilon = 1e-6);
    }

    #[test]
    fn model_view_is_invertible() {
        let rotation = RotationState {
            about_x: 12.0,
            about_y: -40.0,
        };

        assert!(model_view(&rotation, 6.0).invert().is_some());
    }
}
