//! Math utilities and types
//!
//! Provides the 2D affine types used by the transform hierarchy. Matrices are
//! homogeneous 3x3 and follow nalgebra's column-vector convention.

pub use nalgebra::{Vector2, Matrix3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 homogeneous matrix type for 2D affine transforms
pub type Mat3 = Matrix3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for 2D affine matrices
pub trait Mat3Ext {
    /// Compose `translate(position - origin * scale) * rotate(rotation) * scale(scale)`
    fn affine_2d(position: Vec2, origin: Vec2, rotation: f32, scale: Vec2) -> Mat3;

    /// Translation part of the matrix
    fn translation_2d(&self) -> Vec2;

    /// Length of the transformed basis vectors
    fn scale_2d(&self) -> Vec2;

    /// Rotation of the transformed X axis, in radians
    fn rotation_2d(&self) -> f32;
}

impl Mat3Ext for Mat3 {
    fn affine_2d(position: Vec2, origin: Vec2, rotation: f32, scale: Vec2) -> Mat3 {
        let pivot = position - origin.component_mul(&scale);
        Mat3::new_translation(&pivot)
            * Mat3::new_rotation(rotation)
            * Mat3::new_nonuniform_scaling(&scale)
    }

    fn translation_2d(&self) -> Vec2 {
        Vec2::new(self.m13, self.m23)
    }

    fn scale_2d(&self) -> Vec2 {
        Vec2::new(
            Vec2::new(self.m11, self.m21).magnitude(),
            Vec2::new(self.m12, self.m22).magnitude(),
        )
    }

    fn rotation_2d(&self) -> f32 {
        self.m21.atan2(self.m11)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_affine_identity() {
        let m = Mat3::affine_2d(Vec2::zeros(), Vec2::zeros(), 0.0, Vec2::new(1.0, 1.0));
        assert_relative_eq!(m, Mat3::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_affine_origin_maps_to_position() {
        // Without rotation the scaled origin lands exactly on `position`
        let origin = Vec2::new(2.0, 1.0);
        let m = Mat3::affine_2d(Vec2::new(10.0, 5.0), origin, 0.0, Vec2::new(2.0, 3.0));
        let p = m.transform_point(&nalgebra::Point2::new(origin.x, origin.y));
        assert_relative_eq!(p.coords, Vec2::new(10.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_decomposition() {
        let m = Mat3::affine_2d(Vec2::new(3.0, -4.0), Vec2::zeros(), 0.75, Vec2::new(2.0, 0.5));
        assert_relative_eq!(m.translation_2d(), Vec2::new(3.0, -4.0), epsilon = 1e-6);
        assert_relative_eq!(m.scale_2d(), Vec2::new(2.0, 0.5), epsilon = 1e-5);
        assert_relative_eq!(m.rotation_2d(), 0.75, epsilon = 1e-5);
    }

    #[test]
    fn test_degree_conversion() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI, epsilon = 1e-6);
        assert_relative_eq!(utils::rad_to_deg(constants::HALF_PI), 90.0, epsilon = 1e-4);
    }
}
