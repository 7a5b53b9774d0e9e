//! Math utilities and types
//!
//! Provides fundamental math types for 3D scene and physics code.
//! Conventions: right-handed, Y-up, default forward is -Z.

pub use nalgebra::{Isometry3, Matrix4, Quaternion, Translation3, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Rigid transform (rotation + translation, no scale) used by the physics bridge
pub type Iso3 = Isometry3<f32>;

/// Default forward axis of an unrotated object
pub fn default_forward() -> Vec3 {
    Vec3::new(0.0, 0.0, -1.0)
}

/// Default up axis of an unrotated object
pub fn default_up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// Compose a local transform matrix as `T * R * S`.
///
/// Scale is applied first, then rotation, then translation.
pub fn compose_trs(position: &Vec3, rotation: &Quat, scale: &Vec3) -> Mat4 {
    Mat4::new_translation(position)
        * rotation.to_homogeneous()
        * Mat4::new_nonuniform_scaling(scale)
}

/// Translation column of an affine matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Build a rigid isometry from a position and rotation
pub fn isometry(position: &Vec3, rotation: &Quat) -> Iso3 {
    Iso3::from_parts(Translation3::from(*position), *rotation)
}

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
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Unsigned angle between two directions in radians.
    ///
    /// Returns 0 when either vector is degenerate.
    pub fn angle_between(a: &Vec3, b: &Vec3) -> f32 {
        let denom = a.norm() * b.norm();
        if denom <= f32::EPSILON {
            return 0.0;
        }
        (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
    }

    /// Any unit vector perpendicular to `v`
    pub fn any_perpendicular(v: &Vec3) -> Vec3 {
        let candidate = if v.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        v.cross(&candidate).normalize()
    }
}

/// Extension trait for Mat4 with camera matrix constructors
pub trait Mat4Ext {
    /// Right-handed OpenGL-style perspective projection (depth mapped to [-1, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        nalgebra::Perspective3::new(aspect, fov_y, near, far).into_inner()
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn trs_applies_scale_then_rotation_then_translation() {
        let position = Vec3::new(1.0, 2.0, 3.0);
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), constants::HALF_PI);
        let scale = Vec3::new(2.0, 2.0, 2.0);
        let matrix = compose_trs(&position, &rotation, &scale);

        // (1,0,0) -> scaled (2,0,0) -> rotated (0,0,-2) -> translated (1,2,1)
        let p = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.coords, Vec3::new(1.0, 2.0, 1.0), epsilon = 1e-5);
        assert_relative_eq!(translation_of(&matrix), position);
    }

    #[test]
    fn angle_between_handles_degenerate_vectors() {
        assert_eq!(utils::angle_between(&Vec3::zeros(), &Vec3::x()), 0.0);
        assert_relative_eq!(
            utils::angle_between(&Vec3::x(), &Vec3::y()),
            constants::HALF_PI,
            epsilon = 1e-6
        );
    }

    #[test]
    fn perpendicular_is_orthogonal() {
        for v in [Vec3::x(), Vec3::y(), Vec3::new(0.3, -0.4, 0.8)] {
            let p = utils::any_perpendicular(&v);
            assert_relative_eq!(p.dot(&v), 0.0, epsilon = 1e-6);
            assert_relative_eq!(p.norm(), 1.0, epsilon = 1e-6);
        }
    }
}
