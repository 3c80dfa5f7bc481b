//! Math utilities and types
//!
//! All geometry in this crate is double precision. The aliases below are the
//! only way the rest of the crate names nalgebra types.

pub use nalgebra::{Matrix4, Quaternion, Unit, UnitQuaternion, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 4D vector type (homogeneous plane coefficients)
pub type Vec4 = Vector4<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// Unit quaternion used for shape orientation
pub type Quat = UnitQuaternion<f64>;

/// Tolerance used to guard divisions and near-parallel tests.
pub const EPSILON: f64 = 1e-9;

/// Squared length below which a direction is treated as degenerate.
pub const EPSILON_SQUARED: f64 = EPSILON * EPSILON;

/// Math utility functions
pub mod utils {
    use super::{Quat, Vec3, EPSILON};

    /// Clamp every component of `value` into `[-limit, limit]`.
    pub fn clamp_symmetric(value: &Vec3, limit: &Vec3) -> Vec3 {
        Vec3::new(
            value.x.clamp(-limit.x, limit.x),
            value.y.clamp(-limit.y, limit.y),
            value.z.clamp(-limit.z, limit.z),
        )
    }

    /// Replace negative components with zero.
    pub fn non_negative(value: &Vec3) -> Vec3 {
        value.map(|c| c.max(0.0))
    }

    /// Sign that treats zero as positive.
    pub fn sign_or_positive(value: f64) -> f64 {
        if value < 0.0 { -1.0 } else { 1.0 }
    }

    /// Whether a rotation is the identity within tolerance.
    pub fn is_identity(rotation: &Quat) -> bool {
        rotation.angle().abs() <= EPSILON
    }

    /// The three local axes of `rotation` expressed in world space.
    pub fn rotation_axes(rotation: &Quat) -> [Vec3; 3] {
        [
            rotation * Vec3::x(),
            rotation * Vec3::y(),
            rotation * Vec3::z(),
        ]
    }

    /// Normalize `value`, or return `None` for a near-zero vector.
    pub fn try_normalize(value: &Vec3) -> Option<Vec3> {
        value.try_normalize(EPSILON)
    }

    /// Any unit vector perpendicular to `value`.
    pub fn any_perpendicular(value: &Vec3) -> Vec3 {
        let helper = if value.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        try_normalize(&value.cross(&helper)).unwrap_or_else(Vec3::z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_axes_are_orthonormal() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2);
        let [x, y, z] = utils::rotation_axes(&rotation);

        assert_relative_eq!(x, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(y, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(z, Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_identity_detection() {
        assert!(utils::is_identity(&Quat::identity()));
        assert!(!utils::is_identity(&Quat::from_axis_angle(&Vec3::x_axis(), 0.1)));
    }

    #[test]
    fn test_non_negative_clamps_components() {
        let clamped = utils::non_negative(&Vec3::new(-1.0, 2.0, -0.5));
        assert_eq!(clamped, Vec3::new(0.0, 2.0, 0.0));
    }
}
