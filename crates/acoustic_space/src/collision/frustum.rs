//! View frustums bounded by six inward-facing planes

use super::aabb::Aabb;
use crate::foundation::math::{Mat4, Quat, Vec3, Vec4, EPSILON};

/// Plane defined by normal and distance from origin
///
/// A point `p` is on the positive side when `normal · p + distance ≥ 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Vec3,
    /// Signed offset along the normal
    pub distance: f64,
}

impl Plane {
    /// Create a plane from a normal and distance; both are rescaled so the
    /// normal has unit length
    pub fn new(normal: Vec3, distance: f64) -> Self {
        let length = normal.norm();
        if length < EPSILON {
            return Self { normal: Vec3::zeros(), distance };
        }
        Self {
            normal: normal / length,
            distance: distance / length,
        }
    }

    /// Plane through `point` facing `normal`
    pub fn from_point_normal(point: &Vec3, normal: &Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Plane from homogeneous coefficients `(a, b, c, d)`
    pub fn from_coefficients(coefficients: &Vec4) -> Self {
        Self::new(coefficients.xyz(), coefficients.w)
    }

    /// Calculate signed distance from plane to point
    pub fn distance_to_point(&self, point: &Vec3) -> f64 {
        self.normal.dot(point) + self.distance
    }
}

/// Index of each plane in [`Frustum::planes`]
pub mod side {
    /// Left plane
    pub const LEFT: usize = 0;
    /// Right plane
    pub const RIGHT: usize = 1;
    /// Top plane
    pub const TOP: usize = 2;
    /// Bottom plane
    pub const BOTTOM: usize = 3;
    /// Near plane
    pub const NEAR: usize = 4;
    /// Far plane
    pub const FAR: usize = 5;
}

/// Frustum for visibility and audibility culling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Six planes (left, right, top, bottom, near, far), normals pointing in
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Create a frustum from six planes
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract frustum planes from a view-projection matrix
    ///
    /// Gribb-Hartmann extraction for a clip space with `-w ≤ z ≤ w`.
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let row = |i: usize| -> Vec4 { view_projection.row(i).transpose() };
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
        Self::new([
            Plane::from_coefficients(&(r3 + r0)),
            Plane::from_coefficients(&(r3 - r0)),
            Plane::from_coefficients(&(r3 - r1)),
            Plane::from_coefficients(&(r3 + r1)),
            Plane::from_coefficients(&(r3 + r2)),
            Plane::from_coefficients(&(r3 - r2)),
        ])
    }

    /// Perspective frustum of a camera at `eye` looking down its local -Z
    /// with +Y up. `fov_y` is the full vertical field of view in radians.
    pub fn perspective(eye: Vec3, orientation: Quat, fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        let forward = orientation * -Vec3::z();
        let up = orientation * Vec3::y();
        let right = orientation * Vec3::x();

        let half_v = fov_y * 0.5;
        let half_h = (half_v.tan() * aspect).atan();
        let (sin_h, cos_h) = half_h.sin_cos();
        let (sin_v, cos_v) = half_v.sin_cos();

        let through_eye = |normal: Vec3| Plane::from_point_normal(&eye, &normal);
        Self::new([
            through_eye(right * cos_h + forward * sin_h),
            through_eye(-right * cos_h + forward * sin_h),
            through_eye(-up * cos_v + forward * sin_v),
            through_eye(up * cos_v + forward * sin_v),
            Plane::from_point_normal(&(eye + forward * near), &forward),
            Plane::from_point_normal(&(eye + forward * far), &-forward),
        ])
    }

    /// Whether `point` is on the inner side of every plane
    pub fn contains_point(&self, point: &Vec3) -> bool {
        self.planes.iter().all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Per-plane rejection test for a convex shape described by its support
    /// function `max_projection(normal) = max over the shape of normal · p`.
    ///
    /// False only when the shape lies entirely outside one plane. Shapes
    /// outside near a frustum corner or edge can still pass.
    pub fn may_contain<F>(&self, max_projection: F) -> bool
    where
        F: Fn(&Vec3) -> f64,
    {
        self.planes
            .iter()
            .all(|plane| max_projection(&plane.normal) + plane.distance >= 0.0)
    }

    /// The eight corners, near plane first; `None` when three planes fail to
    /// meet in a point
    pub fn corners(&self) -> Option<[Vec3; 8]> {
        let mut corners = [Vec3::zeros(); 8];
        let mut index = 0;
        for depth in [side::NEAR, side::FAR] {
            for vertical in [side::TOP, side::BOTTOM] {
                for horizontal in [side::LEFT, side::RIGHT] {
                    corners[index] = intersect_planes(
                        &self.planes[horizontal],
                        &self.planes[vertical],
                        &self.planes[depth],
                    )?;
                    index += 1;
                }
            }
        }
        Some(corners)
    }

    /// World-space bounds of the corners
    pub fn bounds(&self) -> Option<Aabb> {
        self.corners().and_then(Aabb::from_points)
    }
}

fn intersect_planes(a: &Plane, b: &Plane, c: &Plane) -> Option<Vec3> {
    let bc = b.normal.cross(&c.normal);
    let denominator = a.normal.dot(&bc);
    if denominator.abs() < EPSILON {
        return None;
    }
    let ca = c.normal.cross(&a.normal);
    let ab = a.normal.cross(&b.normal);
    Some((bc * -a.distance + ca * -b.distance + ab * -c.distance) / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn camera() -> Frustum {
        Frustum::perspective(Vec3::zeros(), Quat::identity(), FRAC_PI_2, 1.0, 1.0, 100.0)
    }

    #[test]
    fn test_plane_distance() {
        let plane = Plane::new(Vec3::new(0.0, 2.0, 0.0), -4.0);
        assert_relative_eq!(plane.normal, Vec3::y());
        assert_relative_eq!(plane.distance_to_point(&Vec3::new(0.0, 5.0, 0.0)), 3.0);
    }

    #[test]
    fn test_perspective_contains() {
        let frustum = camera();
        assert!(frustum.contains_point(&Vec3::new(0.0, 0.0, -10.0)));
        assert!(frustum.contains_point(&Vec3::new(9.0, -9.0, -10.0)));
        assert!(!frustum.contains_point(&Vec3::new(11.0, 0.0, -10.0)));
        assert!(!frustum.contains_point(&Vec3::new(0.0, 0.0, -0.5)));
        assert!(!frustum.contains_point(&Vec3::new(0.0, 0.0, -101.0)));
        assert!(!frustum.contains_point(&Vec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_matches_projection_matrix() {
        let projection = Mat4::new_perspective(1.0, FRAC_PI_2, 1.0, 100.0);
        let extracted = Frustum::from_view_projection(&projection);
        let built = camera();
        for (a, b) in extracted.planes.iter().zip(built.planes.iter()) {
            assert_relative_eq!(a.normal, b.normal, epsilon = 1e-9);
            assert_relative_eq!(a.distance, b.distance, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_corners_and_bounds() {
        let frustum = camera();
        let corners = frustum.corners().unwrap();
        assert_relative_eq!(corners[0], Vec3::new(-1.0, 1.0, -1.0), epsilon = 1e-9);
        assert_relative_eq!(corners[7], Vec3::new(100.0, -100.0, -100.0), epsilon = 1e-9);

        let bounds = frustum.bounds().unwrap();
        assert_relative_eq!(bounds.min, Vec3::new(-100.0, -100.0, -100.0), epsilon = 1e-9);
        assert_relative_eq!(bounds.max, Vec3::new(100.0, 100.0, -1.0), epsilon = 1e-9);
    }

    #[test]
    fn test_may_contain_sphere_support() {
        let frustum = camera();
        let inside = |center: Vec3, radius: f64| frustum.may_contain(|n| n.dot(&center) + radius);
        assert!(inside(Vec3::new(0.0, 0.0, -50.0), 1.0));
        // Behind the camera.
        assert!(!inside(Vec3::new(0.0, 0.0, 5.0), 1.0));
        // Straddling the left plane.
        assert!(inside(Vec3::new(-10.5, 0.0, -10.0), 1.0));
    }
}
