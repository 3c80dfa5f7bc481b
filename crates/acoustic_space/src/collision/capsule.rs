//! Capsules, optionally tapered
//!
//! A capsule is the convex hull of two spheres placed at the ends of its
//! axis segment. The axis is the local +Y direction; "top" is the +Y end.

use super::aabb::Aabb;
use super::cylinder::Cylinder;
use super::frustum::Frustum;
use super::sphere::closest_on_segment;
use super::sweep;
use super::triangle::Triangle;
use crate::foundation::math::{Quat, Vec3, EPSILON};

/// A capsule with independent top and bottom radii
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    position: Vec3,
    half_height: f64,
    bottom_radius: f64,
    top_radius: f64,
    orientation: Quat,
    axis: Vec3,
}

impl Capsule {
    /// Upright capsule with one radius
    pub fn new(position: Vec3, half_height: f64, radius: f64) -> Self {
        Self::tapered(position, half_height, radius, radius, Quat::identity())
    }

    /// Capsule with separate end radii and an orientation
    pub fn tapered(position: Vec3, half_height: f64, bottom_radius: f64, top_radius: f64, orientation: Quat) -> Self {
        Self {
            position,
            half_height: half_height.max(0.0),
            bottom_radius: bottom_radius.max(0.0),
            top_radius: top_radius.max(0.0),
            orientation,
            axis: orientation * Vec3::y(),
        }
    }

    /// Center of the axis segment
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Half the length of the axis segment
    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    /// Radius of the bottom (-Y) end
    pub fn bottom_radius(&self) -> f64 {
        self.bottom_radius
    }

    /// Radius of the top (+Y) end
    pub fn top_radius(&self) -> f64 {
        self.top_radius
    }

    /// Orientation of the local frame
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Unit axis, bottom to top
    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Whether the end radii differ
    pub fn is_tapered(&self) -> bool {
        (self.top_radius - self.bottom_radius).abs() > EPSILON
    }

    /// Move the capsule
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Negative values are stored as 0
    pub fn set_half_height(&mut self, half_height: f64) {
        self.half_height = half_height.max(0.0);
    }

    /// Negative values are stored as 0
    pub fn set_radii(&mut self, bottom_radius: f64, top_radius: f64) {
        self.bottom_radius = bottom_radius.max(0.0);
        self.top_radius = top_radius.max(0.0);
    }

    /// Rotate the capsule and refresh the cached axis
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.axis = orientation * Vec3::y();
    }

    /// Axis end points `(bottom, top)`
    pub fn segment(&self) -> (Vec3, Vec3) {
        let offset = self.axis * self.half_height;
        (self.position - offset, self.position + offset)
    }

    /// Radius at parameter `t` along the segment, 0 = bottom
    pub fn radius_at(&self, t: f64) -> f64 {
        (self.top_radius - self.bottom_radius).mul_add(t, self.bottom_radius)
    }

    /// Exact signed distance from `point` to the surface
    pub fn signed_distance(&self, point: &Vec3) -> f64 {
        let (bottom, top) = self.segment();
        if !self.is_tapered() {
            return (point - closest_on_segment(&bottom, &top, point)).norm() - self.bottom_radius;
        }

        let ba = top - bottom;
        let l2 = ba.norm_squared();
        let rr = self.bottom_radius - self.top_radius;
        let a2 = l2 - rr * rr;
        if l2 < EPSILON || a2 <= 0.0 {
            // One end sphere swallows the other.
            return ((point - bottom).norm() - self.bottom_radius).min((point - top).norm() - self.top_radius);
        }

        let il2 = 1.0 / l2;
        let pa = point - bottom;
        let y = pa.dot(&ba);
        let z = y - l2;
        let x2 = (pa * l2 - ba * y).norm_squared();
        let y2 = y * y * l2;
        let z2 = z * z * l2;
        let k = sign(rr) * rr * rr * x2;
        if sign(z) * a2 * z2 > k {
            return (x2 + z2).sqrt() * il2 - self.top_radius;
        }
        if sign(y) * a2 * y2 < k {
            return (x2 + y2).sqrt() * il2 - self.bottom_radius;
        }
        ((x2 * a2 * il2).sqrt() + y * rr) * il2 - self.bottom_radius
    }

    /// Whether `point` lies inside or on the capsule
    pub fn contains_point(&self, point: &Vec3) -> bool {
        self.signed_distance(point) <= 0.0
    }

    /// Smallest gap between the capsule and a convex shape given by its
    /// distance function; zero or negative means they touch.
    ///
    /// The distance to a convex shape is convex along the axis segment and the
    /// radius is linear, so their difference has a single minimum.
    pub fn clearance_to<F>(&self, distance: F) -> f64
    where
        F: Fn(&Vec3) -> f64,
    {
        let (bottom, top) = self.segment();
        if self.half_height < EPSILON {
            return distance(&self.position) - self.bottom_radius.max(self.top_radius);
        }
        let ba = top - bottom;
        let (_, clearance) = sweep::minimize_convex_on_unit(|t| distance(&(bottom + ba * t)) - self.radius_at(t));
        clearance
    }

    /// Largest value of `direction · p` over the capsule (unit `direction`)
    pub fn max_projection(&self, direction: &Vec3) -> f64 {
        let (bottom, top) = self.segment();
        (direction.dot(&bottom) + self.bottom_radius).max(direction.dot(&top) + self.top_radius)
    }

    /// World-space bounds
    pub fn bounds(&self) -> Aabb {
        let (bottom, top) = self.segment();
        Aabb::from_center_half_size(bottom, Vec3::repeat(self.bottom_radius))
            .union(&Aabb::from_center_half_size(top, Vec3::repeat(self.top_radius)))
    }

    /// Capsule vs capsule
    pub fn hits_capsule(&self, other: &Capsule) -> bool {
        self.clearance_to(|p| other.signed_distance(p)) <= 0.0
    }

    /// Capsule vs cylinder
    pub fn hits_cylinder(&self, cylinder: &Cylinder) -> bool {
        self.clearance_to(|p| cylinder.signed_distance(p)) <= 0.0
    }

    /// Capsule vs triangle
    pub fn hits_triangle(&self, triangle: &Triangle) -> bool {
        self.clearance_to(|p| triangle.distance(p)) <= 0.0
    }

    /// Capsule vs frustum, per plane (conservative near corners)
    pub fn hits_frustum(&self, frustum: &Frustum) -> bool {
        frustum.may_contain(|normal| self.max_projection(normal))
    }

    /// Point on the axis segment nearest to `point`
    pub fn closest_on_axis(&self, point: &Vec3) -> Vec3 {
        let (bottom, top) = self.segment();
        closest_on_segment(&bottom, &top, point)
    }
}

/// GLSL-style sign: zero maps to zero
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_segment_follows_orientation() {
        let capsule = Capsule::tapered(
            Vec3::zeros(),
            2.0,
            1.0,
            1.0,
            Quat::from_axis_angle(&Vec3::z_axis(), -FRAC_PI_2),
        );
        let (bottom, top) = capsule.segment();
        assert_relative_eq!(top, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(bottom, Vec3::new(-2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_signed_distance_uniform() {
        let capsule = Capsule::new(Vec3::zeros(), 1.0, 0.5);
        assert_relative_eq!(capsule.signed_distance(&Vec3::new(2.0, 0.0, 0.0)), 1.5);
        assert_relative_eq!(capsule.signed_distance(&Vec3::new(0.0, 3.0, 0.0)), 1.5);
        assert_relative_eq!(capsule.signed_distance(&Vec3::zeros()), -0.5);
    }

    #[test]
    fn test_signed_distance_tapered() {
        let capsule = Capsule::tapered(Vec3::zeros(), 1.0, 1.0, 0.5, Quat::identity());
        // Beyond each cap the distance is to that end sphere.
        assert_relative_eq!(capsule.signed_distance(&Vec3::new(0.0, 3.0, 0.0)), 1.5, epsilon = 1e-9);
        assert_relative_eq!(capsule.signed_distance(&Vec3::new(0.0, -4.0, 0.0)), 2.0, epsilon = 1e-9);
        assert!(capsule.contains_point(&Vec3::new(0.0, -1.0, 0.0)));
        assert!(!capsule.contains_point(&Vec3::new(0.8, 1.0, 0.0)));
    }

    #[test]
    fn test_swallowed_end_sphere() {
        let capsule = Capsule::tapered(Vec3::zeros(), 0.25, 2.0, 0.1, Quat::identity());
        assert_relative_eq!(capsule.signed_distance(&Vec3::new(3.0, -0.25, 0.0)), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_capsule_capsule() {
        let a = Capsule::new(Vec3::zeros(), 1.0, 0.5);
        let b = Capsule::new(Vec3::new(0.9, 0.0, 0.0), 1.0, 0.5);
        let c = Capsule::new(Vec3::new(1.1, 0.0, 0.0), 1.0, 0.5);
        assert!(a.hits_capsule(&b));
        assert!(!a.hits_capsule(&c));
    }

    #[test]
    fn test_crossed_capsules() {
        let upright = Capsule::new(Vec3::zeros(), 2.0, 0.25);
        let lying = Capsule::tapered(
            Vec3::new(0.0, 0.0, 0.4),
            2.0,
            0.25,
            0.25,
            Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2),
        );
        let far = Capsule::tapered(
            Vec3::new(0.0, 0.0, 0.6),
            2.0,
            0.25,
            0.25,
            Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2),
        );
        assert!(upright.hits_capsule(&lying));
        assert!(!upright.hits_capsule(&far));
    }

    #[test]
    fn test_capsule_triangle() {
        let triangle = Triangle::new(
            Vec3::new(-2.0, 0.0, -2.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, -2.0),
        );
        assert!(Capsule::new(Vec3::new(0.0, 1.4, 0.0), 1.0, 0.5).hits_triangle(&triangle));
        assert!(!Capsule::new(Vec3::new(0.0, 1.6, 0.0), 1.0, 0.5).hits_triangle(&triangle));
    }

    #[test]
    fn test_bounds() {
        let capsule = Capsule::tapered(Vec3::zeros(), 1.0, 0.5, 0.25, Quat::identity());
        let bounds = capsule.bounds();
        assert_relative_eq!(bounds.min, Vec3::new(-0.5, -1.5, -0.5));
        assert_relative_eq!(bounds.max, Vec3::new(0.5, 1.25, 0.5));
    }
}
