//! Cylinders and truncated cones
//!
//! Same parameters as a capsule but with flat caps. Distances are computed
//! exactly in the 2D (radial, axial) half-plane, where the solid is a
//! trapezoid.

use super::aabb::Aabb;
use super::frustum::Frustum;
use crate::foundation::math::{Quat, Vec3, EPSILON};
use nalgebra::Vector2;

type Vec2 = Vector2<f64>;

/// A cylinder with independent cap radii
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    position: Vec3,
    half_height: f64,
    bottom_radius: f64,
    top_radius: f64,
    orientation: Quat,
    axis: Vec3,
}

impl Cylinder {
    /// Upright cylinder with one radius
    pub fn new(position: Vec3, half_height: f64, radius: f64) -> Self {
        Self::tapered(position, half_height, radius, radius, Quat::identity())
    }

    /// Cylinder with separate cap radii and an orientation
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

    /// Center of the cylinder
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Half the distance between the caps
    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    /// Radius of the bottom (-Y) cap
    pub fn bottom_radius(&self) -> f64 {
        self.bottom_radius
    }

    /// Radius of the top (+Y) cap
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

    /// Whether the cap radii differ
    pub fn is_tapered(&self) -> bool {
        (self.top_radius - self.bottom_radius).abs() > EPSILON
    }

    /// Move the cylinder
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

    /// Rotate the cylinder and refresh the cached axis
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.axis = orientation * Vec3::y();
    }

    /// Cap centers `(bottom, top)`
    pub fn cap_centers(&self) -> (Vec3, Vec3) {
        let offset = self.axis * self.half_height;
        (self.position - offset, self.position + offset)
    }

    /// `(radial, axial)` coordinates of a world point
    fn to_profile(&self, point: &Vec3) -> Vec2 {
        let offset = point - self.position;
        let axial = offset.dot(&self.axis);
        let radial = (offset - self.axis * axial).norm();
        Vec2::new(radial, axial)
    }

    /// Exact signed distance from `point` to the surface
    pub fn signed_distance(&self, point: &Vec3) -> f64 {
        let q = self.to_profile(point);
        let h = self.half_height;
        let bottom = Vec2::new(self.bottom_radius, -h);
        let top = Vec2::new(self.top_radius, h);

        // The axis edge of the trapezoid is interior to the solid.
        let distance = distance_to_segment(&q, &Vec2::new(0.0, -h), &bottom)
            .min(distance_to_segment(&q, &bottom, &top))
            .min(distance_to_segment(&q, &top, &Vec2::new(0.0, h)));

        let inside = q.y.abs() <= h && q.x <= self.radius_at_height(q.y);
        if inside { -distance } else { distance }
    }

    /// Radius of the solid at axial coordinate `y`
    fn radius_at_height(&self, y: f64) -> f64 {
        if self.half_height < EPSILON {
            return self.bottom_radius.max(self.top_radius);
        }
        let t = (y + self.half_height) / (2.0 * self.half_height);
        (self.top_radius - self.bottom_radius).mul_add(t, self.bottom_radius)
    }

    /// Whether `point` lies inside or on the cylinder
    pub fn contains_point(&self, point: &Vec3) -> bool {
        self.signed_distance(point) <= 0.0
    }

    /// Largest value of `direction · p` over the cylinder (unit `direction`)
    pub fn max_projection(&self, direction: &Vec3) -> f64 {
        let (bottom, top) = self.cap_centers();
        let along = direction.dot(&self.axis);
        let spread = (1.0 - along * along).max(0.0).sqrt();
        self.bottom_radius
            .mul_add(spread, direction.dot(&bottom))
            .max(self.top_radius.mul_add(spread, direction.dot(&top)))
    }

    /// World-space bounds
    pub fn bounds(&self) -> Aabb {
        let (bottom, top) = self.cap_centers();
        let spread = self.axis.map(|a| (1.0 - a * a).max(0.0).sqrt());
        Aabb::from_center_half_size(bottom, spread * self.bottom_radius)
            .union(&Aabb::from_center_half_size(top, spread * self.top_radius))
    }

    /// Cylinder vs frustum, per plane (conservative near corners)
    pub fn hits_frustum(&self, frustum: &Frustum) -> bool {
        frustum.may_contain(|normal| self.max_projection(normal))
    }
}

fn distance_to_segment(point: &Vec2, a: &Vec2, b: &Vec2) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    let t = if len2 < EPSILON { 0.0 } else { ((point - a).dot(&ab) / len2).clamp(0.0, 1.0) };
    (point - (a + ab * t)).norm()
}
