//! Boxes, optionally oriented
//!
//! Owns the box-vs-box, box-vs-capsule, box-vs-triangle and box-vs-frustum
//! routines. Axis-aligned pairs take a cheap interval test; anything oriented
//! goes through the separating axis theorem.

use super::aabb::Aabb;
use super::capsule::Capsule;
use super::frustum::Frustum;
use super::sat::{self, Projectable};
use super::sweep::SweepHit;
use super::triangle::Triangle;
use crate::foundation::math::{utils, Quat, Vec3};

/// A box with center, non-negative half size and optional orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    center: Vec3,
    half_size: Vec3,
    orientation: Quat,
    axes: [Vec3; 3],
    oriented: bool,
}

impl Cuboid {
    /// Creates an axis-aligned box. Negative half-size components are clamped to 0.
    pub fn new(center: Vec3, half_size: Vec3) -> Self {
        Self::oriented(center, half_size, Quat::identity())
    }

    /// Creates a box rotated by `orientation` about its center
    pub fn oriented(center: Vec3, half_size: Vec3, orientation: Quat) -> Self {
        let mut cuboid = Self {
            center,
            half_size: utils::non_negative(&half_size),
            orientation,
            axes: [Vec3::x(), Vec3::y(), Vec3::z()],
            oriented: false,
        };
        cuboid.set_orientation(orientation);
        cuboid
    }

    /// Creates the axis-aligned box covering `aabb`
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(aabb.center(), aabb.half_size())
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Half size along each local axis
    pub fn half_size(&self) -> Vec3 {
        self.half_size
    }

    /// Orientation of the box
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Local axes in world space
    pub fn axes(&self) -> &[Vec3; 3] {
        &self.axes
    }

    /// Whether the orientation differs from identity
    pub fn is_oriented(&self) -> bool {
        self.oriented
    }

    /// Move the box
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    /// Resize the box; negative components are stored as 0
    pub fn set_half_size(&mut self, half_size: Vec3) {
        self.half_size = utils::non_negative(&half_size);
    }

    /// Rotate the box and refresh the cached axes
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.oriented = !utils::is_identity(&orientation);
        self.axes = if self.oriented {
            utils::rotation_axes(&orientation)
        } else {
            [Vec3::x(), Vec3::y(), Vec3::z()]
        };
    }

    /// The eight corners in world space
    pub fn vertices(&self) -> [Vec3; 8] {
        let [ax, ay, az] = self.axes;
        let hx = ax * self.half_size.x;
        let hy = ay * self.half_size.y;
        let hz = az * self.half_size.z;
        let c = self.center;
        [
            c - hx - hy - hz,
            c + hx - hy - hz,
            c - hx + hy - hz,
            c + hx + hy - hz,
            c - hx - hy + hz,
            c + hx - hy + hz,
            c - hx + hy + hz,
            c + hx + hy + hz,
        ]
    }

    /// World point expressed in the box frame
    pub fn to_local(&self, point: &Vec3) -> Vec3 {
        self.to_local_vector(&(point - self.center))
    }

    /// World direction expressed in the box frame
    pub fn to_local_vector(&self, vector: &Vec3) -> Vec3 {
        if self.oriented {
            self.orientation.inverse_transform_vector(vector)
        } else {
            *vector
        }
    }

    /// Box-frame direction expressed in world space
    pub fn to_world_vector(&self, vector: &Vec3) -> Vec3 {
        if self.oriented {
            self.orientation.transform_vector(vector)
        } else {
            *vector
        }
    }

    /// Point of the box closest to `point`
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        let local = utils::clamp_symmetric(&self.to_local(point), &self.half_size);
        self.center + self.to_world_vector(&local)
    }

    /// Signed distance from `point` to the box surface (negative inside)
    pub fn signed_distance(&self, point: &Vec3) -> f64 {
        let local = self.to_local(point);
        let q = local.abs() - self.half_size;
        let outside = q.sup(&Vec3::zeros()).norm();
        let inside = q.x.max(q.y).max(q.z).min(0.0);
        outside + inside
    }

    /// Whether `point` lies inside or on the box
    pub fn contains_point(&self, point: &Vec3) -> bool {
        let local = self.to_local(point);
        local.x.abs() <= self.half_size.x
            && local.y.abs() <= self.half_size.y
            && local.z.abs() <= self.half_size.z
    }

    /// Largest value of `direction · p` over the box
    pub fn max_projection(&self, direction: &Vec3) -> f64 {
        direction.dot(&self.center) + self.projected_radius(direction)
    }

    /// World-space bounds
    pub fn bounds(&self) -> Aabb {
        let extent = Vec3::new(
            self.projected_radius(&Vec3::x()),
            self.projected_radius(&Vec3::y()),
            self.projected_radius(&Vec3::z()),
        );
        Aabb::from_center_half_size(self.center, extent)
    }

    fn projected_radius(&self, axis: &Vec3) -> f64 {
        self.axes
            .iter()
            .zip(self.half_size.iter())
            .map(|(box_axis, half)| half * axis.dot(box_axis).abs())
            .sum()
    }

    fn separating_axes_with_cuboid(&self, other: &Cuboid) -> Vec<Vec3> {
        let mut axes = Vec::with_capacity(15);
        axes.extend_from_slice(&self.axes);
        axes.extend_from_slice(&other.axes);
        sat::edge_cross_axes(&self.axes, &other.axes, &mut axes);
        axes
    }

    fn separating_axes_with_triangle(&self, triangle: &Triangle) -> Vec<Vec3> {
        let mut axes = Vec::with_capacity(13);
        axes.push(triangle.normal());
        axes.extend_from_slice(&self.axes);
        sat::edge_cross_axes(&self.axes, triangle.edges(), &mut axes);
        axes
    }

    // ---- static tests ----

    /// Box vs box: interval overlap when both are axis aligned, 15-axis SAT otherwise
    pub fn hits_cuboid(&self, other: &Cuboid) -> bool {
        if !self.oriented && !other.oriented {
            return self.bounds().intersects(&other.bounds());
        }
        sat::overlap_on_all_axes(self, other, &self.separating_axes_with_cuboid(other))
    }

    /// Box vs capsule by minimising the box distance along the capsule axis
    pub fn hits_capsule(&self, capsule: &Capsule) -> bool {
        capsule.clearance_to(|p| self.signed_distance(p)) <= 0.0
    }

    /// Box vs triangle: SAT over the triangle normal, 3 box axes, 9 edge crosses
    pub fn hits_triangle(&self, triangle: &Triangle) -> bool {
        sat::overlap_on_all_axes(self, triangle, &self.separating_axes_with_triangle(triangle))
    }

    /// Box vs frustum over the six plane normals only.
    ///
    /// Conservative: boxes near a frustum corner may report overlap without
    /// touching it.
    pub fn hits_frustum(&self, frustum: &Frustum) -> bool {
        frustum.may_contain(|normal| self.max_projection(normal))
    }

    // ---- swept tests (self moves) ----

    /// Box swept against a static box
    pub fn sweep_cuboid(&self, other: &Cuboid, displacement: &Vec3) -> SweepHit {
        let axes = if !self.oriented && !other.oriented {
            vec![Vec3::x(), Vec3::y(), Vec3::z()]
        } else {
            self.separating_axes_with_cuboid(other)
        };
        sat::sweep_separating_axes(self, other, &axes, displacement)
    }

    /// Box swept against a static triangle
    pub fn sweep_triangle(&self, triangle: &Triangle, displacement: &Vec3) -> SweepHit {
        sat::sweep_separating_axes(self, triangle, &self.separating_axes_with_triangle(triangle), displacement)
    }
}

impl Projectable for Cuboid {
    fn project(&self, axis: &Vec3) -> (f64, f64) {
        let center = axis.dot(&self.center);
        let radius = self.projected_radius(axis);
        (center - radius, center + radius)
    }
}
