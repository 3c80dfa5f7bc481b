//! Spheres
//!
//! The sphere is the lowest-ranked shape, so it owns every sphere-vs-X
//! routine, static and swept.

use super::aabb::Aabb;
use super::capsule::Capsule;
use super::cuboid::Cuboid;
use super::cylinder::Cylinder;
use super::frustum::Frustum;
use super::ray::Ray;
use super::sweep::{self, SweepHit};
use super::triangle::Triangle;
use crate::foundation::math::{utils, Vec3, EPSILON};

/// A sphere with non-negative radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    radius_squared: f64,
}

impl Sphere {
    /// Creates a sphere; a negative radius is clamped to 0
    pub fn new(center: Vec3, radius: f64) -> Self {
        let radius = radius.max(0.0);
        Self {
            center,
            radius,
            radius_squared: radius * radius,
        }
    }

    /// Center of the sphere
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Radius of the sphere
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Cached squared radius
    pub fn radius_squared(&self) -> f64 {
        self.radius_squared
    }

    /// Move the sphere
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    /// Resize the sphere; negative values are stored as 0
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
        self.radius_squared = self.radius * self.radius;
    }

    /// Whether `point` lies inside or on the sphere
    pub fn contains_point(&self, point: &Vec3) -> bool {
        (point - self.center).norm_squared() <= self.radius_squared
    }

    /// Largest value of `direction · p` over the sphere (unit `direction`)
    pub fn max_projection(&self, direction: &Vec3) -> f64 {
        direction.dot(&self.center) + self.radius
    }

    /// World-space bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_size(self.center, Vec3::repeat(self.radius))
    }

    /// Distance along `ray` to the first surface crossing; 0 when the origin is inside
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let oc = ray.origin - self.center;
        let c = oc.norm_squared() - self.radius_squared;
        if c <= 0.0 {
            return Some(0.0);
        }
        let b = oc.dot(&ray.direction);
        if b >= 0.0 {
            return None; // Ray pointing away from sphere
        }
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let t = -b - discriminant.sqrt();
        (t <= ray.length).then_some(t)
    }

    // ---- static tests ----

    /// Sphere vs sphere; touching counts
    pub fn hits_sphere(&self, other: &Sphere) -> bool {
        let radius_sum = self.radius + other.radius;
        (self.center - other.center).norm_squared() <= radius_sum * radius_sum
    }

    /// Sphere vs box via the closest point in the box frame
    pub fn hits_cuboid(&self, cuboid: &Cuboid) -> bool {
        (cuboid.closest_point(&self.center) - self.center).norm_squared() <= self.radius_squared
    }

    /// Sphere vs (possibly tapered) capsule
    pub fn hits_capsule(&self, capsule: &Capsule) -> bool {
        capsule.signed_distance(&self.center) <= self.radius
    }

    /// Sphere vs (possibly tapered) cylinder
    pub fn hits_cylinder(&self, cylinder: &Cylinder) -> bool {
        cylinder.signed_distance(&self.center) <= self.radius
    }

    /// Sphere vs triangle via the closest point on the triangle
    pub fn hits_triangle(&self, triangle: &Triangle) -> bool {
        (triangle.closest_point(&self.center) - self.center).norm_squared() <= self.radius_squared
    }

    /// Sphere vs frustum, one plane at a time (conservative near corners)
    pub fn hits_frustum(&self, frustum: &Frustum) -> bool {
        frustum.may_contain(|normal| self.max_projection(normal))
    }

    // ---- swept tests (self moves) ----

    /// Sphere swept against a static sphere
    pub fn sweep_sphere(&self, other: &Sphere, displacement: &Vec3) -> SweepHit {
        let radius_sum = self.radius + other.radius;
        let offset = self.center - other.center;
        if offset.norm_squared() <= radius_sum * radius_sum {
            let normal = utils::try_normalize(&offset)
                .or_else(|| utils::try_normalize(&-displacement))
                .unwrap_or_else(Vec3::y);
            return SweepHit::resting(normal, displacement);
        }
        match sweep::point_reaches_sphere(&self.center, displacement, &other.center, radius_sum) {
            Some(t) => {
                let normal = (offset + displacement * t) / radius_sum;
                SweepHit::new(t, normal)
            }
            None => SweepHit::MISS,
        }
    }

    /// Sphere swept against a static box.
    ///
    /// Worked in the box frame: an embedded start resolves along the axis of
    /// least penetration; otherwise face slabs, then the twelve edges, then
    /// the eight corners. The first valid root wins.
    pub fn sweep_cuboid(&self, cuboid: &Cuboid, displacement: &Vec3) -> SweepHit {
        let center = cuboid.to_local(&self.center);
        let velocity = cuboid.to_local_vector(displacement);
        let half = cuboid.half_size();
        let r = self.radius;

        let closest = utils::clamp_symmetric(&center, &half);
        let outside = center - closest;
        if outside.norm_squared() <= self.radius_squared {
            let local_normal = match utils::try_normalize(&outside) {
                Some(normal) => normal,
                None => least_penetration_axis(&center, &half),
            };
            return SweepHit::resting(cuboid.to_world_vector(&local_normal), displacement);
        }

        // Face slabs
        for axis in 0..3 {
            let reach = half[axis] + r;
            let t = if center[axis] < -reach && velocity[axis] > EPSILON {
                (-reach - center[axis]) / velocity[axis]
            } else if center[axis] > reach && velocity[axis] < -EPSILON {
                (reach - center[axis]) / velocity[axis]
            } else if center[axis].abs() > reach {
                // Outside this slab and not closing in: the sphere can never touch.
                return SweepHit::MISS;
            } else {
                continue;
            };
            if !(0.0..1.0).contains(&t) {
                continue;
            }
            let at = center + velocity * t;
            let (j, k) = ((axis + 1) % 3, (axis + 2) % 3);
            if at[j].abs() <= half[j] && at[k].abs() <= half[k] {
                let mut local_normal = Vec3::zeros();
                local_normal[axis] = utils::sign_or_positive(center[axis]);
                return SweepHit::new(t, cuboid.to_world_vector(&local_normal));
            }
        }

        // Edges and corners. The box grown by the radius is convex, so the
        // first feature giving a valid entry holds the first contact.
        for axis in 0..3 {
            let (j, k) = ((axis + 1) % 3, (axis + 2) % 3);
            for (sign_j, sign_k) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
                let edge_j = sign_j * half[j];
                let edge_k = sign_k * half[k];
                let qj = center[j] - edge_j;
                let qk = center[k] - edge_k;
                let c = qj * qj + qk * qk - self.radius_squared;
                if c <= 0.0 {
                    // Starts inside this edge's cylinder; any root is an exit.
                    continue;
                }
                let a = velocity[j] * velocity[j] + velocity[k] * velocity[k];
                let b = 2.0 * (qj * velocity[j] + qk * velocity[k]);
                let Some(t) = sweep::smallest_root_in_unit(a, b, c) else {
                    continue;
                };
                let at = center + velocity * t;
                if at[axis].abs() <= half[axis] {
                    let mut local_normal = Vec3::zeros();
                    local_normal[j] = at[j] - edge_j;
                    local_normal[k] = at[k] - edge_k;
                    let local_normal = utils::try_normalize(&local_normal).unwrap_or_else(|| {
                        let mut fallback = Vec3::zeros();
                        fallback[j] = sign_j;
                        fallback
                    });
                    return SweepHit::new(t, cuboid.to_world_vector(&local_normal));
                }
            }
        }

        for octant in 0..8 {
            let sign = |bit: usize| if octant & bit != 0 { 1.0 } else { -1.0 };
            let corner = Vec3::new(sign(1) * half.x, sign(2) * half.y, sign(4) * half.z);
            if let Some(t) = sweep::point_reaches_sphere(&center, &velocity, &corner, r) {
                let at = center + velocity * t;
                let local_normal = utils::try_normalize(&(at - corner))
                    .or_else(|| utils::try_normalize(&-velocity))
                    .unwrap_or_else(Vec3::x);
                return SweepHit::new(t, cuboid.to_world_vector(&local_normal));
            }
        }
        SweepHit::MISS
    }

    /// Sphere swept against a static, non-tapered capsule.
    ///
    /// The capsule grown by the sphere radius is a cylinder body plus two end
    /// spheres; the earliest entry over those three parts wins. Tapered
    /// capsules are not supported and report a miss.
    pub fn sweep_capsule(&self, capsule: &Capsule, displacement: &Vec3) -> SweepHit {
        if capsule.is_tapered() {
            log::trace!("sphere sweep against a tapered capsule is not supported");
            return SweepHit::MISS;
        }
        let grown = capsule.bottom_radius() + self.radius;
        let (bottom, top) = capsule.segment();

        let on_axis = capsule.closest_on_axis(&self.center);
        let offset = self.center - on_axis;
        if offset.norm_squared() <= grown * grown {
            let normal = utils::try_normalize(&offset).unwrap_or_else(|| utils::any_perpendicular(&(top - bottom)));
            return SweepHit::resting(normal, displacement);
        }

        let length = displacement.norm();
        if length < EPSILON {
            return SweepHit::MISS;
        }
        let direction = displacement / length;

        let mut best = SweepHit::MISS;

        // Cylinder body
        let axis = top - bottom;
        let from_bottom = self.center - bottom;
        let axis_len2 = axis.norm_squared();
        let axis_dir = axis.dot(&direction);
        let axis_from = axis.dot(&from_bottom);
        let a = axis_len2 - axis_dir * axis_dir;
        if a > EPSILON {
            let b = axis_len2 * from_bottom.dot(&direction) - axis_from * axis_dir;
            let c = axis_len2 * from_bottom.norm_squared() - axis_from * axis_from - grown * grown * axis_len2;
            let h = b * b - a * c;
            if h >= 0.0 {
                let distance = (-b - h.sqrt()) / a;
                let along = axis_from + distance * axis_dir;
                if distance >= 0.0 && distance < length && along > 0.0 && along < axis_len2 {
                    let at = self.center + direction * distance;
                    let foot = bottom + axis * (along / axis_len2);
                    best = SweepHit::new(distance / length, (at - foot) / grown);
                }
            }
        }

        // End spheres
        for end in [bottom, top] {
            if let Some(t) = sweep::point_reaches_sphere(&self.center, displacement, &end, grown) {
                let at = self.center + displacement * t;
                best = best.earliest(SweepHit::new(t, (at - end) / grown));
            }
        }
        best
    }

    /// Sphere swept against a static triangle.
    ///
    /// The center is projected onto the triangle plane, along the motion when
    /// the sphere starts clear of the plane, directly when it already
    /// overlaps it. A projection outside the triangle is clamped to the
    /// triangle and the remaining contact solved as sphere-vs-point.
    ///
    /// The clamped point is fixed for the whole sweep. A sphere that starts
    /// within its radius of the plane and slides along it can reach another
    /// part of an edge first; such contacts may be reported late or missed.
    pub fn sweep_triangle(&self, triangle: &Triangle, displacement: &Vec3) -> SweepHit {
        let normal = triangle.normal();
        let r = self.radius;
        let start_distance = triangle.plane_signed_distance(&self.center);

        let target = if start_distance.abs() <= r {
            let on_plane = self.center - normal * start_distance;
            if triangle.contains_projected(&on_plane) {
                let side = if start_distance.abs() > EPSILON {
                    utils::sign_or_positive(start_distance)
                } else {
                    -utils::sign_or_positive(displacement.dot(&normal))
                };
                return SweepHit::resting(normal * side, displacement);
            }
            triangle.closest_point(&on_plane)
        } else {
            let side = utils::sign_or_positive(start_distance);
            let closing = displacement.dot(&normal) * side;
            if closing > -EPSILON {
                return SweepHit::MISS;
            }
            let t = (start_distance - side * r).abs() / -closing;
            if t >= 1.0 {
                return SweepHit::MISS;
            }
            let on_plane = self.center + displacement * t - normal * (side * r);
            if triangle.contains_projected(&on_plane) {
                return SweepHit::new(t, normal * side);
            }
            triangle.closest_point(&on_plane)
        };

        let offset = self.center - target;
        if offset.norm_squared() <= self.radius_squared {
            let normal = utils::try_normalize(&offset).unwrap_or(normal);
            return SweepHit::resting(normal, displacement);
        }
        match sweep::point_reaches_sphere(&self.center, displacement, &target, r) {
            Some(t) => {
                let at = self.center + displacement * t;
                SweepHit::new(t, (at - target) / r.max(EPSILON))
            }
            None => SweepHit::MISS,
        }
    }
}

/// Closest point to `point` on the segment `a`-`b`
pub(crate) fn closest_on_segment(a: &Vec3, b: &Vec3, point: &Vec3) -> Vec3 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < EPSILON {
        return *a;
    }
    let t = ((point - a).dot(&ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

/// Unit axis along which a point inside a box is closest to leaving it
fn least_penetration_axis(local: &Vec3, half: &Vec3) -> Vec3 {
    let mut best_axis = 0;
    let mut best_depth = f64::INFINITY;
    for axis in 0..3 {
        let depth = half[axis] - local[axis].abs();
        if depth < best_depth {
            best_depth = depth;
            best_axis = axis;
        }
    }
    let mut normal = Vec3::zeros();
    normal[best_axis] = utils::sign_or_positive(local[best_axis]);
    normal
}
