//! Ray segments with precomputed slab-test data

use super::aabb::Aabb;
use crate::foundation::math::{Vec3, EPSILON};

/// A finite ray segment for occlusion tests and octree pruning
///
/// The inverse direction is computed once so that box tests never divide.
/// Axes where the direction is below `EPSILON` are flagged parallel and tested
/// by containment instead.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Start of the segment in world space
    pub origin: Vec3,
    /// Unit direction of travel
    pub direction: Vec3,
    /// Segment length along `direction`
    pub length: f64,
    inv_direction: Vec3,
    parallel: [bool; 3],
    end: Vec3,
}

impl Ray {
    /// Creates a ray segment from an origin, a direction and a length.
    ///
    /// The direction is normalized; a zero direction yields a degenerate ray
    /// whose segment is the single point `origin`.
    pub fn new(origin: Vec3, direction: Vec3, length: f64) -> Self {
        assert!(length >= 0.0, "ray length must be non-negative, got {length}");
        let direction = direction.try_normalize(EPSILON).unwrap_or_else(Vec3::zeros);
        let mut inv_direction = Vec3::zeros();
        let mut parallel = [false; 3];
        for axis in 0..3 {
            if direction[axis].abs() < EPSILON {
                parallel[axis] = true;
            } else {
                inv_direction[axis] = 1.0 / direction[axis];
            }
        }
        Self {
            origin,
            direction,
            length,
            inv_direction,
            parallel,
            end: origin + direction * length,
        }
    }

    /// Creates the segment from `start` to `end`
    pub fn between(start: Vec3, end: Vec3) -> Self {
        let delta = end - start;
        Self::new(start, delta, delta.norm())
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// End point of the segment
    pub fn end(&self) -> Vec3 {
        self.end
    }

    /// Precomputed component-wise inverse of the direction (zero on parallel axes)
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// Bounds of the segment grown by `padding`
    pub fn bounds(&self, padding: f64) -> Aabb {
        Aabb::new(self.origin.inf(&self.end), self.origin.sup(&self.end)).expanded(padding)
    }

    /// Distance along the ray at which it enters `aabb`, clamped to the segment.
    ///
    /// Returns `Some(0.0)` when the origin is already inside.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f64> {
        if aabb.contains_point(&self.origin) {
            return Some(0.0);
        }
        self.slab_interval(aabb).map(|(t_min, _)| t_min)
    }

    /// Whether the segment touches `aabb`
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        aabb.contains_point(&self.origin)
            || aabb.contains_point(&self.end)
            || self.slab_interval(aabb).is_some()
    }

    fn slab_interval(&self, aabb: &Aabb) -> Option<(f64, f64)> {
        let mut t_min = 0.0_f64;
        let mut t_max = self.length;
        for axis in 0..3 {
            let origin = self.origin[axis];
            if self.parallel[axis] {
                if origin < aabb.min[axis] || origin > aabb.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = self.inv_direction[axis];
            let mut t1 = (aabb.min[axis] - origin) * inv;
            let mut t2 = (aabb.max[axis] - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
        Some((t_min, t_max))
    }
}
