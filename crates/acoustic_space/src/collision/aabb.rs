//! Axis-aligned bounding boxes
//!
//! Used for octree node regions, element bounds and ray pruning.

use crate::foundation::math::Vec3;

/// How a node region relates to a query box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// No overlap at all
    Outside,
    /// Overlapping but not contained
    Partial,
    /// Entirely inside the query box
    Inside,
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half size
    pub fn from_center_half_size(center: Vec3, half_size: Vec3) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Smallest box enclosing all points; `None` for an empty iterator
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.inf(&p),
            max: acc.max.sup(&p),
        }))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half size of the AABB
    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point (boundary included)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if `other` lies entirely inside this AABB
    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Classify this box against a query box
    pub fn classify(&self, query: &Aabb) -> Containment {
        if !self.intersects(query) {
            Containment::Outside
        } else if query.contains_aabb(self) {
            Containment::Inside
        } else {
            Containment::Partial
        }
    }

    /// This box grown by `amount` on every side
    pub fn expanded(&self, amount: f64) -> Self {
        let pad = Vec3::repeat(amount);
        Self::new(self.min - pad, self.max + pad)
    }

    /// Smallest box enclosing both boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Point of the box closest to `point`
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        point.sup(&self.min).inf(&self.max)
    }

    /// Squared distance from `point` to the box (zero inside)
    pub fn distance_squared(&self, point: &Vec3) -> f64 {
        (self.closest_point(point) - point).norm_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Aabb {
        Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = unit();

        assert!(aabb.contains_point(&Vec3::zeros()));
        assert!(aabb.contains_point(&Vec3::new(1.0, 1.0, 1.0)));
        assert!(!aabb.contains_point(&Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_intersects() {
        let aabb1 = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let aabb2 = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let aabb3 = Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));

        assert!(aabb1.intersects(&aabb2));
        assert!(!aabb1.intersects(&aabb3));
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points(vec![
            Vec3::new(-0.5, -0.5, 1.0),
            Vec3::new(0.5, -0.5, 1.0),
            Vec3::new(0.0, 0.5, -1.0),
        ])
        .unwrap();

        assert_eq!(aabb.min, Vec3::new(-0.5, -0.5, -1.0));
        assert_eq!(aabb.max, Vec3::new(0.5, 0.5, 1.0));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_classify() {
        let query = unit();
        let inside = Aabb::from_center_half_size(Vec3::zeros(), Vec3::repeat(0.5));
        let partial = Aabb::from_center_half_size(Vec3::new(1.0, 0.0, 0.0), Vec3::repeat(0.5));
        let outside = Aabb::from_center_half_size(Vec3::new(5.0, 0.0, 0.0), Vec3::repeat(0.5));

        assert_eq!(inside.classify(&query), Containment::Inside);
        assert_eq!(partial.classify(&query), Containment::Partial);
        assert_eq!(outside.classify(&query), Containment::Outside);
    }

    #[test]
    fn test_closest_point_and_distance() {
        let aabb = unit();
        let point = Vec3::new(3.0, 0.5, 0.0);

        assert_eq!(aabb.closest_point(&point), Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(aabb.distance_squared(&point), 4.0);
        assert_eq!(aabb.distance_squared(&Vec3::zeros()), 0.0);
    }
}
