//! Triangles with cached plane data
//!
//! Corners are counter-clockwise when seen from the side the normal points to.
//! Collinear corners are not supported.

use super::aabb::Aabb;
use super::ray::Ray;
use super::sat::{self, Projectable};
use super::sweep::SweepHit;
use crate::foundation::math::{Vec3, EPSILON};

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    corners: [Vec3; 3],
    normal: Vec3,
    edges: [Vec3; 3],
    plane_distance: f64,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let mut triangle = Self {
            corners: [v0, v1, v2],
            normal: Vec3::z(),
            edges: [Vec3::zeros(); 3],
            plane_distance: 0.0,
        };
        triangle.refresh();
        triangle
    }

    /// The three corners
    pub fn corners(&self) -> &[Vec3; 3] {
        &self.corners
    }

    /// Unit normal (right-hand rule over the corners)
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Edge vectors `v1 - v0`, `v2 - v1`, `v0 - v2`
    pub fn edges(&self) -> &[Vec3; 3] {
        &self.edges
    }

    /// `normal · v0`
    pub fn plane_distance(&self) -> f64 {
        self.plane_distance
    }

    /// Replace one corner and refresh the cached plane
    pub fn set_corner(&mut self, index: usize, corner: Vec3) {
        assert!(index < 3, "triangle corner index out of range: {index}");
        self.corners[index] = corner;
        self.refresh();
    }

    /// Replace all corners and refresh the cached plane
    pub fn set_corners(&mut self, v0: Vec3, v1: Vec3, v2: Vec3) {
        self.corners = [v0, v1, v2];
        self.refresh();
    }

    fn refresh(&mut self) {
        let [v0, v1, v2] = self.corners;
        self.edges = [v1 - v0, v2 - v1, v0 - v2];
        self.normal = (v1 - v0).cross(&(v2 - v0)).try_normalize(EPSILON).unwrap_or_else(Vec3::z);
        self.plane_distance = self.normal.dot(&v0);
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.corners[0] + self.corners[1] + self.corners[2]) / 3.0
    }

    /// Signed distance from the triangle plane to a point
    pub fn plane_signed_distance(&self, point: &Vec3) -> f64 {
        self.normal.dot(point) - self.plane_distance
    }

    /// Whether a point on the triangle plane lies inside the triangle
    pub fn contains_projected(&self, point: &Vec3) -> bool {
        self.corners.iter().zip(self.edges.iter()).all(|(corner, edge)| {
            edge.cross(&(point - corner)).dot(&self.normal) >= -EPSILON
        })
    }

    /// Get the closest point on the triangle to a given point
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        let [v0, v1, v2] = self.corners;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        // Check if point is in vertex region outside v0
        let v0_to_point = point - v0;
        let d1 = edge1.dot(&v0_to_point);
        let d2 = edge2.dot(&v0_to_point);
        if d1 <= 0.0 && d2 <= 0.0 {
            return v0;
        }

        // Check if point is in vertex region outside v1
        let v1_to_point = point - v1;
        let d3 = edge1.dot(&v1_to_point);
        let d4 = edge2.dot(&v1_to_point);
        if d3 >= 0.0 && d4 <= d3 {
            return v1;
        }

        // Check if point is in vertex region outside v2
        let v2_to_point = point - v2;
        let d5 = edge1.dot(&v2_to_point);
        let d6 = edge2.dot(&v2_to_point);
        if d6 >= 0.0 && d5 <= d6 {
            return v2;
        }

        // Check if point is in edge region
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return v0 + edge1 * v;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return v0 + edge2 * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return v1 + (v2 - v1) * w;
        }

        // Point is inside triangle
        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        v0 + edge1 * v + edge2 * w
    }

    /// Unsigned distance from `point` to the triangle
    pub fn distance(&self, point: &Vec3) -> f64 {
        (self.closest_point(point) - point).norm()
    }

    /// Möller-Trumbore ray-triangle intersection, limited to the ray segment.
    /// Returns the distance along the ray.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let [v0, v1, v2] = self.corners;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = ray.direction.cross(&edge2);
        let a = edge1.dot(&h);

        // Ray parallel to triangle?
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        (0.0..=ray.length).contains(&t).then_some(t)
    }

    /// Largest value of `direction · p` over the triangle
    pub fn max_projection(&self, direction: &Vec3) -> f64 {
        self.project(direction).1
    }

    /// World-space bounds
    pub fn bounds(&self) -> Aabb {
        let [v0, v1, v2] = self.corners;
        Aabb::new(v0.inf(&v1).inf(&v2), v0.sup(&v1).sup(&v2))
    }

    /// Candidate axes against another triangle: 2 face normals, 9 edge-edge
    /// cross products, and the 6 in-plane edge normals that separate coplanar
    /// triangles.
    fn separating_axes_with_triangle(&self, other: &Triangle) -> Vec<Vec3> {
        let mut axes = Vec::with_capacity(17);
        axes.push(self.normal);
        axes.push(other.normal);
        sat::edge_cross_axes(&self.edges, &other.edges, &mut axes);
        axes.extend(self.edges.iter().map(|edge| self.normal.cross(edge)));
        axes.extend(other.edges.iter().map(|edge| other.normal.cross(edge)));
        axes
    }

    /// Triangle vs triangle via the separating axis theorem
    pub fn hits_triangle(&self, other: &Triangle) -> bool {
        sat::overlap_on_all_axes(self, other, &self.separating_axes_with_triangle(other))
    }

    /// Triangle swept against a static triangle
    pub fn sweep_triangle(&self, other: &Triangle, displacement: &Vec3) -> SweepHit {
        sat::sweep_separating_axes(self, other, &self.separating_axes_with_triangle(other), displacement)
    }
}

impl Projectable for Triangle {
    fn project(&self, axis: &Vec3) -> (f64, f64) {
        let p0 = axis.dot(&self.corners[0]);
        let p1 = axis.dot(&self.corners[1]);
        let p2 = axis.dot(&self.corners[2]);
        (p0.min(p1).min(p2), p0.max(p1).max(p2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_triangle(z: f64) -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(0.0, 1.0, z),
        )
    }

    #[test]
    fn test_cached_plane() {
        let triangle = floor_triangle(2.0);
        assert_relative_eq!(triangle.normal(), Vec3::z());
        assert_relative_eq!(triangle.plane_distance(), 2.0);
        assert_relative_eq!(triangle.edges()[0], Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_setter_refreshes_plane() {
        let mut triangle = floor_triangle(0.0);
        triangle.set_corners(
            Vec3::new(0.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        assert_relative_eq!(triangle.normal(), Vec3::x());
        assert_relative_eq!(triangle.plane_distance(), 0.0);

        triangle.set_corner(0, Vec3::new(3.0, -1.0, -1.0));
        assert!(triangle.normal().x > 0.0);
        assert_relative_eq!(triangle.plane_distance(), triangle.normal().dot(&Vec3::new(3.0, -1.0, -1.0)));
    }

    #[test]
    fn test_intersect_ray() {
        let triangle = floor_triangle(5.0);
        let down = Ray::new(Vec3::zeros(), Vec3::z(), 10.0);
        assert_relative_eq!(triangle.intersect_ray(&down).unwrap(), 5.0);

        let short = Ray::new(Vec3::zeros(), Vec3::z(), 4.0);
        assert!(triangle.intersect_ray(&short).is_none());

        let away = Ray::new(Vec3::zeros(), -Vec3::z(), 10.0);
        assert!(triangle.intersect_ray(&away).is_none());
    }

    #[test]
    fn test_closest_point_regions() {
        let triangle = floor_triangle(0.0);
        assert_relative_eq!(triangle.closest_point(&Vec3::new(0.0, 0.0, 3.0)), Vec3::zeros());
        assert_relative_eq!(triangle.closest_point(&Vec3::new(-5.0, -5.0, 0.0)), Vec3::new(-1.0, -1.0, 0.0));
        assert_relative_eq!(triangle.closest_point(&Vec3::new(0.0, -4.0, 1.0)), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_contains_projected() {
        let triangle = floor_triangle(0.0);
        assert!(triangle.contains_projected(&Vec3::new(0.0, 0.0, 0.0)));
        assert!(!triangle.contains_projected(&Vec3::new(0.9, 0.9, 0.0)));
    }

    #[test]
    fn test_triangle_triangle_crossing() {
        let flat = floor_triangle(0.0);
        let upright = Triangle::new(
            Vec3::new(0.0, -0.5, -1.0),
            Vec3::new(0.0, 0.5, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let lifted = Triangle::new(
            Vec3::new(0.0, -0.5, 0.5),
            Vec3::new(0.0, 0.5, 0.5),
            Vec3::new(0.0, 0.0, 2.0),
        );
        assert!(flat.hits_triangle(&upright));
        assert!(!flat.hits_triangle(&lifted));
    }

    #[test]
    fn test_coplanar_triangles_separate() {
        let a = floor_triangle(0.0);
        let b = Triangle::new(
            Vec3::new(3.0, -1.0, 0.0),
            Vec3::new(5.0, -1.0, 0.0),
            Vec3::new(4.0, 1.0, 0.0),
        );
        assert!(!a.hits_triangle(&b));
    }

    #[test]
    fn test_sweep_triangle_onto_triangle() {
        let floor = floor_triangle(0.0);
        let falling = floor_triangle(2.0);
        let hit = falling.sweep_triangle(&floor, &Vec3::new(0.0, 0.0, -4.0));
        assert_relative_eq!(hit.fraction, 0.5, epsilon = 1e-9);
        assert_relative_eq!(hit.normal, Vec3::z(), epsilon = 1e-9);
    }
}
