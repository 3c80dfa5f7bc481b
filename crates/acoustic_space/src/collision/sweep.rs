//! Swept-test results and the closed-form solvers shared by swept routines

use crate::foundation::math::{Vec3, EPSILON};

/// Result of a swept test
///
/// `fraction == 1.0` means the moving shape travels the full displacement
/// without contact. Otherwise contact happens at
/// `start + displacement * fraction`, and `normal` is the static shape's
/// outward surface normal at the contact point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Fraction of the displacement travelled before first contact
    pub fraction: f64,
    /// Outward normal of the static shape at the contact (zero on a miss)
    pub normal: Vec3,
}

impl SweepHit {
    /// No contact within the displacement
    pub const MISS: Self = Self {
        fraction: 1.0,
        normal: Vec3::new(0.0, 0.0, 0.0),
    };

    /// Contact at `fraction` with the given normal
    pub fn new(fraction: f64, normal: Vec3) -> Self {
        Self { fraction, normal }
    }

    /// Whether contact happens before the end of the displacement
    pub fn is_hit(&self) -> bool {
        self.fraction < 1.0
    }

    /// Position of a reference point at the moment of contact
    pub fn contact_position(&self, start: &Vec3, displacement: &Vec3) -> Vec3 {
        start + displacement * self.fraction
    }

    /// The same contact seen from the other shape.
    ///
    /// Used when a routine computed "B moving by `-d` against A": the touching
    /// normals of two convex shapes are opposite.
    pub fn flipped(self) -> Self {
        if self.is_hit() {
            Self::new(self.fraction, -self.normal)
        } else {
            Self::MISS
        }
    }

    /// Outcome for shapes that already touch at the start of the sweep.
    ///
    /// Moving apart along `normal` is not a collision; anything else is
    /// contact at fraction 0.
    pub fn resting(normal: Vec3, displacement: &Vec3) -> Self {
        if displacement.dot(&normal) > EPSILON {
            Self::MISS
        } else {
            Self::new(0.0, normal)
        }
    }

    /// The earlier of two results
    pub fn earliest(self, other: Self) -> Self {
        if other.fraction < self.fraction { other } else { self }
    }
}

impl Default for SweepHit {
    fn default() -> Self {
        Self::MISS
    }
}

/// Smallest root of `a t² + b t + c = 0` inside `[0, 1)`.
///
/// Returns `None` when `a` is negligible, the discriminant is negative, or no
/// root lies in range.
pub(crate) fn smallest_root_in_unit(a: f64, b: f64, c: f64) -> Option<f64> {
    smallest_root_below(a, b, c, 1.0)
}

/// Smallest root of `a t² + b t + c = 0` inside `[0, limit)`.
pub(crate) fn smallest_root_below(a: f64, b: f64, c: f64, limit: f64) -> Option<f64> {
    if a.abs() < EPSILON {
        return None;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_discriminant = discriminant.sqrt();
    let inv = 1.0 / (2.0 * a);
    let mut t1 = (-b - sqrt_discriminant) * inv;
    let mut t2 = (-b + sqrt_discriminant) * inv;
    if t1 > t2 {
        std::mem::swap(&mut t1, &mut t2);
    }
    if (0.0..limit).contains(&t1) {
        Some(t1)
    } else if (0.0..limit).contains(&t2) {
        Some(t2)
    } else {
        None
    }
}

/// Earliest fraction in `[0, 1)` at which a point moving from `start` by
/// `displacement` comes within `radius` of `target`.
///
/// The point must start outside the radius; callers handle embedded starts.
pub(crate) fn point_reaches_sphere(start: &Vec3, displacement: &Vec3, target: &Vec3, radius: f64) -> Option<f64> {
    let offset = start - target;
    let a = displacement.norm_squared();
    let b = 2.0 * offset.dot(displacement);
    let c = offset.norm_squared() - radius * radius;
    if b >= 0.0 {
        // Moving away or tangentially; the gap never closes.
        return None;
    }
    smallest_root_in_unit(a, b, c)
}

/// Minimise a convex function on `[0, 1]` by golden-section search.
///
/// Returns `(t, f(t))` for the best sample seen, end points included.
pub(crate) fn minimize_convex_on_unit<F>(f: F) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    const INV_PHI: f64 = 0.618_033_988_749_895;
    const ITERATIONS: usize = 64;

    let mut best = (0.0, f(0.0));
    let end = f(1.0);
    if end < best.1 {
        best = (1.0, end);
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut x1 = hi - INV_PHI * (hi - lo);
    let mut x2 = lo + INV_PHI * (hi - lo);
    let mut f1 = f(x1);
    let mut f2 = f(x2);
    for _ in 0..ITERATIONS {
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - INV_PHI * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + INV_PHI * (hi - lo);
            f2 = f(x2);
        }
        if hi - lo < EPSILON {
            break;
        }
    }
    for candidate in [(x1, f1), (x2, f2)] {
        if candidate.1 < best.1 {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smallest_root_in_unit() {
        // (t - 0.25)(t - 0.75)
        let root = smallest_root_in_unit(1.0, -1.0, 0.1875).unwrap();
        assert_relative_eq!(root, 0.25, epsilon = 1e-12);

        // roots at -1 and 2: none in range
        assert!(smallest_root_in_unit(1.0, -1.0, -2.0).is_none());

        // degenerate quadratic
        assert!(smallest_root_in_unit(0.0, 1.0, -0.5).is_none());
    }

    #[test]
    fn test_point_reaches_sphere() {
        let t = point_reaches_sphere(&Vec3::zeros(), &Vec3::new(10.0, 0.0, 0.0), &Vec3::new(5.0, 0.0, 0.0), 1.0);
        assert_relative_eq!(t.unwrap(), 0.4, epsilon = 1e-12);

        let away = point_reaches_sphere(&Vec3::zeros(), &Vec3::new(-10.0, 0.0, 0.0), &Vec3::new(5.0, 0.0, 0.0), 1.0);
        assert!(away.is_none());
    }

    #[test]
    fn test_resting_policy() {
        let normal = Vec3::x();
        assert_eq!(SweepHit::resting(normal, &Vec3::new(1.0, 0.0, 0.0)), SweepHit::MISS);
        assert_eq!(SweepHit::resting(normal, &Vec3::zeros()).fraction, 0.0);
        assert_eq!(SweepHit::resting(normal, &Vec3::new(-1.0, 0.0, 0.0)).fraction, 0.0);
    }

    #[test]
    fn test_minimize_convex() {
        let (t, value) = minimize_convex_on_unit(|t| (t - 0.3) * (t - 0.3) + 2.0);
        assert_relative_eq!(t, 0.3, epsilon = 1e-6);
        assert_relative_eq!(value, 2.0, epsilon = 1e-9);

        let (t, _) = minimize_convex_on_unit(|t| t);
        assert_eq!(t, 0.0);
    }
}
