//! Separating Axis Theorem helpers for convex polytopes
//!
//! Boxes and triangles project onto an axis as an interval. The static test
//! looks for one axis with disjoint intervals; the swept test tracks per-axis
//! entry and exit fractions under a linear displacement.

use super::sweep::SweepHit;
use crate::foundation::math::{Vec3, EPSILON, EPSILON_SQUARED};

/// A convex shape that can be projected onto an axis
pub(crate) trait Projectable {
    /// `(min, max)` of `axis · p` over the shape
    fn project(&self, axis: &Vec3) -> (f64, f64);
}

/// Cross products of every edge pair, skipping near-parallel pairs
pub(crate) fn edge_cross_axes(edges_a: &[Vec3], edges_b: &[Vec3], axes: &mut Vec<Vec3>) {
    for edge_a in edges_a {
        for edge_b in edges_b {
            let axis = edge_a.cross(edge_b);
            if axis.norm_squared() > EPSILON_SQUARED {
                axes.push(axis);
            }
        }
    }
}

/// True when no candidate axis separates the two shapes
pub(crate) fn overlap_on_all_axes<A, B>(a: &A, b: &B, axes: &[Vec3]) -> bool
where
    A: Projectable + ?Sized,
    B: Projectable + ?Sized,
{
    axes.iter().all(|axis| {
        if axis.norm_squared() < EPSILON_SQUARED {
            return true; // Degenerate axis, skip
        }
        let (min_a, max_a) = a.project(axis);
        let (min_b, max_b) = b.project(axis);
        max_a >= min_b && max_b >= min_a
    })
}

/// Swept SAT: `a` moves by `displacement`, `b` is static.
///
/// Per axis, the projected gap closes at an entry fraction and reopens at an
/// exit fraction. The shapes first touch at the latest entry, provided it
/// precedes the earliest exit. An axis whose gap never closes rejects
/// immediately. When every axis already overlaps the shapes are embedded and
/// the normal is the axis of least penetration.
pub(crate) fn sweep_separating_axes<A, B>(a: &A, b: &B, axes: &[Vec3], displacement: &Vec3) -> SweepHit
where
    A: Projectable + ?Sized,
    B: Projectable + ?Sized,
{
    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;
    let mut enter_normal = Vec3::zeros();
    let mut least_depth = f64::INFINITY;
    let mut least_normal = Vec3::zeros();

    for raw_axis in axes {
        let Some(axis) = raw_axis.try_normalize(EPSILON) else {
            continue;
        };
        let (min_a, max_a) = a.project(&axis);
        let (min_b, max_b) = b.project(&axis);
        let speed = displacement.dot(&axis);

        let (enter, exit, normal) = if max_a < min_b {
            // a below b on this axis
            if speed <= EPSILON {
                return SweepHit::MISS;
            }
            ((min_b - max_a) / speed, (max_b - min_a) / speed, -axis)
        } else if max_b < min_a {
            if speed >= -EPSILON {
                return SweepHit::MISS;
            }
            ((max_b - min_a) / speed, (min_b - max_a) / speed, axis)
        } else {
            let push_positive = max_b - min_a;
            let push_negative = max_a - min_b;
            let (depth, normal) = if push_positive < push_negative {
                (push_positive, axis)
            } else {
                (push_negative, -axis)
            };
            if depth < least_depth {
                least_depth = depth;
                least_normal = normal;
            }
            let exit = if speed > EPSILON {
                (max_b - min_a) / speed
            } else if speed < -EPSILON {
                (min_b - max_a) / speed
            } else {
                f64::INFINITY
            };
            (f64::NEG_INFINITY, exit, normal)
        };

        if enter > t_enter {
            t_enter = enter;
            enter_normal = normal;
        }
        t_exit = t_exit.min(exit);
        if t_enter >= 1.0 || t_enter > t_exit {
            return SweepHit::MISS;
        }
    }

    if t_enter == f64::NEG_INFINITY {
        if least_depth == f64::INFINITY {
            // No usable axis at all
            return SweepHit::MISS;
        }
        return SweepHit::resting(least_normal, displacement);
    }
    SweepHit::new(t_enter.max(0.0), enter_normal)
}
