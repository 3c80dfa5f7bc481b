//! Collision volume protocol
//!
//! A closed set of six shapes with pairwise intersection tests. Dispatch is
//! two-level: the outer `match` picks the argument's shape, the inner one
//! picks `self`'s shape. Each unordered pair has a single routine, owned by the
//! shape with the lower [`VolumeKind`]; the reversed order calls it with the
//! arguments swapped. For swept tests, "A moves by `d` against B" is rewritten
//! as "B moves by `-d` against A" and the normal is negated.

use super::aabb::Aabb;
use super::capsule::Capsule;
use super::cuboid::Cuboid;
use super::cylinder::Cylinder;
use super::frustum::{Frustum, Plane};
use super::sphere::Sphere;
use super::sweep::SweepHit;
use super::triangle::Triangle;
use crate::foundation::math::{Vec3, EPSILON};

/// Shape tag; the order decides which shape owns a pair routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VolumeKind {
    /// [`Sphere`]
    Sphere,
    /// [`Cuboid`]
    Cuboid,
    /// [`Capsule`]
    Capsule,
    /// [`Cylinder`]
    Cylinder,
    /// [`Triangle`]
    Triangle,
    /// [`Frustum`]
    Frustum,
}

impl VolumeKind {
    /// Every kind in dispatch order
    pub const ALL: [VolumeKind; 6] = [
        VolumeKind::Sphere,
        VolumeKind::Cuboid,
        VolumeKind::Capsule,
        VolumeKind::Cylinder,
        VolumeKind::Triangle,
        VolumeKind::Frustum,
    ];

    /// Whether a static test exists for this pair (order does not matter)
    pub fn has_static_test(self, other: VolumeKind) -> bool {
        let (low, high) = if self <= other { (self, other) } else { (other, self) };
        !matches!(
            (low, high),
            (Self::Cuboid, Self::Cylinder)
                | (Self::Cylinder, Self::Cylinder)
                | (Self::Cylinder, Self::Triangle)
                | (Self::Triangle, Self::Frustum)
                | (Self::Frustum, Self::Frustum)
        )
    }

    /// Whether a swept test exists for this pair (order does not matter)
    pub fn has_swept_test(self, other: VolumeKind) -> bool {
        let (low, high) = if self <= other { (self, other) } else { (other, self) };
        matches!(
            (low, high),
            (Self::Sphere, Self::Sphere)
                | (Self::Sphere, Self::Cuboid)
                | (Self::Sphere, Self::Capsule)
                | (Self::Sphere, Self::Triangle)
                | (Self::Cuboid, Self::Cuboid)
                | (Self::Cuboid, Self::Triangle)
                | (Self::Triangle, Self::Triangle)
        )
    }
}

/// Any of the six collision shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionVolume {
    /// Sphere
    Sphere(Sphere),
    /// Axis-aligned or oriented box
    Cuboid(Cuboid),
    /// Capsule, possibly tapered
    Capsule(Capsule),
    /// Cylinder, possibly tapered
    Cylinder(Cylinder),
    /// Single triangle
    Triangle(Triangle),
    /// View frustum
    Frustum(Frustum),
}

fn unsupported_static(a: VolumeKind, b: VolumeKind) -> bool {
    log::trace!("No static test for {a:?} vs {b:?}; reporting no contact");
    false
}

fn unsupported_sweep(a: VolumeKind, b: VolumeKind) -> SweepHit {
    log::trace!("No swept test for {a:?} vs {b:?}; reporting no contact");
    SweepHit::MISS
}

impl CollisionVolume {
    /// Shape tag
    pub fn kind(&self) -> VolumeKind {
        match self {
            Self::Sphere(_) => VolumeKind::Sphere,
            Self::Cuboid(_) => VolumeKind::Cuboid,
            Self::Capsule(_) => VolumeKind::Capsule,
            Self::Cylinder(_) => VolumeKind::Cylinder,
            Self::Triangle(_) => VolumeKind::Triangle,
            Self::Frustum(_) => VolumeKind::Frustum,
        }
    }

    /// World-space bounds; `None` for a frustum whose planes do not close
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Self::Sphere(s) => Some(s.bounds()),
            Self::Cuboid(c) => Some(c.bounds()),
            Self::Capsule(c) => Some(c.bounds()),
            Self::Cylinder(c) => Some(c.bounds()),
            Self::Triangle(t) => Some(t.bounds()),
            Self::Frustum(f) => f.bounds(),
        }
    }

    /// Whether `point` lies inside or on the shape (on the plane for a triangle)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        match self {
            Self::Sphere(s) => s.contains_point(point),
            Self::Cuboid(c) => c.contains_point(point),
            Self::Capsule(c) => c.contains_point(point),
            Self::Cylinder(c) => c.contains_point(point),
            Self::Triangle(t) => t.distance(point) <= EPSILON,
            Self::Frustum(f) => f.contains_point(point),
        }
    }

    /// The same shape moved by `offset`
    pub fn translated(&self, offset: &Vec3) -> Self {
        let mut moved = *self;
        match &mut moved {
            Self::Sphere(s) => s.set_center(s.center() + offset),
            Self::Cuboid(c) => c.set_center(c.center() + offset),
            Self::Capsule(c) => c.set_position(c.position() + offset),
            Self::Cylinder(c) => c.set_position(c.position() + offset),
            Self::Triangle(t) => {
                let [v0, v1, v2] = *t.corners();
                t.set_corners(v0 + offset, v1 + offset, v2 + offset);
            }
            Self::Frustum(f) => {
                for plane in &mut f.planes {
                    *plane = Plane {
                        normal: plane.normal,
                        distance: plane.distance - plane.normal.dot(offset),
                    };
                }
            }
        }
        moved
    }

    /// Static intersection test; touching counts. Symmetric in its arguments.
    pub fn hits(&self, other: &CollisionVolume) -> bool {
        match other {
            Self::Sphere(b) => self.hits_sphere(b),
            Self::Cuboid(b) => self.hits_cuboid(b),
            Self::Capsule(b) => self.hits_capsule(b),
            Self::Cylinder(b) => self.hits_cylinder(b),
            Self::Triangle(b) => self.hits_triangle(b),
            Self::Frustum(b) => self.hits_frustum(b),
        }
    }

    fn hits_sphere(&self, b: &Sphere) -> bool {
        match self {
            Self::Sphere(a) => a.hits_sphere(b),
            Self::Cuboid(a) => b.hits_cuboid(a),
            Self::Capsule(a) => b.hits_capsule(a),
            Self::Cylinder(a) => b.hits_cylinder(a),
            Self::Triangle(a) => b.hits_triangle(a),
            Self::Frustum(a) => b.hits_frustum(a),
        }
    }

    fn hits_cuboid(&self, b: &Cuboid) -> bool {
        match self {
            Self::Sphere(a) => a.hits_cuboid(b),
            Self::Cuboid(a) => a.hits_cuboid(b),
            Self::Capsule(a) => b.hits_capsule(a),
            Self::Triangle(a) => b.hits_triangle(a),
            Self::Frustum(a) => b.hits_frustum(a),
            Self::Cylinder(_) => unsupported_static(self.kind(), VolumeKind::Cuboid),
        }
    }

    fn hits_capsule(&self, b: &Capsule) -> bool {
        match self {
            Self::Sphere(a) => a.hits_capsule(b),
            Self::Cuboid(a) => a.hits_capsule(b),
            Self::Capsule(a) => a.hits_capsule(b),
            Self::Cylinder(a) => b.hits_cylinder(a),
            Self::Triangle(a) => b.hits_triangle(a),
            Self::Frustum(a) => b.hits_frustum(a),
        }
    }

    fn hits_cylinder(&self, b: &Cylinder) -> bool {
        match self {
            Self::Sphere(a) => a.hits_cylinder(b),
            Self::Capsule(a) => a.hits_cylinder(b),
            Self::Frustum(a) => b.hits_frustum(a),
            Self::Cuboid(_) | Self::Cylinder(_) | Self::Triangle(_) => {
                unsupported_static(self.kind(), VolumeKind::Cylinder)
            }
        }
    }

    fn hits_triangle(&self, b: &Triangle) -> bool {
        match self {
            Self::Sphere(a) => a.hits_triangle(b),
            Self::Cuboid(a) => a.hits_triangle(b),
            Self::Capsule(a) => a.hits_triangle(b),
            Self::Triangle(a) => a.hits_triangle(b),
            Self::Cylinder(_) | Self::Frustum(_) => unsupported_static(self.kind(), VolumeKind::Triangle),
        }
    }

    fn hits_frustum(&self, b: &Frustum) -> bool {
        match self {
            Self::Sphere(a) => a.hits_frustum(b),
            Self::Cuboid(a) => a.hits_frustum(b),
            Self::Capsule(a) => a.hits_frustum(b),
            Self::Cylinder(a) => a.hits_frustum(b),
            Self::Triangle(_) | Self::Frustum(_) => unsupported_static(self.kind(), VolumeKind::Frustum),
        }
    }

    /// Swept test: `self` moves by `displacement`, `other` stays put.
    ///
    /// See [`SweepHit`] for the meaning of the result. The normal is the
    /// outward normal of `other` at the contact.
    pub fn move_hits(&self, other: &CollisionVolume, displacement: &Vec3) -> SweepHit {
        match other {
            Self::Sphere(b) => self.sweep_against_sphere(b, displacement),
            Self::Cuboid(b) => self.sweep_against_cuboid(b, displacement),
            Self::Capsule(b) => self.sweep_against_capsule(b, displacement),
            Self::Triangle(b) => self.sweep_against_triangle(b, displacement),
            Self::Cylinder(_) | Self::Frustum(_) => unsupported_sweep(self.kind(), other.kind()),
        }
    }

    fn sweep_against_sphere(&self, b: &Sphere, d: &Vec3) -> SweepHit {
        match self {
            Self::Sphere(a) => a.sweep_sphere(b, d),
            Self::Cuboid(a) => b.sweep_cuboid(a, &-d).flipped(),
            Self::Capsule(a) => b.sweep_capsule(a, &-d).flipped(),
            Self::Triangle(a) => b.sweep_triangle(a, &-d).flipped(),
            Self::Cylinder(_) | Self::Frustum(_) => unsupported_sweep(self.kind(), VolumeKind::Sphere),
        }
    }

    fn sweep_against_cuboid(&self, b: &Cuboid, d: &Vec3) -> SweepHit {
        match self {
            Self::Sphere(a) => a.sweep_cuboid(b, d),
            Self::Cuboid(a) => a.sweep_cuboid(b, d),
            Self::Triangle(a) => b.sweep_triangle(a, &-d).flipped(),
            Self::Capsule(_) | Self::Cylinder(_) | Self::Frustum(_) => {
                unsupported_sweep(self.kind(), VolumeKind::Cuboid)
            }
        }
    }

    fn sweep_against_capsule(&self, b: &Capsule, d: &Vec3) -> SweepHit {
        match self {
            Self::Sphere(a) => a.sweep_capsule(b, d),
            _ => unsupported_sweep(self.kind(), VolumeKind::Capsule),
        }
    }

    fn sweep_against_triangle(&self, b: &Triangle, d: &Vec3) -> SweepHit {
        match self {
            Self::Sphere(a) => a.sweep_triangle(b, d),
            Self::Cuboid(a) => a.sweep_triangle(b, d),
            Self::Triangle(a) => a.sweep_triangle(b, d),
            Self::Capsule(_) | Self::Cylinder(_) | Self::Frustum(_) => {
                unsupported_sweep(self.kind(), VolumeKind::Triangle)
            }
        }
    }
}

impl From<Sphere> for CollisionVolume {
    fn from(shape: Sphere) -> Self {
        Self::Sphere(shape)
    }
}

impl From<Cuboid> for CollisionVolume {
    fn from(shape: Cuboid) -> Self {
        Self::Cuboid(shape)
    }
}

impl From<Capsule> for CollisionVolume {
    fn from(shape: Capsule) -> Self {
        Self::Capsule(shape)
    }
}

impl From<Cylinder> for CollisionVolume {
    fn from(shape: Cylinder) -> Self {
        Self::Cylinder(shape)
    }
}

impl From<Triangle> for CollisionVolume {
    fn from(shape: Triangle) -> Self {
        Self::Triangle(shape)
    }
}

impl From<Frustum> for CollisionVolume {
    fn from(shape: Frustum) -> Self {
        Self::Frustum(shape)
    }
}

impl From<Aabb> for CollisionVolume {
    fn from(bounds: Aabb) -> Self {
        Self::Cuboid(Cuboid::from_aabb(&bounds))
    }
}
