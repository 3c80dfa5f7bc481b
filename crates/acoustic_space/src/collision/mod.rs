//! Collision volumes and intersection tests
//!
//! Exact and swept tests between spheres, boxes, capsules, cylinders,
//! triangles and view frustums, plus the ray and bounds helpers the spatial
//! index prunes with.

pub mod aabb;
pub mod capsule;
pub mod cuboid;
pub mod cylinder;
pub mod frustum;
pub mod ray;
mod sat;
pub mod sphere;
pub mod sweep;
pub mod triangle;
pub mod volume;

pub use aabb::{Aabb, Containment};
pub use capsule::Capsule;
pub use cuboid::Cuboid;
pub use cylinder::Cylinder;
pub use frustum::{Frustum, Plane};
pub use ray::Ray;
pub use sphere::Sphere;
pub use sweep::SweepHit;
pub use triangle::Triangle;
pub use volume::{CollisionVolume, VolumeKind};
