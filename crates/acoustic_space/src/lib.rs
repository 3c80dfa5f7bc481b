//! # Acoustic Space
//!
//! Collision volumes and a dynamic octree index for spatial audio.
//!
//! ## Features
//!
//! - **Collision Volumes**: Static and swept tests between spheres, boxes,
//!   capsules, cylinders, triangles and view frustums
//! - **Octree Index**: Arena-backed octree holding scene components,
//!   microphones, speakers, environment probes and sound level meters
//! - **Queries**: Occlusion ray traces, speaker proximity and volume overlap
//! - **Configuration**: TOML or RON index settings
//!
//! ## Quick Start
//!
//! ```rust
//! use acoustic_space::prelude::*;
//!
//! let mut world = WorldOctree::new(IndexConfig::cube(Vec3::zeros(), 100.0, 6));
//!
//! let wall = world.register(Element::component(
//!     Aabb::from_center_half_size(Vec3::new(5.0, 0.0, 0.0), Vec3::repeat(1.0)),
//!     LayerMask::ALL,
//!     ComponentFlags::AFFECTS_SOUND,
//! ));
//! world.insert_default(wall)?;
//!
//! assert!(world.is_path_blocked(Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0), LayerMask::ALL));
//! # Ok::<(), IndexError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod collision;
pub mod config;
pub mod error;
pub mod foundation;
pub mod spatial;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        collision::{
            Aabb, Capsule, CollisionVolume, Cuboid, Cylinder, Frustum, Plane, Ray, Sphere, SweepHit, Triangle,
            VolumeKind,
        },
        config::{Config, ConfigError, IndexConfig},
        error::{IndexError, IndexResult},
        foundation::{
            collections::{ElementKey, NodeKey},
            math::{Quat, Vec3},
        },
        spatial::{ComponentFlags, Element, ElementKind, LayerMask, Visit, WorldOctree},
    };
}
