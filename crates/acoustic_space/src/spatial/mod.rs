//! Spatial partitioning data structures
//!
//! Provides the arena octree, the world index of audio elements built on it,
//! and the ray tracing, proximity and volume queries over that index.

pub mod element;
pub mod layers;
pub mod octree;
pub mod query;
pub mod world;

pub use element::{
    Component, ComponentFlags, Element, ElementKind, EnvironmentProbe, Microphone, SoundLevelMeter, Speaker,
};
pub use layers::LayerMask;
pub use octree::{Octree, OctreeNode, OctreeVisitor, Visit};
pub use query::{ProximityVisitor, RayTraceVisitor};
pub use world::{ElementBuckets, WorldOctree};
