//! Queries over a [`WorldOctree`]
//!
//! Each query is a visitor handed to one of the octree traversals. Elements
//! kept at the root because they lie outside the world region are still
//! seen: the root is always visited even when its region is pruned.

use super::element::{Component, ComponentFlags, Element, ElementKind};
use super::layers::LayerMask;
use super::octree::{OctreeNode, OctreeVisitor, Visit};
use super::world::{ElementBuckets, ElementSlot, WorldOctree};
use crate::collision::{Aabb, CollisionVolume, Ray};
use crate::foundation::collections::{ElementKey, NodeKey, SlotMap};
use crate::foundation::math::Vec3;

/// Collects sound-affecting components crossed by a ray segment
pub struct RayTraceVisitor<'a, F> {
    elements: &'a SlotMap<ElementKey, ElementSlot>,
    ray: Ray,
    padded_bounds: Aabb,
    mask: LayerMask,
    callback: F,
}

impl<'a, F> RayTraceVisitor<'a, F>
where
    F: FnMut(ElementKey, &Component),
{
    /// Ray from `origin` along `direction` for `length`, reporting components
    /// on any layer in `mask`
    pub fn new(world: &'a WorldOctree, origin: Vec3, direction: Vec3, length: f64, mask: LayerMask, callback: F) -> Self {
        let ray = Ray::new(origin, direction, length);
        Self {
            elements: &world.elements,
            padded_bounds: ray.bounds(world.config.ray_padding),
            ray,
            mask,
            callback,
        }
    }

    /// The traced segment
    pub fn ray(&self) -> &Ray {
        &self.ray
    }
}

impl<F> OctreeVisitor<ElementBuckets> for RayTraceVisitor<'_, F>
where
    F: FnMut(ElementKey, &Component),
{
    fn visit(&mut self, _key: NodeKey, node: &OctreeNode<ElementBuckets>) -> Visit {
        if node.parent().is_some() {
            let region = node.bounds();
            if !region.intersects(&self.padded_bounds) || !self.ray.intersects_aabb(&region) {
                return Visit::SkipChildren;
            }
        }

        for &key in &node.payload.components {
            let Some(Element::Component(component)) = self.elements.get(key).map(|slot| &slot.element) else {
                continue;
            };
            if component.flags.contains(ComponentFlags::AFFECTS_SOUND)
                && component.layers.intersects(self.mask)
                && self.ray.intersects_aabb(&component.bounds)
            {
                (self.callback)(key, component);
            }
        }
        Visit::Continue
    }
}

/// Finds speakers or sound level meters whose range reaches a point
pub struct ProximityVisitor<'a> {
    elements: &'a SlotMap<ElementKey, ElementSlot>,
    position: Vec3,
    mask: LayerMask,
    kind: ElementKind,
    results: &'a mut Vec<ElementKey>,
}

impl<'a> ProximityVisitor<'a> {
    /// Search for elements of `kind` (speakers or meters) in range of
    /// `position`, appending matches to `results`
    pub fn new(
        world: &'a WorldOctree,
        position: Vec3,
        mask: LayerMask,
        kind: ElementKind,
        results: &'a mut Vec<ElementKey>,
    ) -> Self {
        assert!(
            matches!(kind, ElementKind::Speaker | ElementKind::SoundLevelMeter),
            "proximity search needs ranged elements, got {kind:?}"
        );
        Self {
            elements: &world.elements,
            position,
            mask,
            kind,
            results,
        }
    }

    fn reaches(&self, element: &Element) -> bool {
        let (position, range, layers) = match element {
            Element::Speaker(s) => (s.position, s.range, s.layers),
            Element::SoundLevelMeter(m) => (m.position, m.range, m.layers),
            _ => return false,
        };
        layers.intersects(self.mask) && (position - self.position).norm_squared() <= range * range
    }
}

impl OctreeVisitor<ElementBuckets> for ProximityVisitor<'_> {
    fn visit(&mut self, _key: NodeKey, node: &OctreeNode<ElementBuckets>) -> Visit {
        for &key in node.payload.bucket(self.kind) {
            if let Some(slot) = self.elements.get(key) {
                if self.reaches(&slot.element) {
                    self.results.push(key);
                }
            }
        }
        Visit::Continue
    }
}

impl WorldOctree {
    /// Report every sound-affecting component on a layer in `mask` whose
    /// bounds the segment touches
    pub fn ray_trace<F>(&self, origin: Vec3, direction: Vec3, length: f64, mask: LayerMask, callback: F)
    where
        F: FnMut(ElementKey, &Component),
    {
        let mut visitor = RayTraceVisitor::new(self, origin, direction, length, mask, callback);
        self.octree.traverse(&mut visitor);
    }

    /// Whether an opaque sound-affecting component lies between two points.
    /// Components flagged `TRANSMISSIVE` do not block.
    pub fn is_path_blocked(&self, from: Vec3, to: Vec3, mask: LayerMask) -> bool {
        let delta = to - from;
        let mut blocked = false;
        self.ray_trace(from, delta, delta.norm(), mask, |_, component| {
            if !component.flags.contains(ComponentFlags::TRANSMISSIVE) {
                blocked = true;
            }
        });
        blocked
    }

    fn find_in_range(&self, position: Vec3, mask: LayerMask, kind: ElementKind, results: &mut Vec<ElementKey>) {
        let query = Aabb::from_center_half_size(position, Vec3::repeat(self.config.point_half_size));
        let root = self.octree.root();
        let root_node = self.octree.node(root);
        let mut visitor = ProximityVisitor::new(self, position, mask, kind, results);
        if root_node.bounds().intersects(&query) {
            self.octree.traverse_range(&query, &mut visitor);
        } else {
            visitor.visit(root, root_node);
        }
    }

    /// Append the speakers on a layer in `mask` whose range reaches `position`
    pub fn find_speakers_near(&self, position: Vec3, mask: LayerMask, results: &mut Vec<ElementKey>) {
        self.find_in_range(position, mask, ElementKind::Speaker, results);
    }

    /// Append the sound level meters on a layer in `mask` whose range reaches `position`
    pub fn find_meters_near(&self, position: Vec3, mask: LayerMask, results: &mut Vec<ElementKey>) {
        self.find_in_range(position, mask, ElementKind::SoundLevelMeter, results);
    }

    /// Report the components and environment probes whose bounds `volume` hits
    pub fn query_volume<F>(&self, volume: &CollisionVolume, mut callback: F)
    where
        F: FnMut(ElementKey, &Element),
    {
        let mut visit = |_key: NodeKey, node: &OctreeNode<ElementBuckets>| {
            for &key in node.payload.components.iter().chain(&node.payload.probes) {
                let Some(slot) = self.elements.get(key) else {
                    continue;
                };
                let bounds = slot.element.bounds(self.config.point_half_size);
                if volume.hits(&CollisionVolume::from(bounds)) {
                    callback(key, &slot.element);
                }
            }
            Visit::Continue
        };

        let root = self.octree.root();
        let root_node = self.octree.node(root);
        if volume.hits(&CollisionVolume::from(root_node.bounds())) {
            self.octree.traverse_volume(volume, &mut visit);
        } else {
            visit(root, root_node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Sphere;
    use crate::config::IndexConfig;

    fn world() -> WorldOctree {
        WorldOctree::new(IndexConfig::cube(Vec3::zeros(), 100.0, 6))
    }

    fn wall(world: &mut WorldOctree, center: Vec3, flags: ComponentFlags, layers: LayerMask) -> ElementKey {
        let key = world.register(Element::component(
            Aabb::from_center_half_size(center, Vec3::repeat(1.0)),
            layers,
            flags,
        ));
        world.insert_default(key).unwrap();
        key
    }

    #[test]
    fn test_ray_trace_hits_ahead_only() {
        let mut world = world();
        let ahead = wall(&mut world, Vec3::new(5.0, 0.0, 0.0), ComponentFlags::AFFECTS_SOUND, LayerMask::ALL);
        let _behind = wall(&mut world, Vec3::new(-5.0, 0.0, 0.0), ComponentFlags::AFFECTS_SOUND, LayerMask::ALL);

        let mut hits = Vec::new();
        world.ray_trace(Vec3::zeros(), Vec3::x(), 10.0, LayerMask::ALL, |key, _| hits.push(key));
        assert_eq!(hits, vec![ahead]);
    }

    #[test]
    fn test_ray_trace_filters() {
        let mut world = world();
        let silent = wall(&mut world, Vec3::new(5.0, 0.0, 0.0), ComponentFlags::STATIC, LayerMask::ALL);
        let other_layer = wall(&mut world, Vec3::new(7.0, 0.0, 0.0), ComponentFlags::AFFECTS_SOUND, LayerMask::layer(4));
        let far = wall(&mut world, Vec3::new(20.0, 0.0, 0.0), ComponentFlags::AFFECTS_SOUND, LayerMask::layer(0));

        let mut hits = Vec::new();
        world.ray_trace(Vec3::zeros(), Vec3::x(), 10.0, LayerMask::layer(0), |key, _| hits.push(key));
        assert!(hits.is_empty());

        world.ray_trace(Vec3::zeros(), Vec3::x(), 30.0, LayerMask::ALL, |key, _| hits.push(key));
        assert!(!hits.contains(&silent));
        assert!(hits.contains(&other_layer));
        assert!(hits.contains(&far));
    }

    #[test]
    fn test_path_blocking() {
        let mut world = world();
        wall(&mut world, Vec3::new(0.0, 10.0, 0.0), ComponentFlags::AFFECTS_SOUND, LayerMask::ALL);
        wall(
            &mut world,
            Vec3::new(0.0, -10.0, 0.0),
            ComponentFlags::AFFECTS_SOUND | ComponentFlags::TRANSMISSIVE,
            LayerMask::ALL,
        );

        assert!(world.is_path_blocked(Vec3::zeros(), Vec3::new(0.0, 20.0, 0.0), LayerMask::ALL));
        assert!(!world.is_path_blocked(Vec3::zeros(), Vec3::new(0.0, -20.0, 0.0), LayerMask::ALL));
        assert!(!world.is_path_blocked(Vec3::zeros(), Vec3::new(20.0, 0.0, 0.0), LayerMask::ALL));
    }

    #[test]
    fn test_find_speakers_near() {
        let mut world = world();
        let near = world.register(Element::speaker(Vec3::new(10.0, 0.0, 0.0), 5.0, LayerMask::ALL));
        let short = world.register(Element::speaker(Vec3::new(10.0, 10.0, 0.0), 5.0, LayerMask::ALL));
        let muted = world.register(Element::speaker(Vec3::new(8.0, 0.0, 0.0), 5.0, LayerMask::layer(3)));
        let meter = world.register(Element::sound_level_meter(Vec3::new(9.0, 0.0, 0.0), 5.0, LayerMask::ALL));
        for key in [near, short, muted, meter] {
            world.insert_default(key).unwrap();
        }

        let listener = Vec3::new(7.0, 0.0, 0.0);
        let mut speakers = Vec::new();
        world.find_speakers_near(listener, LayerMask::layer(0), &mut speakers);
        assert_eq!(speakers, vec![near]);

        let mut meters = Vec::new();
        world.find_meters_near(listener, LayerMask::ALL, &mut meters);
        assert_eq!(meters, vec![meter]);
    }

    #[test]
    fn test_outside_world_still_found() {
        let mut world = world();
        let speaker = world.register(Element::speaker(Vec3::new(300.0, 0.0, 0.0), 10.0, LayerMask::ALL));
        assert_eq!(world.insert_default(speaker), Ok(world.octree().root()));

        let mut found = Vec::new();
        world.find_speakers_near(Vec3::new(305.0, 0.0, 0.0), LayerMask::ALL, &mut found);
        assert_eq!(found, vec![speaker]);
    }

    #[test]
    fn test_query_volume() {
        let mut world = world();
        let touched = wall(&mut world, Vec3::new(30.0, 30.0, 30.0), ComponentFlags::empty(), LayerMask::ALL);
        let _missed = wall(&mut world, Vec3::new(-30.0, 30.0, 30.0), ComponentFlags::empty(), LayerMask::ALL);
        let probe = world.register(Element::environment_probe(
            Aabb::new(Vec3::new(25.0, 25.0, 25.0), Vec3::new(28.0, 28.0, 28.0)),
            LayerMask::ALL,
        ));
        world.insert_default(probe).unwrap();
        let mic = world.register(Element::microphone(Vec3::new(30.0, 30.0, 30.0), LayerMask::ALL));
        world.insert_default(mic).unwrap();

        let volume = CollisionVolume::from(Sphere::new(Vec3::new(29.0, 29.0, 29.0), 2.0));
        let mut found = Vec::new();
        world.query_volume(&volume, |key, _| found.push(key));
        found.sort();
        let mut expected = vec![touched, probe];
        expected.sort();
        assert_eq!(found, expected);
    }
}
