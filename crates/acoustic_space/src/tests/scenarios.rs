//! End-to-end scenarios combining collision volumes and the world index

use crate::collision::{Aabb, CollisionVolume, Cuboid, Sphere};
use crate::config::IndexConfig;
use crate::foundation::logging;
use crate::foundation::math::Vec3;
use crate::spatial::{ComponentFlags, Element, LayerMask, WorldOctree};
use approx::assert_relative_eq;

#[test]
fn test_sphere_sweeps_into_box() {
    logging::init_for_tests();
    let sphere = CollisionVolume::from(Sphere::new(Vec3::zeros(), 1.0));
    let block = CollisionVolume::from(Cuboid::new(Vec3::new(3.0, 0.0, 0.0), Vec3::repeat(1.0)));

    assert!(!sphere.hits(&block));

    let hit = sphere.move_hits(&block, &Vec3::new(5.0, 0.0, 0.0));
    assert!(hit.is_hit());
    assert_relative_eq!(hit.fraction, 0.2, epsilon = 1e-9);
    assert_relative_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-9);
}

#[test]
fn test_speaker_descends_to_depth_limit() {
    logging::init_for_tests();
    let mut world = WorldOctree::new(IndexConfig::cube(Vec3::zeros(), 100.0, 4));
    let speaker = world.register(Element::speaker(Vec3::new(50.0, 50.0, 50.0), 1.0, LayerMask::ALL));

    let node = world.insert(speaker, 4).unwrap();
    let chain = 1 + world.octree().ancestors(node).count();
    assert!(chain <= 4);

    let bounds = world.bounds_of(speaker).unwrap();
    assert!(world.node(node).bounds().contains_aabb(&bounds));
    assert_eq!(world.node_of(speaker).unwrap(), Some(node));
}

#[test]
fn test_ray_trace_sees_only_the_box_ahead() {
    logging::init_for_tests();
    let mut world = WorldOctree::new(IndexConfig::cube(Vec3::zeros(), 100.0, 6));
    let mut add_box = |center: Vec3| {
        let key = world.register(Element::component(
            Aabb::from_center_half_size(center, Vec3::repeat(1.0)),
            LayerMask::ALL,
            ComponentFlags::AFFECTS_SOUND,
        ));
        world.insert_default(key).unwrap();
        key
    };
    let ahead = add_box(Vec3::new(5.0, 0.0, 0.0));
    let behind = add_box(Vec3::new(-5.0, 0.0, 0.0));

    let mut seen = Vec::new();
    world.ray_trace(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), 10.0, LayerMask::ALL, |key, _| seen.push(key));
    assert!(seen.contains(&ahead));
    assert!(!seen.contains(&behind));
}

#[test]
fn test_identical_spheres() {
    let a = CollisionVolume::from(Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5));
    let b = a;
    assert!(a.hits(&b));
    assert_relative_eq!(a.move_hits(&b, &Vec3::zeros()).fraction, 0.0);
}

#[test]
fn test_moving_listener_tracks_speakers() {
    logging::init_for_tests();
    let mut world = WorldOctree::new(IndexConfig::cube(Vec3::zeros(), 64.0, 5));
    let speaker = world.register(Element::speaker(Vec3::new(10.0, 0.0, 0.0), 4.0, LayerMask::layer(2)));
    world.insert_default(speaker).unwrap();

    let mut found = Vec::new();
    world.find_speakers_near(Vec3::new(20.0, 0.0, 0.0), LayerMask::ALL, &mut found);
    assert!(found.is_empty());

    // Move the speaker toward the listener and re-home it.
    if let Element::Speaker(s) = world.element_mut(speaker).unwrap() {
        s.position = Vec3::new(18.0, 0.0, 0.0);
    }
    world.insert_default(speaker).unwrap();

    world.find_speakers_near(Vec3::new(20.0, 0.0, 0.0), LayerMask::ALL, &mut found);
    assert_eq!(found, vec![speaker]);
    assert_eq!(world.len_in_tree(), 1);
}
