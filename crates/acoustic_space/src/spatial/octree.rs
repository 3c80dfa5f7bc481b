//! Octree spatial partitioning structure
//!
//! A lazily expanded octree over a fixed root region. Nodes live in a slot
//! map arena and refer to their children and parent by key. A node stays a
//! leaf until its first child is created and only loses children through
//! [`Octree::clear_subtree`].

use crate::collision::{Aabb, CollisionVolume, Containment};
use crate::foundation::collections::{NodeKey, SlotMap};
use crate::foundation::math::Vec3;

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode<P> {
    center: Vec3,
    half_size: Vec3,
    depth: u32,
    children: [Option<NodeKey>; 8],
    parent: Option<NodeKey>,

    /// Data stored at this node
    pub payload: P,
}

impl<P> OctreeNode<P> {
    /// Center of the node region
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Half size of the node region
    pub fn half_size(&self) -> Vec3 {
        self.half_size
    }

    /// Depth in the tree (0 = root)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// World-space bounds of this node
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_size(self.center, self.half_size)
    }

    /// Parent key, `None` for the root
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child keys indexed by octant
    pub fn children(&self) -> &[Option<NodeKey>; 8] {
        &self.children
    }

    /// Child in `octant`, if created
    pub fn child(&self, octant: usize) -> Option<NodeKey> {
        self.children[octant]
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Octant index (0-7) of a point relative to the node center.
    ///
    /// Bit 0 is +X, bit 1 is +Y, bit 2 is +Z; a coordinate equal to the
    /// center counts as the positive side.
    pub fn octant_of_point(&self, point: &Vec3) -> usize {
        let x_bit = usize::from(point.x >= self.center.x);
        let y_bit = usize::from(point.y >= self.center.y);
        let z_bit = usize::from(point.z >= self.center.z);
        (z_bit << 2) | (y_bit << 1) | x_bit
    }

    /// Octant fully holding a box, or `None` when it straddles the center
    /// on any axis
    pub fn octant_of_box(&self, center: &Vec3, half_size: &Vec3) -> Option<usize> {
        let mut octant = 0;
        for axis in 0..3 {
            if center[axis] - half_size[axis] >= self.center[axis] {
                octant |= 1 << axis;
            } else if center[axis] + half_size[axis] >= self.center[axis] {
                return None;
            }
        }
        Some(octant)
    }

    /// Center of the child region in `octant`
    pub fn child_center(&self, octant: usize) -> Vec3 {
        let quarter = self.half_size * 0.5;
        let sign = |bit: usize| if octant & bit != 0 { 1.0 } else { -1.0 };
        self.center + Vec3::new(quarter.x * sign(1), quarter.y * sign(2), quarter.z * sign(4))
    }
}

/// What a visitor wants after seeing a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's children
    Continue,
    /// Skip the node's subtree
    SkipChildren,
}

/// Callback for octree traversals
pub trait OctreeVisitor<P> {
    /// Called once per visited node, parents before children
    fn visit(&mut self, key: NodeKey, node: &OctreeNode<P>) -> Visit;
}

impl<P, F> OctreeVisitor<P> for F
where
    F: FnMut(NodeKey, &OctreeNode<P>) -> Visit,
{
    fn visit(&mut self, key: NodeKey, node: &OctreeNode<P>) -> Visit {
        self(key, node)
    }
}

/// Octree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct Octree<P> {
    nodes: SlotMap<NodeKey, OctreeNode<P>>,
    root: NodeKey,
}

impl<P: Default> Octree<P> {
    /// Create an octree holding only a root node over the given region
    pub fn new(center: Vec3, half_size: Vec3) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(OctreeNode {
            center,
            half_size,
            depth: 0,
            children: [None; 8],
            parent: None,
            payload: P::default(),
        });
        Self { nodes, root }
    }

    /// Key of the root node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Node for `key`. Panics on a stale key.
    pub fn node(&self, key: NodeKey) -> &OctreeNode<P> {
        &self.nodes[key]
    }

    /// Mutable node for `key`. Panics on a stale key.
    pub fn node_mut(&mut self, key: NodeKey) -> &mut OctreeNode<P> {
        &mut self.nodes[key]
    }

    /// Node for `key`, or `None` for a destroyed node
    pub fn get(&self, key: NodeKey) -> Option<&OctreeNode<P>> {
        self.nodes.get(key)
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the node for `key`
    pub fn depth_of(&self, key: NodeKey) -> u32 {
        self.nodes[key].depth
    }

    /// Octant of `point` relative to the node `key`
    pub fn octant_of_point(&self, key: NodeKey, point: &Vec3) -> usize {
        self.nodes[key].octant_of_point(point)
    }

    /// Octant holding the box relative to node `key`, if it does not straddle
    pub fn octant_of_box(&self, key: NodeKey, center: &Vec3, half_size: &Vec3) -> Option<usize> {
        self.nodes[key].octant_of_box(center, half_size)
    }

    /// Existing child in `octant`, or a new child covering that octant
    pub fn get_or_create_child(&mut self, key: NodeKey, octant: usize) -> NodeKey {
        assert!(octant < 8, "octant index out of range: {octant}");
        let parent = &self.nodes[key];
        if let Some(child) = parent.children[octant] {
            return child;
        }

        let child = OctreeNode {
            center: parent.child_center(octant),
            half_size: parent.half_size * 0.5,
            depth: parent.depth + 1,
            children: [None; 8],
            parent: Some(key),
            payload: P::default(),
        };
        log::trace!("Creating octree node at depth {} (octant {octant})", child.depth);
        let child_key = self.nodes.insert(child);
        self.nodes[key].children[octant] = Some(child_key);
        child_key
    }

    /// Deepest existing node whose octant path contains `point`
    pub fn find_deepest_point(&self, point: &Vec3) -> NodeKey {
        let mut current = self.root;
        loop {
            let node = &self.nodes[current];
            match node.children[node.octant_of_point(point)] {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Deepest existing node reached by descending while the box fits a
    /// single octant
    pub fn find_deepest_box(&self, center: &Vec3, half_size: &Vec3) -> NodeKey {
        let mut current = self.root;
        loop {
            let node = &self.nodes[current];
            match node.octant_of_box(center, half_size).and_then(|octant| node.children[octant]) {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Deepest node containing `point`, or `None` outside the root region
    pub fn find_node_at_point(&self, point: &Vec3) -> Option<NodeKey> {
        if self.nodes[self.root].bounds().contains_point(point) {
            Some(self.find_deepest_point(point))
        } else {
            None
        }
    }

    /// Visit every node, depth first, parents before children, octants in
    /// ascending order
    pub fn traverse<V: OctreeVisitor<P>>(&self, visitor: &mut V) {
        self.walk(self.root, visitor);
    }

    fn walk<V: OctreeVisitor<P>>(&self, key: NodeKey, visitor: &mut V) {
        let node = &self.nodes[key];
        if visitor.visit(key, node) == Visit::SkipChildren {
            return;
        }
        for child in node.children.iter().flatten() {
            self.walk(*child, visitor);
        }
    }

    /// Visit the nodes whose region `volume` hits; a miss prunes the subtree
    pub fn traverse_volume<V: OctreeVisitor<P>>(&self, volume: &CollisionVolume, visitor: &mut V) {
        self.walk_volume(self.root, volume, visitor);
    }

    fn walk_volume<V: OctreeVisitor<P>>(&self, key: NodeKey, volume: &CollisionVolume, visitor: &mut V) {
        let node = &self.nodes[key];
        if !volume.hits(&CollisionVolume::from(node.bounds())) {
            return;
        }
        if visitor.visit(key, node) == Visit::SkipChildren {
            return;
        }
        for child in node.children.iter().flatten() {
            self.walk_volume(*child, volume, visitor);
        }
    }

    /// Visit the nodes overlapping `query`. Regions outside it are pruned;
    /// once a region lies fully inside, its subtree is visited without
    /// further tests.
    pub fn traverse_range<V: OctreeVisitor<P>>(&self, query: &Aabb, visitor: &mut V) {
        self.walk_range(self.root, query, visitor);
    }

    fn walk_range<V: OctreeVisitor<P>>(&self, key: NodeKey, query: &Aabb, visitor: &mut V) {
        let node = &self.nodes[key];
        match node.bounds().classify(query) {
            Containment::Outside => {}
            Containment::Inside => self.walk(key, visitor),
            Containment::Partial => {
                if visitor.visit(key, node) == Visit::SkipChildren {
                    return;
                }
                for child in node.children.iter().flatten() {
                    self.walk_range(*child, query, visitor);
                }
            }
        }
    }

    /// Reset every payload in the subtree under `key` (inclusive) and
    /// optionally destroy all descendant nodes
    pub fn clear_subtree(&mut self, key: NodeKey, destroy_children: bool) {
        let mut stack = vec![key];
        let mut removed = 0usize;
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current];
            node.payload = P::default();
            stack.extend(node.children.iter().flatten().copied());
            if destroy_children && current != key {
                self.nodes.remove(current);
                removed += 1;
            }
        }
        if destroy_children {
            self.nodes[key].children = [None; 8];
        }
        log::debug!("Cleared octree subtree, {removed} node(s) destroyed");
    }

    /// Parent chain of `key`, nearest first, ending at the root
    pub fn ancestors(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        std::iter::successors(self.nodes[key].parent, move |current| self.nodes[*current].parent)
    }

    /// All leaf nodes (for visualization)
    pub fn leaves(&self) -> Vec<NodeKey> {
        let mut leaves = Vec::new();
        self.traverse(&mut |key, node: &OctreeNode<P>| {
            if node.is_leaf() {
                leaves.push(key);
            }
            Visit::Continue
        });
        leaves
    }

    /// All nodes at a specific depth (for visualization)
    pub fn nodes_at_depth(&self, depth: u32) -> Vec<NodeKey> {
        let mut nodes = Vec::new();
        self.traverse(&mut |key, node: &OctreeNode<P>| {
            if node.depth == depth {
                nodes.push(key);
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        });
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Sphere;
    use approx::assert_relative_eq;

    fn tree() -> Octree<u32> {
        Octree::new(Vec3::zeros(), Vec3::repeat(100.0))
    }

    #[test]
    fn test_octant_codes() {
        let octree = tree();
        let root = octree.root();
        assert_eq!(octree.octant_of_point(root, &Vec3::new(-1.0, -1.0, -1.0)), 0);
        assert_eq!(octree.octant_of_point(root, &Vec3::new(1.0, -1.0, -1.0)), 1);
        assert_eq!(octree.octant_of_point(root, &Vec3::new(-1.0, 1.0, -1.0)), 2);
        assert_eq!(octree.octant_of_point(root, &Vec3::new(-1.0, -1.0, 1.0)), 4);
        assert_eq!(octree.octant_of_point(root, &Vec3::zeros()), 7);
    }

    #[test]
    fn test_octant_of_box_straddle() {
        let octree = tree();
        let root = octree.root();
        assert_eq!(octree.octant_of_box(root, &Vec3::new(50.0, 50.0, 50.0), &Vec3::repeat(1.0)), Some(7));
        assert_eq!(octree.octant_of_box(root, &Vec3::new(-50.0, 50.0, -50.0), &Vec3::repeat(1.0)), Some(2));
        assert_eq!(octree.octant_of_box(root, &Vec3::new(0.5, 50.0, 50.0), &Vec3::repeat(1.0)), None);
    }

    #[test]
    fn test_child_creation() {
        let mut octree = tree();
        let root = octree.root();
        let child = octree.get_or_create_child(root, 7);
        assert_eq!(octree.get_or_create_child(root, 7), child);
        assert_eq!(octree.node_count(), 2);

        let node = octree.node(child);
        assert_eq!(node.depth(), 1);
        assert_eq!(node.parent(), Some(root));
        assert_relative_eq!(node.center(), Vec3::repeat(50.0));
        assert_relative_eq!(node.half_size(), Vec3::repeat(50.0));
        assert!(!octree.node(root).is_leaf());
    }

    #[test]
    #[should_panic]
    fn test_octant_out_of_range_panics() {
        let mut octree = tree();
        let root = octree.root();
        octree.get_or_create_child(root, 8);
    }

    #[test]
    fn test_find_deepest() {
        let mut octree = tree();
        let root = octree.root();
        let child = octree.get_or_create_child(root, 7);
        let grandchild = octree.get_or_create_child(child, 0);

        assert_eq!(octree.find_deepest_point(&Vec3::new(30.0, 30.0, 30.0)), grandchild);
        assert_eq!(octree.find_deepest_point(&Vec3::new(70.0, 70.0, 70.0)), child);
        assert_eq!(octree.find_deepest_point(&Vec3::new(-70.0, 70.0, 70.0)), root);
        assert_eq!(octree.find_deepest_box(&Vec3::new(25.0, 25.0, 25.0), &Vec3::repeat(1.0)), grandchild);
        assert_eq!(octree.find_deepest_box(&Vec3::new(50.0, 50.0, 50.0), &Vec3::repeat(1.0)), child);
        assert_eq!(octree.find_node_at_point(&Vec3::new(500.0, 0.0, 0.0)), None);
        assert_eq!(octree.find_node_at_point(&Vec3::new(30.0, 30.0, 30.0)), Some(grandchild));

        let chain: Vec<_> = octree.ancestors(grandchild).collect();
        assert_eq!(chain, vec![child, root]);
    }

    #[test]
    fn test_traversal_order_and_skip() {
        let mut octree = tree();
        let root = octree.root();
        let high = octree.get_or_create_child(root, 7);
        let low = octree.get_or_create_child(root, 0);
        let nested = octree.get_or_create_child(low, 3);

        let mut order = Vec::new();
        octree.traverse(&mut |key, _node: &OctreeNode<u32>| {
            order.push(key);
            Visit::Continue
        });
        assert_eq!(order, vec![root, low, nested, high]);

        let mut pruned = Vec::new();
        octree.traverse(&mut |key, _node: &OctreeNode<u32>| {
            pruned.push(key);
            if key == low { Visit::SkipChildren } else { Visit::Continue }
        });
        assert_eq!(pruned, vec![root, low, high]);
    }

    #[test]
    fn test_traverse_volume_prunes() {
        let mut octree = tree();
        let root = octree.root();
        let high = octree.get_or_create_child(root, 7);
        let low = octree.get_or_create_child(root, 0);

        let probe = CollisionVolume::from(Sphere::new(Vec3::repeat(60.0), 5.0));
        let mut seen = Vec::new();
        octree.traverse_volume(&probe, &mut |key, _node: &OctreeNode<u32>| {
            seen.push(key);
            Visit::Continue
        });
        assert_eq!(seen, vec![root, high]);
        assert!(!seen.contains(&low));
    }

    #[test]
    fn test_traverse_range_classification() {
        let mut octree = tree();
        let root = octree.root();
        let high = octree.get_or_create_child(root, 7);
        let inner = octree.get_or_create_child(high, 7);
        let low = octree.get_or_create_child(root, 0);

        let query = Aabb::new(Vec3::repeat(10.0), Vec3::repeat(200.0));
        let mut seen = Vec::new();
        octree.traverse_range(&query, &mut |key, _node: &OctreeNode<u32>| {
            seen.push(key);
            Visit::Continue
        });
        assert_eq!(seen, vec![root, high, inner]);
        assert!(!seen.contains(&low));
    }

    #[test]
    fn test_clear_subtree() {
        let mut octree = tree();
        let root = octree.root();
        let child = octree.get_or_create_child(root, 1);
        let grandchild = octree.get_or_create_child(child, 1);
        octree.node_mut(child).payload = 5;
        octree.node_mut(grandchild).payload = 9;

        octree.clear_subtree(child, false);
        assert_eq!(octree.node(child).payload, 0);
        assert_eq!(octree.node(grandchild).payload, 0);
        assert_eq!(octree.node_count(), 3);

        octree.clear_subtree(root, true);
        assert_eq!(octree.node_count(), 1);
        assert!(octree.get(child).is_none());
        assert!(octree.node(root).is_leaf());
    }

    #[test]
    fn test_leaves_and_depths() {
        let mut octree = tree();
        let root = octree.root();
        let a = octree.get_or_create_child(root, 2);
        let b = octree.get_or_create_child(root, 5);
        let c = octree.get_or_create_child(a, 4);

        assert_eq!(octree.leaves(), vec![c, b]);
        assert_eq!(octree.nodes_at_depth(1), vec![a, b]);
        assert_eq!(octree.nodes_at_depth(2), vec![c]);
        assert_eq!(octree.depth_of(c), 2);
    }
}
