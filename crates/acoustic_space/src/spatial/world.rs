//! World octree: the typed spatial index of audio elements
//!
//! Elements are registered once and then filed under the deepest node whose
//! region holds their bounds. Moving an element means mutating it and calling
//! [`WorldOctree::insert`] again; the call is a no-op while the old node still
//! fits.

use super::element::{Element, ElementKind};
use super::octree::{Octree, OctreeNode};
use crate::collision::Aabb;
use crate::config::{Config, ConfigError, IndexConfig};
use crate::error::{IndexError, IndexResult};
use crate::foundation::collections::{ElementKey, NodeKey, SlotMap};

/// Per-node element collections, one per element kind (unordered)
#[derive(Debug, Clone, Default)]
pub struct ElementBuckets {
    /// Scene components
    pub components: Vec<ElementKey>,
    /// Microphones
    pub microphones: Vec<ElementKey>,
    /// Speakers
    pub speakers: Vec<ElementKey>,
    /// Environment probes
    pub probes: Vec<ElementKey>,
    /// Sound level meters
    pub meters: Vec<ElementKey>,
}

impl ElementBuckets {
    /// Keys of one element kind held at this node
    pub fn bucket(&self, kind: ElementKind) -> &[ElementKey] {
        match kind {
            ElementKind::Component => &self.components,
            ElementKind::Microphone => &self.microphones,
            ElementKind::Speaker => &self.speakers,
            ElementKind::EnvironmentProbe => &self.probes,
            ElementKind::SoundLevelMeter => &self.meters,
        }
    }

    fn bucket_mut(&mut self, kind: ElementKind) -> &mut Vec<ElementKey> {
        match kind {
            ElementKind::Component => &mut self.components,
            ElementKind::Microphone => &mut self.microphones,
            ElementKind::Speaker => &mut self.speakers,
            ElementKind::EnvironmentProbe => &mut self.probes,
            ElementKind::SoundLevelMeter => &mut self.meters,
        }
    }

    /// Total number of keys held at this node
    pub fn len(&self) -> usize {
        self.components.len() + self.microphones.len() + self.speakers.len() + self.probes.len() + self.meters.len()
    }

    /// Whether no element is held at this node
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Node and bucket an element is filed under
#[derive(Debug, Clone, Copy)]
struct Filing {
    node: NodeKey,
    kind: ElementKind,
}

#[derive(Debug, Clone)]
pub(crate) struct ElementSlot {
    pub(crate) element: Element,
    filing: Option<Filing>,
}

/// Dynamic octree of audio elements
#[derive(Debug, Clone)]
pub struct WorldOctree {
    pub(crate) octree: Octree<ElementBuckets>,
    pub(crate) elements: SlotMap<ElementKey, ElementSlot>,
    pub(crate) config: IndexConfig,
}

impl WorldOctree {
    /// Create an empty index over the configured world region
    pub fn new(config: IndexConfig) -> Self {
        log::debug!(
            "Creating world octree: center {:?}, half size {:?}, max depth {}",
            config.world_center,
            config.world_half_size,
            config.max_depth
        );
        Self {
            octree: Octree::new(config.center(), config.half_size()),
            elements: SlotMap::with_key(),
            config,
        }
    }

    /// Like [`new`](Self::new), rejecting out-of-range settings first
    pub fn try_new(config: IndexConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Active configuration
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Underlying node tree (for visualization and custom traversals)
    pub fn octree(&self) -> &Octree<ElementBuckets> {
        &self.octree
    }

    /// Add an element to the registry; it is not in the tree until inserted
    pub fn register(&mut self, element: Element) -> ElementKey {
        self.elements.insert(ElementSlot { element, filing: None })
    }

    /// The registered element
    pub fn element(&self, key: ElementKey) -> IndexResult<&Element> {
        self.slot(key).map(|slot| &slot.element)
    }

    /// Mutable access to a registered element. Call [`insert`](Self::insert)
    /// afterwards so the index follows any change of bounds.
    pub fn element_mut(&mut self, key: ElementKey) -> IndexResult<&mut Element> {
        self.elements
            .get_mut(key)
            .map(|slot| &mut slot.element)
            .ok_or(IndexError::UnknownElement(key))
    }

    /// Node currently holding the element, `None` when not in the tree
    pub fn node_of(&self, key: ElementKey) -> IndexResult<Option<NodeKey>> {
        self.slot(key).map(|slot| slot.filing.map(|filing| filing.node))
    }

    /// Bounds the element is filed under
    pub fn bounds_of(&self, key: ElementKey) -> IndexResult<Aabb> {
        self.slot(key).map(|slot| slot.element.bounds(self.config.point_half_size))
    }

    /// Number of registered elements
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of registered elements currently in the tree
    pub fn len_in_tree(&self) -> usize {
        self.elements.values().filter(|slot| slot.filing.is_some()).count()
    }

    /// Node for `key`. Panics on a stale node key.
    pub fn node(&self, key: NodeKey) -> &OctreeNode<ElementBuckets> {
        self.octree.node(key)
    }

    fn slot(&self, key: ElementKey) -> IndexResult<&ElementSlot> {
        self.elements.get(key).ok_or(IndexError::UnknownElement(key))
    }

    /// Insert or relocate an element.
    ///
    /// Returns the node now holding it. Children are created on the way down
    /// while the element's bounds fit one child entirely and the child depth
    /// stays below `max_depth`. Elements outside the world region are kept at
    /// the root.
    pub fn insert(&mut self, key: ElementKey, max_depth: u32) -> IndexResult<NodeKey> {
        let slot = self.slot(key)?;
        let bounds = slot.element.bounds(self.config.point_half_size);
        let kind = slot.element.kind();

        if let Some(filing) = slot.filing {
            if filing.kind == kind && self.octree.node(filing.node).bounds().contains_aabb(&bounds) {
                return Ok(filing.node);
            }
            self.unfile(key, filing);
        }

        let center = bounds.center();
        let half_size = bounds.half_size();
        let mut current = self.octree.root();
        loop {
            let node = self.octree.node(current);
            if node.depth() + 1 >= max_depth {
                break;
            }
            let Some(octant) = node.octant_of_box(&center, &half_size) else {
                break;
            };
            let child_region = Aabb::from_center_half_size(node.child_center(octant), node.half_size() * 0.5);
            if !child_region.contains_aabb(&bounds) {
                break;
            }
            current = self.octree.get_or_create_child(current, octant);
        }

        self.octree.node_mut(current).payload.bucket_mut(kind).push(key);
        self.elements[key].filing = Some(Filing { node: current, kind });
        log::trace!(
            "Filed {kind:?} {key:?} at depth {}",
            self.octree.depth_of(current)
        );
        Ok(current)
    }

    /// Insert with the configured depth limit
    pub fn insert_default(&mut self, key: ElementKey) -> IndexResult<NodeKey> {
        self.insert(key, self.config.max_depth)
    }

    /// Take an element out of the tree, keeping it registered. A no-op for
    /// elements not in the tree.
    pub fn remove(&mut self, key: ElementKey) -> IndexResult<()> {
        if let Some(filing) = self.slot(key)?.filing {
            self.unfile(key, filing);
        }
        Ok(())
    }

    fn unfile(&mut self, key: ElementKey, filing: Filing) {
        let bucket = self.octree.node_mut(filing.node).payload.bucket_mut(filing.kind);
        if let Some(index) = bucket.iter().position(|k| *k == key) {
            bucket.swap_remove(index);
        }
        self.elements[key].filing = None;
    }

    /// Remove an element from the tree and forget it
    pub fn unregister(&mut self, key: ElementKey) -> IndexResult<Element> {
        self.remove(key)?;
        self.elements
            .remove(key)
            .map(|slot| slot.element)
            .ok_or(IndexError::UnknownElement(key))
    }

    /// Empty the tree, keeping every element registered. With
    /// `destroy_nodes` the tree collapses back to the root.
    pub fn clear(&mut self, destroy_nodes: bool) {
        for slot in self.elements.values_mut() {
            slot.filing = None;
        }
        self.octree.clear_subtree(self.octree.root(), destroy_nodes);
        log::debug!("Cleared world octree ({} elements still registered)", self.elements.len());
    }
}
