//! Arena key types
//!
//! Octree nodes and registered elements live in slot maps. Links between them
//! (children, parents, element back-references) are these keys, never owning
//! pointers.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Key of a node inside an octree arena.
    pub struct NodeKey;

    /// Key of an element registered with a world octree.
    pub struct ElementKey;
}
