//! Layer masks for filtering which elements a query sees
//!
//! Elements carry the layers they belong to; queries carry the layers they
//! are interested in. The two meet when any bit is shared.

use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A set of up to 32 layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// No layer
    pub const NONE: Self = Self(0);

    /// All layers
    pub const ALL: Self = Self(u32::MAX);

    /// Mask holding the single layer `index` (0-31)
    pub fn layer(index: u32) -> Self {
        assert!(index < 32, "layer index out of range: {index}");
        Self(1 << index)
    }

    /// Raw bits
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether the masks share any layer
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Helper to create a mask from multiple layers
    pub fn mask(layers: &[LayerMask]) -> Self {
        layers.iter().fold(Self::NONE, |acc, &layer| acc | layer)
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for LayerMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for LayerMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_layers_are_disjoint() {
        let walls = LayerMask::layer(0);
        let doors = LayerMask::layer(1);
        assert!(!walls.intersects(doors));
        assert!((walls | doors).intersects(doors));
        assert!(walls.intersects(LayerMask::ALL));
    }

    #[test]
    fn test_mask_creation() {
        let mask = LayerMask::mask(&[LayerMask::layer(0), LayerMask::layer(3), LayerMask::layer(31)]);
        assert_eq!(mask.bits(), 0b1001 | (1 << 31));
        assert!(mask.intersects(LayerMask::layer(3)));
        assert!(!mask.intersects(LayerMask::layer(4)));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
        assert_eq!(mask & LayerMask::layer(0), LayerMask::layer(0));
    }
}
