//! Errors surfaced by the spatial index

use crate::foundation::collections::ElementKey;

/// Errors returned by [`WorldOctree`](crate::spatial::WorldOctree) operations
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// The key does not name a registered element (never issued, or unregistered)
    #[error("Unknown element: {0:?}")]
    UnknownElement(ElementKey),
}

/// Result alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;
