// Entity identifiers shared by the scene and the physics world

use std::fmt;

/// Unique identifier for a game object
///
/// Physics bodies and scene objects are keyed by the same id, so the object
/// layer can register a body without the world knowing anything about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    /// Create an entity id from a raw u64
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out entity ids in increasing order; ids are never reused
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocate a fresh id
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_monotonic() {
        let mut allocator = EntityAllocator::new();
        let a = allocator.allocate();
        let b = allocator.allocate();

        assert_ne!(a, b, "Allocated ids must be unique");
        assert!(a < b);
        assert_eq!(allocator.allocated(), 2);
    }

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::from_u64(12345);
        assert_eq!(id.as_u64(), 12345);
        assert_eq!(id.to_string(), "#12345");
    }
}
