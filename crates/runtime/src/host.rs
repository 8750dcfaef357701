//! Types the host runtime hands to the tracker.

use std::fmt;

use collectible_core::SpawnPosition;

/// Host-issued handle of a live entity.
///
/// Hosts that pool objects must bump `generation` whenever a slot is reused,
/// or call [`CollectibleTracker::entity_recycled`](crate::CollectibleTracker::entity_recycled)
/// before handing the object out again. Otherwise tags of the previous
/// occupant stay attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityHandle {
    pub index: u32,
    pub generation: u32,
}

impl EntityHandle {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Same slot, next generation.
    pub const fn recycled(self) -> Self {
        Self {
            index: self.index,
            generation: self.generation.wrapping_add(1),
        }
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Attributes of an entity at the moment the host first reports it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnInfo<'a> {
    /// Scene the entity belongs to.
    pub container: &'a str,
    pub name: &'a str,
    /// Current planar position. Must be read before the host moves the entity.
    pub position: SpawnPosition,
}

impl<'a> SpawnInfo<'a> {
    pub fn new(container: &'a str, name: &'a str, position: impl Into<SpawnPosition>) -> Self {
        Self {
            container,
            name,
            position: position.into(),
        }
    }
}

/// Reward an entity grants when it dies, by denomination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardPayload {
    pub large: u32,
    pub medium: u32,
    pub small: u32,
}

impl RewardPayload {
    pub const fn new(large: u32, medium: u32, small: u32) -> Self {
        Self {
            large,
            medium,
            small,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.large == 0 && self.medium == 0 && self.small == 0
    }

    /// Zeroes every denomination.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
