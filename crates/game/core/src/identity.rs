//! Spawn-time identity of a trackable entity.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Position an entity occupied when it was first observed.
///
/// Only the planar components are kept; depth is discarded by the host before
/// the identity is derived. Components compare by bit pattern, so `NaN`
/// equals itself and `-0.0` differs from `0.0`. That is what makes a decoded
/// identity compare equal to the one that was encoded.
///
/// With the `serde` feature, components are written as their `u32` bit
/// patterns. Formats such as JSON have no NaN or infinity, and those are
/// valid spawn positions.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnPosition {
    #[cfg_attr(feature = "serde", serde(with = "float_bits"))]
    pub x: f32,
    #[cfg_attr(feature = "serde", serde(with = "float_bits"))]
    pub y: f32,
}

#[cfg(feature = "serde")]
mod float_bits {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(value.to_bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        u32::deserialize(deserializer).map(f32::from_bits)
    }
}

impl SpawnPosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    fn bits(&self) -> (u32, u32) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

impl PartialEq for SpawnPosition {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for SpawnPosition {}

impl Hash for SpawnPosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl PartialOrd for SpawnPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SpawnPosition {
    // total_cmp is equal exactly when the bit patterns are equal, which keeps
    // Ord consistent with Eq.
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl From<(f32, f32)> for SpawnPosition {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Stable fingerprint of a trackable entity.
///
/// Two entities are the same collectible iff container, local name and spawn
/// position all match exactly. An identity must be derived once, when the
/// entity is first observed and before the host moves or renames it; deriving
/// it later yields a different (and unstable) key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identity {
    /// Scene (or other container) the entity was spawned in.
    pub container: String,
    /// Name of the entity inside its container.
    pub local_name: String,
    pub spawn: SpawnPosition,
}

impl Identity {
    pub fn new(
        container: impl Into<String>,
        local_name: impl Into<String>,
        spawn: impl Into<SpawnPosition>,
    ) -> Self {
        Self {
            container: container.into(),
            local_name: local_name.into(),
            spawn: spawn.into(),
        }
    }

    /// Derives the identity of an entity from its attributes at spawn time.
    ///
    /// `position` must be the entity's *current* position at the moment it is
    /// first observed.
    pub fn derive(container: &str, local_name: &str, position: SpawnPosition) -> Self {
        Self::new(container, local_name, position)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}, {})",
            self.container, self.local_name, self.spawn.x, self.spawn.y
        )
    }
}
