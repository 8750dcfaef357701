//! Event types for different topics.

use collectible_core::Identity;
use serde::{Deserialize, Serialize};

/// Events related to reward collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionEvent {
    /// A reward whose source entity is known was collected.
    RewardCollected {
        /// Entity whose death produced the reward.
        source: Identity,
        /// True if this collection moved the source to `Collected`.
        newly_collected: bool,
    },

    /// An entity was re-enabled after its reward had already been collected,
    /// and its payload was zeroed.
    RewardSuppressed { source: Identity },
}

/// Events related to save blob handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersistenceEvent {
    /// A save blob was loaded into a cleared store.
    Loaded { entries: usize },

    /// The store was serialized for saving.
    Saved { entries: usize },
}
