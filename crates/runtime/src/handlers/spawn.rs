//! Handlers for entity creation.

use collectible_core::Identity;
use tracing::trace;

use super::NAMETAG_KEY;
use crate::host::{EntityHandle, SpawnInfo};
use crate::tracker::CollectibleTracker;

impl CollectibleTracker {
    /// Records the spawn identity of a newly observed entity.
    ///
    /// Must run before the host moves or renames the entity: the identity is
    /// derived from the position reported here. An entity that already
    /// carries tags keeps them. Returns whether a name tag was attached.
    pub fn entity_created(&mut self, entity: EntityHandle, spawn: SpawnInfo<'_>) -> bool {
        let identity = Identity::derive(spawn.container, spawn.name, spawn.position);
        let attached = self.tags.try_attach(entity, NAMETAG_KEY, identity);

        if attached {
            trace!(
                target: "collectible::handlers",
                handler = "entity_created",
                %entity,
                identity = ?self.identity_of(entity),
                "Attached name tag"
            );
        }

        attached
    }

    /// Tags every object of a freshly loaded scene.
    ///
    /// The host calls this right after the scene's objects are instantiated,
    /// while they still sit at their spawn positions. Tags land on objects
    /// that will never matter (scenery, rewards); they are harmless. Returns
    /// the number of newly tagged entities.
    pub fn scene_loaded<'a>(
        &mut self,
        objects: impl IntoIterator<Item = (EntityHandle, SpawnInfo<'a>)>,
    ) -> usize {
        let mut tagged = 0;
        for (entity, spawn) in objects {
            if self.entity_created(entity, spawn) {
                tagged += 1;
            }
        }
        tagged
    }

    /// Forgets every tag of `entity`.
    ///
    /// Hosts with object pools call this before reusing an object under the
    /// same handle, so the next occupant does not inherit the previous one's
    /// identity or reward source.
    pub fn entity_recycled(&mut self, entity: EntityHandle) -> bool {
        let had_tags = self.tags.invalidate(entity);
        if had_tags {
            trace!(target: "collectible::handlers", handler = "entity_recycled", %entity, "Dropped tags");
        }
        had_tags
    }
}
