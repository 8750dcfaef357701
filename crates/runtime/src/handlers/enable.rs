//! Handler for entities being (re-)enabled by the host.

use collectible_core::ProgressionState;
use tracing::debug;

use super::{NAMETAG_KEY, report};
use crate::error::HandlerError;
use crate::events::CollectionEvent;
use crate::host::{EntityHandle, RewardPayload};
use crate::tracker::CollectibleTracker;

impl CollectibleTracker {
    /// Whether `entity` must not grant its reward again.
    ///
    /// True when suppression is enabled and the entity's spawn identity is
    /// already `Collected`. Untagged entities are never suppressed.
    pub fn should_suppress_reward(&self, entity: EntityHandle) -> bool {
        self.config.suppress_collected_rewards
            && self
                .tags
                .try_get(entity, NAMETAG_KEY)
                .is_some_and(|identity| {
                    self.store.get(identity) == Some(ProgressionState::Collected)
                })
    }

    /// Filters the host's enable notification of an entity.
    ///
    /// Runs before the host's own enable logic. If the entity's reward was
    /// already collected in some session, `payload` is zeroed. `payload` is
    /// `None` for entities that grant nothing, which are skipped. Returns
    /// `is_dead` unchanged.
    pub fn entity_enabled(
        &mut self,
        entity: EntityHandle,
        payload: Option<&mut RewardPayload>,
        is_dead: bool,
    ) -> bool {
        let Some(payload) = payload else {
            return is_dead;
        };

        let identity = match self.tags.get(entity, NAMETAG_KEY) {
            Ok(identity) => identity.clone(),
            Err(failure) => {
                report("entity_enabled", &HandlerError::from(failure));
                return is_dead;
            }
        };

        if self.should_suppress_reward(entity) {
            debug!(
                target: "collectible::handlers",
                handler = "entity_enabled",
                %entity,
                %identity,
                ?payload,
                "Suppressed already collected reward"
            );
            payload.clear();
            self.events
                .publish(CollectionEvent::RewardSuppressed { source: identity });
        }

        is_dead
    }
}
