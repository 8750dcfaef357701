//! Handlers for reward collection.
//!
//! Hosts that report pickups directly call [`reward_collected`]. Hosts where a
//! pickup is only visible as a counter increase fired from inside the
//! collision callback wrap that callback with [`reward_contact`] and the
//! counter with [`reward_count_increased`]; the contact slot carries the
//! reward handle between the two.
//!
//! [`reward_collected`]: CollectibleTracker::reward_collected
//! [`reward_contact`]: CollectibleTracker::reward_contact
//! [`reward_count_increased`]: CollectibleTracker::reward_count_increased

use std::rc::Rc;

use collectible_core::{Identity, ProgressionState};
use tracing::{debug, trace};

use super::{SPAWNED_BY_KEY, WHICH_REWARD_KEY, report};
use crate::error::HandlerError;
use crate::events::CollectionEvent;
use crate::host::EntityHandle;
use crate::tracker::CollectibleTracker;

/// Outcome of attributing a collected reward to its source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribution {
    pub source: Identity,
    /// True if this pickup moved the source to `Collected`.
    pub newly_collected: bool,
}

impl CollectibleTracker {
    /// Attributes a collected reward to the entity that spawned it.
    ///
    /// Rewards without a recorded source (enabled outside a tracked death)
    /// produce no attribution and no event.
    pub fn reward_collected(&mut self, reward: EntityHandle) -> Option<Attribution> {
        let source = self.tags.try_get(reward, SPAWNED_BY_KEY)?.clone();
        let newly_collected = self.store.set(&source, ProgressionState::Collected);

        debug!(
            target: "collectible::handlers",
            handler = "reward_collected",
            %reward,
            %source,
            newly_collected,
            "Reward collected"
        );
        self.events.publish(CollectionEvent::RewardCollected {
            source: source.clone(),
            newly_collected,
        });

        Some(Attribution {
            source,
            newly_collected,
        })
    }

    /// Wraps the host's collision logic of a reward touching the collector.
    ///
    /// While `touch` runs, [`reward_count_increased`](Self::reward_count_increased)
    /// knows which reward is being picked up. `touch` always runs.
    pub fn reward_contact<R>(
        &mut self,
        reward: EntityHandle,
        touch: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let slot = Rc::clone(&self.contact);
        let _contact = match slot.push(WHICH_REWARD_KEY, reward) {
            Ok(guard) => Some(guard),
            Err(failure) => {
                report("reward_contact", &HandlerError::from(failure));
                None
            }
        };

        touch(self)
    }

    /// Wraps the host's reward counter increase.
    ///
    /// If a reward is in contact, it is attributed as by
    /// [`reward_collected`](Self::reward_collected). Increases from other
    /// sources are passed through. `add` always runs.
    pub fn reward_count_increased<R>(
        &mut self,
        amount: u32,
        add: impl FnOnce(&mut Self) -> R,
    ) -> R {
        match self.contact.peek(WHICH_REWARD_KEY) {
            Ok(reward) => {
                trace!(
                    target: "collectible::handlers",
                    handler = "reward_count_increased",
                    %reward,
                    amount,
                    "Counter increased by reward in contact"
                );
                self.reward_collected(reward);
            }
            Err(failure) => report("reward_count_increased", &HandlerError::from(failure)),
        }

        add(self)
    }
}
