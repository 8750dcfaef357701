//! Handlers for entity death and the rewards it spawns.

use std::rc::Rc;

use collectible_core::Identity;
use tracing::{trace, warn};

use super::{NAMETAG_KEY, SPAWNED_BY_KEY, WHO_IS_DYING_KEY, report};
use crate::error::HandlerError;
use crate::host::EntityHandle;
use crate::slot::{ScopedCorrelationSlot, SlotGuard};
use crate::tracker::CollectibleTracker;

impl CollectibleTracker {
    /// Wraps the host's death handling of `entity`.
    ///
    /// While `die` runs, the dying entity's identity is available to any
    /// reward the host enables (see [`reward_enabled`](Self::reward_enabled)).
    /// The cause is released when `die` returns or unwinds. `die` always runs
    /// exactly once, even if the entity was never tagged or the slot is
    /// unexpectedly occupied.
    ///
    /// An untagged entity dying inside another death masks the outer cause
    /// for its span, so its rewards stay unattributed.
    pub fn entity_dying<R>(
        &mut self,
        entity: EntityHandle,
        die: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let slot = Rc::clone(&self.dying);
        let (_cause, _masked) = match self.push_dying_cause(&slot, entity) {
            Ok(guard) => (Some(guard), None),
            Err(failure) => {
                report("entity_dying", &failure);
                let masked = match failure {
                    HandlerError::Attribute(_) => slot.mask(WHO_IS_DYING_KEY),
                    HandlerError::Slot(_) => None,
                };
                if masked.is_some() {
                    warn!(
                        target: "collectible::handlers",
                        handler = "entity_dying",
                        %entity,
                        "Untagged entity died inside a tracked death, outer cause masked"
                    );
                }
                (None, masked)
            }
        };

        // If this death drops rewards, reward_enabled runs inside `die`.
        die(self)
    }

    fn push_dying_cause<'s>(
        &self,
        slot: &'s ScopedCorrelationSlot<Identity>,
        entity: EntityHandle,
    ) -> Result<SlotGuard<'s, Identity>, HandlerError> {
        let identity = self.tags.get(entity, NAMETAG_KEY)?.clone();
        trace!(
            target: "collectible::handlers",
            handler = "entity_dying",
            %entity,
            %identity,
            "Pushed dying cause"
        );
        Ok(slot.push(WHO_IS_DYING_KEY, identity)?)
    }

    /// Wraps the host's enable logic of a reward object.
    ///
    /// When a tracked death is in progress the reward is tagged with the
    /// dying entity's identity, replacing any previous source. Outside a
    /// tracked death the reward is left as is. `enable` always runs.
    pub fn reward_enabled<R>(
        &mut self,
        reward: EntityHandle,
        enable: impl FnOnce(&mut Self) -> R,
    ) -> R {
        if let Some(cause) = self.dying.try_peek(WHO_IS_DYING_KEY) {
            trace!(
                target: "collectible::handlers",
                handler = "reward_enabled",
                %reward,
                source = %cause,
                "Tagged reward source"
            );
            self.tags.attach_or_set(reward, SPAWNED_BY_KEY, cause);
        }

        enable(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SpawnInfo;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    fn tracker_with_enemy() -> (CollectibleTracker, EntityHandle, Identity) {
        let mut tracker = CollectibleTracker::default();
        let enemy = EntityHandle::new(1, 0);
        tracker.entity_created(enemy, SpawnInfo::new("Town", "Crawler", (10.0, 5.0)));
        let identity = tracker.identity_of(enemy).cloned().unwrap();
        (tracker, enemy, identity)
    }

    #[test]
    fn cause_is_visible_only_during_death() {
        let (mut tracker, enemy, identity) = tracker_with_enemy();

        let seen = tracker.entity_dying(enemy, |tracker| tracker.dying_cause());
        assert_eq!(seen, Some(identity));
        assert_eq!(tracker.dying_cause(), None);
    }

    #[test]
    fn rewards_enabled_during_death_are_tagged() {
        let (mut tracker, enemy, identity) = tracker_with_enemy();
        let rewards = [EntityHandle::new(10, 0), EntityHandle::new(11, 0)];

        tracker.entity_dying(enemy, |tracker| {
            for reward in rewards {
                tracker.reward_enabled(reward, |_| ());
            }
        });

        for reward in rewards {
            assert_eq!(tracker.spawned_by(reward), Some(&identity));
        }
    }

    #[test]
    fn rewards_enabled_outside_death_are_left_alone() {
        let (mut tracker, _, _) = tracker_with_enemy();
        let reward = EntityHandle::new(10, 0);

        let ran = tracker.reward_enabled(reward, |_| true);
        assert!(ran);
        assert_eq!(tracker.spawned_by(reward), None);
    }

    #[test]
    fn untagged_death_still_runs_host_logic() {
        let mut tracker = CollectibleTracker::default();
        let stranger = EntityHandle::new(99, 0);
        let reward = EntityHandle::new(10, 0);

        let result = tracker.entity_dying(stranger, |tracker| {
            tracker.reward_enabled(reward, |_| ());
            "died"
        });

        assert_eq!(result, "died");
        assert_eq!(tracker.spawned_by(reward), None);
    }

    #[test]
    fn nested_death_keeps_outer_cause() {
        let (mut tracker, enemy, identity) = tracker_with_enemy();
        let child = EntityHandle::new(2, 0);
        tracker.entity_created(child, SpawnInfo::new("Town", "Spawnling", (11.0, 5.0)));
        let reward = EntityHandle::new(10, 0);

        let inner_ran = tracker.entity_dying(enemy, |tracker| {
            // The host kills a second entity inside the first death. The
            // second push is refused and the outer cause stays live.
            tracker.entity_dying(child, |tracker| {
                tracker.reward_enabled(reward, |_| ());
                true
            })
        });

        assert!(inner_ran);
        assert_eq!(tracker.spawned_by(reward), Some(&identity));
        assert_eq!(tracker.dying_cause(), None);
    }

    #[test]
    fn untagged_death_inside_tracked_death_masks_outer_cause() {
        let (mut tracker, enemy, identity) = tracker_with_enemy();
        let stranger = EntityHandle::new(99, 0);
        let inner_reward = EntityHandle::new(10, 0);
        let outer_reward = EntityHandle::new(11, 0);

        tracker.entity_dying(enemy, |tracker| {
            tracker.entity_dying(stranger, |tracker| {
                assert_eq!(tracker.dying_cause(), None);
                tracker.reward_enabled(inner_reward, |_| ());
            });
            // The outer cause is back once the inner death returns.
            tracker.reward_enabled(outer_reward, |_| ());
        });

        assert_eq!(tracker.spawned_by(inner_reward), None);
        assert_eq!(tracker.spawned_by(outer_reward), Some(&identity));
        assert_eq!(tracker.dying_cause(), None);
    }

    #[test]
    fn cause_is_released_when_death_unwinds() {
        let (mut tracker, enemy, _) = tracker_with_enemy();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            tracker.entity_dying(enemy, |_| -> u32 { panic!("host death sequence aborted") })
        }));

        assert!(outcome.is_err());
        assert_eq!(tracker.dying_cause(), None);
        // The next death can push again.
        let seen = tracker.entity_dying(enemy, |tracker| tracker.dying_cause().is_some());
        assert!(seen);
    }
}
