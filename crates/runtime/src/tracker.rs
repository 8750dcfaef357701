//! Session-scoped orchestrator tying host events to the state store.

use std::rc::Rc;

use collectible_core::{Identity, ProgressionState, StateStore, StoreError};
use tokio::sync::broadcast;
use tracing::info;

use crate::attributes::EntityAttributeStore;
use crate::config::TrackerConfig;
use crate::events::{Event, EventBus, PersistenceEvent, Topic};
use crate::handlers::{NAMETAG_KEY, SPAWNED_BY_KEY};
use crate::host::EntityHandle;
use crate::slot::ScopedCorrelationSlot;

/// Owns everything one game session needs to attribute and persist reward
/// collection.
///
/// There is no global state: the host keeps one tracker per session and
/// routes its lifecycle callbacks to the handler methods (see
/// [`handlers`](crate::handlers)). The tracker is `!Send`, matching the host's
/// single-threaded callback model.
#[derive(Debug)]
pub struct CollectibleTracker {
    pub(crate) config: TrackerConfig,
    pub(crate) store: StateStore,
    pub(crate) tags: EntityAttributeStore<Identity>,
    // Rc so a handler can hold a slot guard while lending `&mut self` to the
    // nested host call.
    pub(crate) dying: Rc<ScopedCorrelationSlot<Identity>>,
    pub(crate) contact: Rc<ScopedCorrelationSlot<EntityHandle>>,
    pub(crate) events: EventBus,
}

impl CollectibleTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_store(config, StateStore::new())
    }

    /// Creates a tracker around an already populated store.
    pub fn with_store(config: TrackerConfig, store: StateStore) -> Self {
        let events = EventBus::with_capacity(config.event_capacity);
        Self {
            config,
            store,
            tags: EntityAttributeStore::new(),
            dying: Rc::new(ScopedCorrelationSlot::new()),
            contact: Rc::new(ScopedCorrelationSlot::new()),
            events,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// State of `identity`, if it was ever recorded.
    pub fn state_of(&self, identity: &Identity) -> Option<ProgressionState> {
        self.store.get(identity)
    }

    /// Spawn identity recorded for `entity`.
    pub fn identity_of(&self, entity: EntityHandle) -> Option<&Identity> {
        self.tags.try_get(entity, NAMETAG_KEY)
    }

    /// Identity of the entity whose death produced `reward`.
    pub fn spawned_by(&self, reward: EntityHandle) -> Option<&Identity> {
        self.tags.try_get(reward, SPAWNED_BY_KEY)
    }

    /// Identity currently pushed by an in-progress death, if any.
    pub fn dying_cause(&self) -> Option<Identity> {
        self.dying.try_peek(crate::handlers::WHO_IS_DYING_KEY)
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    /// Serializes the store for the host's settings persistence.
    pub fn save_blob(&self) -> String {
        let blob = self.store.serialize();
        self.events.publish(PersistenceEvent::Saved {
            entries: self.store.len(),
        });
        blob
    }

    /// Replaces the store contents with a save blob.
    ///
    /// The store is cleared first, then loaded. Errors propagate to the
    /// host's load flow: a corrupt or newer-version save is a session load
    /// failure. On error the store stays empty.
    pub fn load_blob(&mut self, blob: Option<&str>) -> Result<usize, StoreError> {
        self.store.clear();
        self.store.load(blob)?;

        let entries = self.store.len();
        info!(target: "collectible::tracker", entries, "Loaded collectible save data");
        self.events.publish(PersistenceEvent::Loaded { entries });

        Ok(entries)
    }
}

impl Default for CollectibleTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
