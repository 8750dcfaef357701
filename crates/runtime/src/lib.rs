//! Session runtime that attributes reward pickups to the entities whose
//! deaths produced them.
//!
//! The host (a game engine or mod loader) owns the entities and fires
//! lifecycle callbacks; this crate keeps the bookkeeping that ties those
//! callbacks together and persists the result through
//! [`collectible_core::StateStore`].
//!
//! Modules are organized by responsibility:
//! - [`tracker`] hosts the per-session orchestrator
//! - [`handlers`] wraps host callbacks (spawn, death, reward, enable)
//! - [`slot`] and [`attributes`] carry values between nested callbacks and
//!   across an entity's lifetime
//! - [`events`] provides the topic-based event bus for observers
//! - [`config`] reads tracker settings from the environment
pub mod attributes;
pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod host;
pub mod slot;
pub mod tracker;

pub use attributes::{AttributeError, EntityAttributeStore};
pub use config::TrackerConfig;
pub use error::HandlerError;
pub use events::{CollectionEvent, Event, EventBus, PersistenceEvent, Topic};
pub use handlers::{Attribution, HandlerCriticality};
pub use host::{EntityHandle, RewardPayload, SpawnInfo};
pub use slot::{MaskGuard, ScopedCorrelationSlot, SlotError, SlotGuard};
pub use tracker::CollectibleTracker;
