//! Topic-based event bus for tracker notifications.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. Publishing is synchronous and never blocks, so it is
//! safe from inside nested host callbacks.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CollectionEvent, PersistenceEvent};
