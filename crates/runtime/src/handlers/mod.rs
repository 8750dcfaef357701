//! Lifecycle handlers wrapping host callbacks.
//!
//! Each handler is a method on [`CollectibleTracker`](crate::CollectibleTracker)
//! that receives the host's original behavior as a closure. The closure gets
//! the tracker back as `&mut`, which is how nested host callbacks (a reward
//! enabled while an entity is dying) re-enter the tracker.
//!
//! # Failure policy
//!
//! Correlation failures never reach the host. They are logged according to
//! [`HandlerCriticality`] and the host closure still runs exactly once.
//!
//! # Cause lifecycle
//!
//! ```text
//! Idle --entity_dying--> DyingWithKnownCause --reward_enabled--> (reward tagged)
//!   ^                                                                  |
//!   +------------------------ death handling returns ------------------+
//! ```

mod death;
mod enable;
mod reward;
mod spawn;

pub use reward::Attribution;

use collectible_core::LedgerError;
use tracing::{debug, error};

use crate::error::HandlerError;

/// Tag holding an entity's own spawn identity.
pub const NAMETAG_KEY: &str = "nametag";
/// Tag holding the identity of the entity whose death produced a reward.
pub const SPAWNED_BY_KEY: &str = "spawned by";
/// Slot key for the entity currently running its death handling.
pub const WHO_IS_DYING_KEY: &str = "who is dying";
/// Slot key for the reward currently touching the collector.
pub const WHICH_REWARD_KEY: &str = "which reward";

/// Criticality level for handler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerCriticality {
    /// Handler failure is logged as an error; the host behavior continues.
    Important,
    /// Handler failure is an expected miss, logged at debug level.
    Optional,
}

impl HandlerCriticality {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Important => "important",
            Self::Optional => "optional",
        }
    }
}

/// Logs a handler failure at the level its criticality calls for.
pub(crate) fn report(handler: &'static str, failure: &HandlerError) {
    let criticality = failure.criticality();
    let severity = failure.severity().as_str();
    match criticality {
        HandlerCriticality::Important => error!(
            target: "collectible::handlers",
            handler,
            criticality = criticality.as_str(),
            severity,
            code = failure.error_code(),
            error = %failure,
            "Handler failed, continuing with host behavior"
        ),
        HandlerCriticality::Optional => debug!(
            target: "collectible::handlers",
            handler,
            criticality = criticality.as_str(),
            severity,
            code = failure.error_code(),
            error = %failure,
            "Handler skipped"
        ),
    }
}
