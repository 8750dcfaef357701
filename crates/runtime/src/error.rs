use collectible_core::{ErrorSeverity, LedgerError};

use crate::attributes::AttributeError;
use crate::handlers::HandlerCriticality;
use crate::slot::SlotError;

/// Failure of the correlation logic around a host callback.
///
/// Never returned to the host: handlers log it and carry on with the host's
/// own behavior.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Attribute(#[from] AttributeError),
}

impl HandlerError {
    /// How loudly a handler reports this failure.
    ///
    /// Internal failures are important, validation failures optional. Lookup
    /// misses are expected for entities the tracker never saw (objects
    /// spawned before tracking started, rewards granted by non-entity
    /// sources). Re-entrancy means the host called back in a shape the
    /// correlation design does not support.
    pub fn criticality(&self) -> HandlerCriticality {
        if self.severity().is_internal() {
            HandlerCriticality::Important
        } else {
            HandlerCriticality::Optional
        }
    }
}

impl LedgerError for HandlerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Slot(inner) => inner.severity(),
            Self::Attribute(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Slot(inner) => inner.error_code(),
            Self::Attribute(inner) => inner.error_code(),
        }
    }
}
