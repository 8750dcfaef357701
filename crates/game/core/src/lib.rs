//! Persistent collection ledger data types.
//!
//! `collectible-core` defines the spawn-time [`Identity`] of a trackable
//! entity, its monotone [`ProgressionState`], and the [`StateStore`] that
//! persists those states as a single versioned save blob. Nothing here knows
//! about the host game; `collectible-runtime` wires these types to host
//! lifecycle events.
pub mod codec;
pub mod error;
pub mod identity;
pub mod state;
pub mod store;

pub use codec::{FormatError, IDENTITY_TOKENS, IdentityField};
pub use error::{ErrorSeverity, LedgerError};
pub use identity::{Identity, SpawnPosition};
pub use state::ProgressionState;
pub use store::{ENTRY_TOKENS, SAVE_FORMAT_VERSION, SEPARATOR, StateStore, StoreError};
