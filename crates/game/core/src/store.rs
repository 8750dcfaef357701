//! Versioned, monotone store of collectible progression.
//!
//! The save blob is a single `;`-separated string:
//!
//! ```text
//! version ; container ; local_name ; spawn_x ; spawn_y ; state ; container ; ...
//! ```
//!
//! The first token is [`SAVE_FORMAT_VERSION`]. Every entry that follows is
//! [`IDENTITY_TOKENS`] identity tokens (see [`crate::codec`]) and one decimal
//! [`ProgressionState`] ordinal.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::codec::{self, FormatError, IDENTITY_TOKENS};
use crate::error::{ErrorSeverity, LedgerError};
use crate::identity::Identity;
use crate::state::ProgressionState;

/// Format version written as the first token of every save blob.
pub const SAVE_FORMAT_VERSION: &str = "1";

/// Token separator of the save blob.
pub const SEPARATOR: char = ';';

/// Tokens per stored entry: the identity plus its state.
pub const ENTRY_TOKENS: usize = IDENTITY_TOKENS + 1;

/// Errors raised while loading a save blob.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The blob was written by a different (usually newer) format version.
    #[error(
        "unknown save format version {found:?} (expected {expected:?}); a newer build may be required to load this save"
    )]
    Version {
        found: String,
        expected: &'static str,
    },

    /// The blob does not split into whole entries.
    #[error(
        "collectible save data is corrupt: {tokens} tokens after the version do not form whole entries"
    )]
    Corrupt { tokens: usize },

    #[error("collectible save data is corrupt: unknown state token {token:?}")]
    UnknownState { token: String },

    #[error("collectible save data is corrupt: {0}")]
    Format(#[from] FormatError),
}

impl LedgerError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Version { .. } => ErrorSeverity::Fatal,
            Self::Corrupt { .. } | Self::UnknownState { .. } | Self::Format(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Version { .. } => "STORE_VERSION",
            Self::Corrupt { .. } => "STORE_CORRUPT",
            Self::UnknownState { .. } => "STORE_UNKNOWN_STATE",
            Self::Format(inner) => inner.error_code(),
        }
    }
}

/// Mapping from [`Identity`] to [`ProgressionState`].
///
/// Entries are grouped by container for lookup locality only; every operation
/// behaves as if the store were one flat map. Updates are monotone: a state
/// never moves backwards, whatever the caller asks for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateStore {
    // Container maps are only created when an entry is written, so an empty
    // inner map never exists.
    containers: HashMap<String, HashMap<Identity, ProgressionState>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every entry. Used before a bulk load.
    pub fn clear(&mut self) {
        self.containers.clear();
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.containers.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.get(identity).is_some()
    }

    /// Returns the stored state, or `None` if the identity was never set.
    pub fn get(&self, identity: &Identity) -> Option<ProgressionState> {
        self.containers
            .get(&identity.container)
            .and_then(|entries| entries.get(identity))
            .copied()
    }

    /// Moves `identity` forward to `new_state`.
    ///
    /// An absent entry counts as [`ProgressionState::MIN`]. The write only
    /// happens when `new_state` is strictly greater than the current state.
    /// Returns whether the stored value changed.
    pub fn set(&mut self, identity: &Identity, new_state: ProgressionState) -> bool {
        let old_state = self.get(identity);
        if new_state <= old_state.unwrap_or(ProgressionState::MIN) {
            return false;
        }

        match self.containers.get_mut(&identity.container) {
            Some(entries) => {
                entries.insert(identity.clone(), new_state);
            }
            None => {
                self.containers.insert(
                    identity.container.clone(),
                    HashMap::from([(identity.clone(), new_state)]),
                );
            }
        }

        debug!(
            target: "collectible::store",
            identity = %identity,
            from = ?old_state,
            to = %new_state,
            "Updated collectible state"
        );
        trace!(
            target: "collectible::store",
            key = %codec::encode(identity).join(";"),
            "Serialized key"
        );

        true
    }

    /// Iterates over every entry. Order is unspecified but stable for an
    /// unmodified store.
    pub fn iter(&self) -> impl Iterator<Item = (&Identity, ProgressionState)> + '_ {
        self.containers
            .values()
            .flat_map(|entries| entries.iter().map(|(id, state)| (id, *state)))
    }

    /// Iterates over the entries of one container.
    pub fn container_entries<'a>(
        &'a self,
        container: &str,
    ) -> impl Iterator<Item = (&'a Identity, ProgressionState)> + 'a {
        self.containers
            .get(container)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(id, state)| (id, *state)))
    }

    /// Serializes the whole store into a save blob.
    pub fn serialize(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.len() * ENTRY_TOKENS);
        parts.push(SAVE_FORMAT_VERSION.to_owned());

        for (identity, state) in self.iter() {
            parts.extend(codec::encode(identity));
            parts.push(state.ordinal().to_string());
        }

        parts.join(&SEPARATOR.to_string())
    }

    /// Adds the entries of a save blob on top of the current contents.
    ///
    /// Does not clear first. Every entry goes through [`set`](Self::set), so
    /// loading never downgrades an existing entry and loading the same blob
    /// twice is harmless. The blob is fully decoded before anything is
    /// applied; on error the store is left untouched.
    ///
    /// `None` and the empty string are no-ops. Returns how many entries
    /// changed.
    pub fn load(&mut self, blob: Option<&str>) -> Result<usize, StoreError> {
        let Some(blob) = blob.filter(|blob| !blob.is_empty()) else {
            return Ok(0);
        };

        let mut tokens = blob.split(SEPARATOR);
        let version = tokens.next().unwrap_or_default();
        if version != SAVE_FORMAT_VERSION {
            return Err(StoreError::Version {
                found: version.to_owned(),
                expected: SAVE_FORMAT_VERSION,
            });
        }

        let body: Vec<&str> = tokens.collect();
        if body.len() % ENTRY_TOKENS != 0 {
            return Err(StoreError::Corrupt { tokens: body.len() });
        }

        let entries = body
            .chunks_exact(ENTRY_TOKENS)
            .map(decode_entry)
            .collect::<Result<Vec<_>, _>>()?;

        let mut changed = 0;
        for (identity, state) in &entries {
            if self.set(identity, *state) {
                changed += 1;
            }
        }

        debug!(
            target: "collectible::store",
            entries = entries.len(),
            changed,
            "Loaded collectible save data"
        );

        Ok(changed)
    }
}

fn decode_entry(chunk: &[&str]) -> Result<(Identity, ProgressionState), StoreError> {
    let (key, state) = chunk.split_at(IDENTITY_TOKENS);
    let identity = codec::decode(key)?;
    let token = state[0];
    let state = ProgressionState::from_token(token).ok_or_else(|| StoreError::UnknownState {
        token: token.to_owned(),
    })?;
    Ok((identity, state))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn town(name: &str, x: f32, y: f32) -> Identity {
        Identity::new("Town", name, (x, y))
    }

    #[test]
    fn set_is_monotone() {
        let mut store = StateStore::new();
        let id = town("Crawler", 10.0, 5.0);

        assert!(store.set(&id, ProgressionState::Collected));
        assert!(!store.set(&id, ProgressionState::Uncollected));
        assert!(!store.set(&id, ProgressionState::Collected));
        assert_eq!(store.get(&id), Some(ProgressionState::Collected));
    }

    #[test]
    fn setting_minimum_on_absent_entry_is_not_a_change() {
        let mut store = StateStore::new();
        let id = town("Crawler", 10.0, 5.0);

        assert!(!store.set(&id, ProgressionState::Uncollected));
        assert!(!store.contains(&id));
        assert_eq!(store.get(&id), None);
        assert!(store.is_empty());
    }

    #[test]
    fn container_partitioning_is_invisible() {
        let mut store = StateStore::new();
        let town_id = town("Crawler", 1.0, 1.0);
        let cave_id = Identity::new("Cave", "Crawler", (1.0, 1.0));

        store.set(&town_id, ProgressionState::Collected);
        assert!(store.contains(&town_id));
        assert!(!store.contains(&cave_id));

        store.set(&cave_id, ProgressionState::Collected);
        assert_eq!(store.len(), 2);
        assert_eq!(store.container_entries("Cave").count(), 1);
        assert_eq!(store.container_entries("Nowhere").count(), 0);
    }

    #[test]
    fn empty_store_serializes_to_version_only() {
        assert_eq!(StateStore::new().serialize(), SAVE_FORMAT_VERSION);
    }

    #[test]
    fn serialize_then_load_reproduces_store() {
        let mut store = StateStore::new();
        store.set(&town("Crawler", 10.0, 5.0), ProgressionState::Collected);
        store.set(&town("semi;colon", -3.5, 0.25), ProgressionState::Collected);
        store.set(
            &Identity::new("Cave", "Shade", (f32::NAN, f32::NEG_INFINITY)),
            ProgressionState::Collected,
        );

        let blob = store.serialize();
        assert_eq!(blob.split(SEPARATOR).count(), 1 + 3 * ENTRY_TOKENS);

        let mut restored = StateStore::new();
        assert_eq!(restored.load(Some(blob.as_str())), Ok(3));
        assert_eq!(restored, store);
    }

    #[test]
    fn load_ignores_empty_input() {
        let mut store = StateStore::new();
        assert_eq!(store.load(None), Ok(0));
        assert_eq!(store.load(Some("")), Ok(0));
        assert!(store.is_empty());
    }

    #[test]
    fn load_rejects_unknown_version() {
        let mut store = StateStore::new();
        let err = store.load(Some("2")).unwrap_err();
        assert!(matches!(err, StoreError::Version { ref found, .. } if found == "2"));
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn load_rejects_partial_entries() {
        let mut source = StateStore::new();
        source.set(&town("Crawler", 10.0, 5.0), ProgressionState::Collected);
        let blob = source.serialize();

        let truncated = &blob[..blob.rfind(SEPARATOR).unwrap()];
        let mut store = StateStore::new();
        assert_eq!(
            store.load(Some(truncated)),
            Err(StoreError::Corrupt { tokens: 4 })
        );
        assert_eq!(
            store.load(Some("1;")),
            Err(StoreError::Corrupt { tokens: 1 })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn failed_load_applies_nothing() {
        let mut source = StateStore::new();
        source.set(&town("Crawler", 10.0, 5.0), ProgressionState::Collected);
        let good = source.serialize();
        let blob = format!("{good};;;AAAAAA==;AAAAAA==;7");

        let mut store = StateStore::new();
        let err = store.load(Some(blob.as_str())).unwrap_err();
        assert_eq!(
            err,
            StoreError::UnknownState {
                token: "7".to_owned()
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn load_surfaces_identity_format_errors() {
        let mut store = StateStore::new();
        let err = store.load(Some("1;@@;;AAAAAA==;AAAAAA==;1")).unwrap_err();
        assert!(matches!(err, StoreError::Format(FormatError::InvalidBase64 { .. })));
        assert_eq!(err.error_code(), "FORMAT_INVALID_BASE64");
    }

    #[test]
    fn load_layers_without_downgrading() {
        let id = town("Crawler", 10.0, 5.0);
        let mut store = StateStore::new();
        store.set(&id, ProgressionState::Collected);

        let [a, b, c, d] = codec::encode(&id);
        let downgrade = format!("1;{a};{b};{c};{d};0");
        assert_eq!(store.load(Some(downgrade.as_str())), Ok(0));
        assert_eq!(store.get(&id), Some(ProgressionState::Collected));

        // Applying the same data twice is idempotent.
        let blob = store.serialize();
        assert_eq!(store.load(Some(blob.as_str())), Ok(0));
        assert_eq!(store.len(), 1);
    }
}
