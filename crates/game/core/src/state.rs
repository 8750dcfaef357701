//! Collection status of a tracked entity.

/// Progression of a single collectible.
///
/// Variants are ordered and the store only ever moves an entry forward, so a
/// new variant must be appended after the ones it supersedes. The ordinal is
/// the value written to save data.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ProgressionState {
    /// Known to the ledger but its reward has not been picked up.
    #[default]
    Uncollected = 0,
    /// The reward was collected in some session.
    Collected = 1,
}

impl ProgressionState {
    /// Lowest state; an absent entry behaves as if it held this value.
    pub const MIN: Self = Self::Uncollected;

    /// Ordinal written to save data.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Parses a decimal ordinal token from save data.
    pub fn from_token(token: &str) -> Option<Self> {
        token.parse::<u8>().ok().and_then(Self::from_repr)
    }
}
