//! Common error infrastructure for collectible-core.
//!
//! Domain-specific errors (e.g. [`FormatError`](crate::FormatError),
//! [`StoreError`](crate::StoreError)) are defined next to the code that raises
//! them. This module provides the classification shared by all of them.

/// Severity level of an error, used for categorization and logging priority.
///
/// - **Validation**: Input was rejected; retrying the same input cannot succeed
/// - **Internal**: Unexpected state or programmer error that needs investigation
/// - **Fatal**: Persisted data cannot be used by this build at all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not retry without changes.
    ///
    /// Examples: malformed identity token, truncated save blob
    Validation,

    /// Internal error, unexpected re-entrancy or missing bookkeeping.
    ///
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error, the data was written by an incompatible version.
    ///
    /// Examples: save blob with an unknown format version
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all ledger errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait LedgerError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log filtering and for asserting on a variant in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
