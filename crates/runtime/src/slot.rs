//! Keyed single-writer slots scoped to a nested call chain.
//!
//! A slot lets an outer host callback hand a value to callbacks the host fires
//! *inside* it, when the host call in between cannot carry an extra argument.
//! The value lives exactly as long as the [`SlotGuard`] returned by
//! [`ScopedCorrelationSlot::push`].
//!
//! Slots are single-threaded (`!Send`/`!Sync`) and must only be shared between
//! calls on one logical call stack.

use std::cell::RefCell;
use std::collections::HashMap;

use collectible_core::{ErrorSeverity, LedgerError};

/// Errors raised by slot access.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    /// A value is already live under this key. The surrounding call chain
    /// re-entered in a way the correlation design does not support.
    #[error("correlation slot {key:?} already holds a value")]
    Reentrant { key: &'static str },

    #[error("correlation slot {key:?} is empty")]
    NotFound { key: &'static str },
}

impl LedgerError for SlotError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Reentrant { .. } => ErrorSeverity::Internal,
            Self::NotFound { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Reentrant { .. } => "SLOT_REENTRANT",
            Self::NotFound { .. } => "SLOT_NOT_FOUND",
        }
    }
}

/// Keyed cells holding at most one live value per key.
#[derive(Debug)]
pub struct ScopedCorrelationSlot<V> {
    values: RefCell<HashMap<&'static str, V>>,
}

impl<V> Default for ScopedCorrelationSlot<V> {
    fn default() -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
        }
    }
}

impl<V: Clone> ScopedCorrelationSlot<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` until the returned guard is dropped.
    ///
    /// Fails with [`SlotError::Reentrant`] instead of overwriting a live value.
    pub fn push(&self, key: &'static str, value: V) -> Result<SlotGuard<'_, V>, SlotError> {
        let mut values = self.values.borrow_mut();
        if values.contains_key(key) {
            return Err(SlotError::Reentrant { key });
        }
        values.insert(key, value);

        Ok(SlotGuard { slot: self, key })
    }

    /// Returns a copy of the live value under `key`.
    pub fn peek(&self, key: &'static str) -> Result<V, SlotError> {
        self.try_peek(key).ok_or(SlotError::NotFound { key })
    }

    pub fn try_peek(&self, key: &str) -> Option<V> {
        self.values.borrow().get(key).cloned()
    }

    pub fn is_occupied(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }

    /// Hides the live value under `key` until the returned guard is dropped.
    ///
    /// Returns `None` when nothing is live. While masked the key reads as
    /// empty and can be pushed again; the hidden value comes back when the
    /// guard drops.
    pub fn mask(&self, key: &'static str) -> Option<MaskGuard<'_, V>> {
        let hidden = self.values.borrow_mut().remove(key)?;
        Some(MaskGuard {
            slot: self,
            key,
            hidden: Some(hidden),
        })
    }
}

/// Releases its key on drop, including during unwinding.
#[must_use = "the slot is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SlotGuard<'a, V> {
    slot: &'a ScopedCorrelationSlot<V>,
    key: &'static str,
}

impl<V> SlotGuard<'_, V> {
    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl<V> Drop for SlotGuard<'_, V> {
    fn drop(&mut self) {
        self.slot.values.borrow_mut().remove(self.key);
    }
}

/// Restores a masked value on drop, including during unwinding.
#[must_use = "the value is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct MaskGuard<'a, V> {
    slot: &'a ScopedCorrelationSlot<V>,
    key: &'static str,
    hidden: Option<V>,
}

impl<V> Drop for MaskGuard<'_, V> {
    fn drop(&mut self) {
        if let Some(value) = self.hidden.take() {
            self.slot.values.borrow_mut().insert(self.key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    const KEY: &str = "who is dying";

    #[test]
    fn value_is_visible_only_inside_scope() {
        let slot = ScopedCorrelationSlot::new();
        assert_eq!(slot.peek(KEY), Err(SlotError::NotFound { key: KEY }));

        {
            let guard = slot.push(KEY, 7).unwrap();
            assert_eq!(guard.key(), KEY);
            assert_eq!(slot.peek(KEY), Ok(7));
            assert!(slot.is_occupied(KEY));
        }

        assert!(!slot.is_occupied(KEY));
        assert_eq!(slot.try_peek(KEY), None);
    }

    #[test]
    fn second_push_on_same_key_is_rejected() {
        let slot = ScopedCorrelationSlot::new();
        let _outer = slot.push(KEY, 1).unwrap();

        let err = slot.push(KEY, 2).unwrap_err();
        assert_eq!(err, SlotError::Reentrant { key: KEY });
        assert_eq!(err.severity(), ErrorSeverity::Internal);

        // The live value was not overwritten.
        assert_eq!(slot.peek(KEY), Ok(1));
    }

    #[test]
    fn distinct_keys_nest_independently() {
        let slot = ScopedCorrelationSlot::new();
        let _a = slot.push("a", 'a').unwrap();
        {
            let _b = slot.push("b", 'b').unwrap();
            assert_eq!(slot.peek("a"), Ok('a'));
            assert_eq!(slot.peek("b"), Ok('b'));
        }
        assert!(slot.is_occupied("a"));
        assert!(!slot.is_occupied("b"));
    }

    #[test]
    fn masked_value_is_hidden_then_restored() {
        let slot = ScopedCorrelationSlot::new();
        assert!(slot.mask(KEY).is_none());

        let _outer = slot.push(KEY, 1).unwrap();
        {
            let _masked = slot.mask(KEY).unwrap();
            assert_eq!(slot.try_peek(KEY), None);
            {
                let _inner = slot.push(KEY, 2).unwrap();
                assert_eq!(slot.peek(KEY), Ok(2));
            }
            assert!(!slot.is_occupied(KEY));
        }
        assert_eq!(slot.peek(KEY), Ok(1));
    }

    #[test]
    fn key_is_released_after_error_return() {
        fn fails_inside_scope(slot: &ScopedCorrelationSlot<u32>) -> Result<(), SlotError> {
            let _guard = slot.push(KEY, 1)?;
            slot.peek("missing")?;
            Ok(())
        }

        let slot = ScopedCorrelationSlot::new();
        assert!(fails_inside_scope(&slot).is_err());
        assert!(slot.push(KEY, 2).is_ok());
    }

    #[test]
    fn key_is_released_after_panic_unwind() {
        let slot = ScopedCorrelationSlot::new();

        let outcome = catch_unwind(AssertUnwindSafe(|| -> u32 {
            let _guard = slot.push(KEY, 1u32).unwrap();
            panic!("host aborted the death sequence");
        }));

        assert!(outcome.is_err());
        assert!(!slot.is_occupied(KEY));
        assert!(slot.push(KEY, 2).is_ok());
    }
}
