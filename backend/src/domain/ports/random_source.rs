//! Port for randomness used by identifier and invite code generation.
//!
//! Production wiring uses a thread-local RNG adapter. Tests inject
//! [`FixtureRandomSource`] to make generated codes and identifiers
//! predictable.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Source of randomness for the onboarding domain.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Return a uniformly distributed index in `0..bound`.
    ///
    /// `bound` is always greater than zero.
    fn index(&self, bound: usize) -> usize;

    /// Return 128 random bits for identifier generation.
    fn bits(&self) -> u128;
}

const BITS_MULTIPLIER: u128 = 0x9E37_79B9_7F4A_7C15_F39C_C060_5CED_C835;

/// Deterministic random source for tests and fixtures.
///
/// Indices are served from a scripted queue first, then from a counter
/// reduced modulo the requested bound. Bits come from a separate counter
/// spread over the full 128-bit range, so successive identifiers differ.
#[derive(Debug, Default)]
pub struct FixtureRandomSource {
    scripted: Mutex<VecDeque<usize>>,
    index_counter: AtomicU64,
    bits_counter: AtomicU64,
}

impl FixtureRandomSource {
    /// Create a source driven purely by counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source that serves `indices` before falling back to the
    /// counter.
    #[must_use]
    pub fn with_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            scripted: Mutex::new(indices.into_iter().collect()),
            ..Self::default()
        }
    }
}

impl RandomSource for FixtureRandomSource {
    fn index(&self, bound: usize) -> usize {
        let scripted = self
            .scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let raw = scripted.unwrap_or_else(|| {
            let next = self.index_counter.fetch_add(1, Ordering::Relaxed);
            usize::try_from(next).unwrap_or_default()
        });
        raw % bound.max(1)
    }

    fn bits(&self) -> u128 {
        let next = self.bits_counter.fetch_add(1, Ordering::Relaxed) + 1;
        u128::from(next).wrapping_mul(BITS_MULTIPLIER)
    }
}
