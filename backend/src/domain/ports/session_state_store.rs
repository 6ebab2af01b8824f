//! Port for the per-session onboarding aggregate.
//!
//! The store holds exactly one [`OnboardingState`]. Reads never fail: an
//! absent or unreadable aggregate yields the empty state. Writes are
//! best-effort; adapters log and swallow their own failures so the caller's
//! in-memory state stays authoritative.

use crate::domain::OnboardingState;

/// Storage for the onboarding aggregate of a single session.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStateStore: Send + Sync {
    /// Load the stored aggregate, or the empty aggregate when absent.
    fn load_state(&self) -> OnboardingState;

    /// Replace the stored aggregate.
    fn save_state(&self, state: &OnboardingState);

    /// Remove the stored aggregate.
    fn clear_state(&self);
}
