//! In-memory store adapters.
//!
//! Used by tests and by embedders that keep onboarding state in process.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::registry_collections::RegistryCollections;
use crate::domain::ports::{OnboardingRegistry, SessionStateStore};
use crate::domain::{InviteCode, InviteTemplate, OnboardingState, default_invites};

/// Session aggregate held in memory.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<OnboardingState>,
}

impl MemoryStateStore {
    /// Store that starts with `state`.
    #[must_use]
    pub fn with_state(state: OnboardingState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, OnboardingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStateStore for MemoryStateStore {
    fn load_state(&self) -> OnboardingState {
        self.lock().clone()
    }

    fn save_state(&self, state: &OnboardingState) {
        *self.lock() = state.clone();
    }

    fn clear_state(&self) {
        *self.lock() = OnboardingState::default();
    }
}

/// Shared registries held in memory.
///
/// `Default` starts with empty collections; [`MemoryRegistry::seeded`]
/// starts with the default invite directory.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    collections: Mutex<RegistryCollections>,
}

impl MemoryRegistry {
    /// Registry whose directory holds `invites`.
    #[must_use]
    pub fn with_invites(invites: Vec<InviteTemplate>) -> Self {
        Self {
            collections: Mutex::new(RegistryCollections {
                invites,
                ..RegistryCollections::default()
            }),
        }
    }

    /// Registry whose directory holds the default invites.
    #[must_use]
    pub fn seeded() -> Self {
        Self::with_invites(default_invites())
    }

    fn lock(&self) -> MutexGuard<'_, RegistryCollections> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl OnboardingRegistry for MemoryRegistry {
    fn registered_emails(&self) -> Vec<String> {
        self.lock().emails.clone()
    }

    fn claim_email(&self, email: &str) -> bool {
        self.lock().claim_email(email)
    }

    fn allocated_slugs(&self) -> Vec<String> {
        self.lock().slugs.clone()
    }

    fn claim_slug(&self, slug: &str) -> bool {
        self.lock().claim_slug(slug)
    }

    fn invite_directory(&self) -> Vec<InviteTemplate> {
        self.lock().invites.clone()
    }

    fn find_invite(&self, code: &InviteCode) -> Option<InviteTemplate> {
        self.lock().find_invite(code)
    }

    fn upsert_invite(&self, template: InviteTemplate) {
        self.lock().upsert_invite(template);
    }

    fn compare_and_swap_invite(&self, current: &InviteTemplate, next: &InviteTemplate) -> bool {
        self.lock().compare_and_swap_invite(current, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use rstest::rstest;

    #[rstest]
    fn state_store_round_trips_and_clears() {
        let store = MemoryStateStore::default();
        let state = OnboardingState {
            role: Some(UserRole::Developer),
            ..OnboardingState::default()
        };
        store.save_state(&state);
        assert_eq!(store.load_state(), state);
        store.clear_state();
        assert!(store.load_state().is_empty());
    }

    #[rstest]
    fn seeded_registry_exposes_default_directory() {
        let registry = MemoryRegistry::seeded();
        let code = InviteCode::parse("constella24").expect("code");
        assert!(registry.find_invite(&code).is_some());
        assert!(registry.registered_emails().is_empty());
    }
}
