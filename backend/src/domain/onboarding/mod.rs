//! Onboarding service: the driving port for one onboarding session.
//!
//! The service owns the session aggregate and applies every operation as a
//! single transition: validate, claim any shared registry entries, build the
//! complete next aggregate, then persist it. A failed operation leaves the
//! aggregate untouched.
//!
//! After each transition the builder gate is recomputed; the first time it
//! leaves `locked` a `builder_unlocked` event is emitted.

mod account;
mod invite;
mod license;
mod tenant;


use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;

pub use self::invite::DeveloperCodeRedemption;

use crate::domain::account::AccountProfile;
use crate::domain::error::{OnboardingError, OnboardingErrorCode, OnboardingResult};
use crate::domain::events::TelemetryEvent;
use crate::domain::gate::{BuilderGate, BuilderMode, compute_gate};
use crate::domain::ids::{MembershipId, OrgId};
use crate::domain::invite::InviteTemplate;
use crate::domain::organization::{MembershipRecord, MembershipRole};
use crate::domain::ports::{OnboardingRegistry, RandomSource, SessionStateStore, TelemetrySink};
use crate::domain::state::OnboardingState;

/// Capabilities that are off unless explicitly enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnboardingPolicy {
    /// Allow issuing and redeeming developer sandbox codes.
    pub developer_codes_enabled: bool,
}

impl OnboardingPolicy {
    /// Policy with developer sandbox codes enabled.
    #[must_use]
    pub const fn with_developer_codes() -> Self {
        Self {
            developer_codes_enabled: true,
        }
    }
}

/// Adapters the service drives.
#[derive(Clone)]
pub struct OnboardingPorts {
    /// Per-session aggregate store.
    pub store: Arc<dyn SessionStateStore>,
    /// Registries shared between sessions.
    pub registry: Arc<dyn OnboardingRegistry>,
    /// Analytics channel.
    pub telemetry: Arc<dyn TelemetrySink>,
    /// Randomness for codes and identifiers.
    pub random: Arc<dyn RandomSource>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
}

/// Onboarding session service.
pub struct OnboardingService {
    ports: OnboardingPorts,
    policy: OnboardingPolicy,
    state: OnboardingState,
    last_mode: BuilderMode,
}

impl OnboardingService {
    /// Open a session from the stored aggregate.
    pub fn new(ports: OnboardingPorts, policy: OnboardingPolicy) -> Self {
        let state = ports.store.load_state();
        let last_mode = compute_gate(&state).mode;
        Self {
            ports,
            policy,
            state,
            last_mode,
        }
    }

    /// Current aggregate.
    #[must_use]
    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    /// Capabilities in effect.
    #[must_use]
    pub fn policy(&self) -> OnboardingPolicy {
        self.policy
    }

    /// Builder gate for the current aggregate, recomputed on every call.
    #[must_use]
    pub fn gate(&self) -> BuilderGate {
        compute_gate(&self.state)
    }

    /// Snapshot of the invite directory, most recent first.
    #[must_use]
    pub fn invite_directory(&self) -> Vec<InviteTemplate> {
        self.ports.registry.invite_directory()
    }

    /// Snapshot of every registered email.
    #[must_use]
    pub fn existing_emails(&self) -> Vec<String> {
        self.ports.registry.registered_emails()
    }

    /// Snapshot of every allocated slug.
    #[must_use]
    pub fn existing_slugs(&self) -> Vec<String> {
        self.ports.registry.allocated_slugs()
    }

    /// Clear the session aggregate. Shared registries are kept.
    pub fn reset_onboarding(&mut self) {
        self.ports.store.clear_state();
        self.state = OnboardingState::default();
        self.track_gate();
    }

    fn now(&self) -> DateTime<Utc> {
        self.ports.clock.utc()
    }

    fn require_account(&self, message: &str) -> OnboardingResult<AccountProfile> {
        self.state
            .account
            .clone()
            .ok_or_else(|| OnboardingError::new(OnboardingErrorCode::MissingAccount, message))
    }

    /// Owner membership for `org_id`, keeping the identity of any existing
    /// membership.
    fn owner_membership(&self, account: &AccountProfile, org_id: &OrgId) -> MembershipRecord {
        let existing = self.state.membership.as_ref();
        MembershipRecord::active(
            existing.map_or_else(
                || MembershipId::generate(self.ports.random.as_ref()),
                |membership| membership.id.clone(),
            ),
            account.id.clone(),
            org_id.clone(),
            MembershipRole::Owner,
            existing.map_or_else(|| self.now(), |membership| membership.created_at),
        )
    }

    /// Persist `next`, adopt it, emit `events`, then track the gate.
    fn apply(&mut self, next: OnboardingState, events: Vec<TelemetryEvent>) {
        self.ports.store.save_state(&next);
        self.state = next;
        for event in &events {
            self.emit(event);
        }
        self.track_gate();
    }

    fn emit(&self, event: &TelemetryEvent) {
        self.ports.telemetry.record(event);
    }

    fn track_gate(&mut self) {
        let mode = compute_gate(&self.state).mode;
        if let Some(role) = self.state.role
            && mode != BuilderMode::Locked
            && self.last_mode == BuilderMode::Locked
        {
            self.emit(&TelemetryEvent::BuilderUnlocked { mode, role });
        }
        self.last_mode = mode;
    }
}
