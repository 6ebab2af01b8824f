//! Builder access gate.
//!
//! [`compute_gate`] is a pure function of the aggregate. The decision table
//! below is evaluated top to bottom and the first matching row wins.

use serde::{Deserialize, Serialize};

use crate::domain::license::LicenseRecord;
use crate::domain::organization::{LicenseStatus, UserRole};
use crate::domain::state::OnboardingState;

/// Reason shown while no role is selected.
pub const REASON_CHOOSE_ROLE: &str = "choose how to start";
/// Reason shown while a realtor has no complete license.
pub const REASON_REALTOR_LICENSE: &str = "add CRECI to continue";
/// Reason shown while a brokerage has no complete license.
pub const REASON_BROKERAGE_LICENSE: &str = "need legal CRECI and responsible broker";
/// Reason shown while a developer has no link at all.
pub const REASON_DEVELOPER_LINK: &str = "link a responsible broker to publish";
/// Reason shown while a developer link is empty.
pub const REASON_DEVELOPER_DRAFT: &str = "builder is draft-only until you link a broker";
/// Reason shown while a developer link awaits review.
pub const REASON_DEVELOPER_VERIFICATION: &str = "awaiting verification to publish";
/// Reason shown while an employee has not redeemed an invite.
pub const REASON_EMPLOYEE_INVITE: &str = "enter your employer's invite code";
/// Reason shown while an employee's role cannot build.
pub const REASON_EMPLOYEE_ROLE: &str = "your role has no builder access yet";

/// Builder access level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderMode {
    /// Builder unusable.
    #[default]
    Locked,
    /// Drafts only; publishing disabled.
    Limited,
    /// Fully interactive.
    Full,
}

impl BuilderMode {
    /// Wire representation of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Limited => "limited",
            Self::Full => "full",
        }
    }
}

/// Computed access level with an optional explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderGate {
    /// Access level.
    pub mode: BuilderMode,
    /// Why access is restricted; absent for `full`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BuilderGate {
    fn full() -> Self {
        Self {
            mode: BuilderMode::Full,
            reason: None,
        }
    }

    fn restricted(mode: BuilderMode, reason: &str) -> Self {
        Self {
            mode,
            reason: Some(reason.to_owned()),
        }
    }
}

/// Derive the builder gate from the aggregate.
///
/// # Examples
/// ```
/// use onboarding::domain::{compute_gate, BuilderMode, OnboardingState};
///
/// let gate = compute_gate(&OnboardingState::default());
/// assert_eq!(gate.mode, BuilderMode::Locked);
/// assert_eq!(gate.reason.as_deref(), Some("choose how to start"));
/// ```
#[must_use]
pub fn compute_gate(state: &OnboardingState) -> BuilderGate {
    let Some(role) = state.role else {
        return BuilderGate::restricted(BuilderMode::Locked, REASON_CHOOSE_ROLE);
    };
    if state.developer_override {
        return BuilderGate::full();
    }
    match role {
        UserRole::Realtor => realtor_gate(state),
        UserRole::Brokerage => brokerage_gate(state),
        UserRole::Developer => developer_gate(state),
        UserRole::Employee => employee_gate(state),
    }
}

fn realtor_gate(state: &OnboardingState) -> BuilderGate {
    match &state.license {
        Some(LicenseRecord::Realtor(license))
            if !license.deferred && !license.creci_number.is_empty() && !license.uf.is_empty() =>
        {
            BuilderGate::full()
        }
        _ => BuilderGate::restricted(BuilderMode::Locked, REASON_REALTOR_LICENSE),
    }
}

fn brokerage_gate(state: &OnboardingState) -> BuilderGate {
    match &state.license {
        Some(LicenseRecord::Brokerage(license))
            if !license.creci_number.is_empty() && !license.responsible_creci.is_empty() =>
        {
            BuilderGate::full()
        }
        _ => BuilderGate::restricted(BuilderMode::Locked, REASON_BROKERAGE_LICENSE),
    }
}

fn developer_gate(state: &OnboardingState) -> BuilderGate {
    let Some(LicenseRecord::Developer(link)) = &state.license else {
        return BuilderGate::restricted(BuilderMode::Locked, REASON_DEVELOPER_LINK);
    };
    if !link.is_populated() {
        return BuilderGate::restricted(BuilderMode::Limited, REASON_DEVELOPER_DRAFT);
    }
    if link.status == LicenseStatus::Verified {
        BuilderGate::full()
    } else {
        BuilderGate::restricted(BuilderMode::Limited, REASON_DEVELOPER_VERIFICATION)
    }
}

fn employee_gate(state: &OnboardingState) -> BuilderGate {
    let Some(invite) = &state.invite else {
        return BuilderGate::restricted(BuilderMode::Locked, REASON_EMPLOYEE_INVITE);
    };
    let role = state
        .membership
        .as_ref()
        .map_or(invite.role, |membership| membership.role);
    if role.is_builder_eligible() {
        BuilderGate::full()
    } else {
        BuilderGate::restricted(BuilderMode::Locked, REASON_EMPLOYEE_ROLE)
    }
}
