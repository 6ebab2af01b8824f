//! The onboarding aggregate persisted per session.

use serde::{Deserialize, Serialize};

use crate::domain::account::AccountProfile;
use crate::domain::invite::{InviteCode, InviteRedemption};
use crate::domain::license::LicenseRecord;
use crate::domain::organization::{MembershipRecord, OrgProfile, UserRole};
use crate::domain::tenant::TenantProfile;

/// Aggregate root holding at most one of each onboarding entity.
///
/// The default value is the empty aggregate used after a reset and whenever
/// stored state is absent or unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OnboardingState {
    /// Session account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountProfile>,
    /// Chosen onboarding path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// Associated organisation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<OrgProfile>,
    /// Membership in `org`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership: Option<MembershipRecord>,
    /// Professional license.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseRecord>,
    /// Redeemed employee invite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite: Option<InviteRedemption>,
    /// Provisioned site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantProfile>,
    /// Sandbox bypass granted by a developer code.
    pub developer_override: bool,
    /// Code that granted the override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_code: Option<InviteCode>,
}

impl OnboardingState {
    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
