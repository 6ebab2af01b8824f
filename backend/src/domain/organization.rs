//! Organisations, memberships and the role vocabulary shared by onboarding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{AccountId, MembershipId, OrgId};

/// Onboarding path chosen by the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Individual licensed realtor.
    Realtor,
    /// Brokerage firm.
    Brokerage,
    /// Property developer.
    Developer,
    /// Employee joining an existing organisation.
    Employee,
}

impl UserRole {
    /// Wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Realtor => "realtor",
            Self::Brokerage => "brokerage",
            Self::Developer => "developer",
            Self::Employee => "employee",
        }
    }

    /// Membership role granted to sandbox memberships for this path.
    #[must_use]
    pub const fn sandbox_membership_role(self) -> MembershipRole {
        match self {
            Self::Employee => MembershipRole::Employee,
            _ => MembershipRole::Owner,
        }
    }
}

/// Kind of legal entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgType {
    /// Individual realtor acting as an organisation.
    Realtor,
    /// Brokerage firm.
    Brokerage,
    /// Property developer.
    Developer,
}

impl OrgType {
    /// Organisation type that backs a user role; employees default to realtor.
    #[must_use]
    pub const fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::Brokerage => Self::Brokerage,
            UserRole::Developer => Self::Developer,
            UserRole::Realtor | UserRole::Employee => Self::Realtor,
        }
    }
}

/// Role of an account inside an organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    /// Organisation owner.
    Owner,
    /// Administrator.
    Admin,
    /// Content editor.
    Editor,
    /// Sales agent.
    Agent,
    /// Manages listings.
    ListingManager,
    /// Plain employee.
    Employee,
    /// Read-only member.
    Viewer,
}

impl MembershipRole {
    /// Wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Agent => "agent",
            Self::ListingManager => "listing_manager",
            Self::Employee => "employee",
            Self::Viewer => "viewer",
        }
    }

    /// Whether members with this role may use the site builder.
    #[must_use]
    pub const fn is_builder_eligible(self) -> bool {
        matches!(
            self,
            Self::Owner | Self::Admin | Self::Editor | Self::Agent | Self::ListingManager
        )
    }
}

/// Membership lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Membership is in effect.
    #[default]
    Active,
    /// Membership awaits acceptance.
    Invited,
}

/// Verification status of a professional license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    /// Nothing has been provided yet.
    Missing,
    /// Provided through a sandbox or link, awaiting review.
    Pending,
    /// Provided and format-checked, not reviewed.
    Unverified,
    /// Reviewed and accepted.
    Verified,
    /// Reviewed and refused.
    Rejected,
}

impl LicenseStatus {
    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Pending => "pending",
            Self::Unverified => "unverified",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

/// CRECI registration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreciType {
    /// Individual broker registration.
    Individual,
    /// Legal-entity registration.
    Juridico,
}

/// Legal or operating entity associated with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgProfile {
    /// Organisation identifier.
    pub id: OrgId,
    /// Organisation type.
    #[serde(rename = "type")]
    pub org_type: OrgType,
    /// Registered or display name.
    pub legal_name: String,
    /// Digits-only CNPJ.
    #[serde(default)]
    pub cnpj: Option<String>,
    /// CRECI number.
    #[serde(default)]
    pub creci_number: Option<String>,
    /// CRECI registration kind.
    #[serde(default)]
    pub creci_type: Option<CreciType>,
    /// CRECI state code.
    #[serde(default, rename = "creciUF")]
    pub creci_uf: Option<String>,
    /// License status mirrored from the license record.
    #[serde(default)]
    pub creci_status: Option<LicenseStatus>,
    /// CRECI of the responsible broker.
    #[serde(default)]
    pub responsible_broker_creci: Option<String>,
    /// Partner brokerage reference.
    #[serde(default)]
    pub partner_org_id: Option<String>,
    /// Partner brokerage name.
    #[serde(default)]
    pub partner_org_name: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl OrgProfile {
    /// Organisation with only identity fields populated.
    pub fn new(
        id: OrgId,
        org_type: OrgType,
        legal_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            org_type,
            legal_name: legal_name.into(),
            cnpj: None,
            creci_number: None,
            creci_type: None,
            creci_uf: None,
            creci_status: None,
            responsible_broker_creci: None,
            partner_org_id: None,
            partner_org_name: None,
            created_at,
        }
    }

    /// Set the mirrored license status.
    #[must_use]
    pub fn with_status(mut self, status: LicenseStatus) -> Self {
        self.creci_status = Some(status);
        self
    }
}

/// Link between an account and an organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    /// Membership identifier.
    pub id: MembershipId,
    /// Member account.
    pub user_id: AccountId,
    /// Organisation joined.
    pub org_id: OrgId,
    /// Role inside the organisation.
    pub role: MembershipRole,
    /// Lifecycle state.
    pub status: MembershipStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl MembershipRecord {
    /// Active membership.
    pub fn active(
        id: MembershipId,
        user_id: AccountId,
        org_id: OrgId,
        role: MembershipRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            org_id,
            role,
            status: MembershipStatus::Active,
            created_at,
        }
    }
}
