//! Telemetry events emitted by onboarding operations.
//!
//! Events are transport agnostic. The telemetry adapter decides how to ship
//! them; the payload field names match the analytics contract.

use serde::Serialize;

use crate::domain::account::AuthMethod;
use crate::domain::gate::BuilderMode;
use crate::domain::ids::{OrgId, TenantId};
use crate::domain::invite::InviteCode;
use crate::domain::organization::{LicenseStatus, MembershipRole, UserRole};
use crate::domain::slug::TenantSlug;

/// How a domain was attached to a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    /// Default route on the shared hosting domain.
    DevDefault,
}

/// Named, fire-and-forget analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// An account was created.
    UserSignup {
        /// Authentication method used.
        auth_method: AuthMethod,
    },
    /// An onboarding path was chosen.
    RoleSelected {
        /// Chosen path.
        role: UserRole,
    },
    /// A license step was saved or reviewed.
    LicenseSaved {
        /// Path the license belongs to.
        role: UserRole,
        /// Resulting status.
        status: LicenseStatus,
        /// Set for realtor saves only.
        #[serde(skip_serializing_if = "Option::is_none")]
        deferred: Option<bool>,
    },
    /// An invite or developer code was issued.
    #[serde(rename_all = "camelCase")]
    InviteCreated {
        /// Issued code.
        code: InviteCode,
        /// Target organisation.
        org_id: OrgId,
        /// Granted membership role.
        role: MembershipRole,
    },
    /// An invite or developer code was redeemed.
    #[serde(rename_all = "camelCase")]
    InviteRedeemed {
        /// Redeemed code.
        code: InviteCode,
        /// Organisation joined.
        org_id: OrgId,
        /// Membership role held afterwards.
        role: MembershipRole,
    },
    /// A tenant was provisioned.
    #[serde(rename_all = "camelCase")]
    TenantCreated {
        /// New tenant.
        tenant_id: TenantId,
        /// Owning organisation.
        org_id: OrgId,
        /// Allocated slug.
        slug: TenantSlug,
    },
    /// A slug was allocated.
    #[serde(rename_all = "camelCase")]
    SlugChosen {
        /// Allocated slug.
        slug: TenantSlug,
        /// Owning organisation.
        org_id: OrgId,
    },
    /// A route was attached to a tenant.
    #[serde(rename_all = "camelCase")]
    DomainAssigned {
        /// Tenant receiving the route.
        tenant_id: TenantId,
        /// Kind of route.
        #[serde(rename = "type")]
        kind: DomainKind,
        /// Route value.
        value: String,
    },
    /// The builder gate left `locked`.
    BuilderUnlocked {
        /// New mode.
        mode: BuilderMode,
        /// Active path.
        role: UserRole,
    },
}

impl TelemetryEvent {
    /// Analytics event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UserSignup { .. } => "user_signup",
            Self::RoleSelected { .. } => "role_selected",
            Self::LicenseSaved { .. } => "license_saved",
            Self::InviteCreated { .. } => "invite_created",
            Self::InviteRedeemed { .. } => "invite_redeemed",
            Self::TenantCreated { .. } => "tenant_created",
            Self::SlugChosen { .. } => "slug_chosen",
            Self::DomainAssigned { .. } => "domain_assigned",
            Self::BuilderUnlocked { .. } => "builder_unlocked",
        }
    }
}
