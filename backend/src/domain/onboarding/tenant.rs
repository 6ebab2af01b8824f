//! Tenant provisioning.

use crate::domain::error::{OnboardingError, OnboardingErrorCode, OnboardingResult};
use crate::domain::events::{DomainKind, TelemetryEvent};
use crate::domain::ids::{AccountId, MembershipId, OrgId, TenantId};
use crate::domain::organization::{
    LicenseStatus, MembershipRecord, OrgProfile, OrgType, UserRole,
};
use crate::domain::slug::TenantSlug;
use crate::domain::tenant::{TenantInput, TenantProfile};

use super::OnboardingService;

impl OnboardingService {
    /// Sandbox organisation and membership for an override session that
    /// never completed licensing.
    fn sandbox_org(&self, role: UserRole) -> (OrgProfile, MembershipRecord) {
        let random = self.ports.random.as_ref();
        let now = self.now();
        let legal_name = self
            .state
            .account
            .as_ref()
            .map_or_else(|| "Sandbox Stella".to_owned(), |account| {
                format!("{} Sandbox", account.full_name)
            });
        let org = OrgProfile::new(OrgId::generate(random), OrgType::for_role(role), legal_name, now)
            .with_status(LicenseStatus::Pending);
        let user_id = self.state.account.as_ref().map_or_else(
            || AccountId::generate(random),
            |account| account.id.clone(),
        );
        let membership = MembershipRecord::active(
            MembershipId::generate(random),
            user_id,
            org.id.clone(),
            role.sandbox_membership_role(),
            now,
        );
        (org, membership)
    }

    /// Provision the tenant site.
    ///
    /// Fails in the order `missing_role`, `not_allowed`, `missing_org`,
    /// `missing_name`, `invalid_slug`, `slug_in_use`. The slug is claimed in
    /// the shared registry only after every other check has passed. An
    /// existing tenant keeps its id, creation time and custom domain.
    pub fn create_tenant(&mut self, input: &TenantInput) -> OnboardingResult<TenantProfile> {
        let Some(role) = self.state.role else {
            return Err(OnboardingErrorCode::MissingRole.into());
        };
        if role == UserRole::Employee && !self.state.developer_override {
            return Err(OnboardingError::new(
                OnboardingErrorCode::NotAllowed,
                "Employees need access granted by their brokerage.",
            ));
        }
        let (org, membership) = match (&self.state.org, &self.state.membership) {
            (Some(org), Some(membership)) => (org.clone(), membership.clone()),
            _ if self.state.developer_override => self.sandbox_org(role),
            _ => return Err(OnboardingErrorCode::MissingOrg.into()),
        };

        let name = input.name.trim();
        if name.is_empty() {
            return Err(OnboardingError::new(
                OnboardingErrorCode::MissingName,
                "Enter the site name.",
            ));
        }
        let slug = TenantSlug::parse(&input.slug)?;
        if !self.ports.registry.claim_slug(slug.as_str()) {
            return Err(OnboardingErrorCode::SlugInUse.into());
        }

        let existing = self.state.tenant.as_ref();
        let tenant = TenantProfile {
            id: existing.map_or_else(
                || TenantId::generate(self.ports.random.as_ref()),
                |tenant| tenant.id.clone(),
            ),
            org_id: org.id.clone(),
            name: name.to_owned(),
            default_route: slug.default_route(),
            path_fallback: Some(slug.path_fallback()),
            slug,
            primary_domain: existing.and_then(|tenant| tenant.primary_domain.clone()),
            logo_url: input.logo_url.clone(),
            favicon_url: input.favicon_url.clone(),
            created_at: existing.map_or_else(|| self.now(), |tenant| tenant.created_at),
        };

        let events = vec![
            TelemetryEvent::TenantCreated {
                tenant_id: tenant.id.clone(),
                org_id: tenant.org_id.clone(),
                slug: tenant.slug.clone(),
            },
            TelemetryEvent::SlugChosen {
                slug: tenant.slug.clone(),
                org_id: tenant.org_id.clone(),
            },
            TelemetryEvent::DomainAssigned {
                tenant_id: tenant.id.clone(),
                kind: DomainKind::DevDefault,
                value: tenant.default_route.clone(),
            },
        ];
        let mut next = self.state.clone();
        next.tenant = Some(tenant.clone());
        next.org = Some(org);
        next.membership = Some(membership);
        self.apply(next, events);
        Ok(tenant)
    }
}
