//! Invite issuance and redemption.
//!
//! Redemption is an optimistic compare-and-swap against the shared registry:
//! read the entry, validate it, and swap in the incremented entry only if the
//! stored entry is unchanged. A lost race re-reads and re-validates, so the
//! use count never exceeds the limit.

use serde::{Deserialize, Serialize};

use crate::domain::account::{AccountProfile, normalize_email, validate_email};
use crate::domain::error::{OnboardingError, OnboardingErrorCode, OnboardingResult};
use crate::domain::events::TelemetryEvent;
use crate::domain::ids::{MembershipId, OrgId};
use crate::domain::invite::{
    DeveloperCodeInput, EmployeeInviteInput, InviteCategory, InviteCode, InviteRedemption,
    InviteTemplate, default_expiry, unknown_code_message,
};
use crate::domain::license::{
    BrokerageLicense, DeveloperLink, DeveloperLinkType, LicenseRecord, RealtorLicense,
};
use crate::domain::organization::{
    LicenseStatus, MembershipRecord, OrgProfile, OrgType, UserRole,
};

use super::OnboardingService;

/// Compare-and-swap attempts before a contended redemption gives up.
pub(crate) const REDEEM_ATTEMPTS: usize = 64;

const DEFAULT_EMPLOYER_NAME: &str = "Equipe Stella";
const DEFAULT_SANDBOX_LABEL: &str = "Sandbox Stella";
const DEFAULT_PARTNER_NAME: &str = "Parceiro sandbox";

/// Outcome of redeeming a developer code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperCodeRedemption {
    /// Redeemed code.
    pub code: InviteCode,
    /// Onboarding path assigned by the code.
    pub role: UserRole,
}

fn recipient_email(raw: &str, missing_message: &str) -> OnboardingResult<String> {
    let email = normalize_email(raw);
    if email.is_empty() {
        return Err(OnboardingError::new(
            OnboardingErrorCode::MissingEmail,
            missing_message,
        ));
    }
    validate_email(&email)?;
    Ok(email)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl OnboardingService {
    fn require_developer_codes(&self) -> OnboardingResult<()> {
        if self.policy.developer_codes_enabled {
            Ok(())
        } else {
            Err(OnboardingError::new(
                OnboardingErrorCode::NotAllowed,
                "Developer codes are disabled.",
            ))
        }
    }

    fn publish_invite(&self, template: &InviteTemplate) {
        self.ports.registry.upsert_invite(template.clone());
        self.emit(&TelemetryEvent::InviteCreated {
            code: template.code.clone(),
            org_id: template.org_id.clone(),
            role: template.role,
        });
    }

    /// Issue an employee invite bound to the recipient's email.
    pub fn create_employee_invite(
        &self,
        input: &EmployeeInviteInput,
    ) -> OnboardingResult<InviteTemplate> {
        let email = recipient_email(&input.email, "Enter the employee's email.")?;
        let random = self.ports.random.as_ref();
        let template = InviteTemplate {
            code: InviteCode::generate_unique(random, &self.ports.registry.invite_directory()),
            category: InviteCategory::Employee,
            org_id: OrgId::generate(random),
            org_name: non_blank(Some(input.org_name.as_str()))
                .unwrap_or(DEFAULT_EMPLOYER_NAME)
                .to_owned(),
            org_type: input.org_type.unwrap_or(OrgType::Brokerage),
            role: input.role,
            expires_at: input
                .expires_at
                .unwrap_or_else(|| default_expiry(self.now(), InviteCategory::Employee)),
            max_uses: input.max_uses.unwrap_or(1),
            uses: 0,
            bound_email: Some(email),
            developer_role: None,
            note: input.note.clone(),
        };
        self.publish_invite(&template);
        Ok(template)
    }

    /// Issue a developer sandbox code.
    ///
    /// The assigned path is the input role, else the active role, else
    /// realtor.
    pub fn create_developer_code(
        &self,
        input: &DeveloperCodeInput,
    ) -> OnboardingResult<InviteTemplate> {
        self.require_developer_codes()?;
        let email = recipient_email(&input.email, "Enter the email allowed to use this code.")?;
        let target = input.role.or(self.state.role).unwrap_or(UserRole::Realtor);
        let random = self.ports.random.as_ref();
        let template = InviteTemplate {
            code: InviteCode::generate_unique(random, &self.ports.registry.invite_directory()),
            category: InviteCategory::Developer,
            org_id: OrgId::generate_with_prefix(random, OrgId::DEVELOPER_PREFIX),
            org_name: non_blank(input.label.as_deref())
                .unwrap_or(DEFAULT_SANDBOX_LABEL)
                .to_owned(),
            org_type: OrgType::for_role(target),
            role: target.sandbox_membership_role(),
            expires_at: input
                .expires_at
                .unwrap_or_else(|| default_expiry(self.now(), InviteCategory::Developer)),
            max_uses: input.max_uses.unwrap_or(1),
            uses: 0,
            bound_email: Some(email),
            developer_role: Some(target),
            note: input.note.clone(),
        };
        self.publish_invite(&template);
        Ok(template)
    }

    /// Consume one use of `code`, returning the template as it was before the
    /// increment.
    fn claim_invite(
        &self,
        code: &InviteCode,
        category: InviteCategory,
        account: &AccountProfile,
    ) -> OnboardingResult<InviteTemplate> {
        for _ in 0..REDEEM_ATTEMPTS {
            let current = self.ports.registry.find_invite(code).ok_or_else(|| {
                OnboardingError::new(
                    OnboardingErrorCode::InvalidCode,
                    unknown_code_message(category),
                )
            })?;
            current.ensure_redeemable(category, self.now(), &account.email)?;
            let next = current.with_use_recorded();
            if self.ports.registry.compare_and_swap_invite(&current, &next) {
                return Ok(current);
            }
        }
        Err(OnboardingError::new(
            OnboardingErrorCode::InviteUsed,
            "This invite is being redeemed elsewhere. Try again.",
        ))
    }

    /// Redeem an employee invite and join the employer's organisation.
    pub fn redeem_invite(&mut self, raw_code: &str) -> OnboardingResult<InviteRedemption> {
        let account = self.require_account("Create your account before using a code.")?;
        if self.state.role != Some(UserRole::Employee) {
            return Err(OnboardingError::new(
                OnboardingErrorCode::WrongRole,
                "Select the employee path to continue.",
            ));
        }
        let code = InviteCode::parse(raw_code)?;
        let template = self.claim_invite(&code, InviteCategory::Employee, &account)?;

        let now = self.now();
        let redemption = InviteRedemption::from_template(&template, now);
        let org = OrgProfile::new(
            template.org_id.clone(),
            template.org_type,
            template.org_name.clone(),
            now,
        )
        .with_status(LicenseStatus::Pending);
        let membership = MembershipRecord::active(
            self.state.membership.as_ref().map_or_else(
                || MembershipId::generate(self.ports.random.as_ref()),
                |membership| membership.id.clone(),
            ),
            account.id.clone(),
            org.id.clone(),
            template.role,
            now,
        );

        let mut next = self.state.clone();
        next.invite = Some(redemption.clone());
        next.org = Some(org);
        next.membership = Some(membership);
        self.apply(
            next,
            vec![TelemetryEvent::InviteRedeemed {
                code: redemption.code.clone(),
                org_id: redemption.org_id.clone(),
                role: redemption.role,
            }],
        );
        Ok(redemption)
    }

    /// Redeem a developer sandbox code.
    ///
    /// Keeps an existing organisation and membership, or creates sandbox
    /// ones, backfills a `pending` license for the assigned path when none
    /// exists, and turns on the developer override.
    pub fn redeem_developer_code(
        &mut self,
        raw_code: &str,
    ) -> OnboardingResult<DeveloperCodeRedemption> {
        self.require_developer_codes()?;
        let account = self.require_account("Create your account before using a developer code.")?;
        let code = InviteCode::parse(raw_code)?;
        let template = self.claim_invite(&code, InviteCategory::Developer, &account)?;

        let assigned = template
            .developer_role
            .or(self.state.role)
            .unwrap_or(UserRole::Realtor);
        let now = self.now();
        let random = self.ports.random.as_ref();
        let org = self.state.org.clone().unwrap_or_else(|| {
            let legal_name = non_blank(Some(template.org_name.as_str())).map_or_else(
                || format!("{} Sandbox", account.full_name),
                str::to_owned,
            );
            OrgProfile::new(
                OrgId::generate(random),
                OrgType::for_role(assigned),
                legal_name,
                now,
            )
            .with_status(LicenseStatus::Pending)
        });
        let membership = self.state.membership.clone().unwrap_or_else(|| {
            MembershipRecord::active(
                MembershipId::generate(random),
                account.id.clone(),
                org.id.clone(),
                template.role,
                now,
            )
        });
        let license = self
            .state
            .license
            .clone()
            .or_else(|| sandbox_license(assigned, &account, &org, &template));

        let event = TelemetryEvent::InviteRedeemed {
            code: template.code.clone(),
            org_id: org.id.clone(),
            role: membership.role,
        };
        let mut next = self.state.clone();
        next.role = Some(assigned);
        next.developer_override = true;
        next.developer_code = Some(template.code.clone());
        next.org = Some(org);
        next.membership = Some(membership);
        next.license = license;
        self.apply(next, vec![event]);
        Ok(DeveloperCodeRedemption {
            code: template.code,
            role: assigned,
        })
    }
}

/// Placeholder `pending` license for a sandbox session; employees get none.
fn sandbox_license(
    role: UserRole,
    account: &AccountProfile,
    org: &OrgProfile,
    template: &InviteTemplate,
) -> Option<LicenseRecord> {
    match role {
        UserRole::Realtor => Some(LicenseRecord::Realtor(RealtorLicense {
            creci_number: String::new(),
            uf: String::new(),
            creci_name: account.full_name.clone(),
            deferred: true,
            status: LicenseStatus::Pending,
        })),
        UserRole::Brokerage => Some(LicenseRecord::Brokerage(BrokerageLicense {
            legal_name: org.legal_name.clone(),
            cnpj: String::new(),
            creci_number: String::new(),
            uf: String::new(),
            responsible_creci: String::new(),
            status: LicenseStatus::Pending,
        })),
        UserRole::Developer => Some(LicenseRecord::Developer(DeveloperLink {
            link_type: DeveloperLinkType::Partner,
            responsible_creci: None,
            partner_org_id: Some(template.org_id.to_string()),
            partner_org_name: Some(
                non_blank(Some(template.org_name.as_str()))
                    .unwrap_or(DEFAULT_PARTNER_NAME)
                    .to_owned(),
            ),
            status: LicenseStatus::Pending,
        })),
        UserRole::Employee => None,
    }
}
