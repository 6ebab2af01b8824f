//! License steps for the realtor, brokerage and developer paths.
//!
//! Each save writes the license together with a matching organisation and
//! owner membership. Organisation and membership identities survive re-saves.

use crate::domain::account::AccountProfile;
use crate::domain::error::{OnboardingError, OnboardingErrorCode, OnboardingResult};
use crate::domain::events::TelemetryEvent;
use crate::domain::ids::OrgId;
use crate::domain::license::{
    BrokerageLicenseInput, DeveloperLinkInput, LicenseRecord, RealtorLicenseInput,
    validate_brokerage_license, validate_developer_link, validate_realtor_license,
};
use crate::domain::organization::{CreciType, LicenseStatus, OrgProfile, OrgType, UserRole};

use super::OnboardingService;

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

impl OnboardingService {
    fn require_path(&self, role: UserRole) -> OnboardingResult<AccountProfile> {
        if self.state.role != Some(role) {
            let message = match role {
                UserRole::Realtor => "Select the realtor path to continue.",
                UserRole::Brokerage => "Select the brokerage path to continue.",
                UserRole::Developer => "Select the developer path to continue.",
                UserRole::Employee => "Select the employee path to continue.",
            };
            return Err(OnboardingError::new(OnboardingErrorCode::WrongRole, message));
        }
        self.require_account("Create your account before adding a license.")
    }

    fn existing_org_id(&self) -> OrgId {
        self.state.org.as_ref().map_or_else(
            || OrgId::generate(self.ports.random.as_ref()),
            |org| org.id.clone(),
        )
    }

    fn commit_license(
        &mut self,
        account: &AccountProfile,
        license: LicenseRecord,
        org: OrgProfile,
    ) -> LicenseRecord {
        let membership = self.owner_membership(account, &org.id);
        let event = TelemetryEvent::LicenseSaved {
            role: license.role(),
            status: license.status(),
            deferred: license.deferred_flag(),
        };
        let mut next = self.state.clone();
        next.license = Some(license.clone());
        next.org = Some(org);
        next.membership = Some(membership);
        self.apply(next, vec![event]);
        license
    }

    /// Save the individual realtor license, or defer it.
    pub fn save_realtor_license(
        &mut self,
        input: &RealtorLicenseInput,
    ) -> OnboardingResult<LicenseRecord> {
        let account = self.require_path(UserRole::Realtor)?;
        let license = validate_realtor_license(input, &account.full_name)?;

        let creci_number = non_empty(&license.creci_number);
        let creci_uf = non_empty(&license.uf);
        let org = match self.state.org.clone() {
            Some(org) if org.org_type == OrgType::Realtor => OrgProfile {
                creci_number,
                creci_type: Some(CreciType::Individual),
                creci_uf,
                creci_status: Some(license.status),
                ..org
            },
            existing => OrgProfile {
                creci_number,
                creci_type: Some(CreciType::Individual),
                creci_uf,
                creci_status: Some(license.status),
                ..OrgProfile::new(
                    self.existing_org_id(),
                    OrgType::Realtor,
                    account.full_name.clone(),
                    existing.map_or_else(|| self.now(), |org| org.created_at),
                )
            },
        };
        Ok(self.commit_license(&account, LicenseRecord::Realtor(license), org))
    }

    /// Save the brokerage license. The organisation becomes a brokerage
    /// organisation with a legal-entity CRECI.
    pub fn save_brokerage_license(
        &mut self,
        input: &BrokerageLicenseInput,
    ) -> OnboardingResult<LicenseRecord> {
        let account = self.require_path(UserRole::Brokerage)?;
        let license = validate_brokerage_license(input)?;

        let created_at = self
            .state
            .org
            .as_ref()
            .map_or_else(|| self.now(), |org| org.created_at);
        let org = OrgProfile {
            cnpj: Some(license.cnpj.clone()),
            creci_number: Some(license.creci_number.clone()),
            creci_type: Some(CreciType::Juridico),
            creci_uf: Some(license.uf.clone()),
            creci_status: Some(license.status),
            responsible_broker_creci: Some(license.responsible_creci.clone()),
            ..OrgProfile::new(
                self.existing_org_id(),
                OrgType::Brokerage,
                license.legal_name.clone(),
                created_at,
            )
        };
        Ok(self.commit_license(&account, LicenseRecord::Brokerage(license), org))
    }

    /// Save the developer broker link, or defer it.
    pub fn save_developer_link(
        &mut self,
        input: &DeveloperLinkInput,
    ) -> OnboardingResult<LicenseRecord> {
        let account = self.require_path(UserRole::Developer)?;
        let link = validate_developer_link(input, self.ports.random.as_ref())?;

        let existing = self.state.org.clone();
        let legal_name = existing.as_ref().map_or_else(
            || format!("Incorporação de {}", account.full_name),
            |org| org.legal_name.clone(),
        );
        let created_at = existing.as_ref().map_or_else(|| self.now(), |org| org.created_at);
        let org = OrgProfile {
            creci_number: existing.as_ref().and_then(|org| org.creci_number.clone()),
            creci_type: existing.as_ref().and_then(|org| org.creci_type),
            creci_uf: existing.as_ref().and_then(|org| org.creci_uf.clone()),
            creci_status: Some(link.status),
            responsible_broker_creci: link.responsible_creci.clone(),
            partner_org_id: link.partner_org_id.clone(),
            partner_org_name: link.partner_org_name.clone(),
            ..OrgProfile::new(
                self.existing_org_id(),
                OrgType::Developer,
                legal_name,
                created_at,
            )
        };
        Ok(self.commit_license(&account, LicenseRecord::Developer(link), org))
    }

    /// Record a review outcome for the current license and mirror it onto
    /// the organisation.
    pub fn review_license(&mut self, status: LicenseStatus) -> OnboardingResult<LicenseRecord> {
        let Some(mut license) = self.state.license.clone() else {
            return Err(OnboardingError::new(
                OnboardingErrorCode::MissingOrg,
                "There is no license to review yet.",
            ));
        };
        license.set_status(status);

        let mut next = self.state.clone();
        next.license = Some(license.clone());
        if let Some(org) = next.org.as_mut() {
            org.creci_status = Some(status);
        }
        self.apply(
            next,
            vec![TelemetryEvent::LicenseSaved {
                role: license.role(),
                status,
                deferred: license.deferred_flag(),
            }],
        );
        Ok(license)
    }
}
