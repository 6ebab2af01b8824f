//! Professional license records and their per-variant validation.
//!
//! Each onboarding path owns one variant of [`LicenseRecord`]. Validation is
//! one function per variant so the service never branches on loose fields.

use serde::{Deserialize, Serialize};

use crate::domain::cnpj::{is_valid_cnpj, sanitize_cnpj};
use crate::domain::error::{OnboardingError, OnboardingErrorCode, OnboardingResult};
use crate::domain::ids::OrgId;
use crate::domain::organization::{LicenseStatus, UserRole};
use crate::domain::ports::RandomSource;

/// License data for an individual realtor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtorLicense {
    /// Upper-cased CRECI number; empty when deferred.
    pub creci_number: String,
    /// Upper-cased state code; empty when deferred.
    pub uf: String,
    /// Name printed on the license.
    pub creci_name: String,
    /// The realtor chose to provide the license later.
    #[serde(default)]
    pub deferred: bool,
    /// Verification status.
    pub status: LicenseStatus,
}

/// License data for a brokerage firm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerageLicense {
    /// Registered company name.
    pub legal_name: String,
    /// Digits-only CNPJ.
    pub cnpj: String,
    /// Legal-entity CRECI number.
    pub creci_number: String,
    /// CRECI state code.
    pub uf: String,
    /// CRECI of the responsible broker.
    pub responsible_creci: String,
    /// Verification status.
    pub status: LicenseStatus,
}

/// How a developer is backed by a licensed broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeveloperLinkType {
    /// A responsible broker's own CRECI.
    Creci,
    /// A partner brokerage.
    Partner,
}

/// Broker link for a property developer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperLink {
    /// Kind of link.
    pub link_type: DeveloperLinkType,
    /// Responsible broker CRECI for license-backed links.
    #[serde(default)]
    pub responsible_creci: Option<String>,
    /// Partner brokerage reference for partner-backed links.
    #[serde(default)]
    pub partner_org_id: Option<String>,
    /// Partner brokerage name.
    #[serde(default)]
    pub partner_org_name: Option<String>,
    /// Verification status.
    pub status: LicenseStatus,
}

impl DeveloperLink {
    /// Whether the link names a broker or partner.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        let filled = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        match self.link_type {
            DeveloperLinkType::Creci => filled(&self.responsible_creci),
            DeveloperLinkType::Partner => filled(&self.partner_org_id),
        }
    }
}

/// License attached to the session, tagged by onboarding path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LicenseRecord {
    /// Individual realtor license.
    Realtor(RealtorLicense),
    /// Brokerage license.
    Brokerage(BrokerageLicense),
    /// Developer broker link.
    Developer(DeveloperLink),
}

impl LicenseRecord {
    /// Onboarding path this license belongs to.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        match self {
            Self::Realtor(_) => UserRole::Realtor,
            Self::Brokerage(_) => UserRole::Brokerage,
            Self::Developer(_) => UserRole::Developer,
        }
    }

    /// Current verification status.
    #[must_use]
    pub const fn status(&self) -> LicenseStatus {
        match self {
            Self::Realtor(license) => license.status,
            Self::Brokerage(license) => license.status,
            Self::Developer(link) => link.status,
        }
    }

    /// Replace the verification status.
    pub fn set_status(&mut self, status: LicenseStatus) {
        match self {
            Self::Realtor(license) => license.status = status,
            Self::Brokerage(license) => license.status = status,
            Self::Developer(link) => link.status = status,
        }
    }

    /// Deferred flag for realtor licenses; `None` for other variants.
    #[must_use]
    pub const fn deferred_flag(&self) -> Option<bool> {
        match self {
            Self::Realtor(license) => Some(license.deferred),
            Self::Brokerage(_) | Self::Developer(_) => None,
        }
    }
}

/// Input for the realtor license step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtorLicenseInput {
    /// CRECI number.
    #[serde(default)]
    pub creci_number: Option<String>,
    /// CRECI state code.
    #[serde(default)]
    pub uf: Option<String>,
    /// Name on the license; defaults to the account name.
    #[serde(default)]
    pub creci_name: Option<String>,
    /// Provide the license later.
    #[serde(default)]
    pub deferred: bool,
}

/// Input for the brokerage license step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerageLicenseInput {
    /// Registered company name.
    pub legal_name: String,
    /// CNPJ in any punctuation.
    pub cnpj: String,
    /// Legal-entity CRECI number.
    pub creci_number: String,
    /// CRECI state code.
    pub uf: String,
    /// Responsible broker CRECI.
    pub responsible_creci: String,
}

/// Input for the developer link step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "linkType", rename_all = "snake_case")]
pub enum DeveloperLinkInput {
    /// Backed by a responsible broker's CRECI.
    #[serde(rename_all = "camelCase")]
    Creci {
        /// Responsible broker CRECI.
        responsible_creci: String,
    },
    /// Backed by a partner brokerage.
    #[serde(rename_all = "camelCase")]
    Partner {
        /// Partner reference; generated when blank.
        #[serde(default)]
        partner_org_id: String,
        /// Partner name.
        partner_org_name: String,
    },
    /// Link later; the builder stays in draft mode.
    Defer,
}

/// Trim and upper-case a CRECI number.
#[must_use]
pub fn sanitize_creci(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Trim and upper-case a state code.
#[must_use]
pub fn sanitize_uf(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn trimmed(value: Option<&str>) -> &str {
    value.map(str::trim).unwrap_or_default()
}

/// Validate the realtor step. Deferred input skips the required fields and
/// stores blanks with status `missing`.
pub fn validate_realtor_license(
    input: &RealtorLicenseInput,
    account_name: &str,
) -> OnboardingResult<RealtorLicense> {
    let creci_number = sanitize_creci(trimmed(input.creci_number.as_deref()));
    let uf = sanitize_uf(trimmed(input.uf.as_deref()));
    let creci_name = match trimmed(input.creci_name.as_deref()) {
        "" => account_name.to_owned(),
        name => name.to_owned(),
    };

    if input.deferred {
        return Ok(RealtorLicense {
            creci_number: String::new(),
            uf: String::new(),
            creci_name,
            deferred: true,
            status: LicenseStatus::Missing,
        });
    }
    if creci_number.is_empty() {
        return Err(OnboardingError::new(
            OnboardingErrorCode::MissingCreci,
            "Enter your CRECI number.",
        ));
    }
    if uf.is_empty() {
        return Err(OnboardingError::new(
            OnboardingErrorCode::MissingUf,
            "Select the state of your CRECI.",
        ));
    }
    Ok(RealtorLicense {
        creci_number,
        uf,
        creci_name,
        deferred: false,
        status: LicenseStatus::Unverified,
    })
}

/// Validate the brokerage step in the order name, CNPJ, CRECI, state,
/// responsible broker.
pub fn validate_brokerage_license(
    input: &BrokerageLicenseInput,
) -> OnboardingResult<BrokerageLicense> {
    let legal_name = input.legal_name.trim();
    let cnpj = sanitize_cnpj(&input.cnpj);
    let creci_number = sanitize_creci(&input.creci_number);
    let uf = sanitize_uf(&input.uf);
    let responsible_creci = sanitize_creci(&input.responsible_creci);

    if legal_name.is_empty() {
        return Err(OnboardingError::new(
            OnboardingErrorCode::MissingName,
            "Enter the brokerage's registered name.",
        ));
    }
    if !is_valid_cnpj(&cnpj) {
        return Err(OnboardingErrorCode::InvalidCnpj.into());
    }
    if creci_number.is_empty() {
        return Err(OnboardingError::new(
            OnboardingErrorCode::MissingCreci,
            "Enter the legal-entity CRECI.",
        ));
    }
    if uf.is_empty() {
        return Err(OnboardingErrorCode::MissingUf.into());
    }
    if responsible_creci.is_empty() {
        return Err(OnboardingErrorCode::MissingResponsible.into());
    }
    Ok(BrokerageLicense {
        legal_name: legal_name.to_owned(),
        cnpj,
        creci_number,
        uf,
        responsible_creci,
        status: LicenseStatus::Unverified,
    })
}

/// Validate the developer step. A blank partner reference is replaced with a
/// generated `org_partner_` identifier.
pub fn validate_developer_link(
    input: &DeveloperLinkInput,
    random: &dyn RandomSource,
) -> OnboardingResult<DeveloperLink> {
    match input {
        DeveloperLinkInput::Creci { responsible_creci } => {
            let responsible = sanitize_creci(responsible_creci);
            if responsible.is_empty() {
                return Err(OnboardingErrorCode::MissingResponsible.into());
            }
            Ok(DeveloperLink {
                link_type: DeveloperLinkType::Creci,
                responsible_creci: Some(responsible),
                partner_org_id: None,
                partner_org_name: None,
                status: LicenseStatus::Pending,
            })
        }
        DeveloperLinkInput::Partner {
            partner_org_id,
            partner_org_name,
        } => {
            let name = partner_org_name.trim();
            if name.is_empty() {
                return Err(OnboardingErrorCode::MissingPartnerName.into());
            }
            let id = match partner_org_id.trim() {
                "" => OrgId::generate_with_prefix(random, OrgId::PARTNER_PREFIX).to_string(),
                given => given.to_owned(),
            };
            Ok(DeveloperLink {
                link_type: DeveloperLinkType::Partner,
                responsible_creci: None,
                partner_org_id: Some(id),
                partner_org_name: Some(name.to_owned()),
                status: LicenseStatus::Pending,
            })
        }
        DeveloperLinkInput::Defer => Ok(DeveloperLink {
            link_type: DeveloperLinkType::Partner,
            responsible_creci: None,
            partner_org_id: None,
            partner_org_name: None,
            status: LicenseStatus::Missing,
        }),
    }
}
