//! Invite codes: employee invites and developer sandbox codes.
//!
//! Both categories share one directory keyed by [`InviteCode`]. A template
//! may be redeemed while it is unexpired, below its use limit and, when bound,
//! only by the bound email.

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{OnboardingError, OnboardingErrorCode, OnboardingResult};
use crate::domain::ids::OrgId;
use crate::domain::organization::{MembershipRole, OrgType, UserRole};
use crate::domain::ports::RandomSource;

/// Characters used in generated codes.
pub const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Characters per block.
pub const CODE_BLOCK_LEN: usize = 4;
/// Blocks per code.
pub const CODE_BLOCKS: usize = 4;
/// Default lifetime of an employee invite.
pub const EMPLOYEE_INVITE_TTL_DAYS: i64 = 7;
/// Default lifetime of a developer code.
pub const DEVELOPER_CODE_TTL_DAYS: i64 = 30;
/// Attempts made to find a code not already in the directory.
pub const CODE_GENERATION_ATTEMPTS: usize = 8;

/// Normalised (trimmed, upper-cased) invite code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InviteCode(String);

impl InviteCode {
    /// Normalise raw input; blank input fails with `missing_code`.
    ///
    /// # Examples
    /// ```
    /// use onboarding::domain::InviteCode;
    ///
    /// let code = InviteCode::parse(" abcd-efgh-2345-6789 ").expect("code");
    /// assert_eq!(code.as_str(), "ABCD-EFGH-2345-6789");
    /// ```
    pub fn parse(raw: &str) -> OnboardingResult<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(OnboardingErrorCode::MissingCode.into());
        }
        Ok(Self(normalized))
    }

    /// Draw a `XXXX-XXXX-XXXX-XXXX` code from the random source.
    pub fn generate(random: &dyn RandomSource) -> Self {
        let blocks: Vec<String> = (0..CODE_BLOCKS)
            .map(|_| {
                (0..CODE_BLOCK_LEN)
                    .map(|_| char::from(CODE_ALPHABET[random.index(CODE_ALPHABET.len())]))
                    .collect()
            })
            .collect();
        Self(blocks.join("-"))
    }

    /// Draw codes until one is absent from `directory`, giving up after
    /// [`CODE_GENERATION_ATTEMPTS`] and returning the last candidate.
    pub fn generate_unique(random: &dyn RandomSource, directory: &[InviteTemplate]) -> Self {
        let mut candidate = Self::generate(random);
        for _ in 1..CODE_GENERATION_ATTEMPTS {
            if directory.iter().all(|entry| entry.code != candidate) {
                break;
            }
            candidate = Self::generate(random);
        }
        candidate
    }

    /// Borrow the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<InviteCode> for String {
    fn from(value: InviteCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for InviteCode {
    type Error = OnboardingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Invite category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteCategory {
    /// Grants membership of an employer's organisation.
    Employee,
    /// Grants the sandbox developer override.
    Developer,
}

/// Reusable code definition stored in the directory.
///
/// ## Invariants
/// - `uses <= max_uses`.
/// - `code` is unique across the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteTemplate {
    /// Directory key.
    pub code: InviteCode,
    /// Category.
    pub category: InviteCategory,
    /// Target organisation.
    pub org_id: OrgId,
    /// Target organisation name.
    pub org_name: String,
    /// Target organisation type.
    pub org_type: OrgType,
    /// Membership role granted on redemption.
    pub role: MembershipRole,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
    /// Maximum number of redemptions.
    pub max_uses: u32,
    /// Redemptions so far.
    #[serde(default)]
    pub uses: u32,
    /// Only this (lower-cased) email may redeem.
    #[serde(default)]
    pub bound_email: Option<String>,
    /// Onboarding path assigned by a developer code.
    #[serde(default)]
    pub developer_role: Option<UserRole>,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

impl InviteTemplate {
    /// Whether `now` is past the expiry time.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Whether the use limit has been reached.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.uses >= self.max_uses
    }

    /// Check that the account may redeem this template as `category`.
    ///
    /// Checks run in the order category, expiry, use limit, bound email.
    pub fn ensure_redeemable(
        &self,
        category: InviteCategory,
        now: DateTime<Utc>,
        account_email: &str,
    ) -> OnboardingResult<()> {
        let wording = RedemptionWording::for_category(category);
        if self.category != category {
            return Err(OnboardingError::new(
                OnboardingErrorCode::InvalidCode,
                wording.wrong_category,
            ));
        }
        if self.is_expired(now) {
            return Err(OnboardingError::new(
                OnboardingErrorCode::InviteExpired,
                wording.expired,
            ));
        }
        if self.is_exhausted() {
            return Err(OnboardingError::new(
                OnboardingErrorCode::InviteUsed,
                wording.used,
            ));
        }
        if let Some(bound) = self.bound_email.as_deref()
            && !bound.is_empty()
            && !bound.eq_ignore_ascii_case(account_email)
        {
            return Err(OnboardingErrorCode::EmailMismatch.into());
        }
        Ok(())
    }

    /// Copy of the template with one more use recorded.
    #[must_use]
    pub fn with_use_recorded(&self) -> Self {
        Self {
            uses: self.uses.saturating_add(1),
            ..self.clone()
        }
    }
}

struct RedemptionWording {
    wrong_category: &'static str,
    expired: &'static str,
    used: &'static str,
}

impl RedemptionWording {
    const fn for_category(category: InviteCategory) -> Self {
        match category {
            InviteCategory::Employee => Self {
                wrong_category: "This code is reserved for another flow.",
                expired: "This invite has expired. Ask the brokerage administrator for a new one.",
                used: "This invite has already been used.",
            },
            InviteCategory::Developer => Self {
                wrong_category: "Use this option only for developer codes.",
                expired: "This code has expired. Generate a new one in the developer panel.",
                used: "This code has reached its usage limit.",
            },
        }
    }
}

/// Message for a code that is not in the directory.
pub(crate) const fn unknown_code_message(category: InviteCategory) -> &'static str {
    match category {
        InviteCategory::Employee => "Invalid invite code.",
        InviteCategory::Developer => "Developer code not found.",
    }
}

/// Snapshot of a successfully consumed template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRedemption {
    /// Redeemed code.
    pub code: InviteCode,
    /// Category.
    pub category: InviteCategory,
    /// Organisation joined.
    pub org_id: OrgId,
    /// Organisation name.
    pub org_name: String,
    /// Organisation type.
    pub org_type: OrgType,
    /// Membership role granted.
    pub role: MembershipRole,
    /// Redemption time.
    pub redeemed_at: DateTime<Utc>,
    /// Template expiry at redemption time.
    pub expires_at: DateTime<Utc>,
    /// Bound email, if any.
    #[serde(default)]
    pub bound_email: Option<String>,
}

impl InviteRedemption {
    /// Snapshot `template` as redeemed at `now`.
    #[must_use]
    pub fn from_template(template: &InviteTemplate, now: DateTime<Utc>) -> Self {
        Self {
            code: template.code.clone(),
            category: template.category,
            org_id: template.org_id.clone(),
            org_name: template.org_name.clone(),
            org_type: template.org_type,
            role: template.role,
            redeemed_at: now,
            expires_at: template.expires_at,
            bound_email: template.bound_email.clone(),
        }
    }
}

/// Input for issuing an employee invite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInviteInput {
    /// Recipient email; the invite is bound to it.
    pub email: String,
    /// Employer name; defaults to "Equipe Stella".
    #[serde(default)]
    pub org_name: String,
    /// Employer type; defaults to brokerage.
    #[serde(default)]
    pub org_type: Option<OrgType>,
    /// Role granted on redemption.
    pub role: MembershipRole,
    /// Use limit; defaults to 1.
    #[serde(default)]
    pub max_uses: Option<u32>,
    /// Expiry; defaults to seven days out.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Input for issuing a developer sandbox code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperCodeInput {
    /// Email allowed to redeem the code.
    pub email: String,
    /// Onboarding path to assign; defaults to the active role, then realtor.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Sandbox organisation name; defaults to "Sandbox Stella".
    #[serde(default)]
    pub label: Option<String>,
    /// Use limit; defaults to 1.
    #[serde(default)]
    pub max_uses: Option<u32>,
    /// Expiry; defaults to thirty days out.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

pub(crate) fn default_expiry(now: DateTime<Utc>, category: InviteCategory) -> DateTime<Utc> {
    let days = match category {
        InviteCategory::Employee => EMPLOYEE_INVITE_TTL_DAYS,
        InviteCategory::Developer => DEVELOPER_CODE_TTL_DAYS,
    };
    now + Duration::days(days)
}

/// Directory used when no invites have been stored yet.
#[must_use]
pub fn default_invites() -> Vec<InviteTemplate> {
    let seed = |code: &str,
                org_id: &str,
                org_name: &str,
                role: MembershipRole,
                expires_at: Option<DateTime<Utc>>,
                max_uses: u32| {
        Some(InviteTemplate {
            code: InviteCode::parse(code).ok()?,
            category: InviteCategory::Employee,
            org_id: OrgId::new(org_id).ok()?,
            org_name: org_name.to_owned(),
            org_type: OrgType::Brokerage,
            role,
            expires_at: expires_at?,
            max_uses,
            uses: 0,
            bound_email: None,
            developer_role: None,
            note: None,
        })
    };
    [
        seed(
            "CONSTELLA24",
            "org_constellation",
            "Constellation Brokers",
            MembershipRole::Editor,
            Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).single(),
            5,
        ),
        seed(
            "SKYLINEOPS",
            "org_skyline_ops",
            "Skyline Operations",
            MembershipRole::ListingManager,
            Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).single(),
            1,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
