//! Onboarding error taxonomy.
//!
//! Every rejected operation surfaces as a single [`OnboardingError`] carrying a
//! stable machine-readable [`OnboardingErrorCode`] and a human-readable
//! message. Adapters branch on the code; the message is for people.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable machine-readable code describing why an operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingErrorCode {
    /// Terms of use were not accepted.
    MissingConsent,
    /// Full name is blank.
    InvalidName,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail,
    /// Password is too short or lacks letters and digits.
    WeakPassword,
    /// Email is already registered.
    EmailInUse,
    /// No account exists for the session yet.
    MissingAccount,
    /// The active role does not match the requested flow.
    WrongRole,
    /// CRECI number is blank.
    MissingCreci,
    /// CRECI state code is blank.
    MissingUf,
    /// CNPJ fails format or checksum validation.
    InvalidCnpj,
    /// A required legal or site name is blank.
    MissingName,
    /// Responsible broker CRECI is blank.
    MissingResponsible,
    /// Partner brokerage name is blank.
    MissingPartnerName,
    /// No role has been selected.
    MissingRole,
    /// The operation is not permitted for this session.
    NotAllowed,
    /// No organisation could be resolved.
    MissingOrg,
    /// Slug does not satisfy the tenant slug rules.
    InvalidSlug,
    /// Slug is already allocated.
    SlugInUse,
    /// Invite code is blank.
    MissingCode,
    /// Invite code is unknown or belongs to another category.
    InvalidCode,
    /// Invite has expired.
    InviteExpired,
    /// Invite has reached its maximum number of uses.
    InviteUsed,
    /// Invite is bound to a different email.
    EmailMismatch,
    /// Invite recipient email is blank.
    MissingEmail,
}

impl OnboardingErrorCode {
    /// Wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingConsent => "missing_consent",
            Self::InvalidName => "invalid_name",
            Self::InvalidEmail => "invalid_email",
            Self::WeakPassword => "weak_password",
            Self::EmailInUse => "email_in_use",
            Self::MissingAccount => "missing_account",
            Self::WrongRole => "wrong_role",
            Self::MissingCreci => "missing_creci",
            Self::MissingUf => "missing_uf",
            Self::InvalidCnpj => "invalid_cnpj",
            Self::MissingName => "missing_name",
            Self::MissingResponsible => "missing_responsible",
            Self::MissingPartnerName => "missing_partner_name",
            Self::MissingRole => "missing_role",
            Self::NotAllowed => "not_allowed",
            Self::MissingOrg => "missing_org",
            Self::InvalidSlug => "invalid_slug",
            Self::SlugInUse => "slug_in_use",
            Self::MissingCode => "missing_code",
            Self::InvalidCode => "invalid_code",
            Self::InviteExpired => "invite_expired",
            Self::InviteUsed => "invite_used",
            Self::EmailMismatch => "email_mismatch",
            Self::MissingEmail => "missing_email",
        }
    }

    /// Generic message used when a call site does not supply its own.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::MissingConsent => "You need to accept the terms of use.",
            Self::InvalidName => "Enter your full name.",
            Self::InvalidEmail => "Enter a valid email address.",
            Self::WeakPassword => "Use at least 8 characters with letters and numbers.",
            Self::EmailInUse => "This email is already in use. Sign in to continue.",
            Self::MissingAccount => "Create your account first.",
            Self::WrongRole => "Select the matching onboarding path to continue.",
            Self::MissingCreci => "Enter the CRECI number.",
            Self::MissingUf => "Select the CRECI state.",
            Self::InvalidCnpj => "Enter a valid CNPJ.",
            Self::MissingName => "Enter a name.",
            Self::MissingResponsible => "Enter the responsible broker's CRECI.",
            Self::MissingPartnerName => "Enter the partner brokerage name.",
            Self::MissingRole => "Choose an onboarding path first.",
            Self::NotAllowed => "This action is not allowed for your account.",
            Self::MissingOrg => "Finish the licensing step before creating your site.",
            Self::InvalidSlug => {
                "Invalid slug. Use only lowercase letters, numbers and hyphens."
            }
            Self::SlugInUse => "This slug is already in use. Choose another one.",
            Self::MissingCode => "Enter the invite code.",
            Self::InvalidCode => "Invalid invite code.",
            Self::InviteExpired => "This invite has expired.",
            Self::InviteUsed => "This invite has already been used.",
            Self::EmailMismatch => "This code is bound to another email.",
            Self::MissingEmail => "Enter the recipient's email.",
        }
    }
}

impl fmt::Display for OnboardingErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected onboarding operation.
///
/// ## Invariants
/// - `message` is never blank; a blank message is replaced by the code's
///   default message.
///
/// # Examples
/// ```
/// use onboarding::domain::{OnboardingError, OnboardingErrorCode};
///
/// let err = OnboardingError::new(OnboardingErrorCode::InvalidSlug, "   ");
/// assert_eq!(err.code(), OnboardingErrorCode::InvalidSlug);
/// assert!(!err.message().trim().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct OnboardingError {
    code: OnboardingErrorCode,
    message: String,
}

impl OnboardingError {
    /// Build an error with a call-site specific message.
    pub fn new(code: OnboardingErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.default_message().to_owned()
        } else {
            message
        };
        Self { code, message }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> OnboardingErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl From<OnboardingErrorCode> for OnboardingError {
    fn from(code: OnboardingErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_owned(),
        }
    }
}

/// Result alias for onboarding operations.
pub type OnboardingResult<T> = Result<T, OnboardingError>;
