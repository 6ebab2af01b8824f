//! Account identity for an onboarding session.
//!
//! An account is created once per session from an [`AccountRegistration`].
//! The password is only checked for strength; it is never stored.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::error::{OnboardingError, OnboardingErrorCode, OnboardingResult};
use crate::domain::ids::AccountId;

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// How the account authenticated when it signed up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Email and password.
    #[default]
    Email,
    /// Google sign-in.
    Google,
    /// Apple sign-in.
    Apple,
    /// Facebook sign-in.
    Facebook,
    /// X sign-in.
    X,
}

impl AuthMethod {
    /// Wire representation of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Google => "google",
            Self::Apple => "apple",
            Self::Facebook => "facebook",
            Self::X => "x",
        }
    }
}

/// Identity record created at signup.
///
/// ## Invariants
/// - `email` is trimmed and lower-cased.
/// - `full_name` is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    /// Account identifier.
    pub id: AccountId,
    /// Trimmed full name.
    pub full_name: String,
    /// Normalised email.
    pub email: String,
    /// Signup time.
    pub created_at: DateTime<Utc>,
    /// Whether the terms of use were accepted.
    pub consent: bool,
    /// Authentication method used at signup.
    #[serde(rename = "authProvider")]
    pub auth_method: AuthMethod,
}

/// Raw signup input.
#[derive(Clone)]
pub struct AccountRegistration {
    /// Full name as typed.
    pub full_name: String,
    /// Email as typed.
    pub email: String,
    /// Password, wiped on drop.
    pub password: Zeroizing<String>,
    /// Acceptance of the terms of use.
    pub consent: bool,
    /// Authentication method.
    pub auth_method: AuthMethod,
}

impl AccountRegistration {
    /// Build an email/password registration.
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        consent: bool,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password: Zeroizing::new(password.into()),
            consent,
            auth_method: AuthMethod::Email,
        }
    }

    /// Override the authentication method.
    #[must_use]
    pub fn with_auth_method(mut self, auth_method: AuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }
}

impl fmt::Debug for AccountRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRegistration")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("consent", &self.consent)
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

/// Registration fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedRegistration {
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) auth_method: AuthMethod,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Trim and lower-case an email for comparisons and storage.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Return `true` when `email` looks like `local@domain.tld`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub(crate) fn validate_email(email: &str) -> OnboardingResult<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(OnboardingErrorCode::InvalidEmail.into())
    }
}

pub(crate) fn validate_password(password: &str) -> OnboardingResult<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(OnboardingError::new(
            OnboardingErrorCode::WeakPassword,
            format!("The password must be at least {PASSWORD_MIN_LEN} characters long."),
        ));
    }
    let has_letter = password.chars().any(|ch| ch.is_ascii_alphabetic());
    let has_digit = password.chars().any(|ch| ch.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(OnboardingError::new(
            OnboardingErrorCode::WeakPassword,
            "Use letters and numbers in your password.",
        ));
    }
    Ok(())
}

/// Validate signup input in the order consent, name, email, password.
///
/// Email uniqueness is checked later against the shared registry.
pub(crate) fn validate_registration(
    registration: &AccountRegistration,
) -> OnboardingResult<ValidatedRegistration> {
    if !registration.consent {
        return Err(OnboardingErrorCode::MissingConsent.into());
    }
    let full_name = registration.full_name.trim();
    if full_name.is_empty() {
        return Err(OnboardingErrorCode::InvalidName.into());
    }
    let email = normalize_email(&registration.email);
    validate_email(&email)?;
    validate_password(registration.password.as_str())?;
    Ok(ValidatedRegistration {
        full_name: full_name.to_owned(),
        email,
        auth_method: registration.auth_method,
    })
}
