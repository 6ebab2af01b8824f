//! Tenant slug normalisation and validation.
//!
//! Slugs are 3 to 63 characters of lowercase ASCII letters, digits and
//! hyphens, with no leading, trailing or doubled hyphen.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{OnboardingError, OnboardingErrorCode};

/// Shortest accepted slug.
pub const SLUG_MIN_LEN: usize = 3;
/// Longest accepted slug (one DNS label).
pub const SLUG_MAX_LEN: usize = 63;

/// Trim and lower-case raw slug input.
#[must_use]
pub fn normalize_slug(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Return `true` when `value` is a valid, already normalised slug.
///
/// # Examples
/// ```
/// use onboarding::domain::is_valid_slug;
///
/// assert!(is_valid_slug("minha-casa"));
/// assert!(!is_valid_slug("minha--casa"));
/// assert!(!is_valid_slug("Minha Casa!"));
/// ```
#[must_use]
pub fn is_valid_slug(value: &str) -> bool {
    has_allowed_length(value)
        && has_allowed_slug_chars(value)
        && has_alphanumeric_edges(value)
        && !value.contains("--")
}

fn has_allowed_length(value: &str) -> bool {
    (SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&value.len())
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

fn has_alphanumeric_edges(value: &str) -> bool {
    !value.starts_with('-') && !value.ends_with('-')
}

/// Normalised, validated tenant slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantSlug(String);

impl TenantSlug {
    /// Normalise and validate raw input.
    pub fn parse(raw: &str) -> Result<Self, OnboardingError> {
        let slug = normalize_slug(raw);
        if is_valid_slug(&slug) {
            Ok(Self(slug))
        } else {
            Err(OnboardingErrorCode::InvalidSlug.into())
        }
    }

    /// Borrow the slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Default public route on the shared hosting domain.
    #[must_use]
    pub fn default_route(&self) -> String {
        format!("https://{}.stella-real-estate.vercel.app/", self.0)
    }

    /// Path-based fallback route.
    #[must_use]
    pub fn path_fallback(&self) -> String {
        format!("/t/{}", self.0)
    }
}

impl AsRef<str> for TenantSlug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TenantSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TenantSlug> for String {
    fn from(value: TenantSlug) -> Self {
        value.0
    }
}

impl TryFrom<String> for TenantSlug {
    type Error = OnboardingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
