//! Identifiers for onboarding entities.
//!
//! Identifiers are opaque strings. Generated values take the form
//! `<prefix>_<uuid>` where the UUID bits come from the injected
//! [`RandomSource`], so tests can predict them exactly.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

use crate::domain::ports::RandomSource;

/// Validation errors returned by identifier constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdValidationError {
    /// The identifier was empty.
    Empty,
    /// The identifier contained whitespace.
    ContainsWhitespace,
}

impl fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier must not be empty"),
            Self::ContainsWhitespace => write!(f, "identifier must not contain whitespace"),
        }
    }
}

impl std::error::Error for IdValidationError {}

/// Draw a v4 UUID from the random source.
pub(crate) fn random_uuid(random: &dyn RandomSource) -> Uuid {
    Builder::from_random_bytes(random.bits().to_be_bytes()).into_uuid()
}

fn validate_raw(raw: &str) -> Result<(), IdValidationError> {
    if raw.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(IdValidationError::ContainsWhitespace);
    }
    Ok(())
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Prefix used for generated identifiers.
            pub const PREFIX: &'static str = $prefix;

            /// Validate and wrap an existing identifier.
            pub fn new(raw: impl Into<String>) -> Result<Self, IdValidationError> {
                let raw = raw.into();
                validate_raw(&raw)?;
                Ok(Self(raw))
            }

            /// Generate a fresh identifier with the default prefix.
            #[must_use]
            pub fn generate(random: &dyn RandomSource) -> Self {
                Self::generate_with_prefix(random, Self::PREFIX)
            }

            pub(crate) fn generate_with_prefix(random: &dyn RandomSource, prefix: &str) -> Self {
                Self(format!("{prefix}_{}", random_uuid(random)))
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_entity_id! {
    /// Identifier of an [`AccountProfile`](crate::domain::AccountProfile).
    AccountId => "usr"
}

define_entity_id! {
    /// Identifier of an [`OrgProfile`](crate::domain::OrgProfile).
    OrgId => "org"
}

define_entity_id! {
    /// Identifier of a [`MembershipRecord`](crate::domain::MembershipRecord).
    MembershipId => "mem"
}

define_entity_id! {
    /// Identifier of a [`TenantProfile`](crate::domain::TenantProfile).
    TenantId => "tenant"
}

impl OrgId {
    /// Prefix for partner brokerages linked by developers.
    pub const PARTNER_PREFIX: &'static str = "org_partner";
    /// Prefix for sandbox organisations issued through developer codes.
    pub const DEVELOPER_PREFIX: &'static str = "dev_org";
}
