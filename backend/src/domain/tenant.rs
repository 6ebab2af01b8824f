//! Provisioned tenant sites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{OrgId, TenantId};
use crate::domain::slug::TenantSlug;

/// Independently addressable site owned by an organisation.
///
/// ## Invariants
/// - `slug` is globally unique and never changes once allocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfile {
    /// Tenant identifier.
    pub id: TenantId,
    /// Owning organisation.
    pub org_id: OrgId,
    /// Site display name.
    pub name: String,
    /// Unique slug.
    pub slug: TenantSlug,
    /// Public route on the shared hosting domain.
    pub default_route: String,
    /// Path-based fallback route.
    #[serde(default)]
    pub path_fallback: Option<String>,
    /// Custom domain, when one has been attached.
    #[serde(default)]
    pub primary_domain: Option<String>,
    /// Logo asset reference.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Favicon asset reference.
    #[serde(default)]
    pub favicon_url: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Input for provisioning a tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantInput {
    /// Site display name.
    pub name: String,
    /// Requested slug, normalised before validation.
    pub slug: String,
    /// Logo asset reference.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Favicon asset reference.
    #[serde(default)]
    pub favicon_url: Option<String>,
}

impl TenantInput {
    /// Input with a name and slug only.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            ..Self::default()
        }
    }
}
