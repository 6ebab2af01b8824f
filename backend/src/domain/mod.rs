//! Onboarding domain: entities, validation, the onboarding service and ports.
//!
//! Purpose: turn a fresh account into an authorised tenant by walking it
//! through role selection, license or invite validation and tenant
//! provisioning, and derive the builder access gate from the result.
//!
//! Public surface:
//! - [`OnboardingService`]: the driving port; one instance per session.
//! - [`OnboardingState`]: the persisted aggregate.
//! - [`compute_gate`]: pure builder access calculation.
//! - [`OnboardingError`] / [`OnboardingErrorCode`]: the single failure kind.
//!
//! The domain never logs; it reports through [`ports::TelemetrySink`].

pub mod account;
pub mod cnpj;
pub mod error;
pub mod events;
pub mod gate;
pub mod ids;
pub mod invite;
pub mod license;
pub mod onboarding;
pub mod organization;
pub mod ports;
pub mod slug;
pub mod state;
pub mod tenant;

pub use self::account::{
    AccountProfile, AccountRegistration, AuthMethod, PASSWORD_MIN_LEN, is_valid_email,
    normalize_email,
};
pub use self::cnpj::{is_valid_cnpj, sanitize_cnpj};
pub use self::error::{OnboardingError, OnboardingErrorCode, OnboardingResult};
pub use self::events::{DomainKind, TelemetryEvent};
pub use self::gate::{BuilderGate, BuilderMode, compute_gate};
pub use self::ids::{AccountId, IdValidationError, MembershipId, OrgId, TenantId};
pub use self::invite::{
    DeveloperCodeInput, EmployeeInviteInput, InviteCategory, InviteCode, InviteRedemption,
    InviteTemplate, default_invites,
};
pub use self::license::{
    BrokerageLicense, BrokerageLicenseInput, DeveloperLink, DeveloperLinkInput,
    DeveloperLinkType, LicenseRecord, RealtorLicense, RealtorLicenseInput,
};
pub use self::onboarding::{
    DeveloperCodeRedemption, OnboardingPolicy, OnboardingPorts, OnboardingService,
};
pub use self::organization::{
    CreciType, LicenseStatus, MembershipRecord, MembershipRole, MembershipStatus, OrgProfile,
    OrgType, UserRole,
};
pub use self::slug::{TenantSlug, is_valid_slug, normalize_slug};
pub use self::state::OnboardingState;
pub use self::tenant::{TenantInput, TenantProfile};
