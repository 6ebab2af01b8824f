//! Argument model for the `onboarding` binary.

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;

use crate::domain::{
    AuthMethod, BrokerageLicenseInput, DeveloperCodeInput, DeveloperLinkInput,
    EmployeeInviteInput, LicenseStatus, MembershipRole, OrgType, RealtorLicenseInput,
    TenantInput, UserRole,
};

/// `onboarding` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "onboarding",
    about = "Walk an account through Stella onboarding against a local JSON store",
    version
)]
pub struct CliArgs {
    /// Store directory. Overrides `ONBOARDING_DATA_DIR`.
    #[arg(long = "data-dir", value_name = "dir", global = true)]
    pub data_dir: Option<Utf8PathBuf>,
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// One onboarding operation.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create the session account.
    Signup(SignupArgs),
    /// Choose the onboarding path.
    SelectRole {
        /// One of `realtor`, `brokerage`, `developer`, `employee`.
        #[arg(value_parser = parse_wire::<UserRole>)]
        role: UserRole,
    },
    /// Save the realtor CRECI license.
    RealtorLicense(RealtorLicenseArgs),
    /// Save the brokerage license.
    BrokerageLicense(BrokerageLicenseArgs),
    /// Link the developer to a broker or partner brokerage.
    DeveloperLink(DeveloperLinkArgs),
    /// Record a review outcome on the saved license.
    ReviewLicense {
        /// One of `missing`, `pending`, `unverified`, `verified`, `rejected`.
        #[arg(value_parser = parse_wire::<LicenseStatus>)]
        status: LicenseStatus,
    },
    /// Employee invites.
    #[command(subcommand)]
    Invite(InviteCommand),
    /// Developer sandbox codes.
    #[command(subcommand)]
    DevCode(DevCodeCommand),
    /// Tenant sites.
    #[command(subcommand)]
    Tenant(TenantCommand),
    /// Show the builder access gate.
    Gate,
    /// Show the session aggregate.
    State,
    /// Clear the session aggregate, keeping shared registries.
    Reset,
}

/// `signup` arguments.
#[derive(Debug, Clone, Args)]
pub struct SignupArgs {
    /// Full name.
    #[arg(long, default_value = "")]
    pub name: String,
    /// Email address.
    #[arg(long, default_value = "")]
    pub email: String,
    /// Password: at least 8 characters with letters and digits.
    #[arg(long, default_value = "")]
    pub password: String,
    /// Accept the terms of use.
    #[arg(long = "accept-terms")]
    pub accept_terms: bool,
    /// Sign-up channel recorded on the account.
    #[arg(
        long = "auth-method",
        value_name = "method",
        default_value = "email",
        value_parser = parse_wire::<AuthMethod>
    )]
    pub auth_method: AuthMethod,
}

/// `realtor-license` arguments.
#[derive(Debug, Clone, Args)]
pub struct RealtorLicenseArgs {
    /// CRECI number.
    #[arg(long)]
    pub creci: Option<String>,
    /// CRECI state code.
    #[arg(long)]
    pub uf: Option<String>,
    /// Name on the license. Defaults to the account name.
    #[arg(long = "creci-name")]
    pub creci_name: Option<String>,
    /// Provide the license later.
    #[arg(long, conflicts_with_all = ["creci", "uf", "creci_name"])]
    pub defer: bool,
}

impl RealtorLicenseArgs {
    /// Service input for these arguments.
    #[must_use]
    pub fn to_input(&self) -> RealtorLicenseInput {
        RealtorLicenseInput {
            creci_number: self.creci.clone(),
            uf: self.uf.clone(),
            creci_name: self.creci_name.clone(),
            deferred: self.defer,
        }
    }
}

/// `brokerage-license` arguments.
#[derive(Debug, Clone, Args)]
pub struct BrokerageLicenseArgs {
    /// Registered company name.
    #[arg(long = "legal-name", default_value = "")]
    pub legal_name: String,
    /// CNPJ, punctuation optional.
    #[arg(long, default_value = "")]
    pub cnpj: String,
    /// Legal-entity CRECI number.
    #[arg(long, default_value = "")]
    pub creci: String,
    /// CRECI state code.
    #[arg(long, default_value = "")]
    pub uf: String,
    /// Responsible broker CRECI.
    #[arg(long = "responsible-creci", default_value = "")]
    pub responsible_creci: String,
}

impl BrokerageLicenseArgs {
    /// Service input for these arguments.
    #[must_use]
    pub fn to_input(&self) -> BrokerageLicenseInput {
        BrokerageLicenseInput {
            legal_name: self.legal_name.clone(),
            cnpj: self.cnpj.clone(),
            creci_number: self.creci.clone(),
            uf: self.uf.clone(),
            responsible_creci: self.responsible_creci.clone(),
        }
    }
}

/// `developer-link` arguments.
///
/// `--partner-name` (with an optional `--partner-id`) selects a partner
/// link, `--defer` postpones linking, anything else is a CRECI link.
#[derive(Debug, Clone, Args)]
pub struct DeveloperLinkArgs {
    /// Responsible broker CRECI.
    #[arg(
        long = "responsible-creci",
        conflicts_with_all = ["partner_name", "partner_id", "defer"]
    )]
    pub responsible_creci: Option<String>,
    /// Partner brokerage name.
    #[arg(long = "partner-name", conflicts_with = "defer")]
    pub partner_name: Option<String>,
    /// Partner brokerage reference. Generated when omitted.
    #[arg(long = "partner-id", conflicts_with = "defer")]
    pub partner_id: Option<String>,
    /// Link later.
    #[arg(long)]
    pub defer: bool,
}

impl DeveloperLinkArgs {
    /// Service input for these arguments.
    #[must_use]
    pub fn to_input(&self) -> DeveloperLinkInput {
        if self.defer {
            return DeveloperLinkInput::Defer;
        }
        if self.partner_name.is_some() || self.partner_id.is_some() {
            return DeveloperLinkInput::Partner {
                partner_org_id: self.partner_id.clone().unwrap_or_default(),
                partner_org_name: self.partner_name.clone().unwrap_or_default(),
            };
        }
        DeveloperLinkInput::Creci {
            responsible_creci: self.responsible_creci.clone().unwrap_or_default(),
        }
    }
}

/// `invite` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum InviteCommand {
    /// Issue an employee invite.
    Create(InviteCreateArgs),
    /// Redeem an employee invite for the session account.
    Redeem {
        /// Invite code, case-insensitive.
        code: String,
    },
    /// List the invite directory.
    List,
}

/// `invite create` arguments.
#[derive(Debug, Clone, Args)]
pub struct InviteCreateArgs {
    /// Recipient email.
    #[arg(long, default_value = "")]
    pub email: String,
    /// Employer organisation name.
    #[arg(long = "org-name", default_value = "")]
    pub org_name: String,
    /// Employer organisation type.
    #[arg(long = "org-type", value_parser = parse_wire::<OrgType>)]
    pub org_type: Option<OrgType>,
    /// Role granted on redemption.
    #[arg(long, default_value = "agent", value_parser = parse_wire::<MembershipRole>)]
    pub role: MembershipRole,
    /// Use limit.
    #[arg(long = "max-uses")]
    pub max_uses: Option<u32>,
    /// Expiry as an RFC 3339 timestamp.
    #[arg(long = "expires-at", value_parser = parse_timestamp)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Free-form note.
    #[arg(long)]
    pub note: Option<String>,
}

impl InviteCreateArgs {
    /// Service input for these arguments.
    #[must_use]
    pub fn to_input(&self) -> EmployeeInviteInput {
        EmployeeInviteInput {
            email: self.email.clone(),
            org_name: self.org_name.clone(),
            org_type: self.org_type,
            role: self.role,
            max_uses: self.max_uses,
            expires_at: self.expires_at,
            note: self.note.clone(),
        }
    }
}

/// `dev-code` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum DevCodeCommand {
    /// Issue a developer sandbox code.
    Create(DevCodeCreateArgs),
    /// Redeem a developer sandbox code for the session account.
    Redeem {
        /// Code, case-insensitive.
        code: String,
    },
}

/// `dev-code create` arguments.
#[derive(Debug, Clone, Args)]
pub struct DevCodeCreateArgs {
    /// Email allowed to redeem the code.
    #[arg(long, default_value = "")]
    pub email: String,
    /// Onboarding path assigned on redemption.
    #[arg(long, value_parser = parse_wire::<UserRole>)]
    pub role: Option<UserRole>,
    /// Sandbox organisation name.
    #[arg(long)]
    pub label: Option<String>,
    /// Use limit.
    #[arg(long = "max-uses")]
    pub max_uses: Option<u32>,
    /// Expiry as an RFC 3339 timestamp.
    #[arg(long = "expires-at", value_parser = parse_timestamp)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Free-form note.
    #[arg(long)]
    pub note: Option<String>,
}

impl DevCodeCreateArgs {
    /// Service input for these arguments.
    #[must_use]
    pub fn to_input(&self) -> DeveloperCodeInput {
        DeveloperCodeInput {
            email: self.email.clone(),
            role: self.role,
            label: self.label.clone(),
            max_uses: self.max_uses,
            expires_at: self.expires_at,
            note: self.note.clone(),
        }
    }
}

/// `tenant` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum TenantCommand {
    /// Create or update the session's tenant site.
    Create(TenantCreateArgs),
}

/// `tenant create` arguments.
#[derive(Debug, Clone, Args)]
pub struct TenantCreateArgs {
    /// Site name.
    #[arg(long, default_value = "")]
    pub name: String,
    /// Requested slug; normalised before validation.
    #[arg(long, default_value = "")]
    pub slug: String,
    /// Logo URL.
    #[arg(long = "logo-url")]
    pub logo_url: Option<String>,
    /// Favicon URL.
    #[arg(long = "favicon-url")]
    pub favicon_url: Option<String>,
}

impl TenantCreateArgs {
    /// Service input for these arguments.
    #[must_use]
    pub fn to_input(&self) -> TenantInput {
        TenantInput {
            name: self.name.clone(),
            slug: self.slug.clone(),
            logo_url: self.logo_url.clone(),
            favicon_url: self.favicon_url.clone(),
        }
    }
}

/// Parse a snake_case wire value into a domain enum.
fn parse_wire<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let wire = raw.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(wire))
        .map_err(|_| format!("unrecognised value '{raw}'"))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|error| format!("expected an RFC 3339 timestamp: {error}"))
}
