//! Command-line adapter for the `onboarding` binary.
//!
//! Arguments are parsed with `clap` into [`CliArgs`]; [`run`] opens a session
//! on the JSON file store, drives one [`OnboardingService`] operation and
//! returns its result as JSON. Domain rejections become [`CliError::Domain`],
//! which the binary renders as an `{"error": {...}}` document.
//!
//! [`OnboardingService`]: crate::domain::OnboardingService

mod args;
mod dispatch;
mod error;

pub use self::args::{
    BrokerageLicenseArgs, CliArgs, Command, DevCodeCommand, DevCodeCreateArgs,
    DeveloperLinkArgs, InviteCommand, InviteCreateArgs, RealtorLicenseArgs, SignupArgs,
    TenantCommand, TenantCreateArgs,
};
pub use self::dispatch::{execute, open_session, run};
pub use self::error::CliError;
