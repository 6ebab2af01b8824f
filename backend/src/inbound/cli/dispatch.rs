//! Command dispatch: open a session on the JSON store and run one operation.

use std::sync::Arc;

use mockable::DefaultClock;
use serde_json::{Value, json};
use tracing::debug;
use zeroize::Zeroizing;

use super::args::{CliArgs, Command, DevCodeCommand, InviteCommand, SignupArgs, TenantCommand};
use super::error::CliError;
use crate::config::OnboardingSettings;
use crate::domain::{AccountRegistration, OnboardingPorts, OnboardingService};
use crate::outbound::persistence::JsonFileStore;
use crate::outbound::random::ThreadRandomSource;
use crate::outbound::telemetry::TracingTelemetrySink;

/// Open the store named by `args` and `settings`, run the command and return
/// its JSON result.
pub fn run(args: &CliArgs, settings: &OnboardingSettings) -> Result<Value, CliError> {
    let mut service = open_session(args, settings)?;
    execute(&mut service, &args.command)
}

/// Open a session on the JSON file store.
///
/// `--data-dir` wins over the configured directory.
pub fn open_session(
    args: &CliArgs,
    settings: &OnboardingSettings,
) -> Result<OnboardingService, CliError> {
    let root = args.data_dir.clone().unwrap_or_else(|| settings.data_dir());
    let store = Arc::new(JsonFileStore::open_with_seed(
        &root,
        settings.invite_seed_path(),
    )?);
    debug!(root = %root, "opened onboarding session");
    let ports = OnboardingPorts {
        store: store.clone(),
        registry: store,
        telemetry: Arc::new(TracingTelemetrySink),
        random: Arc::new(ThreadRandomSource),
        clock: Arc::new(DefaultClock),
    };
    Ok(OnboardingService::new(ports, settings.policy()))
}

/// Run `command` against an open session.
pub fn execute(service: &mut OnboardingService, command: &Command) -> Result<Value, CliError> {
    let output = match command {
        Command::Signup(signup) => {
            serde_json::to_value(service.create_account(&registration(signup))?)?
        }
        Command::SelectRole { role } => {
            service.select_role(*role)?;
            json!({ "role": role, "gate": service.gate() })
        }
        Command::RealtorLicense(license) => {
            serde_json::to_value(service.save_realtor_license(&license.to_input())?)?
        }
        Command::BrokerageLicense(license) => {
            serde_json::to_value(service.save_brokerage_license(&license.to_input())?)?
        }
        Command::DeveloperLink(link) => {
            serde_json::to_value(service.save_developer_link(&link.to_input())?)?
        }
        Command::ReviewLicense { status } => {
            serde_json::to_value(service.review_license(*status)?)?
        }
        Command::Invite(InviteCommand::Create(create)) => {
            serde_json::to_value(service.create_employee_invite(&create.to_input())?)?
        }
        Command::Invite(InviteCommand::Redeem { code }) => {
            serde_json::to_value(service.redeem_invite(code)?)?
        }
        Command::Invite(InviteCommand::List) => serde_json::to_value(service.invite_directory())?,
        Command::DevCode(DevCodeCommand::Create(create)) => {
            serde_json::to_value(service.create_developer_code(&create.to_input())?)?
        }
        Command::DevCode(DevCodeCommand::Redeem { code }) => {
            serde_json::to_value(service.redeem_developer_code(code)?)?
        }
        Command::Tenant(TenantCommand::Create(create)) => {
            serde_json::to_value(service.create_tenant(&create.to_input())?)?
        }
        Command::Gate => serde_json::to_value(service.gate())?,
        Command::State => serde_json::to_value(service.state())?,
        Command::Reset => {
            service.reset_onboarding();
            json!({ "reset": true })
        }
    };
    Ok(output)
}

fn registration(args: &SignupArgs) -> AccountRegistration {
    AccountRegistration {
        full_name: args.name.clone(),
        email: args.email.clone(),
        password: Zeroizing::new(args.password.clone()),
        consent: args.accept_terms,
        auth_method: args.auth_method,
    }
}

#[cfg(test)]
mod tests {
    //! Dispatch tests against in-memory sessions.

    use clap::Parser;
    use rstest::rstest;

    use super::*;
    use crate::domain::{OnboardingErrorCode, UserRole};
    use crate::test_support::session::SessionHarness;

    fn command(args: &[&str]) -> Command {
        CliArgs::try_parse_from(std::iter::once("onboarding").chain(args.iter().copied()))
            .expect("arguments should parse")
            .command
    }

    #[rstest]
    fn signup_returns_the_account_profile() {
        let mut harness = SessionHarness::fresh();
        let output = execute(
            &mut harness.service,
            &command(&[
                "signup",
                "--name",
                "Ana Souza",
                "--email",
                "Ana@Example.com",
                "--password",
                "segredo123",
                "--accept-terms",
            ]),
        )
        .expect("signup succeeds");

        assert_eq!(output["email"], "ana@example.com");
        assert_eq!(output["authProvider"], "email");
        assert!(output.get("password").is_none());
    }

    #[rstest]
    fn rejected_operations_surface_the_domain_error() {
        let mut harness = SessionHarness::fresh();
        let error = execute(&mut harness.service, &command(&["select-role", "realtor"]))
            .expect_err("no account yet");

        let CliError::Domain(domain) = &error else {
            panic!("expected a domain error, got {error:?}");
        };
        assert_eq!(domain.code(), OnboardingErrorCode::MissingAccount);
        assert!(error.to_document().is_some());
    }

    #[rstest]
    fn select_role_reports_the_gate() {
        let mut harness = SessionHarness::fresh();
        harness.sign_up("Ana Souza", "ana@example.com");

        let output = execute(&mut harness.service, &command(&["select-role", "developer"]))
            .expect("role selected");

        assert_eq!(output["role"], "developer");
        assert_eq!(output["gate"]["mode"], "locked");
        assert_eq!(harness.service.state().role, Some(UserRole::Developer));
    }

    #[rstest]
    fn reset_clears_the_session() {
        let mut harness = SessionHarness::fresh();
        harness.sign_up_as(UserRole::Realtor, "Ana Souza", "ana@example.com");

        let output = execute(&mut harness.service, &Command::Reset).expect("reset");

        assert_eq!(output, json!({ "reset": true }));
        assert!(harness.service.state().is_empty());
    }
}
