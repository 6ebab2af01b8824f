//! Behaviour tests for the onboarding paths and the builder gate.
//!
//! Scenarios share one in-memory registry per world so several sessions can
//! compete for emails, slugs and invite uses.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use onboarding::domain::{
    BrokerageLicenseInput, DeveloperCodeInput, DeveloperLinkInput, EmployeeInviteInput,
    LicenseStatus, MembershipRole, OnboardingError, OnboardingErrorCode, OnboardingPolicy,
    RealtorLicenseInput, TenantInput, UserRole,
};
use onboarding::outbound::persistence::MemoryRegistry;
use onboarding::test_support::session::SessionHarness;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde::de::DeserializeOwned;

struct OnboardingWorld {
    registry: RefCell<Arc<MemoryRegistry>>,
    policy: Cell<OnboardingPolicy>,
    session: RefCell<Option<SessionHarness>>,
    invite_code: RefCell<Option<String>>,
    outcome: RefCell<Option<Result<(), OnboardingError>>>,
}

impl OnboardingWorld {
    fn new() -> Self {
        Self {
            registry: RefCell::new(Arc::new(MemoryRegistry::default())),
            policy: Cell::new(OnboardingPolicy::default()),
            session: RefCell::new(None),
            invite_code: RefCell::new(None),
            outcome: RefCell::new(None),
        }
    }

    fn open_session(&self) -> SessionHarness {
        SessionHarness::open(self.registry.borrow().clone(), self.policy.get())
    }

    fn start_session(&self, role: Option<UserRole>, email: &str) {
        let mut session = self.open_session();
        let name = email.split('@').next().unwrap_or("Conta");
        match role {
            Some(role) => session.sign_up_as(role, name, email),
            None => session.sign_up(name, email),
        };
        *self.session.borrow_mut() = Some(session);
    }

    fn with_session<T>(&self, f: impl FnOnce(&mut SessionHarness) -> T) -> T {
        let mut session = self.session.borrow_mut();
        f(session.as_mut().expect("a session should be signed up"))
    }

    fn record<T>(&self, result: Result<T, OnboardingError>) {
        *self.outcome.borrow_mut() = Some(result.map(|_| ()));
    }

    fn redeem_invite(&self) {
        let code = self.invite_code();
        let result = self.with_session(|session| session.service.redeem_invite(&code));
        self.record(result);
    }

    fn invite_code(&self) -> String {
        self.invite_code
            .borrow()
            .clone()
            .expect("an invite should be issued")
    }
}

fn parse_wire<T: DeserializeOwned>(raw: &str) -> T {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_owned()))
        .unwrap_or_else(|error| panic!("unrecognised value '{raw}': {error}"))
}

#[fixture]
fn world() -> OnboardingWorld {
    OnboardingWorld::new()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("a fresh onboarding registry")]
fn a_fresh_onboarding_registry(world: &OnboardingWorld) {
    *world.registry.borrow_mut() = Arc::new(MemoryRegistry::default());
    *world.session.borrow_mut() = None;
}

#[given("developer codes are enabled")]
fn developer_codes_are_enabled(world: &OnboardingWorld) {
    world.policy.set(OnboardingPolicy::with_developer_codes());
}

#[given("a signed-up {role} with email {email}")]
fn a_signed_up_account_with_role(world: &OnboardingWorld, role: String, email: String) {
    world.start_session(Some(parse_wire(&role)), email.trim());
}

#[given("a new account with email {email}")]
fn a_new_account(world: &OnboardingWorld, email: String) {
    world.start_session(None, email.trim());
}

#[given("an employee invite for {email} with role {role}")]
fn an_employee_invite(world: &OnboardingWorld, email: String, role: String) {
    let issuer = world.open_session();
    let invite = issuer
        .service
        .create_employee_invite(&EmployeeInviteInput {
            email: email.trim().to_owned(),
            org_name: "Imobiliária Horizonte".to_owned(),
            org_type: None,
            role: parse_wire::<MembershipRole>(&role),
            max_uses: Some(1),
            expires_at: None,
            note: None,
        })
        .expect("invite issued");
    *world.invite_code.borrow_mut() = Some(invite.code.as_str().to_owned());
}

#[given("a developer code for {email} assigning {role}")]
fn a_developer_code(world: &OnboardingWorld, email: String, role: String) {
    let issuer = world.open_session();
    let code = issuer
        .service
        .create_developer_code(&DeveloperCodeInput {
            email: email.trim().to_owned(),
            role: Some(parse_wire(&role)),
            ..DeveloperCodeInput::default()
        })
        .expect("developer code issued");
    *world.invite_code.borrow_mut() = Some(code.code.as_str().to_owned());
}

#[given("the realtor license {creci} from {uf} is saved")]
fn the_realtor_license_is_saved(world: &OnboardingWorld, creci: String, uf: String) {
    world
        .with_session(|session| {
            session.service.save_realtor_license(&RealtorLicenseInput {
                creci_number: Some(creci),
                uf: Some(uf),
                ..RealtorLicenseInput::default()
            })
        })
        .expect("realtor license saved");
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the brokerage license is saved with CNPJ {cnpj}")]
fn the_brokerage_license_is_saved(world: &OnboardingWorld, cnpj: String) {
    let result = world.with_session(|session| {
        session.service.save_brokerage_license(&BrokerageLicenseInput {
            legal_name: "Acme".to_owned(),
            cnpj,
            creci_number: "123-J".to_owned(),
            uf: "sp".to_owned(),
            responsible_creci: "456-f".to_owned(),
        })
    });
    world.record(result);
}

#[when("the invite is redeemed")]
fn the_invite_is_redeemed(world: &OnboardingWorld) {
    world.redeem_invite();
}

#[when("another employee {email} redeems the invite")]
fn another_employee_redeems(world: &OnboardingWorld, email: String) {
    world.start_session(Some(UserRole::Employee), email.trim());
    world.redeem_invite();
}

#[when("the developer links partner brokerage {name}")]
fn the_developer_links_partner(world: &OnboardingWorld, name: String) {
    let result = world.with_session(|session| {
        session
            .service
            .save_developer_link(&DeveloperLinkInput::Partner {
                partner_org_id: String::new(),
                partner_org_name: name,
            })
    });
    world.record(result);
}

#[when("the license is reviewed as {status}")]
fn the_license_is_reviewed(world: &OnboardingWorld, status: String) {
    let status: LicenseStatus = parse_wire(&status);
    let result = world.with_session(|session| session.service.review_license(status));
    world.record(result);
}

#[when("a tenant is created with slug {slug}")]
fn a_tenant_is_created(world: &OnboardingWorld, slug: String) {
    let result = world.with_session(|session| {
        session
            .service
            .create_tenant(&TenantInput::new("Minha Imobiliária", slug))
    });
    world.record(result);
}

#[when("a developer code is requested for {email}")]
fn a_developer_code_is_requested(world: &OnboardingWorld, email: String) {
    let result = world.with_session(|session| {
        session
            .service
            .create_developer_code(&DeveloperCodeInput {
                email: email.trim().to_owned(),
                ..DeveloperCodeInput::default()
            })
    });
    world.record(result);
}

#[when("the developer code is redeemed")]
fn the_developer_code_is_redeemed(world: &OnboardingWorld) {
    let code = world.invite_code();
    let result = world.with_session(|session| session.service.redeem_developer_code(&code));
    world.record(result);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the operation succeeds")]
fn the_operation_succeeds(world: &OnboardingWorld) {
    let outcome = world.outcome.borrow();
    if let Some(Err(error)) = outcome.as_ref() {
        panic!("expected success, got {:?}: {error}", error.code());
    }
    assert!(outcome.is_some(), "no operation ran");
}

#[then("the operation fails with {code}")]
fn the_operation_fails_with(world: &OnboardingWorld, code: String) {
    let expected: OnboardingErrorCode = parse_wire(&code);
    let outcome = world.outcome.borrow();
    match outcome.as_ref().expect("an operation should have run") {
        Ok(()) => panic!("expected {expected}, got success"),
        Err(error) => assert_eq!(error.code(), expected),
    }
}

#[then("the builder gate is {mode}")]
fn the_builder_gate_is(world: &OnboardingWorld, mode: String) {
    let actual = world.with_session(|session| session.service.gate().mode);
    assert_eq!(actual.as_str(), mode.trim());
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/onboarding.feature",
    name = "Brokerage with a repeated-digit CNPJ is rejected"
)]
fn repeated_digit_cnpj_is_rejected(world: OnboardingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/onboarding.feature",
    name = "Valid brokerage license unlocks the builder"
)]
fn valid_brokerage_license_unlocks_the_builder(world: OnboardingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/onboarding.feature",
    name = "Single-use employee invite admits only its bound account"
)]
fn single_use_invite_admits_one_account(world: OnboardingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/onboarding.feature",
    name = "Viewer invites keep the builder locked"
)]
fn viewer_invites_keep_the_builder_locked(world: OnboardingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/onboarding.feature",
    name = "Developer builder follows the broker link review"
)]
fn developer_builder_follows_link_review(world: OnboardingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/onboarding.feature",
    name = "Tenant slug with uppercase and punctuation is rejected"
)]
fn invalid_tenant_slug_is_rejected(world: OnboardingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/onboarding.feature",
    name = "Tenant slug is allocated once"
)]
fn tenant_slug_is_allocated_once(world: OnboardingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/onboarding.feature",
    name = "Developer codes are disabled by default"
)]
fn developer_codes_are_disabled_by_default(world: OnboardingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/onboarding.feature",
    name = "Developer code grants a sandbox override"
)]
fn developer_code_grants_a_sandbox_override(world: OnboardingWorld) {
    let _ = world;
}
