//! Behaviour of the JSON file store across process-like reopen cycles.
//!
//! Every test works in its own temporary directory and reopens the store to
//! observe what reached disk.

use std::sync::{Arc, Barrier};
use std::thread;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Duration;
use mockable::DefaultClock;
use onboarding::domain::ports::{
    FixtureRandomSource, NoOpTelemetrySink, OnboardingRegistry, SessionStateStore,
};
use onboarding::domain::{
    AccountRegistration, InviteCategory, InviteCode, InviteTemplate, MembershipRole,
    OnboardingErrorCode, OnboardingPolicy, OnboardingPorts, OnboardingService, OnboardingState,
    OrgId, OrgType, UserRole,
};
use onboarding::outbound::persistence::{JsonFileStore, MemoryStateStore};
use onboarding::test_support::cap_fs::{path_exists, read_file_to_string, write_file};
use onboarding::test_support::clock::fixture_now;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct StoreDir {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl StoreDir {
    fn path(&self, file_name: &str) -> std::path::PathBuf {
        self.root.join(file_name).into_std_path_buf()
    }
}

#[fixture]
fn store_dir() -> StoreDir {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8Path::from_path(temp.path())
        .expect("utf-8 temp path")
        .join("store");
    StoreDir { _temp: temp, root }
}

fn open_service(store: Arc<JsonFileStore>) -> OnboardingService {
    let ports = OnboardingPorts {
        store: store.clone(),
        registry: store,
        telemetry: Arc::new(NoOpTelemetrySink),
        random: Arc::new(FixtureRandomSource::new()),
        clock: Arc::new(DefaultClock),
    };
    OnboardingService::new(ports, OnboardingPolicy::default())
}

fn seed_template(code: &str) -> InviteTemplate {
    InviteTemplate {
        code: InviteCode::parse(code).expect("valid code"),
        category: InviteCategory::Employee,
        org_id: OrgId::generate(&FixtureRandomSource::new()),
        org_name: "Equipe Seed".to_owned(),
        org_type: OrgType::Brokerage,
        role: MembershipRole::Agent,
        expires_at: fixture_now() + Duration::days(3650),
        max_uses: 5,
        uses: 0,
        bound_email: None,
        developer_role: None,
        note: Some("seeded".to_owned()),
    }
}

#[rstest]
fn new_store_starts_from_the_default_invites(store_dir: StoreDir) {
    let store = JsonFileStore::open(&store_dir.root).expect("store opens");

    let codes: Vec<String> = store
        .invite_directory()
        .into_iter()
        .map(|invite| invite.code.as_str().to_owned())
        .collect();
    assert!(codes.contains(&"CONSTELLA24".to_owned()));
    assert!(codes.contains(&"SKYLINEOPS".to_owned()));
    assert!(path_exists(&store_dir.path("invites.json")));
    assert_eq!(store.root(), store_dir.root.as_path());
}

#[rstest]
fn session_state_survives_reopening(store_dir: StoreDir) {
    let first = Arc::new(JsonFileStore::open(&store_dir.root).expect("store opens"));
    let mut service = open_service(first);
    service
        .create_account(&AccountRegistration::new(
            "Ana Silva",
            "ana@ex.com",
            "abcd1234",
            true,
        ))
        .expect("account");
    service.select_role(UserRole::Realtor).expect("role");
    let saved = service.state().clone();

    let reopened = Arc::new(JsonFileStore::open(&store_dir.root).expect("store reopens"));
    let resumed = open_service(reopened.clone());

    assert_eq!(resumed.state(), &saved);
    assert_eq!(reopened.registered_emails(), vec!["ana@ex.com".to_owned()]);
    let raw = read_file_to_string(&store_dir.path("state.json")).expect("state file");
    assert!(raw.contains("\"role\": \"realtor\""));
}

#[rstest]
fn corrupt_namespaces_fall_back_to_defaults(store_dir: StoreDir) {
    JsonFileStore::open(&store_dir.root).expect("store opens");
    write_file(&store_dir.path("state.json"), b"{ not json").expect("damage state");
    write_file(&store_dir.path("emails.json"), b"[1, 2").expect("damage emails");

    let store = JsonFileStore::open(&store_dir.root).expect("store reopens");

    assert_eq!(store.load_state(), OnboardingState::default());
    assert!(store.registered_emails().is_empty());
    assert!(store.claim_email("ana@ex.com"));
    let raw = read_file_to_string(&store_dir.path("emails.json")).expect("emails file");
    let emails: Vec<String> = serde_json::from_str(&raw).expect("rewritten emails");
    assert_eq!(emails, vec!["ana@ex.com".to_owned()]);
}

#[rstest]
fn seed_file_replaces_the_default_invites(store_dir: StoreDir) {
    let seed_path = store_dir
        .root
        .parent()
        .expect("temp parent")
        .join("seed.json");
    let seed = vec![seed_template("SEED-0000-0000-0001")];
    write_file(
        seed_path.as_std_path(),
        serde_json::to_string(&seed).expect("seed json").as_bytes(),
    )
    .expect("write seed");

    let store = JsonFileStore::open_with_seed(&store_dir.root, Some(seed_path.as_path()))
        .expect("store opens");

    assert_eq!(store.invite_directory(), seed);
}

#[rstest]
fn missing_seed_file_fails_to_open(store_dir: StoreDir) {
    let seed_path = store_dir.root.join("absent-seed.json");

    let error = JsonFileStore::open_with_seed(&store_dir.root, Some(seed_path.as_path()))
        .expect_err("seed must exist");

    assert!(error.to_string().contains("absent-seed.json"));
}

#[rstest]
fn existing_directory_ignores_the_seed(store_dir: StoreDir) {
    JsonFileStore::open(&store_dir.root).expect("store opens");
    let seed_path = store_dir.root.join("never-read.json");

    let store = JsonFileStore::open_with_seed(&store_dir.root, Some(seed_path.as_path()))
        .expect("directory already stored");

    assert!(
        store
            .invite_directory()
            .iter()
            .any(|invite| invite.code.as_str() == "CONSTELLA24")
    );
}

#[rstest]
fn clearing_state_keeps_the_registries(store_dir: StoreDir) {
    let store = Arc::new(JsonFileStore::open(&store_dir.root).expect("store opens"));
    let mut service = open_service(store.clone());
    service
        .create_account(&AccountRegistration::new(
            "Ana Silva",
            "ana@ex.com",
            "abcd1234",
            true,
        ))
        .expect("account");
    assert!(path_exists(&store_dir.path("state.json")));

    service.reset_onboarding();

    assert!(!path_exists(&store_dir.path("state.json")));
    assert_eq!(store.registered_emails(), vec!["ana@ex.com".to_owned()]);
    assert!(service.state().is_empty());
}

#[rstest]
fn invite_uses_are_written_through(store_dir: StoreDir) {
    let seed_path = store_dir
        .root
        .parent()
        .expect("temp parent")
        .join("seed.json");
    let template = seed_template("SEED-0000-0000-0002");
    write_file(
        seed_path.as_std_path(),
        serde_json::to_string(&vec![template.clone()])
            .expect("seed json")
            .as_bytes(),
    )
    .expect("write seed");
    let store = JsonFileStore::open_with_seed(&store_dir.root, Some(seed_path.as_path()))
        .expect("store opens");

    assert!(store.compare_and_swap_invite(&template, &template.with_use_recorded()));
    assert!(!store.compare_and_swap_invite(&template, &template.with_use_recorded()));

    let reopened = JsonFileStore::open(&store_dir.root).expect("store reopens");
    let stored = reopened
        .find_invite(&template.code)
        .expect("invite persisted");
    assert_eq!(stored.uses, 1);
}

#[rstest]
fn handles_on_one_directory_share_every_registry(store_dir: StoreDir) {
    let seed_path = store_dir
        .root
        .parent()
        .expect("temp parent")
        .join("seed.json");
    let mut template = seed_template("SEED-0000-0000-0003");
    template.max_uses = 1;
    write_file(
        seed_path.as_std_path(),
        serde_json::to_string(&vec![template.clone()])
            .expect("seed json")
            .as_bytes(),
    )
    .expect("write seed");
    let first = JsonFileStore::open_with_seed(&store_dir.root, Some(seed_path.as_path()))
        .expect("first handle");
    let second = JsonFileStore::open(&store_dir.root).expect("second handle");

    assert!(first.compare_and_swap_invite(&template, &template.with_use_recorded()));
    let seen = second.find_invite(&template.code).expect("invite listed");
    assert_eq!(seen.uses, 1);
    assert!(!second.compare_and_swap_invite(&template, &template.with_use_recorded()));

    assert!(first.claim_email("x@ex.com"));
    assert!(!second.claim_email("x@ex.com"));
    assert!(second.claim_slug("minha-casa"));
    assert!(!first.claim_slug("minha-casa"));

    let reopened = JsonFileStore::open(&store_dir.root).expect("store reopens");
    assert_eq!(reopened.find_invite(&template.code).expect("invite").uses, 1);
    assert_eq!(reopened.registered_emails(), vec!["x@ex.com".to_owned()]);
    assert_eq!(reopened.allocated_slugs(), vec!["minha-casa".to_owned()]);
}

#[rstest]
fn racing_handles_redeem_a_single_use_invite_once(store_dir: StoreDir) {
    let seed_path = store_dir
        .root
        .parent()
        .expect("temp parent")
        .join("seed.json");
    let mut template = seed_template("SEED-0000-0000-0004");
    template.max_uses = 1;
    write_file(
        seed_path.as_std_path(),
        serde_json::to_string(&vec![template.clone()])
            .expect("seed json")
            .as_bytes(),
    )
    .expect("write seed");
    JsonFileStore::open_with_seed(&store_dir.root, Some(seed_path.as_path())).expect("seeded");

    let sessions = 4;
    let barrier = Barrier::new(sessions);
    let outcomes: Vec<Result<(), OnboardingErrorCode>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..sessions)
            .map(|index| {
                let root = store_dir.root.clone();
                let barrier = &barrier;
                let code = template.code.as_str().to_owned();
                scope.spawn(move || {
                    let registry = Arc::new(JsonFileStore::open(&root).expect("handle opens"));
                    let mut service = OnboardingService::new(
                        OnboardingPorts {
                            store: Arc::new(MemoryStateStore::default()),
                            registry,
                            telemetry: Arc::new(NoOpTelemetrySink),
                            random: Arc::new(FixtureRandomSource::new()),
                            clock: Arc::new(DefaultClock),
                        },
                        OnboardingPolicy::default(),
                    );
                    service
                        .create_account(&AccountRegistration::new(
                            "Corretor",
                            &format!("corretor{index}@ex.com"),
                            "abcd1234",
                            true,
                        ))
                        .expect("account");
                    service.select_role(UserRole::Employee).expect("role");
                    barrier.wait();
                    service
                        .redeem_invite(&code)
                        .map(|_| ())
                        .map_err(|error| error.code())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("session thread"))
            .collect()
    });

    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .filter_map(|outcome| outcome.err())
            .all(|code| code == OnboardingErrorCode::InviteUsed)
    );
    let reopened = JsonFileStore::open(&store_dir.root).expect("store reopens");
    assert_eq!(reopened.find_invite(&template.code).expect("invite").uses, 1);
}
