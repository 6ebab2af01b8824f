//! Concurrent redemption of one invite from many sessions.
//!
//! Sessions share a single registry and race to redeem the same code. The
//! use count must never exceed the limit and every loser must see
//! `invite_used`.

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::Duration;
use onboarding::domain::ports::{FixtureRandomSource, OnboardingRegistry};
use onboarding::domain::{
    InviteCategory, InviteCode, InviteTemplate, MembershipRole, OnboardingErrorCode,
    OnboardingPolicy, OrgId, OrgType, UserRole,
};
use onboarding::outbound::persistence::MemoryRegistry;
use onboarding::test_support::clock::fixture_now;
use onboarding::test_support::session::SessionHarness;
use rstest::rstest;

const SHARED_CODE: &str = "TEAM-2026-ABCD-EFGH";

fn open_invite(max_uses: u32) -> InviteTemplate {
    InviteTemplate {
        code: InviteCode::parse(SHARED_CODE).expect("valid code"),
        category: InviteCategory::Employee,
        org_id: OrgId::generate(&FixtureRandomSource::new()),
        org_name: "Equipe Horizonte".to_owned(),
        org_type: OrgType::Brokerage,
        role: MembershipRole::Agent,
        expires_at: fixture_now() + Duration::days(7),
        max_uses,
        uses: 0,
        bound_email: None,
        developer_role: None,
        note: None,
    }
}

#[rstest]
#[case(8, 3)]
#[case(6, 1)]
#[case(4, 4)]
fn racing_sessions_never_over_redeem(#[case] sessions: usize, #[case] max_uses: u32) {
    let registry = Arc::new(MemoryRegistry::with_invites(vec![open_invite(max_uses)]));
    let barrier = Arc::new(Barrier::new(sessions));

    let outcomes: Vec<Result<(), OnboardingErrorCode>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..sessions)
            .map(|index| {
                let registry = registry.clone();
                let barrier = barrier.clone();
                scope.spawn(move || {
                    let mut session = SessionHarness::open(registry, OnboardingPolicy::default());
                    session.sign_up_as(
                        UserRole::Employee,
                        &format!("Corretor {index}"),
                        &format!("corretor{index}@ex.com"),
                    );
                    barrier.wait();
                    session
                        .service
                        .redeem_invite(SHARED_CODE)
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

    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let expected = usize::try_from(max_uses).expect("small limit").min(sessions);
    assert_eq!(successes, expected);
    assert!(
        outcomes
            .iter()
            .filter_map(|outcome| outcome.err())
            .all(|code| code == OnboardingErrorCode::InviteUsed)
    );

    let code = InviteCode::parse(SHARED_CODE).expect("valid code");
    let stored = registry.find_invite(&code).expect("invite listed");
    assert_eq!(usize::try_from(stored.uses).expect("small count"), expected);
}

#[rstest]
fn sequential_redemptions_stop_at_the_limit() {
    let registry = Arc::new(MemoryRegistry::with_invites(vec![open_invite(2)]));
    let mut results = Vec::new();
    for index in 0..4 {
        let mut session = SessionHarness::open(registry.clone(), OnboardingPolicy::default());
        session.sign_up_as(
            UserRole::Employee,
            &format!("Corretor {index}"),
            &format!("seq{index}@ex.com"),
        );
        results.push(session.service.redeem_invite(SHARED_CODE).map(|_| ()));
    }

    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    for failed in &results[2..] {
        let error = failed.as_ref().expect_err("limit reached");
        assert_eq!(error.code(), OnboardingErrorCode::InviteUsed);
    }
}
