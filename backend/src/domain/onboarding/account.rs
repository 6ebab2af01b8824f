//! Account creation and role selection.

use crate::domain::account::{AccountProfile, AccountRegistration, validate_registration};
use crate::domain::error::{OnboardingErrorCode, OnboardingResult};
use crate::domain::events::TelemetryEvent;
use crate::domain::ids::AccountId;
use crate::domain::organization::{MembershipRole, UserRole};

use super::OnboardingService;

impl OnboardingService {
    /// Create the session account.
    ///
    /// Validation runs in the order consent, name, email, password, email
    /// uniqueness. The email is claimed in the shared registry before the
    /// aggregate changes. An existing account id is reused.
    pub fn create_account(
        &mut self,
        registration: &AccountRegistration,
    ) -> OnboardingResult<AccountProfile> {
        let validated = validate_registration(registration)?;
        if !self.ports.registry.claim_email(&validated.email) {
            return Err(OnboardingErrorCode::EmailInUse.into());
        }

        let account = AccountProfile {
            id: self.state.account.as_ref().map_or_else(
                || AccountId::generate(self.ports.random.as_ref()),
                |existing| existing.id.clone(),
            ),
            full_name: validated.full_name,
            email: validated.email,
            created_at: self.now(),
            consent: true,
            auth_method: validated.auth_method,
        };
        let mut next = self.state.clone();
        next.account = Some(account.clone());
        self.apply(
            next,
            vec![TelemetryEvent::UserSignup {
                auth_method: account.auth_method,
            }],
        );
        Ok(account)
    }

    /// Choose the onboarding path.
    ///
    /// Choosing `employee` drops license, tenant, organisation and
    /// membership. Any other path drops the invite redemption and an
    /// employee membership.
    pub fn select_role(&mut self, role: UserRole) -> OnboardingResult<()> {
        self.require_account("Create your account before choosing a path.")?;

        let mut next = self.state.clone();
        next.role = Some(role);
        if role == UserRole::Employee {
            next.license = None;
            next.tenant = None;
            next.org = None;
            next.membership = None;
        } else {
            next.invite = None;
            if next
                .membership
                .as_ref()
                .is_some_and(|membership| membership.role == MembershipRole::Employee)
            {
                next.membership = None;
            }
        }
        self.apply(next, vec![TelemetryEvent::RoleSelected { role }]);
        Ok(())
    }
}
