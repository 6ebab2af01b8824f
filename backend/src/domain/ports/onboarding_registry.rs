//! Port for the registries shared by every onboarding session.
//!
//! Three collections live here: registered emails, allocated slugs and the
//! invite directory. Sessions running concurrently share one registry, so
//! every mutating method is a single critical section in the adapter:
//!
//! - `claim_email` and `claim_slug` check and append atomically.
//! - `compare_and_swap_invite` replaces a directory entry only when the
//!   stored entry still equals the caller's snapshot, which lets the domain
//!   run redemption as an optimistic read-validate-swap loop without lost
//!   updates.

use crate::domain::{InviteCode, InviteTemplate};

/// Registries shared across onboarding sessions.
#[cfg_attr(test, mockall::automock)]
pub trait OnboardingRegistry: Send + Sync {
    /// Normalised emails registered so far, in registration order.
    fn registered_emails(&self) -> Vec<String>;

    /// Append `email` unless already present.
    ///
    /// Returns `false` when the email was already registered.
    fn claim_email(&self, email: &str) -> bool;

    /// Normalised slugs allocated so far, in allocation order.
    fn allocated_slugs(&self) -> Vec<String>;

    /// Append `slug` unless already present.
    ///
    /// Returns `false` when the slug was already allocated.
    fn claim_slug(&self, slug: &str) -> bool;

    /// Invite templates, most recently created or updated first.
    fn invite_directory(&self) -> Vec<InviteTemplate>;

    /// Look up the directory entry for `code`.
    fn find_invite(&self, code: &InviteCode) -> Option<InviteTemplate>;

    /// Insert `invite` at the front of the directory, replacing any entry
    /// with the same code.
    fn upsert_invite(&self, invite: InviteTemplate);

    /// Replace the entry equal to `current` with `next`, in place.
    ///
    /// Returns `false`, leaving the directory untouched, when the stored
    /// entry for `current.code` no longer equals `current`.
    fn compare_and_swap_invite(&self, current: &InviteTemplate, next: &InviteTemplate) -> bool;
}
