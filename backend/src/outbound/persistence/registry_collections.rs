//! Shared registry collections and their mutation rules.
//!
//! The in-memory registry keeps these collections behind a mutex. The file
//! store applies the same per-namespace rules to data it has just read under
//! the directory lock.

use crate::domain::{InviteCode, InviteTemplate};

/// Emails, slugs and invite directory shared between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RegistryCollections {
    pub(crate) emails: Vec<String>,
    pub(crate) slugs: Vec<String>,
    pub(crate) invites: Vec<InviteTemplate>,
}

/// Append `value` unless already present; returns whether it was appended.
pub(crate) fn claim_entry(entries: &mut Vec<String>, value: &str) -> bool {
    if entries.iter().any(|entry| entry == value) {
        return false;
    }
    entries.push(value.to_owned());
    true
}

pub(crate) fn find_invite(invites: &[InviteTemplate], code: &InviteCode) -> Option<InviteTemplate> {
    invites.iter().find(|invite| &invite.code == code).cloned()
}

/// Prepend `template`, dropping any entry with the same code.
pub(crate) fn upsert_invite(invites: &mut Vec<InviteTemplate>, template: InviteTemplate) {
    invites.retain(|invite| invite.code != template.code);
    invites.insert(0, template);
}

/// Replace the entry equal to `current` with `next` in place.
pub(crate) fn swap_invite(
    invites: &mut [InviteTemplate],
    current: &InviteTemplate,
    next: &InviteTemplate,
) -> bool {
    match invites.iter_mut().find(|invite| invite.code == current.code) {
        Some(slot) if slot == current => {
            *slot = next.clone();
            true
        }
        _ => false,
    }
}

impl RegistryCollections {
    pub(crate) fn claim_email(&mut self, email: &str) -> bool {
        claim_entry(&mut self.emails, email)
    }

    pub(crate) fn claim_slug(&mut self, slug: &str) -> bool {
        claim_entry(&mut self.slugs, slug)
    }

    pub(crate) fn find_invite(&self, code: &InviteCode) -> Option<InviteTemplate> {
        find_invite(&self.invites, code)
    }

    pub(crate) fn upsert_invite(&mut self, template: InviteTemplate) {
        upsert_invite(&mut self.invites, template);
    }

    pub(crate) fn compare_and_swap_invite(
        &mut self,
        current: &InviteTemplate,
        next: &InviteTemplate,
    ) -> bool {
        swap_invite(&mut self.invites, current, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_invites;
    use rstest::{fixture, rstest};

    #[fixture]
    fn collections() -> RegistryCollections {
        RegistryCollections {
            invites: default_invites(),
            ..RegistryCollections::default()
        }
    }

    #[rstest]
    fn claims_are_exclusive(mut collections: RegistryCollections) {
        assert!(collections.claim_email("ana@ex.com"));
        assert!(!collections.claim_email("ana@ex.com"));
        assert!(collections.claim_slug("minha-casa"));
        assert!(!collections.claim_slug("minha-casa"));
        assert_eq!(collections.emails, vec!["ana@ex.com"]);
    }

    #[rstest]
    fn upsert_prepends_and_deduplicates(mut collections: RegistryCollections) {
        let mut updated = collections.invites[1].clone();
        updated.note = Some("renewed".into());
        collections.upsert_invite(updated.clone());

        assert_eq!(collections.invites.len(), 2);
        assert_eq!(collections.invites[0], updated);
    }

    #[rstest]
    fn swap_requires_unchanged_entry(mut collections: RegistryCollections) {
        let current = collections.invites[0].clone();
        let next = current.with_use_recorded();
        assert!(collections.compare_and_swap_invite(&current, &next));
        assert!(!collections.compare_and_swap_invite(&current, &next.with_use_recorded()));
        assert_eq!(collections.invites[0].uses, 1);
        assert_eq!(collections.invites[0].code, current.code);
    }

    #[rstest]
    fn swap_of_unknown_code_fails(mut collections: RegistryCollections) {
        let mut ghost = collections.invites[0].clone();
        ghost.code = InviteCode::parse("GHOST").expect("code");
        assert!(!collections.compare_and_swap_invite(&ghost, &ghost.with_use_recorded()));
    }
}
