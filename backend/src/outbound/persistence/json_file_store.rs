//! JSON file store: the session aggregate and shared registries on disk.
//!
//! The store directory holds one file per namespace:
//!
//! | File           | Contents                              |
//! |----------------|---------------------------------------|
//! | `state.json`   | the [`OnboardingState`] aggregate     |
//! | `emails.json`  | registered emails, oldest first       |
//! | `slugs.json`   | allocated slugs, oldest first         |
//! | `invites.json` | invite directory, most recent first   |
//!
//! Registry namespaces are never cached. Every registry call takes the
//! directory lock, reads the namespace from disk and, for mutations, checks
//! and writes it back atomically before releasing the lock. Handles in other
//! processes on the same directory always see the latest entries. Absent or
//! unreadable files fall back to typed defaults. Failed writes are logged
//! and never reach the caller.

use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, File};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::atomic_io::write_atomic;
use super::dir_lock::DirectoryLock;
use super::registry_collections::{claim_entry, find_invite, swap_invite, upsert_invite};
use crate::domain::ports::{OnboardingRegistry, OnboardingStoreError, SessionStateStore};
use crate::domain::{InviteCode, InviteTemplate, OnboardingState, default_invites};

const STATE_FILE: &str = "state.json";
const EMAILS_FILE: &str = "emails.json";
const SLUGS_FILE: &str = "slugs.json";
const INVITES_FILE: &str = "invites.json";

/// File-backed implementation of both store ports.
#[derive(Debug)]
pub struct JsonFileStore {
    root: Utf8PathBuf,
    dir: Dir,
}

impl JsonFileStore {
    /// Open (creating if needed) the store at `root`.
    ///
    /// An absent invite directory starts from the default invites.
    pub fn open(root: &Utf8Path) -> Result<Self, OnboardingStoreError> {
        Self::open_with_seed(root, None)
    }

    /// Open the store at `root`, seeding an absent invite directory from the
    /// JSON array of invite templates at `seed` when given.
    pub fn open_with_seed(
        root: &Utf8Path,
        seed: Option<&Utf8Path>,
    ) -> Result<Self, OnboardingStoreError> {
        let directory_error =
            |err: io::Error| OnboardingStoreError::directory(root.as_str(), err.to_string());
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(directory_error)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(directory_error)?;

        let _lock = DirectoryLock::acquire(&dir).map_err(directory_error)?;
        if read_namespace::<Vec<InviteTemplate>>(&dir, INVITES_FILE).is_none() {
            let seeded = match seed {
                Some(path) => read_seed(path)?,
                None => default_invites(),
            };
            persist(&dir, INVITES_FILE, &seeded);
        }
        debug!(root = %root, "opened onboarding store");
        Ok(Self {
            root: root.to_owned(),
            dir,
        })
    }

    /// Directory backing the store.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Latest stored copy of a namespace. Writes replace files by rename,
    /// so an unlocked read sees a whole file.
    fn snapshot<T: DeserializeOwned + Default>(&self, file_name: &str) -> T {
        read_namespace(&self.dir, file_name).unwrap_or_default()
    }

    /// Run `apply` against the latest stored namespace while holding the
    /// directory lock, writing the namespace back when `apply` reports a
    /// change.
    ///
    /// Without the lock no check can be trusted, so `rejected` is returned
    /// and nothing is written.
    fn update<T, R>(
        &self,
        file_name: &str,
        rejected: R,
        apply: impl FnOnce(&mut T) -> (R, bool),
    ) -> R
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let _lock = match DirectoryLock::acquire(&self.dir) {
            Ok(lock) => lock,
            Err(err) => {
                warn!(file = file_name, error = %err, "store lock unavailable; update rejected");
                return rejected;
            }
        };
        let mut value = read_namespace(&self.dir, file_name).unwrap_or_default();
        let (result, changed) = apply(&mut value);
        if changed {
            persist(&self.dir, file_name, &value);
        }
        result
    }
}

/// Read and parse a namespace; `None` when absent or unreadable.
fn read_namespace<T: DeserializeOwned>(dir: &Dir, file_name: &str) -> Option<T> {
    let raw = match dir.read_to_string(file_name) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(file = file_name, "namespace absent; using default");
            return None;
        }
        Err(err) => {
            warn!(file = file_name, error = %err, "namespace unreadable; using default");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(file = file_name, error = %err, "namespace corrupt; using default");
            None
        }
    }
}

fn read_seed(path: &Utf8Path) -> Result<Vec<InviteTemplate>, OnboardingStoreError> {
    let seed_error = |message: String| OnboardingStoreError::seed(path.as_str(), message);
    let mut raw = String::new();
    File::open_ambient(path, ambient_authority())
        .and_then(|mut file| file.read_to_string(&mut raw))
        .map_err(|err| seed_error(err.to_string()))?;
    serde_json::from_str(&raw).map_err(|err| seed_error(err.to_string()))
}

/// Best-effort atomic write of a namespace.
fn persist<T: Serialize + ?Sized>(dir: &Dir, file_name: &str, value: &T) {
    let contents = match serde_json::to_string_pretty(value) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(file = file_name, error = %err, "failed to serialise namespace");
            return;
        }
    };
    if let Err(err) = write_atomic(dir, file_name, &contents) {
        warn!(file = file_name, error = %err, "failed to write namespace");
    }
}

impl SessionStateStore for JsonFileStore {
    fn load_state(&self) -> OnboardingState {
        read_namespace(&self.dir, STATE_FILE).unwrap_or_default()
    }

    fn save_state(&self, state: &OnboardingState) {
        persist(&self.dir, STATE_FILE, state);
    }

    fn clear_state(&self) {
        match self.dir.remove_file(STATE_FILE) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(file = STATE_FILE, error = %err, "failed to clear state"),
        }
    }
}

impl OnboardingRegistry for JsonFileStore {
    fn registered_emails(&self) -> Vec<String> {
        self.snapshot(EMAILS_FILE)
    }

    fn claim_email(&self, email: &str) -> bool {
        self.update(EMAILS_FILE, false, |emails: &mut Vec<String>| {
            let claimed = claim_entry(emails, email);
            (claimed, claimed)
        })
    }

    fn allocated_slugs(&self) -> Vec<String> {
        self.snapshot(SLUGS_FILE)
    }

    fn claim_slug(&self, slug: &str) -> bool {
        self.update(SLUGS_FILE, false, |slugs: &mut Vec<String>| {
            let claimed = claim_entry(slugs, slug);
            (claimed, claimed)
        })
    }

    fn invite_directory(&self) -> Vec<InviteTemplate> {
        self.snapshot(INVITES_FILE)
    }

    fn find_invite(&self, code: &InviteCode) -> Option<InviteTemplate> {
        find_invite(&self.snapshot::<Vec<InviteTemplate>>(INVITES_FILE), code)
    }

    fn upsert_invite(&self, template: InviteTemplate) {
        self.update(INVITES_FILE, (), |invites: &mut Vec<InviteTemplate>| {
            upsert_invite(invites, template);
            ((), true)
        });
    }

    fn compare_and_swap_invite(&self, current: &InviteTemplate, next: &InviteTemplate) -> bool {
        self.update(INVITES_FILE, false, |invites: &mut Vec<InviteTemplate>| {
            let swapped = swap_invite(invites, current, next);
            (swapped, swapped)
        })
    }
}
