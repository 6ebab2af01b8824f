//! Test utilities for the onboarding crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and behind the `test-support` feature.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! File-store tests inspect and damage the files a store writes. These
    //! helpers do that through `cap_std::fs::Dir` rather than `std::fs`.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a UTF-8 text file through `cap_std`.
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    /// Return true when `path` exists.
    pub fn path_exists(path: &Path) -> bool {
        let Ok((parent, file_name)) = parent_and_file_name(path) else {
            return false;
        };
        let Ok(directory) = Dir::open_ambient_dir(parent, ambient_authority()) else {
            return false;
        };
        directory.exists(Path::new(&file_name))
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod clock {
    //! Controllable clock for expiry tests.

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use mockable::Clock;

    /// Fixed instant used as "now" across the test suites.
    pub fn fixture_now() -> DateTime<Utc> {
        match Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single() {
            Some(now) => now,
            None => panic!("valid fixture timestamp"),
        }
    }

    /// Clock whose time only moves when a test advances it.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        /// Clock frozen at `now`.
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        /// Move the clock forward by `days`.
        pub fn advance_days(&self, days: i64) {
            *self.lock_clock() += TimeDelta::days(days);
        }

        /// Move the clock forward by `seconds`.
        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock_clock() += TimeDelta::seconds(seconds);
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Default for MutableClock {
        fn default() -> Self {
            Self::new(fixture_now())
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod session {
    //! In-memory onboarding sessions with recorded telemetry.

    use std::sync::Arc;

    use super::clock::MutableClock;
    use crate::domain::ports::{FixtureRandomSource, RecordingTelemetrySink};
    use crate::domain::{
        AccountProfile, AccountRegistration, OnboardingPolicy, OnboardingPorts, OnboardingService,
        UserRole,
    };
    use crate::outbound::persistence::{MemoryRegistry, MemoryStateStore};

    /// One session wired to in-memory adapters.
    pub struct SessionHarness {
        /// Service under test.
        pub service: OnboardingService,
        /// Events emitted by the service.
        pub telemetry: Arc<RecordingTelemetrySink>,
        /// Registry, possibly shared with other sessions.
        pub registry: Arc<MemoryRegistry>,
        /// Clock driving expiry.
        pub clock: Arc<MutableClock>,
    }

    impl SessionHarness {
        /// Open a session on `registry` with `policy`.
        pub fn open(registry: Arc<MemoryRegistry>, policy: OnboardingPolicy) -> Self {
            Self::open_with_clock(registry, policy, Arc::new(MutableClock::default()))
        }

        /// Open a session on `registry` sharing `clock`.
        pub fn open_with_clock(
            registry: Arc<MemoryRegistry>,
            policy: OnboardingPolicy,
            clock: Arc<MutableClock>,
        ) -> Self {
            let telemetry = Arc::new(RecordingTelemetrySink::default());
            let ports = OnboardingPorts {
                store: Arc::new(MemoryStateStore::default()),
                registry: registry.clone(),
                telemetry: telemetry.clone(),
                random: Arc::new(FixtureRandomSource::new()),
                clock: clock.clone(),
            };
            Self {
                service: OnboardingService::new(ports, policy),
                telemetry,
                registry,
                clock,
            }
        }

        /// Open a session on an empty registry with the default policy.
        pub fn fresh() -> Self {
            Self::open(Arc::new(MemoryRegistry::default()), OnboardingPolicy::default())
        }

        /// Sign up with a valid password and consent.
        pub fn sign_up(&mut self, full_name: &str, email: &str) -> AccountProfile {
            let registration = AccountRegistration::new(full_name, email, "abcd1234", true);
            match self.service.create_account(&registration) {
                Ok(account) => account,
                Err(error) => panic!("sign up failed: {error}"),
            }
        }

        /// Sign up and choose `role`.
        pub fn sign_up_as(&mut self, role: UserRole, full_name: &str, email: &str) -> AccountProfile {
            let account = self.sign_up(full_name, email);
            if let Err(error) = self.service.select_role(role) {
                panic!("role selection failed: {error}");
            }
            account
        }
    }
}
