//! Onboarding configuration loaded via OrthoConfig.

use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::{OrthoConfig, OrthoResult};
use serde::Deserialize;

use crate::domain::OnboardingPolicy;

/// Store directory used when none is configured.
pub const DEFAULT_DATA_DIR: &str = ".onboarding";

/// Configuration values for the onboarding binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ONBOARDING")]
pub struct OnboardingSettings {
    /// Directory holding the JSON store.
    pub data_dir: Option<String>,
    /// Allow developer codes to be issued and redeemed.
    #[ortho_config(default = false)]
    pub developer_codes: bool,
    /// JSON array of invite templates used to seed a new store.
    pub invite_seed_path: Option<String>,
}

impl OnboardingSettings {
    /// Load settings from the environment and configuration files.
    ///
    /// Command-line arguments are left to the CLI parser.
    pub fn load_from_environment() -> OrthoResult<Self> {
        Self::load_from_iter([OsString::from("onboarding")])
    }

    /// Return the configured store directory, falling back to the default.
    pub fn data_dir(&self) -> Utf8PathBuf {
        self.data_dir
            .as_deref()
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map_or_else(|| Utf8PathBuf::from(DEFAULT_DATA_DIR), Utf8PathBuf::from)
    }

    /// Return the invite seed file, if one is configured.
    pub fn invite_seed_path(&self) -> Option<&Utf8Path> {
        self.invite_seed_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(Utf8Path::new)
    }

    /// Service policy derived from these settings.
    pub fn policy(&self) -> OnboardingPolicy {
        OnboardingPolicy {
            developer_codes_enabled: self.developer_codes,
        }
    }
}
