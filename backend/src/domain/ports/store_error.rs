//! Errors raised while opening onboarding store adapters.
//!
//! Reads and writes on an open store never fail the caller (reads fall back
//! to typed defaults, writes are best-effort), so these errors only surface
//! when an adapter cannot be constructed.

use super::define_port_error;

define_port_error! {
    /// Failures raised while opening an onboarding store.
    pub enum OnboardingStoreError {
        /// The backing directory could not be created or opened.
        Directory { path: String, message: String } =>
            "onboarding store directory '{path}' unavailable: {message}",
        /// A seed file could not be read or parsed.
        Seed { path: String, message: String } =>
            "invite seed file '{path}' unusable: {message}",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn directory_error_names_the_path() {
        let err = OnboardingStoreError::directory("/data", "permission denied");
        assert_eq!(
            err.to_string(),
            "onboarding store directory '/data' unavailable: permission denied"
        );
    }

    #[rstest]
    fn seed_error_names_the_path() {
        let err = OnboardingStoreError::seed("seed.json", "expected value");
        assert!(err.to_string().contains("seed.json"));
    }
}
