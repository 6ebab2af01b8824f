//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe what the onboarding domain needs from the outside world:
//! somewhere to keep the session aggregate, registries shared between
//! sessions, a telemetry channel and a source of randomness. Time comes from
//! [`mockable::Clock`].

mod macros;
pub(crate) use macros::define_port_error;

mod onboarding_registry;
mod random_source;
mod session_state_store;
mod store_error;
mod telemetry_sink;

#[cfg(test)]
pub use onboarding_registry::MockOnboardingRegistry;
pub use onboarding_registry::OnboardingRegistry;
#[cfg(test)]
pub use random_source::MockRandomSource;
pub use random_source::{FixtureRandomSource, RandomSource};
#[cfg(test)]
pub use session_state_store::MockSessionStateStore;
pub use session_state_store::SessionStateStore;
pub use store_error::OnboardingStoreError;
#[cfg(test)]
pub use telemetry_sink::MockTelemetrySink;
pub use telemetry_sink::{NoOpTelemetrySink, RecordingTelemetrySink, TelemetrySink};
