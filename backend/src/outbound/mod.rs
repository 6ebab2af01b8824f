//! Outbound adapters implementing the domain ports.
//!
//! - **persistence**: JSON-file and in-memory stores for the session
//!   aggregate and the shared registries.
//! - **telemetry**: analytics events forwarded to `tracing`.
//! - **random**: thread-local RNG for codes and identifiers.
//!
//! Adapters translate between domain types and infrastructure. They contain
//! no onboarding rules.

pub mod persistence;
pub mod random;
pub mod telemetry;
