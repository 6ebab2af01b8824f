//! Onboarding and builder entitlement engine for Stella tenant sites.
//!
//! - [`domain`]: entities, validation, the onboarding service and ports.
//! - [`outbound`]: store, telemetry and randomness adapters.
//! - [`inbound`]: the command-line adapter.
//! - [`config`]: settings loaded through OrthoConfig.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
