//! Port for the one-way telemetry channel.
//!
//! The domain reports notable onboarding transitions here. Sinks must not
//! fail the caller: recording is fire-and-forget and returns nothing.

use std::sync::{Mutex, PoisonError};

use crate::domain::TelemetryEvent;

/// Receiver of onboarding telemetry events.
#[cfg_attr(test, mockall::automock)]
pub trait TelemetrySink: Send + Sync {
    /// Record an event. Implementations swallow their own failures.
    fn record(&self, event: &TelemetryEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpTelemetrySink;

impl TelemetrySink for NoOpTelemetrySink {
    fn record(&self, _event: &TelemetryEvent) {}
}

/// Sink that keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingTelemetrySink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetrySink {
    /// Snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Names of the recorded events, in emission order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(TelemetryEvent::name).collect()
    }
}

impl TelemetrySink for RecordingTelemetrySink {
    fn record(&self, event: &TelemetryEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
