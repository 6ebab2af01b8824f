//! Telemetry sink that forwards events to `tracing`.

use tracing::{info, warn};

use crate::domain::TelemetryEvent;
use crate::domain::ports::TelemetrySink;

/// Tracing target used for analytics events.
pub const TELEMETRY_TARGET: &str = "onboarding::telemetry";

/// Emits each event as an `info` record under [`TELEMETRY_TARGET`] with the
/// payload rendered as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn record(&self, event: &TelemetryEvent) {
        match serde_json::to_value(event) {
            Ok(value) => {
                let payload = value.get("payload").cloned().unwrap_or_default();
                info!(target: TELEMETRY_TARGET, event = event.name(), %payload, "telemetry event");
            }
            Err(err) => {
                warn!(
                    target: TELEMETRY_TARGET,
                    event = event.name(),
                    error = %err,
                    "telemetry event not serialisable"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex, PoisonError};

    use rstest::rstest;
    use tracing_subscriber::fmt;

    use super::*;
    use crate::domain::{AuthMethod, UserRole};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(events: &[TelemetryEvent]) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = fmt()
            .with_writer(move || writer.clone())
            .json()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            for event in events {
                TracingTelemetrySink.record(event);
            }
        });
        logs.contents()
    }

    #[rstest]
    fn events_are_logged_under_the_telemetry_target() {
        let output = capture(&[TelemetryEvent::UserSignup {
            auth_method: AuthMethod::Google,
        }]);

        let line: serde_json::Value =
            serde_json::from_str(output.lines().next().expect("one record")).expect("json record");
        assert_eq!(line["target"], TELEMETRY_TARGET);
        assert_eq!(line["fields"]["event"], "user_signup");
        let payload = line["fields"]["payload"].as_str().expect("payload field");
        assert!(payload.contains("\"auth_method\":\"google\""));
    }

    #[rstest]
    fn each_event_produces_one_record() {
        let output = capture(&[
            TelemetryEvent::UserSignup {
                auth_method: AuthMethod::Email,
            },
            TelemetryEvent::RoleSelected {
                role: UserRole::Realtor,
            },
        ]);

        assert_eq!(output.lines().count(), 2);
        assert!(output.contains("role_selected"));
    }
}
