use crate::common::{DomainError, DomainResult};
use crate::domains::geometry::Position;
use crate::domains::simulation::{Measurement, TelemetryCollector};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct CollectorState {
    next_id: i64,
    registrations: Vec<(Position, i64)>,
    registration_attempts: usize,
    pending_registration_failures: usize,
    empty_registration_replies: usize,
    measurements: Vec<Measurement>,
    pending_measurement_failures: usize,
}

/// Records everything it receives. Failures can be scripted ahead of time.
#[derive(Debug, Default)]
pub struct InMemoryCollector {
    state: Mutex<CollectorState>,
}

impl InMemoryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `count` registration calls fail with a transport error.
    pub fn fail_registrations(&self, count: usize) {
        self.lock().pending_registration_failures += count;
    }

    /// The next `count` registration calls succeed but carry identifier 0.
    pub fn reply_without_identifier(&self, count: usize) {
        self.lock().empty_registration_replies += count;
    }

    /// The next `count` measurement calls fail with a transport error.
    pub fn fail_measurements(&self, count: usize) {
        self.lock().pending_measurement_failures += count;
    }

    pub fn registrations(&self) -> Vec<(Position, i64)> {
        self.lock().registrations.clone()
    }

    pub fn registration_attempts(&self) -> usize {
        self.lock().registration_attempts
    }

    pub fn measurements(&self) -> Vec<Measurement> {
        self.lock().measurements.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CollectorState> {
        // A poisoned lock only means a test thread panicked mid-update.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TelemetryCollector for InMemoryCollector {
    async fn register_antenna(&self, x: f64, y: f64) -> DomainResult<i64> {
        let mut state = self.lock();
        state.registration_attempts += 1;
        if state.pending_registration_failures > 0 {
            state.pending_registration_failures -= 1;
            return Err(DomainError::Transport("collector unavailable".to_string()));
        }
        if state.empty_registration_replies > 0 {
            state.empty_registration_replies -= 1;
            return Ok(0);
        }
        state.next_id += 1;
        let id = state.next_id;
        state.registrations.push((Position::new(x, y), id));
        Ok(id)
    }

    async fn log_measurement(&self, measurement: Measurement) -> DomainResult<()> {
        let mut state = self.lock();
        if state.pending_measurement_failures > 0 {
            state.pending_measurement_failures -= 1;
            return Err(DomainError::Transport("measurement rejected".to_string()));
        }
        state.measurements.push(measurement);
        Ok(())
    }
}
