use crate::common::DomainResult;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// One signal strength observation of a person by an antenna.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Hashed subscriber identity.
    pub identifier: String,
    pub antenna_id: i64,
    pub timestamp_ms: i64,
    pub signal_strength: f64,
}

/// Port to the downstream telemetry collector.
#[async_trait]
pub trait TelemetryCollector: Send + Sync {
    /// Registers an antenna at `(x, y)` and returns the identifier the
    /// collector assigned to it. Zero is not a valid identifier.
    async fn register_antenna(&self, x: f64, y: f64) -> DomainResult<i64>;

    async fn log_measurement(&self, measurement: Measurement) -> DomainResult<()>;
}

pub type DynCollector = Arc<dyn TelemetryCollector>;

/// Port for turning a subscriber identity into a fixed-length digest.
pub trait IdentityHasher: Send + Sync {
    fn hash(&self, content: &str) -> String;
}

pub type DynHasher = Arc<dyn IdentityHasher>;
