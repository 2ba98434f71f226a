use crate::common::DomainResult;
use crate::domains::simulation::{Measurement, TelemetryCollector};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};

/// Dry-run collector: hands out sequential antenna ids and prints every
/// measurement as a JSON line on stdout.
#[derive(Debug, Default)]
pub struct ConsoleCollector {
    next_id: AtomicI64,
}

impl ConsoleCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TelemetryCollector for ConsoleCollector {
    async fn register_antenna(&self, x: f64, y: f64) -> DomainResult<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(x, y, id, "registered antenna (dry run)");
        Ok(id)
    }

    async fn log_measurement(&self, measurement: Measurement) -> DomainResult<()> {
        println!("{}", serde_json::to_string(&measurement)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_sequential_and_non_zero() {
        let collector = ConsoleCollector::new();
        assert_eq!(collector.register_antenna(0.0, 0.0).await.unwrap(), 1);
        assert_eq!(collector.register_antenna(20.0, 0.0).await.unwrap(), 2);
    }
}
