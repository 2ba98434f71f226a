use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tokio::time::Instant;

/// Time source driving the scheduler. All scheduler times are milliseconds
/// since the clock was created.
#[async_trait]
pub trait SimClock: Send {
    fn now_ms(&self) -> u64;

    /// Epoch milliseconds stamped on emitted measurements.
    fn timestamp_ms(&self) -> i64;

    /// Returns once `now_ms() >= at_ms`.
    async fn wait_until(&mut self, at_ms: u64);

    /// Virtual clocks jump instantly; remote calls are treated as taking no
    /// simulated time.
    fn is_virtual(&self) -> bool;
}

pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SimClock for WallClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn timestamp_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    async fn wait_until(&mut self, at_ms: u64) {
        match self.start.checked_add(Duration::from_millis(at_ms)) {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            // Beyond what the platform clock can represent
            None => std::future::pending::<()>().await,
        }
    }

    fn is_virtual(&self) -> bool {
        false
    }
}

/// Deterministic clock for tests and offline runs.
pub struct VirtualClock {
    now: u64,
    epoch_ms: i64,
}

impl VirtualClock {
    pub fn new(epoch_ms: i64) -> Self {
        Self { now: 0, epoch_ms }
    }
}

#[async_trait]
impl SimClock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn timestamp_ms(&self) -> i64 {
        self.epoch_ms + self.now as i64
    }

    async fn wait_until(&mut self, at_ms: u64) {
        self.now = self.now.max(at_ms);
    }

    fn is_virtual(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_virtual_clock_never_goes_back() {
        let mut clock = VirtualClock::new(1_700_000_000_000);
        clock.wait_until(250).await;
        assert_eq!(clock.now_ms(), 250);
        clock.wait_until(100).await;
        assert_eq!(clock.now_ms(), 250);
        assert_eq!(clock.timestamp_ms(), 1_700_000_000_250);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wall_clock_unreachable_deadline_never_fires() {
        let mut clock = WallClock::new();
        let waited = tokio::time::timeout(Duration::from_secs(60), clock.wait_until(u64::MAX)).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wall_clock_sleeps_until_deadline() {
        let mut clock = WallClock::new();
        clock.wait_until(1500).await;
        assert!(clock.now_ms() >= 1500);
        assert!(!clock.is_virtual());
    }
}
