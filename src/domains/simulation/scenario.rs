use crate::domains::antenna::Antenna;
use crate::domains::jitter::Randomizer;
use crate::domains::person::Person;
use crate::domains::propagation::DynPropagationModel;
use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_REGISTRATION_BACKOFF_MS: u64 = 1000;
/// Upper bound for the poll interval and the registration backoff (one day).
pub const MAX_INTERVAL_MS: u64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Milliseconds between ticks.
    pub interval_ms: u64,

    /// Jitter applied to the delay of each report within a tick.
    pub deviance: Randomizer,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            deviance: Randomizer::default(),
        }
    }
}

/// The mutable working set a simulation starts from.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub poll: PollConfig,
    pub model: DynPropagationModel,
    pub persons: Vec<Person>,
    pub antennas: Vec<Antenna>,
    pub registration_backoff_ms: u64,
}
