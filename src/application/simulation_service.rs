use crate::adapters::outbound::{ConsoleCollector, GrpcCollector, Sha256Hasher};
use crate::common::{ApplicationError, ApplicationResult};
use crate::config::{CollectorSettings, Config};
use crate::domains::simulation::{DynCollector, SimClock, Simulation};
use crate::domains::DynLogger;
use rand::rngs::StdRng;
use std::sync::Arc;

/// Where measurements go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectorMode {
    Grpc(CollectorSettings),
    /// Print measurements instead of sending them.
    DryRun,
}

/// Wires a validated scenario to its collector, hasher and logger.
pub struct SimulationService {
    config: Config,
    logger: DynLogger,
}

impl SimulationService {
    pub fn new(config: Config, logger: DynLogger) -> Self {
        Self { config, logger }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Console collector for dry runs, otherwise the gRPC endpoint from the
    /// environment or the scenario file.
    pub fn collector_mode(&self, dry_run: bool) -> ApplicationResult<CollectorMode> {
        if dry_run {
            return Ok(CollectorMode::DryRun);
        }
        Ok(CollectorMode::Grpc(CollectorSettings::from_env(&self.config.collector)?))
    }

    pub fn collector(&self, mode: &CollectorMode) -> ApplicationResult<DynCollector> {
        match mode {
            CollectorMode::Grpc(settings) => {
                self.logger.info(&format!("Connecting to CDM collector at {}", settings.url()));
                let client = GrpcCollector::connect_lazy(&settings.host, settings.port)
                    .map_err(|e| ApplicationError::Collector(e.to_string()))?;
                Ok(Arc::new(client))
            }
            CollectorMode::DryRun => {
                self.logger.info("Dry run: measurements are printed, not sent");
                Ok(Arc::new(ConsoleCollector::new()))
            }
        }
    }

    /// Builds a simulation over a fresh copy of the configured entities.
    pub fn build(
        &self,
        collector: DynCollector,
        clock: Box<dyn SimClock>,
        mut rng: StdRng,
    ) -> ApplicationResult<Simulation> {
        let scenario = self.config.scenario(&mut rng)?;
        self.logger.info(&format!(
            "Scenario: {} antennas, {} persons, {} propagation (max range {:.1} m)",
            scenario.antennas.len(),
            scenario.persons.len(),
            scenario.model.name(),
            scenario.model.max_range()
        ));

        let hasher = Arc::new(Sha256Hasher::with_salt(self.config.identity_salt.clone()));
        Ok(Simulation::new(
            scenario,
            collector,
            hasher,
            self.logger.clone(),
            clock,
            rng,
        ))
    }
}
