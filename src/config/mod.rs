pub mod collector;
pub mod grid;

pub use collector::*;
pub use grid::*;

use crate::common::{DomainError, DomainResult};
use crate::domains::antenna::Antenna;
use crate::domains::geometry::{Direction, Position};
use crate::domains::jitter::Randomizer;
use crate::domains::person::Person;
use crate::domains::propagation::{CalibrationReference, PropagationConfig};
use crate::domains::simulation::{PollConfig, Scenario, DEFAULT_REGISTRATION_BACKOFF_MS, MAX_INTERVAL_MS};
use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound (exclusive) of generated IMSIs.
pub const IMSI_UPPER_BOUND: u64 = 1_000_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntennaConfig {
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonConfig {
    /// Random when absent.
    #[serde(default)]
    pub imsi: Option<u64>,
    pub position: Position,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub signal_strength: Randomizer,
}

/// The full scenario: what to simulate and where to report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub poll: PollConfig,
    pub propagation: PropagationConfig,
    pub registration_backoff_ms: u64,
    pub antennas: Vec<AntennaConfig>,
    pub persons: Vec<PersonConfig>,
    pub antenna_grids: Vec<AntennaGridConfig>,
    pub person_grids: Vec<PersonGridConfig>,
    pub collector: CollectorConfig,
    /// Domain log file; console only when absent.
    pub log_file: Option<String>,
    /// Prepended to every IMSI before hashing.
    pub identity_salt: String,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid scenario file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit antennas followed by every expanded antenna grid.
    pub fn all_antennas(&self) -> Vec<AntennaConfig> {
        let mut antennas = self.antennas.clone();
        antennas.extend(self.antenna_grids.iter().flat_map(antenna_grid));
        antennas
    }

    /// Explicit persons followed by every expanded person grid.
    pub fn all_persons(&self) -> Vec<PersonConfig> {
        let mut persons = self.persons.clone();
        persons.extend(self.person_grids.iter().flat_map(person_grid));
        persons
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.poll.interval_ms == 0 || self.poll.interval_ms > MAX_INTERVAL_MS {
            return Err(DomainError::invalid_config(format!(
                "poll.interval_ms must be between 1 and {}, got {}",
                MAX_INTERVAL_MS, self.poll.interval_ms
            )));
        }
        self.poll.deviance.validate("poll.deviance")?;
        if self.registration_backoff_ms == 0 || self.registration_backoff_ms > MAX_INTERVAL_MS {
            return Err(DomainError::invalid_config(format!(
                "registration_backoff_ms must be between 1 and {}, got {}",
                MAX_INTERVAL_MS, self.registration_backoff_ms
            )));
        }
        self.propagation.build()?;

        for grid in &self.antenna_grids {
            check_grid("antenna_grids", grid.rows, grid.columns, grid.vertical_spacing, grid.horizontal_spacing)?;
        }
        for grid in &self.person_grids {
            check_grid("person_grids", grid.rows, grid.columns, grid.vertical_spacing, grid.horizontal_spacing)?;
        }

        for (i, antenna) in self.all_antennas().iter().enumerate() {
            if !antenna.position.is_finite() {
                return Err(DomainError::invalid_config(format!("antenna {} has a non-finite position", i)));
            }
        }
        for (i, person) in self.all_persons().iter().enumerate() {
            let label = format!("person {}", i);
            if !person.position.is_finite() {
                return Err(DomainError::invalid_config(format!("{} has a non-finite position", label)));
            }
            if !person.direction.bearing.is_finite() {
                return Err(DomainError::invalid_config(format!("{} has a non-finite bearing", label)));
            }
            if !(person.direction.speed.is_finite() && person.direction.speed >= 0.0) {
                return Err(DomainError::invalid_config(format!("{} speed must be non-negative", label)));
            }
            person.signal_strength.validate(&label)?;
            if matches!(person.imsi, Some(imsi) if imsi >= IMSI_UPPER_BOUND) {
                return Err(DomainError::invalid_config(format!("{} imsi has more than 15 digits", label)));
            }
        }
        Ok(())
    }

    /// Builds the simulation working set. Every entity is a fresh copy, so the
    /// simulation never mutates this configuration.
    pub fn scenario<R: Rng + ?Sized>(&self, rng: &mut R) -> DomainResult<Scenario> {
        self.validate()?;

        let antennas = self
            .all_antennas()
            .into_iter()
            .enumerate()
            .map(|(i, a)| Antenna::new(format!("antenna-{}", i), a.position))
            .collect();

        let persons = self
            .all_persons()
            .into_iter()
            .map(|p| {
                let imsi = p.imsi.unwrap_or_else(|| rng.gen_range(0..IMSI_UPPER_BOUND));
                Person::new(imsi, p.position, p.direction, p.signal_strength)
            })
            .collect();

        Ok(Scenario {
            poll: self.poll,
            model: self.propagation.build()?,
            persons,
            antennas,
            registration_backoff_ms: self.registration_backoff_ms,
        })
    }
}

fn check_grid(label: &str, rows: u32, columns: u32, vertical: f64, horizontal: f64) -> DomainResult<()> {
    if rows == 0 || columns == 0 {
        return Err(DomainError::invalid_config(format!("{} need at least one row and one column", label)));
    }
    if !(vertical.is_finite() && horizontal.is_finite()) {
        return Err(DomainError::invalid_config(format!("{} spacing must be finite", label)));
    }
    Ok(())
}

impl Default for Config {
    /// Four antennas 20 m apart watching four slowly walking persons.
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            propagation: PropagationConfig::Calibrated {
                first: CalibrationReference::new(1.0, -20.0),
                second: CalibrationReference::new(10.0, -70.0),
            },
            registration_backoff_ms: DEFAULT_REGISTRATION_BACKOFF_MS,
            antennas: Vec::new(),
            persons: Vec::new(),
            antenna_grids: vec![AntennaGridConfig {
                corner_position: Position::new(0.0, 0.0),
                rows: 2,
                columns: 2,
                vertical_spacing: 20.0,
                horizontal_spacing: 20.0,
            }],
            person_grids: vec![PersonGridConfig {
                corner_position: Position::new(2.0, 3.0),
                rows: 2,
                columns: 2,
                vertical_spacing: 5.0,
                horizontal_spacing: 5.0,
                direction: Direction { bearing: 70.0, speed: 0.2 },
                signal_strength: Randomizer::default(),
            }],
            collector: CollectorConfig::default(),
            log_file: None,
            identity_salt: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_scenario_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.all_antennas().len(), 4);
        assert_eq!(config.all_persons().len(), 4);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [[antennas]]
            position = [0.0, 0.0]

            [[persons]]
            position = [0.0, 150.0]
            direction = { bearing = 270.0, speed = 1.0 }
            "#,
        )
        .unwrap();
        assert_eq!(config.poll.interval_ms, 1000);
        assert_eq!(config.poll.deviance, Randomizer::default());
        assert_eq!(config.propagation, PropagationConfig::Linear { max_range: 1000.0 });
        assert_eq!(config.persons[0].signal_strength.max_deviance, 10.0);
        assert_eq!(config.persons[0].signal_strength.curve_alpha, 0.5);
        assert!(config.persons[0].imsi.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            "poll = { interval_ms = 0 }",
            "poll = { interval_ms = 9223372036854775807 }",
            "registration_backoff_ms = 0",
            "registration_backoff_ms = 86400001",
            "poll = { deviance = { curve_alpha = 0.0 } }",
            r#"propagation = { model = "calibrated", first = { distance = 5.0, strength = -20.0 }, second = { distance = 5.0, strength = -70.0 } }"#,
            r#"propagation = { model = "linear", max_range = -1.0 }"#,
            "[[persons]]\nposition = [0.0, 0.0]\nsignal_strength = { curve_alpha = -2.0 }",
            "[[persons]]\nposition = [0.0, 0.0]\ndirection = { speed = -1.0 }",
            "[[antenna_grids]]\ncorner_position = [0.0, 0.0]\nrows = 0\ncolumns = 1\nvertical_spacing = 1.0\nhorizontal_spacing = 1.0",
        ];
        for case in cases {
            assert!(Config::from_toml_str(case).is_err(), "accepted: {}", case);
        }
    }

    #[test]
    fn test_scenario_is_a_copy_with_generated_imsis() {
        let mut config = Config::default();
        config.persons.push(PersonConfig {
            imsi: Some(42),
            position: Position::new(1.0, 1.0),
            direction: Direction { bearing: 0.0, speed: 1.0 },
            signal_strength: Randomizer::exact(),
        });
        let mut rng = StdRng::seed_from_u64(11);
        let mut scenario = config.scenario(&mut rng).unwrap();

        assert_eq!(scenario.persons.len(), 5);
        assert_eq!(scenario.persons[0].imsi, 42);
        assert!(scenario.persons.iter().all(|p| p.imsi < IMSI_UPPER_BOUND));
        assert_eq!(scenario.antennas[3].id, "antenna-3");
        assert!(scenario.antennas.iter().all(|a| !a.is_registered()));

        scenario.persons[0].advance(10.0);
        assert_eq!(scenario.persons[0].position, Position::new(11.0, 1.0));
        assert_eq!(config.persons[0].position, Position::new(1.0, 1.0));
    }

    #[tokio::test]
    async fn test_from_file_reports_path() {
        let err = Config::from_file("/definitely/not/here.toml").await.unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.toml"));
    }
}
