use cdm_simulator::adapters::outbound::{init_noop_logger, InMemoryCollector, Sha256Hasher};
use cdm_simulator::application::{CollectorMode, SimulationService};
use cdm_simulator::domains::simulation::{IdentityHasher, VirtualClock};
use cdm_simulator::domains::Position;
use cdm_simulator::Config;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const EPOCH: i64 = 1_700_000_000_000;

const SCENARIO: &str = r#"
registration_backoff_ms = 250
identity_salt = "cell-7"

[poll]
interval_ms = 1000
deviance = { max_deviance = 0.0 }

[propagation]
model = "calibrated"
first = { distance = 1.0, strength = -20.0 }
second = { distance = 10.0, strength = -70.0 }

[[antennas]]
position = [0.0, 0.0]

[[persons]]
imsi = 99
position = [0.0, 4.0]
signal_strength = { max_deviance = 0.0 }

[[person_grids]]
corner_position = [3.0, 0.0]
rows = 1
columns = 2
vertical_spacing = 0.0
horizontal_spacing = 4.0
signal_strength = { max_deviance = 0.0 }
"#;

fn write_scenario(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_scenario_file_drives_simulation() {
    let file = write_scenario(SCENARIO);
    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.all_persons().len(), 3);
    assert_eq!(config.registration_backoff_ms, 250);

    let service = SimulationService::new(config, init_noop_logger());
    let collector = Arc::new(InMemoryCollector::new());
    let mut sim = service
        .build(collector.clone(), Box::new(VirtualClock::new(EPOCH)), StdRng::seed_from_u64(11))
        .unwrap();

    sim.run_until(600).await.unwrap();

    assert_eq!(collector.registrations(), vec![(Position::new(0.0, 0.0), 1)]);
    let measurements = collector.measurements();
    assert_eq!(measurements.len(), 3);
    assert!(measurements.iter().all(|m| m.antenna_id == 1 && m.timestamp_ms == EPOCH + 500));

    let expected = Sha256Hasher::with_salt("cell-7").hash("99");
    assert!(measurements.iter().any(|m| m.identifier == expected));
    // Unsalted digests never appear
    let unsalted = Sha256Hasher::new().hash("99");
    assert!(measurements.iter().all(|m| m.identifier != unsalted));
}

#[tokio::test]
async fn test_registration_backoff_from_file() {
    let file = write_scenario(SCENARIO);
    let config = Config::from_file(file.path()).await.unwrap();
    let service = SimulationService::new(config, init_noop_logger());
    let collector = Arc::new(InMemoryCollector::new());
    collector.fail_registrations(1);
    let mut sim = service
        .build(collector.clone(), Box::new(VirtualClock::new(EPOCH)), StdRng::seed_from_u64(11))
        .unwrap();

    sim.run_until(249).await.unwrap();
    assert!(sim.visible_antennas().is_empty());

    sim.run_until(250).await.unwrap();
    assert_eq!(sim.visible_antennas(), vec![1]);
}

#[tokio::test]
async fn test_missing_file_names_path() {
    let err = Config::from_file("/nonexistent/scenario.toml").await.unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/scenario.toml"));
}

#[tokio::test]
async fn test_invalid_file_is_rejected() {
    let file = write_scenario("[poll]\ninterval_ms = 0\n");
    let err = Config::from_file(file.path()).await.unwrap_err();
    assert!(format!("{:#}", err).contains("interval_ms"));
}

#[test]
fn test_dry_run_collector_needs_no_network() {
    let service = SimulationService::new(Config::default(), init_noop_logger());
    let mode = service.collector_mode(true).unwrap();
    assert_eq!(mode, CollectorMode::DryRun);
    assert!(service.collector(&mode).is_ok());
}

#[tokio::test]
async fn test_bundled_scenario_matches_builtin_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/default.toml");
    let config = Config::from_file(path).await.unwrap();
    let builtin = Config::default();

    assert_eq!(config.poll, builtin.poll);
    assert_eq!(config.propagation, builtin.propagation);
    assert_eq!(config.all_antennas(), builtin.all_antennas());
    assert_eq!(config.all_persons(), builtin.all_persons());
    assert_eq!(config.collector.port, Some(50051));
}
